//! admitline CLI: Admissions timeline viewer and editor

use admitline_engine::{
    center_on, days_until, find_adjacent_event, format_date_long, month_window, off_axis_counts,
    parse_date, parse_document, place_events, remove_event, sort_by_date, status_label,
    toggle_prep_item, upsert_event, Config, Direction, Event, EventStore, JsonFileStore,
    NavigationEdge, Pathway, StoreError, TimelineDocument, Upsert, ADMITLINE_DIR,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Admissions milestone timeline with a terminal viewer
#[derive(Parser)]
#[command(name = "admitline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: .admitline/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Create .admitline/ with a default config and the sample timeline
    Init,

    /// List events in date order
    List {
        /// Only events of this pathway
        #[arg(long, value_parser = parse_pathway_arg)]
        pathway: Option<Pathway>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the first event after a date (default: today)
    Next {
        #[arg(long, value_parser = parse_date_arg, value_name = "DATE")]
        from: Option<NaiveDate>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the last event before a date (default: today)
    Prev {
        #[arg(long, value_parser = parse_date_arg, value_name = "DATE")]
        from: Option<NaiveDate>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lay out events on an axis for a window
    Window {
        /// Show the month containing DATE
        #[arg(long, value_parser = parse_date_arg, value_name = "DATE", conflicts_with = "center")]
        month: Option<NaiveDate>,

        /// Center the window on DATE
        #[arg(long, value_parser = parse_date_arg, value_name = "DATE")]
        center: Option<NaiveDate>,

        /// Axis width in pixels
        #[arg(long, default_value = "600")]
        width: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one event with its checklist and schools
    Show { id: String },

    /// Add an event, or replace the event with the same id
    Add {
        #[arg(long, value_parser = parse_pathway_arg)]
        pathway: Pathway,

        /// Milestone label
        #[arg(long, value_parser = parse_text_arg)]
        item: String,

        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,

        /// Event id (generated when omitted)
        #[arg(long, value_parser = parse_text_arg)]
        id: Option<String>,

        /// Preparation entry; `[ ] ` or `[x] ` prefix makes it a checkbox
        #[arg(long = "prep")]
        preparation: Vec<String>,

        /// Related school
        #[arg(long = "school")]
        schools: Vec<String>,
    },

    /// Remove an event
    Remove { id: String },

    /// Toggle preparation item INDEX (as numbered by `show`)
    Check { id: String, index: usize },

    /// List schools grouped by pathway
    Schools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a timeline file without loading it
    Validate { file: PathBuf },

    /// Write a pretty-printed copy of the stored timeline
    Export { path: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    let tui = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(&config, tui);

    match cli.command {
        None | Some(Commands::Tui) => cmd_tui(config),
        Some(Commands::Init) => cmd_init(&config, &config_path),
        Some(Commands::List { pathway, json }) => cmd_list(&config, pathway, json),
        Some(Commands::Next { from, json }) => cmd_step(&config, Direction::Next, from, json),
        Some(Commands::Prev { from, json }) => cmd_step(&config, Direction::Previous, from, json),
        Some(Commands::Window {
            month,
            center,
            width,
            json,
        }) => cmd_window(&config, month, center, width, json),
        Some(Commands::Show { id }) => cmd_show(&config, &id),
        Some(Commands::Add {
            pathway,
            item,
            date,
            id,
            preparation,
            schools,
        }) => {
            let event = match id {
                Some(id) => Event::with_id(id, pathway, item, date),
                None => Event::new(pathway, item, date),
            }
            .preparation(preparation)
            .schools(schools);
            cmd_add(&config, event);
        }
        Some(Commands::Remove { id }) => cmd_remove(&config, &id),
        Some(Commands::Check { id, index }) => cmd_check(&config, &id, index),
        Some(Commands::Schools { json }) => cmd_schools(&config, json),
        Some(Commands::Validate { file }) => cmd_validate(&file),
        Some(Commands::Export { path }) => cmd_export(&config, &path),
    }
}

/// Log to stderr, or to a file next to the data while the TUI owns the
/// terminal. `ADMITLINE_LOG` takes an env-filter directive (default `warn`).
fn init_logging(config: &Config, tui: bool) {
    let filter =
        EnvFilter::try_from_env("ADMITLINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if tui {
        let dir = config
            .data_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(ADMITLINE_DIR));
        let file = std::fs::create_dir_all(dir).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("admitline.log"))
        });
        match file {
            Ok(file) => builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init(),
            Err(_) => builder.with_writer(std::io::sink).try_init(),
        }
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: logging disabled: {e}");
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("not a calendar date: {s}"))
}

fn parse_pathway_arg(s: &str) -> Result<Pathway, String> {
    s.parse()
}

fn parse_text_arg(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("must not be blank".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Store for commands that edit. A first edit starts from the sample
/// timeline the viewer shows, so nothing the user saw disappears.
fn writable_store(config: &Config) -> JsonFileStore {
    let store = JsonFileStore::new(config.data_file.clone());
    if !store.exists() {
        tracing::info!(path = %store.path().display(), "seeding timeline with sample data");
        if let Err(e) = store.save(&TimelineDocument::sample()) {
            fail(e);
        }
    }
    store
}

fn read_document(config: &Config) -> TimelineDocument {
    JsonFileStore::new(config.data_file.clone()).load_or_sample()
}

fn event_json(event: &Event, today: NaiveDate) -> serde_json::Value {
    let days = days_until(event.date, today);
    serde_json::json!({
        "event": event,
        "days": days,
        "status": status_label(days),
    })
}

fn event_row(event: &Event, today: NaiveDate, config: &Config) -> String {
    let days = days_until(event.date, today);
    format!(
        "{}  {}  {}  {}  [{}]",
        format_date_long(event.date),
        event.pathway.label(),
        event.label,
        status_label(days).text(config.locale),
        event.id
    )
}

fn cmd_tui(config: Config) {
    let store = JsonFileStore::new(config.data_file.clone());
    // A broken file is reported rather than replaced by the sample, which the
    // viewer would otherwise save over it.
    let document = match store.load() {
        Ok(document) => document,
        Err(StoreError::NotFound(_)) => TimelineDocument::sample(),
        Err(e) => fail(format!("{}: {e}", store.path().display())),
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(format!("failed to create tokio runtime: {e}")),
    };
    if let Err(e) = rt.block_on(admitline_tui::run_tui(config, Box::new(store), document)) {
        fail(e);
    }
}

fn cmd_init(config: &Config, config_path: &Path) {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else if let Err(e) = config.save(config_path) {
        fail(format!("failed to write {}: {e}", config_path.display()));
    } else {
        println!("Created {}", config_path.display());
    }

    let store = JsonFileStore::new(config.data_file.clone());
    if store.exists() {
        println!("Timeline already exists at {}", store.path().display());
    } else {
        if let Err(e) = store.save(&TimelineDocument::sample()) {
            fail(e);
        }
        println!("Created {} with sample events", store.path().display());
    }
}

fn cmd_list(config: &Config, pathway: Option<Pathway>, json: bool) {
    let document = read_document(config);
    let today = admitline_engine::today();
    let events = match pathway {
        Some(p) => document.by_pathway(p),
        None => document.sorted(),
    };

    if json {
        let rows: Vec<_> = events.iter().map(|e| event_json(e, today)).collect();
        print_json(&rows);
        return;
    }

    if events.is_empty() {
        println!("No events");
        return;
    }
    for event in events {
        println!("{}", event_row(event, today, config));
    }
}

fn cmd_step(config: &Config, direction: Direction, from: Option<NaiveDate>, json: bool) {
    let document = read_document(config);
    let today = admitline_engine::today();
    let focus = from.unwrap_or(today);

    let Some(event) = find_adjacent_event(&document.timeline, focus, direction) else {
        let edge = match direction {
            Direction::Previous => NavigationEdge::AtEarliest,
            Direction::Next => NavigationEdge::AtLatest,
        };
        fail(edge);
    };
    let window = center_on(event.date, config.half_span_days);

    if json {
        print_json(&serde_json::json!({
            "event": event_json(event, today),
            "window": window,
        }));
        return;
    }

    println!("{}", event_row(event, today, config));
    println!(
        "Window: {} - {}",
        format_date_long(window.start()),
        format_date_long(window.end())
    );
}

fn cmd_window(
    config: &Config,
    month: Option<NaiveDate>,
    center: Option<NaiveDate>,
    width: f64,
    json: bool,
) {
    if !width.is_finite() || width <= 0.0 {
        fail(format!("width must be a positive number (got {width})"));
    }
    let document = read_document(config);
    let window = match (month, center) {
        (_, Some(date)) => center_on(date, config.half_span_days),
        (Some(date), None) => month_window(date),
        (None, None) => month_window(admitline_engine::today()),
    };
    let placements = place_events(&document.timeline, &window, width);
    let (before, after) = off_axis_counts(&placements);

    if json {
        print_json(&serde_json::json!({
            "window": window,
            "width": width,
            "placements": placements,
            "before": before,
            "after": after,
        }));
        return;
    }

    println!(
        "{} - {} ({} days)",
        format_date_long(window.start()),
        format_date_long(window.end()),
        window.span_days()
    );
    for placement in placements.iter().filter(|p| p.on_axis) {
        println!(
            "  {:>7.1}  {:<5}  {}  {}",
            placement.offset,
            match placement.side {
                admitline_engine::LabelSide::Above => "above",
                admitline_engine::LabelSide::Below => "below",
            },
            format_date_long(placement.event.date),
            placement.event.label
        );
    }
    println!("{before} earlier, {after} later");
}

fn cmd_show(config: &Config, id: &str) {
    let document = read_document(config);
    let Some(event) = document.find(id) else {
        fail(StoreError::EventNotFound(id.to_string()));
    };
    let today = admitline_engine::today();

    println!("{}", event.label);
    println!("  Pathway: {} ({})", event.pathway.label(), event.pathway.english_name());
    println!(
        "  Date:    {} ({})",
        format_date_long(event.date),
        status_label(days_until(event.date, today)).text(config.locale)
    );

    let items = event.prep_items();
    if !items.is_empty() {
        let (done, checkable) = admitline_engine::progress(&items);
        println!("  Preparation ({done}/{checkable}):");
        for (n, item) in items.iter().enumerate() {
            let mark = match (item.checkable, item.done) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, _) => " - ",
            };
            println!("    {:>2}. {mark} {}", n + 1, item.text);
        }
    }

    let schools = event.unique_schools();
    if !schools.is_empty() {
        println!("  Schools: {}", schools.join(", "));
    }
}

fn cmd_add(config: &Config, event: Event) {
    let store = writable_store(config);
    let id = event.id.clone();
    match upsert_event(&store, event, admitline_engine::today()) {
        Ok(Upsert::Inserted) => println!("Added {id}"),
        Ok(Upsert::Updated) => println!("Updated {id}"),
        Err(e) => fail(e),
    }
}

fn cmd_remove(config: &Config, id: &str) {
    let store = writable_store(config);
    match remove_event(&store, id, admitline_engine::today()) {
        Ok(event) => println!("Removed {} ({})", event.id, event.label),
        Err(e) => fail(e),
    }
}

fn cmd_check(config: &Config, id: &str, index: usize) {
    let Some(position) = index.checked_sub(1) else {
        fail("items are numbered from 1");
    };
    let store = writable_store(config);
    match toggle_prep_item(&store, id, position, admitline_engine::today()) {
        Ok(item) => println!("{item}"),
        Err(e) => fail(e),
    }
}

fn cmd_schools(config: &Config, json: bool) {
    let groups = read_document(config).schools_by_pathway();

    if json {
        print_json(&groups);
        return;
    }

    if groups.is_empty() {
        println!("No schools");
        return;
    }
    for (pathway, schools) in &groups {
        println!("{} ({})", pathway.label(), pathway.english_name());
        println!("  {}", schools.join(", "));
    }
}

fn cmd_validate(file: &Path) {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => fail(format!("{}: {e}", file.display())),
    };
    match parse_document(&content) {
        Ok(document) => {
            let sorted = sort_by_date(&document.timeline);
            println!("OK: {} event(s)", document.len());
            if let (Some(first), Some(last)) = (sorted.first(), sorted.last()) {
                println!(
                    "  {} - {}",
                    format_date_long(first.date),
                    format_date_long(last.date)
                );
            }
        }
        Err(e) => fail(format!("{}: {e}", file.display())),
    }
}

fn cmd_export(config: &Config, path: &Path) {
    let store = JsonFileStore::new(config.data_file.clone());
    match store.export(path) {
        Ok(()) => println!("Exported to {}", path.display()),
        Err(e) => fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["admitline"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "admitline", "add", "--pathway", "申請入學", "--item", "面試日", "--date",
            "2025/4/15", "--prep", "[ ] 作品集", "--prep", "口試練習", "--school", "台大",
        ])
        .unwrap();
        let Some(Commands::Add {
            pathway,
            date,
            preparation,
            schools,
            id,
            ..
        }) = cli.command
        else {
            panic!("expected add");
        };
        assert_eq!(pathway, Pathway::Application);
        assert_eq!(date, d(2025, 4, 15));
        assert_eq!(preparation, vec!["[ ] 作品集", "口試練習"]);
        assert_eq!(schools, vec!["台大"]);
        assert!(id.is_none());
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let base = ["admitline", "add", "--pathway", "application", "--date", "2025-04-15"];
        let blank_item = base.iter().copied().chain(["--item", "  "]);
        assert!(Cli::try_parse_from(blank_item).is_err());

        let blank_id = base.iter().copied().chain(["--item", "面試日", "--id", ""]);
        assert!(Cli::try_parse_from(blank_id).is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["admitline", "next", "--from", "soon"]).is_err());
        assert!(Cli::try_parse_from(["admitline", "list", "--pathway", "繁星推薦"]).is_err());
        assert!(Cli::try_parse_from([
            "admitline", "window", "--month", "2025-03-01", "--center", "2025-03-15"
        ])
        .is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["admitline", "list", "--config", "custom.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn test_event_row() {
        let event = Event::with_id("gsat-1", Pathway::Application, "學測考試", d(2025, 1, 18));
        let row = event_row(&event, d(2025, 1, 17), &Config::default());
        assert_eq!(row, "2025/01/18  申請入學  學測考試  明天  [gsat-1]");
    }

    #[test]
    fn test_event_json() {
        let event = Event::with_id("gsat-1", Pathway::Application, "學測考試", d(2025, 1, 18));
        let value = event_json(&event, d(2025, 1, 8));
        assert_eq!(value["days"], 10);
        assert_eq!(value["status"]["status"], "in_days");
        assert_eq!(value["event"]["item"], "學測考試");
    }
}
