//! admitline-engine: Timeline layout and navigation for admissions milestones
//!
//! This crate provides the core logic behind the admitline viewer, including:
//! - Calendar-date normalisation and day counts
//! - The visible window and date-to-axis mapping
//! - Previous/next event navigation over explicit view state
//! - Countdown labels and the preparation checklist codec
//! - The timeline data model, validation and persistence

pub mod checklist;
pub mod config;
pub mod dates;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod status;
pub mod store;
pub mod validate;
pub mod window;

// Re-export commonly used types
pub use checklist::{progress, PrepItem};
pub use config::{Config, ConfigError, ADMITLINE_DIR};
pub use dates::{
    add_days, date_only, days_until, days_until_today, format_date_long, format_date_short,
    parse_date, today, ToDateOnly,
};
pub use layout::{off_axis_counts, place_events, LabelSide, Placement};
pub use model::{sort_by_date, Event, Pathway, TimelineDocument, Upsert};
pub use navigation::{
    find_adjacent_event, Direction, NavigationEdge, NavigationFocus, NavigationStep, ViewState,
};
pub use status::{is_urgent, status_label, Locale, StatusLabel, DEFAULT_URGENT_DAYS};
pub use store::{
    export_document, modify, remove_event, toggle_prep_item, upsert_event, EventStore,
    JsonFileStore, MemoryStore, StoreError,
};
pub use validate::{parse_document, split_lines, validate_value, ValidationError};
pub use window::{
    center_on, is_on_axis, month_ticks, month_window, position, VisibleWindow, WindowError,
    DEFAULT_HALF_SPAN_DAYS,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_browse_sample_timeline() {
        let document = TimelineDocument::sample();
        let today = NaiveDate::from_ymd_opt(2025, 1, 18).unwrap();
        let view = ViewState::initial(today);

        let step = view
            .step(&document.timeline, Direction::Next, DEFAULT_HALF_SPAN_DAYS)
            .unwrap();
        assert_eq!(step.event.id, "application-1");

        let days = days_until(step.event.date, today);
        assert_eq!(status_label(days), StatusLabel::InDays(56));

        let placed = place_events(&document.timeline, &step.view.window, 600.0);
        let on_axis: Vec<&str> = placed
            .iter()
            .filter(|p| p.on_axis)
            .map(|p| p.event.id.as_str())
            .collect();
        assert_eq!(on_axis, vec!["application-1"]);
    }
}
