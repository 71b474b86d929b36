//! Application state for the admitline TUI.

use admitline_engine::{
    add_days, month_window, Config, Direction, Event, EventStore, Pathway, StoreError,
    TimelineDocument, ViewState,
};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::event::Action;
use crate::ui::text::{edge_notice, localized};

/// Days moved by a week shift.
const WEEK_DAYS: i64 = 7;

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// The axis and the events inside the window.
    #[default]
    Timeline,
    /// The selected event's card.
    Detail,
    /// Schools grouped by pathway.
    Schools,
}

impl Screen {
    /// Name shown in the status bar.
    pub fn title(self, locale: admitline_engine::Locale) -> &'static str {
        match self {
            Self::Timeline => localized(locale, "時間軸", "Timeline"),
            Self::Detail => localized(locale, "詳細", "Detail"),
            Self::Schools => localized(locale, "學校", "Schools"),
        }
    }
}

/// Main application state.
pub struct App {
    /// Current screen.
    pub screen: Screen,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is shown.
    pub show_help: bool,

    pub config: Config,

    /// The timeline being viewed.
    pub document: TimelineDocument,

    /// Visible window and navigation focus.
    pub view: ViewState,

    /// Today's date, refreshed every tick.
    pub today: NaiveDate,

    /// Id of the event last navigated to.
    pub selected: Option<String>,

    /// Highlighted preparation item on the detail screen.
    pub prep_cursor: usize,

    /// Only events of this pathway are shown when set.
    pub pathway_filter: Option<Pathway>,

    /// Scroll offset of the schools screen.
    pub schools_scroll: u16,

    /// Temporary notification message.
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Tick counter.
    pub tick: usize,

    ticks_since_reload: u64,

    store: Box<dyn EventStore>,

    clock: fn() -> NaiveDate,
}

impl App {
    /// Create the app over `document`, which was loaded from `store`.
    pub fn new(config: Config, store: Box<dyn EventStore>, document: TimelineDocument) -> Self {
        Self::with_clock(config, store, document, admitline_engine::today)
    }

    /// Create the app with a custom source for today's date.
    pub fn with_clock(
        config: Config,
        store: Box<dyn EventStore>,
        document: TimelineDocument,
        clock: fn() -> NaiveDate,
    ) -> Self {
        let today = clock();
        Self {
            screen: Screen::default(),
            should_quit: false,
            show_help: false,
            config,
            document,
            view: ViewState::initial(today),
            today,
            selected: None,
            prep_cursor: 0,
            pathway_filter: None,
            schools_scroll: 0,
            notification: None,
            notification_ttl: 0,
            tick: 0,
            ticks_since_reload: 0,
            store,
            clock,
        }
    }

    /// Create an app over the sample timeline with today fixed to 2025-01-18.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let document = TimelineDocument::sample();
        let store = admitline_engine::MemoryStore::new(document.clone());
        Self::with_clock(Config::default(), Box::new(store), document, || {
            NaiveDate::from_ymd_opt(2025, 1, 18).unwrap_or_default()
        })
    }

    /// Events passing the pathway filter, in stored order.
    pub fn visible_events(&self) -> Vec<Event> {
        self.document
            .timeline
            .iter()
            .filter(|e| self.pathway_filter.is_none_or(|p| e.pathway == p))
            .cloned()
            .collect()
    }

    /// The event last navigated to, if it still exists.
    pub fn selected_event(&self) -> Option<&Event> {
        self.selected.as_deref().and_then(|id| self.document.find(id))
    }

    /// Handle a key action.
    pub fn handle_action(&mut self, action: Action) {
        // Any key closes the help overlay
        if self.show_help {
            self.show_help = false;
            return;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::Help => {
                self.show_help = true;
                return;
            }
            Action::Previous => {
                self.navigate(Direction::Previous);
                return;
            }
            Action::Next => {
                self.navigate(Direction::Next);
                return;
            }
            Action::Reload => {
                if self.reload() {
                    self.set_notification(localized(self.config.locale, "已重新載入", "Reloaded"));
                }
                return;
            }
            Action::CyclePathway => {
                self.cycle_pathway();
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Timeline => self.handle_timeline_action(action),
            Screen::Detail => self.handle_detail_action(action),
            Screen::Schools => self.handle_schools_action(action),
        }
    }

    fn handle_timeline_action(&mut self, action: Action) {
        match action {
            Action::Select => {
                if self.selected_event().is_some() {
                    self.prep_cursor = 0;
                    self.screen = Screen::Detail;
                } else {
                    self.set_notification(localized(
                        self.config.locale,
                        "請先用 ←/→ 選擇事件",
                        "Pick an event with ←/→ first",
                    ));
                }
            }
            Action::WeekBack => self.view = self.view.shift(-WEEK_DAYS),
            Action::WeekForward => self.view = self.view.shift(WEEK_DAYS),
            Action::MonthBack => self.shift_month(-1),
            Action::MonthForward => self.shift_month(1),
            Action::Today => self.jump_to_now(),
            Action::Schools => {
                self.schools_scroll = 0;
                self.screen = Screen::Schools;
            }
            _ => {}
        }
    }

    fn handle_detail_action(&mut self, action: Action) {
        match action {
            Action::Back | Action::Select => self.screen = Screen::Timeline,
            Action::Up => self.prep_cursor = self.prep_cursor.saturating_sub(1),
            Action::Down => {
                let count = self.selected_event().map_or(0, |e| e.preparation.len());
                if self.prep_cursor + 1 < count {
                    self.prep_cursor += 1;
                }
            }
            Action::Toggle => self.toggle_prep(),
            Action::Today => {
                self.jump_to_now();
                self.screen = Screen::Timeline;
            }
            Action::Schools => self.screen = Screen::Schools,
            _ => {}
        }
    }

    fn handle_schools_action(&mut self, action: Action) {
        match action {
            Action::Back | Action::Schools => self.screen = Screen::Timeline,
            Action::Up => self.schools_scroll = self.schools_scroll.saturating_sub(1),
            Action::Down => self.schools_scroll = self.schools_scroll.saturating_add(1),
            _ => {}
        }
    }

    /// Step to the adjacent visible event and select it.
    fn navigate(&mut self, direction: Direction) {
        let events = self.visible_events();
        match self
            .view
            .step(&events, direction, self.config.half_span_days)
        {
            Ok(step) => {
                if self.selected.as_deref() != Some(step.event.id.as_str()) {
                    self.prep_cursor = 0;
                }
                self.selected = Some(step.event.id.clone());
                self.view = step.view;
            }
            Err(edge) => self.set_notification(edge_notice(edge, self.config.locale)),
        }
    }

    fn jump_to_now(&mut self) {
        self.view = self.view.jump_to_now(self.today);
        self.selected = None;
    }

    /// Show the month before or after the one the window is centered in.
    fn shift_month(&mut self, months: i32) {
        let window = self.view.window;
        let middle = add_days(window.start(), window.span_days() / 2);
        let current = month_window(middle);
        let target = if months < 0 {
            month_window(add_days(current.start(), -1))
        } else {
            month_window(add_days(current.end(), 1))
        };
        self.view = ViewState {
            window: target,
            ..self.view
        };
    }

    fn cycle_pathway(&mut self) {
        let next = match self.pathway_filter {
            None => Some(Pathway::SpecialSelection),
            Some(Pathway::SpecialSelection) => Some(Pathway::Application),
            Some(Pathway::Application) => Some(Pathway::Distribution),
            Some(Pathway::Distribution) => None,
        };
        self.pathway_filter = next;
        debug!(filter = ?next, "pathway filter changed");

        let hidden = self
            .selected_event()
            .is_some_and(|e| next.is_some_and(|p| e.pathway != p));
        if hidden {
            self.selected = None;
            if self.screen == Screen::Detail {
                self.screen = Screen::Timeline;
            }
        }

        let label = next.map_or(localized(self.config.locale, "全部", "All"), |p| {
            match self.config.locale {
                admitline_engine::Locale::ZhTw => p.label(),
                admitline_engine::Locale::En => p.english_name(),
            }
        });
        self.set_notification(label);
    }

    /// Toggle the highlighted preparation item and persist the document.
    fn toggle_prep(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let cursor = self.prep_cursor;
        let last_update = self.document.last_update;
        let Some(event) = self.document.find_mut(&id) else {
            return;
        };
        let Some(previous) = event.preparation.get(cursor).cloned() else {
            return;
        };
        if event.toggle_prep(cursor).is_none() {
            return;
        }
        self.document.touch(self.today);

        if let Err(e) = self.store.save(&self.document) {
            warn!(error = %e, event_id = %id, "failed to save checklist");
            // Keep the screen in step with what is stored
            if let Some(item) = self
                .document
                .find_mut(&id)
                .and_then(|event| event.preparation.get_mut(cursor))
            {
                *item = previous;
            }
            self.document.last_update = last_update;
            self.set_notification(format!(
                "{}: {e}",
                localized(self.config.locale, "儲存失敗", "Save failed")
            ));
        }
    }

    /// Replace the document with the stored one. Returns whether it changed
    /// hands; a missing store keeps the current document.
    pub fn reload(&mut self) -> bool {
        match self.store.load() {
            Ok(document) => {
                self.document = document;
                self.reconcile_selection();
                info!(events = self.document.len(), "reloaded timeline");
                true
            }
            Err(StoreError::NotFound(path)) => {
                debug!(path = %path.display(), "nothing stored yet");
                false
            }
            Err(e) => {
                warn!(error = %e, "reload failed");
                self.set_notification(format!(
                    "{}: {e}",
                    localized(self.config.locale, "載入失敗", "Load failed")
                ));
                false
            }
        }
    }

    fn reconcile_selection(&mut self) {
        match self.selected_event() {
            Some(event) => {
                let count = event.preparation.len();
                self.prep_cursor = self.prep_cursor.min(count.saturating_sub(1));
            }
            None => {
                self.selected = None;
                self.prep_cursor = 0;
                if self.screen == Screen::Detail {
                    self.screen = Screen::Timeline;
                }
            }
        }
    }

    /// Set a temporary notification message.
    pub fn set_notification(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        // ~3 seconds at the default 250ms tick
        self.notification_ttl = 12;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }

        self.today = (self.clock)();

        if self.config.reload_interval_secs > 0 {
            self.ticks_since_reload += 1;
            let elapsed_ms = self
                .ticks_since_reload
                .saturating_mul(self.config.tick_rate_ms);
            if elapsed_ms >= self.config.reload_interval_secs.saturating_mul(1000) {
                self.ticks_since_reload = 0;
                self.reload();
            }
        }
    }
}
