//! Stepping between events.
//!
//! Navigation state is a plain value. The host holds a [`ViewState`], passes
//! it to an operation and gets a new one back; nothing here keeps state of its
//! own.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::model::{sort_by_date, Event};
use crate::window::{center_on, month_window, VisibleWindow};

/// Which neighbour to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Previous,
    Next,
}

/// Pivot date for previous/next lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct NavigationFocus(NaiveDate);

impl NavigationFocus {
    /// Focus on a specific day.
    pub fn at(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Focus on the current local day.
    pub fn today() -> Self {
        Self(crate::dates::today())
    }

    /// The focused day.
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

/// Find the event nearest to `focus` in `direction`.
///
/// Events are ordered by date with a stable sort. `Previous` returns the
/// latest event strictly before `focus`, `Next` the earliest event strictly
/// after it. Among events sharing that date, `Previous` picks the one listed
/// last and `Next` the one listed first.
pub fn find_adjacent_event(
    events: &[Event],
    focus: NaiveDate,
    direction: Direction,
) -> Option<&Event> {
    let sorted = sort_by_date(events);
    match direction {
        Direction::Previous => sorted.into_iter().rev().find(|e| e.date < focus),
        Direction::Next => sorted.into_iter().find(|e| e.date > focus),
    }
}

/// No event exists in the requested direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationEdge {
    #[error("already at the earliest event")]
    AtEarliest,
    #[error("already at the latest event")]
    AtLatest,
}

impl NavigationEdge {
    fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Previous => Self::AtEarliest,
            Direction::Next => Self::AtLatest,
        }
    }
}

/// Result of a successful step.
#[derive(Debug, Clone, Copy)]
pub struct NavigationStep<'a> {
    /// The event navigated to.
    pub event: &'a Event,
    /// View state centered on that event.
    pub view: ViewState,
}

/// Transient view state: the visible window and the navigation focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub window: VisibleWindow,
    pub focus: NavigationFocus,
}

impl ViewState {
    /// Session start: the month of `today`, focused on `today`.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            window: month_window(today),
            focus: NavigationFocus::at(today),
        }
    }

    /// Step to the adjacent event and center the window on it.
    pub fn step<'a>(
        self,
        events: &'a [Event],
        direction: Direction,
        half_span_days: i64,
    ) -> Result<NavigationStep<'a>, NavigationEdge> {
        let Some(event) = find_adjacent_event(events, self.focus.date(), direction) else {
            debug!(focus = %self.focus.date(), ?direction, "no adjacent event");
            return Err(NavigationEdge::for_direction(direction));
        };

        debug!(event_id = %event.id, date = %event.date, ?direction, "navigated");
        Ok(NavigationStep {
            event,
            view: Self {
                window: center_on(event.date, half_span_days),
                focus: NavigationFocus::at(event.date),
            },
        })
    }

    /// Reset to the month of `today` with the focus on `today`.
    #[must_use]
    pub fn jump_to_now(self, today: NaiveDate) -> Self {
        Self::initial(today)
    }

    /// Pan the window without moving the focus.
    #[must_use]
    pub fn shift(self, delta_days: i64) -> Self {
        Self {
            window: self.window.shift(delta_days),
            ..self
        }
    }

    /// Center the window on an event picked directly, focusing on it.
    #[must_use]
    pub fn focus_on(self, event: &Event, half_span_days: i64) -> Self {
        Self {
            window: center_on(event.date, half_span_days),
            focus: NavigationFocus::at(event.date),
        }
    }
}
