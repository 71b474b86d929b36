//! The visible date window and date-to-axis mapping.
//!
//! A [`VisibleWindow`] is the calendar interval currently laid out on the
//! horizontal axis. For positioning, `end` is exclusive: a date on `end` maps
//! exactly to the right edge of the axis. For display both bounds are shown.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::dates::add_days;

/// Half span used when re-centering on a navigated-to event.
pub const DEFAULT_HALF_SPAN_DAYS: i64 = 15;

/// Errors constructing a window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window start {start} is after end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// A calendar interval mapped onto the display axis. `start <= end` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl VisibleWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// First displayed day.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last displayed day.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Length in days. Zero for a degenerate window.
    pub fn span_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }

    /// Whether `start == end`; such a window cannot position anything.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Whether `date` is displayed, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }

    /// Every displayed day, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Translate both bounds by `delta_days`, preserving the length.
    #[must_use]
    pub fn shift(self, delta_days: i64) -> Self {
        Self {
            start: add_days(self.start, delta_days),
            end: add_days(self.end, delta_days),
        }
    }

    /// Horizontal offset of `date` on an axis `axis_width` units wide.
    ///
    /// See [`position`].
    pub fn position(&self, date: NaiveDate, axis_width: f64) -> Option<f64> {
        position(date, self, axis_width)
    }
}

/// Horizontal offset of `date` within `window` on an axis `axis_width` wide.
///
/// The result is not clamped: dates before the window give negative offsets
/// and dates after it give offsets beyond `axis_width`, which lets callers
/// detect off-screen events with [`is_on_axis`]. Returns `None` for a
/// degenerate window.
#[allow(clippy::cast_precision_loss)]
pub fn position(date: NaiveDate, window: &VisibleWindow, axis_width: f64) -> Option<f64> {
    let span = window.span_days();
    if span == 0 {
        return None;
    }
    let offset = date.signed_duration_since(window.start).num_days();
    Some(offset as f64 / span as f64 * axis_width)
}

/// Whether an offset from [`position`] falls on the axis.
pub fn is_on_axis(offset: f64, axis_width: f64) -> bool {
    (0.0..=axis_width).contains(&offset)
}

/// The first-to-last-day window of the month containing `anchor`.
pub fn month_window(anchor: NaiveDate) -> VisibleWindow {
    let start = first_of_month(anchor);
    let end = next_month(start).and_then(|d| d.pred_opt()).unwrap_or(NaiveDate::MAX);
    VisibleWindow { start, end }
}

/// Window of `2 * half_span_days` centered on `date`.
pub fn center_on(date: NaiveDate, half_span_days: i64) -> VisibleWindow {
    let half = half_span_days.abs();
    VisibleWindow {
        start: add_days(date, -half),
        end: add_days(date, half),
    }
}

/// First-of-month days that fall inside the window, for axis labels.
pub fn month_ticks(window: &VisibleWindow) -> Vec<NaiveDate> {
    let mut ticks = Vec::new();
    let mut tick = if window.start.day() == 1 {
        Some(window.start)
    } else {
        next_month(first_of_month(window.start))
    };

    while let Some(date) = tick {
        if date > window.end {
            break;
        }
        ticks.push(date);
        tick = next_month(date);
    }

    ticks
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
