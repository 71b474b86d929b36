//! The horizontal timeline axis.
//!
//! Row layout inside the widget area (top to bottom): month ruler, date and
//! label for events above the axis, connectors, the axis itself, connectors,
//! label and date for events below the axis.

use admitline_engine::{
    days_until, format_date_short, is_urgent, month_ticks, off_axis_counts, place_events, Event,
    LabelSide, Locale, Placement, VisibleWindow,
};
use chrono::NaiveDate;
use ratatui::{buffer::Buffer, layout::Rect, style::Modifier, widgets::Widget};

use crate::ui::text::{truncate_to_width, visual_width};
use crate::ui::theme::{Styles, Symbols};

/// Rows the full axis needs.
pub const AXIS_HEIGHT: u16 = 8;

const RULER_ROW: u16 = 0;
const AXIS_ROW: u16 = 4;
const MAX_LABEL_WIDTH: usize = 16;
/// Columns kept free on each side for off-axis hints.
const GUTTER: u16 = 3;

/// Timeline axis with month ticks, today marker and event labels.
#[derive(Debug, Clone)]
pub struct AxisWidget<'a> {
    events: &'a [Event],
    window: VisibleWindow,
    today: NaiveDate,
    selected: Option<&'a str>,
    locale: Locale,
    urgent_days: i64,
}

impl<'a> AxisWidget<'a> {
    pub fn new(events: &'a [Event], window: VisibleWindow, today: NaiveDate) -> Self {
        Self {
            events,
            window,
            today,
            selected: None,
            locale: Locale::default(),
            urgent_days: admitline_engine::DEFAULT_URGENT_DAYS,
        }
    }

    #[must_use]
    pub fn selected(mut self, id: Option<&'a str>) -> Self {
        self.selected = id;
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn urgent_days(mut self, days: i64) -> Self {
        self.urgent_days = days;
        self
    }

    fn month_label(&self, date: NaiveDate) -> String {
        match self.locale {
            Locale::ZhTw => date.format("%-m月").to_string(),
            Locale::En => date.format("%b").to_string(),
        }
    }
}

/// Geometry of the drawable axis inside an area.
#[derive(Debug, Clone, Copy)]
struct Track {
    x: u16,
    len: u16,
}

impl Track {
    fn new(area: Rect) -> Option<Self> {
        let len = area.width.checked_sub(GUTTER * 2)?;
        (len >= 2).then_some(Self {
            x: area.x + GUTTER,
            len,
        })
    }

    fn width(self) -> f64 {
        f64::from(self.len - 1)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn column(self, offset: f64) -> u16 {
        let step = offset.round().clamp(0.0, self.width()) as u16;
        self.x + step
    }
}

impl Widget for AxisWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let Some(track) = Track::new(area) else {
            return;
        };
        let compact = area.height < AXIS_HEIGHT;
        let axis_y = if compact {
            area.y + area.height / 2
        } else {
            area.y + AXIS_ROW
        };

        for x in track.x..track.x + track.len {
            buf.set_string(x, axis_y, Symbols::AXIS, Styles::border());
        }

        for tick in month_ticks(&self.window) {
            let Some(offset) = self.window.position(tick, track.width()) else {
                continue;
            };
            let col = track.column(offset);
            buf.set_string(col, axis_y, Symbols::TICK, Styles::dim());
            if !compact {
                let label = self.month_label(tick);
                let room = usize::from(area.right().saturating_sub(col));
                buf.set_stringn(col, area.y + RULER_ROW, label, room, Styles::dim());
            }
        }

        if self.window.contains(self.today) {
            if let Some(offset) = self.window.position(self.today, track.width()) {
                let col = track.column(offset);
                let y = if compact { axis_y } else { axis_y + 1 };
                buf.set_string(col, y, Symbols::TODAY, Styles::error());
            }
        }

        let placements = place_events(self.events, &self.window, track.width());
        for placement in placements.iter().filter(|p| p.on_axis) {
            self.draw_event(placement, track, area, axis_y, compact, buf);
        }

        let (before, after) = off_axis_counts(&placements);
        if before > 0 {
            let hint = format!("{}{}", Symbols::MORE_LEFT, before.min(99));
            buf.set_stringn(area.x, axis_y, hint, usize::from(GUTTER), Styles::dim());
        }
        if after > 0 {
            let hint = format!("{}{}", after.min(99), Symbols::MORE_RIGHT);
            let width = u16::try_from(visual_width(&hint)).unwrap_or(GUTTER);
            buf.set_string(area.right() - width, axis_y, hint, Styles::dim());
        }
    }
}

impl AxisWidget<'_> {
    fn draw_event(
        &self,
        placement: &Placement<'_>,
        track: Track,
        area: Rect,
        axis_y: u16,
        compact: bool,
        buf: &mut Buffer,
    ) {
        let event = placement.event;
        let col = track.column(placement.offset);
        let is_selected = self.selected == Some(event.id.as_str());
        let style = Styles::pathway(event.pathway);

        let marker = if is_selected {
            Symbols::SELECTED
        } else {
            Symbols::EVENT
        };
        buf.set_string(col, axis_y, marker, style.add_modifier(Modifier::BOLD));
        if compact {
            return;
        }

        // (connector, label, date) rows
        let (conn_y, label_y, date_y) = match placement.side {
            LabelSide::Above => (axis_y - 1, axis_y - 2, axis_y - 3),
            LabelSide::Below => (axis_y + 1, axis_y + 2, axis_y + 3),
        };
        buf.set_string(col, conn_y, Symbols::CONNECTOR, style);

        let label_style = if is_selected {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style
        };
        let label = truncate_to_width(&event.label, MAX_LABEL_WIDTH);
        put_centered(buf, area, col, label_y, &label, label_style);

        let days = days_until(event.date, self.today);
        let date_style = Styles::countdown(days, is_urgent(days, self.urgent_days));
        let date = format_date_short(event.date, self.locale);
        put_centered(buf, area, col, date_y, &date, date_style);
    }
}

/// Draw `text` centered on `col`, shifted to stay inside `area`.
#[allow(clippy::cast_possible_truncation)]
fn put_centered(
    buf: &mut Buffer,
    area: Rect,
    col: u16,
    y: u16,
    text: &str,
    style: ratatui::style::Style,
) {
    let width = visual_width(text).min(usize::from(area.width)) as u16;
    let start = col
        .saturating_sub(width / 2)
        .max(area.x)
        .min(area.right() - width);
    buf.set_stringn(start, y, text, usize::from(width), style);
}
