//! Placement of events on the axis.
//!
//! Turns a set of events and a [`VisibleWindow`] into axis offsets that a
//! renderer can draw directly. Labels alternate above and below the axis in
//! date order so that neighbouring milestones do not overlap.

use serde::Serialize;

use crate::model::{sort_by_date, Event};
use crate::window::{is_on_axis, VisibleWindow};

/// Which side of the axis a label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSide {
    Above,
    Below,
}

/// One event positioned on the axis.
#[derive(Debug, Clone, Serialize)]
pub struct Placement<'a> {
    pub event: &'a Event,
    /// Offset from the left edge of the axis; may lie outside the axis.
    pub offset: f64,
    /// Whether `offset` is within `[0, axis_width]`.
    pub on_axis: bool,
    pub side: LabelSide,
}

/// Position every event against `window`, in date order.
///
/// Off-axis events are included (with `on_axis == false`) so callers can show
/// "more to the left/right" hints. Label sides alternate over on-axis events
/// only. Returns an empty list for a degenerate window.
pub fn place_events<'a>(
    events: &'a [Event],
    window: &VisibleWindow,
    axis_width: f64,
) -> Vec<Placement<'a>> {
    let mut visible_index = 0usize;
    sort_by_date(events)
        .into_iter()
        .filter_map(|event| {
            let offset = window.position(event.date, axis_width)?;
            let on_axis = is_on_axis(offset, axis_width);
            let side = if on_axis && visible_index % 2 == 1 {
                LabelSide::Below
            } else {
                LabelSide::Above
            };
            if on_axis {
                visible_index += 1;
            }
            Some(Placement {
                event,
                offset,
                on_axis,
                side,
            })
        })
        .collect()
}

/// Number of events before and after the window.
pub fn off_axis_counts(placements: &[Placement<'_>]) -> (usize, usize) {
    placements
        .iter()
        .filter(|p| !p.on_axis)
        .fold((0, 0), |(before, after), p| {
            if p.offset < 0.0 {
                (before + 1, after)
            } else {
                (before, after + 1)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pathway;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ev(id: &str, date: NaiveDate) -> Event {
        Event::with_id(id, Pathway::Application, id, date)
    }

    #[test]
    fn test_place_events_in_date_order() {
        let events = vec![
            ev("c", d(2025, 3, 21)),
            ev("a", d(2025, 3, 1)),
            ev("b", d(2025, 3, 11)),
        ];
        let window = VisibleWindow::new(d(2025, 3, 1), d(2025, 3, 21)).unwrap();
        let placed = place_events(&events, &window, 100.0);

        let ids: Vec<&str> = placed.iter().map(|p| p.event.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(placed[0].offset, 0.0);
        assert_eq!(placed[1].offset, 50.0);
        assert_eq!(placed[2].offset, 100.0);
        assert!(placed.iter().all(|p| p.on_axis));
    }

    #[test]
    fn test_label_sides_alternate_over_visible_events() {
        let events = vec![
            ev("before", d(2025, 2, 1)),
            ev("a", d(2025, 3, 2)),
            ev("b", d(2025, 3, 5)),
            ev("c", d(2025, 3, 9)),
        ];
        let window = VisibleWindow::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        let sides: Vec<LabelSide> = place_events(&events, &window, 300.0)
            .iter()
            .filter(|p| p.on_axis)
            .map(|p| p.side)
            .collect();
        assert_eq!(sides, vec![LabelSide::Above, LabelSide::Below, LabelSide::Above]);
    }

    #[test]
    fn test_off_axis_counts() {
        let events = vec![
            ev("old", d(2024, 12, 1)),
            ev("in", d(2025, 3, 10)),
            ev("new-1", d(2025, 5, 1)),
            ev("new-2", d(2025, 6, 1)),
        ];
        let window = VisibleWindow::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        let placed = place_events(&events, &window, 60.0);
        assert_eq!(off_axis_counts(&placed), (1, 2));
    }

    #[test]
    fn test_degenerate_window_places_nothing() {
        let events = vec![ev("a", d(2025, 3, 1))];
        let window = VisibleWindow::new(d(2025, 3, 1), d(2025, 3, 1)).unwrap();
        assert!(place_events(&events, &window, 60.0).is_empty());
    }
}
