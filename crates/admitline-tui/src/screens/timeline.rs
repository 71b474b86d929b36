//! Timeline screen: header, axis and the events inside the window.

use admitline_engine::{
    days_until, format_date_long, format_date_short, is_urgent, sort_by_date, status_label, Event,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::{nav_hints, status_text, Screen};
use crate::app::App;
use crate::ui::text::{localized, pad_to_width, truncate_to_width};
use crate::ui::theme::{Styles, Symbols};
use crate::ui::{main_layout, timeline_layout, AxisWidget, KeyHint, StatusBar};

/// The main timeline view.
pub struct TimelineScreen;

impl Screen for TimelineScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (body, status_area) = main_layout(area);
        let (header_area, axis_area, list_area) = timeline_layout(body);
        let locale = app.config.locale;
        let events = app.visible_events();

        buf.set_line(
            header_area.x,
            header_area.y,
            &header_line(app),
            header_area.width,
        );

        let axis_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());
        let axis_inner = axis_block.inner(axis_area);
        axis_block.render(axis_area, buf);
        AxisWidget::new(&events, app.view.window, app.today)
            .selected(app.selected.as_deref())
            .locale(locale)
            .urgent_days(app.config.urgent_days)
            .render(axis_inner, buf);

        Paragraph::new(event_lines(app, &events, usize::from(list_area.width)))
            .style(Styles::default())
            .render(list_area, buf);

        let mut hints = nav_hints(locale);
        hints.insert(1, KeyHint::new("Enter", localized(locale, "詳細", "details")));
        hints.insert(2, KeyHint::new("p", localized(locale, "管道", "pathway")));
        let right = status_text(app);
        StatusBar::new(app.screen.title(locale))
            .hints(hints)
            .right(&right)
            .render(status_area, buf);
    }
}

fn header_line(app: &App) -> Line<'static> {
    let locale = app.config.locale;
    let mut spans = vec![Span::styled(" admitline ", Styles::title())];

    let filter = app.pathway_filter.map_or_else(
        || localized(locale, "全部管道", "All pathways").to_string(),
        |p| p.label().to_string(),
    );
    let filter_style = app
        .pathway_filter
        .map_or_else(Styles::dim, Styles::pathway);
    spans.push(Span::styled(format!(" [{filter}]"), filter_style));

    if let Some(updated) = app.document.last_update {
        spans.push(Span::styled(
            format!(
                "  {} {}",
                localized(locale, "最後更新", "Updated"),
                format_date_long(updated)
            ),
            Styles::dim(),
        ));
    }
    Line::from(spans)
}

/// One row per event inside the window, in date order.
fn event_lines(app: &App, events: &[Event], width: usize) -> Vec<Line<'static>> {
    let locale = app.config.locale;
    let in_window: Vec<&Event> = sort_by_date(events)
        .into_iter()
        .filter(|e| app.view.window.contains(e.date))
        .collect();

    if in_window.is_empty() {
        return vec![Line::styled(
            localized(locale, "  此區間沒有事件", "  No events in this window"),
            Styles::dim(),
        )];
    }

    in_window
        .into_iter()
        .map(|event| {
            let is_selected = app.selected.as_deref() == Some(event.id.as_str());
            let days = days_until(event.date, app.today);
            let cursor = if is_selected { Symbols::CURSOR } else { " " };
            let label_style = if is_selected {
                Styles::highlight()
            } else {
                Styles::default()
            };
            let label_width = width.saturating_sub(34).max(4);

            Line::from(vec![
                Span::styled(format!(" {cursor} "), Styles::highlight()),
                Span::styled(
                    pad_to_width(&format_date_short(event.date, locale), 9),
                    Styles::default(),
                ),
                Span::styled(
                    pad_to_width(event.pathway.label(), 10),
                    Styles::pathway(event.pathway),
                ),
                Span::styled(
                    pad_to_width(&truncate_to_width(&event.label, label_width), label_width + 1),
                    label_style,
                ),
                Span::styled(
                    status_label(days).text(locale),
                    Styles::countdown(days, is_urgent(days, app.config.urgent_days))
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{create_test_app, render_screen_to_string};
    use admitline_engine::Locale;

    #[test]
    fn test_initial_timeline_render() {
        let app = create_test_app();
        let text = render_screen_to_string(&TimelineScreen, &app);

        assert!(text.contains("admitline"));
        assert!(text.contains("[全部管道]"));
        assert!(text.contains("最後更新 2024/01/15"));
        assert!(text.contains("學測考試"));
        assert!(text.contains("1月18日"));
        assert!(text.contains("今天"));
        assert!(text.contains("2025/01/01 ~ 2025/01/31"));
        // events before and after January
        assert!(text.contains("◀3"));
        assert!(text.contains("6▶"));
    }

    #[test]
    fn test_selected_event_is_marked() {
        let mut app = create_test_app();
        app.handle_action(Action::Next);
        let text = render_screen_to_string(&TimelineScreen, &app);

        assert!(text.contains("◉"));
        assert!(text.contains("▸ 3月15日"));
        assert!(text.contains("56天"));
        assert!(text.contains("2025/02/28 ~ 2025/03/30"));
    }

    #[test]
    fn test_empty_window_in_english() {
        let mut app = create_test_app();
        app.config.locale = Locale::En;
        app.handle_action(Action::WeekForward);
        app.handle_action(Action::MonthForward);
        let text = render_screen_to_string(&TimelineScreen, &app);

        assert!(text.contains("No events in this window"));
        assert!(text.contains("[All pathways]"));
    }

    #[test]
    fn test_notification_replaces_range() {
        let mut app = create_test_app();
        app.handle_action(Action::Previous);
        app.handle_action(Action::Previous);
        app.handle_action(Action::Previous);
        app.handle_action(Action::Previous);
        let text = render_screen_to_string(&TimelineScreen, &app);
        assert!(text.contains("已經是最早的事件"));
    }
}
