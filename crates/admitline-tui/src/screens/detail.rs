//! Detail screen: the selected event's card over the timeline.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::timeline::TimelineScreen;
use super::{status_text, Screen};
use crate::app::App;
use crate::ui::text::localized;
use crate::ui::{centered_rect, main_layout, DetailWidget, KeyHint, StatusBar};

/// Event card drawn on top of the timeline.
pub struct DetailScreen;

impl Screen for DetailScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        TimelineScreen.render(app, area, buf);

        let (body, status_area) = main_layout(area);
        if let Some(event) = app.selected_event() {
            DetailWidget::new(event, app.today)
                .locale(app.config.locale)
                .urgent_days(app.config.urgent_days)
                .cursor(app.prep_cursor)
                .render(centered_rect(70, 80, body), buf);
        }

        let locale = app.config.locale;
        let right = status_text(app);
        StatusBar::new(app.screen.title(locale))
            .hints(vec![
                KeyHint::new("j/k", localized(locale, "選擇", "choose")),
                KeyHint::new("Space", localized(locale, "勾選", "toggle")),
                KeyHint::new("Esc", localized(locale, "返回", "back")),
            ])
            .right(&right)
            .render(status_area, buf);
    }
}
