//! Schools screen.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::{nav_hints, status_text, Screen};
use crate::app::App;
use crate::ui::text::localized;
use crate::ui::{main_layout, KeyHint, SchoolsWidget, StatusBar};

/// Every school mentioned in the timeline, grouped by pathway.
pub struct SchoolsScreen;

impl Screen for SchoolsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (body, status_area) = main_layout(area);
        let locale = app.config.locale;

        let groups = app.document.schools_by_pathway();
        SchoolsWidget::new(&groups)
            .locale(locale)
            .scroll(app.schools_scroll)
            .render(body, buf);

        let mut hints = vec![KeyHint::new("Esc", localized(locale, "返回", "back"))];
        hints.extend(nav_hints(locale).into_iter().skip(2));
        let right = status_text(app);
        StatusBar::new(app.screen.title(locale))
            .hints(hints)
            .right(&right)
            .render(status_area, buf);
    }
}
