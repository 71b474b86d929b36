//! Schools grouped by pathway.

use std::collections::BTreeMap;

use admitline_engine::{Locale, Pathway};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::text::{localized, wrap_names};
use crate::ui::theme::Styles;

/// Every school mentioned in the timeline, one section per pathway.
#[derive(Debug, Clone)]
pub struct SchoolsWidget<'a> {
    groups: &'a BTreeMap<Pathway, Vec<String>>,
    locale: Locale,
    scroll: u16,
}

impl<'a> SchoolsWidget<'a> {
    pub fn new(groups: &'a BTreeMap<Pathway, Vec<String>>) -> Self {
        Self {
            groups,
            locale: Locale::default(),
            scroll: 0,
        }
    }

    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        if self.groups.is_empty() {
            return vec![Line::styled(
                localized(self.locale, "尚無學校資料", "No schools yet"),
                Styles::dim(),
            )];
        }

        let mut lines = Vec::new();
        for (pathway, schools) in self.groups {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::from(vec![
                Span::styled(pathway.label().to_string(), Styles::pathway(*pathway)),
                Span::styled(
                    format!("  {} · {}", pathway.english_name(), schools.len()),
                    Styles::dim(),
                ),
            ]));
            let joined = schools.join("  ");
            for row in wrap_names(&joined, width.saturating_sub(2).max(1)) {
                lines.push(Line::styled(format!("  {row}"), Styles::default()));
            }
        }
        lines
    }
}

impl Widget for SchoolsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(localized(self.locale, " 申請學校 ", " Schools "))
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(usize::from(inner.width)))
            .scroll((self.scroll, 0))
            .style(Styles::default())
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use admitline_engine::TimelineDocument;

    fn render(widget: SchoolsWidget<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_groups_in_pathway_order() {
        let groups = TimelineDocument::sample().schools_by_pathway();
        let text = render(SchoolsWidget::new(&groups), 60, 16);

        let special = text.find("特殊選才").unwrap();
        let application = text.find("申請入學").unwrap();
        let distribution = text.find("分發入學").unwrap();
        assert!(special < application && application < distribution);
        assert!(text.contains("Application · 6"));
        assert!(text.contains("台大  清大  交大  成大  政大  中央"));
    }

    #[test]
    fn test_long_lists_wrap() {
        let mut groups = BTreeMap::new();
        groups.insert(
            Pathway::Application,
            vec!["國立臺灣大學".to_string(), "國立清華大學".to_string()],
        );
        let text = render(SchoolsWidget::new(&groups), 20, 8);
        let rows: Vec<&str> = text.lines().collect();

        assert!(rows[2].contains("國立臺灣大學"));
        assert!(rows[3].contains("國立清華大學"));
    }

    #[test]
    fn test_empty_state() {
        let groups = BTreeMap::new();
        let text = render(SchoolsWidget::new(&groups).locale(Locale::En), 40, 5);
        assert!(text.contains("No schools yet"));
        assert!(text.contains(" Schools "));
    }
}
