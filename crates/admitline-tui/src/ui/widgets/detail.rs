//! Event detail card.

use admitline_engine::{
    days_until, format_date_long, is_urgent, progress, status_label, Event, Locale,
};
use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::ui::text::{localized, wrap_names};
use crate::ui::theme::{progress_bar, Styles, Symbols};

/// Label, pathway, date, countdown, checklist and schools of one event.
#[derive(Debug, Clone)]
pub struct DetailWidget<'a> {
    event: &'a Event,
    today: NaiveDate,
    locale: Locale,
    urgent_days: i64,
    cursor: usize,
}

impl<'a> DetailWidget<'a> {
    pub fn new(event: &'a Event, today: NaiveDate) -> Self {
        Self {
            event,
            today,
            locale: Locale::default(),
            urgent_days: admitline_engine::DEFAULT_URGENT_DAYS,
            cursor: 0,
        }
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

    /// Highlight preparation item `index`.
    #[must_use]
    pub fn cursor(mut self, index: usize) -> Self {
        self.cursor = index;
        self
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let event = self.event;
        let pathway_style = Styles::pathway(event.pathway);
        let days = days_until(event.date, self.today);
        let countdown = status_label(days).text(self.locale);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(event.pathway.label().to_string(), pathway_style),
                Span::styled(format!("  {}", event.pathway.english_name()), Styles::dim()),
            ]),
            Line::from(vec![
                Span::styled(format_date_long(event.date), Styles::default()),
                Span::raw("  "),
                Span::styled(
                    countdown,
                    Styles::countdown(days, is_urgent(days, self.urgent_days)),
                ),
            ]),
            Line::default(),
        ];

        let items = event.prep_items();
        let (done, checkable) = progress(&items);
        let mut heading = vec![Span::styled(
            localized(self.locale, "準備項目", "Preparation"),
            Styles::title(),
        )];
        if checkable > 0 {
            heading.push(Span::styled(
                format!("  {done}/{checkable} {}", progress_bar(done, checkable, 10)),
                Styles::dim(),
            ));
        }
        lines.push(Line::from(heading));

        if items.is_empty() {
            lines.push(Line::styled(
                localized(self.locale, "  （無）", "  (none)"),
                Styles::dim(),
            ));
        }
        for (index, item) in items.iter().enumerate() {
            let cursor = if index == self.cursor {
                Symbols::CURSOR
            } else {
                " "
            };
            let glyph = match (item.checkable, item.done) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, _) => Symbols::BULLET,
            };
            let text_style = if item.done {
                Styles::dim().add_modifier(Modifier::CROSSED_OUT)
            } else if index == self.cursor {
                Styles::highlight()
            } else {
                Styles::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{cursor} {glyph} "), Styles::highlight()),
                Span::styled(item.text.clone(), text_style),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::styled(
            localized(self.locale, "申請學校", "Schools"),
            Styles::title(),
        ));
        let schools = event.unique_schools();
        if schools.is_empty() {
            lines.push(Line::styled(
                localized(self.locale, "  （無）", "  (none)"),
                Styles::dim(),
            ));
        } else {
            let joined = schools.join("  ");
            for row in wrap_names(&joined, width.saturating_sub(2).max(1)) {
                lines.push(Line::styled(format!("  {row}"), Styles::default()));
            }
        }

        lines
    }
}

impl Widget for DetailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.event.label))
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(usize::from(inner.width)))
            .style(Styles::default())
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use admitline_engine::Pathway;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn render(widget: DetailWidget<'_>) -> String {
        let area = Rect::new(0, 0, 50, 16);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_detail_card_contents() {
        let event = Event::with_id("a", Pathway::Application, "報名截止", d(2025, 3, 15))
            .preparation(["[x] 自傳", "[ ] 備審資料", "推薦函"])
            .schools(["台大", "清大", "台大"]);
        let text = render(DetailWidget::new(&event, d(2025, 3, 12)).cursor(1));

        assert!(text.contains(" 報名截止 "));
        assert!(text.contains("申請入學  Application"));
        assert!(text.contains("2025/03/15  3天"));
        assert!(text.contains("1/2"));
        assert!(text.contains("  [x] 自傳"));
        assert!(text.contains("▸ [ ] 備審資料"));
        assert!(text.contains("  • 推薦函"));
        assert!(text.contains("台大  清大"));
        assert!(!text.contains("清大  台大"));
    }

    #[test]
    fn test_detail_card_empty_lists_in_english() {
        let event = Event::with_id("a", Pathway::Distribution, "放榜日", d(2025, 8, 7));
        let text = render(DetailWidget::new(&event, d(2025, 8, 7)).locale(Locale::En));

        assert!(text.contains("2025/08/07  today"));
        assert!(text.contains("Preparation"));
        assert!(text.contains("(none)"));
        assert!(!text.contains("0/0"));
    }
}
