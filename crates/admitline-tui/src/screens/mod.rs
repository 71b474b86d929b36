//! Screen definitions for the admitline TUI.

pub mod detail;
pub mod schools;
pub mod timeline;

use crate::app::App;
use admitline_engine::Locale;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::ui::text::localized;
use crate::ui::KeyHint;

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Right-hand status bar text: the notice if any, else the window range.
pub fn status_text(app: &App) -> String {
    app.notification.clone().unwrap_or_else(|| {
        format!(
            "{} ~ {}",
            admitline_engine::format_date_long(app.view.window.start()),
            admitline_engine::format_date_long(app.view.window.end())
        )
    })
}

/// Key hints shared by the screens.
pub fn nav_hints(locale: Locale) -> Vec<KeyHint> {
    vec![
        KeyHint::new("←/→", localized(locale, "上/下一個", "prev/next")),
        KeyHint::new("t", localized(locale, "今天", "today")),
        KeyHint::new("?", localized(locale, "說明", "help")),
        KeyHint::new("q", localized(locale, "離開", "quit")),
    ]
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Timeline
    h/l or Left/Right   Previous/next event
    H/L                 Shift window a week
    [ / ]               Previous/next month
    t                   Back to today
    Enter               Event details
    p                   Cycle pathway filter
    s                   Schools
    r or Ctrl+R         Reload

  Details
    j/k or Up/Down      Choose item
    Space               Toggle item
    Esc                 Back

    q                   Quit
    ?                   Toggle this help

  [Press any key to close]
";

    let width = 52.min(area.width.saturating_sub(4));
    let height = 24.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
