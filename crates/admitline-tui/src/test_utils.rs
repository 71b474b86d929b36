//! Test utilities for admitline-tui rendering tests.
//!
//! Helpers for creating test terminals and apps, and for converting buffers
//! to strings that assertions can search.

use crate::app::{App, Screen};
use crate::screens::Screen as ScreenTrait;
use crate::ui::text::visual_width;
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app over the sample timeline.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// Create a test app positioned at a specific screen.
pub fn create_test_app_at_screen(screen: Screen) -> App {
    let mut app = App::new_for_test();
    app.screen = screen;
    app
}

/// Convert a buffer to text, one line per row.
///
/// Cells covered by a wide character are skipped and trailing whitespace is
/// trimmed, so CJK text reads back the way it was written.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        let mut skip = 0usize;
        for x in area.x..area.x + area.width {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = buffer.cell((x, y)).map_or(" ", |cell| cell.symbol());
            result.push_str(symbol);
            skip = visual_width(symbol).saturating_sub(1);
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen at custom dimensions and return it as a string.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal_sized(TEST_WIDTH, TEST_HEIGHT);
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app_at_screen() {
        let app = create_test_app_at_screen(Screen::Schools);
        assert_eq!(app.screen, Screen::Schools);
    }

    #[test]
    fn test_buffer_to_string_skips_wide_char_tails() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "學測 ok", ratatui::style::Style::default());
        buffer.set_string(0, 1, "Hello", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "學測 ok\nHello");
    }
}
