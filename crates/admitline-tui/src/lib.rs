//! admitline-tui: Terminal timeline viewer for admissions milestones
//!
//! This crate provides the TUI layer for admitline, including:
//! - The timeline screen with its axis and event list
//! - The event detail card with the preparation checklist
//! - The schools overview
//! - Shared widgets (axis, status bar)

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Screen};
pub use event::{Action, Event, EventHandler};

pub use admitline_engine;

use admitline_engine::{Config, EventStore, TimelineDocument};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::Rect,
    Terminal,
};
use std::io::stdout;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop over `document` (already loaded
/// from `store`), and restores the terminal on exit.
pub async fn run_tui(
    config: Config,
    store: Box<dyn EventStore>,
    document: TimelineDocument,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(config.tick_rate_ms);
    let mut app = App::new(config, store, document);
    tracing::info!(events = app.document.len(), "starting timeline viewer");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;
    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            render_app(app, area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        app.handle_action(event::key_to_action(key));
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::Previous),
                        MouseEventKind::ScrollDown => app.handle_action(Action::Next),
                        _ => {}
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Draw the current screen and, if open, the help overlay.
fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    match app.screen {
        Screen::Timeline => screens::timeline::TimelineScreen.render(app, area, buf),
        Screen::Detail => screens::detail::DetailScreen.render(app, area, buf),
        Screen::Schools => screens::schools::SchoolsScreen.render(app, area, buf),
    }

    if app.show_help {
        screens::render_help_overlay(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, create_test_app, create_test_terminal_sized};

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = create_test_terminal_sized(width, height);
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_app(app, area, frame.buffer_mut());
            })
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn test_full_frame_per_screen() {
        let mut app = create_test_app();
        assert!(draw(&app, 80, 24).contains("學測考試"));

        app.handle_action(Action::Next);
        app.handle_action(Action::Select);
        assert!(draw(&app, 80, 24).contains("準備項目"));

        app.handle_action(Action::Back);
        app.handle_action(Action::Schools);
        assert!(draw(&app, 80, 24).contains("申請學校"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = create_test_app();
        app.handle_action(Action::Help);
        let text = draw(&app, 80, 30);
        assert!(text.contains(" Help "));
        assert!(text.contains("Cycle pathway filter"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = create_test_app();
        for (w, h) in [(1, 1), (10, 3), (20, 5), (40, 12)] {
            draw(&app, w, h);
        }
        app.handle_action(Action::Next);
        app.handle_action(Action::Select);
        for (w, h) in [(1, 1), (10, 3), (20, 5)] {
            draw(&app, w, h);
        }
    }
}
