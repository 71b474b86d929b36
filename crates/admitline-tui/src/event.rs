//! Event handling for the admitline TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background task.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling blocks, so it gets its own thread
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) => Some(Event::Key(key)),
                            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                } else if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, blocking until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    Back,
    Select,
    /// Step to the previous event.
    Previous,
    /// Step to the next event.
    Next,
    Up,
    Down,
    WeekBack,
    WeekForward,
    MonthBack,
    MonthForward,
    Today,
    Toggle,
    CyclePathway,
    Schools,
    Reload,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('r') => Action::Reload,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => Action::Select,
        KeyCode::Left | KeyCode::Char('h') => Action::Previous,
        KeyCode::Right | KeyCode::Char('l') => Action::Next,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Char('H') => Action::WeekBack,
        KeyCode::Char('L') => Action::WeekForward,
        KeyCode::Char('[') => Action::MonthBack,
        KeyCode::Char(']') => Action::MonthForward,
        KeyCode::Char('t') => Action::Today,
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Char('p') => Action::CyclePathway,
        KeyCode::Char('s') => Action::Schools,
        KeyCode::Char('r') | KeyCode::F(5) => Action::Reload,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::Previous);
        assert_eq!(key_to_action(key(KeyCode::Char('h'))), Action::Previous);
        assert_eq!(key_to_action(key(KeyCode::Right)), Action::Next);
        assert_eq!(key_to_action(key(KeyCode::Char('l'))), Action::Next);
        assert_eq!(key_to_action(key(KeyCode::Char('t'))), Action::Today);
    }

    #[test]
    fn test_shift_keys() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT)),
            Action::WeekBack
        );
        assert_eq!(key_to_action(key(KeyCode::Char(']'))), Action::MonthForward);
    }

    #[test]
    fn test_control_keys() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl('c')), Action::Quit);
        assert_eq!(key_to_action(ctrl('r')), Action::Reload);
        assert_eq!(key_to_action(ctrl('x')), Action::None);
    }
}
