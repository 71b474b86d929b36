//! Theme and styling definitions for the admitline TUI.

use admitline_engine::Pathway;
use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(140, 140, 160);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(130, 170, 255);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(45, 45, 60);
    pub const STATUS_KEY_BG: Color = Color::Rgb(70, 90, 140);

    // Status colors
    pub const WARNING: Color = Color::Rgb(240, 200, 100);
    pub const ERROR: Color = Color::Rgb(240, 100, 100);

    // Pathway colors
    pub const SPECIAL_SELECTION: Color = Color::Rgb(230, 140, 200);
    pub const APPLICATION: Color = Color::Rgb(120, 190, 250);
    pub const DISTRIBUTION: Color = Color::Rgb(150, 220, 160);

    // Border colors
    pub const BORDER: Color = Color::Rgb(80, 80, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(130, 170, 255);
}

/// Glyphs used on the axis and in lists.
pub struct Symbols;

impl Symbols {
    pub const AXIS: &'static str = "─";
    pub const TICK: &'static str = "┼";
    pub const TODAY: &'static str = "▲";
    pub const EVENT: &'static str = "●";
    pub const SELECTED: &'static str = "◉";
    pub const CONNECTOR: &'static str = "│";
    pub const MORE_LEFT: &'static str = "◀";
    pub const MORE_RIGHT: &'static str = "▶";
    pub const CURSOR: &'static str = "▸";
    pub const BULLET: &'static str = "•";
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Warning status.
    pub fn warning() -> Style {
        Style::default().fg(Palette::WARNING).bg(Palette::BG)
    }

    /// Error status.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }

    /// Foreground for events of `pathway`.
    pub fn pathway(pathway: Pathway) -> Style {
        let color = match pathway {
            Pathway::SpecialSelection => Palette::SPECIAL_SELECTION,
            Pathway::Application => Palette::APPLICATION,
            Pathway::Distribution => Palette::DISTRIBUTION,
        };
        Style::default().fg(color).bg(Palette::BG)
    }

    /// Countdown text: expired dimmed, urgent in warning color.
    pub fn countdown(days: i64, urgent: bool) -> Style {
        if days < 0 {
            Self::dim()
        } else if urgent {
            Self::warning().add_modifier(Modifier::BOLD)
        } else {
            Self::default()
        }
    }
}

/// Progress bar rendering.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let progress = if total == 0 {
        0.0
    } else {
        done as f32 / total as f32
    };
    let filled = ((progress * width as f32).round() as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4, 4), "[    ]");
        assert_eq!(progress_bar(2, 4, 4), "[==  ]");
        assert_eq!(progress_bar(4, 4, 4), "[====]");
        assert_eq!(progress_bar(0, 0, 4), "[    ]");
    }

    #[test]
    fn test_pathway_colors_are_distinct() {
        let colors: Vec<_> = Pathway::ALL
            .iter()
            .map(|p| Styles::pathway(*p).fg)
            .collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_countdown_style() {
        assert_eq!(Styles::countdown(-1, false), Styles::dim());
        assert_eq!(Styles::countdown(3, true).fg, Some(Palette::WARNING));
        assert_eq!(Styles::countdown(30, false), Styles::default());
    }
}
