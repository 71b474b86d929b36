//! Reusable widgets for the admitline TUI.

pub mod axis;
pub mod detail;
pub mod schools;
pub mod status_bar;

pub use axis::AxisWidget;
pub use detail::DetailWidget;
pub use schools::SchoolsWidget;
pub use status_bar::{KeyHint, StatusBar};
