//! Countdown classification for milestones.

use serde::{Deserialize, Serialize};

/// Default urgency threshold in days.
pub const DEFAULT_URGENT_DAYS: i64 = 7;

/// Display language for rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// Traditional Chinese (the labels stored data is written in).
    #[default]
    ZhTw,
    /// English.
    En,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "zh_tw" | "zh" => Ok(Self::ZhTw),
            "en" => Ok(Self::En),
            other => Err(format!("unknown locale: {other}")),
        }
    }
}

/// Countdown tag for a signed day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum StatusLabel {
    /// The date has passed.
    Expired,
    /// The date is today.
    Today,
    /// The date is tomorrow.
    Tomorrow,
    /// The date is `n` days away (`n >= 2`).
    InDays(i64),
}

/// Classify a day count from [`crate::days_until`].
///
/// Every count of two or more days gets the same generic tag: nearer and
/// farther dates are not worded differently.
pub fn status_label(days: i64) -> StatusLabel {
    match days {
        d if d < 0 => StatusLabel::Expired,
        0 => StatusLabel::Today,
        1 => StatusLabel::Tomorrow,
        n => StatusLabel::InDays(n),
    }
}

/// Whether a milestone `days` away is within the urgency threshold.
///
/// Past milestones are never urgent.
pub fn is_urgent(days: i64, threshold: i64) -> bool {
    (0..=threshold).contains(&days)
}

impl StatusLabel {
    /// Render the tag in the given language.
    pub fn text(self, locale: Locale) -> String {
        match (self, locale) {
            (Self::Expired, Locale::ZhTw) => "已過期".to_string(),
            (Self::Today, Locale::ZhTw) => "今天".to_string(),
            (Self::Tomorrow, Locale::ZhTw) => "明天".to_string(),
            (Self::InDays(n), Locale::ZhTw) => format!("{n}天"),
            (Self::Expired, Locale::En) => "expired".to_string(),
            (Self::Today, Locale::En) => "today".to_string(),
            (Self::Tomorrow, Locale::En) => "tomorrow".to_string(),
            (Self::InDays(n), Locale::En) => format!("in {n} days"),
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text(Locale::En))
    }
}
