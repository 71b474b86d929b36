//! Text width, truncation and UI wording.

use admitline_engine::{Locale, NavigationEdge};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Get the visual width of a string in terminal cells.
///
/// Accounts for wide characters (CJK) that take 2 cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within a maximum visual width.
///
/// Appends `…` when truncation occurred and never splits a wide character.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target_width = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Pad `s` with spaces on the right to `width` columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visual_width(s));
    format!("{s}{}", " ".repeat(pad))
}

/// Wrap space-separated names to `width` columns.
///
/// Breaks only at ASCII spaces so a CJK name is never split across rows.
pub fn wrap_names(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let options = textwrap::Options::new(width).word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(text, options)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Pick the string for `locale`.
pub fn localized(locale: Locale, zh: &'static str, en: &'static str) -> &'static str {
    match locale {
        Locale::ZhTw => zh,
        Locale::En => en,
    }
}

/// Notice shown when navigation runs past the first or last event.
pub fn edge_notice(edge: NavigationEdge, locale: Locale) -> &'static str {
    match edge {
        NavigationEdge::AtEarliest => localized(locale, "已經是最早的事件", "Already at the earliest event"),
        NavigationEdge::AtLatest => localized(locale, "已經是最新的事件", "Already at the latest event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_width_wide_chars() {
        assert_eq!(visual_width("hello"), 5);
        assert_eq!(visual_width("學測"), 4);
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn test_truncate_does_not_split_wide_chars() {
        let result = truncate_to_width("學科能力測驗", 6);
        assert_eq!(result, "學科…");
        assert!(visual_width(&result) <= 6);
        assert_eq!(truncate_to_width("學測", 0), "");
    }

    #[test]
    fn test_pad_to_width_counts_cells() {
        assert_eq!(pad_to_width("3月1日", 8), "3月1日  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }

    #[test]
    fn test_wrap_names_keeps_names_whole() {
        let rows = wrap_names("國立臺灣大學  國立清華大學", 16);
        assert_eq!(rows, vec!["國立臺灣大學", "國立清華大學"]);
        assert_eq!(wrap_names("台大  清大", 0), vec!["台大  清大"]);
    }

    #[test]
    fn test_edge_notice() {
        assert_eq!(edge_notice(NavigationEdge::AtLatest, Locale::ZhTw), "已經是最新的事件");
        assert_eq!(
            edge_notice(NavigationEdge::AtEarliest, Locale::En),
            "Already at the earliest event"
        );
    }
}
