//! Preparation checklist items.
//!
//! Stored preparation entries are plain strings. An entry becomes a
//! checkable item when it starts with `[ ] ` (open) or `[x] ` (done). This
//! module is the only place that knows about the markers: everything else
//! goes through [`PrepItem::parse`] and [`PrepItem::format`].

use serde::{Deserialize, Serialize};

const OPEN_MARKER: &str = "[ ] ";
const DONE_MARKER: &str = "[x] ";

/// A single preparation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepItem {
    /// Text without the marker.
    pub text: String,
    /// Whether the entry carries a done/not-done flag.
    pub checkable: bool,
    /// Whether the entry is done. Always false for plain entries.
    pub done: bool,
}

impl PrepItem {
    /// A plain entry with no checkbox.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checkable: false,
            done: false,
        }
    }

    /// A checkable entry.
    pub fn checkbox(text: impl Into<String>, done: bool) -> Self {
        Self {
            text: text.into(),
            checkable: true,
            done,
        }
    }

    /// Parse a stored entry.
    ///
    /// Only the exact markers `[ ] ` and `[x] ` are recognised, so
    /// `PrepItem::parse(s).format() == s` holds for every string.
    pub fn parse(raw: &str) -> Self {
        if let Some(text) = raw.strip_prefix(DONE_MARKER) {
            Self::checkbox(text, true)
        } else if let Some(text) = raw.strip_prefix(OPEN_MARKER) {
            Self::checkbox(text, false)
        } else {
            Self::plain(raw)
        }
    }

    /// Format back to the stored representation.
    pub fn format(&self) -> String {
        match (self.checkable, self.done) {
            (true, true) => format!("{DONE_MARKER}{}", self.text),
            (true, false) => format!("{OPEN_MARKER}{}", self.text),
            (false, _) => self.text.clone(),
        }
    }

    /// Flip the done flag. A plain entry becomes an open checkbox.
    pub fn toggle(&mut self) {
        if self.checkable {
            self.done = !self.done;
        } else {
            self.checkable = true;
            self.done = false;
        }
    }
}

impl std::fmt::Display for PrepItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// Count `(done, checkable)` entries.
pub fn progress<'a>(items: impl IntoIterator<Item = &'a PrepItem>) -> (usize, usize) {
    items.into_iter().fold((0, 0), |(done, total), item| {
        if item.checkable {
            (done + usize::from(item.done), total + 1)
        } else {
            (done, total)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_done() {
        let item = PrepItem::parse("[x] 推薦函");
        assert_eq!(item, PrepItem::checkbox("推薦函", true));
    }

    #[test]
    fn test_parse_open() {
        let item = PrepItem::parse("[ ] 備審資料");
        assert_eq!(item, PrepItem::checkbox("備審資料", false));
    }

    #[test]
    fn test_parse_plain() {
        let item = PrepItem::parse("推薦函");
        assert_eq!(item, PrepItem::plain("推薦函"));
    }

    #[test]
    fn test_format_roundtrip_preserves_stored_text() {
        for raw in [
            "[x] 推薦函",
            "推薦函",
            "[ ] 面試準備",
            "[x] ",
            "[ ]",
            "[X] upper-case marker stays plain",
            "[x]no space",
            " [x] leading space",
            "",
        ] {
            assert_eq!(PrepItem::parse(raw).format(), raw, "roundtrip of {raw:?}");
        }
    }

    #[test]
    fn test_nonmarker_brackets_are_plain() {
        assert!(!PrepItem::parse("[X] 作品集").checkable);
        assert!(!PrepItem::parse("[x]作品集").checkable);
    }

    #[test]
    fn test_toggle() {
        let mut item = PrepItem::plain("口試練習");
        item.toggle();
        assert_eq!(item.format(), "[ ] 口試練習");
        item.toggle();
        assert_eq!(item.format(), "[x] 口試練習");
        item.toggle();
        assert_eq!(item.format(), "[ ] 口試練習");
    }

    #[test]
    fn test_progress() {
        let items = [
            PrepItem::parse("[x] a"),
            PrepItem::parse("[ ] b"),
            PrepItem::parse("c"),
            PrepItem::parse("[x] d"),
        ];
        assert_eq!(progress(&items), (2, 3));
    }
}
