//! Timeline data model.
//!
//! Events are stored as JSON-shaped records (`id`, `pathway`, `item`, `date`,
//! `preparation`, `schools`) inside a document that also records when it was
//! last updated. Field names on disk are kept as-is so existing data loads.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::checklist::PrepItem;

/// Admission pathway a milestone belongs to.
///
/// Ordered the way the tracks run through the admissions year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pathway {
    /// 特殊選才
    SpecialSelection,
    /// 申請入學
    Application,
    /// 分發入學
    Distribution,
}

impl Pathway {
    /// All pathways in display order.
    pub const ALL: [Self; 3] = [Self::SpecialSelection, Self::Application, Self::Distribution];

    /// Label as written in stored data.
    pub fn label(self) -> &'static str {
        match self {
            Self::SpecialSelection => "特殊選才",
            Self::Application => "申請入學",
            Self::Distribution => "分發入學",
        }
    }

    /// Stable ASCII identifier, also used as the style class.
    pub fn slug(self) -> &'static str {
        match self {
            Self::SpecialSelection => "special-selection",
            Self::Application => "application",
            Self::Distribution => "distribution",
        }
    }

    /// English display name.
    pub fn english_name(self) -> &'static str {
        match self {
            Self::SpecialSelection => "Special selection",
            Self::Application => "Application",
            Self::Distribution => "Distribution",
        }
    }
}

impl std::fmt::Display for Pathway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Pathway {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| {
                trimmed == p.label()
                    || trimmed.eq_ignore_ascii_case(p.slug())
                    || trimmed.eq_ignore_ascii_case(&p.slug().replace('-', "_"))
            })
            .ok_or_else(|| format!("unknown pathway: {trimmed}"))
    }
}

impl Serialize for Pathway {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Pathway {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for calendar dates: writes `YYYY-MM-DD`, reads anything
/// [`crate::parse_date`] accepts.
pub(crate) mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::dates::parse_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}

/// A milestone on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique identifier.
    pub id: String,
    /// Admission pathway.
    pub pathway: Pathway,
    /// Display name of the milestone.
    #[serde(rename = "item")]
    pub label: String,
    /// Calendar day of the milestone.
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    /// Stored preparation entries; see [`PrepItem`].
    #[serde(default)]
    pub preparation: Vec<String>,
    /// Schools this milestone applies to.
    #[serde(default)]
    pub schools: Vec<String>,
}

impl Event {
    /// Create an event with a generated id.
    pub fn new(pathway: Pathway, label: impl Into<String>, date: NaiveDate) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), pathway, label, date)
    }

    /// Create an event with an explicit id.
    pub fn with_id(
        id: impl Into<String>,
        pathway: Pathway,
        label: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            pathway,
            label: label.into(),
            date,
            preparation: Vec::new(),
            schools: Vec::new(),
        }
    }

    /// Set the preparation entries.
    #[must_use]
    pub fn preparation<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preparation = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the schools.
    #[must_use]
    pub fn schools<I, S>(mut self, schools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schools = schools.into_iter().map(Into::into).collect();
        self
    }

    /// Preparation entries decoded into checklist items.
    pub fn prep_items(&self) -> Vec<PrepItem> {
        self.preparation.iter().map(|raw| PrepItem::parse(raw)).collect()
    }

    /// Toggle the preparation entry at `index`, returning its new state.
    pub fn toggle_prep(&mut self, index: usize) -> Option<PrepItem> {
        let raw = self.preparation.get_mut(index)?;
        let mut item = PrepItem::parse(raw);
        item.toggle();
        *raw = item.format();
        Some(item)
    }

    /// Schools with duplicates removed, first occurrence wins.
    pub fn unique_schools(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.schools
            .iter()
            .map(String::as_str)
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// Sort events by date, keeping input order among events on the same day.
pub fn sort_by_date<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<&'a Event> {
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    sorted.sort_by_key(|event| event.date);
    sorted
}

/// Whether an upsert inserted a new event or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// The stored timeline: all events plus the last-modified day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDocument {
    /// Day the document was last edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDate>,
    /// Events in stored order (not necessarily chronological).
    #[serde(default)]
    pub timeline: Vec<Event>,
}

impl TimelineDocument {
    /// Create a document from events.
    pub fn new(timeline: Vec<Event>) -> Self {
        Self {
            last_update: None,
            timeline,
        }
    }

    /// Check if the document has no events.
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Events in chronological order.
    pub fn sorted(&self) -> Vec<&Event> {
        sort_by_date(&self.timeline)
    }

    /// Events of one pathway in chronological order.
    pub fn by_pathway(&self, pathway: Pathway) -> Vec<&Event> {
        sort_by_date(self.timeline.iter().filter(|e| e.pathway == pathway))
    }

    /// Find an event by id.
    pub fn find(&self, id: &str) -> Option<&Event> {
        self.timeline.iter().find(|e| e.id == id)
    }

    /// Find an event by id for editing.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.timeline.iter_mut().find(|e| e.id == id)
    }

    /// Replace the event with the same id, or append it.
    pub fn upsert(&mut self, event: Event) -> Upsert {
        if let Some(existing) = self.find_mut(&event.id) {
            *existing = event;
            Upsert::Updated
        } else {
            self.timeline.push(event);
            Upsert::Inserted
        }
    }

    /// Remove an event by id.
    pub fn remove(&mut self, id: &str) -> Option<Event> {
        let index = self.timeline.iter().position(|e| e.id == id)?;
        Some(self.timeline.remove(index))
    }

    /// Record an edit made on `today`.
    pub fn touch(&mut self, today: NaiveDate) {
        self.last_update = Some(today);
    }

    /// Schools grouped by pathway, deduplicated in first-seen chronological
    /// order. Pathways without schools are omitted.
    pub fn schools_by_pathway(&self) -> BTreeMap<Pathway, Vec<String>> {
        let mut groups: BTreeMap<Pathway, Vec<String>> = BTreeMap::new();
        let mut seen: HashSet<(Pathway, &str)> = HashSet::new();

        for event in self.sorted() {
            for school in &event.schools {
                let name = school.trim();
                if name.is_empty() || !seen.insert((event.pathway, name)) {
                    continue;
                }
                groups.entry(event.pathway).or_default().push(name.to_string());
            }
        }

        groups
    }

    /// Built-in milestones used when no stored timeline exists yet.
    pub fn sample() -> Self {
        const SCHOOLS: [&str; 6] = ["台大", "清大", "交大", "成大", "政大", "中央"];

        let event = |id: &str, pathway: Pathway, label: &str, (y, m, d): (i32, u32, u32), prep: [&str; 3]| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| {
                Event::with_id(id, pathway, label, date)
                    .preparation(prep)
                    .schools(SCHOOLS)
            })
        };

        let timeline = [
            event("special-1", Pathway::SpecialSelection, "報名截止", (2024, 11, 15), ["自傳、學習歷程檔案", "推薦函", "特殊表現證明"]),
            event("special-2", Pathway::SpecialSelection, "面試日", (2024, 12, 1), ["面試準備", "作品集", "口試練習"]),
            event("special-3", Pathway::SpecialSelection, "放榜日", (2024, 12, 15), ["確認錄取", "繳交保證金", "放棄其他管道"]),
            event("gsat-1", Pathway::Application, "學測考試", (2025, 1, 18), ["學科能力複習", "模擬考試", "考試用品準備"]),
            event("application-1", Pathway::Application, "報名截止", (2025, 3, 15), ["自傳、學習歷程", "備審資料", "推薦函"]),
            event("application-2", Pathway::Application, "面試日", (2025, 4, 15), ["面試準備", "作品集", "口試練習"]),
            event("application-3", Pathway::Application, "放榜日", (2025, 5, 15), ["確認錄取", "繳交保證金", "放棄其他管道"]),
            event("subject-1", Pathway::Distribution, "分科測驗", (2025, 7, 12), ["分科能力複習", "模擬考試", "考試用品準備"]),
            event("distribution-1", Pathway::Distribution, "志願選填", (2025, 7, 25), ["填寫志願", "科系研究", "分數落點分析"]),
            event("distribution-2", Pathway::Distribution, "放榜日", (2025, 8, 7), ["確認錄取", "報到準備", "宿舍申請"]),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self {
            last_update: NaiveDate::from_ymd_opt(2024, 1, 15),
            timeline,
        }
    }
}
