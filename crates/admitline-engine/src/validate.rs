//! Validation of timeline documents at the ingestion boundary.
//!
//! Stored documents are checked here before any event reaches the engine, so
//! the layout and navigation code can assume every event has an id, a known
//! pathway, a label and a real calendar date.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::dates::parse_date;
use crate::model::{Event, Pathway, TimelineDocument};

/// Reasons a document is rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("document has no `timeline` array")]
    MissingTimeline,

    #[error("event #{index} is not an object")]
    EventNotAnObject { index: usize },

    #[error("event #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("event #{index} has an invalid date: {value}")]
    InvalidDate { index: usize, value: String },

    #[error("event #{index} has an unknown pathway: {value}")]
    UnknownPathway { index: usize, value: String },

    #[error("event #{index} has a malformed `{field}` list")]
    MalformedList { index: usize, field: &'static str },

    #[error("duplicate event id: {0}")]
    DuplicateId(String),
}

/// Parse and validate a stored document.
pub fn parse_document(json: &str) -> Result<TimelineDocument, ValidationError> {
    let value: Value = serde_json::from_str(json)?;
    validate_value(&value)
}

/// Validate an already-decoded JSON value.
pub fn validate_value(value: &Value) -> Result<TimelineDocument, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
    let entries = object
        .get("timeline")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingTimeline)?;

    let last_update = match object.get("lastUpdate").and_then(Value::as_str) {
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                warn!(value = raw, "ignoring unparseable lastUpdate");
            }
            parsed
        }
        None => None,
    };

    let mut seen = HashSet::new();
    let mut timeline = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let event = validate_event(index, entry)?;
        if !seen.insert(event.id.clone()) {
            return Err(ValidationError::DuplicateId(event.id));
        }
        timeline.push(event);
    }

    Ok(TimelineDocument {
        last_update,
        timeline,
    })
}

/// Validate a single stored event.
pub fn validate_event(index: usize, value: &Value) -> Result<Event, ValidationError> {
    let object = value
        .as_object()
        .ok_or(ValidationError::EventNotAnObject { index })?;

    let id = match object.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        other => required_text(index, "id", other)?,
    };
    let pathway_raw = required_text(index, "pathway", object.get("pathway"))?;
    let label = required_text(index, "item", object.get("item"))?;
    let date_raw = required_text(index, "date", object.get("date"))?;

    let pathway: Pathway = pathway_raw
        .parse()
        .map_err(|_| ValidationError::UnknownPathway {
            index,
            value: pathway_raw.clone(),
        })?;
    let date = parse_date(&date_raw).ok_or(ValidationError::InvalidDate {
        index,
        value: date_raw,
    })?;

    Ok(Event {
        id,
        pathway,
        label,
        date,
        preparation: text_list(index, "preparation", object.get("preparation"))?,
        schools: text_list(index, "schools", object.get("schools"))?,
    })
}

fn required_text(
    index: usize,
    field: &'static str,
    value: Option<&Value>,
) -> Result<String, ValidationError> {
    match value.and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingField { index, field }),
    }
}

/// A list field: an array of strings, or one newline-separated string as the
/// edit form submits it. Blank entries are dropped.
fn text_list(
    index: usize,
    field: &'static str,
    value: Option<&Value>,
) -> Result<Vec<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(split_lines(text)),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(Ok(s.clone())),
                _ => Some(Err(ValidationError::MalformedList { index, field })),
            })
            .collect(),
        Some(_) => Err(ValidationError::MalformedList { index, field }),
    }
}

/// Split newline-separated form input, dropping blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_valid_document() {
        let doc = parse_document(
            r#"{
                "lastUpdate": "2024-01-15",
                "timeline": [
                    {"id": "gsat-1", "pathway": "申請入學", "item": "學測考試", "date": "2025-01-18",
                     "preparation": ["學科能力複習", "[x] 模擬考試"], "schools": ["台大"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.last_update, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(doc.len(), 1);
        let event = &doc.timeline[0];
        assert_eq!(event.pathway, Pathway::Application);
        assert_eq!(event.preparation, vec!["學科能力複習", "[x] 模擬考試"]);
    }

    #[test]
    fn test_sample_document_roundtrips_through_validation() {
        let sample = TimelineDocument::sample();
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(parse_document(&json).unwrap(), sample);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            parse_document("[]"),
            Err(ValidationError::NotAnObject)
        ));
        assert!(matches!(
            parse_document("{not json"),
            Err(ValidationError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_missing_timeline() {
        assert!(matches!(
            validate_value(&json!({"lastUpdate": "2024-01-15"})),
            Err(ValidationError::MissingTimeline)
        ));
        assert!(matches!(
            validate_value(&json!({"timeline": {}})),
            Err(ValidationError::MissingTimeline)
        ));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let base = json!({"id": "a", "pathway": "申請入學", "item": "x", "date": "2025-01-01"});
        for field in ["id", "pathway", "item", "date"] {
            let mut event = base.clone();
            event.as_object_mut().unwrap().remove(field);
            let err = validate_event(3, &event).unwrap_err();
            assert!(
                matches!(err, ValidationError::MissingField { index: 3, field: f } if f == field),
                "expected missing {field}, got {err}"
            );
        }

        let blank = json!({"id": "  ", "pathway": "申請入學", "item": "x", "date": "2025-01-01"});
        assert!(matches!(
            validate_event(0, &blank),
            Err(ValidationError::MissingField { field: "id", .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_date() {
        let event = json!({"id": "a", "pathway": "申請入學", "item": "x", "date": "soon"});
        let err = validate_event(1, &event).unwrap_err();
        assert_eq!(err.to_string(), "event #1 has an invalid date: soon");
    }

    #[test]
    fn test_rejects_unknown_pathway() {
        let event = json!({"id": "a", "pathway": "繁星推薦", "item": "x", "date": "2025-01-01"});
        assert!(matches!(
            validate_event(0, &event),
            Err(ValidationError::UnknownPathway { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let doc = json!({"timeline": [
            {"id": "a", "pathway": "申請入學", "item": "x", "date": "2025-01-01"},
            {"id": "a", "pathway": "申請入學", "item": "y", "date": "2025-02-01"}
        ]});
        assert!(matches!(
            validate_value(&doc),
            Err(ValidationError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let event = json!({"id": 7, "pathway": "申請入學", "item": "x", "date": "2025-01-01"});
        assert_eq!(validate_event(0, &event).unwrap().id, "7");
    }

    #[test]
    fn test_list_fields() {
        let event = json!({
            "id": "a", "pathway": "application", "item": "x", "date": "2025/1/1",
            "preparation": "面試準備\n\n  \n[ ] 作品集",
            "schools": ["台大", "", "清大"]
        });
        let parsed = validate_event(0, &event).unwrap();
        assert_eq!(parsed.preparation, vec!["面試準備", "[ ] 作品集"]);
        assert_eq!(parsed.schools, vec!["台大", "清大"]);

        let bad = json!({
            "id": "a", "pathway": "application", "item": "x", "date": "2025/1/1",
            "schools": [1, 2]
        });
        assert!(matches!(
            validate_event(0, &bad),
            Err(ValidationError::MalformedList { field: "schools", .. })
        ));
    }

    #[test]
    fn test_bad_last_update_is_ignored() {
        let doc = validate_value(&json!({"lastUpdate": "yesterday", "timeline": []})).unwrap();
        assert_eq!(doc.last_update, None);
    }
}
