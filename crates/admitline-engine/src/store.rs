//! Timeline persistence.
//!
//! The store is a narrow key-value collaborator: it loads the whole
//! [`TimelineDocument`] and saves it back. [`JsonFileStore`] keeps the
//! document in a single JSON file written atomically; [`MemoryStore`] keeps
//! it in memory for tests and headless use.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::checklist::PrepItem;
use crate::model::{Event, TimelineDocument, Upsert};
use crate::validate::{parse_document, validate_value, ValidationError};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid timeline data: {0}")]
    Validation(#[from] ValidationError),

    #[error("no timeline stored at {0}")]
    NotFound(PathBuf),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("event {id} has no preparation item #{index}")]
    PrepItemNotFound { id: String, index: usize },
}

/// Read/write access to the stored timeline.
pub trait EventStore {
    /// Load the stored document.
    fn load(&self) -> Result<TimelineDocument, StoreError>;

    /// Replace the stored document.
    fn save(&self, document: &TimelineDocument) -> Result<(), StoreError>;

    /// Load only the events.
    fn load_all(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.load()?.timeline)
    }
}

/// A timeline kept in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`. Nothing is read until [`load`].
    ///
    /// [`load`]: EventStore::load
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored document, or the built-in sample when nothing is
    /// stored yet or the stored file cannot be used.
    pub fn load_or_sample(&self) -> TimelineDocument {
        match self.load() {
            Ok(document) => document,
            Err(StoreError::NotFound(path)) => {
                info!(path = %path.display(), "no stored timeline, using built-in sample");
                TimelineDocument::sample()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to load timeline, using built-in sample");
                TimelineDocument::sample()
            }
        }
    }

    /// Write a pretty-printed copy of the stored document to `dest`.
    pub fn export(&self, dest: &Path) -> Result<(), StoreError> {
        let document = self.load()?;
        export_document(&document, dest)
    }
}

impl EventStore for JsonFileStore {
    fn load(&self) -> Result<TimelineDocument, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path)?;
        let document = parse_document(&content)?;
        debug!(path = %self.path.display(), events = document.len(), "loaded timeline");
        Ok(document)
    }

    fn save(&self, document: &TimelineDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        atomic_write(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), events = document.len(), "saved timeline");
        Ok(())
    }
}

/// A timeline held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<TimelineDocument>>,
}

impl MemoryStore {
    /// Create a store holding `document`.
    pub fn new(document: TimelineDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
        }
    }

    /// Create a store with nothing saved yet.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryStore {
    fn load(&self) -> Result<TimelineDocument, StoreError> {
        let guard = self
            .document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .clone()
            .ok_or_else(|| StoreError::NotFound(PathBuf::from(":memory:")))
    }

    fn save(&self, document: &TimelineDocument) -> Result<(), StoreError> {
        let mut guard = self
            .document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(document.clone());
        Ok(())
    }
}

/// Load, edit and save the stored document, stamping it with `today`.
///
/// A store with nothing saved yet starts from an empty document. The edit is
/// discarded if `edit` fails or leaves a document that would not load back.
pub fn modify<S, T, F>(store: &S, today: NaiveDate, edit: F) -> Result<T, StoreError>
where
    S: EventStore + ?Sized,
    F: FnOnce(&mut TimelineDocument) -> Result<T, StoreError>,
{
    let mut document = match store.load() {
        Ok(document) => document,
        Err(StoreError::NotFound(_)) => TimelineDocument::default(),
        Err(e) => return Err(e),
    };
    let outcome = edit(&mut document)?;
    document.touch(today);
    validate_value(&serde_json::to_value(&document)?)?;
    store.save(&document)?;
    Ok(outcome)
}

/// Insert `event`, or replace the stored event with the same id.
pub fn upsert_event<S: EventStore + ?Sized>(
    store: &S,
    event: Event,
    today: NaiveDate,
) -> Result<Upsert, StoreError> {
    let id = event.id.clone();
    let outcome = modify(store, today, |doc| Ok(doc.upsert(event)))?;
    info!(event_id = %id, ?outcome, "stored event");
    Ok(outcome)
}

/// Delete the event with `id`.
pub fn remove_event<S: EventStore + ?Sized>(
    store: &S,
    id: &str,
    today: NaiveDate,
) -> Result<Event, StoreError> {
    let removed = modify(store, today, |doc| {
        doc.remove(id)
            .ok_or_else(|| StoreError::EventNotFound(id.to_string()))
    })?;
    info!(event_id = %id, "removed event");
    Ok(removed)
}

/// Toggle preparation item `index` of event `id`, returning its new state.
pub fn toggle_prep_item<S: EventStore + ?Sized>(
    store: &S,
    id: &str,
    index: usize,
    today: NaiveDate,
) -> Result<PrepItem, StoreError> {
    modify(store, today, |doc| {
        let event = doc
            .find_mut(id)
            .ok_or_else(|| StoreError::EventNotFound(id.to_string()))?;
        event
            .toggle_prep(index)
            .ok_or_else(|| StoreError::PrepItemNotFound {
                id: id.to_string(),
                index,
            })
    })
}

/// Write `document` as pretty-printed JSON to `dest`.
pub fn export_document(document: &TimelineDocument, dest: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document)?;
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    atomic_write(dest, json.as_bytes())?;
    info!(path = %dest.display(), events = document.len(), "exported timeline");
    Ok(())
}

/// Write content atomically using temp file + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let pid = std::process::id();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("timeline");
    let tmp_path = path.with_file_name(format!("{file_name}.{timestamp}.{pid}.tmp"));

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}
