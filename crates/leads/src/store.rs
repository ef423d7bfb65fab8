//! Durable lead storage.
//!
//! Stores persist the flat [`LeadRecord`] shape only; conversation history
//! lives in memory for the lifetime of the process. Both operations work on
//! the whole table at once.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use lq_domain::error::{Error, Result};
use lq_domain::LeadRecord;

/// Whole-table lead persistence.
pub trait LeadStore: Send + Sync {
    /// Load every persisted lead. A missing store is an empty table, not an
    /// error; a malformed one is [`Error::MalformedStore`].
    fn load_all(&self) -> Result<Vec<LeadRecord>>;

    /// Replace the persisted table with `records`.
    fn save_all(&self, records: &[LeadRecord]) -> Result<()>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JSON file store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lead store backed by `leads.json` under the state directory.
pub struct JsonLeadStore {
    path: PathBuf,
}

impl JsonLeadStore {
    /// Open (or prepare to create) `state_path/leads.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {e}", state_path.display())))?;
        Ok(Self {
            path: state_path.join("leads.json"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeadStore for JsonLeadStore {
    fn load_all(&self) -> Result<Vec<LeadRecord>> {
        if !self.path.exists() {
            tracing::info!(
                path = %self.path.display(),
                "lead store not found, will be created on first save"
            );
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {e}", self.path.display())))?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| Error::MalformedStore(format!("{}: {e}", self.path.display())))?;
        decode_records(value)
    }

    fn save_all(&self, records: &[LeadRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(leads = records.len(), path = %self.path.display(), "lead store saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Validate and decode a persisted lead table.
///
/// The document must be an array of objects, each carrying every key in
/// [`LeadRecord::FIELDS`]. Any violation rejects the whole table.
pub fn decode_records(value: Value) -> Result<Vec<LeadRecord>> {
    let Value::Array(items) = value else {
        return Err(Error::MalformedStore("expected an array of lead records".into()));
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let Some(obj) = item.as_object() else {
            return Err(Error::MalformedStore(format!("record {i} is not an object")));
        };
        if let Some(missing) = LeadRecord::FIELDS.iter().find(|k| !obj.contains_key(**k)) {
            return Err(Error::MalformedStore(format!(
                "record {i} is missing the '{missing}' field"
            )));
        }
        let record: LeadRecord = serde_json::from_value(item)
            .map_err(|e| Error::MalformedStore(format!("record {i}: {e}")))?;
        records.push(record);
    }
    Ok(records)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// In-memory store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Volatile store for tests and dry runs. Counts saves and can be told
/// to fail.
#[derive(Default)]
pub struct MemoryLeadStore {
    records: Mutex<Vec<LeadRecord>>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<LeadRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every subsequent load and save fail with `StoreUnavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `save_all` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The table as last saved.
    pub fn records(&self) -> Vec<LeadRecord> {
        self.records.lock().clone()
    }
}

impl LeadStore for MemoryLeadStore {
    fn load_all(&self) -> Result<Vec<LeadRecord>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("memory store offline".into()));
        }
        Ok(self.records.lock().clone())
    }

    fn save_all(&self, records: &[LeadRecord]) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("memory store offline".into()));
        }
        *self.records.lock() = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
