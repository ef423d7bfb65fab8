//! In-memory lead registry with per-lead mutual exclusion.
//!
//! Each lead lives behind its own `Mutex`. The table lock is only held long
//! enough to resolve a lead's handle, so mutations on different leads never
//! wait on each other's read-modify-write. Persistence is serialized through
//! a separate durable view; locks are always taken in the order
//! lead → durable view.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use lq_domain::trace::TraceEvent;
use lq_domain::{HistoryEntry, Lead, LeadRecord};

use crate::store::LeadStore;

/// Shared table of every known lead.
pub struct LeadRegistry {
    leads: RwLock<HashMap<String, Arc<Mutex<Lead>>>>,
    durable: Mutex<HashMap<String, LeadRecord>>,
    store: Arc<dyn LeadStore>,
}

impl LeadRegistry {
    /// An empty registry persisting to `store`. Nothing is loaded.
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            leads: RwLock::new(HashMap::new()),
            durable: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// Build a registry from everything `store` holds.
    ///
    /// An unavailable or malformed store yields an empty registry; the
    /// failure is logged and the run continues.
    pub fn load(store: Arc<dyn LeadStore>) -> Self {
        let registry = Self::new(store.clone());
        let records = match store.load_all() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    store = %store.describe(),
                    "could not load leads, starting with an empty lead table"
                );
                Vec::new()
            }
        };

        {
            let mut leads = registry.leads.write();
            let mut durable = registry.durable.lock();
            for record in records {
                durable.insert(record.id.clone(), record.clone());
                leads.insert(
                    record.id.clone(),
                    Arc::new(Mutex::new(Lead::from_record(record))),
                );
            }
        }

        TraceEvent::StoreLoaded {
            leads: registry.len(),
            source: store.describe(),
        }
        .emit();

        registry
    }

    /// Look up a lead by id. Returns a copy taken under the lead's lock.
    pub fn get(&self, id: &str) -> Option<Lead> {
        let handle = self.handle(id)?;
        let lead = handle.lock();
        Some(lead.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.leads.read().contains_key(id)
    }

    /// Resolve or create the lead for `id`. Returns `(lead, is_new)`.
    ///
    /// A new lead is persisted before this returns.
    pub fn create_if_absent(&self, id: &str, name: &str) -> (Lead, bool) {
        // Fast path: lead already exists.
        if let Some(lead) = self.get(id) {
            return (lead, false);
        }

        // Slow path: insert under the write lock, re-checking for a racer.
        let (handle, is_new) = {
            let mut leads = self.leads.write();
            match leads.get(id) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let handle = Arc::new(Mutex::new(Lead::new(id, name)));
                    leads.insert(id.to_owned(), handle.clone());
                    (handle, true)
                }
            }
        };

        let lead = handle.lock();
        if is_new {
            self.persist(&lead);
            TraceEvent::LeadCreated {
                lead_id: id.to_owned(),
                name: name.to_owned(),
            }
            .emit();
        }
        (lead.clone(), is_new)
    }

    /// Create a lead under a freshly minted id.
    pub fn register(&self, name: &str) -> Lead {
        let id = uuid::Uuid::new_v4().to_string();
        self.create_if_absent(&id, name).0
    }

    /// Atomically read-modify-write one lead.
    ///
    /// The lead's lock is held for the whole call: `last_interaction` is
    /// advanced, `mutation` runs, and the table is persisted before the lock
    /// is released. Returns `None` (and does nothing) for an unknown id.
    pub fn apply<T, F>(&self, id: &str, mutation: F) -> Option<T>
    where
        F: FnOnce(&mut Lead) -> T,
    {
        let handle = self.handle(id)?;
        let mut lead = handle.lock();
        lead.touch(Utc::now());
        let out = mutation(&mut *lead);
        self.persist(&lead);
        Some(out)
    }

    /// Like [`apply`](Self::apply), but only when `guard` accepts the lead
    /// as seen under its lock. A declined lead is neither touched nor
    /// persisted; returns `None` for a declined or unknown lead.
    pub fn apply_if<T, G, F>(&self, id: &str, guard: G, mutation: F) -> Option<T>
    where
        G: FnOnce(&Lead) -> bool,
        F: FnOnce(&mut Lead) -> T,
    {
        let handle = self.handle(id)?;
        let mut lead = handle.lock();
        if !guard(&*lead) {
            return None;
        }
        lead.touch(Utc::now());
        let out = mutation(&mut *lead);
        self.persist(&lead);
        Some(out)
    }

    /// Stable snapshot of every lead id, in display order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.leads.read().keys().cloned().collect();
        ids.sort_by(|a, b| id_order(a, b));
        ids
    }

    /// Copies of every lead, in display order.
    pub fn snapshot(&self) -> Vec<Lead> {
        self.ids().iter().filter_map(|id| self.get(id)).collect()
    }

    pub fn history(&self, id: &str) -> Option<Vec<HistoryEntry>> {
        self.get(id).map(|lead| lead.history().to_vec())
    }

    pub fn len(&self) -> usize {
        self.leads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.read().is_empty()
    }

    fn handle(&self, id: &str) -> Option<Arc<Mutex<Lead>>> {
        self.leads.read().get(id).cloned()
    }

    /// Write `lead` into the durable view and save the whole table.
    ///
    /// Must be called with `lead`'s lock held. A failed save is logged; the
    /// in-memory state stands and the next successful save catches up.
    fn persist(&self, lead: &Lead) {
        let mut durable = self.durable.lock();
        durable.insert(lead.id().to_owned(), lead.to_record());

        let mut records: Vec<LeadRecord> = durable.values().cloned().collect();
        records.sort_by(|a, b| id_order(&a.id, &b.id));

        if let Err(e) = self.store.save_all(&records) {
            tracing::warn!(
                lead_id = %lead.id(),
                error = %e,
                "lead store save failed, keeping in-memory state"
            );
            TraceEvent::StoreSaveFailed {
                leads: records.len(),
                reason: e.to_string(),
            }
            .emit();
        }
    }
}

/// Numeric ids sort numerically, everything else lexically after them.
fn id_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
