//! Lead persistence and the in-memory lead registry.
//!
//! The [`LeadRegistry`] is the single source of truth for lead state during
//! a run. Every mutation goes through [`LeadRegistry::apply`], which holds a
//! per-lead lock for the duration of the read-modify-write and persists the
//! whole table through a [`LeadStore`] before returning.

pub mod registry;
pub mod store;

pub use registry::LeadRegistry;
pub use store::{JsonLeadStore, LeadStore, MemoryLeadStore};
