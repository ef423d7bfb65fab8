//! Shared types for LeadQual: the lead data model, the workspace-wide
//! error type, structured trace events, and configuration.

pub mod config;
pub mod error;
pub mod lead;
pub mod trace;

pub use lead::{Actor, Field, FieldUpdate, HistoryEntry, Lead, LeadRecord, LeadStatus};
