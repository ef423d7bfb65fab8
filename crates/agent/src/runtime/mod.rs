//! Lead conversation runtime.
//!
//! - [`dialogue`]: the pure qualification state machine.
//! - [`engine`]: applies dialogue steps to leads through the registry.
//! - [`followup`]: background sweep that nudges idle leads.
//! - [`session`]: scripted per-lead conversation drivers.

pub mod dialogue;
pub mod engine;
pub mod followup;
pub mod session;
