use serde::Serialize;

use crate::lead::{Field, LeadStatus};

/// Structured trace events emitted across all LeadQual crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LeadCreated {
        lead_id: String,
        name: String,
    },
    LeadGreeted {
        lead_id: String,
        is_new: bool,
    },
    StatusChanged {
        lead_id: String,
        from: LeadStatus,
        to: LeadStatus,
    },
    FieldCaptured {
        lead_id: String,
        field: Field,
    },
    FollowUpSent {
        lead_id: String,
        status: LeadStatus,
        idle_secs: i64,
    },
    StoreLoaded {
        leads: usize,
        source: String,
    },
    StoreSaveFailed {
        leads: usize,
        reason: String,
    },
    GenerationFallback {
        backend: String,
        reason: String,
    },
    SessionCompleted {
        lead_id: String,
        exchanges: usize,
        final_status: Option<LeadStatus>,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "lq_event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_change_serializes_with_tag() {
        let ev = TraceEvent::StatusChanged {
            lead_id: "1".into(),
            from: LeadStatus::Initiated,
            to: LeadStatus::WaitingForAge,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "StatusChanged");
        assert_eq!(json["from"], "initiated");
        assert_eq!(json["to"], "waiting_for_age");
    }
}
