//! Follow-up scheduler: nudges leads that went quiet mid-qualification.
//!
//! Every poll interval the scheduler sweeps the registry. A lead is nudged
//! when its status is still open (not secured, not declined) and it has been
//! idle for longer than the threshold. Sending the nudge counts as an
//! interaction, so a lead is nudged at most once per idle period.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use lq_domain::config::FollowUpConfig;
use lq_domain::trace::TraceEvent;
use lq_domain::{Actor, LeadStatus};
use lq_leads::LeadRegistry;

use crate::runtime::dialogue;

/// One nudge sent during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub lead_id: String,
    pub status: LeadStatus,
    pub idle: chrono::Duration,
}

pub struct FollowUpScheduler {
    registry: Arc<LeadRegistry>,
    poll_interval: Duration,
    idle_threshold: chrono::Duration,
}

impl FollowUpScheduler {
    pub fn new(registry: Arc<LeadRegistry>, config: &FollowUpConfig) -> Self {
        // chrono caps durations at i64::MAX milliseconds.
        let secs = i64::try_from(config.idle_threshold_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1_000);
        Self::with_timing(
            registry,
            config.poll_interval(),
            chrono::Duration::seconds(secs),
        )
    }

    pub fn with_timing(
        registry: Arc<LeadRegistry>,
        poll_interval: Duration,
        idle_threshold: chrono::Duration,
    ) -> Self {
        Self {
            registry,
            poll_interval,
            idle_threshold,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run one sweep as of `now` and return the nudges sent.
    ///
    /// Eligibility is re-checked under each lead's lock, so a lead that
    /// answered between the id snapshot and the nudge is left alone.
    pub fn tick(&self, now: DateTime<Utc>) -> Vec<FollowUp> {
        let threshold = self.idle_threshold;
        let mut sent = Vec::new();

        for id in self.registry.ids() {
            let nudged = self.registry.apply_if(
                &id,
                |lead| lead.status().is_follow_up_eligible() && lead.idle_for(now) > threshold,
                |lead| {
                    let idle = lead.idle_for(now);
                    lead.record(Actor::Agent, dialogue::FOLLOW_UP);
                    FollowUp {
                        lead_id: lead.id().to_owned(),
                        status: lead.status(),
                        idle,
                    }
                },
            );

            if let Some(follow_up) = nudged {
                tracing::info!(
                    lead_id = %follow_up.lead_id,
                    status = %follow_up.status,
                    idle_secs = follow_up.idle.num_seconds(),
                    "follow-up sent"
                );
                TraceEvent::FollowUpSent {
                    lead_id: follow_up.lead_id.clone(),
                    status: follow_up.status,
                    idle_secs: follow_up.idle.num_seconds(),
                }
                .emit();
                sent.push(follow_up);
            }
        }

        sent
    }

    /// Sweep every poll interval until `shutdown` fires.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be idle yet.
        interval.tick().await;

        tracing::info!(
            poll_secs = self.poll_interval.as_secs_f64(),
            idle_threshold_secs = self.idle_threshold.num_seconds(),
            "follow-up scheduler started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let sent = self.tick(Utc::now());
                    if !sent.is_empty() {
                        tracing::debug!(count = sent.len(), "follow-up sweep finished");
                    }
                }
            }
        }

        tracing::info!("follow-up scheduler stopped");
    }

    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
