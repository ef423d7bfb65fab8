//! Scripted conversation sessions.
//!
//! A session plays one lead's side of a conversation: it initiates the
//! lead, then feeds each scripted reply to the engine after a short random
//! pause. [`run_all`] starts many sessions concurrently with a staggered
//! start, the way form submissions trickle in.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use lq_domain::trace::TraceEvent;
use lq_domain::LeadStatus;

use crate::runtime::engine::ConversationEngine;

/// One lead's side of a conversation.
#[derive(Debug, Clone)]
pub struct SessionScript {
    pub lead_id: String,
    pub name: String,
    pub responses: Vec<String>,
}

impl SessionScript {
    pub fn new<I, S>(lead_id: impl Into<String>, name: impl Into<String>, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lead_id: lead_id.into(),
            name: name.into(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Inclusive range a random pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min: Duration,
    max: Duration,
}

impl ThinkTime {
    /// A range of `min..=max`; bounds are swapped if given inverted.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }

    async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl From<(Duration, Duration)> for ThinkTime {
    fn from((min, max): (Duration, Duration)) -> Self {
        Self::new(min, max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub inbound: String,
    pub outbound: String,
}

/// What a finished session observed.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub lead_id: String,
    pub greeting: String,
    pub exchanges: Vec<Exchange>,
    pub final_status: Option<LeadStatus>,
}

pub struct SessionDriver {
    engine: Arc<ConversationEngine>,
    think_time: ThinkTime,
    echo: bool,
}

impl SessionDriver {
    pub fn new(engine: Arc<ConversationEngine>, think_time: ThinkTime) -> Self {
        Self {
            engine,
            think_time,
            echo: false,
        }
    }

    /// Print the live transcript to stdout as the session runs.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn engine(&self) -> &Arc<ConversationEngine> {
        &self.engine
    }

    /// Play `script` to completion.
    pub async fn run(&self, script: &SessionScript) -> SessionOutcome {
        let lead_id = script.lead_id.as_str();
        let Some(greeting) = self.engine.initiate(lead_id, &script.name) else {
            tracing::warn!(lead_id, "lead could not be resolved, skipping session");
            return SessionOutcome {
                lead_id: lead_id.to_owned(),
                greeting: String::new(),
                exchanges: Vec::new(),
                final_status: None,
            };
        };
        if self.echo {
            let label = if greeting.is_new { "" } else { "existing " };
            println!(
                "(Agent for {label}lead {lead_id} - {}): {}",
                greeting.lead.name(),
                greeting.message
            );
        }

        let mut exchanges = Vec::with_capacity(script.responses.len());
        for response in &script.responses {
            self.think_time.pause().await;

            let Some(reply) = self.engine.handle_inbound(lead_id, response) else {
                tracing::warn!(lead_id, "lead disappeared mid-session");
                break;
            };
            if self.echo {
                println!("(Lead {lead_id}): {response}");
                println!("(Agent for lead {lead_id}): {reply}");
            }

            exchanges.push(Exchange {
                inbound: response.clone(),
                outbound: reply,
            });
        }

        let final_status = self.engine.registry().get(lead_id).map(|l| l.status());
        tracing::info!(
            lead_id,
            exchanges = exchanges.len(),
            final_status = ?final_status,
            "session completed"
        );
        TraceEvent::SessionCompleted {
            lead_id: lead_id.to_owned(),
            exchanges: exchanges.len(),
            final_status,
        }
        .emit();

        SessionOutcome {
            lead_id: lead_id.to_owned(),
            greeting: greeting.message,
            exchanges,
            final_status,
        }
    }
}

/// Start one task per script, `stagger` apart, and wait for all of them.
///
/// Outcomes come back in script order. A session task that panics is
/// logged and left out of the result.
pub async fn run_all(
    driver: Arc<SessionDriver>,
    scripts: Vec<SessionScript>,
    stagger: ThinkTime,
) -> Vec<SessionOutcome> {
    let mut handles = Vec::with_capacity(scripts.len());
    let total = scripts.len();

    for (i, script) in scripts.into_iter().enumerate() {
        let driver = driver.clone();
        let lead_id = script.lead_id.clone();
        handles.push((
            lead_id,
            tokio::spawn(async move { driver.run(&script).await }),
        ));
        if i + 1 < total {
            stagger.pause().await;
        }
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (lead_id, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!(lead_id = %lead_id, error = %e, "session task failed"),
        }
    }
    outcomes
}
