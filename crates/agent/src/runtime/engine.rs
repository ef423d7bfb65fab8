//! Conversation engine: applies dialogue steps to leads.
//!
//! Each inbound message is handled inside a single registry `apply`, so the
//! inbound history line, the field write, the status change and the reply
//! line land atomically and in that order.

use std::sync::Arc;

use lq_domain::trace::TraceEvent;
use lq_domain::{Actor, Field, Lead, LeadStatus};
use lq_leads::LeadRegistry;
use lq_providers::{generate_or_fallback, ResponseGenerator};

use crate::runtime::dialogue::{self, Step};

/// Outcome of (re-)initiating a conversation.
#[derive(Debug, Clone)]
pub struct Greeting {
    pub lead: Lead,
    pub message: String,
    pub is_new: bool,
}

/// What one inbound message did to a lead.
struct Applied {
    from: LeadStatus,
    to: LeadStatus,
    reset: bool,
    captured: Option<Field>,
    reply: &'static str,
}

pub struct ConversationEngine {
    registry: Arc<LeadRegistry>,
    generator: Arc<dyn ResponseGenerator>,
}

impl ConversationEngine {
    pub fn new(registry: Arc<LeadRegistry>, generator: Arc<dyn ResponseGenerator>) -> Self {
        Self {
            registry,
            generator,
        }
    }

    pub fn registry(&self) -> &Arc<LeadRegistry> {
        &self.registry
    }

    /// Ensure the lead exists and send it the greeting.
    ///
    /// An existing lead keeps its name and status; it is simply greeted
    /// again. Returns `None` only if the lead vanished, which this core
    /// never does.
    pub fn initiate(&self, id: &str, name: &str) -> Option<Greeting> {
        let (_, is_new) = self.registry.create_if_absent(id, name);
        self.greet(id, is_new)
    }

    /// Take a form submission that carries no id: mint one, then greet.
    pub fn submit(&self, name: &str) -> Option<Greeting> {
        let lead = self.registry.register(name);
        self.greet(lead.id(), true)
    }

    fn greet(&self, id: &str, is_new: bool) -> Option<Greeting> {
        let (lead, message) = self.registry.apply(id, |lead| {
            let message = dialogue::greeting(lead.name());
            lead.record(Actor::Agent, message.clone());
            (lead.clone(), message)
        })?;

        tracing::info!(lead_id = %id, is_new, "conversation initiated");
        TraceEvent::LeadGreeted {
            lead_id: id.to_owned(),
            is_new,
        }
        .emit();

        Some(Greeting {
            lead,
            message,
            is_new,
        })
    }

    /// Feed one inbound message to the lead's dialogue and return the reply.
    ///
    /// Returns `None` for an unknown lead.
    pub fn handle_inbound(&self, id: &str, text: &str) -> Option<String> {
        let applied = self.registry.apply(id, |lead| {
            lead.record(Actor::Lead, text);

            let from = lead.status();
            let Step { reset, transition } = dialogue::step(from, text);

            let captured = match transition.update {
                Some(update) => {
                    let field = update.field();
                    if lead.record_field(update) {
                        Some(field)
                    } else {
                        tracing::warn!(
                            lead_id = %lead.id(),
                            field = field.as_str(),
                            "field already set, keeping the first answer"
                        );
                        None
                    }
                }
                None => None,
            };

            lead.set_status(transition.next);
            lead.record(Actor::Agent, transition.reply);

            Applied {
                from,
                to: lead.status(),
                reset,
                captured,
                reply: transition.reply,
            }
        })?;

        if applied.reset {
            emit_status_change(id, applied.from, LeadStatus::Initiated);
        }
        let before = if applied.reset {
            LeadStatus::Initiated
        } else {
            applied.from
        };
        if before != applied.to {
            emit_status_change(id, before, applied.to);
        }
        if let Some(field) = applied.captured {
            TraceEvent::FieldCaptured {
                lead_id: id.to_owned(),
                field,
            }
            .emit();
        }

        tracing::debug!(
            lead_id = %id,
            from = %applied.from,
            to = %applied.to,
            "inbound handled"
        );
        Some(applied.reply.to_owned())
    }

    /// Answer an open-ended message through the response generator.
    ///
    /// Records the prompt and the reply in the lead's history without
    /// touching status or fields. The generator is called outside any
    /// registry lock; its failures degrade to the fallback reply.
    pub async fn open_reply(&self, id: &str, prompt: &str) -> Option<String> {
        let name = self.registry.apply(id, |lead| {
            lead.record(Actor::Lead, prompt);
            lead.name().to_owned()
        })?;

        let framed = format!(
            "You are a friendly sales assistant talking to a prospect named {name}. \
             Reply briefly and politely to their message:\n\n{prompt}"
        );
        let reply = generate_or_fallback(self.generator.as_ref(), &framed).await;

        self.registry
            .apply(id, |lead| lead.record(Actor::Agent, reply.clone()))?;
        Some(reply)
    }
}

fn emit_status_change(id: &str, from: LeadStatus, to: LeadStatus) {
    tracing::info!(lead_id = %id, from = %from, to = %to, "lead status changed");
    TraceEvent::StatusChanged {
        lead_id: id.to_owned(),
        from,
        to,
    }
    .emit();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lq_leads::MemoryLeadStore;
    use lq_providers::{ScriptedGenerator, FALLBACK_REPLY};

    fn engine_with(generator: ScriptedGenerator) -> (Arc<MemoryLeadStore>, ConversationEngine) {
        let store = Arc::new(MemoryLeadStore::new());
        let registry = Arc::new(LeadRegistry::new(store.clone()));
        (store, ConversationEngine::new(registry, Arc::new(generator)))
    }

    fn engine() -> (Arc<MemoryLeadStore>, ConversationEngine) {
        engine_with(ScriptedGenerator::failing("unused"))
    }

    #[test]
    fn initiate_creates_persists_and_greets() {
        let (store, engine) = engine();
        let greeting = engine.initiate("1", "Alice").unwrap();
        assert!(greeting.is_new);
        assert_eq!(greeting.message, dialogue::greeting("Alice"));
        assert_eq!(greeting.lead.status(), LeadStatus::Initiated);

        let history = engine.registry().history("1").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].actor, Actor::Agent);
        assert_eq!(store.records()[0].name, "Alice");
    }

    #[test]
    fn reinitiate_greets_again_without_reset() {
        let (_store, engine) = engine();
        engine.initiate("1", "Alice").unwrap();
        engine.handle_inbound("1", "yes").unwrap();

        let again = engine.initiate("1", "Not Alice").unwrap();
        assert!(!again.is_new);
        assert_eq!(again.message, dialogue::greeting("Alice"));
        assert_eq!(again.lead.status(), LeadStatus::WaitingForAge);
    }

    #[test]
    fn submit_mints_distinct_leads() {
        let (store, engine) = engine();
        let first = engine.submit("Zoe").unwrap();
        let second = engine.submit("Zoe").unwrap();

        assert!(first.is_new && second.is_new);
        assert_ne!(first.lead.id(), second.lead.id());
        assert_eq!(first.message, dialogue::greeting("Zoe"));
        assert_eq!(engine.registry().len(), 2);
        assert_eq!(store.records().len(), 2);

        let reply = engine.handle_inbound(first.lead.id(), "okay").unwrap();
        assert_eq!(reply, dialogue::AGE_QUESTION);
    }

    #[test]
    fn unknown_lead_is_absent() {
        let (store, engine) = engine();
        assert!(engine.handle_inbound("nope", "yes").is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn history_orders_inbound_before_reply() {
        let (_store, engine) = engine();
        engine.initiate("1", "Alice").unwrap();
        let reply = engine.handle_inbound("1", "Sure").unwrap();
        assert_eq!(reply, dialogue::AGE_QUESTION);

        let history = engine.registry().history("1").unwrap();
        let tail: Vec<(Actor, &str)> = history[1..]
            .iter()
            .map(|e| (e.actor, e.text.as_str()))
            .collect();
        assert_eq!(
            tail,
            vec![(Actor::Lead, "Sure"), (Actor::Agent, dialogue::AGE_QUESTION)]
        );
    }

    #[test]
    fn secured_lead_only_gets_acknowledged() {
        let (_store, engine) = engine();
        engine.initiate("1", "Alice").unwrap();
        for msg in ["yes", "30", "USA", "Kit"] {
            engine.handle_inbound("1", msg).unwrap();
        }
        let reply = engine.handle_inbound("1", "one more thing").unwrap();
        assert_eq!(reply, dialogue::ACKNOWLEDGMENT);

        let lead = engine.registry().get("1").unwrap();
        assert_eq!(lead.status(), LeadStatus::Secured);
        assert_eq!(lead.field(Field::Interest), Some("Kit"));
    }

    #[tokio::test]
    async fn open_reply_uses_generator_without_changing_status() {
        let (_store, engine) = engine_with(ScriptedGenerator::new(["We ship worldwide."]));
        engine.initiate("1", "Alice").unwrap();

        let reply = engine.open_reply("1", "Do you ship to Peru?").await.unwrap();
        assert_eq!(reply, "We ship worldwide.");

        let lead = engine.registry().get("1").unwrap();
        assert_eq!(lead.status(), LeadStatus::Initiated);
        let last = lead.history().last().unwrap();
        assert_eq!(last.actor, Actor::Agent);
        assert_eq!(last.text, "We ship worldwide.");
    }

    #[tokio::test]
    async fn open_reply_falls_back_on_generator_failure() {
        let (_store, engine) = engine();
        engine.initiate("1", "Alice").unwrap();
        let reply = engine.open_reply("1", "hello?").await.unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn open_reply_unknown_lead_is_absent() {
        let (_store, engine) = engine();
        assert!(engine.open_reply("ghost", "hi").await.is_none());
    }
}
