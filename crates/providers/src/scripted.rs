//! A canned-reply generator for dry runs and tests.

use std::collections::VecDeque;

use parking_lot::Mutex;

use lq_domain::error::{Error, Result};

use crate::traits::ResponseGenerator;

/// Returns queued replies in order. Once the queue is empty (or when built
/// with [`ScriptedGenerator::failing`]) every call fails.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    failure: String,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            failure: "script exhausted".into(),
        }
    }

    /// A generator that always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            failure: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl ResponseGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| Error::Generation {
                backend: "scripted".into(),
                message: self.failure.clone(),
            })
    }

    fn backend_id(&self) -> &str {
        "scripted"
    }
}
