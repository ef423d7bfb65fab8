//! Qualification dialogue as pure functions over [`LeadStatus`].
//!
//! Nothing here touches shared state. The engine feeds the current status
//! and the inbound text through [`step`] and applies the result.

use lq_domain::{Field, FieldUpdate, LeadStatus};

/// Words that count as consent, matched case-insensitively anywhere in the
/// reply. There is no negation handling: "yes, but no" is consent.
pub const CONSENT_KEYWORDS: [&str; 3] = ["yes", "okay", "sure"];

pub const FAREWELL: &str = "Alright, no problem. Have a great day!";
pub const AGE_QUESTION: &str = "What is your age?";
pub const COUNTRY_QUESTION: &str = "Which country are you from?";
pub const INTEREST_QUESTION: &str = "What product or service are you interested in?";
pub const CLOSING: &str =
    "Thank you for your responses! We’ve noted your interest and will get back to you soon.";
pub const ACKNOWLEDGMENT: &str = "Thank you! If you have any more questions, feel free to ask.";
pub const FOLLOW_UP: &str =
    "Just checking in to see if you're still interested. Let me know when you're ready to continue.";

/// Opening message sent when a conversation is (re-)initiated.
pub fn greeting(name: &str) -> String {
    format!(
        "Hey {name}, thank you for filling out the form. \
         I'd like to gather some information from you. Is that okay?"
    )
}

/// The question that asks for `field`.
pub fn question(field: Field) -> &'static str {
    match field {
        Field::Age => AGE_QUESTION,
        Field::Country => COUNTRY_QUESTION,
        Field::Interest => INTEREST_QUESTION,
    }
}

pub fn is_consent(message: &str) -> bool {
    let lower = message.to_lowercase();
    CONSENT_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Result of feeding one inbound message to one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: LeadStatus,
    pub update: Option<FieldUpdate>,
    pub reply: &'static str,
}

/// A full dialogue step: the optional `no_response` reset plus the
/// transition evaluated against the (possibly reset) status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub reset: bool,
    pub transition: Transition,
}

/// Any inbound message re-opens a conversation the lead declined.
pub fn reset_if_no_response(status: LeadStatus) -> LeadStatus {
    match status {
        LeadStatus::NoResponse => LeadStatus::Initiated,
        other => other,
    }
}

pub fn transition(status: LeadStatus, message: &str) -> Transition {
    match status {
        LeadStatus::Initiated | LeadStatus::NoResponse => {
            if is_consent(message) {
                Transition {
                    next: LeadStatus::WaitingForAge,
                    update: None,
                    reply: question(Field::Age),
                }
            } else {
                Transition {
                    next: LeadStatus::NoResponse,
                    update: None,
                    reply: FAREWELL,
                }
            }
        }
        LeadStatus::WaitingForAge => Transition {
            next: LeadStatus::WaitingForCountry,
            update: Some(FieldUpdate::Age(message.to_owned())),
            reply: question(Field::Country),
        },
        LeadStatus::WaitingForCountry => Transition {
            next: LeadStatus::WaitingForInterest,
            update: Some(FieldUpdate::Country(message.to_owned())),
            reply: question(Field::Interest),
        },
        LeadStatus::WaitingForInterest => Transition {
            next: LeadStatus::Secured,
            update: Some(FieldUpdate::Interest(message.to_owned())),
            reply: CLOSING,
        },
        LeadStatus::Secured => Transition {
            next: LeadStatus::Secured,
            update: None,
            reply: ACKNOWLEDGMENT,
        },
    }
}

/// `transition(reset_if_no_response(status), message)`, recording whether
/// the reset fired.
pub fn step(status: LeadStatus, message: &str) -> Step {
    let current = reset_if_no_response(status);
    Step {
        reset: current != status,
        transition: transition(current, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [&str; 6] = [
        "Yes, that's fine.",
        "No, not interested right now.",
        "30",
        "",
        "SURE",
        "Actually, maybe I do have a question.",
    ];

    fn allowed(from: LeadStatus) -> &'static [LeadStatus] {
        use LeadStatus::*;
        match from {
            Initiated | NoResponse => &[WaitingForAge, NoResponse],
            WaitingForAge => &[WaitingForCountry],
            WaitingForCountry => &[WaitingForInterest],
            WaitingForInterest => &[Secured],
            Secured => &[Secured],
        }
    }

    #[test]
    fn consent_keywords_are_case_insensitive_substrings() {
        assert!(is_consent("Yes, that's fine."));
        assert!(is_consent("OKAY."));
        assert!(is_consent("Sure, go ahead."));
        assert!(is_consent("yes, but no"));
        assert!(is_consent("I'm unsure"));
        assert!(!is_consent("No, not interested right now."));
        assert!(!is_consent("Not right now."));
    }

    #[test]
    fn every_step_follows_the_table() {
        for from in LeadStatus::ALL {
            for msg in SAMPLES {
                let step = step(from, msg);
                assert!(
                    allowed(from).contains(&step.transition.next),
                    "{from} --{msg:?}--> {}",
                    step.transition.next
                );
            }
        }
    }

    #[test]
    fn fields_are_captured_only_when_leaving_waiting_states() {
        for from in LeadStatus::ALL {
            let t = transition(from, "value");
            assert_eq!(
                t.update.as_ref().map(FieldUpdate::field),
                from.pending_field(),
                "{from}"
            );
        }
    }

    #[test]
    fn answers_are_stored_verbatim() {
        let t = transition(LeadStatus::WaitingForInterest, "  AI Development Kit ");
        assert_eq!(t.update, Some(FieldUpdate::Interest("  AI Development Kit ".into())));
        assert_eq!(t.reply, CLOSING);
    }

    #[test]
    fn secured_is_terminal() {
        for msg in SAMPLES {
            let s = step(LeadStatus::Secured, msg);
            assert!(!s.reset);
            assert_eq!(s.transition.next, LeadStatus::Secured);
            assert_eq!(s.transition.reply, ACKNOWLEDGMENT);
        }
    }

    #[test]
    fn no_response_resets_then_evaluates_same_message() {
        let s = step(LeadStatus::NoResponse, "Okay, let's do it");
        assert!(s.reset);
        assert_eq!(s.transition.next, LeadStatus::WaitingForAge);
        assert_eq!(s.transition.reply, AGE_QUESTION);

        let s = step(LeadStatus::NoResponse, "Actually, maybe I do have a question.");
        assert!(s.reset);
        assert_eq!(s.transition.next, LeadStatus::NoResponse);
        assert_eq!(s.transition.reply, FAREWELL);
    }

    #[test]
    fn reset_only_touches_no_response() {
        for status in LeadStatus::ALL {
            let expected = if status == LeadStatus::NoResponse {
                LeadStatus::Initiated
            } else {
                status
            };
            assert_eq!(reset_if_no_response(status), expected);
        }
    }

    #[test]
    fn closing_uses_typographic_apostrophe() {
        assert_eq!(
            CLOSING,
            "Thank you for your responses! We\u{2019}ve noted your interest and will get back to you soon."
        );
    }

    #[test]
    fn greeting_names_the_lead() {
        let g = greeting("Alice");
        assert!(g.starts_with("Hey Alice, thank you for filling out the form."));
        assert!(g.ends_with("Is that okay?"));
    }
}
