//! Lead data model.
//!
//! A [`Lead`] is one prospect moving through the scripted qualification
//! dialogue. Its qualification fields are write-once and its status can
//! never leave [`LeadStatus::Secured`]; both rules are enforced here so
//! every caller gets them for free.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Status
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where in the dialogue a lead currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Initiated,
    WaitingForAge,
    WaitingForCountry,
    WaitingForInterest,
    Secured,
    NoResponse,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::Initiated,
        LeadStatus::WaitingForAge,
        LeadStatus::WaitingForCountry,
        LeadStatus::WaitingForInterest,
        LeadStatus::Secured,
        LeadStatus::NoResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::WaitingForAge => "waiting_for_age",
            Self::WaitingForCountry => "waiting_for_country",
            Self::WaitingForInterest => "waiting_for_interest",
            Self::Secured => "secured",
            Self::NoResponse => "no_response",
        }
    }

    /// `secured` is the only terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Secured)
    }

    /// Whether an idle lead in this state should be nudged.
    pub fn is_follow_up_eligible(&self) -> bool {
        !matches!(self, Self::Secured | Self::NoResponse)
    }

    /// The qualification field this state is waiting to collect.
    pub fn pending_field(&self) -> Option<Field> {
        match self {
            Self::WaitingForAge => Some(Field::Age),
            Self::WaitingForCountry => Some(Field::Country),
            Self::WaitingForInterest => Some(Field::Interest),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::MalformedStore(format!("unknown lead status {s:?}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Qualification fields
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One of the three qualification fields, collected in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Country,
    Interest,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Country => "country",
            Self::Interest => "interest",
        }
    }
}

/// A tagged write to exactly one qualification field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Age(String),
    Country(String),
    Interest(String),
}

impl FieldUpdate {
    /// Build the update that fills `field` with `value`.
    pub fn for_field(field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            Field::Age => Self::Age(value),
            Field::Country => Self::Country(value),
            Field::Interest => Self::Interest(value),
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Self::Age(_) => Field::Age,
            Self::Country(_) => Field::Country,
            Self::Interest(_) => Field::Interest,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Age(v) | Self::Country(v) | Self::Interest(v) => v,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// History
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Who said a history line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Lead,
    Agent,
}

/// A single timestamped line of a lead's conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    pub actor: Actor,
    pub text: String,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.actor {
            Actor::Lead => "lead",
            Actor::Agent => "agent",
        };
        write!(
            f,
            "[{}] {who}: {}",
            self.at.format("%Y-%m-%d %H:%M:%S"),
            self.text
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lead
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A prospect being qualified.
#[derive(Debug, Clone)]
pub struct Lead {
    id: String,
    name: String,
    age: Option<String>,
    country: Option<String>,
    interest: Option<String>,
    status: LeadStatus,
    last_interaction: DateTime<Utc>,
    history: Vec<HistoryEntry>,
}

impl Lead {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age: None,
            country: None,
            interest: None,
            status: LeadStatus::Initiated,
            last_interaction: Utc::now(),
            history: Vec::new(),
        }
    }

    /// Rebuild a lead from its persisted record. History starts empty.
    pub fn from_record(record: LeadRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            age: non_empty(record.age),
            country: non_empty(record.country),
            interest: non_empty(record.interest),
            status: record.status,
            last_interaction: Utc::now(),
            history: Vec::new(),
        }
    }

    pub fn to_record(&self) -> LeadRecord {
        LeadRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            age: self.age.clone(),
            country: self.country.clone(),
            interest: self.interest.clone(),
            status: self.status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> LeadStatus {
        self.status
    }

    pub fn last_interaction(&self) -> DateTime<Utc> {
        self.last_interaction
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Age => self.age.as_deref(),
            Field::Country => self.country.as_deref(),
            Field::Interest => self.interest.as_deref(),
        }
    }

    /// Advance `last_interaction`. The new value is strictly greater than
    /// the previous one even when the wall clock has not moved.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.last_interaction + Duration::microseconds(1);
        self.last_interaction = now.max(floor);
    }

    /// Move to `next`. A secured lead stays secured; returns whether the
    /// status was written.
    pub fn set_status(&mut self, next: LeadStatus) -> bool {
        if self.status.is_terminal() && next != self.status {
            return false;
        }
        self.status = next;
        true
    }

    /// Write a qualification field. Each field accepts exactly one write;
    /// later writes are refused and return `false`.
    pub fn record_field(&mut self, update: FieldUpdate) -> bool {
        let slot = match &update {
            FieldUpdate::Age(_) => &mut self.age,
            FieldUpdate::Country(_) => &mut self.country,
            FieldUpdate::Interest(_) => &mut self.interest,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(match update {
            FieldUpdate::Age(v) | FieldUpdate::Country(v) | FieldUpdate::Interest(v) => v,
        });
        true
    }

    /// Append a history line stamped with the current `last_interaction`.
    pub fn record(&mut self, actor: Actor, text: impl Into<String>) {
        self.history.push(HistoryEntry {
            at: self.last_interaction,
            actor,
            text: text.into(),
        });
    }

    /// Time elapsed since the last interaction, as seen at `now`.
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_interaction)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Persisted record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Flat persisted shape of a lead. Conversation history is not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub name: String,
    pub age: Option<String>,
    pub country: Option<String>,
    pub interest: Option<String>,
    pub status: LeadStatus,
}

impl LeadRecord {
    /// Keys every persisted record must carry, in order.
    pub const FIELDS: [&'static str; 6] = ["id", "name", "age", "country", "interest", "status"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn follow_up_eligibility() {
        assert!(LeadStatus::Initiated.is_follow_up_eligible());
        assert!(LeadStatus::WaitingForCountry.is_follow_up_eligible());
        assert!(!LeadStatus::Secured.is_follow_up_eligible());
        assert!(!LeadStatus::NoResponse.is_follow_up_eligible());
    }

    #[test]
    fn fields_are_write_once() {
        let mut lead = Lead::new("1", "Alice");
        assert!(lead.record_field(FieldUpdate::Age("30".into())));
        assert!(!lead.record_field(FieldUpdate::Age("31".into())));
        assert_eq!(lead.field(Field::Age), Some("30"));
        assert_eq!(lead.field(Field::Country), None);
    }

    #[test]
    fn secured_is_terminal() {
        let mut lead = Lead::new("1", "Alice");
        assert!(lead.set_status(LeadStatus::Secured));
        assert!(!lead.set_status(LeadStatus::Initiated));
        assert_eq!(lead.status(), LeadStatus::Secured);
        assert!(lead.set_status(LeadStatus::Secured));
    }

    #[test]
    fn touch_strictly_increases() {
        let mut lead = Lead::new("1", "Alice");
        let before = lead.last_interaction();
        lead.touch(before);
        assert!(lead.last_interaction() > before);

        let earlier = before - Duration::seconds(10);
        let prev = lead.last_interaction();
        lead.touch(earlier);
        assert!(lead.last_interaction() > prev);
    }

    #[test]
    fn record_from_empty_strings_loads_as_none() {
        let lead = Lead::from_record(LeadRecord {
            id: "7".into(),
            name: "Gus".into(),
            age: Some(String::new()),
            country: Some("UK".into()),
            interest: None,
            status: LeadStatus::WaitingForInterest,
        });
        assert_eq!(lead.field(Field::Age), None);
        assert_eq!(lead.field(Field::Country), Some("UK"));
        assert!(lead.history().is_empty());
        assert_eq!(lead.to_record().age, None);
    }

    #[test]
    fn field_update_for_field_matches_tag() {
        let update = FieldUpdate::for_field(Field::Interest, "Cloud");
        assert_eq!(update.field(), Field::Interest);
        assert_eq!(update.value(), "Cloud");
    }
}
