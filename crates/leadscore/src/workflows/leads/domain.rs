use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for leads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Identifier wrapper for contacts referenced by leads and interactions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactId(pub String);

/// Identifier wrapper for logged interactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub String);

/// Identifier wrapper for scheduled follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowUpId(pub String);

/// Fixed, ordered sales pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadStage {
    InitialContact,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl LeadStage {
    pub const ALL: [LeadStage; 6] = [
        LeadStage::InitialContact,
        LeadStage::Qualified,
        LeadStage::Proposal,
        LeadStage::Negotiation,
        LeadStage::ClosedWon,
        LeadStage::ClosedLost,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LeadStage::InitialContact => "Initial Contact",
            LeadStage::Qualified => "Qualified",
            LeadStage::Proposal => "Proposal",
            LeadStage::Negotiation => "Negotiation",
            LeadStage::ClosedWon => "Closed Won",
            LeadStage::ClosedLost => "Closed Lost",
        }
    }

    /// Parse a stage from its display label, ignoring case and padding.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(wanted))
    }

    /// Stages still in play; won/lost leads drop out of active reporting.
    pub const fn is_open(self) -> bool {
        !matches!(self, LeadStage::ClosedWon | LeadStage::ClosedLost)
    }
}

/// A sales opportunity tied to a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub contact_id: ContactId,
    pub source: String,
    pub stage: LeadStage,
    /// Estimated deal value in whole dollars.
    pub value: u64,
    /// Win probability percent, 0-100.
    pub probability: u8,
    pub last_contacted: DateTime<Utc>,
    pub next_follow_up: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A logged touchpoint with a contact on behalf of a lead.
///
/// `kind` is deliberately free-form: the canonical set is email, call,
/// meeting, and demo, but unknown kinds are accepted and scored with a
/// default multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub contact_id: ContactId,
    pub lead_id: LeadId,
    pub kind: String,
    pub notes: String,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpPriority {
    Low,
    Medium,
    High,
}

impl FollowUpPriority {
    pub const fn label(self) -> &'static str {
        match self {
            FollowUpPriority::Low => "low",
            FollowUpPriority::Medium => "medium",
            FollowUpPriority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    Pending,
    Completed,
}

impl FollowUpStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FollowUpStatus::Pending => "pending",
            FollowUpStatus::Completed => "completed",
        }
    }
}

/// A scheduled reminder to get back to a contact, optionally tied to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: FollowUpId,
    pub contact_id: ContactId,
    pub lead_id: Option<LeadId>,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: FollowUpPriority,
    pub status: FollowUpStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw lead payload as submitted by a caller, before intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub contact_id: ContactId,
    pub source: String,
    /// Stage display label; validated against [`LeadStage::ALL`].
    pub stage: String,
    pub value: f64,
    pub probability: i32,
    pub last_contacted: DateTime<Utc>,
    #[serde(default)]
    pub next_follow_up: Option<DateTime<Utc>>,
}

/// Raw interaction payload before intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSubmission {
    pub contact_id: ContactId,
    pub kind: String,
    #[serde(default)]
    pub notes: String,
    pub occurred_at: DateTime<Utc>,
}

/// Raw follow-up payload before intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpSubmission {
    pub contact_id: ContactId,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: FollowUpPriority,
}
