use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ContactId, FollowUp, Interaction, Lead, LeadId};
use super::scoring::{ScoreBand, ScoreBreakdown};

/// Storage abstraction so the service module can be exercised in
/// isolation. Computed scores are deliberately absent: scores are
/// advisory display data recomputed on demand, never persisted.
pub trait LeadRepository: Send + Sync {
    fn insert_lead(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    fn update_lead(&self, lead: Lead) -> Result<(), RepositoryError>;
    fn fetch_lead(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    fn leads(&self) -> Result<Vec<Lead>, RepositoryError>;

    fn insert_interaction(&self, interaction: Interaction) -> Result<Interaction, RepositoryError>;
    fn interactions(&self) -> Result<Vec<Interaction>, RepositoryError>;
    fn interactions_for(&self, lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError>;

    fn insert_follow_up(&self, follow_up: FollowUp) -> Result<FollowUp, RepositoryError>;
    fn follow_ups(&self) -> Result<Vec<FollowUp>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound alert hooks (e.g., Slack or e-mail adapters).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: HotLeadAlert) -> Result<(), AlertError>;
}

/// Payload dispatched when an evaluation lands a lead in the High band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotLeadAlert {
    pub template: String,
    pub lead_id: LeadId,
    pub contact_id: ContactId,
    pub score: u8,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Whether a displayed score came from the calculator or a manual pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Computed,
    Manual,
}

/// Sanitized scoring view of a lead for API responses and the scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadScoreView {
    pub lead_id: LeadId,
    pub contact_id: ContactId,
    pub stage: &'static str,
    pub score: u8,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub source: ScoreSource,
    pub value: u64,
    pub probability: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl LeadScoreView {
    pub fn computed(lead: &Lead, breakdown: ScoreBreakdown) -> Self {
        Self {
            lead_id: lead.id.clone(),
            contact_id: lead.contact_id.clone(),
            stage: lead.stage.label(),
            score: breakdown.total,
            band: breakdown.band,
            band_label: breakdown.band.label(),
            source: ScoreSource::Computed,
            value: lead.value,
            probability: lead.probability,
            breakdown: Some(breakdown),
        }
    }

    pub fn manual(lead: &Lead, score: u8, band: ScoreBand) -> Self {
        Self {
            lead_id: lead.id.clone(),
            contact_id: lead.contact_id.clone(),
            stage: lead.stage.label(),
            score,
            band,
            band_label: band.label(),
            source: ScoreSource::Manual,
            value: lead.value,
            probability: lead.probability,
            breakdown: None,
        }
    }
}
