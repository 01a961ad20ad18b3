use chrono::{DateTime, Utc};

use super::domain::{
    FollowUp, FollowUpId, FollowUpStatus, FollowUpSubmission, Interaction, InteractionId,
    InteractionSubmission, Lead, LeadId, LeadStage, LeadSubmission,
};

/// Validation errors raised at the intake boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("contact id must not be blank")]
    BlankContact,
    #[error("unknown pipeline stage '{0}'")]
    UnknownStage(String),
    #[error("lead value must be a non-negative amount, got {0}")]
    InvalidValue(f64),
    #[error("interaction kind must not be blank")]
    BlankInteractionKind,
    #[error("follow-up description must not be blank")]
    BlankDescription,
}

/// Guard converting raw submissions into sanitized domain records.
///
/// Structurally invalid fields (blank ids, unknown stages, negative or
/// non-finite amounts) are rejected; merely out-of-range numerics such
/// as probability are clamped, matching the calculator's clamp-don't-
/// reject contract.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Validate a lead submission and mint the domain record.
    pub fn lead_from_submission(
        &self,
        id: LeadId,
        submission: LeadSubmission,
        now: DateTime<Utc>,
    ) -> Result<Lead, IntakeViolation> {
        if submission.contact_id.0.trim().is_empty() {
            return Err(IntakeViolation::BlankContact);
        }

        let stage = LeadStage::parse(&submission.stage)
            .ok_or_else(|| IntakeViolation::UnknownStage(submission.stage.clone()))?;

        if !submission.value.is_finite() || submission.value < 0.0 {
            return Err(IntakeViolation::InvalidValue(submission.value));
        }

        Ok(Lead {
            id,
            contact_id: submission.contact_id,
            source: submission.source.trim().to_string(),
            stage,
            value: submission.value.round() as u64,
            probability: submission.probability.clamp(0, 100) as u8,
            last_contacted: submission.last_contacted,
            next_follow_up: submission.next_follow_up,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate an interaction submission against its target lead.
    pub fn interaction_from_submission(
        &self,
        id: InteractionId,
        lead_id: LeadId,
        submission: InteractionSubmission,
        now: DateTime<Utc>,
    ) -> Result<Interaction, IntakeViolation> {
        if submission.contact_id.0.trim().is_empty() {
            return Err(IntakeViolation::BlankContact);
        }

        if submission.kind.trim().is_empty() {
            return Err(IntakeViolation::BlankInteractionKind);
        }

        Ok(Interaction {
            id,
            contact_id: submission.contact_id,
            lead_id,
            kind: submission.kind.trim().to_string(),
            notes: submission.notes,
            occurred_at: submission.occurred_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate a follow-up submission.
    pub fn follow_up_from_submission(
        &self,
        id: FollowUpId,
        lead_id: Option<LeadId>,
        submission: FollowUpSubmission,
        now: DateTime<Utc>,
    ) -> Result<FollowUp, IntakeViolation> {
        if submission.contact_id.0.trim().is_empty() {
            return Err(IntakeViolation::BlankContact);
        }

        if submission.description.trim().is_empty() {
            return Err(IntakeViolation::BlankDescription);
        }

        Ok(FollowUp {
            id,
            contact_id: submission.contact_id,
            lead_id,
            description: submission.description.trim().to_string(),
            due_date: submission.due_date,
            priority: submission.priority,
            status: FollowUpStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}
