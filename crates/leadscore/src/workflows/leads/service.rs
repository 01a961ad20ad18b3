use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{
    FollowUp, FollowUpId, FollowUpSubmission, Interaction, InteractionId, InteractionSubmission,
    Lead, LeadId, LeadSubmission,
};
use super::intake::{IntakeGuard, IntakeViolation};
use super::report::{pipeline_report, PipelineReport};
use super::repository::{
    AlertError, AlertPublisher, HotLeadAlert, LeadRepository, LeadScoreView, RepositoryError,
};
use super::scoring::{
    categorize, ScoreBand, ScoreFactor, ScoringConfig, ScoringEngine, ScoringSettings,
    ThresholdKey,
};

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static INTERACTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static FOLLOW_UP_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

fn next_interaction_id() -> InteractionId {
    let id = INTERACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InteractionId(format!("int-{id:06}"))
}

fn next_follow_up_id() -> FollowUpId {
    let id = FOLLOW_UP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FollowUpId(format!("fup-{id:06}"))
}

/// Service composing the intake guard, repository, alert hook, and the
/// shared scoring configuration.
///
/// The configuration is the only shared mutable state; every scoring
/// pass snapshot-clones it up front so a batch is never half-old,
/// half-new when an edit lands mid-flight.
pub struct LeadScoringService<R, A> {
    guard: IntakeGuard,
    repository: Arc<R>,
    alerts: Arc<A>,
    config: RwLock<ScoringConfig>,
}

impl<R, A> LeadScoringService<R, A>
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>, config: ScoringConfig) -> Self {
        Self {
            guard: IntakeGuard,
            repository,
            alerts,
            config: RwLock::new(config),
        }
    }

    /// Register a new lead, returning the stored record.
    pub fn create_lead(
        &self,
        submission: LeadSubmission,
        now: DateTime<Utc>,
    ) -> Result<Lead, LeadServiceError> {
        let lead = self
            .guard
            .lead_from_submission(next_lead_id(), submission, now)?;
        let stored = self.repository.insert_lead(lead)?;
        Ok(stored)
    }

    /// Log a touchpoint against a lead. Advances the lead's
    /// `last_contacted` when the touch is newer than what is on record.
    pub fn log_interaction(
        &self,
        lead_id: &LeadId,
        submission: InteractionSubmission,
        now: DateTime<Utc>,
    ) -> Result<Interaction, LeadServiceError> {
        let mut lead = self
            .repository
            .fetch_lead(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        let interaction = self.guard.interaction_from_submission(
            next_interaction_id(),
            lead_id.clone(),
            submission,
            now,
        )?;

        let stored = self.repository.insert_interaction(interaction)?;

        if stored.occurred_at > lead.last_contacted {
            lead.last_contacted = stored.occurred_at;
            lead.updated_at = now;
            self.repository.update_lead(lead)?;
        }

        Ok(stored)
    }

    /// Schedule a follow-up reminder, optionally tied to a lead.
    pub fn schedule_follow_up(
        &self,
        lead_id: Option<&LeadId>,
        submission: FollowUpSubmission,
        now: DateTime<Utc>,
    ) -> Result<FollowUp, LeadServiceError> {
        if let Some(lead_id) = lead_id {
            if self.repository.fetch_lead(lead_id)?.is_none() {
                return Err(RepositoryError::NotFound.into());
            }
        }

        let follow_up = self.guard.follow_up_from_submission(
            next_follow_up_id(),
            lead_id.cloned(),
            submission,
            now,
        )?;
        let stored = self.repository.insert_follow_up(follow_up)?;
        Ok(stored)
    }

    /// Evaluate one lead. A manual override takes precedence over the
    /// computed score; an evaluation landing in the High band dispatches
    /// a hot-lead alert.
    pub fn score_lead(
        &self,
        lead_id: &LeadId,
        now: DateTime<Utc>,
    ) -> Result<LeadScoreView, LeadServiceError> {
        let lead = self
            .repository
            .fetch_lead(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        let config = self.config();

        let view = match config.manual_score_for(lead_id) {
            Some(score) => {
                LeadScoreView::manual(&lead, score, categorize(score, &config.thresholds))
            }
            None => {
                let interactions = self.repository.interactions_for(lead_id)?;
                let breakdown = ScoringEngine::new(config).score(&lead, &interactions, now);
                LeadScoreView::computed(&lead, breakdown)
            }
        };

        if view.band == ScoreBand::High {
            let mut details = BTreeMap::new();
            details.insert("band".to_string(), view.band_label.to_string());
            details.insert("stage".to_string(), view.stage.to_string());
            self.alerts.publish(HotLeadAlert {
                template: "hot_lead".to_string(),
                lead_id: lead.id.clone(),
                contact_id: lead.contact_id.clone(),
                score: view.score,
                details,
            })?;
            info!(lead_id = %lead.id.0, score = view.score, "lead crossed into the high band");
        }

        Ok(view)
    }

    /// Score the whole book under a single config snapshot, sorted by
    /// score descending. Batch reads never dispatch alerts.
    pub fn scoreboard(&self, now: DateTime<Utc>) -> Result<Vec<LeadScoreView>, LeadServiceError> {
        let config = self.config();
        let leads = self.repository.leads()?;
        let interactions = self.repository.interactions()?;
        let engine = ScoringEngine::new(config.clone());

        let mut views: Vec<LeadScoreView> = leads
            .iter()
            .map(|lead| match config.manual_score_for(&lead.id) {
                Some(score) => {
                    LeadScoreView::manual(lead, score, categorize(score, &config.thresholds))
                }
                None => LeadScoreView::computed(lead, engine.score(lead, &interactions, now)),
            })
            .collect();

        views.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.lead_id.cmp(&b.lead_id)));
        Ok(views)
    }

    /// Dashboard report over the current book.
    pub fn pipeline_report(&self, now: DateTime<Utc>) -> Result<PipelineReport, LeadServiceError> {
        let config = self.config();
        let leads = self.repository.leads()?;
        let interactions = self.repository.interactions()?;
        let follow_ups = self.repository.follow_ups()?;
        Ok(pipeline_report(
            &leads,
            &interactions,
            &follow_ups,
            &config,
            now,
        ))
    }

    /// Snapshot of the current scoring configuration.
    pub fn config(&self) -> ScoringConfig {
        self.config
            .read()
            .expect("scoring config lock poisoned")
            .clone()
    }

    pub fn set_weight(&self, factor: ScoreFactor, value: u8) -> ScoringConfig {
        self.edit(|config| config.with_weight(factor, value))
    }

    pub fn set_threshold(&self, key: ThresholdKey, value: u8) -> ScoringConfig {
        self.edit(|config| config.with_threshold(key, value))
    }

    pub fn update_settings(&self, settings: ScoringSettings) -> ScoringConfig {
        self.edit(|config| config.with_settings(settings))
    }

    pub fn set_manual_score(&self, lead_id: LeadId, score: u8) -> ScoringConfig {
        self.edit(|config| config.with_manual_score(lead_id, score))
    }

    pub fn clear_manual_score(&self, lead_id: &LeadId) -> ScoringConfig {
        self.edit(|config| config.without_manual_score(lead_id))
    }

    pub fn reset_config(&self) -> ScoringConfig {
        self.edit(|config| config.reset())
    }

    fn edit<F>(&self, apply: F) -> ScoringConfig
    where
        F: FnOnce(&ScoringConfig) -> ScoringConfig,
    {
        let mut guard = self.config.write().expect("scoring config lock poisoned");
        *guard = apply(&guard);
        guard.clone()
    }
}

/// Error raised by the lead scoring service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}
