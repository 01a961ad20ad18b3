//! Lead scoring: a pure mapping from a lead's interaction history and a
//! tunable configuration to a 0-100 suitability score.

mod config;
mod editor;
mod rules;

pub use config::{
    FactorWeights, ScoreFactor, ScoringConfig, ScoringConfigError, ScoringSettings, ThresholdKey,
    Thresholds,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Interaction, Lead, LeadId};

/// Score category derived from the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Low => "Low",
            ScoreBand::Medium => "Medium",
            ScoreBand::High => "High",
        }
    }
}

/// Map a score onto its band: at or above `medium` is High, at or above
/// `low` is Medium, anything below is Low.
pub fn categorize(score: u8, thresholds: &Thresholds) -> ScoreBand {
    if score >= thresholds.medium {
        ScoreBand::High
    } else if score >= thresholds.low {
        ScoreBand::Medium
    } else {
        ScoreBand::Low
    }
}

/// Per-factor breakdown of one computed score, for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub lead_id: LeadId,
    pub frequency: f64,
    pub engagement: f64,
    pub recency: f64,
    pub total: u8,
    pub band: ScoreBand,
}

/// Stateless calculator applying a [`ScoringConfig`] to leads.
///
/// Deterministic given its inputs and the supplied `now`; callers inject
/// the reference time instead of the engine reading the wall clock.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compute the composite score for one lead.
    ///
    /// `interactions` may span the whole book; only records whose
    /// `lead_id` matches are considered. Out-of-range inputs are clamped,
    /// never rejected, so every call returns a score in [0, 100].
    pub fn score(
        &self,
        lead: &Lead,
        interactions: &[Interaction],
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        let own: Vec<&Interaction> = interactions
            .iter()
            .filter(|interaction| interaction.lead_id == lead.id)
            .collect();

        let settings = &self.config.settings;
        let frequency = rules::frequency_score(&own, settings, now);
        let engagement = rules::engagement_score(&own, settings);
        let recency = rules::recency_score(lead, settings, now);

        let weights = &self.config.weights;
        let raw = frequency * weights.interaction_frequency as f64 / 100.0
            + engagement * weights.engagement_level as f64 / 100.0
            + recency * weights.recency as f64 / 100.0;

        let total = raw.round().clamp(0.0, 100.0) as u8;

        ScoreBreakdown {
            lead_id: lead.id.clone(),
            frequency,
            engagement,
            recency,
            total,
            band: categorize(total, &self.config.thresholds),
        }
    }
}
