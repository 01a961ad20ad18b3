use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::LeadId;

/// The three factors feeding the composite lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    InteractionFrequency,
    EngagementLevel,
    Recency,
}

impl ScoreFactor {
    /// Declaration order doubles as the rebalancing iteration order.
    pub const ALL: [ScoreFactor; 3] = [
        ScoreFactor::InteractionFrequency,
        ScoreFactor::EngagementLevel,
        ScoreFactor::Recency,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::InteractionFrequency => "Interaction Frequency",
            ScoreFactor::EngagementLevel => "Engagement Level",
            ScoreFactor::Recency => "Recency",
        }
    }
}

/// Integer percent contribution of each factor; invariant: sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub interaction_frequency: u8,
    pub engagement_level: u8,
    pub recency: u8,
}

impl FactorWeights {
    pub fn get(&self, factor: ScoreFactor) -> u8 {
        match factor {
            ScoreFactor::InteractionFrequency => self.interaction_frequency,
            ScoreFactor::EngagementLevel => self.engagement_level,
            ScoreFactor::Recency => self.recency,
        }
    }

    pub(crate) fn set(&mut self, factor: ScoreFactor, value: u8) {
        match factor {
            ScoreFactor::InteractionFrequency => self.interaction_frequency = value,
            ScoreFactor::EngagementLevel => self.engagement_level = value,
            ScoreFactor::Recency => self.recency = value,
        }
    }

    pub fn total(&self) -> u16 {
        self.interaction_frequency as u16 + self.engagement_level as u16 + self.recency as u16
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            interaction_frequency: 40,
            engagement_level: 35,
            recency: 25,
        }
    }
}

/// Which score cut-point a threshold edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKey {
    Low,
    Medium,
}

/// Score cut-points separating the Low/Medium/High bands.
///
/// Invariant: `low < medium`. The intended range for both is [1, 99];
/// range enforcement is left to input surfaces, only the ordering is
/// maintained here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: u8,
    pub medium: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low: 30, medium: 60 }
    }
}

/// Tunable inputs to the sub-score formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Window, in days, an interaction counts as "recent".
    pub recent_interaction_days: u32,
    /// Horizon, in days, over which the recency score decays to zero.
    pub max_last_contact_days: u32,
    /// Engagement multiplier per lower-cased interaction kind.
    pub engagement_multipliers: BTreeMap<String, f64>,
}

impl ScoringSettings {
    /// Multiplier for an interaction kind; unlisted kinds weigh 1.0.
    pub fn multiplier_for(&self, kind: &str) -> f64 {
        self.engagement_multipliers
            .get(&kind.trim().to_lowercase())
            .copied()
            .unwrap_or(1.0)
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        let mut engagement_multipliers = BTreeMap::new();
        for (kind, multiplier) in [("email", 1.0), ("call", 1.5), ("meeting", 2.0), ("demo", 2.5)] {
            engagement_multipliers.insert(kind.to_string(), multiplier);
        }

        Self {
            recent_interaction_days: 30,
            max_last_contact_days: 14,
            engagement_multipliers,
        }
    }
}

/// Complete scoring configuration: weights, thresholds, settings, and
/// per-lead manual overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: FactorWeights,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub settings: ScoringSettings,
    #[serde(default)]
    pub manual_scores: BTreeMap<LeadId, u8>,
}

impl ScoringConfig {
    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoringConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn manual_score_for(&self, lead_id: &LeadId) -> Option<u8> {
        self.manual_scores.get(lead_id).copied()
    }
}

/// Error loading a scoring configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("failed to read scoring config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
