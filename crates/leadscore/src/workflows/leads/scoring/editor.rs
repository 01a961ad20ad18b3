//! Invariant-preserving edits to [`ScoringConfig`].
//!
//! Every operation is a total function from (config, edit) to a new,
//! fully valid config: weights always sum to exactly 100 with each in
//! [0, 100], and `thresholds.low < thresholds.medium` after every call.

use super::super::domain::LeadId;
use super::config::{ScoreFactor, ScoringConfig, ScoringSettings, ThresholdKey};

impl ScoringConfig {
    /// Set one factor weight, rebalancing the others so the total stays
    /// at exactly 100.
    ///
    /// The requested value is clamped to [0, 100], the shortfall or
    /// excess is split evenly across the other factors, each new value
    /// rounded and clamped to [0, 100] independently, and any remaining
    /// residual is absorbed by the other factors in declaration order.
    /// The rebalance is a heuristic, not a unique solution.
    pub fn with_weight(&self, factor: ScoreFactor, value: u8) -> Self {
        let mut weights = self.weights;
        weights.set(factor, value.min(100));

        if weights.total() != 100 {
            let others: Vec<ScoreFactor> = ScoreFactor::ALL
                .into_iter()
                .filter(|other| *other != factor)
                .collect();

            let delta = 100 - weights.total() as i32;
            let share = delta as f64 / others.len() as f64;
            for other in &others {
                let adjusted = (weights.get(*other) as f64 + share).round().clamp(0.0, 100.0);
                weights.set(*other, adjusted as u8);
            }

            // Per-factor rounding rarely lands exactly on 100; push the
            // residual onto the first other factor, cascading when
            // clamping stops it from absorbing the whole remainder.
            let mut residual = 100 - weights.total() as i32;
            for other in &others {
                if residual == 0 {
                    break;
                }
                let current = weights.get(*other) as i32;
                let adjusted = (current + residual).clamp(0, 100);
                residual -= adjusted - current;
                weights.set(*other, adjusted as u8);
            }
        }

        Self {
            weights,
            ..self.clone()
        }
    }

    /// Move one threshold, clamping so `low < medium` always holds.
    /// Keeping both inside [1, 99] is the caller's responsibility.
    pub fn with_threshold(&self, key: ThresholdKey, value: u8) -> Self {
        let mut thresholds = self.thresholds;
        match key {
            ThresholdKey::Low => {
                thresholds.low = if value >= thresholds.medium {
                    thresholds.medium.saturating_sub(1)
                } else {
                    value
                };
            }
            ThresholdKey::Medium => {
                thresholds.medium = if value <= thresholds.low {
                    thresholds.low.saturating_add(1)
                } else {
                    value
                };
            }
        }

        Self {
            thresholds,
            ..self.clone()
        }
    }

    /// Replace the scoring settings wholesale; no cross-field invariants.
    pub fn with_settings(&self, settings: ScoringSettings) -> Self {
        Self {
            settings,
            ..self.clone()
        }
    }

    /// Pin a lead to a manual score, clamped to [0, 100], taking
    /// precedence over the computed score.
    pub fn with_manual_score(&self, lead_id: LeadId, score: u8) -> Self {
        let mut manual_scores = self.manual_scores.clone();
        manual_scores.insert(lead_id, score.min(100));
        Self {
            manual_scores,
            ..self.clone()
        }
    }

    /// Drop a manual override, returning the lead to computed scoring.
    pub fn without_manual_score(&self, lead_id: &LeadId) -> Self {
        let mut manual_scores = self.manual_scores.clone();
        manual_scores.remove(lead_id);
        Self {
            manual_scores,
            ..self.clone()
        }
    }

    /// Restore the built-in default configuration.
    pub fn reset(&self) -> Self {
        Self::default()
    }
}
