use chrono::{DateTime, Utc};

use super::super::domain::{Interaction, Lead};
use super::config::ScoringSettings;

/// Ten touches inside the recent window saturate the frequency factor.
const MAX_RECENT_INTERACTIONS: f64 = 10.0;

/// An accumulated multiplier total of five saturates the engagement factor.
const ENGAGEMENT_SATURATION: f64 = 5.0;

/// Whole days elapsed between `now` and `then`; negative when `then` is
/// in the future.
pub(crate) fn days_since(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_days()
}

/// Frequency sub-score in [0, 100]: linear in the count of interactions
/// inside the recent window. Future-dated touches count as zero days old
/// and therefore fall inside the window.
pub(crate) fn frequency_score(
    interactions: &[&Interaction],
    settings: &ScoringSettings,
    now: DateTime<Utc>,
) -> f64 {
    let window = settings.recent_interaction_days as i64;
    let recent = interactions
        .iter()
        .filter(|interaction| days_since(now, interaction.occurred_at) <= window)
        .count();

    ((recent as f64 / MAX_RECENT_INTERACTIONS) * 100.0).min(100.0)
}

/// Engagement sub-score in [0, 100]: the summed per-kind multipliers of
/// every interaction for the lead, normalized so a weighted total of
/// five reaches the cap. No interactions means no engagement.
pub(crate) fn engagement_score(interactions: &[&Interaction], settings: &ScoringSettings) -> f64 {
    if interactions.is_empty() {
        return 0.0;
    }

    let total: f64 = interactions
        .iter()
        .map(|interaction| settings.multiplier_for(&interaction.kind))
        .sum();

    ((total / ENGAGEMENT_SATURATION) * 100.0).min(100.0)
}

/// Recency sub-score in [0, 100]: full marks for a contact today or in
/// the future, zero at or past the decay horizon, linear in between.
pub(crate) fn recency_score(lead: &Lead, settings: &ScoringSettings, now: DateTime<Utc>) -> f64 {
    let elapsed = days_since(now, lead.last_contacted);
    if elapsed <= 0 {
        return 100.0;
    }

    let horizon = settings.max_last_contact_days as i64;
    if elapsed >= horizon {
        return 0.0;
    }

    100.0 * (1.0 - elapsed as f64 / horizon as f64)
}
