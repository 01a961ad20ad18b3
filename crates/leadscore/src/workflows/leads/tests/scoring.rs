use super::common::*;
use chrono::Duration;

use crate::workflows::leads::scoring::{
    categorize, ScoreBand, ScoringConfig, ScoringEngine, Thresholds,
};

fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

#[test]
fn quiet_lead_contacted_today_scores_only_its_recency_share() {
    // Frequency and engagement are both zero; recency is full marks, so
    // the composite is exactly the recency weight.
    let breakdown = engine().score(&lead("lead-a", 0), &[], fixed_now());

    assert_eq!(breakdown.frequency, 0.0);
    assert_eq!(breakdown.engagement, 0.0);
    assert_eq!(breakdown.recency, 100.0);
    assert_eq!(breakdown.total, 25);
    assert_eq!(breakdown.band, ScoreBand::Low);
}

#[test]
fn saturated_lead_reaches_the_ceiling() {
    let lead = lead("lead-a", 0);
    let interactions: Vec<_> = (0..10).map(|day| interaction("lead-a", "demo", day)).collect();

    let breakdown = engine().score(&lead, &interactions, fixed_now());

    assert_eq!(breakdown.frequency, 100.0);
    assert_eq!(breakdown.engagement, 100.0);
    assert_eq!(breakdown.recency, 100.0);
    assert_eq!(breakdown.total, 100);
    assert_eq!(breakdown.band, ScoreBand::High);
}

#[test]
fn mixed_history_lands_between_the_extremes() {
    let lead = lead("lead-a", 7);
    let interactions = vec![
        interaction("lead-a", "call", 1),
        interaction("lead-a", "call", 2),
    ];

    let breakdown = engine().score(&lead, &interactions, fixed_now());

    // freq 20, engagement 60, recency 50 under default weights.
    assert_eq!(breakdown.frequency, 20.0);
    assert_eq!(breakdown.engagement, 60.0);
    assert_eq!(breakdown.recency, 50.0);
    assert_eq!(breakdown.total, 42);
    assert_eq!(breakdown.band, ScoreBand::Medium);
}

#[test]
fn frequency_grows_with_each_recent_touch_until_the_cap() {
    let lead = lead("lead-a", 0);
    let engine = engine();

    let mut previous = -1.0;
    for count in 0..=12i64 {
        let interactions: Vec<_> = (0..count)
            .map(|day| interaction("lead-a", "email", day))
            .collect();
        let breakdown = engine.score(&lead, &interactions, fixed_now());
        assert!(breakdown.frequency >= previous);
        assert!(breakdown.frequency <= 100.0);
        previous = breakdown.frequency;
    }
    assert_eq!(previous, 100.0);
}

#[test]
fn interactions_outside_the_window_do_not_count_toward_frequency() {
    let lead = lead("lead-a", 0);
    let interactions = vec![
        interaction("lead-a", "email", 31),
        interaction("lead-a", "email", 90),
    ];

    let breakdown = engine().score(&lead, &interactions, fixed_now());

    assert_eq!(breakdown.frequency, 0.0);
    // Stale touches still carry engagement weight.
    assert!(breakdown.engagement > 0.0);
}

#[test]
fn recency_decays_linearly_to_the_horizon() {
    let engine = engine();

    let today = engine.score(&lead("lead-a", 0), &[], fixed_now());
    assert_eq!(today.recency, 100.0);

    let midway = engine.score(&lead("lead-a", 7), &[], fixed_now());
    assert_eq!(midway.recency, 50.0);

    let at_horizon = engine.score(&lead("lead-a", 14), &[], fixed_now());
    assert_eq!(at_horizon.recency, 0.0);

    let past_horizon = engine.score(&lead("lead-a", 45), &[], fixed_now());
    assert_eq!(past_horizon.recency, 0.0);
}

#[test]
fn future_dated_contact_counts_as_fully_recent() {
    let mut lead = lead("lead-a", 0);
    lead.last_contacted = fixed_now() + Duration::days(3);

    let breakdown = engine().score(&lead, &[], fixed_now());
    assert_eq!(breakdown.recency, 100.0);
}

#[test]
fn other_leads_interactions_are_ignored() {
    let lead = lead("lead-a", 0);
    let interactions = vec![
        interaction("lead-b", "demo", 1),
        interaction("lead-b", "demo", 2),
    ];

    let breakdown = engine().score(&lead, &interactions, fixed_now());
    assert_eq!(breakdown.frequency, 0.0);
    assert_eq!(breakdown.engagement, 0.0);
}

#[test]
fn unknown_interaction_kinds_weigh_one() {
    let lead = lead("lead-a", 0);
    let interactions = vec![interaction("lead-a", "carrier pigeon", 1)];

    let breakdown = engine().score(&lead, &interactions, fixed_now());
    assert_eq!(breakdown.engagement, 20.0);
}

#[test]
fn scores_stay_inside_bounds_across_extreme_inputs() {
    let engine = engine();
    for days_ago in [0, 1, 13, 14, 365, 10_000] {
        for count in [0usize, 1, 10, 50] {
            let interactions: Vec<_> = (0..count)
                .map(|i| interaction("lead-a", "demo", (i % 5) as i64))
                .collect();
            let breakdown = engine.score(&lead("lead-a", days_ago), &interactions, fixed_now());
            assert!(breakdown.total <= 100);
        }
    }
}

#[test]
fn categorize_respects_both_cut_points() {
    let thresholds = Thresholds::default();

    assert_eq!(categorize(0, &thresholds), ScoreBand::Low);
    assert_eq!(categorize(29, &thresholds), ScoreBand::Low);
    assert_eq!(categorize(30, &thresholds), ScoreBand::Medium);
    assert_eq!(categorize(59, &thresholds), ScoreBand::Medium);
    assert_eq!(categorize(60, &thresholds), ScoreBand::High);
    assert_eq!(categorize(100, &thresholds), ScoreBand::High);
}

#[test]
fn scoring_is_deterministic_for_fixed_inputs() {
    let lead = lead("lead-a", 5);
    let interactions = vec![
        interaction("lead-a", "meeting", 2),
        interaction("lead-a", "email", 8),
    ];
    let engine = engine();

    let first = engine.score(&lead, &interactions, fixed_now());
    let second = engine.score(&lead, &interactions, fixed_now());
    assert_eq!(first, second);
}
