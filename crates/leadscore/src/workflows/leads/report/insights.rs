use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::super::domain::{FollowUp, FollowUpStatus, Interaction, Lead};
use super::super::scoring::{ScoreBand, ScoringConfig, ScoringEngine};
use super::views::PipelineInsights;

pub(crate) fn generate_insights(
    leads: &[Lead],
    interactions: &[Interaction],
    follow_ups: &[FollowUp],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> PipelineInsights {
    let engine = ScoringEngine::new(config.clone());

    let mut hot_leads = 0;
    let mut warm_leads = 0;
    let mut cold_leads = 0;
    for lead in leads {
        let band = match config.manual_score_for(&lead.id) {
            Some(score) => super::super::scoring::categorize(score, &config.thresholds),
            None => engine.score(lead, interactions, now).band,
        };
        match band {
            ScoreBand::High => hot_leads += 1,
            ScoreBand::Medium => warm_leads += 1,
            ScoreBand::Low => cold_leads += 1,
        }
    }

    let open_leads: Vec<&Lead> = leads.iter().filter(|lead| lead.stage.is_open()).collect();
    let open_pipeline_value: u64 = open_leads.iter().map(|lead| lead.value).sum();
    let weighted_pipeline_value: u64 = open_leads
        .iter()
        .map(|lead| lead.value * lead.probability as u64 / 100)
        .sum();
    let average_lead_value = if leads.is_empty() {
        0
    } else {
        leads.iter().map(|lead| lead.value).sum::<u64>() / leads.len() as u64
    };

    let mut source_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for lead in leads {
        *source_counts.entry(lead.source.as_str()).or_default() += 1;
    }
    let top_source = source_counts
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(source, _)| source.to_string());

    let week_ago = now - Duration::days(7);
    let interactions_this_week = interactions
        .iter()
        .filter(|interaction| interaction.occurred_at >= week_ago)
        .count();

    let pending_follow_ups = follow_ups
        .iter()
        .filter(|follow_up| follow_up.status == FollowUpStatus::Pending)
        .count();

    let mut attention_items = Vec::new();
    let overdue_follow_ups = follow_ups
        .iter()
        .filter(|follow_up| {
            follow_up.status == FollowUpStatus::Pending && follow_up.due_date < now
        })
        .count();
    if overdue_follow_ups > 0 {
        attention_items.push(format!(
            "{} follow-up(s) past due and still pending",
            overdue_follow_ups
        ));
    }

    let horizon = config.settings.max_last_contact_days as i64;
    let gone_quiet = open_leads
        .iter()
        .filter(|lead| (now - lead.last_contacted).num_days() >= horizon)
        .count();
    if gone_quiet > 0 {
        attention_items.push(format!(
            "{} open lead(s) past the {}-day contact horizon",
            gone_quiet, horizon
        ));
    }

    PipelineInsights {
        total_leads: leads.len(),
        hot_leads,
        warm_leads,
        cold_leads,
        open_pipeline_value,
        weighted_pipeline_value,
        average_lead_value,
        top_source,
        interactions_this_week,
        pending_follow_ups,
        attention_items,
    }
}
