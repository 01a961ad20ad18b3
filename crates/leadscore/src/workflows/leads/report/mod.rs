//! Pipeline dashboard summary derived from the current lead book.

mod insights;
mod views;

pub use views::{
    FollowUpView, PipelineInsights, PipelineReport, SourceBreakdownEntry, StageDistributionEntry,
};

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use super::domain::{FollowUp, FollowUpStatus, Interaction, Lead, LeadStage};
use super::scoring::ScoringConfig;

/// Assemble the dashboard report for one snapshot of the book.
///
/// Pure over its inputs; `now` anchors "upcoming" and "overdue".
pub fn pipeline_report(
    leads: &[Lead],
    interactions: &[Interaction],
    follow_ups: &[FollowUp],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> PipelineReport {
    let stage_distribution = LeadStage::ALL
        .into_iter()
        .map(|stage| {
            let in_stage: Vec<&Lead> = leads.iter().filter(|lead| lead.stage == stage).collect();
            StageDistributionEntry {
                stage,
                stage_label: stage.label(),
                count: in_stage.len(),
                value: in_stage.iter().map(|lead| lead.value).sum(),
            }
        })
        .collect();

    let mut source_counts: BTreeMap<String, usize> = BTreeMap::new();
    for lead in leads {
        *source_counts.entry(lead.source.clone()).or_default() += 1;
    }
    let mut source_breakdown: Vec<SourceBreakdownEntry> = source_counts
        .into_iter()
        .map(|(source, count)| SourceBreakdownEntry { source, count })
        .collect();
    source_breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));

    let week_out = now + Duration::days(7);
    let mut upcoming_follow_ups: Vec<FollowUpView> = follow_ups
        .iter()
        .filter(|follow_up| {
            follow_up.status == FollowUpStatus::Pending && follow_up.due_date <= week_out
        })
        .map(|follow_up| FollowUpView {
            follow_up_id: follow_up.id.clone(),
            contact_id: follow_up.contact_id.clone(),
            lead_id: follow_up.lead_id.clone(),
            description: follow_up.description.clone(),
            due_date: follow_up.due_date,
            priority: follow_up.priority,
            priority_label: follow_up.priority.label(),
            overdue: follow_up.due_date < now,
        })
        .collect();
    upcoming_follow_ups.sort_by_key(|view| view.due_date);

    let insights = insights::generate_insights(leads, interactions, follow_ups, config, now);

    PipelineReport {
        generated_at: now,
        stage_distribution,
        source_breakdown,
        upcoming_follow_ups,
        insights,
    }
}
