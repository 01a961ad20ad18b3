use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::domain::{ContactId, FollowUpId, FollowUpPriority, LeadId, LeadStage};

#[derive(Debug, Clone, Serialize)]
pub struct StageDistributionEntry {
    pub stage: LeadStage,
    pub stage_label: &'static str,
    pub count: usize,
    /// Summed deal value of leads in this stage, in dollars.
    pub value: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceBreakdownEntry {
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUpView {
    pub follow_up_id: FollowUpId,
    pub contact_id: ContactId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: FollowUpPriority,
    pub priority_label: &'static str,
    pub overdue: bool,
}

/// Dashboard-shaped summary of the current pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub stage_distribution: Vec<StageDistributionEntry>,
    pub source_breakdown: Vec<SourceBreakdownEntry>,
    /// Pending follow-ups due within the next seven days, soonest first.
    pub upcoming_follow_ups: Vec<FollowUpView>,
    pub insights: PipelineInsights,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineInsights {
    pub total_leads: usize,
    pub hot_leads: usize,
    pub warm_leads: usize,
    pub cold_leads: usize,
    /// Summed deal value across open leads, in dollars.
    pub open_pipeline_value: u64,
    /// Open pipeline value discounted by each lead's win probability.
    pub weighted_pipeline_value: u64,
    pub average_lead_value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_source: Option<String>,
    pub interactions_this_week: usize,
    pub pending_follow_ups: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attention_items: Vec<String>,
}
