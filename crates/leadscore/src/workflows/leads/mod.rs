//! Lead intake, scoring, and pipeline reporting.
//!
//! The scoring engine is pure: a lead, its interaction history, a
//! configuration snapshot, and a reference instant always produce the
//! same composite score. Everything stateful lives behind the
//! repository and alert seams.

pub mod domain;
pub mod import;
pub(crate) mod intake;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ContactId, FollowUp, FollowUpId, FollowUpPriority, FollowUpStatus, FollowUpSubmission,
    Interaction, InteractionId, InteractionSubmission, Lead, LeadId, LeadStage, LeadSubmission,
};
pub use import::{
    parse_interaction_log, parse_interaction_log_file, parse_lead_book, parse_lead_book_file,
    ImportedInteraction, LeadCsvImportError,
};
pub use intake::IntakeViolation;
pub use report::{PipelineInsights, PipelineReport};
pub use repository::{
    AlertError, AlertPublisher, HotLeadAlert, LeadRepository, LeadScoreView, RepositoryError,
    ScoreSource,
};
pub use router::lead_router;
pub use scoring::{
    categorize, FactorWeights, ScoreBand, ScoreBreakdown, ScoreFactor, ScoringConfig,
    ScoringConfigError, ScoringEngine, ScoringSettings, ThresholdKey, Thresholds,
};
pub use service::{LeadScoringService, LeadServiceError};
