use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FollowUpSubmission, InteractionSubmission, LeadId, LeadSubmission};
use super::repository::{AlertPublisher, LeadRepository, RepositoryError};
use super::scoring::{ScoreFactor, ScoringSettings, ThresholdKey};
use super::service::{LeadScoringService, LeadServiceError};

/// Router builder exposing HTTP endpoints for the lead workflow.
pub fn lead_router<R, A>(service: Arc<LeadScoringService<R, A>>) -> Router
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/leads", post(create_lead_handler::<R, A>))
        .route(
            "/api/v1/leads/scoreboard",
            get(scoreboard_handler::<R, A>),
        )
        .route("/api/v1/leads/report", get(report_handler::<R, A>))
        .route(
            "/api/v1/leads/:lead_id/interactions",
            post(log_interaction_handler::<R, A>),
        )
        .route(
            "/api/v1/leads/:lead_id/follow-ups",
            post(schedule_follow_up_handler::<R, A>),
        )
        .route(
            "/api/v1/leads/:lead_id/score",
            get(score_handler::<R, A>),
        )
        .route(
            "/api/v1/leads/:lead_id/manual-score",
            put(set_manual_score_handler::<R, A>).delete(clear_manual_score_handler::<R, A>),
        )
        .route("/api/v1/scoring/config", get(config_handler::<R, A>))
        .route(
            "/api/v1/scoring/config/weights",
            put(set_weight_handler::<R, A>),
        )
        .route(
            "/api/v1/scoring/config/thresholds",
            put(set_threshold_handler::<R, A>),
        )
        .route(
            "/api/v1/scoring/config/settings",
            put(update_settings_handler::<R, A>),
        )
        .route(
            "/api/v1/scoring/config/reset",
            post(reset_config_handler::<R, A>),
        )
        .with_state(service)
}

/// Optional reference time for score reads; defaults to the wall clock.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfQuery {
    pub(crate) as_of: Option<DateTime<Utc>>,
}

impl AsOfQuery {
    fn resolve(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}

fn error_response(error: LeadServiceError) -> Response {
    let status = match &error {
        LeadServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LeadServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LeadServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LeadServiceError::Repository(RepositoryError::Unavailable(_))
        | LeadServiceError::Alert(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_lead_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.create_lead(submission, Utc::now()) {
        Ok(lead) => (StatusCode::CREATED, axum::Json(lead)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn log_interaction_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Path(lead_id): Path<String>,
    axum::Json(submission): axum::Json<InteractionSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.log_interaction(&LeadId(lead_id), submission, Utc::now()) {
        Ok(interaction) => (StatusCode::CREATED, axum::Json(interaction)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_follow_up_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Path(lead_id): Path<String>,
    axum::Json(submission): axum::Json<FollowUpSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.schedule_follow_up(Some(&LeadId(lead_id)), submission, Utc::now()) {
        Ok(follow_up) => (StatusCode::CREATED, axum::Json(follow_up)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.pipeline_report(query.resolve()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Path(lead_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.score_lead(&LeadId(lead_id), query.resolve()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scoreboard_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.scoreboard(query.resolve()) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeightUpdate {
    pub(crate) factor: ScoreFactor,
    pub(crate) value: u8,
}

pub(crate) async fn set_weight_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    axum::Json(update): axum::Json<WeightUpdate>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    let config = service.set_weight(update.factor, update.value);
    (StatusCode::OK, axum::Json(config)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThresholdUpdate {
    pub(crate) key: ThresholdKey,
    pub(crate) value: u8,
}

pub(crate) async fn set_threshold_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    axum::Json(update): axum::Json<ThresholdUpdate>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    let config = service.set_threshold(update.key, update.value);
    (StatusCode::OK, axum::Json(config)).into_response()
}

pub(crate) async fn update_settings_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    axum::Json(settings): axum::Json<ScoringSettings>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    let config = service.update_settings(settings);
    (StatusCode::OK, axum::Json(config)).into_response()
}

pub(crate) async fn config_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.config())).into_response()
}

pub(crate) async fn reset_config_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.reset_config())).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManualScoreUpdate {
    pub(crate) score: u8,
}

pub(crate) async fn set_manual_score_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Path(lead_id): Path<String>,
    axum::Json(update): axum::Json<ManualScoreUpdate>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    let config = service.set_manual_score(LeadId(lead_id), update.score);
    (StatusCode::OK, axum::Json(config)).into_response()
}

pub(crate) async fn clear_manual_score_handler<R, A>(
    State(service): State<Arc<LeadScoringService<R, A>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    A: AlertPublisher + 'static,
{
    let config = service.clear_manual_score(&LeadId(lead_id));
    (StatusCode::OK, axum::Json(config)).into_response()
}
