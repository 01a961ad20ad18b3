use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::leads::domain::{
    ContactId, FollowUp, FollowUpPriority, FollowUpSubmission, Interaction, InteractionId,
    InteractionSubmission, Lead, LeadId, LeadStage, LeadSubmission,
};
use crate::workflows::leads::repository::{
    AlertError, AlertPublisher, HotLeadAlert, LeadRepository, RepositoryError,
};
use crate::workflows::leads::{lead_router, LeadScoringService, ScoringConfig};

/// Fixed reference instant so scoring assertions are deterministic.
pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).single().expect("valid instant")
}

pub(super) fn lead_submission() -> LeadSubmission {
    LeadSubmission {
        contact_id: ContactId("contact-100".to_string()),
        source: "Referral".to_string(),
        stage: "Qualified".to_string(),
        value: 12_500.0,
        probability: 60,
        last_contacted: fixed_now() - Duration::days(3),
        next_follow_up: Some(fixed_now() + Duration::days(4)),
    }
}

pub(super) fn interaction_submission(kind: &str, days_ago: i64) -> InteractionSubmission {
    InteractionSubmission {
        contact_id: ContactId("contact-100".to_string()),
        kind: kind.to_string(),
        notes: String::new(),
        occurred_at: fixed_now() - Duration::days(days_ago),
    }
}

pub(super) fn follow_up_submission() -> FollowUpSubmission {
    FollowUpSubmission {
        contact_id: ContactId("contact-100".to_string()),
        description: "Send the proposal deck".to_string(),
        due_date: fixed_now() + Duration::days(2),
        priority: FollowUpPriority::High,
    }
}

/// A bare lead record for engine-level tests that skip the service.
pub(super) fn lead(id: &str, last_contacted_days_ago: i64) -> Lead {
    Lead {
        id: LeadId(id.to_string()),
        contact_id: ContactId("contact-100".to_string()),
        source: "Referral".to_string(),
        stage: LeadStage::Qualified,
        value: 12_500,
        probability: 60,
        last_contacted: fixed_now() - Duration::days(last_contacted_days_ago),
        next_follow_up: None,
        created_at: fixed_now() - Duration::days(30),
        updated_at: fixed_now() - Duration::days(30),
    }
}

pub(super) fn interaction(lead_id: &str, kind: &str, days_ago: i64) -> Interaction {
    Interaction {
        id: InteractionId(format!("int-{lead_id}-{kind}-{days_ago}")),
        contact_id: ContactId("contact-100".to_string()),
        lead_id: LeadId(lead_id.to_string()),
        kind: kind.to_string(),
        notes: String::new(),
        occurred_at: fixed_now() - Duration::days(days_ago),
        created_at: fixed_now() - Duration::days(days_ago),
        updated_at: fixed_now() - Duration::days(days_ago),
    }
}

pub(super) fn build_service() -> (
    LeadScoringService<MemoryRepository, MemoryAlerts>,
    Arc<MemoryRepository>,
    Arc<MemoryAlerts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service =
        LeadScoringService::new(repository.clone(), alerts.clone(), ScoringConfig::default());
    (service, repository, alerts)
}

pub(super) fn lead_router_with_service(
    service: LeadScoringService<MemoryRepository, MemoryAlerts>,
) -> axum::Router {
    lead_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
    interactions: Arc<Mutex<Vec<Interaction>>>,
    follow_ups: Arc<Mutex<Vec<FollowUp>>>,
}

impl LeadRepository for MemoryRepository {
    fn insert_lead(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = self.leads.lock().expect("lead mutex poisoned");
        if guard.contains_key(&lead.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(lead.id.clone(), lead.clone());
        Ok(lead)
    }

    fn update_lead(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut guard = self.leads.lock().expect("lead mutex poisoned");
        guard.insert(lead.id.clone(), lead);
        Ok(())
    }

    fn fetch_lead(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        let mut leads: Vec<Lead> = guard.values().cloned().collect();
        leads.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(leads)
    }

    fn insert_interaction(&self, interaction: Interaction) -> Result<Interaction, RepositoryError> {
        self.interactions
            .lock()
            .expect("interaction mutex poisoned")
            .push(interaction.clone());
        Ok(interaction)
    }

    fn interactions(&self) -> Result<Vec<Interaction>, RepositoryError> {
        Ok(self
            .interactions
            .lock()
            .expect("interaction mutex poisoned")
            .clone())
    }

    fn interactions_for(&self, lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError> {
        Ok(self
            .interactions
            .lock()
            .expect("interaction mutex poisoned")
            .iter()
            .filter(|interaction| &interaction.lead_id == lead_id)
            .cloned()
            .collect())
    }

    fn insert_follow_up(&self, follow_up: FollowUp) -> Result<FollowUp, RepositoryError> {
        self.follow_ups
            .lock()
            .expect("follow-up mutex poisoned")
            .push(follow_up.clone());
        Ok(follow_up)
    }

    fn follow_ups(&self) -> Result<Vec<FollowUp>, RepositoryError> {
        Ok(self
            .follow_ups
            .lock()
            .expect("follow-up mutex poisoned")
            .clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<HotLeadAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<HotLeadAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: HotLeadAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl LeadRepository for ConflictRepository {
    fn insert_lead(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_lead(&self, _lead: Lead) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_lead(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Ok(None)
    }

    fn leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_interaction(&self, _interaction: Interaction) -> Result<Interaction, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn interactions(&self) -> Result<Vec<Interaction>, RepositoryError> {
        Ok(Vec::new())
    }

    fn interactions_for(&self, _lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_follow_up(&self, _follow_up: FollowUp) -> Result<FollowUp, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn follow_ups(&self) -> Result<Vec<FollowUp>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl UnavailableRepository {
    fn offline<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl LeadRepository for UnavailableRepository {
    fn insert_lead(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Self::offline()
    }

    fn update_lead(&self, _lead: Lead) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn fetch_lead(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Self::offline()
    }

    fn leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        Self::offline()
    }

    fn insert_interaction(&self, _interaction: Interaction) -> Result<Interaction, RepositoryError> {
        Self::offline()
    }

    fn interactions(&self) -> Result<Vec<Interaction>, RepositoryError> {
        Self::offline()
    }

    fn interactions_for(&self, _lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError> {
        Self::offline()
    }

    fn insert_follow_up(&self, _follow_up: FollowUp) -> Result<FollowUp, RepositoryError> {
        Self::offline()
    }

    fn follow_ups(&self) -> Result<Vec<FollowUp>, RepositoryError> {
        Self::offline()
    }
}
