use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

use leadscore::workflows::leads::{
    AlertError, AlertPublisher, FollowUp, HotLeadAlert, Interaction, Lead, LeadId, LeadRepository,
    RepositoryError, ScoringConfig,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
    interactions: Arc<Mutex<Vec<Interaction>>>,
    follow_ups: Arc<Mutex<Vec<FollowUp>>>,
}

impl LeadRepository for InMemoryLeadRepository {
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
        if guard.contains_key(&lead.id) {
            guard.insert(lead.id.clone(), lead);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
        let mut guard = self.interactions.lock().expect("interaction mutex poisoned");
        guard.push(interaction.clone());
        Ok(interaction)
    }

    fn interactions(&self) -> Result<Vec<Interaction>, RepositoryError> {
        let guard = self.interactions.lock().expect("interaction mutex poisoned");
        Ok(guard.clone())
    }

    fn interactions_for(&self, lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError> {
        let guard = self.interactions.lock().expect("interaction mutex poisoned");
        Ok(guard
            .iter()
            .filter(|interaction| &interaction.lead_id == lead_id)
            .cloned()
            .collect())
    }

    fn insert_follow_up(&self, follow_up: FollowUp) -> Result<FollowUp, RepositoryError> {
        let mut guard = self.follow_ups.lock().expect("follow-up mutex poisoned");
        guard.push(follow_up.clone());
        Ok(follow_up)
    }

    fn follow_ups(&self) -> Result<Vec<FollowUp>, RepositoryError> {
        let guard = self.follow_ups.lock().expect("follow-up mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<HotLeadAlert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: HotLeadAlert) -> Result<(), AlertError> {
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    pub(crate) fn events(&self) -> Vec<HotLeadAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

/// Load the scoring configuration from disk, falling back to the
/// defaults when no path is configured or the file is unreadable.
pub(crate) fn load_scoring_config(path: Option<&Path>) -> ScoringConfig {
    let Some(path) = path else {
        return ScoringConfig::default();
    };

    match ScoringConfig::load_from_file(path) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to default scoring config");
            ScoringConfig::default()
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Noon UTC on the given date, a neutral in-day anchor for whole-day
/// scoring math.
pub(crate) fn day_to_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0).expect("in-range time").and_utc()
}
