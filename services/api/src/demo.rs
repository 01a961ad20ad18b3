use crate::infra::{
    day_to_instant, load_scoring_config, InMemoryAlertPublisher, InMemoryLeadRepository,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::Args;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use leadscore::error::AppError;
use leadscore::telemetry;
use leadscore::workflows::leads::{
    parse_interaction_log_file, parse_lead_book_file, ContactId, FollowUpPriority,
    FollowUpSubmission, InteractionSubmission, LeadId, LeadScoreView, LeadScoringService,
    LeadSubmission, PipelineReport, ScoreSource,
};

type DemoService = LeadScoringService<InMemoryLeadRepository, InMemoryAlertPublisher>;

#[derive(Args, Debug)]
pub(crate) struct LeadImportArgs {
    /// Lead book CSV export (Contact ID, Source, Stage, Value, ...)
    #[arg(long)]
    pub(crate) leads_csv: PathBuf,
    /// Optional interaction log CSV export (Lead ID, Contact ID, Type, ...)
    #[arg(long)]
    pub(crate) interactions_csv: Option<PathBuf>,
    /// Optional scoring configuration JSON overriding the defaults
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
    /// Reference date for scoring (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the per-factor breakdown next to each score
    #[arg(long)]
    pub(crate) show_breakdown: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for scoring (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the per-factor breakdown next to each score
    #[arg(long)]
    pub(crate) show_breakdown: bool,
}

pub(crate) fn run_lead_import(args: LeadImportArgs) -> Result<(), AppError> {
    telemetry::init_quiet()?;

    let LeadImportArgs {
        leads_csv,
        interactions_csv,
        scoring_config,
        as_of,
        show_breakdown,
    } = args;

    let now = resolve_now(as_of);
    let config = load_scoring_config(scoring_config.as_deref());
    let service = build_service(config);

    let submissions = parse_lead_book_file(&leads_csv)?;
    let mut leads_by_contact: HashMap<ContactId, LeadId> = HashMap::new();
    let mut imported_leads = 0usize;
    for submission in submissions {
        match service.create_lead(submission, now) {
            Ok(lead) => {
                leads_by_contact.insert(lead.contact_id.clone(), lead.id.clone());
                imported_leads += 1;
            }
            Err(err) => warn!(error = %err, "skipping lead row"),
        }
    }

    let mut imported_interactions = 0usize;
    if let Some(path) = interactions_csv {
        // Export lead ids do not survive the import; rows are matched to
        // their lead through the shared contact id.
        for imported in parse_interaction_log_file(&path)? {
            let Some(lead_id) = leads_by_contact.get(&imported.submission.contact_id) else {
                warn!(
                    lead_id = %imported.lead_id.0,
                    contact_id = %imported.submission.contact_id.0,
                    "skipping interaction for unknown contact"
                );
                continue;
            };
            match service.log_interaction(lead_id, imported.submission, now) {
                Ok(_) => imported_interactions += 1,
                Err(err) => warn!(error = %err, "skipping interaction row"),
            }
        }
    }

    println!(
        "Imported {imported_leads} lead(s) and {imported_interactions} interaction(s) as of {}",
        now.date_naive()
    );

    render_snapshot(&service, now, show_breakdown)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    telemetry::init_quiet()?;

    let DemoArgs {
        as_of,
        show_breakdown,
    } = args;
    let now = resolve_now(as_of);

    println!("Lead scoring demo");
    let service = build_service(load_scoring_config(None));
    seed_sample_book(&service, now)?;

    render_snapshot(&service, now, show_breakdown)
}

fn resolve_now(as_of: Option<NaiveDate>) -> DateTime<Utc> {
    as_of.map(day_to_instant).unwrap_or_else(Utc::now)
}

fn build_service(config: leadscore::workflows::leads::ScoringConfig) -> DemoService {
    LeadScoringService::new(
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(InMemoryAlertPublisher::default()),
        config,
    )
}

fn render_snapshot(
    service: &DemoService,
    now: DateTime<Utc>,
    show_breakdown: bool,
) -> Result<(), AppError> {
    let config = service.config();
    println!(
        "\nScoring config: weights {}/{}/{} (frequency/engagement/recency), bands at {} and {}",
        config.weights.interaction_frequency,
        config.weights.engagement_level,
        config.weights.recency,
        config.thresholds.low,
        config.thresholds.medium,
    );

    let board = service.scoreboard(now)?;
    println!("\nScoreboard ({} leads)", board.len());
    for view in &board {
        render_score_line(view, show_breakdown);
    }

    let report = service.pipeline_report(now)?;
    render_report(&report);
    Ok(())
}

fn render_score_line(view: &LeadScoreView, show_breakdown: bool) {
    let marker = match view.source {
        ScoreSource::Manual => " (manual)",
        ScoreSource::Computed => "",
    };
    println!(
        "  {:>3}  {:<6} {:<16} {:<14} ${}{marker}",
        view.score, view.band_label, view.lead_id.0, view.stage, view.value
    );
    if show_breakdown {
        if let Some(breakdown) = &view.breakdown {
            println!(
                "       frequency {:.1} / engagement {:.1} / recency {:.1}",
                breakdown.frequency, breakdown.engagement, breakdown.recency
            );
        }
    }
}

fn render_report(report: &PipelineReport) {
    println!("\nPipeline report ({})", report.generated_at.date_naive());
    for entry in &report.stage_distribution {
        if entry.count > 0 {
            println!(
                "  {:<16} {:>2} lead(s)  ${}",
                entry.stage_label, entry.count, entry.value
            );
        }
    }

    let insights = &report.insights;
    println!(
        "  Hot {} / warm {} / cold {}; open pipeline ${} (weighted ${})",
        insights.hot_leads,
        insights.warm_leads,
        insights.cold_leads,
        insights.open_pipeline_value,
        insights.weighted_pipeline_value,
    );
    if let Some(source) = &insights.top_source {
        println!("  Top source: {source}");
    }

    if !report.upcoming_follow_ups.is_empty() {
        println!("  Upcoming follow-ups:");
        for follow_up in &report.upcoming_follow_ups {
            let overdue = if follow_up.overdue { " OVERDUE" } else { "" };
            println!(
                "    {} [{}] {}{overdue}",
                follow_up.due_date.date_naive(),
                follow_up.priority_label,
                follow_up.description
            );
        }
    }

    for item in &insights.attention_items {
        println!("  ! {item}");
    }
}

/// A small, plausible book: one hot, one warm, one cold lead, plus a
/// pending follow-up and a closed deal for the report.
fn seed_sample_book(service: &DemoService, now: DateTime<Utc>) -> Result<(), AppError> {
    let seeded = [
        ("contact-ava", "Referral", "Negotiation", 48_000.0, 70, 0i64),
        ("contact-ben", "Website", "Qualified", 12_500.0, 45, 6),
        ("contact-cleo", "Cold Call", "Initial Contact", 6_000.0, 20, 40),
        ("contact-dee", "Referral", "Closed Won", 30_000.0, 100, 10),
    ];

    let mut lead_ids = Vec::new();
    for (contact, source, stage, value, probability, contacted_days_ago) in seeded {
        let lead = service
            .create_lead(
                LeadSubmission {
                    contact_id: ContactId(contact.to_string()),
                    source: source.to_string(),
                    stage: stage.to_string(),
                    value,
                    probability,
                    last_contacted: now - Duration::days(contacted_days_ago),
                    next_follow_up: None,
                },
                now,
            )?;
        lead_ids.push(lead);
    }

    let touches = [
        (0usize, "demo", 1i64),
        (0, "meeting", 2),
        (0, "call", 3),
        (0, "call", 5),
        (0, "email", 6),
        (1, "call", 4),
        (1, "email", 9),
    ];
    for (index, kind, days_ago) in touches {
        let lead = &lead_ids[index];
        service
            .log_interaction(
                &lead.id,
                InteractionSubmission {
                    contact_id: lead.contact_id.clone(),
                    kind: kind.to_string(),
                    notes: String::new(),
                    occurred_at: now - Duration::days(days_ago),
                },
                now,
            )?;
    }

    service
        .schedule_follow_up(
            Some(&lead_ids[1].id),
            FollowUpSubmission {
                contact_id: lead_ids[1].contact_id.clone(),
                description: "Share the revised quote".to_string(),
                due_date: now + Duration::days(2),
                priority: FollowUpPriority::High,
            },
            now,
        )?;

    Ok(())
}
