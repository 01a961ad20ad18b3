//! CSV ingestion for lead books and interaction logs exported from
//! spreadsheet-era CRMs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{ContactId, InteractionSubmission, LeadId, LeadSubmission};

/// An interaction row paired with the lead it was logged against.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedInteraction {
    pub lead_id: LeadId,
    pub submission: InteractionSubmission,
}

/// Error reading or decoding a CSV export.
#[derive(Debug, thiserror::Error)]
pub enum LeadCsvImportError {
    #[error("failed to open csv file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unreadable date {value:?}")]
    BadDate { row: usize, value: String },
    #[error("row {row}: unreadable number {value:?}")]
    BadNumber { row: usize, value: String },
}

/// Parse a lead book export with the header
/// `Contact ID,Source,Stage,Value,Probability,Last Contacted,Next Follow-Up`.
///
/// Rows come back as raw submissions; stage labels and value ranges are
/// still subject to intake validation downstream.
pub fn parse_lead_book<R: Read>(reader: R) -> Result<Vec<LeadSubmission>, LeadCsvImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut submissions = Vec::new();

    for (index, record) in csv_reader.deserialize::<LeadRow>().enumerate() {
        let row = record?;
        // Data rows are 1-based and follow the header line.
        let row_number = index + 2;

        let value = parse_number(&row.value, row_number)?;
        let probability = parse_number(&row.probability, row_number)? as i32;
        let last_contacted = parse_required_date(&row.last_contacted, row_number)?;
        let next_follow_up = row
            .next_follow_up
            .as_deref()
            .map(|raw| parse_required_date(raw, row_number))
            .transpose()?;

        submissions.push(LeadSubmission {
            contact_id: ContactId(row.contact_id),
            source: row.source,
            stage: row.stage,
            value,
            probability,
            last_contacted,
            next_follow_up,
        });
    }

    Ok(submissions)
}

pub fn parse_lead_book_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<LeadSubmission>, LeadCsvImportError> {
    parse_lead_book(File::open(path)?)
}

/// Parse an interaction log export with the header
/// `Lead ID,Contact ID,Type,Date,Notes`.
pub fn parse_interaction_log<R: Read>(
    reader: R,
) -> Result<Vec<ImportedInteraction>, LeadCsvImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut imported = Vec::new();

    for (index, record) in csv_reader.deserialize::<InteractionRow>().enumerate() {
        let row = record?;
        let row_number = index + 2;
        let occurred_at = parse_required_date(&row.date, row_number)?;

        imported.push(ImportedInteraction {
            lead_id: LeadId(row.lead_id),
            submission: InteractionSubmission {
                contact_id: ContactId(row.contact_id),
                kind: row.kind,
                notes: row.notes.unwrap_or_default(),
                occurred_at,
            },
        });
    }

    Ok(imported)
}

pub fn parse_interaction_log_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ImportedInteraction>, LeadCsvImportError> {
    parse_interaction_log(File::open(path)?)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(rename = "Contact ID")]
    contact_id: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Stage")]
    stage: String,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Probability")]
    probability: String,
    #[serde(rename = "Last Contacted")]
    last_contacted: String,
    #[serde(
        rename = "Next Follow-Up",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    next_follow_up: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(rename = "Lead ID")]
    lead_id: String,
    #[serde(rename = "Contact ID")]
    contact_id: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_number(value: &str, row: usize) -> Result<f64, LeadCsvImportError> {
    // Exports sometimes carry currency formatting on numeric columns.
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| LeadCsvImportError::BadNumber {
            row,
            value: value.to_string(),
        })
}

fn parse_required_date(value: &str, row: usize) -> Result<DateTime<Utc>, LeadCsvImportError> {
    parse_datetime(value).ok_or_else(|| LeadCsvImportError::BadDate {
        row,
        value: value.to_string(),
    })
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}
