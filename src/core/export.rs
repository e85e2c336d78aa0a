//! CSV export
//!
//! Output is byte-for-byte deterministic: fixed column order, minimal RFC 4180
//! quoting, `\n` record terminators and fixed-width UTC timestamps.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, WriterBuilder};

use crate::core::error::{Result, TrackerError};
use crate::core::store::write_atomic;
use crate::entities::incident::{Incident, Tag};

/// Column order of every export
pub const CSV_COLUMNS: [&str; 10] = [
    "id",
    "title",
    "category",
    "severity",
    "phase",
    "status",
    "owner",
    "created_at",
    "updated_at",
    "notes",
];

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.ffffffZ`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn encoding_error(err: impl std::fmt::Display) -> TrackerError {
    TrackerError::persistence("<csv>", std::io::Error::other(err.to_string()))
}

/// Serialize incidents as a CSV document (header always present)
pub fn to_csv<'a, I>(incidents: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS).map_err(encoding_error)?;

    for incident in incidents {
        let created_at = format_timestamp(&incident.created_at);
        let updated_at = format_timestamp(&incident.updated_at);
        let id = incident.id.to_string();
        writer
            .write_record([
                id.as_str(),
                incident.title.as_str(),
                incident.category.as_str(),
                incident.severity.as_str(),
                incident.phase.as_str(),
                incident.status.as_str(),
                incident.owner.as_deref().unwrap_or(""),
                created_at.as_str(),
                updated_at.as_str(),
                incident.notes.as_deref().unwrap_or(""),
            ])
            .map_err(encoding_error)?;
    }

    let bytes = writer.into_inner().map_err(encoding_error)?;
    String::from_utf8(bytes).map_err(encoding_error)
}

/// Write the CSV document to `path`, replacing any existing file atomically
pub fn write_csv<'a, I>(path: &Path, incidents: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Incident>,
{
    let incidents: Vec<&Incident> = incidents.into_iter().collect();
    let document = to_csv(incidents.iter().copied())?;
    write_atomic(path, document.as_bytes())?;
    Ok(incidents.len())
}
