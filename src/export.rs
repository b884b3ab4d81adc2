use crate::config::parse_timezone;
use crate::model::ShiftWindow;
use crate::scheduler::SchedError;
use crate::week::to_local;
use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const CSV_HEADER: [&str; 5] = ["Week", "Name", "Phone", "Start Time", "End Time"];
const CSV_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(SchedError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Élément de l'export JSON (horodatages ISO-8601 locaux).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub week_number: u32,
    pub year: i32,
    pub person_name: String,
    pub phone_number: String,
    pub start_time: String,
    pub end_time: String,
}

impl ExportRecord {
    pub fn from_window(window: &ShiftWindow, tz: Tz) -> Self {
        Self {
            week_number: window.week_number,
            year: window.year,
            person_name: window.assignee_name.clone(),
            phone_number: window.assignee_phone.clone(),
            start_time: to_local(window.start_instant, tz).to_rfc3339(),
            end_time: to_local(window.end_instant, tz).to_rfc3339(),
        }
    }
}

/// Sérialise les fenêtres dans `format` (`json` ou `csv`), heures locales à `timezone_name`.
pub fn export(
    windows: &[ShiftWindow],
    timezone_name: &str,
    format: &str,
) -> Result<Vec<u8>, SchedError> {
    let format: ExportFormat = format.parse()?;
    let tz = parse_timezone(timezone_name)?;
    export_as(windows, tz, format)
}

pub fn export_as(
    windows: &[ShiftWindow],
    tz: Tz,
    format: ExportFormat,
) -> Result<Vec<u8>, SchedError> {
    match format {
        ExportFormat::Json => export_json(windows, tz),
        ExportFormat::Csv => export_csv(windows, tz),
    }
}

fn export_json(windows: &[ShiftWindow], tz: Tz) -> Result<Vec<u8>, SchedError> {
    let records: Vec<ExportRecord> = windows
        .iter()
        .map(|w| ExportRecord::from_window(w, tz))
        .collect();
    let json = serde_json::to_vec_pretty(&records).context("serializing schedule")?;
    Ok(json)
}

fn export_csv(windows: &[ShiftWindow], tz: Tz) -> Result<Vec<u8>, SchedError> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    w.write_record(CSV_HEADER).context("writing csv header")?;
    for s in windows {
        let week = s.week_number.to_string();
        let start = to_local(s.start_instant, tz).format(CSV_TIME_FORMAT).to_string();
        let end = to_local(s.end_instant, tz).format(CSV_TIME_FORMAT).to_string();
        w.write_record([
            week.as_str(),
            s.assignee_name.as_str(),
            s.assignee_phone.as_str(),
            start.as_str(),
            end.as_str(),
        ])
        .context("writing csv row")?;
    }
    let bytes = w
        .into_inner()
        .map_err(|e| anyhow!("flushing csv: {}", e.error()))?;
    Ok(bytes)
}

pub fn export_to_path<P: AsRef<Path>>(
    path: P,
    windows: &[ShiftWindow],
    tz: Tz,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let bytes = export_as(windows, tz, format)?;
    fs::write(path.as_ref(), bytes)
        .with_context(|| format!("writing {}", path.as_ref().display()))?;
    Ok(())
}
