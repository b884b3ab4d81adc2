use crate::scheduler::SchedError;
use crate::week::WeekAnchor;
use anyhow::Context;
use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Paramètres de rotation : fuseau et point d'ancrage hebdomadaire.
///
/// Fichier JSON, tous les champs sont optionnels :
/// `{"timezone": "Europe/Paris", "anchor_weekday": "Mon", "anchor_time": "09:00:00"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub timezone: String,
    pub anchor_weekday: Weekday,
    pub anchor_time: NaiveTime,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            anchor_weekday: Weekday::Fri,
            anchor_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }
}

impl RotationConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let config: RotationConfig = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Résout le fuseau IANA.
    pub fn tz(&self) -> Result<Tz, SchedError> {
        parse_timezone(&self.timezone)
    }

    pub fn anchor(&self) -> WeekAnchor {
        WeekAnchor::new(self.anchor_weekday, self.anchor_time)
    }

    pub fn validate(&self) -> Result<(), SchedError> {
        self.tz().map(|_| ())
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, SchedError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SchedError::InvalidTimezone(name.to_string()))
}

/// Accepte `HH:MM` ou `HH:MM:SS`.
pub fn parse_anchor_time(raw: &str) -> anyhow::Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .with_context(|| format!("invalid anchor time: {raw}"))
}
