//! Import CSV d'une rotation, en mode manuel ou auto-généré.
//!
//! Toutes les lignes sont validées avant la première écriture ; les
//! écritures passent ensuite dans une seule transaction du stockage.

use crate::holiday::HolidayIndex;
use crate::io::CsvRow;
use crate::model::{Assignee, Roster, TeamId};
use crate::scheduler::{SchedError, Scheduler};
use crate::storage::{in_transaction, RotationStore};
use crate::week::MAX_WEEK;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const WEEK_COLUMNS: &[&str] = &["week", "week_number"];
const NAME_COLUMNS: &[&str] = &["name", "person_name"];
const PHONE_COLUMNS: &[&str] = &["phone", "phone_number"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Colonnes `week,name,phone` : seules les semaines présentes sont touchées.
    Manual,
    /// Colonnes `name,phone` : l'année est effacée puis régénérée.
    AutoGenerate,
}

impl FromStr for ImportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "auto" | "auto-generate" | "auto_generate" => Ok(Self::AutoGenerate),
            other => anyhow::bail!("unknown import mode: {other}"),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::AutoGenerate => f.write_str("auto"),
        }
    }
}

/// Affectation demandée par une ligne du mode manuel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualRow {
    pub week_number: u32,
    pub assignee: Assignee,
}

/// Bilan d'un import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub batch_id: Uuid,
    pub mode: ImportMode,
    pub created: usize,
    pub updated: usize,
    pub generated: usize,
}

impl ImportSummary {
    fn new(mode: ImportMode) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            mode,
            created: 0,
            updated: 0,
            generated: 0,
        }
    }
}

fn parse_assignee(row: &CsvRow) -> Result<Assignee, SchedError> {
    let name = row.get_any(NAME_COLUMNS).unwrap_or("");
    if name.is_empty() {
        return Err(SchedError::malformed(row.row, "missing or empty name"));
    }
    let phone = row.get_any(PHONE_COLUMNS).unwrap_or("");
    if phone.is_empty() {
        return Err(SchedError::malformed(row.row, "missing or empty phone"));
    }
    Ok(Assignee::new(name, phone))
}

/// Valide les lignes du mode manuel : semaine 1..=53, nom et téléphone non vides.
pub fn parse_manual_rows(rows: &[CsvRow]) -> Result<Vec<ManualRow>, SchedError> {
    rows.iter()
        .map(|row| {
            let raw = row.get_any(WEEK_COLUMNS).unwrap_or("");
            if raw.is_empty() {
                return Err(SchedError::malformed(row.row, "missing or empty week"));
            }
            let week_number: u32 = raw
                .parse()
                .map_err(|_| SchedError::malformed(row.row, format!("invalid week '{raw}'")))?;
            if !(1..=MAX_WEEK).contains(&week_number) {
                return Err(SchedError::malformed(
                    row.row,
                    format!("week {week_number} outside 1..={MAX_WEEK}"),
                ));
            }
            Ok(ManualRow {
                week_number,
                assignee: parse_assignee(row)?,
            })
        })
        .collect()
}

/// Construit le roster du mode auto, dans l'ordre des lignes.
pub fn parse_roster_rows(rows: &[CsvRow]) -> Result<Roster, SchedError> {
    let roster: Roster = rows
        .iter()
        .map(parse_assignee)
        .collect::<Result<_, _>>()?;
    if roster.is_empty() {
        return Err(SchedError::EmptyRoster);
    }
    Ok(roster)
}

/// Import CSV au-dessus d'un `Scheduler`.
#[derive(Debug, Clone, Copy)]
pub struct RotationImporter<'a> {
    scheduler: &'a Scheduler,
}

impl<'a> RotationImporter<'a> {
    pub fn new(scheduler: &'a Scheduler) -> Self {
        Self { scheduler }
    }

    pub fn import<S: RotationStore + ?Sized>(
        &self,
        store: &mut S,
        team: &TeamId,
        year: i32,
        mode: ImportMode,
        rows: &[CsvRow],
        holidays: &HolidayIndex,
    ) -> Result<ImportSummary, SchedError> {
        match mode {
            ImportMode::Manual => self.import_manual(store, team, year, rows),
            ImportMode::AutoGenerate => self.import_auto(store, team, year, rows, holidays),
        }
    }

    /// Upsert semaine par semaine ; les semaines absentes du fichier ne bougent pas.
    pub fn import_manual<S: RotationStore + ?Sized>(
        &self,
        store: &mut S,
        team: &TeamId,
        year: i32,
        rows: &[CsvRow],
    ) -> Result<ImportSummary, SchedError> {
        let requests = parse_manual_rows(rows)?;
        // intervalles recalculés à chaque import
        let windows = requests
            .iter()
            .map(|req| self.scheduler.build_window(team, year, req.week_number, &req.assignee))
            .collect::<Result<Vec<_>, _>>()?;

        let mut summary = ImportSummary::new(ImportMode::Manual);
        in_transaction(store, |store| {
            for window in windows {
                let existing = store.get(team, year, window.week_number)?;
                if existing.is_some() {
                    summary.updated += 1;
                } else {
                    summary.created += 1;
                }
                store.upsert(window)?;
            }
            Ok(())
        })?;

        tracing::debug!(
            batch = %summary.batch_id,
            team = %team,
            year,
            created = summary.created,
            updated = summary.updated,
            "manual rotation import applied"
        );
        Ok(summary)
    }

    /// Remplace toute l'année par une génération à partir du roster du fichier.
    pub fn import_auto<S: RotationStore + ?Sized>(
        &self,
        store: &mut S,
        team: &TeamId,
        year: i32,
        rows: &[CsvRow],
        holidays: &HolidayIndex,
    ) -> Result<ImportSummary, SchedError> {
        let roster = parse_roster_rows(rows)?;
        let windows = self.scheduler.generate(team, year, &roster, holidays)?;

        let mut summary = ImportSummary::new(ImportMode::AutoGenerate);
        summary.generated = windows.len();
        in_transaction(store, |store| {
            store.delete_all(team, year)?;
            for window in windows {
                store.upsert(window)?;
            }
            Ok(())
        })?;

        tracing::debug!(
            batch = %summary.batch_id,
            team = %team,
            year,
            generated = summary.generated,
            members = roster.len(),
            "rotation regenerated from roster"
        );
        Ok(summary)
    }
}
