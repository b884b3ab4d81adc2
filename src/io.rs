use crate::holiday::HolidaySource;
use crate::scheduler::SchedError;
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Ligne CSV : colonnes nommées par l'en-tête (minuscules, sans espaces).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvRow {
    /// Numéro de ligne de données, à partir de 1 (en-tête exclu).
    pub row: usize,
    pub fields: BTreeMap<String, String>,
}

impl CsvRow {
    pub fn new(row: usize, fields: BTreeMap<String, String>) -> Self {
        Self { row, fields }
    }

    /// Première colonne présente parmi `names`, valeur rognée.
    pub fn get_any(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|n| self.fields.get(*n))
            .map(|v| v.trim())
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

/// Lit toutes les lignes ; l'en-tête est obligatoire.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>, SchedError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| SchedError::malformed(0, format!("unreadable header: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(SchedError::malformed(0, "missing header row"));
    }

    let mut out = Vec::new();
    let mut record = StringRecord::new();
    let mut row = 0usize;
    loop {
        row += 1;
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(SchedError::malformed(row, e.to_string())),
        }
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        let fields = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| !h.is_empty())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        out.push(CsvRow::new(row, fields));
    }
    Ok(out)
}

pub fn read_rows_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<CsvRow>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(read_rows(file)?)
}

/// Jours fériés lus depuis un CSV : header `date[,name]`, dates `YYYY-MM-DD`.
#[derive(Debug, Clone, Default)]
pub struct CsvHolidays {
    dates: BTreeSet<NaiveDate>,
}

impl CsvHolidays {
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut dates = BTreeSet::new();
        for row in read_rows(reader)? {
            let Some(raw) = row.get_any(&["date", "holiday_date"]) else {
                bail!("holiday row {} has no date column", row.row);
            };
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid holiday date on row {}: {raw}", row.row))?;
            dates.insert(date);
        }
        Ok(Self { dates })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(file)
    }

}

impl HolidaySource for CsvHolidays {
    fn dates_in_year(&self, year: i32) -> anyhow::Result<BTreeSet<NaiveDate>> {
        Ok(self
            .dates
            .iter()
            .filter(|d| d.year() == year)
            .copied()
            .collect())
    }
}
