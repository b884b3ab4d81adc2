use thiserror::Error;

/// Coût d'une semaine : nombre de jours fériés qu'elle contient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCost {
    pub week_number: u32,
    pub holiday_day_count: usize,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid week number {0}: expected 1..=53")]
    InvalidWeekNumber(u32),
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    #[error("roster is empty")]
    EmptyRoster,
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("no stored window for team {team}, year {year}, week {week}")]
    UnknownWeek { team: String, year: i32, week: u32 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedError {
    pub(crate) fn malformed<S: Into<String>>(row: usize, reason: S) -> Self {
        Self::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}
