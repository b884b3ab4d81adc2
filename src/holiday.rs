use crate::config::parse_timezone;
use crate::scheduler::SchedError;
use crate::week::to_local;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::BTreeSet;

/// Source externe de jours fériés.
pub trait HolidaySource {
    fn dates_in_year(&self, year: i32) -> anyhow::Result<BTreeSet<NaiveDate>>;
}

/// Jours fériés fournis en mémoire.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    dates: BTreeSet<NaiveDate>,
}

impl StaticHolidays {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

impl HolidaySource for StaticHolidays {
    fn dates_in_year(&self, year: i32) -> anyhow::Result<BTreeSet<NaiveDate>> {
        use chrono::Datelike;
        Ok(self
            .dates
            .iter()
            .filter(|d| d.year() == year)
            .copied()
            .collect())
    }
}

/// Ensemble de dates servant à pondérer les semaines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayIndex {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayIndex {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Index pour une génération annuelle : les semaines de bord débordent
    /// sur l'année précédente et la suivante.
    pub fn for_year<S: HolidaySource + ?Sized>(source: &S, year: i32) -> anyhow::Result<Self> {
        let mut dates = BTreeSet::new();
        for y in (year - 1)..=(year + 1) {
            dates.extend(source.dates_in_year(y)?);
        }
        Ok(Self { dates })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Nombre de fériés dont le minuit local tombe dans `[week_start, week_end)`.
    pub fn cost(&self, week_start: DateTime<Utc>, week_end: DateTime<Utc>, tz: Tz) -> usize {
        let start = to_local(week_start, tz).naive_local();
        let end = to_local(week_end, tz).naive_local();
        self.dates
            .range(start.date()..=end.date())
            .filter_map(|d| d.and_hms_opt(0, 0, 0))
            .filter(|midnight| start <= *midnight && *midnight < end)
            .count()
    }

    /// Variante avec fuseau nommé.
    pub fn cost_in_zone(
        &self,
        week_start: DateTime<Utc>,
        week_end: DateTime<Utc>,
        timezone_name: &str,
    ) -> Result<usize, SchedError> {
        let tz = parse_timezone(timezone_name)?;
        Ok(self.cost(week_start, week_end, tz))
    }
}
