mod assignment;
mod mutate;
mod types;
mod util;

pub use types::{SchedError, WeekCost};
pub use util::assignment_counts;

use crate::config::RotationConfig;
use crate::holiday::HolidayIndex;
use crate::model::{Assignee, Roster, ShiftWindow, TeamId};
use crate::storage::RotationStore;
use crate::week::{self, WeekAnchor};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Scheduler : contexte de rotation (fuseau + ancrage) possédé par l'appelant
#[derive(Debug, Clone)]
pub struct Scheduler {
    tz: Tz,
    anchor: WeekAnchor,
}

impl Scheduler {
    pub fn new(config: &RotationConfig) -> Result<Self, SchedError> {
        Ok(Self {
            tz: config.tz()?,
            anchor: config.anchor(),
        })
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }
    pub fn anchor(&self) -> WeekAnchor {
        self.anchor
    }

    pub fn week_window(
        &self,
        year: i32,
        week_number: u32,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedError> {
        week::window(year, week_number, self.tz, self.anchor)
    }

    pub fn weeks_in_year(&self, year: i32) -> Result<u32, SchedError> {
        week::weeks_in_year(year, self.anchor)
    }

    /// Construit la fenêtre d'une semaine donnée pour un membre.
    pub fn build_window(
        &self,
        team: &TeamId,
        year: i32,
        week_number: u32,
        assignee: &Assignee,
    ) -> Result<ShiftWindow, SchedError> {
        let (start_instant, end_instant) = self.week_window(year, week_number)?;
        Ok(ShiftWindow {
            team_id: team.clone(),
            year,
            week_number,
            assignee_name: assignee.name.clone(),
            assignee_phone: assignee.phone.clone(),
            start_instant,
            end_instant,
        })
    }

    /// Coût férié de chaque semaine de l'année, dans l'ordre des semaines.
    pub fn week_costs(
        &self,
        year: i32,
        holidays: &HolidayIndex,
    ) -> Result<Vec<WeekCost>, SchedError> {
        (1..=self.weeks_in_year(year)?)
            .map(|week_number| {
                let (start, end) = self.week_window(year, week_number)?;
                Ok(WeekCost {
                    week_number,
                    holiday_day_count: holidays.cost(start, end, self.tz),
                })
            })
            .collect()
    }

    /// Génère l'année complète, triée par semaine.
    ///
    /// Les semaines les plus chargées en fériés sont distribuées en premier,
    /// chacune au membre le moins servi (ordre du roster en cas d'égalité).
    pub fn generate(
        &self,
        team: &TeamId,
        year: i32,
        roster: &Roster,
        holidays: &HolidayIndex,
    ) -> Result<Vec<ShiftWindow>, SchedError> {
        assignment::generate(self, team, year, roster, holidays)
    }

    /// Échange les titulaires de deux semaines stockées.
    pub fn swap_weeks<S: RotationStore + ?Sized>(
        &self,
        store: &mut S,
        team: &TeamId,
        year: i32,
        week_a: u32,
        week_b: u32,
    ) -> Result<(), SchedError> {
        mutate::swap_weeks(store, team, year, week_a, week_b)
    }
}
