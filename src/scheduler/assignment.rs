use super::{util, SchedError, Scheduler, WeekCost};
use crate::holiday::HolidayIndex;
use crate::model::{Roster, ShiftWindow, TeamId};
use std::collections::HashMap;

pub(super) fn generate(
    scheduler: &Scheduler,
    team: &TeamId,
    year: i32,
    roster: &Roster,
    holidays: &HolidayIndex,
) -> Result<Vec<ShiftWindow>, SchedError> {
    if roster.is_empty() {
        return Err(SchedError::EmptyRoster);
    }

    let mut costs: Vec<WeekCost> = scheduler.week_costs(year, holidays)?;
    costs.sort_by(|a, b| {
        b.holiday_day_count
            .cmp(&a.holiday_day_count)
            .then(a.week_number.cmp(&b.week_number))
    });

    // tally par nom, durée de vie = une génération
    let mut tally: HashMap<&str, usize> = HashMap::with_capacity(roster.len());
    let mut out = Vec::with_capacity(costs.len());

    for cost in &costs {
        let member = util::least_loaded(&roster.members, &tally);
        *tally.entry(member.name.as_str()).or_insert(0) += 1;
        out.push(scheduler.build_window(team, year, cost.week_number, member)?);
    }

    out.sort_by_key(|w| w.week_number);

    tracing::debug!(
        team = %team,
        year,
        weeks = out.len(),
        members = roster.len(),
        holiday_weeks = costs.iter().filter(|c| c.holiday_day_count > 0).count(),
        "schedule generated"
    );
    Ok(out)
}
