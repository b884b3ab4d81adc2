use super::SchedError;
use crate::model::{ShiftWindow, TeamId};
use crate::storage::{in_transaction, RotationStore};
use crate::week::MAX_WEEK;

pub(super) fn swap_weeks<S: RotationStore + ?Sized>(
    store: &mut S,
    team: &TeamId,
    year: i32,
    week_a: u32,
    week_b: u32,
) -> Result<(), SchedError> {
    for week in [week_a, week_b] {
        if !(1..=MAX_WEEK).contains(&week) {
            return Err(SchedError::InvalidWeekNumber(week));
        }
    }
    if week_a == week_b {
        return Ok(());
    }

    in_transaction(store, |store| {
        let a = fetch(store, team, year, week_a)?;
        let b = fetch(store, team, year, week_b)?;

        // les intervalles restent attachés à la semaine
        let swapped_a = ShiftWindow {
            assignee_name: b.assignee_name.clone(),
            assignee_phone: b.assignee_phone.clone(),
            ..a.clone()
        };
        let swapped_b = ShiftWindow {
            assignee_name: a.assignee_name,
            assignee_phone: a.assignee_phone,
            ..b
        };
        store.upsert(swapped_a)?;
        store.upsert(swapped_b)?;
        Ok(())
    })?;

    tracing::debug!(team = %team, year, week_a, week_b, "weeks swapped");
    Ok(())
}

fn fetch<S: RotationStore + ?Sized>(
    store: &S,
    team: &TeamId,
    year: i32,
    week: u32,
) -> Result<ShiftWindow, SchedError> {
    store
        .get(team, year, week)?
        .ok_or_else(|| SchedError::UnknownWeek {
            team: team.as_str().to_string(),
            year,
            week,
        })
}
