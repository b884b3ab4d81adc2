use crate::model::{ShiftWindow, TeamId};
use crate::scheduler::SchedError;
use crate::storage::RotationStore;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Astreintes actives à `now`, au plus une par équipe, triées par équipe.
///
/// Un résultat vide signifie « personne d'astreinte », ce n'est pas une erreur.
/// Si deux fenêtres d'années voisines se recouvrent, le début le plus tardif
/// l'emporte, puis l'année la plus récente à début égal.
pub fn find_active<S: RotationStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
    team: Option<&TeamId>,
) -> Result<Vec<ShiftWindow>, SchedError> {
    let mut per_team: BTreeMap<TeamId, ShiftWindow> = BTreeMap::new();
    for window in store.active_at(now, team)? {
        if !window.covers(now) {
            continue;
        }
        let newer = per_team.get(&window.team_id).map_or(true, |current| {
            (window.start_instant, window.year) > (current.start_instant, current.year)
        });
        if newer {
            per_team.insert(window.team_id.clone(), window);
        }
    }
    Ok(per_team.into_values().collect())
}

/// Astreinte active d'une équipe, `None` si personne.
pub fn find_active_for_team<S: RotationStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
    team: &TeamId,
) -> Result<Option<ShiftWindow>, SchedError> {
    Ok(find_active(store, now, Some(team))?.into_iter().next())
}
