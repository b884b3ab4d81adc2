use crate::model::{Assignee, ShiftWindow};
use std::collections::HashMap;

/// Membre au plus petit compteur ; le premier listé gagne les égalités.
///
/// `members` ne doit pas être vide.
pub(super) fn least_loaded<'a>(
    members: &'a [Assignee],
    tally: &HashMap<&str, usize>,
) -> &'a Assignee {
    let mut best = &members[0];
    let mut best_count = tally.get(best.name.as_str()).copied().unwrap_or(0);
    for member in members.iter().skip(1) {
        let count = tally.get(member.name.as_str()).copied().unwrap_or(0);
        if count < best_count {
            best = member;
            best_count = count;
        }
    }
    best
}

/// Nombre de semaines par titulaire, dans l'ordre de première apparition.
pub fn assignment_counts(windows: &[ShiftWindow]) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    for w in windows {
        match order.iter_mut().find(|(name, _)| *name == w.assignee_name) {
            Some((_, count)) => *count += 1,
            None => order.push((w.assignee_name.clone(), 1)),
        }
    }
    order
}
