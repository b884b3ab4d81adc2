use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant opaque d'équipe (fourni par l'appelant)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(String);

impl TeamId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Membre d'astreinte tel que fourni dans un roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
    pub phone: String,
}

impl Assignee {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, phone: P) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// Liste ordonnée des membres ; l'ordre sert de départage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roster {
    pub members: Vec<Assignee>,
}

impl Roster {
    pub fn new(members: Vec<Assignee>) -> Self {
        Self { members }
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
}

impl FromIterator<Assignee> for Roster {
    fn from_iter<I: IntoIterator<Item = Assignee>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Astreinte d'une semaine, intervalle UTC `[start_instant, end_instant)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub team_id: TeamId,
    pub year: i32,
    pub week_number: u32,
    pub assignee_name: String,
    pub assignee_phone: String,
    pub start_instant: DateTime<Utc>,
    pub end_instant: DateTime<Utc>,
}

impl ShiftWindow {
    /// Vrai si `at` tombe dans la fenêtre (borne de fin exclue).
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.start_instant <= at && at < self.end_instant
    }

    /// Durée UTC en heures (167, 168 ou 169 selon l'heure d'été).
    pub fn duration_hours(&self) -> i64 {
        (self.end_instant - self.start_instant).num_hours()
    }

    pub fn key(&self) -> (TeamId, i32, u32) {
        (self.team_id.clone(), self.year, self.week_number)
    }
}
