#![forbid(unsafe_code)]
//! Oncall-rota : moteur de rotation d'astreinte hebdomadaire.
//!
//! - Fenêtres `(année, semaine)` -> intervalle UTC, stables aux changements d'heure.
//! - Génération annuelle équitable pondérée par les jours fériés.
//! - Import CSV manuel (par semaine) ou auto-généré (année entière), tout ou rien.
//! - Résolution de l'astreinte courante, export JSON/CSV en heure locale.
//! - Stockage derrière le trait `RotationStore` (mémoire ou fichier JSON).

pub mod config;
pub mod export;
pub mod holiday;
pub mod importer;
pub mod io;
pub mod model;
pub mod resolver;
pub mod scheduler;
pub mod storage;
pub mod week;

pub use config::RotationConfig;
pub use export::{export, export_as, ExportFormat, ExportRecord};
pub use holiday::{HolidayIndex, HolidaySource, StaticHolidays};
pub use importer::{ImportMode, ImportSummary, RotationImporter};
pub use io::{read_rows, CsvHolidays, CsvRow};
pub use model::{Assignee, Roster, ShiftWindow, TeamId};
pub use resolver::{find_active, find_active_for_team};
pub use scheduler::{assignment_counts, SchedError, Scheduler, WeekCost};
pub use storage::{in_transaction, JsonStore, MemoryStore, RotationStore};
pub use week::{compute, WeekAnchor};
