use crate::model::{ShiftWindow, TeamId};
use crate::scheduler::SchedError;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Interface de stockage dont le moteur a besoin.
///
/// Les écritures se font entre `begin` et `commit`/`rollback`. L'implémentation
/// doit sérialiser deux imports concurrents sur le même `(team, year)`.
pub trait RotationStore {
    fn get(&self, team: &TeamId, year: i32, week: u32) -> anyhow::Result<Option<ShiftWindow>>;
    fn upsert(&mut self, window: ShiftWindow) -> anyhow::Result<()>;
    fn delete_all(&mut self, team: &TeamId, year: i32) -> anyhow::Result<()>;
    /// Fenêtres de `(team, year)` triées par numéro de semaine.
    fn list(&self, team: &TeamId, year: i32) -> anyhow::Result<Vec<ShiftWindow>>;
    /// Fenêtres telles que `start <= now < end`, toutes équipes si `team` vaut `None`.
    fn active_at(
        &self,
        now: DateTime<Utc>,
        team: Option<&TeamId>,
    ) -> anyhow::Result<Vec<ShiftWindow>>;

    fn begin(&mut self) -> anyhow::Result<()>;
    fn commit(&mut self) -> anyhow::Result<()>;
    fn rollback(&mut self) -> anyhow::Result<()>;
}

/// Exécute `f` dans une transaction : tout ou rien.
pub fn in_transaction<S, T, F>(store: &mut S, f: F) -> Result<T, SchedError>
where
    S: RotationStore + ?Sized,
    F: FnOnce(&mut S) -> Result<T, SchedError>,
{
    store.begin()?;
    let outcome = f(&mut *store).and_then(|value| {
        store.commit()?;
        Ok(value)
    });
    match outcome {
        Ok(value) => {
            tracing::trace!("transaction committed");
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(error = %err, "rolling back transaction");
            if let Err(rb) = store.rollback() {
                tracing::warn!(error = %rb, "rollback failed");
            }
            Err(err)
        }
    }
}

type WindowKey = (TeamId, i32, u32);

/// Stockage en mémoire, transactions par instantané.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    windows: BTreeMap<WindowKey, ShiftWindow>,
    snapshot: Option<BTreeMap<WindowKey, ShiftWindow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_windows<I: IntoIterator<Item = ShiftWindow>>(windows: I) -> Self {
        Self {
            windows: windows.into_iter().map(|w| (w.key(), w)).collect(),
            snapshot: None,
        }
    }

    /// Toutes les fenêtres, ordonnées par `(team, year, week)`.
    pub fn all(&self) -> Vec<ShiftWindow> {
        self.windows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn has_open_transaction(&self) -> bool {
        self.snapshot.is_some()
    }
}

impl RotationStore for MemoryStore {
    fn get(&self, team: &TeamId, year: i32, week: u32) -> anyhow::Result<Option<ShiftWindow>> {
        Ok(self.windows.get(&(team.clone(), year, week)).cloned())
    }

    fn upsert(&mut self, window: ShiftWindow) -> anyhow::Result<()> {
        self.windows.insert(window.key(), window);
        Ok(())
    }

    fn delete_all(&mut self, team: &TeamId, year: i32) -> anyhow::Result<()> {
        self.windows.retain(|(t, y, _), _| !(t == team && *y == year));
        Ok(())
    }

    fn list(&self, team: &TeamId, year: i32) -> anyhow::Result<Vec<ShiftWindow>> {
        Ok(self
            .windows
            .range((team.clone(), year, 0)..=(team.clone(), year, u32::MAX))
            .map(|(_, w)| w.clone())
            .collect())
    }

    fn active_at(
        &self,
        now: DateTime<Utc>,
        team: Option<&TeamId>,
    ) -> anyhow::Result<Vec<ShiftWindow>> {
        Ok(self
            .windows
            .values()
            .filter(|w| team.map_or(true, |t| &w.team_id == t))
            .filter(|w| w.covers(now))
            .cloned()
            .collect())
    }

    fn begin(&mut self) -> anyhow::Result<()> {
        if self.snapshot.is_some() {
            bail!("transaction already open");
        }
        self.snapshot = Some(self.windows.clone());
        Ok(())
    }

    fn commit(&mut self) -> anyhow::Result<()> {
        if self.snapshot.take().is_none() {
            bail!("commit without open transaction");
        }
        Ok(())
    }

    fn rollback(&mut self) -> anyhow::Result<()> {
        let Some(previous) = self.snapshot.take() else {
            bail!("rollback without open transaction");
        };
        self.windows = previous;
        Ok(())
    }
}

/// Stockage fichier JSON ; le fichier est réécrit atomiquement à chaque commit.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Ouvre le fichier ; un fichier absent donne un stockage vide.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let windows: Vec<ShiftWindow> = serde_json::from_slice(&data)
                .with_context(|| format!("parsing {}", path.display()))?;
            MemoryStore::from_windows(windows)
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn all(&self) -> Vec<ShiftWindow> {
        self.inner.all()
    }

    fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(&self.inner.all())?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

impl RotationStore for JsonStore {
    fn get(&self, team: &TeamId, year: i32, week: u32) -> anyhow::Result<Option<ShiftWindow>> {
        self.inner.get(team, year, week)
    }

    fn upsert(&mut self, window: ShiftWindow) -> anyhow::Result<()> {
        self.inner.upsert(window)
    }

    fn delete_all(&mut self, team: &TeamId, year: i32) -> anyhow::Result<()> {
        self.inner.delete_all(team, year)
    }

    fn list(&self, team: &TeamId, year: i32) -> anyhow::Result<Vec<ShiftWindow>> {
        self.inner.list(team, year)
    }

    fn active_at(
        &self,
        now: DateTime<Utc>,
        team: Option<&TeamId>,
    ) -> anyhow::Result<Vec<ShiftWindow>> {
        self.inner.active_at(now, team)
    }

    fn begin(&mut self) -> anyhow::Result<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> anyhow::Result<()> {
        // le fichier d'abord : en cas d'échec l'instantané reste disponible
        self.save()?;
        self.inner.commit()?;
        tracing::debug!(path = %self.path.display(), "rotation store saved");
        Ok(())
    }

    fn rollback(&mut self) -> anyhow::Result<()> {
        self.inner.rollback()
    }
}
