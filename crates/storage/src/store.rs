use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, info};

use swim_core::defaults::default_standards;
use swim_core::models::{Competition, QualifyingStandards, Swimmer};

use crate::error::Result;
use crate::migrations::{MigrationReport, RawSnapshot, SCHEMA_VERSION, migrate};
use crate::repository::snapshot::{SnapshotKey, SnapshotRepository, remove, upsert};
use crate::state::AppState;

/// Loads and saves the whole application state as JSON snapshots.
pub struct SnapshotStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SnapshotStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load_raw(&self) -> Result<RawSnapshot> {
        let repo = SnapshotRepository::new(self.pool);
        Ok(RawSnapshot {
            swimmers: repo.get_json::<Value>(SnapshotKey::Swimmers).await?,
            legacy_swimmer: repo.get_json::<Value>(SnapshotKey::LegacySwimmer).await?,
            competitions: repo.get_json::<Value>(SnapshotKey::Competitions).await?,
            standards: repo.get_json::<Value>(SnapshotKey::Standards).await?,
            session: repo
                .get(SnapshotKey::Session)
                .await?
                .filter(|id| !id.is_empty()),
            schema_version: repo.get_json::<i64>(SnapshotKey::SchemaVersion).await?,
        })
    }

    /// Reads every snapshot, migrates older shapes and decodes the result.
    /// When a migration ran, the migrated state is written back straight away.
    pub async fn load(&self) -> Result<(AppState, MigrationReport)> {
        let (raw, report) = migrate(self.load_raw().await?);

        let swimmers: Vec<Swimmer> = decode_or_default(raw.swimmers)?;
        let competitions: Vec<Competition> = decode_or_default(raw.competitions)?;
        let standards: QualifyingStandards = match raw.standards {
            Some(value) => serde_json::from_value(value)?,
            None => default_standards(),
        };

        let state = AppState::from_parts(swimmers, competitions, standards, raw.session);
        debug!(
            swimmers = state.swimmers().len(),
            competitions = state.competitions().len(),
            "Loaded state"
        );

        if !report.is_empty() {
            info!(applied = ?report.applied, from = ?report.from_version, "Applied shape migrations");
            self.save(&state).await?;
        }
        Ok((state, report))
    }

    /// Writes every snapshot in one transaction and drops the legacy key.
    pub async fn save(&self, state: &AppState) -> Result<()> {
        let swimmers = serde_json::to_string(state.swimmers())?;
        let competitions = serde_json::to_string(state.competitions())?;
        let standards = serde_json::to_string(state.standards())?;

        let mut tx = self.pool.begin().await?;

        upsert(&mut *tx, SnapshotKey::Swimmers, &swimmers).await?;
        upsert(&mut *tx, SnapshotKey::Competitions, &competitions).await?;
        upsert(&mut *tx, SnapshotKey::Standards, &standards).await?;
        match state.session_id() {
            Some(id) => upsert(&mut *tx, SnapshotKey::Session, id).await?,
            None => {
                remove(&mut *tx, SnapshotKey::Session).await?;
            }
        }
        upsert(&mut *tx, SnapshotKey::SchemaVersion, &SCHEMA_VERSION.to_string()).await?;
        remove(&mut *tx, SnapshotKey::LegacySwimmer).await?;

        tx.commit().await?;
        debug!("Saved state");
        Ok(())
    }
}

fn decode_or_default<T: serde::de::DeserializeOwned + Default>(value: Option<Value>) -> Result<T> {
    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}
