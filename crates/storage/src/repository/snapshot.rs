use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::Result;

/// Fixed keys of the snapshot store. The string values match the keys the
/// browser build wrote to local storage, so exported data can be loaded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Swimmers,
    Competitions,
    Standards,
    Session,
    /// Single-swimmer blob written before multi-swimmer support.
    LegacySwimmer,
    SchemaVersion,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 6] = [
        SnapshotKey::Swimmers,
        SnapshotKey::Competitions,
        SnapshotKey::Standards,
        SnapshotKey::Session,
        SnapshotKey::LegacySwimmer,
        SnapshotKey::SchemaVersion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKey::Swimmers => "swimSwimmers",
            SnapshotKey::Competitions => "swimCompetitions",
            SnapshotKey::Standards => "swimStandards",
            SnapshotKey::Session => "swimSession",
            SnapshotKey::LegacySwimmer => "swimData",
            SnapshotKey::SchemaVersion => "schemaVersion",
        }
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct SnapshotRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SnapshotRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Raw text stored under a key
    pub async fn get(&self, key: SnapshotKey) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM snapshots WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(self.pool)
            .await?;

        Ok(value)
    }

    /// Stored JSON decoded into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, key: SnapshotKey) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    pub async fn put(&self, key: SnapshotKey, value: &str) -> Result<()> {
        upsert(self.pool, key, value).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, key: SnapshotKey, value: &T) -> Result<()> {
        upsert(self.pool, key, &serde_json::to_string(value)?).await
    }

    /// Returns true if a row was deleted
    pub async fn delete(&self, key: SnapshotKey) -> Result<bool> {
        remove(self.pool, key).await
    }

    pub async fn updated_at(&self, key: SnapshotKey) -> Result<Option<DateTime<Utc>>> {
        let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT updated_at FROM snapshots WHERE key = ?",
        )
        .bind(key.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(updated_at)
    }
}

/// Insert or replace one snapshot. Accepts a pool or an open transaction.
pub async fn upsert<'e, E>(executor: E, key: SnapshotKey, value: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO snapshots (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT (key)
        DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key.as_str())
    .bind(value)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn remove<'e, E>(executor: E, key: SnapshotKey) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM snapshots WHERE key = ?")
        .bind(key.as_str())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    #[tokio::test]
    async fn test_put_get_delete() {
        let pool = connect_in_memory().await.unwrap();
        let repo = SnapshotRepository::new(&pool);

        assert_eq!(repo.get(SnapshotKey::Session).await.unwrap(), None);

        repo.put(SnapshotKey::Session, "swimmer-1").await.unwrap();
        assert_eq!(
            repo.get(SnapshotKey::Session).await.unwrap().as_deref(),
            Some("swimmer-1")
        );
        assert!(repo.updated_at(SnapshotKey::Session).await.unwrap().is_some());

        repo.put(SnapshotKey::Session, "swimmer-2").await.unwrap();
        assert_eq!(
            repo.get(SnapshotKey::Session).await.unwrap().as_deref(),
            Some("swimmer-2")
        );

        assert!(repo.delete(SnapshotKey::Session).await.unwrap());
        assert!(!repo.delete(SnapshotKey::Session).await.unwrap());
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let pool = connect_in_memory().await.unwrap();
        let repo = SnapshotRepository::new(&pool);

        repo.put_json(SnapshotKey::SchemaVersion, &1_i64).await.unwrap();
        let version: Option<i64> = repo.get_json(SnapshotKey::SchemaVersion).await.unwrap();
        assert_eq!(version, Some(1));
    }

    #[test]
    fn test_keys_match_local_storage_names() {
        let names: Vec<&str> = SnapshotKey::ALL.iter().map(|key| key.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "swimSwimmers",
                "swimCompetitions",
                "swimStandards",
                "swimSession",
                "swimData",
                "schemaVersion"
            ]
        );
    }
}
