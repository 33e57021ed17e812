//! Cache schema versioning.
//!
//! The schema version lives in SQLite's `user_version` header field. Each
//! step is applied in its own transaction together with the version bump.

use super::Error;
use tokio_rusqlite::Connection;
use tokio_rusqlite::rusqlite::Transaction;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Ordered schema steps. Versions are consecutive starting at 1.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "query_cache",
    sql: include_str!("../../migrations/001_query_cache.sql"),
}];

/// Schema version this build writes.
pub const SCHEMA_VERSION: i64 = MIGRATIONS[MIGRATIONS.len() - 1].version;

/// Bring the cache schema up to [`SCHEMA_VERSION`].
///
/// # Errors
///
/// `MigrationFailed` when the file was written by a newer build, `Database`
/// when a step fails. A failed step leaves the previous version in place.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let current: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if current > SCHEMA_VERSION {
            return Err(Error::MigrationFailed(format!(
                "cache schema version {current} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        for step in MIGRATIONS.iter().filter(|m| m.version > current) {
            let tx = conn.transaction()?;
            apply(&tx, step)?;
            tx.commit()?;
            tracing::debug!(version = step.version, name = step.name, "cache schema upgraded");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

fn apply(tx: &Transaction<'_>, step: &Migration) -> Result<(), Error> {
    tx.execute_batch(step.sql)
        .map_err(|e| Error::MigrationFailed(format!("step {} ({}): {e}", step.version, step.name)))?;
    tx.pragma_update(None, "user_version", step.version)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user_version(conn: &Connection) -> i64 {
        conn.call(|conn| conn.pragma_query_value(None, "user_version", |row| row.get::<_, i64>(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_reaches_schema_version() {
        let conn = Connection::open_in_memory().await.unwrap();
        assert_eq!(user_version(&conn).await, 0);

        run(&conn).await.unwrap();
        assert_eq!(user_version(&conn).await, SCHEMA_VERSION);

        let has_expiry_index: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = 'idx_query_cache_expires_at')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert!(has_expiry_index);
    }

    #[tokio::test]
    async fn test_rerun_keeps_cached_rows() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        conn.call(|conn| {
            conn.execute(
                "INSERT INTO query_cache VALUES ('k', '{}', '[]', 0, '2026-01-01T00:00:00.000Z', '2026-01-01T01:00:00.000Z')",
                [],
            )
        })
        .await
        .unwrap();

        run(&conn).await.unwrap();

        let rows: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM query_cache", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(user_version(&conn).await, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().await.unwrap();
        conn.call(|conn| conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1))
            .await
            .unwrap();

        let err = run(&conn).await.unwrap_err();
        assert!(matches!(err, Error::MigrationFailed(ref msg) if msg.contains("newer")));
    }
}
