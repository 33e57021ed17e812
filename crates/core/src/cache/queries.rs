//! Query result cache operations.
//!
//! Each row holds the full accumulated record list for one filter set,
//! serialized as JSON, with an absolute expiry timestamp.

use super::connection::CacheDb;
use crate::Error;
use chrono::{Datelike, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// Cached query metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCacheMeta {
    pub filters_json: String,
    pub record_count: i64,
    pub fetched_at: String,
    pub expires_at: String,
}

/// Fixed-width RFC 3339 so stored timestamps compare correctly as text.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl CacheDb {
    /// Get the cached records JSON for a query key.
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub async fn get_query(&self, key_hash: &str) -> Result<Option<String>, Error> {
        let key_hash = key_hash.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT records_json FROM query_cache WHERE key_hash = ?1 AND expires_at > ?2")?;

                let result = stmt.query_row(params![key_hash, now], |row| row.get(0));

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get query cache metadata by key, expired or not.
    pub async fn get_query_meta(&self, key_hash: &str) -> Result<Option<QueryCacheMeta>, Error> {
        let key_hash = key_hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<QueryCacheMeta>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT filters_json, record_count, fetched_at, expires_at FROM query_cache WHERE key_hash = ?1",
                )?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok(QueryCacheMeta {
                        filters_json: row.get(0)?,
                        record_count: row.get(1)?,
                        fetched_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                });

                match result {
                    Ok(meta) => Ok(Some(meta)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Check if a query cache entry exists and is fresh.
    pub async fn has_query(&self, key_hash: &str) -> Result<bool, Error> {
        let key_hash = key_hash.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let fresh: bool = conn
                    .query_row(
                        "SELECT EXISTS(
                        SELECT 1 FROM query_cache
                        WHERE key_hash = ?1
                        AND expires_at > ?2
                    )",
                        params![key_hash, now],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;

                Ok(fresh)
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace the cached records for a query.
    ///
    /// A non-positive `ttl_seconds` stores an entry that is already expired.
    pub async fn put_query(
        &self, key_hash: &str, filters_json: &str, records_json: &str, record_count: usize, ttl_seconds: i64,
    ) -> Result<(), Error> {
        let key_hash = key_hash.to_string();
        let filters_json = filters_json.to_string();
        let records_json = records_json.to_string();
        let record_count = record_count as i64;

        let now = Utc::now();
        // Five-digit years render with a sign and no longer sort as text.
        let expires_at = Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .filter(|at| at.year() <= 9999)
            .ok_or_else(|| Error::InvalidInput(format!("cache ttl out of range: {ttl_seconds}s")))?;
        let fetched_at = timestamp(now);
        let expires_at = timestamp(expires_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO query_cache (key_hash, filters_json, records_json, record_count, fetched_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        filters_json = excluded.filters_json,
                        records_json = excluded.records_json,
                        record_count = excluded.record_count,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![key_hash, filters_json, records_json, record_count, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired query cache entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_queries(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM query_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::super::connection::CacheDb;

    #[tokio::test]
    async fn test_put_and_get_query() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let records_json = r#"[{"firstname":"Paul"}]"#;

        db.put_query("key", r#"{"state":"AK"}"#, records_json, 1, 3600).await.unwrap();

        let retrieved = db.get_query("key").await.unwrap().unwrap();
        assert_eq!(retrieved, records_json);
        assert!(db.has_query("key").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_query() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.get_query("nonexistent").await.unwrap().is_none());
        assert!(!db.has_query("nonexistent").await.unwrap());
        assert!(db.get_query_meta("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_query_is_a_miss() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_query("stale", "{}", "[]", 0, -60).await.unwrap();

        assert!(db.get_query("stale").await.unwrap().is_none());
        assert!(!db.has_query("stale").await.unwrap());

        let meta = db.get_query_meta("stale").await.unwrap().unwrap();
        assert_eq!(meta.record_count, 0);
    }

    #[tokio::test]
    async fn test_purge_expired_queries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_query("expiring", "{}", "[]", 0, -60).await.unwrap();
        db.put_query("fresh", "{}", "[]", 0, 3600).await.unwrap();

        let deleted = db.purge_expired_queries().await.unwrap();
        assert_eq!(deleted, 1);
        assert!(db.get_query_meta("expiring").await.unwrap().is_none());
        assert!(db.get_query("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_query() {
        let db = CacheDb::open_in_memory().await.unwrap();

        db.put_query("upsert", "{}", r#"[{"old":1}]"#, 1, 3600).await.unwrap();
        db.put_query("upsert", "{}", r#"[{"new":2},{"new":3}]"#, 2, 3600).await.unwrap();

        let retrieved = db.get_query("upsert").await.unwrap().unwrap();
        assert_eq!(retrieved, r#"[{"new":2},{"new":3}]"#);
        let meta = db.get_query_meta("upsert").await.unwrap().unwrap();
        assert_eq!(meta.record_count, 2);
    }

    #[tokio::test]
    async fn test_put_query_ttl_out_of_range() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.put_query("forever", "{}", "[]", 0, i64::MAX).await;
        assert!(matches!(result, Err(crate::Error::InvalidInput(_))));
        assert!(db.get_query_meta("forever").await.unwrap().is_none());

        let result = db.put_query("past-9999", "{}", "[]", 0, 400_000_000_000).await;
        assert!(matches!(result, Err(crate::Error::InvalidInput(_))));
        assert!(db.get_query_meta("past-9999").await.unwrap().is_none());

        let ten_years = 10 * 365 * 24 * 60 * 60;
        db.put_query("long", "{}", "[]", 0, ten_years).await.unwrap();
        assert!(db.has_query("long").await.unwrap());
    }
}
