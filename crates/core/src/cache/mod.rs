//! SQLite-backed cache for roster query results.
//!
//! This module provides a persistent, key-value cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Keys derived from the query filters using SHA-256
//! - TTL-bounded entries with an absolute expiry timestamp
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod queries;

pub use crate::Error;

pub use connection::CacheDb;
pub use hash::compute_query_key;
pub use queries::QueryCacheMeta;
