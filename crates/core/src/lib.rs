//! Core types and shared functionality for the appraiser roster search.
//!
//! This crate provides:
//! - Domain types (filters, pagination, records)
//! - Query cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod appraiser;
pub mod cache;
pub mod config;
pub mod error;

pub use appraiser::{AppraiserRecord, DEFAULT_PAGE_SIZE, FilterField, Page, SearchFilters};
pub use cache::{CacheDb, QueryCacheMeta, compute_query_key};
pub use config::{AppConfig, ConfigError, MAX_CACHE_TTL_SECS};
pub use error::Error;
