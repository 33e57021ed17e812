//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-appraisers server.

pub mod appraiser_search;
pub mod cache;

pub use appraiser_search::{AppraiserSearchParams, FilterParams};
