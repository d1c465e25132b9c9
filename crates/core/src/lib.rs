//! Core library for scorecard
//!
//! This crate implements the **Functional Core** of the scorecard application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The scorecard project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`scorecard_core`** (this crate): Pure transformation functions with zero I/O
//! - **`scorecard`**: HTTP fetches, console prompts, the web service (the Imperative Shell)
//!
//! Every function here is deterministic: the same criteria always build the same
//! query, and the same document always shapes into the same records. Tests use
//! fixture JSON, no mocking required.
//!
//! # Module Organization
//!
//! - [`field`]: Dotted-path access into untyped JSON with absent/null distinction
//! - [`query`]: Search criteria normalization and `schools.json` query construction
//! - [`results`]: Response shaping and program title filtering
//! - [`currency`]: Dollar formatting for console output
//!
//! # Example Usage
//!
//! ```rust
//! use scorecard_core::query::{build_query, SearchCriteria};
//! use scorecard_core::results::shape_results;
//!
//! let criteria = SearchCriteria::new(Some("wa"), None, Some("Nursing"));
//! let query = build_query(&criteria, "DEMO_KEY");
//! assert!(query.url().contains("school.state=WA"));
//!
//! let document = serde_json::json!({"results": []});
//! let shaped = shape_results(&document, criteria.program_title_filter());
//! assert!(shaped.records.is_empty());
//! ```

pub mod currency;
pub mod field;
pub mod query;
pub mod results;
