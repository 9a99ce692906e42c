//! # Habesha Ingest
//!
//! A batch discovery pipeline for Habesha (Ethiopian/Eritrean) points of
//! interest. Each run queries the Google Places API across a curated list
//! of cities and category query terms, scores every candidate for cultural
//! relevance with an auditable reason trail, and merges the results into
//! one or more persistent keyed stores so that repeated runs accumulate
//! evidence instead of overwriting it.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────┐   ┌──────────┐   ┌────────┐   ┌───────┐   ┌──────────────┐
//! │ Cities │──▶│ Resolver │──▶│ Search │──▶│ Score │──▶│ Merge + Store │
//! │ + Cats │   │ geocode  │   │ paged  │   │ 0-100 │   │ SQLite fanout │
//! └────────┘   └──────────┘   └────────┘   └───────┘   └──────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```bash
//! habi init                          # create destination stores
//! habi sources                       # check config health
//! habi ingest --dry-run              # count without writing
//! habi ingest --details --max-pages 2
//! habi stats
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and city/category file loading |
//! | [`models`] | Core data types |
//! | [`score`] | Relevance scoring |
//! | [`places`] | Places API client and trait seam |
//! | [`resolve`] | City-to-coordinates resolution |
//! | [`search`] | Paginated search driver and enrichment |
//! | [`merge`] | Record reconciliation rules |
//! | [`store`] | SQLite destination stores |
//! | [`ingest`] | Run orchestration |

pub mod config;
pub mod ingest;
pub mod merge;
pub mod models;
pub mod places;
pub mod resolve;
pub mod score;
pub mod search;
pub mod sources;
pub mod stats;
pub mod store;
