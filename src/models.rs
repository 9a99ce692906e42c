//! Core data types for the ingestion pipeline.
//!
//! These types represent the cities and categories driving a run, the raw
//! candidates returned by the Places API, and the reconciled records that
//! land in the destination stores.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::score::Scored;

/// A city to search, loaded from the cities JSON file.
///
/// When `lat`/`lon` are pre-known the resolver is skipped entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub city: String,
    pub region: Option<String>,
    pub country: String,
    pub country_code: String,
    pub city_id: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// A search category: a stable identifier plus the query terms run for it.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub queries: Vec<String>,
}

/// One result from a Places text search, before scoring.
///
/// Every field except `place_id` is best-effort; candidates without a
/// `place_id` are dropped by the search driver because the id is the dedup
/// key for all downstream merging.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidate {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// The reconciled record persisted per place, keyed by
/// (`PLACE#<place_id>`, `META`).
///
/// Absent fields are never serialized, so stored documents stay sparse.
/// Merge semantics live in [`crate::merge::merge_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub pk: String,
    pub sk: String,
    pub place_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_status: Option<String>,
    pub city_id: String,
    pub city_name: String,
    pub country: String,
    pub country_code: String,
    pub source: String,
    pub matched_term: String,
    pub matched_terms: Vec<String>,
    pub category: String,
    pub category_ids: Vec<String>,
    pub habesha_score: u32,
    pub habesha_reasons: Vec<String>,
    pub needs_review: bool,
    pub is_auto_ingested: bool,
    pub last_seen_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<serde_json::Value>,
}

impl PlaceRecord {
    /// Build a record from a scored candidate.
    ///
    /// The caller must have verified `place_id` is present; this is the
    /// contract the search driver upholds.
    pub fn from_candidate(
        candidate: &RawCandidate,
        place_id: &str,
        city: &City,
        category_id: &str,
        matched_term: &str,
        scored: &Scored,
    ) -> Self {
        let location = candidate.geometry.as_ref().map(|g| g.location);
        Self {
            pk: format!("PLACE#{place_id}"),
            sk: "META".to_string(),
            place_id: place_id.to_string(),
            name: candidate.name.clone(),
            formatted_address: candidate.formatted_address.clone(),
            lat: location.map(|l| l.lat),
            lng: location.map(|l| l.lng),
            types: candidate.types.clone(),
            rating: candidate.rating,
            user_ratings_total: candidate.user_ratings_total,
            business_status: candidate.business_status.clone(),
            city_id: city.city_id.clone(),
            city_name: city.city.clone(),
            country: city.country.clone(),
            country_code: city.country_code.clone(),
            source: "google_places_textsearch".to_string(),
            matched_term: matched_term.to_string(),
            matched_terms: vec![matched_term.to_string()],
            category: category_id.to_string(),
            category_ids: vec![category_id.to_string()],
            habesha_score: scored.score,
            habesha_reasons: scored.reasons.clone(),
            needs_review: scored.needs_review,
            is_auto_ingested: true,
            last_seen_at: now_timestamp(),
            formatted_phone_number: None,
            international_phone_number: None,
            website: None,
            opening_hours: None,
        }
    }
}

/// Current UTC time in the `YYYY-MM-DDTHH:MM:SSZ` form used by `last_seen_at`.
pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
