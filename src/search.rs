//! Paginated text-search driver and per-candidate enrichment.
//!
//! One call to [`run_query`] executes one logical query (a category query
//! term against a city's coordinates) and walks the upstream pagination
//! until the token runs out, `max_pages` is reached, or the API reports a
//! failure status. A failed query warns and returns what it has; it never
//! aborts the surrounding city.

use std::time::Duration;

use anyhow::Result;

use crate::models::{PlaceRecord, RawCandidate};
use crate::places::{Bias, PlacesApi, PlacesStatus};

/// Run one query to completion, collecting candidates page by page.
///
/// Before any request that carries a continuation token the driver sleeps
/// `page_delay`: upstream tokens are not valid immediately after being
/// issued, and an instant follow-up request is guaranteed to fail. Tests
/// pass `Duration::ZERO`.
///
/// `scope` labels warning lines (the city being processed). Results without
/// a `place_id` are dropped; everything downstream keys on that id.
pub async fn run_query(
    api: &dyn PlacesApi,
    scope: &str,
    query: &str,
    lat: f64,
    lon: f64,
    radius_m: u32,
    max_pages: u32,
    page_delay: Duration,
) -> Result<Vec<RawCandidate>> {
    let bias = Bias { lat, lng: lon, radius_m };
    let mut collected = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        if page_token.is_some() {
            tokio::time::sleep(page_delay).await;
        }

        let page = api
            .text_search(query, Some(bias), page_token.as_deref())
            .await?;

        match page.status {
            PlacesStatus::Ok | PlacesStatus::ZeroResults => {}
            status => {
                println!("WARN {scope} | {query} -> {status}");
                break;
            }
        }

        collected.extend(
            page.results
                .into_iter()
                .filter(|r| r.place_id.as_deref().is_some_and(|id| !id.is_empty())),
        );

        pages += 1;
        match page.next_page_token {
            Some(token) if pages < max_pages => page_token = Some(token),
            _ => break,
        }
    }

    Ok(collected)
}

/// Copy phone/website/hours from a details lookup onto the record.
///
/// Enrichment is best-effort: a transport error or non-OK status leaves the
/// record untouched.
pub async fn enrich(api: &dyn PlacesApi, record: &mut PlaceRecord) {
    let Ok(resp) = api.place_details(&record.place_id).await else {
        return;
    };
    if !resp.status.is_ok() {
        return;
    }
    let Some(details) = resp.result else {
        return;
    };

    if details.formatted_phone_number.is_some() {
        record.formatted_phone_number = details.formatted_phone_number;
    }
    if details.international_phone_number.is_some() {
        record.international_phone_number = details.international_phone_number;
    }
    if details.website.is_some() {
        record.website = details.website;
    }
    if details.opening_hours.is_some() {
        record.opening_hours = details.opening_hours;
    }
}
