//! Ingestion orchestration.
//!
//! Drives the full run: probe the API for access, then for each city
//! resolve coordinates, fan the category query terms through the paginated
//! search driver, score and merge every candidate into a per-city
//! accumulation map, and finally read-merge and batch-write that map to
//! every selected destination. Dry-run reports counts without writing.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::config::{self, Config};
use crate::merge::merge_record;
use crate::models::{Category, City, PlaceRecord};
use crate::places::{HttpPlacesApi, PlacesApi, PlacesStatus};
use crate::resolve;
use crate::score::score_place;
use crate::search;
use crate::store::{open_destinations, Destination};

/// Command-line selections for one ingest run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub radius_m: Option<u32>,
    pub max_pages: Option<u32>,
    pub details: bool,
    pub limit_cities: Option<usize>,
    pub only_categories: Vec<String>,
    pub destinations: Vec<String>,
    pub dry_run: bool,
    pub api_key: Option<String>,
}

/// Effective per-query parameters after config and flags are reconciled.
#[derive(Debug, Clone, Copy)]
pub struct QueryPlan {
    pub radius_m: u32,
    pub max_pages: u32,
    pub details: bool,
    pub page_delay: Duration,
}

/// Run the `habi ingest` command.
pub async fn run_ingest(config: &Config, opts: IngestOptions) -> Result<()> {
    let api_key = config::resolve_api_key(opts.api_key.clone(), config)?;
    let api = HttpPlacesApi::new(api_key, Duration::from_secs(config.api.timeout_secs))?;

    probe_access(&api).await?;

    let mut cities = config::load_cities(&config.ingest.cities)?;
    let mut categories = config::load_categories(&config.ingest.categories)?;

    if !opts.only_categories.is_empty() {
        categories.retain(|c| opts.only_categories.contains(&c.id));
        if categories.is_empty() {
            bail!(
                "No categories match --only-category {}",
                opts.only_categories.join(", ")
            );
        }
    }
    if let Some(limit) = opts.limit_cities {
        cities.truncate(limit);
    }

    let plan = QueryPlan {
        radius_m: opts.radius_m.unwrap_or(config.ingest.radius_m),
        max_pages: opts.max_pages.unwrap_or(config.ingest.max_pages),
        details: opts.details,
        page_delay: Duration::from_secs(config.api.page_delay_secs),
    };

    let destinations = if opts.dry_run {
        Vec::new()
    } else {
        open_destinations(config, &opts.destinations).await?
    };

    let mut total = 0usize;
    for city in &cities {
        let (lat, lon) = resolve::city_coordinates(&api, city).await?;

        let records = ingest_city(&api, city, &categories, lat, lon, plan).await?;

        if opts.dry_run {
            println!("{}: {} items (dry-run)", city.city, records.len());
            continue;
        }

        let written = write_city(&destinations, records.into_values().collect()).await?;
        total += written;
        println!("{}: wrote {} items", city.city, written);
    }

    for dest in &destinations {
        dest.close().await;
    }

    println!("Done. Total items processed: {}", total);
    Ok(())
}

/// Fail fast when API access is blocked, before any quota is burned on
/// city-level calls. Statuses other than `REQUEST_DENIED` are left for the
/// per-query loops to deal with.
pub async fn probe_access(api: &dyn PlacesApi) -> Result<()> {
    let probe = api.text_search("ethiopian restaurant", None, None).await?;
    if probe.status == PlacesStatus::RequestDenied {
        bail!(
            "Places API REQUEST_DENIED: {}",
            probe.error_message.unwrap_or_default()
        );
    }
    Ok(())
}

/// Process one city: every category query term against its coordinates,
/// scored, optionally enriched, and merged into an accumulation map keyed
/// by place id.
///
/// The map is an explicit value owned here; duplicate hits of the same
/// place within the run are reconciled through [`merge_record`].
pub async fn ingest_city(
    api: &dyn PlacesApi,
    city: &City,
    categories: &[Category],
    lat: f64,
    lon: f64,
    plan: QueryPlan,
) -> Result<BTreeMap<String, PlaceRecord>> {
    let mut by_place_id: BTreeMap<String, PlaceRecord> = BTreeMap::new();

    for category in categories {
        for query in &category.queries {
            let candidates = search::run_query(
                api,
                &city.city,
                query,
                lat,
                lon,
                plan.radius_m,
                plan.max_pages,
                plan.page_delay,
            )
            .await?;

            for candidate in candidates {
                // The driver only emits candidates with a non-empty id.
                let Some(place_id) = candidate.place_id.clone() else {
                    continue;
                };

                let scored = score_place(
                    candidate.name.as_deref().unwrap_or_default(),
                    candidate.formatted_address.as_deref().unwrap_or_default(),
                    &candidate.types,
                    std::slice::from_ref(query),
                );
                let mut record = PlaceRecord::from_candidate(
                    &candidate,
                    &place_id,
                    city,
                    &category.id,
                    query,
                    &scored,
                );

                if plan.details {
                    search::enrich(api, &mut record).await;
                }

                let existing = by_place_id.remove(&place_id);
                by_place_id.insert(place_id, merge_record(existing, record));
            }
        }
    }

    Ok(by_place_id)
}

/// Read-merge a city's accumulated records against every destination, then
/// fan the identical merged payload out to all of them.
///
/// The pre-write read is what makes accumulation hold across runs: a
/// destination's upsert replaces whole documents, so evidence captured by
/// earlier runs has to be folded in here before the write.
pub async fn write_city(
    destinations: &[Destination],
    records: Vec<PlaceRecord>,
) -> Result<usize> {
    let mut merged = Vec::with_capacity(records.len());
    for record in records {
        let mut acc = record;
        for dest in destinations {
            if let Some(existing) = dest.fetch(&acc.pk, &acc.sk).await? {
                acc = merge_record(Some(existing), acc);
            }
        }
        merged.push(acc);
    }

    for dest in destinations {
        dest.put_batch(&merged).await?;
    }
    Ok(merged.len())
}
