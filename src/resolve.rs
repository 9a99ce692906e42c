//! City-to-coordinates resolution.

use anyhow::{bail, Result};

use crate::models::City;
use crate::places::PlacesApi;

/// Resolve a city descriptor to a coordinate pair.
///
/// Geocoding is tried first; it matches strictly and sometimes returns
/// nothing for informal place names, so a plain text search on the same
/// address string serves as the fallback. The error names the address and
/// both upstream statuses when neither path yields a result.
pub async fn resolve_city(api: &dyn PlacesApi, city: &City) -> Result<(f64, f64)> {
    let address = address_string(city);

    let geo = api.geocode(&address).await?;
    if geo.status.is_ok() {
        if let Some(first) = geo.results.first() {
            return Ok((first.geometry.location.lat, first.geometry.location.lng));
        }
    }

    let search = api.text_search(&address, None, None).await?;
    if search.status.is_ok() {
        if let Some(geometry) = search.results.first().and_then(|r| r.geometry.as_ref()) {
            return Ok((geometry.location.lat, geometry.location.lng));
        }
    }

    bail!(
        "Failed to resolve '{}': geocode {}, text search {}",
        address,
        geo.status,
        search.status
    );
}

/// Coordinates for a city: pre-known values win, and only their absence
/// sends us to the network.
pub async fn city_coordinates(api: &dyn PlacesApi, city: &City) -> Result<(f64, f64)> {
    match (city.lat, city.lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => resolve_city(api, city).await,
    }
}

/// Comma-join the non-empty parts of city/region/country.
fn address_string(city: &City) -> String {
    [
        Some(city.city.as_str()),
        city.region.as_deref(),
        Some(city.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::{Geometry, LatLng};
    use crate::places::{
        Bias, DetailsResponse, GeocodeResponse, GeocodeResult, PlacesStatus, SearchResponse,
    };

    fn city(region: Option<&str>) -> City {
        City {
            city: "Addis Ababa".to_string(),
            region: region.map(str::to_string),
            country: "Ethiopia".to_string(),
            country_code: "ET".to_string(),
            city_id: "addis-et".to_string(),
            lat: None,
            lon: None,
        }
    }

    struct FakeApi {
        geocode_status: PlacesStatus,
        geocode_hit: Option<(f64, f64)>,
        search_status: PlacesStatus,
        search_hit: Option<(f64, f64)>,
        geocode_calls: AtomicUsize,
        search_calls: AtomicUsize,
    }

    impl FakeApi {
        fn new(
            geocode_status: PlacesStatus,
            geocode_hit: Option<(f64, f64)>,
            search_status: PlacesStatus,
            search_hit: Option<(f64, f64)>,
        ) -> Self {
            Self {
                geocode_status,
                geocode_hit,
                search_status,
                search_hit,
                geocode_calls: AtomicUsize::new(0),
                search_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PlacesApi for FakeApi {
        async fn geocode(&self, _address: &str) -> Result<GeocodeResponse> {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            Ok(GeocodeResponse {
                status: self.geocode_status,
                results: self
                    .geocode_hit
                    .map(|(lat, lng)| GeocodeResult {
                        geometry: Geometry {
                            location: LatLng { lat, lng },
                        },
                    })
                    .into_iter()
                    .collect(),
            })
        }

        async fn text_search(
            &self,
            _query: &str,
            _bias: Option<Bias>,
            _page_token: Option<&str>,
        ) -> Result<SearchResponse> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            let results = self
                .search_hit
                .map(|(lat, lng)| crate::models::RawCandidate {
                    place_id: Some("r1".to_string()),
                    name: None,
                    formatted_address: None,
                    geometry: Some(Geometry {
                        location: LatLng { lat, lng },
                    }),
                    types: Vec::new(),
                    rating: None,
                    user_ratings_total: None,
                    business_status: None,
                })
                .into_iter()
                .collect();
            Ok(SearchResponse {
                status: self.search_status,
                results,
                next_page_token: None,
                error_message: None,
            })
        }

        async fn place_details(&self, _place_id: &str) -> Result<DetailsResponse> {
            Err(anyhow!("not used"))
        }
    }

    #[tokio::test]
    async fn geocode_result_wins_without_fallback() {
        let api = FakeApi::new(
            PlacesStatus::Ok,
            Some((9.03, 38.74)),
            PlacesStatus::Ok,
            Some((0.0, 0.0)),
        );
        let coords = resolve_city(&api, &city(None)).await.unwrap();
        assert_eq!(coords, (9.03, 38.74));
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_back_to_text_search_when_geocode_is_empty() {
        let api = FakeApi::new(
            PlacesStatus::ZeroResults,
            None,
            PlacesStatus::Ok,
            Some((9.03, 38.74)),
        );
        let coords = resolve_city(&api, &city(None)).await.unwrap();
        assert_eq!(coords, (9.03, 38.74));
        assert_eq!(api.geocode_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn preknown_coordinates_bypass_the_network() {
        let api = FakeApi::new(PlacesStatus::Ok, Some((0.0, 0.0)), PlacesStatus::Ok, None);
        let stockholm = City {
            city: "Stockholm".to_string(),
            region: None,
            country: "Sweden".to_string(),
            country_code: "SE".to_string(),
            city_id: "stockholm-se".to_string(),
            lat: Some(59.33),
            lon: Some(18.07),
        };
        let coords = city_coordinates(&api, &stockholm).await.unwrap();
        assert_eq!(coords, (59.33, 18.07));
        assert_eq!(api.geocode_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_carries_both_statuses() {
        let api = FakeApi::new(PlacesStatus::ZeroResults, None, PlacesStatus::ZeroResults, None);
        let err = resolve_city(&api, &city(Some("Oromia"))).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Addis Ababa, Oromia, Ethiopia"), "{msg}");
        assert!(msg.contains("ZERO_RESULTS"), "{msg}");
    }
}
