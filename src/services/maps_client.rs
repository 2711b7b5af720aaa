// src/services/maps_client.rs
// DOCUMENTATION: Google Maps Platform client (Geocoding + Places API New)
// PURPOSE: Handle authentication, caching and error translation for all
// remote calls

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Semaphore;

use crate::errors::TurfError;
use crate::models::{GeocodeResult, PlaceDetail, PlaceSummary};
use crate::services::cache::{generate_key, TtlCache, DEFAULT_TTL_SECONDS};

/// Provider-imposed maximum circle radius for searches
pub const MAX_RADIUS_KM: f64 = 50.0;
/// Provider-imposed page maximum per search call
pub const MAX_PAGE_RESULTS: u32 = 20;
/// Default in-flight limit for detail batches
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 5;

/// Fields requested from search calls (controls cost and payload size)
const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.rating,places.userRatingCount,places.photos,\
places.regularOpeningHours.openNow,places.businessStatus,places.types";

/// Fields requested from Place Details
const DETAIL_FIELD_MASK: &str = "id,displayName,formattedAddress,location,rating,\
userRatingCount,photos,regularOpeningHours.openNow,currentOpeningHours.openNow,\
businessStatus,types,nationalPhoneNumber,internationalPhoneNumber,websiteUri,\
googleMapsUri,reviews";

/// Google Maps Platform client
/// DOCUMENTATION: Owns the HTTP client, the API key and one cache per data
/// category. All remote reads check their cache first; a hit makes no
/// network call. No retries anywhere - failures surface immediately.
pub struct MapsClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Maps API key (explicit, no global credential state)
    api_key: String,
    /// Base URL for the Geocoding API
    geocode_base_url: String,
    /// Base URL for the Places API (New)
    places_base_url: String,
    /// Region bias applied to geocoding requests
    region: String,
    geocode_cache: TtlCache<GeocodeResult>,
    search_cache: TtlCache<Vec<PlaceSummary>>,
    detail_cache: TtlCache<PlaceDetail>,
    detail_concurrency: usize,
}

/// Geocoding API response envelope
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeWireResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeWireResult {
    geometry: GeocodeGeometry,
    formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}

/// Places API (New) search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    places: Vec<PlaceSummary>,
}

/// Places API (New) error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
    status: Option<String>,
}

impl MapsClient {
    /// Create new client with default cache TTL and detail concurrency
    pub fn new(api_key: String, region: String) -> Self {
        Self::with_settings(
            api_key,
            region,
            DEFAULT_TTL_SECONDS,
            DEFAULT_DETAIL_CONCURRENCY,
        )
    }

    /// Create new client with explicit cache TTL and concurrency settings
    pub fn with_settings(
        api_key: String,
        region: String,
        cache_ttl_seconds: u64,
        detail_concurrency: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            geocode_base_url: "https://maps.googleapis.com/maps/api".to_string(),
            places_base_url: "https://places.googleapis.com/v1".to_string(),
            region,
            geocode_cache: TtlCache::new(cache_ttl_seconds),
            search_cache: TtlCache::new(cache_ttl_seconds),
            detail_cache: TtlCache::new(cache_ttl_seconds),
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    /// Resolve a free-text address to coordinates
    /// DOCUMENTATION: Region-biased geocoding with optional bounding box.
    /// ZERO_RESULTS is recoverable (caller should suggest refining input);
    /// every other non-OK status is a provider failure.
    pub async fn geocode(
        &self,
        address: &str,
        bounds: Option<&str>,
    ) -> Result<GeocodeResult, TurfError> {
        let cache_key = generate_key(
            "geocode",
            &[
                ("address", address.to_lowercase()),
                ("region", self.region.clone()),
                ("bounds", bounds.unwrap_or("").to_string()),
            ],
        );

        if let Some(cached) = self.geocode_cache.get(&cache_key).await {
            return Ok(cached);
        }

        let url = format!("{}/geocode/json", self.geocode_base_url);

        let mut params = vec![
            ("address", address.to_string()),
            ("region", self.region.clone()),
            ("key", self.api_key.clone()),
        ];
        if let Some(b) = bounds {
            params.push(("bounds", b.to_string()));
        }

        log::debug!("Geocoding address: {}", address);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Geocoding request failed: {}", e);
                TurfError::GeocodingFailed(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Geocoding API error {}: {}", status, body);
            return Err(TurfError::GeocodingFailed(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: GeocodeResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse geocoding response: {}", e);
            TurfError::GeocodingFailed(format!("Parse error: {}", e))
        })?;

        match api_response.status.as_str() {
            "OK" => {
                let first = api_response.results.into_iter().next().ok_or_else(|| {
                    TurfError::GeocodingNoResults(address.to_string())
                })?;

                let result = GeocodeResult {
                    lat: first.geometry.location.lat,
                    lng: first.geometry.location.lng,
                    formatted_address: first.formatted_address,
                };

                log::info!(
                    "Geocoded \"{}\" -> ({}, {})",
                    address,
                    result.lat,
                    result.lng
                );

                self.geocode_cache.set(cache_key, result.clone()).await;
                Ok(result)
            }
            "ZERO_RESULTS" => Err(TurfError::GeocodingNoResults(address.to_string())),
            "OVER_QUERY_LIMIT" => {
                log::error!("Geocoding API quota exceeded");
                Err(TurfError::RateLimitExceeded)
            }
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unexpected status: {}", other));
                log::error!("Geocoding API error status {}: {}", other, msg);
                Err(TurfError::GeocodingFailed(msg))
            }
        }
    }

    /// Typed nearby search around a point
    /// DOCUMENTATION: Constrained to the given venue-type codes, radius
    /// capped at the provider maximum, at most one page of results
    pub async fn nearby_search(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
        included_types: &[String],
    ) -> Result<Vec<PlaceSummary>, TurfError> {
        let radius_m = Self::clamp_radius_m(radius_km);

        let cache_key = generate_key(
            "nearby",
            &[
                ("lat", Self::coord_key(lat)),
                ("lng", Self::coord_key(lng)),
                ("radius", radius_m.to_string()),
                ("types", included_types.join(",")),
            ],
        );

        if let Some(cached) = self.search_cache.get(&cache_key).await {
            return Ok(cached);
        }

        let url = format!("{}/places:searchNearby", self.places_base_url);
        let body = json!({
            "includedTypes": included_types,
            "maxResultCount": MAX_PAGE_RESULTS,
            "locationRestriction": {
                "circle": {
                    "center": { "latitude": lat, "longitude": lng },
                    "radius": radius_m
                }
            }
        });

        log::debug!(
            "Nearby search: lat={}, lng={}, radius={}m, types={:?}",
            lat,
            lng,
            radius_m,
            included_types
        );

        let places = self.run_search(&url, body).await?;
        self.search_cache.set(cache_key, places.clone()).await;
        Ok(places)
    }

    /// Free-text search around a point
    /// DOCUMENTATION: The circular region already scopes the query
    /// geographically - no city name is appended to the text
    pub async fn text_search(
        &self,
        query: &str,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<PlaceSummary>, TurfError> {
        let radius_m = Self::clamp_radius_m(radius_km);

        let cache_key = generate_key(
            "text",
            &[
                ("query", query.to_lowercase()),
                ("lat", Self::coord_key(lat)),
                ("lng", Self::coord_key(lng)),
                ("radius", radius_m.to_string()),
            ],
        );

        if let Some(cached) = self.search_cache.get(&cache_key).await {
            return Ok(cached);
        }

        let url = format!("{}/places:searchText", self.places_base_url);
        let body = json!({
            "textQuery": query,
            "maxResultCount": MAX_PAGE_RESULTS,
            "locationBias": {
                "circle": {
                    "center": { "latitude": lat, "longitude": lng },
                    "radius": radius_m
                }
            }
        });

        log::debug!(
            "Text search: query=\"{}\", lat={}, lng={}, radius={}m",
            query,
            lat,
            lng,
            radius_m
        );

        let places = self.run_search(&url, body).await?;
        self.search_cache.set(cache_key, places.clone()).await;
        Ok(places)
    }

    /// Shared search call path for both variants
    async fn run_search(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<Vec<PlaceSummary>, TurfError> {
        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Places search request failed: {}", e);
                TurfError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = Self::extract_error_message(&text);
            log::error!("Places search error {}: {}", status, message);
            return Err(TurfError::RemoteApi {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: SearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse search response: {}", e);
            TurfError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        log::info!("Search returned {} places", api_response.places.len());
        Ok(api_response.places)
    }

    /// Fetch one place's extended record
    /// DOCUMENTATION: Best-effort - any failure logs a warning and yields
    /// None so a single place without details never aborts a batch
    pub async fn place_details(&self, place_id: &str) -> Option<PlaceDetail> {
        let cache_key = generate_key("details", &[("id", place_id.to_string())]);

        if let Some(cached) = self.detail_cache.get(&cache_key).await {
            return Some(cached);
        }

        let url = format!("{}/places/{}", self.places_base_url, place_id);

        log::debug!("Place details lookup: {}", place_id);

        let response = match self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAIL_FIELD_MASK)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("Details request failed for {}: {}", place_id, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::warn!(
                "Details error {} for {}: {}",
                status,
                place_id,
                Self::extract_error_message(&text)
            );
            return None;
        }

        match response.json::<PlaceDetail>().await {
            Ok(detail) => {
                self.detail_cache.set(cache_key, detail.clone()).await;
                Some(detail)
            }
            Err(e) => {
                log::warn!("Failed to parse details for {}: {}", place_id, e);
                None
            }
        }
    }

    /// Fetch details for many places under a bounded-concurrency scheduler
    /// DOCUMENTATION: At most `limit` requests in flight; completes only
    /// once every id has resolved (success or None), no early return
    pub async fn place_details_batch(
        &self,
        place_ids: &[String],
        limit: Option<usize>,
    ) -> HashMap<String, Option<PlaceDetail>> {
        let limit = limit.unwrap_or(self.detail_concurrency).max(1);

        log::debug!(
            "Detail batch: {} ids, concurrency limit {}",
            place_ids.len(),
            limit
        );

        bounded_fetch(place_ids, limit, |id| async move {
            self.place_details(&id).await
        })
        .await
    }

    /// Resolve a photo resource name into a fetchable media URL
    pub fn photo_url(&self, photo_name: &str, max_width_px: u32) -> String {
        format!(
            "{}/{}/media?maxWidthPx={}&key={}",
            self.places_base_url, photo_name, max_width_px, self.api_key
        )
    }

    /// Housekeeping: prune expired entries across all three caches
    pub async fn prune_caches(&self) -> usize {
        self.geocode_cache.prune().await
            + self.search_cache.prune().await
            + self.detail_cache.prune().await
    }

    /// Aggregate stats across the geocode, search and detail caches
    pub async fn cache_stats(&self) -> HashMap<String, crate::services::cache::CacheStats> {
        let mut stats = HashMap::new();
        stats.insert("geocode".to_string(), self.geocode_cache.stats().await);
        stats.insert("search".to_string(), self.search_cache.stats().await);
        stats.insert("details".to_string(), self.detail_cache.stats().await);
        stats
    }

    fn clamp_radius_m(radius_km: f64) -> f64 {
        (radius_km.min(MAX_RADIUS_KM).max(0.0) * 1000.0).round()
    }

    /// Cache-key coordinate rounding (~10m precision)
    fn coord_key(value: f64) -> String {
        ((value * 10000.0).round() as i64).to_string()
    }

    fn extract_error_message(body: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .map(|e| {
                let status = e.status.unwrap_or_default();
                let message = e.message.unwrap_or_default();
                if status.is_empty() {
                    message
                } else {
                    format!("{}: {}", status, message)
                }
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string())
    }
}

/// Run `fetch` for every id with at most `limit` in flight at once
/// DOCUMENTATION: Semaphore-gated task set with a single join point.
/// Completion order is irrelevant - results are keyed by id.
pub async fn bounded_fetch<T, F, Fut>(
    ids: &[String],
    limit: usize,
    fetch: F,
) -> HashMap<String, T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = T>,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));

    let tasks = ids.iter().map(|id| {
        let semaphore = semaphore.clone();
        let id = id.clone();
        let fut = fetch(id.clone());
        async move {
            // The semaphore is never closed, so acquire cannot fail
            let _permit = semaphore.acquire().await.ok();
            (id, fut.await)
        }
    });

    futures::future::join_all(tasks).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_photo_url_format() {
        let client = MapsClient::new("test_key".to_string(), "in".to_string());

        let url = client.photo_url("places/ChIJ123/photos/abc", 800);

        assert_eq!(
            url,
            "https://places.googleapis.com/v1/places/ChIJ123/photos/abc/media?maxWidthPx=800&key=test_key"
        );
    }

    #[test]
    fn test_clamp_radius() {
        assert_eq!(MapsClient::clamp_radius_m(5.0), 5000.0);
        assert_eq!(MapsClient::clamp_radius_m(80.0), 50000.0);
        assert_eq!(MapsClient::clamp_radius_m(-1.0), 0.0);
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            MapsClient::extract_error_message(body),
            "INVALID_ARGUMENT: API key not valid"
        );

        // Unparseable body is passed through as-is
        assert_eq!(MapsClient::extract_error_message("oops"), "oops");
    }

    #[tokio::test]
    async fn test_bounded_fetch_respects_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let ids: Vec<String> = (0..20).map(|i| format!("id_{}", i)).collect();

        let results = bounded_fetch(&ids, 5, |id| {
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                id.len()
            }
        })
        .await;

        assert_eq!(results.len(), 20);
        assert!(
            max_seen.load(Ordering::SeqCst) <= 5,
            "observed {} concurrent fetches",
            max_seen.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_bounded_fetch_covers_every_id_on_failures() {
        let ids: Vec<String> = vec!["a".into(), "b".into(), "c".into()];

        // Simulate per-id failure as None, matching place_details semantics
        let results = bounded_fetch(&ids, 2, |id| async move {
            if id == "b" {
                None
            } else {
                Some(format!("detail:{}", id))
            }
        })
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results["a"], Some("detail:a".to_string()));
        assert_eq!(results["b"], None);
        assert_eq!(results["c"], Some("detail:c".to_string()));
    }
}
