// src/models/turf.rs
// DOCUMENTATION: Request/response DTOs for the turf search API
// PURPOSE: Input validation models and the enriched output shape

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for GET /turfs/search
/// DOCUMENTATION: Either lat+lng or address must be provided, not both.
/// Mutual exclusivity is checked in the handler since validator works
/// per-field.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TurfSearchQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,

    /// Free-text address to geocode when coordinates are absent
    pub address: Option<String>,

    /// Search radius in kilometers (provider caps circles at 50 km)
    #[validate(range(min = 0.1, max = 50.0))]
    pub radius_km: Option<f64>,

    /// Extra keyword searched before the default keyword list
    pub keyword: Option<String>,

    /// Maximum results returned (provider page cap is 20)
    #[validate(range(min = 1, max = 20))]
    pub max_results: Option<usize>,

    /// Skip the Place Details enrichment pass when false
    pub enrich: Option<bool>,
}

/// One review attached to an enriched result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSnippet {
    pub author: Option<String>,
    pub rating: Option<f64>,
    /// Review text, truncated to the fixed snippet length
    pub text: Option<String>,
    pub relative_time: Option<String>,
}

/// Externally visible search result
/// DOCUMENTATION: Merge of one PlaceSummary with zero-or-one PlaceDetail
/// plus the computed distance from the search origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurfResult {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub distance_km: f64,
    pub rating: Option<f64>,
    pub user_rating_count: Option<i32>,
    pub open_now: Option<bool>,
    pub business_status: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Canonical navigable link for the venue
    pub maps_url: String,
    /// Directly fetchable photo URLs (capped)
    pub photos: Vec<String>,
    /// Provider-ordered reviews (capped)
    pub reviews: Vec<ReviewSnippet>,
}

/// Response envelope for GET /turfs/search
#[derive(Debug, Serialize)]
pub struct TurfSearchResponse {
    /// Resolved search origin
    pub origin: crate::models::Coordinate,
    /// Formatted address of the origin when it came from geocoding
    pub origin_address: Option<String>,
    pub radius_km: f64,
    pub count: usize,
    pub results: Vec<TurfResult>,
}
