// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Defines coordinate/geocode types and the Places API (New) wire models

use serde::{Deserialize, Serialize};

use crate::errors::TurfError;

/// Geographic coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, [-180, 180]
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate coordinate ranges
    pub fn validate(&self) -> Result<(), TurfError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(TurfError::ValidationError(format!(
                "latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(TurfError::ValidationError(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Resolved address from the Geocoding API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

impl GeocodeResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Localized text wrapper used by the Places API (New)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    pub language_code: Option<String>,
}

/// Coordinates as the Places API (New) returns them
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Photo resource reference
/// DOCUMENTATION: `name` is the resource path used to build a media URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    pub name: String,
    pub width_px: Option<i32>,
    pub height_px: Option<i32>,
}

/// Opening hours metadata (only the open-now flag is consumed)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

/// Review author attribution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    pub display_name: Option<String>,
}

/// User review from Place Details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: Option<f64>,
    pub text: Option<LocalizedText>,
    pub author_attribution: Option<AuthorAttribution>,
    pub relative_publish_time_description: Option<String>,
    pub publish_time: Option<String>,
}

/// Place summary from a search call
/// DOCUMENTATION: Identity is `id`; every other field is optional.
/// Field names follow the Places API (New) camelCase wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<i32>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    pub regular_opening_hours: Option<OpeningHours>,
    pub business_status: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl PlaceSummary {
    /// Display name text, if the provider supplied one
    pub fn name(&self) -> Option<&str> {
        self.display_name.as_ref().map(|n| n.text.as_str())
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.location
            .map(|loc| Coordinate::new(loc.latitude, loc.longitude))
    }

    pub fn open_now(&self) -> Option<bool> {
        self.regular_opening_hours.as_ref().and_then(|h| h.open_now)
    }
}

/// Extended place record from a Place Details fetch
/// DOCUMENTATION: Superset of PlaceSummary, keyed by the same `id`.
/// Adds phone numbers, website, canonical map URL and reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<i32>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    pub regular_opening_hours: Option<OpeningHours>,
    pub current_opening_hours: Option<OpeningHours>,
    pub business_status: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website_uri: Option<String>,
    pub google_maps_uri: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl PlaceDetail {
    pub fn name(&self) -> Option<&str> {
        self.display_name.as_ref().map(|n| n.text.as_str())
    }

    /// Open-now flag, preferring the live hours over the regular schedule
    pub fn open_now(&self) -> Option<bool> {
        self.current_opening_hours
            .as_ref()
            .and_then(|h| h.open_now)
            .or_else(|| self.regular_opening_hours.as_ref().and_then(|h| h.open_now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(12.9121, 77.6446).validate().is_ok());
        assert!(Coordinate::new(91.0, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -181.0).validate().is_err());
    }

    #[test]
    fn test_place_summary_parses_wire_shape() {
        let json = r#"{
            "id": "ChIJturf123",
            "displayName": { "text": "Kick Off Turf Arena", "languageCode": "en" },
            "formattedAddress": "HSR Layout, Bengaluru",
            "location": { "latitude": 12.9121, "longitude": 77.6446 },
            "rating": 4.4,
            "userRatingCount": 210,
            "photos": [ { "name": "places/ChIJturf123/photos/abc", "widthPx": 1200, "heightPx": 800 } ],
            "regularOpeningHours": { "openNow": true },
            "businessStatus": "OPERATIONAL",
            "types": ["sports_complex", "point_of_interest"]
        }"#;

        let place: PlaceSummary = serde_json::from_str(json).unwrap();
        assert_eq!(place.id, "ChIJturf123");
        assert_eq!(place.name(), Some("Kick Off Turf Arena"));
        assert_eq!(place.open_now(), Some(true));
        assert_eq!(place.photos.len(), 1);
        let coord = place.coordinate().unwrap();
        assert!((coord.lat - 12.9121).abs() < 1e-9);
    }

    #[test]
    fn test_place_summary_tolerates_missing_fields() {
        let place: PlaceSummary = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(place.name().is_none());
        assert!(place.coordinate().is_none());
        assert!(place.photos.is_empty());
        assert!(place.types.is_empty());
    }

    #[test]
    fn test_detail_open_now_prefers_current_hours() {
        let detail: PlaceDetail = serde_json::from_str(
            r#"{
                "id": "x",
                "regularOpeningHours": { "openNow": true },
                "currentOpeningHours": { "openNow": false }
            }"#,
        )
        .unwrap();
        assert_eq!(detail.open_now(), Some(false));
    }
}
