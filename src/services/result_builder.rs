// src/services/result_builder.rs
// DOCUMENTATION: Merges a search summary with an optional detail record
// PURPOSE: Produce the externally visible TurfResult with field-level
// detail-wins, summary-fallback resolution

use crate::models::{PhotoRef, PlaceDetail, PlaceSummary, Review, ReviewSnippet, TurfResult};
use crate::services::distance::round_km;
use crate::services::MapsClient;

/// Maximum reviews carried into a result
pub const MAX_REVIEWS: usize = 3;
/// Maximum photos resolved into URLs
pub const MAX_PHOTOS: usize = 3;
/// Review text cap, ellipsis marker included
pub const REVIEW_TEXT_LIMIT: usize = 240;
/// Requested photo width in pixels
const PHOTO_MAX_WIDTH_PX: u32 = 800;

const ELLIPSIS: &str = "...";
const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_ADDRESS: &str = "Address not available";

/// Build one enriched result from a summary and an optional detail record
/// DOCUMENTATION: Each field independently prefers the detail value, falls
/// back to the summary value, then to a fixed sentinel. An absent detail
/// record yields summary-only fields and an empty review list.
pub fn build_result(
    summary: &PlaceSummary,
    detail: Option<&PlaceDetail>,
    distance_km: f64,
    client: &MapsClient,
) -> TurfResult {
    let name = detail
        .and_then(|d| d.name())
        .or_else(|| summary.name())
        .unwrap_or(UNKNOWN_NAME)
        .to_string();

    let address = detail
        .and_then(|d| d.formatted_address.clone())
        .or_else(|| summary.formatted_address.clone())
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

    let location = detail.and_then(|d| d.location).or(summary.location);

    let rating = detail.and_then(|d| d.rating).or(summary.rating);

    let user_rating_count = detail
        .and_then(|d| d.user_rating_count)
        .or(summary.user_rating_count);

    let open_now = detail.and_then(|d| d.open_now()).or_else(|| summary.open_now());

    let business_status = detail
        .and_then(|d| d.business_status.clone())
        .or_else(|| summary.business_status.clone());

    // International format preferred over national when both are present
    let phone = detail.and_then(|d| {
        d.international_phone_number
            .clone()
            .or_else(|| d.national_phone_number.clone())
    });

    let website = detail.and_then(|d| d.website_uri.clone());

    // Provider-issued URI preferred, place-id URL as fallback
    let maps_url = detail
        .and_then(|d| d.google_maps_uri.clone())
        .unwrap_or_else(|| {
            format!(
                "https://www.google.com/maps/place/?q=place_id:{}",
                summary.id
            )
        });

    let photo_refs: &[PhotoRef] = match detail {
        Some(d) if !d.photos.is_empty() => &d.photos,
        _ => &summary.photos,
    };
    let photos = photo_refs
        .iter()
        .take(MAX_PHOTOS)
        .map(|p| client.photo_url(&p.name, PHOTO_MAX_WIDTH_PX))
        .collect();

    // Provider order (relevance/recency) is preserved
    let reviews = detail
        .map(|d| {
            d.reviews
                .iter()
                .take(MAX_REVIEWS)
                .map(to_review_snippet)
                .collect()
        })
        .unwrap_or_default();

    TurfResult {
        place_id: summary.id.clone(),
        name,
        address,
        lat: location.map(|l| l.latitude),
        lng: location.map(|l| l.longitude),
        distance_km: round_km(distance_km),
        rating,
        user_rating_count,
        open_now,
        business_status,
        phone,
        website,
        maps_url,
        photos,
        reviews,
    }
}

fn to_review_snippet(review: &Review) -> ReviewSnippet {
    ReviewSnippet {
        author: review
            .author_attribution
            .as_ref()
            .and_then(|a| a.display_name.clone()),
        rating: review.rating,
        text: review
            .text
            .as_ref()
            .map(|t| truncate_review_text(&t.text)),
        relative_time: review.relative_publish_time_description.clone(),
    }
}

/// Cap review text at REVIEW_TEXT_LIMIT characters, ellipsis included
fn truncate_review_text(text: &str) -> String {
    if text.chars().count() <= REVIEW_TEXT_LIMIT {
        return text.to_string();
    }

    let kept: String = text
        .chars()
        .take(REVIEW_TEXT_LIMIT - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorAttribution, LatLng, LocalizedText, PhotoRef};

    fn test_client() -> MapsClient {
        MapsClient::new("test_key".to_string(), "in".to_string())
    }

    fn summary(id: &str) -> PlaceSummary {
        PlaceSummary {
            id: id.to_string(),
            display_name: Some(LocalizedText {
                text: "Summary Turf".to_string(),
                language_code: None,
            }),
            formatted_address: Some("Summary Road".to_string()),
            location: Some(LatLng {
                latitude: 12.9,
                longitude: 77.6,
            }),
            rating: Some(4.0),
            user_rating_count: Some(50),
            photos: vec![PhotoRef {
                name: "places/x/photos/summary".to_string(),
                width_px: None,
                height_px: None,
            }],
            regular_opening_hours: None,
            business_status: None,
            types: Vec::new(),
        }
    }

    fn detail(id: &str) -> PlaceDetail {
        PlaceDetail {
            id: id.to_string(),
            display_name: Some(LocalizedText {
                text: "Detail Turf".to_string(),
                language_code: None,
            }),
            formatted_address: Some("Detail Road".to_string()),
            location: None,
            rating: Some(4.5),
            user_rating_count: Some(120),
            photos: Vec::new(),
            regular_opening_hours: None,
            current_opening_hours: None,
            business_status: None,
            types: Vec::new(),
            national_phone_number: Some("080 1234 5678".to_string()),
            international_phone_number: Some("+91 80 1234 5678".to_string()),
            website_uri: Some("https://detailturf.example".to_string()),
            google_maps_uri: Some("https://maps.google.com/?cid=42".to_string()),
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_detail_fields_win_over_summary() {
        let result = build_result(&summary("x"), Some(&detail("x")), 1.234, &test_client());

        assert_eq!(result.name, "Detail Turf");
        assert_eq!(result.address, "Detail Road");
        assert_eq!(result.rating, Some(4.5));
        assert_eq!(result.user_rating_count, Some(120));
        assert_eq!(result.phone, Some("+91 80 1234 5678".to_string()));
        assert_eq!(result.maps_url, "https://maps.google.com/?cid=42");
        assert_eq!(result.distance_km, 1.23);
    }

    #[test]
    fn test_summary_fallback_when_detail_field_missing() {
        let mut d = detail("x");
        d.rating = None;

        let result = build_result(&summary("x"), Some(&d), 0.5, &test_client());

        assert_eq!(result.rating, Some(4.0));
    }

    #[test]
    fn test_sentinels_when_nothing_available() {
        let mut s = summary("x");
        s.display_name = None;
        s.formatted_address = None;
        s.rating = None;

        let result = build_result(&s, None, 0.0, &test_client());

        assert_eq!(result.name, "Unknown");
        assert_eq!(result.address, "Address not available");
        assert_eq!(result.rating, None);
        assert_eq!(result.phone, None);
        assert!(result.reviews.is_empty());
    }

    #[test]
    fn test_national_phone_fallback() {
        let mut d = detail("x");
        d.international_phone_number = None;

        let result = build_result(&summary("x"), Some(&d), 0.0, &test_client());

        assert_eq!(result.phone, Some("080 1234 5678".to_string()));
    }

    #[test]
    fn test_maps_url_constructed_from_place_id() {
        let mut d = detail("pid123");
        d.google_maps_uri = None;

        let result = build_result(&summary("pid123"), Some(&d), 0.0, &test_client());

        assert_eq!(
            result.maps_url,
            "https://www.google.com/maps/place/?q=place_id:pid123"
        );
    }

    #[test]
    fn test_photos_prefer_detail_and_are_capped() {
        let mut d = detail("x");
        d.photos = (0..5)
            .map(|i| PhotoRef {
                name: format!("places/x/photos/detail{}", i),
                width_px: None,
                height_px: None,
            })
            .collect();

        let result = build_result(&summary("x"), Some(&d), 0.0, &test_client());

        assert_eq!(result.photos.len(), 3);
        assert!(result.photos[0].contains("detail0"));
    }

    #[test]
    fn test_photos_fall_back_to_summary() {
        let result = build_result(&summary("x"), Some(&detail("x")), 0.0, &test_client());

        assert_eq!(result.photos.len(), 1);
        assert!(result.photos[0].contains("photos/summary"));
    }

    #[test]
    fn test_reviews_capped_and_order_preserved() {
        let mut d = detail("x");
        d.reviews = (0..5)
            .map(|i| Review {
                rating: Some(5.0),
                text: Some(LocalizedText {
                    text: format!("review {}", i),
                    language_code: None,
                }),
                author_attribution: Some(AuthorAttribution {
                    display_name: Some(format!("author {}", i)),
                }),
                relative_publish_time_description: None,
                publish_time: None,
            })
            .collect();

        let result = build_result(&summary("x"), Some(&d), 0.0, &test_client());

        assert_eq!(result.reviews.len(), 3);
        assert_eq!(result.reviews[0].text.as_deref(), Some("review 0"));
        assert_eq!(result.reviews[2].text.as_deref(), Some("review 2"));
    }

    #[test]
    fn test_review_text_truncation() {
        let long_text = "a".repeat(300);
        let truncated = truncate_review_text(&long_text);

        assert_eq!(truncated.chars().count(), 240);
        assert!(truncated.ends_with("..."));

        let short_text = "b".repeat(100);
        assert_eq!(truncate_review_text(&short_text), short_text);

        // Boundary: exactly at the limit stays untouched
        let exact = "c".repeat(240);
        assert_eq!(truncate_review_text(&exact), exact);
    }
}
