// src/services/search_service.rs
// DOCUMENTATION: Turf search aggregation pipeline
// PURPOSE: Fan out keyword searches, merge by place id, filter non-turf
// venues and cap the result count

use std::collections::HashSet;
use std::future::Future;

use crate::errors::TurfError;
use crate::models::{Coordinate, PlaceSummary};
use crate::services::MapsClient;

/// Keyword and type lists driving the aggregation
/// DOCUMENTATION: Defaults are tuned for artificial-grass sports grounds
/// in Bengaluru; the filtering algorithm itself is list-agnostic
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Free-text queries issued in order (primary discovery mechanism -
    /// the provider's type taxonomy does not tag turfs reliably)
    pub default_keywords: Vec<String>,
    /// Venue-type codes for the supplementary typed seed pass
    pub included_types: Vec<String>,
    /// Name substrings that mark a venue as non-turf (case-insensitive)
    pub excluded_keywords: Vec<String>,
    /// Venue-type codes that mark a venue as non-turf
    pub excluded_types: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_keywords: vec![
                "turf".to_string(),
                "football turf".to_string(),
                "cricket turf".to_string(),
                "box cricket".to_string(),
                "sports turf".to_string(),
                "turf ground".to_string(),
                "5 a side football".to_string(),
            ],
            included_types: vec![
                "sports_complex".to_string(),
                "stadium".to_string(),
                "sports_club".to_string(),
                "athletic_field".to_string(),
                "sports_activity_location".to_string(),
                "gym".to_string(),
            ],
            excluded_keywords: vec![
                "bowling".to_string(),
                "arcade".to_string(),
                "snooker".to_string(),
                "billiards".to_string(),
                "gaming".to_string(),
                "trampoline".to_string(),
                "spa".to_string(),
                "salon".to_string(),
                "restaurant".to_string(),
                "cafe".to_string(),
                "bakery".to_string(),
                "banquet".to_string(),
                "resort".to_string(),
            ],
            excluded_types: vec![
                "bowling_alley".to_string(),
                "amusement_center".to_string(),
                "amusement_park".to_string(),
                "restaurant".to_string(),
                "cafe".to_string(),
                "bar".to_string(),
                "night_club".to_string(),
                "movie_theater".to_string(),
                "shopping_mall".to_string(),
                "spa".to_string(),
            ],
        }
    }
}

/// Turf search aggregator
pub struct SearchService;

impl SearchService {
    /// Discover turf venues around a point
    /// DOCUMENTATION: Orchestrates the full pipeline:
    /// 1. Build the ordered keyword plan (custom keyword first)
    /// 2. Typed nearby seed pass (failure logged, non-fatal)
    /// 3. Sequential free-text pass per keyword (failures non-fatal),
    ///    stopping early once `max_results` unique places accumulate
    /// 4. Exclusion filter by name substring OR type intersection
    /// 5. Truncate to `max_results` preserving discovery order
    ///
    /// Results are not distance-sorted here - the caller sorts once it
    /// knows the search origin.
    pub async fn search_turfs(
        client: &MapsClient,
        config: &SearchConfig,
        center: Coordinate,
        radius_km: f64,
        custom_keyword: Option<&str>,
        max_results: usize,
    ) -> Vec<PlaceSummary> {
        let keywords = build_keyword_plan(custom_keyword, &config.default_keywords);

        let mut unique: Vec<PlaceSummary> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        // Supplementary typed seed pass, layered first to catch facilities
        // the text passes might miss
        match client
            .nearby_search(center.lat, center.lng, radius_km, &config.included_types)
            .await
        {
            Ok(places) => {
                let added = merge_unique(&mut unique, &mut seen, places);
                log::debug!("Nearby seed pass added {} unique places", added);
            }
            Err(e) => {
                log::warn!("Nearby seed pass failed, continuing with keywords: {}", e);
            }
        }

        run_keyword_passes(&mut unique, &mut seen, &keywords, max_results, |kw| {
            let kw = kw.clone();
            async move { client.text_search(&kw, center.lat, center.lng, radius_km).await }
        })
        .await;

        let before = unique.len();
        let mut filtered = apply_exclusions(unique, config);
        log::info!(
            "Aggregated {} unique places, {} after exclusion filter",
            before,
            filtered.len()
        );

        filtered.truncate(max_results);
        filtered
    }
}

/// Build the ordered keyword list for the text passes
/// DOCUMENTATION: A custom keyword goes first; the default list follows
/// with the custom keyword removed so no query text runs twice
pub fn build_keyword_plan(custom: Option<&str>, defaults: &[String]) -> Vec<String> {
    let mut plan = Vec::new();

    match custom {
        Some(kw) if !kw.trim().is_empty() => {
            let kw = kw.trim();
            plan.push(kw.to_string());
            for default in defaults {
                if !default.eq_ignore_ascii_case(kw) {
                    plan.push(default.clone());
                }
            }
        }
        _ => plan.extend(defaults.iter().cloned()),
    }

    plan
}

/// Merge new places into the accumulator, first-seen wins by id
/// DOCUMENTATION: Duplicate sightings are discarded whole - field content
/// is never merged across copies. Returns how many places were added.
pub fn merge_unique(
    acc: &mut Vec<PlaceSummary>,
    seen: &mut HashSet<String>,
    places: Vec<PlaceSummary>,
) -> usize {
    let mut added = 0;
    for place in places {
        if seen.insert(place.id.clone()) {
            acc.push(place);
            added += 1;
        }
    }
    added
}

/// Run the sequential keyword passes with early stop
/// DOCUMENTATION: One search at a time, in plan order; no further pass is
/// issued once the accumulated unique count reaches `max_results`. Each
/// pass failure is logged and skipped. Generic over the fetch closure so
/// the loop is testable against stubs.
pub async fn run_keyword_passes<F, Fut>(
    acc: &mut Vec<PlaceSummary>,
    seen: &mut HashSet<String>,
    keywords: &[String],
    max_results: usize,
    mut fetch: F,
) where
    F: FnMut(&String) -> Fut,
    Fut: Future<Output = Result<Vec<PlaceSummary>, TurfError>>,
{
    for keyword in keywords {
        if acc.len() >= max_results {
            log::debug!(
                "Early stop: {} unique places reached before \"{}\"",
                acc.len(),
                keyword
            );
            break;
        }

        match fetch(keyword).await {
            Ok(places) => {
                let added = merge_unique(acc, seen, places);
                log::debug!("Keyword \"{}\" added {} unique places", keyword, added);
            }
            Err(e) => {
                log::warn!("Keyword \"{}\" search failed, skipping: {}", keyword, e);
            }
        }
    }
}

/// Exclusion filter: name substring OR type intersection removes a place
pub fn apply_exclusions(places: Vec<PlaceSummary>, config: &SearchConfig) -> Vec<PlaceSummary> {
    places
        .into_iter()
        .filter(|p| !is_excluded(p, config))
        .collect()
}

/// Check whether a place matches either exclusion list
pub fn is_excluded(place: &PlaceSummary, config: &SearchConfig) -> bool {
    if let Some(name) = place.name() {
        let name_lower = name.to_lowercase();
        if config
            .excluded_keywords
            .iter()
            .any(|kw| name_lower.contains(kw.as_str()))
        {
            return true;
        }
    }

    place
        .types
        .iter()
        .any(|t| config.excluded_types.iter().any(|ex| ex == t))
}
