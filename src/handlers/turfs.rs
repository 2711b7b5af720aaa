// src/handlers/turfs.rs
// DOCUMENTATION: HTTP handlers for turf discovery
// PURPOSE: Parse requests, run the search pipeline, return responses

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::Config;
use crate::errors::TurfError;
use crate::models::{Coordinate, TurfSearchQuery, TurfSearchResponse};
use crate::services::{
    build_result, distance_km, sort_by_distance, within_radius, MapsClient, SearchConfig,
    SearchService,
};

/// Provider page cap doubles as the output cap
const MAX_RESULTS_CAP: usize = 20;

/// GET /turfs/search
/// Run the full discovery pipeline around a point or a geocoded address
pub async fn search_turfs(
    client: web::Data<Arc<MapsClient>>,
    search_config: web::Data<SearchConfig>,
    app_config: web::Data<Config>,
    query: web::Query<TurfSearchQuery>,
) -> Result<impl Responder, TurfError> {
    let query = query.into_inner();

    if let Err(e) = query.validate() {
        return Err(TurfError::ValidationError(e.to_string()));
    }

    // Resolve the search origin: coordinates and address are mutually
    // exclusive inputs
    let (origin, origin_address) = match (query.lat, query.lng, query.address.as_deref()) {
        (Some(_), Some(_), Some(_)) => {
            return Err(TurfError::ValidationError(
                "Provide either lat/lng or address, not both".to_string(),
            ));
        }
        (Some(lat), Some(lng), None) => {
            let origin = Coordinate::new(lat, lng);
            origin.validate()?;
            (origin, None)
        }
        (None, None, Some(address)) if !address.trim().is_empty() => {
            let geocoded = client.geocode(address, None).await?;
            let formatted = geocoded.formatted_address.clone();
            (geocoded.coordinate(), Some(formatted))
        }
        _ => {
            return Err(TurfError::ValidationError(
                "Provide lat and lng together, or an address".to_string(),
            ));
        }
    };

    let radius_km = query.radius_km.unwrap_or(app_config.default_radius_km);
    let max_results = query
        .max_results
        .unwrap_or(MAX_RESULTS_CAP)
        .min(MAX_RESULTS_CAP);
    let enrich = query.enrich.unwrap_or(true);

    log::info!(
        "Turf search: origin=({}, {}), radius={}km, keyword={:?}, max={}",
        origin.lat,
        origin.lng,
        radius_km,
        query.keyword,
        max_results
    );

    let mut places = SearchService::search_turfs(
        client.get_ref(),
        search_config.get_ref(),
        origin,
        radius_km,
        query.keyword.as_deref(),
        max_results,
    )
    .await;

    sort_by_distance(&mut places, origin, |p| p.coordinate());
    places.retain(|p| match p.coordinate() {
        Some(c) => within_radius(distance_km(origin, c), radius_km),
        None => true,
    });

    // Best-effort enrichment: a place whose detail fetch fails surfaces
    // with summary-only fields
    let details = if enrich {
        let ids: Vec<String> = places.iter().map(|p| p.id.clone()).collect();
        client.place_details_batch(&ids, None).await
    } else {
        Default::default()
    };

    let results: Vec<_> = places
        .iter()
        .map(|place| {
            let d = place
                .coordinate()
                .map(|c| distance_km(origin, c))
                .unwrap_or(0.0);
            let detail = details.get(&place.id).and_then(|d| d.as_ref());
            build_result(place, detail, d, client.get_ref())
        })
        .collect();

    Ok(HttpResponse::Ok().json(TurfSearchResponse {
        origin,
        origin_address,
        radius_km,
        count: results.len(),
        results,
    }))
}

/// GET /turfs/{place_id}
/// Fetch one place's extended record
pub async fn get_turf(
    client: web::Data<Arc<MapsClient>>,
    path: web::Path<String>,
) -> Result<impl Responder, TurfError> {
    let place_id = path.into_inner();

    match client.place_details(&place_id).await {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Err(TurfError::NotFound(place_id)),
    }
}

/// Configuration for turf routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/turfs")
            .route("/search", web::get().to(search_turfs))
            .route("/{place_id}", web::get().to(get_turf)),
    );
}
