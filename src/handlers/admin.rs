// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for cache housekeeping
// PURPOSE: Expose cache stats and pruning via token-protected endpoints

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::config::Config;
use crate::errors::TurfError;
use crate::services::MapsClient;

/// GET /admin/cache/stats
/// Per-category cache statistics (geocode, search, details)
pub async fn cache_stats(
    client: web::Data<Arc<MapsClient>>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, TurfError> {
    verify_admin_token(&req, &config)?;

    let stats = client.cache_stats().await;
    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/cache/prune
/// Remove expired entries across all caches
pub async fn prune_caches(
    client: web::Data<Arc<MapsClient>>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, TurfError> {
    verify_admin_token(&req, &config)?;

    let removed = client.prune_caches().await;
    log::info!("Admin cache prune removed {} entries", removed);

    Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}

/// Check the X-Admin-Token header against the configured token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), TurfError> {
    let provided = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == config.admin_token => Ok(()),
        _ => Err(TurfError::Unauthorized),
    }
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache/stats", web::get().to(cache_stats))
            .route("/cache/prune", web::post().to(prune_caches)),
    );
}
