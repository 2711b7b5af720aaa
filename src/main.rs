// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, the Maps client, and start the HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{MapsClient, SearchConfig};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting turf-radar service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize the shared Maps client (owns the per-category caches)
    let maps_client = Arc::new(MapsClient::with_settings(
        config.google_maps_api_key.clone(),
        config.geocode_region.clone(),
        config.cache_ttl_seconds,
        config.detail_concurrency,
    ));
    log::info!(
        "Initialized Maps client (cache TTL: {}s, detail concurrency: {})",
        config.cache_ttl_seconds,
        config.detail_concurrency
    );

    // 5. Search keyword/type lists (Bengaluru turf defaults)
    let search_config = SearchConfig::default();

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (Maps client, config, keyword lists)
            .app_data(web::Data::new(maps_client.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(search_config.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::turfs_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
