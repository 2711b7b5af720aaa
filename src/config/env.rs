// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Maps Platform API key (Geocoding + Places APIs)
    pub google_maps_api_key: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Admin authentication token (for cache housekeeping endpoints)
    pub admin_token: String,

    /// Cache TTL in seconds for geocode/search/details responses
    pub cache_ttl_seconds: u64,

    /// Maximum concurrent Place Details requests per batch
    pub detail_concurrency: usize,

    /// Default search radius in kilometers
    pub default_radius_km: f64,

    /// Region bias for geocoding (ccTLD country code)
    pub geocode_region: String,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Config {
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").unwrap_or_else(|_| String::new()),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8003".to_string())
                .parse()
                .unwrap_or(8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin-token-dev".to_string()),

            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap_or(600),

            detail_concurrency: env::var("DETAIL_CONCURRENCY")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            default_radius_km: env::var("DEFAULT_RADIUS_KM")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5.0),

            geocode_region: env::var("GEOCODE_REGION").unwrap_or_else(|_| "in".to_string()),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.google_maps_api_key.is_empty() {
            return Err("GOOGLE_MAPS_API_KEY is required".to_string());
        }

        if self.detail_concurrency == 0 {
            return Err("DETAIL_CONCURRENCY must be at least 1".to_string());
        }

        if !(self.default_radius_km > 0.0 && self.default_radius_km <= 50.0) {
            return Err("DEFAULT_RADIUS_KM must be in (0, 50]".to_string());
        }

        Ok(())
    }
}
