// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod distance;
pub mod maps_client;
pub mod result_builder;
pub mod search_service;

pub use cache::*;
pub use distance::*;
pub use maps_client::*;
pub use result_builder::*;
pub use search_service::*;
