// Car listing storefront over the zapsell.ch marketplace API

use std::sync::Arc;

use axum::extract::FromRef;

pub mod config;
pub mod error;
pub mod facets;
pub mod gallery;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod views;
pub mod zapsell_api;

use config::Settings;
use zapsell_api::ListingApi;

// Shared application state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub api: ListingApi,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        // One client for the whole process; it carries the timeout and user agent
        let http_client = Arc::new(zapsell_api::build_client(&settings)?);
        let api = ListingApi::new(http_client, &settings);
        Ok(AppState { api })
    }
}
