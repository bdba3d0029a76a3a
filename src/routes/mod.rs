// Route definitions

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::AppState;

mod api;
mod filters;
mod pages;

pub fn create_router(app_state: AppState) -> Router {
    // JSON mirror of the storefront for scripted clients
    let api_router = Router::new()
        .route("/facets", get(api::get_facets))
        .route("/cars", get(api::get_cars))
        .route("/cars/:id", get(api::get_car))
        .route("/filters", post(api::apply_filters))
        .with_state(app_state.clone());

    Router::new()
        // The root renders the listing exactly like /cars
        .route("/", get(pages::listing_page))
        .route("/cars", get(pages::listing_page))
        .route("/cars/filters", post(filters::apply_filters))
        .route("/cars/filters/reset", post(filters::reset_filters))
        .route("/cars/:id", get(pages::detail_page))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
