// Handlers for the JSON API endpoints

use axum::{
    extract::{Json as JsonExtract, Path, RawQuery, State},
    response::{IntoResponse, Json},
};
use serde::Serialize;

use crate::{
    AppState,
    error::AppError,
    facets::Facets,
    models::CarRecord,
    query::{self, FilterState, ListingQuery},
};

#[derive(Serialize)]
struct CarsResponse {
    page: u32,
    total_pages: u32,
    results: Vec<CarRecord>,
}

// GET /api/facets
pub async fn get_facets(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /api/facets - Request received.");
    let records = app_state.api.fetch_all().await?;
    Ok(Json(Facets::derive(&records)))
}

// GET /api/cars
pub async fn get_cars(
    State(app_state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(query = raw.as_deref().unwrap_or(""), "[HANDLER] /api/cars - Request received.");
    let request = ListingQuery::parse(raw.as_deref()).listing_request();
    let page = app_state.api.fetch_page(&request).await?;
    Ok(Json(CarsResponse {
        page: request.page,
        total_pages: page.total_pages,
        results: page.results,
    }))
}

// GET /api/cars/:id
pub async fn get_car(
    State(app_state): State<AppState>,
    Path(car_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(car_id, "[HANDLER] /api/cars/:id - Request received.");
    let car = app_state.api.fetch_car(&car_id).await?;
    Ok(Json(car))
}

// POST /api/filters
// Same Apply as the HTML form, but the rejected range keys are returned to the caller.
pub async fn apply_filters(
    State(app_state): State<AppState>,
    JsonExtract(state): JsonExtract<FilterState>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(?state, "[HANDLER] /api/filters - Request received.");
    let records = app_state.api.fetch_all().await?;
    let outcome = query::apply(&state, &Facets::derive(&records));
    Ok(Json(outcome))
}
