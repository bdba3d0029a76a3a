// Filter form submission: Apply replaces the listing URL, Reset clears it

use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::AppResult,
    facets::Facets,
    models::SortOrder,
    query::{self, FilterState},
};

// Raw form fields; browsers submit empty strings for untouched inputs
#[derive(Debug, Default, Deserialize)]
pub struct FilterSubmission {
    brand: Option<String>,
    model: Option<String>,
    fuel_type: Option<String>,
    body_style: Option<String>,
    translation: Option<String>,
    mileage_min: Option<String>,
    mileage_max: Option<String>,
    power_ps_min: Option<String>,
    power_ps_max: Option<String>,
    date_of_registration_start: Option<String>,
    date_of_registration_end: Option<String>,
    sort: Option<String>,
}

fn text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn number(value: Option<String>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

impl From<FilterSubmission> for FilterState {
    fn from(form: FilterSubmission) -> Self {
        FilterState {
            brand: text(form.brand),
            model: text(form.model),
            fuel_type: text(form.fuel_type),
            body_style: text(form.body_style),
            translation: text(form.translation),
            mileage_min: number(form.mileage_min),
            mileage_max: number(form.mileage_max),
            power_ps_min: number(form.power_ps_min),
            power_ps_max: number(form.power_ps_max),
            date_of_registration_start: number(form.date_of_registration_start),
            date_of_registration_end: number(form.date_of_registration_end),
            sort: form.sort.as_deref().and_then(SortOrder::parse),
        }
    }
}

// POST /cars/filters
pub async fn apply_filters(
    State(app_state): State<AppState>,
    Form(form): Form<FilterSubmission>,
) -> AppResult<impl IntoResponse> {
    let state = FilterState::from(form);
    tracing::info!(?state, "[HANDLER] /cars/filters - Applying filters.");

    // Bounds come from the full dataset, never from the currently filtered page
    let facets = match app_state.api.fetch_all().await {
        Ok(records) => Facets::derive(&records),
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch filter bounds, treating ranges as unbounded");
            Facets::default()
        }
    };

    let outcome = query::apply(&state, &facets);
    if !outcome.rejected.is_empty() {
        tracing::info!(rejected = ?outcome.rejected, "Ignoring out-of-range filters");
    }
    Ok(Redirect::to(&outcome.location))
}

// POST /cars/filters/reset
pub async fn reset_filters() -> impl IntoResponse {
    tracing::info!("[HANDLER] /cars/filters/reset - Clearing filters.");
    Redirect::to(query::reset_location())
}
