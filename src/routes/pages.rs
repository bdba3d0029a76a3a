// Server-rendered storefront pages: the listing and a single car's detail

use askama::Template;
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    AppState,
    error::AppResult,
    gallery::{GalleryParams, GalleryState},
    listing::{self, FetchState, ListingLoad},
    pagination::Pagination,
    query::ListingQuery,
    views::{CarCard, DetailView, FilterForm},
    zapsell_api::ApiError,
};

#[derive(Template)]
#[template(path = "cars.html")]
struct CarsTemplate {
    form: FilterForm,
    cards: Vec<CarCard>,
    pagination: Option<Pagination>,
    listing_error: Option<String>,
    facet_error: bool,
}

impl CarsTemplate {
    fn from_load(load: &ListingLoad) -> Self {
        let form = FilterForm::new(&load.query.effective(&load.facets), &load.facets);
        let (page, listing_error) = match &load.listing {
            FetchState::Ready(page) => (Some(page), None),
            FetchState::Error { .. } => (
                None,
                Some("We could not load the cars right now. Please try again.".to_string()),
            ),
            FetchState::Loading => (None, None),
        };
        CarsTemplate {
            form,
            cards: page
                .map(|p| p.results.iter().map(CarCard::from).collect())
                .unwrap_or_default(),
            pagination: page.map(|p| Pagination::new(&load.query, p.total_pages)),
            listing_error,
            facet_error: load.facet_error.is_some(),
        }
    }
}

#[derive(Template)]
#[template(path = "car_detail.html")]
struct CarDetailTemplate {
    car: DetailView,
}

#[derive(Template)]
#[template(path = "notice.html")]
struct NoticeTemplate {
    title: String,
    message: String,
}

// GET / and GET /cars
pub async fn listing_page(
    State(app_state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<impl IntoResponse> {
    tracing::info!(query = raw.as_deref().unwrap_or(""), "[HANDLER] /cars - Request received.");
    let query = ListingQuery::parse(raw.as_deref());
    let load = listing::load_listing(&app_state.api, query).await;
    let html = CarsTemplate::from_load(&load).render()?;
    Ok(Html(html))
}

// GET /cars/:id
pub async fn detail_page(
    State(app_state): State<AppState>,
    Path(car_id): Path<String>,
    Query(params): Query<GalleryParams>,
) -> AppResult<Response> {
    tracing::info!(car_id, "[HANDLER] /cars/:id - Request received.");
    match app_state.api.fetch_car(&car_id).await {
        Ok(car) => {
            let gallery = GalleryState::from_params(&params, &car);
            let html = CarDetailTemplate { car: DetailView::new(&car, &gallery) }.render()?;
            Ok(Html(html).into_response())
        }
        Err(ApiError::NotFound(_)) => {
            let html = NoticeTemplate {
                title: "Car not found".to_string(),
                message: "This car is no longer listed.".to_string(),
            }
            .render()?;
            Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
        }
        Err(e) => {
            tracing::error!(car_id, error = %e, "Error fetching car details");
            let html = NoticeTemplate {
                title: "Car details unavailable".to_string(),
                message: "We could not load this car right now. Please try again.".to_string(),
            }
            .render()?;
            Ok((StatusCode::BAD_GATEWAY, Html(html)).into_response())
        }
    }
}
