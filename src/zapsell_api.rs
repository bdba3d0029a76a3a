// Functions to interact with the zapsell.ch marketplace listing API

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Settings;
use crate::models::{CarRecord, ListingPage, RecordList};
use crate::query::ListingRequest;

// Fields the facet deriver reads from the bulk dataset
pub const FACET_FIELDS: &str =
    "brand,model,fuel_type,body_style,translation,mileage,power_ps,year_of_registration";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("listing API unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("listing API answered {status}")]
    Status { status: reqwest::StatusCode },
    #[error("listing API returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("no car with id '{0}'")]
    NotFound(String),
}

impl ApiError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e)
        } else if let Some(status) = e.status() {
            ApiError::Status { status }
        } else {
            ApiError::Network(e)
        }
    }
}

/// Builds the shared client used for every listing call.
pub fn build_client(settings: &Settings) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .context("Failed to build shared reqwest client")
}

#[derive(Clone)]
pub struct ListingApi {
    client: Arc<Client>,
    endpoint: String,
}

impl ListingApi {
    pub fn new(client: Arc<Client>, settings: &Settings) -> Self {
        ListingApi {
            client,
            endpoint: settings.car_lists_url(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<T, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, ?query, "Calling listing API");
        let response = self
            .client
            .get(&self.endpoint)
            .query(query)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, ?query, "Listing API returned an error status");
            return Err(ApiError::Status { status });
        }

        response.json::<T>().await.map_err(ApiError::from_transport)
    }

    /// One page of results for the given filters.
    pub async fn fetch_page(&self, request: &ListingRequest) -> Result<ListingPage, ApiError> {
        let page: ListingPage = self.get(&request.to_pairs()).await?;
        tracing::info!(
            page = request.page,
            results = page.results.len(),
            total_pages = page.total_pages,
            "Fetched listing page"
        );
        Ok(page)
    }

    /// The unfiltered, unpaginated dataset, projected to the facet fields.
    pub async fn fetch_all(&self) -> Result<Vec<CarRecord>, ApiError> {
        let query = [("all", "true".to_string()), ("fields", FACET_FIELDS.to_string())];
        let list: RecordList = self.get(&query).await?;
        tracing::info!(records = list.results.len(), "Fetched bulk dataset");
        Ok(list.results)
    }

    /// A single record; zero results is `NotFound`.
    pub async fn fetch_car(&self, car_id: &str) -> Result<CarRecord, ApiError> {
        let list: RecordList = self.get(&[("car_id", car_id.to_string())]).await?;
        list.results.into_iter().next().ok_or_else(|| {
            tracing::info!(car_id, "No car found with the given id");
            ApiError::NotFound(car_id.to_string())
        })
    }
}
