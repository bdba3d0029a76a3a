// Listing fetch cycle: Loading -> Ready | Error, plus the per-request load that
// runs the listing call and the facet call side by side.

use std::fmt::Display;

use futures::join;

use crate::facets::Facets;
use crate::models::ListingPage;
use crate::query::ListingQuery;
use crate::zapsell_api::ListingApi;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Ready(T),
    Error { message: String },
}

impl<T> FetchState<T> {
    /// Settles a fetch. Any state may be resolved again: a later Ready clears an
    /// earlier Error and a later Error replaces an earlier Ready.
    ///
    /// Each listing request owns its own state, so there is nothing to guard
    /// against superseded fetches here: when the browser navigates away axum
    /// drops the handler future and the in-flight reqwest call with it.
    pub fn resolve<E: Display>(self, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FetchState::Ready(value),
            Err(e) => FetchState::Error { message: e.to_string() },
        }
    }
}

pub struct ListingLoad {
    pub query: ListingQuery,
    pub listing: FetchState<ListingPage>,
    pub facets: Facets,
    // Set when the bulk dataset could not be fetched; facets are then empty
    pub facet_error: Option<String>,
}

/// Runs the listing call and the bulk facet call concurrently. Neither failure
/// aborts the load: both are logged and surfaced as error state.
pub async fn load_listing(api: &ListingApi, query: ListingQuery) -> ListingLoad {
    let request = query.listing_request();
    let listing = FetchState::Loading;

    let (page_result, bulk_result) = join!(api.fetch_page(&request), api.fetch_all());

    if let Err(e) = &page_result {
        tracing::error!(error = %e, page = request.page, "Error fetching cars");
    }
    let listing = listing.resolve(page_result);

    let (facets, facet_error) = match bulk_result {
        Ok(records) => (Facets::derive(&records), None),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching filter options");
            (Facets::default(), Some(e.to_string()))
        }
    };

    ListingLoad {
        query,
        listing,
        facets,
        facet_error,
    }
}
