//! Reconciliation between the listing URL, the pending filter selection and
//! the listing API request.
//!
//! The URL query string is the single source of truth for what is being viewed.
//! It is captured once per request as an immutable [`ListingQuery`] and every
//! other representation is derived from it with pure functions:
//!
//! - [`ListingQuery::effective`] reads the URL into a [`FilterState`] used to prefill the form.
//! - [`ListingQuery::listing_request`] builds the outgoing API parameters.
//! - [`apply`] turns a submitted [`FilterState`] into a replacement query string.
//! - [`ListingQuery::page_href`] merges a new page number into the current query.
//!
//! Fallback precedence for every field is, in order: URL value, facet-derived
//! default, hardcoded default. Categorical fields and `sort` have no derived or
//! hardcoded default (absent means "no filter"), `page` has only the hardcoded 1.

use serde::{Deserialize, Deserializer, Serialize};
use url::form_urlencoded;

use crate::facets::{Facets, RangeBounds};
use crate::models::SortOrder;

pub const LISTING_PATH: &str = "/cars";

pub const PAGE_KEY: &str = "page";
pub const SORT_KEY: &str = "sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    Brand,
    Model,
    FuelType,
    BodyStyle,
    Translation,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Brand,
        CategoricalField::Model,
        CategoricalField::FuelType,
        CategoricalField::BodyStyle,
        CategoricalField::Translation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CategoricalField::Brand => "brand",
            CategoricalField::Model => "model",
            CategoricalField::FuelType => "fuel_type",
            CategoricalField::BodyStyle => "body_style",
            CategoricalField::Translation => "translation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Mileage,
    PowerPs,
    Registration,
}

impl RangeField {
    pub const ALL: [RangeField; 3] = [RangeField::Mileage, RangeField::PowerPs, RangeField::Registration];

    /// (lower key, upper key) as used in both the listing URL and the API.
    pub fn keys(self) -> (&'static str, &'static str) {
        match self {
            RangeField::Mileage => ("mileage_min", "mileage_max"),
            RangeField::PowerPs => ("power_ps_min", "power_ps_max"),
            RangeField::Registration => ("date_of_registration_start", "date_of_registration_end"),
        }
    }

    pub fn bounds(self, facets: &Facets) -> RangeBounds {
        match self {
            RangeField::Mileage => facets.mileage,
            RangeField::PowerPs => facets.power_ps,
            RangeField::Registration => facets.registration_year,
        }
    }

    // Last link of the fallback chain, used only when the facets are unbounded
    fn hardcoded(self) -> Option<(i64, i64)> {
        match self {
            RangeField::Registration => Some((1900, 2025)),
            RangeField::Mileage | RangeField::PowerPs => None,
        }
    }

    fn default_pair(self, facets: &Facets) -> (Option<i64>, Option<i64>) {
        match self.bounds(facets) {
            RangeBounds::Bounded { min, max } => (Some(min), Some(max)),
            RangeBounds::Unbounded => self.hardcoded().map_or((None, None), |(lo, hi)| (Some(lo), Some(hi))),
        }
    }
}

/// The user's pending (not yet applied) filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub body_style: Option<String>,
    pub translation: Option<String>,
    pub mileage_min: Option<i64>,
    pub mileage_max: Option<i64>,
    pub power_ps_min: Option<i64>,
    pub power_ps_max: Option<i64>,
    pub date_of_registration_start: Option<i64>,
    pub date_of_registration_end: Option<i64>,
    #[serde(deserialize_with = "lenient_sort")]
    pub sort: Option<SortOrder>,
}

// `""` and unknown orders mean "unsorted", as in the HTML form
fn lenient_sort<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SortOrder>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(SortOrder::parse))
}

impl FilterState {
    /// Cleared selection: no categoricals, ranges spanning the facet bounds, no sort.
    pub fn reset(facets: &Facets) -> Self {
        let mut state = FilterState::default();
        for field in RangeField::ALL {
            state.set_range(field, field.default_pair(facets));
        }
        state
    }

    pub fn categorical(&self, field: CategoricalField) -> Option<&str> {
        let value = match field {
            CategoricalField::Brand => &self.brand,
            CategoricalField::Model => &self.model,
            CategoricalField::FuelType => &self.fuel_type,
            CategoricalField::BodyStyle => &self.body_style,
            CategoricalField::Translation => &self.translation,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    fn set_categorical(&mut self, field: CategoricalField, value: Option<String>) {
        let slot = match field {
            CategoricalField::Brand => &mut self.brand,
            CategoricalField::Model => &mut self.model,
            CategoricalField::FuelType => &mut self.fuel_type,
            CategoricalField::BodyStyle => &mut self.body_style,
            CategoricalField::Translation => &mut self.translation,
        };
        *slot = value;
    }

    pub fn range(&self, field: RangeField) -> (Option<i64>, Option<i64>) {
        match field {
            RangeField::Mileage => (self.mileage_min, self.mileage_max),
            RangeField::PowerPs => (self.power_ps_min, self.power_ps_max),
            RangeField::Registration => (self.date_of_registration_start, self.date_of_registration_end),
        }
    }

    fn set_range(&mut self, field: RangeField, (lo, hi): (Option<i64>, Option<i64>)) {
        match field {
            RangeField::Mileage => {
                self.mileage_min = lo;
                self.mileage_max = hi;
            }
            RangeField::PowerPs => {
                self.power_ps_min = lo;
                self.power_ps_max = hi;
            }
            RangeField::Registration => {
                self.date_of_registration_start = lo;
                self.date_of_registration_end = hi;
            }
        }
    }
}

/// Result of applying a [`FilterState`]: the replacement URL plus the range keys
/// that were dropped because they fell outside the facet bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub query: String,
    pub location: String,
    pub rejected: Vec<&'static str>,
}

/// Builds the query string for an explicit filter submission.
///
/// Only meaningful keys are written. A range pair is written only when both
/// ends are present, `lo <= hi`, and both lie within the facet bounds;
/// otherwise the whole pair is omitted (never clamped) and reported in
/// `rejected`. The result replaces the current URL, it is never merged.
pub fn apply(state: &FilterState, facets: &Facets) -> ApplyOutcome {
    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut rejected = Vec::new();

    for field in CategoricalField::ALL {
        if let Some(value) = state.categorical(field) {
            query.append_pair(field.key(), value);
        }
    }

    for field in RangeField::ALL {
        let (lo_key, hi_key) = field.keys();
        match state.range(field) {
            (Some(lo), Some(hi)) if lo <= hi && field.bounds(facets).admits(lo, hi) => {
                query.append_pair(lo_key, &lo.to_string());
                query.append_pair(hi_key, &hi.to_string());
            }
            (None, None) => {}
            (lo, hi) => {
                tracing::debug!(field = lo_key, ?lo, ?hi, bounds = ?field.bounds(facets), "Dropping out-of-range filter");
                rejected.push(lo_key);
                rejected.push(hi_key);
            }
        }
    }

    if let Some(sort) = state.sort {
        query.append_pair(SORT_KEY, sort.as_str());
    }

    let query = query.finish();
    let location = listing_location(&query);
    ApplyOutcome { query, location, rejected }
}

/// Location of the cleared listing: the bare path, no query string.
pub fn reset_location() -> &'static str {
    LISTING_PATH
}

fn listing_location(query: &str) -> String {
    if query.is_empty() {
        LISTING_PATH.to_string()
    } else {
        format!("{}?{}", LISTING_PATH, query)
    }
}

/// Immutable snapshot of the listing URL's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pairs: Vec<(String, String)>,
}

impl ListingQuery {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| {
                form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        ListingQuery { pairs }
    }

    // First occurrence wins; an empty value counts as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn page(&self) -> u32 {
        self.get(PAGE_KEY)
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.get(SORT_KEY).and_then(SortOrder::parse)
    }

    fn number(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse::<i64>().ok())
    }

    /// Filters exactly as written in the URL, with no fallbacks.
    fn explicit_filters(&self) -> FilterState {
        let mut state = FilterState {
            sort: self.sort(),
            ..Default::default()
        };
        for field in CategoricalField::ALL {
            state.set_categorical(field, self.get(field.key()).map(str::to_string));
        }
        for field in RangeField::ALL {
            let (lo_key, hi_key) = field.keys();
            state.set_range(field, (self.number(lo_key), self.number(hi_key)));
        }
        state
    }

    /// Effective selection: URL values, with each missing range end filled
    /// from the facet bounds (then the hardcoded default).
    ///
    /// Starts from the cleared selection, so a bare `/cars` reads back exactly
    /// as [`FilterState::reset`].
    pub fn effective(&self, facets: &Facets) -> FilterState {
        let explicit = self.explicit_filters();
        let mut state = FilterState {
            sort: explicit.sort,
            ..FilterState::reset(facets)
        };
        for field in CategoricalField::ALL {
            state.set_categorical(field, explicit.categorical(field).map(str::to_string));
        }
        for field in RangeField::ALL {
            let (lo, hi) = explicit.range(field);
            let (default_lo, default_hi) = state.range(field);
            state.set_range(field, (lo.or(default_lo), hi.or(default_hi)));
        }
        state
    }

    /// Parameters for the paginated listing call.
    ///
    /// Absent range ends are left out instead of being filled with the facet
    /// bounds: the bounds are the extremes of the full dataset, so omitting
    /// them constrains nothing and the call need not wait for the facets.
    pub fn listing_request(&self) -> ListingRequest {
        ListingRequest {
            page: self.page(),
            filters: self.explicit_filters(),
        }
    }

    /// Link to `page` keeping every other key of the current query untouched.
    pub fn page_href(&self, page: u32) -> String {
        let mut pairs = self.pairs.clone();
        let page_value = page.to_string();
        match pairs.iter().position(|(k, _)| k == PAGE_KEY) {
            Some(first) => {
                pairs[first].1 = page_value;
                let mut index = 0;
                pairs.retain(|(k, _)| {
                    let keep = k != PAGE_KEY || index == first;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((PAGE_KEY.to_string(), page_value)),
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish();
        listing_location(&query)
    }
}

/// Outgoing parameters for `GET {base}/car_lists/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub page: u32,
    pub filters: FilterState,
}

impl ListingRequest {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(PAGE_KEY, self.page.to_string())];
        for field in CategoricalField::ALL {
            if let Some(value) = self.filters.categorical(field) {
                pairs.push((field.key(), value.to_string()));
            }
        }
        for field in RangeField::ALL {
            let (lo_key, hi_key) = field.keys();
            let (lo, hi) = self.filters.range(field);
            if let Some(lo) = lo {
                pairs.push((lo_key, lo.to_string()));
            }
            if let Some(hi) = hi {
                pairs.push((hi_key, hi.to_string()));
            }
        }
        if let Some(sort) = self.filters.sort {
            pairs.push((SORT_KEY, sort.as_str().to_string()));
        }
        pairs
    }
}
