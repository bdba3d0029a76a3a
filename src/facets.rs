// Derives the filter facets (categorical value sets and numeric bounds) from the bulk dataset

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::CarRecord;

/// Observed `{min, max}` of a numeric field.
///
/// An empty bulk dataset has no extremes; that case is `Unbounded` instead of
/// the infinities a naive min/max fold would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeBounds {
    Bounded { min: i64, max: i64 },
    Unbounded,
}

impl RangeBounds {
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        values.into_iter().fold(RangeBounds::Unbounded, |acc, v| match acc {
            RangeBounds::Unbounded => RangeBounds::Bounded { min: v, max: v },
            RangeBounds::Bounded { min, max } => RangeBounds::Bounded {
                min: min.min(v),
                max: max.max(v),
            },
        })
    }

    pub fn min(&self) -> Option<i64> {
        match self {
            RangeBounds::Bounded { min, .. } => Some(*min),
            RangeBounds::Unbounded => None,
        }
    }

    pub fn max(&self) -> Option<i64> {
        match self {
            RangeBounds::Bounded { max, .. } => Some(*max),
            RangeBounds::Unbounded => None,
        }
    }

    // True when both ends of a submitted pair lie inside the observed bounds
    pub fn admits(&self, lo: i64, hi: i64) -> bool {
        match self {
            RangeBounds::Bounded { min, max } => *min <= lo && hi <= *max,
            RangeBounds::Unbounded => true,
        }
    }

    // Range controls are disabled when there is nothing to choose from
    pub fn is_unbounded(&self) -> bool {
        matches!(self, RangeBounds::Unbounded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub brands: Vec<String>,
    pub models: Vec<String>,
    pub fuel_types: Vec<String>,
    pub body_styles: Vec<String>,
    pub translations: Vec<String>,
    pub mileage: RangeBounds,
    pub power_ps: RangeBounds,
    pub registration_year: RangeBounds,
}

impl Default for Facets {
    fn default() -> Self {
        Facets::derive(&[])
    }
}

impl Facets {
    pub fn derive(records: &[CarRecord]) -> Self {
        let facets = Facets {
            brands: distinct(records.iter().map(|c| c.brand.as_deref())),
            models: distinct(records.iter().map(|c| c.model.as_deref())),
            fuel_types: distinct(records.iter().map(|c| c.fuel_type.as_deref())),
            body_styles: distinct(records.iter().map(|c| c.body_style.as_deref())),
            translations: distinct(records.iter().map(|c| c.translation.as_deref())),
            mileage: RangeBounds::from_values(records.iter().filter_map(|c| c.mileage)),
            power_ps: RangeBounds::from_values(records.iter().filter_map(|c| c.power_ps)),
            registration_year: RangeBounds::from_values(
                records
                    .iter()
                    .filter_map(|c| c.year_of_registration.as_deref().and_then(calendar_year)),
            ),
        };
        tracing::debug!(
            records = records.len(),
            brands = facets.brands.len(),
            mileage = ?facets.mileage,
            power_ps = ?facets.power_ps,
            registration_year = ?facets.registration_year,
            "Derived facets from bulk dataset"
        );
        facets
    }
}

// De-duplicates while preserving first-seen order; missing and blank values are skipped
fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for value in values.flatten().map(str::trim).filter(|v| !v.is_empty()) {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Parses a date-valued API field (`2019-03-01` or an RFC 3339 / ISO timestamp).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Calendar year of a date-valued API field; a bare `2019` is accepted too.
pub fn calendar_year(raw: &str) -> Option<i64> {
    if let Some(date) = parse_date(raw) {
        return Some(date.year() as i64);
    }
    let raw = raw.trim();
    if raw.len() == 4 {
        return raw.parse().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(brand: &str, model: &str, mileage: i64, power: i64, registered: &str) -> CarRecord {
        CarRecord {
            brand: Some(brand.into()),
            model: Some(model.into()),
            mileage: Some(mileage),
            power_ps: Some(power),
            year_of_registration: Some(registered.into()),
            ..Default::default()
        }
    }

    #[test]
    fn categorical_facets_keep_first_seen_order() {
        let records = vec![
            car("VW", "Golf", 1, 1, "2010-01-01"),
            car("Audi", "A4", 1, 1, "2010-01-01"),
            car("VW", "Polo", 1, 1, "2010-01-01"),
            car("BMW", "Golf", 1, 1, "2010-01-01"),
        ];
        let facets = Facets::derive(&records);
        assert_eq!(facets.brands, ["VW", "Audi", "BMW"]);
        assert_eq!(facets.models, ["Golf", "A4", "Polo"]);
    }

    #[test]
    fn numeric_facets_are_observed_extremes() {
        let records = vec![
            car("VW", "Golf", 45_000, 110, "2015-06-01"),
            car("VW", "Golf", 200_000, 75, "2008-02-15T00:00:00Z"),
            car("VW", "Golf", 0, 300, "2023-11-30"),
        ];
        let facets = Facets::derive(&records);
        assert_eq!(facets.mileage, RangeBounds::Bounded { min: 0, max: 200_000 });
        assert_eq!(facets.power_ps, RangeBounds::Bounded { min: 75, max: 300 });
        assert_eq!(facets.registration_year, RangeBounds::Bounded { min: 2008, max: 2023 });
    }

    #[test]
    fn empty_dataset_is_unbounded() {
        let facets = Facets::derive(&[]);
        assert!(facets.brands.is_empty());
        assert!(facets.mileage.is_unbounded());
        assert_eq!(facets.power_ps.min(), None);
        assert!(facets.registration_year.admits(1900, 2100));
    }

    #[test]
    fn missing_values_do_not_contribute() {
        let records = vec![
            CarRecord { brand: Some(" ".into()), ..Default::default() },
            car("Skoda", "Octavia", 10, 90, "not a date"),
        ];
        let facets = Facets::derive(&records);
        assert_eq!(facets.brands, ["Skoda"]);
        assert_eq!(facets.mileage, RangeBounds::Bounded { min: 10, max: 10 });
        assert!(facets.registration_year.is_unbounded());
    }

    #[test]
    fn admits_checks_both_ends() {
        let bounds = RangeBounds::Bounded { min: 0, max: 200_000 };
        assert!(bounds.admits(0, 200_000));
        assert!(bounds.admits(50_000, 100_000));
        assert!(!bounds.admits(50_000, 600_000));
        assert!(!bounds.admits(-1, 10));
    }

    #[test]
    fn calendar_year_formats() {
        assert_eq!(calendar_year("1995-01-31"), Some(1995));
        assert_eq!(calendar_year("2019-03-01T10:00:00+01:00"), Some(2019));
        assert_eq!(calendar_year("2019-03-01T10:00:00"), Some(2019));
        assert_eq!(calendar_year("2004"), Some(2004));
        assert_eq!(calendar_year(""), None);
    }
}
