// Data structures shared by the listing API client, the facet deriver and the views

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// A single vehicle as returned by the listing API.
// The marketplace is loose with types (numbers arrive as strings and vice versa),
// so every scalar goes through a lenient deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CarRecord {
    #[serde(deserialize_with = "text", default)]
    pub car_id: String,
    #[serde(deserialize_with = "opt_text", default)]
    pub brand: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub model: Option<String>,
    #[serde(deserialize_with = "opt_number", default)]
    pub price: Option<i64>, // CHF
    #[serde(deserialize_with = "opt_number", default)]
    pub mileage: Option<i64>, // km
    #[serde(deserialize_with = "opt_number", default)]
    pub power_ps: Option<i64>,
    #[serde(deserialize_with = "opt_number", default)]
    pub power_kw: Option<i64>,
    #[serde(deserialize_with = "opt_text", default)]
    pub fuel_type: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub body_style: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub gear_type: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub translation: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub seating_capacity: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub number_of_doors: Option<String>,
    #[serde(deserialize_with = "opt_number", default)]
    pub engine_size: Option<i64>, // cm3
    #[serde(deserialize_with = "opt_number", default)]
    pub co2_emission: Option<i64>, // g/km
    #[serde(deserialize_with = "opt_text", default)]
    pub weight: Option<String>, // kg, "0" when unknown
    #[serde(deserialize_with = "opt_text", default)]
    pub energy_class: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub cylinder: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub color_interior: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub interior_type: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub year_of_registration: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub year_of_construction: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub car_description: Option<String>,
    #[serde(default)]
    pub car_pictures: Vec<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub features_standard: Option<String>,
    #[serde(deserialize_with = "opt_text", default)]
    pub features_extra: Option<String>,
}

impl CarRecord {
    pub fn title(&self) -> String {
        format!(
            "{} {}",
            self.brand.as_deref().unwrap_or_default(),
            self.model.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn primary_picture(&self) -> Option<&str> {
        self.car_pictures.first().map(String::as_str)
    }

    /// Carousel images: everything after the primary picture.
    pub fn secondary_pictures(&self) -> &[String] {
        self.car_pictures.get(1..).unwrap_or_default()
    }
}

// Response of a paginated `car_lists` call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingPage {
    #[serde(default)]
    pub results: Vec<CarRecord>,
    #[serde(default = "one")]
    pub total_pages: u32,
}

// Response of the bulk (`all=true`) and single-record (`car_id=`) calls
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordList {
    #[serde(default)]
    pub results: Vec<CarRecord>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PriceLowest,
    PriceHighest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::PriceLowest => "price_lowest",
            SortOrder::PriceHighest => "price_highest",
        }
    }

    // Unknown values mean "unsorted" rather than an error
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "price_lowest" => Some(SortOrder::PriceLowest),
            "price_highest" => Some(SortOrder::PriceHighest),
            _ => None,
        }
    }
}

// --- Lenient field deserializers ---

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn value_to_number(value: Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(value_to_text)
        .unwrap_or_default())
}

fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}

fn opt_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_accepts_mixed_scalar_types() {
        let record: CarRecord = serde_json::from_value(json!({
            "car_id": 42,
            "brand": "Audi",
            "model": "A4",
            "price": "18900",
            "mileage": 120000.0,
            "power_ps": 150,
            "weight": 0,
            "seating_capacity": 5,
            "engine_size": null,
            "car_pictures": ["a.jpg", "b.jpg"]
        }))
        .unwrap();

        assert_eq!(record.car_id, "42");
        assert_eq!(record.price, Some(18900));
        assert_eq!(record.mileage, Some(120000));
        assert_eq!(record.weight.as_deref(), Some("0"));
        assert_eq!(record.seating_capacity.as_deref(), Some("5"));
        assert_eq!(record.engine_size, None);
        assert_eq!(record.title(), "Audi A4");
        assert_eq!(record.secondary_pictures(), ["b.jpg".to_string()]);
    }

    #[test]
    fn secondary_pictures_empty_without_images() {
        let record = CarRecord::default();
        assert!(record.primary_picture().is_none());
        assert!(record.secondary_pictures().is_empty());
    }

    #[test]
    fn listing_page_defaults_total_pages() {
        let page: ListingPage = serde_json::from_value(json!({ "results": [] })).unwrap();
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn sort_order_parses_known_values_only() {
        assert_eq!(SortOrder::parse("price_lowest"), Some(SortOrder::PriceLowest));
        assert_eq!(SortOrder::parse("price_highest"), Some(SortOrder::PriceHighest));
        assert_eq!(SortOrder::parse("mileage"), None);
        assert_eq!(SortOrder::PriceHighest.as_str(), "price_highest");
    }
}
