// View models handed to the askama templates. All formatting happens here so
// the templates stay free of logic.

use chrono::Datelike;

use crate::facets::{Facets, calendar_year, parse_date};
use crate::gallery::GalleryState;
use crate::models::{CarRecord, SortOrder};
use crate::query::{FilterState, RangeField};

pub const NOT_AVAILABLE: &str = "N/A";

/// `1234567` -> `1,234,567`
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Registration date as `MM. YYYY`.
pub fn format_month_year(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| format!("{:02}. {}", d.month(), d.year()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_engine_size(cm3: Option<i64>) -> String {
    match cm3 {
        Some(size) if size != 0 => format!("{:.1}L", size as f64 / 1000.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_weight(weight: Option<&str>) -> String {
    match weight.map(str::trim) {
        Some(w) if !w.is_empty() && w != "0" => format!("{} kg", w),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_emission(co2: Option<i64>) -> String {
    match co2 {
        Some(v) if v != 0 => format!("{} g/km", v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn placeholder_text(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "None" && !v.eq_ignore_ascii_case("nan"))
}

/// Comma-separated feature string -> trimmed items; `"None"` yields nothing.
pub fn split_features(raw: Option<&str>) -> Vec<String> {
    placeholder_text(raw)
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn or_na(value: Option<&str>) -> String {
    placeholder_text(value).unwrap_or(NOT_AVAILABLE).to_string()
}

fn number_or_na(value: Option<i64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

pub fn car_href(car_id: &str) -> String {
    format!("/cars/{}", car_id)
}

// --- Listing page ---

pub struct CarCard {
    pub href: String,
    pub title: String,
    pub picture: Option<String>,
    pub registered: String,
    pub price: String,
    pub mileage: String,
    pub power: String,
    pub gear_type: String,
    pub fuel_type: String,
}

impl From<&CarRecord> for CarCard {
    fn from(car: &CarRecord) -> Self {
        CarCard {
            href: car_href(&car.car_id),
            title: car.title(),
            picture: car.primary_picture().map(str::to_string),
            registered: format_month_year(car.year_of_registration.as_deref()),
            price: car
                .price
                .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{} CHF", format_thousands(p))),
            mileage: car
                .mileage
                .map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{} km", format_thousands(m))),
            power: car
                .power_ps
                .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{} PS", p)),
            gear_type: or_na(car.gear_type.as_deref()),
            fuel_type: or_na(car.fuel_type.as_deref()),
        }
    }
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct SelectControl {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub options: Vec<SelectOption>,
}

impl SelectControl {
    fn new(name: &'static str, placeholder: &'static str, values: &[String], selected: Option<&str>) -> Self {
        let options = values
            .iter()
            .map(|v| SelectOption {
                value: v.clone(),
                label: v.clone(),
                selected: selected == Some(v.as_str()),
            })
            .collect();
        SelectControl { name, placeholder, options }
    }
}

pub struct RangeControl {
    pub label: &'static str,
    pub lo_name: &'static str,
    pub hi_name: &'static str,
    pub lo: String,
    pub hi: String,
    pub min: String,
    pub max: String,
    // Degenerate bounds (empty bulk dataset) disable the inputs
    pub disabled: bool,
}

impl RangeControl {
    fn new(label: &'static str, field: RangeField, state: &FilterState, facets: &Facets) -> Self {
        let (lo_name, hi_name) = field.keys();
        let (lo, hi) = state.range(field);
        let bounds = field.bounds(facets);
        let show = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
        RangeControl {
            label,
            lo_name,
            hi_name,
            lo: show(lo),
            hi: show(hi),
            min: show(bounds.min()),
            max: show(bounds.max()),
            disabled: bounds.is_unbounded(),
        }
    }
}

pub struct FilterForm {
    pub selects: Vec<SelectControl>,
    pub ranges: Vec<RangeControl>,
    pub sort_options: Vec<SelectOption>,
}

impl FilterForm {
    /// Filter controls prefilled with the effective selection.
    pub fn new(state: &FilterState, facets: &Facets) -> Self {
        let selects = vec![
            SelectControl::new("brand", "Select Brand", &facets.brands, state.brand.as_deref()),
            SelectControl::new("model", "Select Model", &facets.models, state.model.as_deref()),
            SelectControl::new("fuel_type", "Select Fuel Type", &facets.fuel_types, state.fuel_type.as_deref()),
            SelectControl::new("body_style", "Select Body Style", &facets.body_styles, state.body_style.as_deref()),
            SelectControl::new(
                "translation",
                "Select Translation",
                &facets.translations,
                state.translation.as_deref(),
            ),
        ];
        let ranges = vec![
            RangeControl::new("Mileage (km)", RangeField::Mileage, state, facets),
            RangeControl::new("Power (PS)", RangeField::PowerPs, state, facets),
            RangeControl::new("Registration Year", RangeField::Registration, state, facets),
        ];
        let sort_options = [
            (SortOrder::PriceLowest, "Price: Low to High"),
            (SortOrder::PriceHighest, "Price: High to Low"),
        ]
        .into_iter()
        .map(|(order, label)| SelectOption {
            value: order.as_str().to_string(),
            label: label.to_string(),
            selected: state.sort == Some(order),
        })
        .collect();
        FilterForm { selects, ranges, sort_options }
    }
}

// --- Detail page ---

pub struct SpecItem {
    pub label: &'static str,
    pub value: String,
}

pub struct Slide {
    pub url: String,
    pub open_href: String,
}

pub struct DetailView {
    pub title: String,
    pub price: String,
    pub description: Option<String>,
    pub specs: Vec<SpecItem>,
    pub standard_features: Vec<String>,
    pub extra_features: Vec<String>,
    pub primary: Option<Slide>,
    pub slides: Vec<Slide>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub lightbox: Option<String>,
    pub close_href: String,
}

impl DetailView {
    pub fn new(car: &CarRecord, gallery: &GalleryState) -> Self {
        let base = car_href(&car.car_id);
        let secondary = car.secondary_pictures();
        let slide = |url: &str| Slide {
            url: url.to_string(),
            open_href: gallery.open_lightbox(url).href(&base),
        };

        let specs = vec![
            SpecItem { label: "Body Style", value: or_na(car.body_style.as_deref()) },
            SpecItem { label: "Gear Type", value: or_na(car.gear_type.as_deref()) },
            SpecItem { label: "Fuel Type", value: or_na(car.fuel_type.as_deref()) },
            SpecItem { label: "Engine", value: format_engine_size(car.engine_size) },
            SpecItem { label: "Seating Capacity", value: or_na(car.seating_capacity.as_deref()) },
            SpecItem { label: "Number of Doors", value: or_na(car.number_of_doors.as_deref()) },
            SpecItem { label: "Interior Color", value: or_na(car.color_interior.as_deref()) },
            SpecItem { label: "Interior Type", value: or_na(car.interior_type.as_deref()) },
            SpecItem { label: "Cylinders", value: or_na(car.cylinder.as_deref()) },
            SpecItem { label: "Power (PS)", value: number_or_na(car.power_ps) },
            SpecItem { label: "Power (kW)", value: number_or_na(car.power_kw) },
            SpecItem { label: "CO2 Emission", value: format_emission(car.co2_emission) },
            SpecItem { label: "Translation", value: or_na(car.translation.as_deref()) },
            SpecItem { label: "Weight", value: format_weight(car.weight.as_deref()) },
            SpecItem { label: "Energy Efficiency", value: or_na(car.energy_class.as_deref()) },
            SpecItem {
                label: "Year of Construction",
                value: number_or_na(car.year_of_construction.as_deref().and_then(calendar_year)),
            },
            SpecItem {
                label: "Mileage",
                value: car
                    .mileage
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{} km", format_thousands(m))),
            },
        ];

        DetailView {
            title: car.title(),
            price: car
                .price
                .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{} CHF", format_thousands(p))),
            description: placeholder_text(car.car_description.as_deref()).map(str::to_string),
            specs,
            standard_features: split_features(car.features_standard.as_deref()),
            extra_features: split_features(car.features_extra.as_deref()),
            primary: car.primary_picture().map(slide),
            slides: gallery.visible(secondary).iter().map(|url| slide(url.as_str())).collect(),
            previous_href: gallery.previous(secondary.len()).map(|g| g.href(&base)),
            next_href: gallery.next(secondary.len()).map(|g| g.href(&base)),
            lightbox: gallery.lightbox_image.clone(),
            close_href: gallery.close_lightbox().href(&base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(18_900), "18,900");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-4_500), "-4,500");
    }

    #[test]
    fn detail_formatters() {
        assert_eq!(format_month_year(Some("1995-01-31")), "01. 1995");
        assert_eq!(format_month_year(None), "N/A");
        assert_eq!(format_engine_size(Some(1598)), "1.6L");
        assert_eq!(format_engine_size(Some(0)), "N/A");
        assert_eq!(format_weight(Some("0")), "N/A");
        assert_eq!(format_weight(Some("1420")), "1420 kg");
        assert_eq!(format_emission(Some(128)), "128 g/km");
        assert_eq!(or_na(Some("nan")), "N/A");
        assert_eq!(split_features(Some("ABS, ESP ,Klima")), ["ABS", "ESP", "Klima"]);
        assert!(split_features(Some("None")).is_empty());
    }

    #[test]
    fn detail_view_with_four_pictures() {
        let car = CarRecord {
            car_id: "9".into(),
            brand: Some("Audi".into()),
            model: Some("A4".into()),
            price: Some(24_500),
            car_description: Some("None".into()),
            car_pictures: vec!["p0".into(), "p1".into(), "p2".into(), "p3".into()],
            ..Default::default()
        };
        let view = DetailView::new(&car, &GalleryState::default());

        assert_eq!(view.price, "24,500 CHF");
        assert!(view.description.is_none());
        assert_eq!(view.slides.iter().map(|s| s.url.as_str()).collect::<Vec<_>>(), ["p1", "p2", "p3"]);
        assert_eq!(view.primary.as_ref().unwrap().open_href, "/cars/9?lightbox=p0");
        assert_eq!(view.slides[2].open_href, "/cars/9?lightbox=p3");
        assert_eq!(view.previous_href.as_deref(), Some("/cars/9?slide=2"));
        assert_eq!(view.next_href.as_deref(), Some("/cars/9?slide=1"));
        assert!(view.lightbox.is_none());
    }

    #[test]
    fn detail_view_without_carousel() {
        let car = CarRecord {
            car_id: "1".into(),
            car_pictures: vec!["only".into()],
            ..Default::default()
        };
        let view = DetailView::new(&car, &GalleryState::default());
        assert!(view.slides.is_empty());
        assert!(view.previous_href.is_none());
        assert!(view.next_href.is_none());
        assert!(view.specs.iter().all(|s| s.value == "N/A"));
    }

    #[test]
    fn filter_form_marks_selection_and_disables_unbounded_ranges() {
        let facets = Facets {
            brands: vec!["VW".into(), "Audi".into()],
            ..Facets::default()
        };
        let state = FilterState {
            brand: Some("Audi".into()),
            sort: Some(SortOrder::PriceHighest),
            ..Default::default()
        };
        let form = FilterForm::new(&state, &facets);
        let brand = &form.selects[0];
        assert!(!brand.options[0].selected);
        assert!(brand.options[1].selected);
        assert!(form.ranges.iter().all(|r| r.disabled));
        assert!(form.sort_options[1].selected);
    }
}
