// Detail page gallery: carousel position over the secondary images plus lightbox state.
// Both live in the detail URL (`slide`, `lightbox`) so every transition is a plain link.

use serde::Deserialize;
use url::form_urlencoded;

use crate::models::CarRecord;

pub const VISIBLE_SLIDES: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryParams {
    pub slide: Option<String>,
    pub lightbox: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryState {
    pub current_index: usize,
    pub lightbox_image: Option<String>,
}

impl GalleryState {
    /// Restores the state from the URL. The slide index is wrapped into the
    /// carousel and the lightbox only opens on one of the record's own pictures.
    pub fn from_params(params: &GalleryParams, record: &CarRecord) -> Self {
        let len = record.secondary_pictures().len();
        let requested = params
            .slide
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let current_index = if len == 0 { 0 } else { requested % len };
        let lightbox_image = params
            .lightbox
            .as_ref()
            .filter(|url| record.car_pictures.iter().any(|p| p == *url))
            .cloned();
        GalleryState { current_index, lightbox_image }
    }

    /// Next slide, wrapping from the last to the first. `None` for an empty carousel.
    pub fn next(&self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let current_index = if self.current_index + 1 >= len { 0 } else { self.current_index + 1 };
        Some(GalleryState { current_index, ..self.clone() })
    }

    /// Previous slide, wrapping from the first to the last. `None` for an empty carousel.
    pub fn previous(&self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let current_index = if self.current_index == 0 || self.current_index >= len {
            len - 1
        } else {
            self.current_index - 1
        };
        Some(GalleryState { current_index, ..self.clone() })
    }

    pub fn open_lightbox(&self, image: &str) -> Self {
        GalleryState {
            current_index: self.current_index,
            lightbox_image: Some(image.to_string()),
        }
    }

    pub fn close_lightbox(&self) -> Self {
        GalleryState {
            current_index: self.current_index,
            lightbox_image: None,
        }
    }

    /// Window of carousel images shown from the current position.
    pub fn visible<'a>(&self, images: &'a [String]) -> &'a [String] {
        let start = self.current_index.min(images.len());
        let end = (start + VISIBLE_SLIDES).min(images.len());
        &images[start..end]
    }

    pub fn href(&self, base: &str) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if self.current_index > 0 {
            query.append_pair("slide", &self.current_index.to_string());
        }
        if let Some(image) = &self.lightbox_image {
            query.append_pair("lightbox", image);
        }
        let query = query.finish();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }
}
