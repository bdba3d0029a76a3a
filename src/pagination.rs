// Pagination control model for the listing page

use serde::Serialize;

use crate::query::ListingQuery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
    // None when on the first page
    pub previous: Option<String>,
    // None when on the last page
    pub next: Option<String>,
    pub pages: Vec<PageLink>,
}

impl Pagination {
    /// `current` comes from the URL, `total` from the listing API.
    pub fn new(query: &ListingQuery, total: u32) -> Self {
        let current = query.page();
        let previous = (current > 1).then(|| query.page_href(current - 1));
        let next = (current < total).then(|| query.page_href(current + 1));
        let pages = (1..=total)
            .map(|number| PageLink {
                number,
                href: query.page_href(number),
                current: number == current,
            })
            .collect();
        Pagination { current, total, previous, next, pages }
    }
}
