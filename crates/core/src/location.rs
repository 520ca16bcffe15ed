//! Shareable view location: a URL whose `page` / `perPage` query parameters
//! mirror the current pagination.

use std::fmt;
use std::num::NonZeroUsize;

use url::Url;

pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "perPage";

const DEFAULT_LOCATION: &str = "quiz://local/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLocation {
    url: Url,
}

impl ViewLocation {
    /// Parse a location URL.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when `raw` is not an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw.trim()).map(Self::from_url)
    }

    #[must_use]
    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `page` parameter, if present and a positive integer.
    #[must_use]
    pub fn page(&self) -> Option<NonZeroUsize> {
        self.param(PAGE_PARAM)
    }

    /// `perPage` parameter, if present and a positive integer.
    #[must_use]
    pub fn page_size(&self) -> Option<NonZeroUsize> {
        self.param(PER_PAGE_PARAM)
    }

    fn param(&self, name: &str) -> Option<NonZeroUsize> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
    }

    /// Same location with `page` and `perPage` rewritten. Other parameters
    /// keep their values and positions.
    #[must_use]
    pub fn with_pagination(&self, page: NonZeroUsize, page_size: NonZeroUsize) -> Self {
        let page = page.to_string();
        let page_size = page_size.to_string();
        let mut pairs: Vec<(String, String)> = Vec::new();
        let (mut wrote_page, mut wrote_size) = (false, false);
        for (key, value) in self.url.query_pairs() {
            let key = key.into_owned();
            match key.as_str() {
                PAGE_PARAM if !wrote_page => {
                    pairs.push((key, page.clone()));
                    wrote_page = true;
                }
                PER_PAGE_PARAM if !wrote_size => {
                    pairs.push((key, page_size.clone()));
                    wrote_size = true;
                }
                PAGE_PARAM | PER_PAGE_PARAM => {}
                _ => pairs.push((key, value.into_owned())),
            }
        }
        if !wrote_page {
            pairs.push((PAGE_PARAM.to_string(), page));
        }
        if !wrote_size {
            pairs.push((PER_PAGE_PARAM.to_string(), page_size));
        }

        let mut url = self.url.clone();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        Self { url }
    }
}

impl Default for ViewLocation {
    fn default() -> Self {
        let url = Url::parse(DEFAULT_LOCATION).expect("default location should be valid");
        Self { url }
    }
}

impl fmt::Display for ViewLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
