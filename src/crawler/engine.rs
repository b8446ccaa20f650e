use regex::Regex;
use std::collections::HashSet;

use crate::{Error, Result};

/// A search backend: where result pages live and how to read image URLs out of them.
pub trait SearchEngine: Send + Sync {
    /// Result page URLs covering at least `max_num` images.
    fn page_urls(&self, keyword: &str, max_num: usize) -> Result<Vec<String>>;

    /// Image URLs referenced by a fetched result page, in page order.
    fn parse_page(&self, page: &str) -> Vec<String>;
}

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const GOOGLE_PAGE_SIZE: usize = 100;

/// Google image search (`tbm=isch`).
pub struct GoogleImages {
    image_url: Regex,
}

impl GoogleImages {
    pub fn new() -> Result<Self> {
        let image_url = Regex::new(r#"(?i)https?://[^"'\s\\\[\]<>]+?\.(?:jpe?g|png|bmp|gif|webp)"#)
            .map_err(|e| Error::Crawler(e.to_string()))?;
        Ok(Self { image_url })
    }
}

impl SearchEngine for GoogleImages {
    fn page_urls(&self, keyword: &str, max_num: usize) -> Result<Vec<String>> {
        (0..max_num)
            .step_by(GOOGLE_PAGE_SIZE)
            .map(|start| {
                let ijn = (start / GOOGLE_PAGE_SIZE).to_string();
                let start = start.to_string();
                reqwest::Url::parse_with_params(
                    GOOGLE_SEARCH_URL,
                    &[
                        ("q", keyword),
                        ("ijn", ijn.as_str()),
                        ("start", start.as_str()),
                        ("tbs", ""),
                        ("tbm", "isch"),
                    ],
                )
                .map(String::from)
                .map_err(|e| Error::Crawler(e.to_string()))
            })
            .collect()
    }

    fn parse_page(&self, page: &str) -> Vec<String> {
        // Result data is embedded in script blocks with JSON escapes.
        let page = page
            .replace("\\u003d", "=")
            .replace("\\u0026", "&")
            .replace("\\/", "/");

        let mut seen = HashSet::new();
        self.image_url
            .find_iter(&page)
            .map(|m| m.as_str())
            // gstatic serves Google's own thumbnails, not the source images
            .filter(|url| !url.contains("gstatic.com"))
            .filter(|url| seen.insert(*url))
            .map(str::to_string)
            .collect()
    }
}
