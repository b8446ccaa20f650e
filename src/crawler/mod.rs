//! Keyword image crawler.
//!
//! Three stages connected by channels, each running on its own pool of
//! threads:
//! - feeders push search result page URLs
//! - parsers fetch pages and extract image URLs
//! - downloaders fetch images and store the valid ones in `root_dir`
//!
//! `Crawler::crawl` blocks until every thread has finished.

pub mod engine;
pub mod fetch;

use crossbeam_channel::{Receiver, Sender};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::{Error, Result};

pub use engine::{GoogleImages, SearchEngine};
pub use fetch::{Fetch, HttpFetcher};

/// Thread layout and HTTP settings of a crawl.
///
/// Missing fields take their [`Default`] values when deserialized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Directory receiving downloaded images; created when missing.
    pub root_dir: PathBuf,
    pub feeder_threads: usize,
    pub parser_threads: usize,
    pub downloader_threads: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("images"),
            feeder_threads: 1,
            parser_threads: 2,
            downloader_threads: 4,
            timeout: Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }
}

/// Counters reported when a crawl finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Result pages fetched and parsed.
    pub pages: usize,
    /// Distinct image URLs discovered.
    pub found: usize,
    /// Images stored in the root directory.
    pub downloaded: usize,
    /// Image URLs that failed to download or were not images.
    pub failed: usize,
}

pub struct Crawler {
    config: CrawlerConfig,
    engine: Arc<dyn SearchEngine>,
    fetcher: Arc<dyn Fetch>,
}

/// State shared by the worker threads of one crawl.
struct CrawlState {
    max_num: usize,
    pages: AtomicUsize,
    failed: AtomicUsize,
    seen: Mutex<HashSet<String>>,
    /// Number of stored files; held while writing so indices stay dense.
    downloaded: Mutex<usize>,
}

impl CrawlState {
    fn new(max_num: usize) -> Self {
        Self {
            max_num,
            pages: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            seen: Mutex::new(HashSet::new()),
            downloaded: Mutex::new(0),
        }
    }

    fn is_done(&self) -> bool {
        self.downloaded.lock().map(|n| *n >= self.max_num).unwrap_or(true)
    }
}

impl Crawler {
    pub fn new(config: CrawlerConfig, engine: Arc<dyn SearchEngine>, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            config,
            engine,
            fetcher,
        }
    }

    /// Google image search over HTTP.
    pub fn google(config: CrawlerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.timeout)?;
        Ok(Self::new(config, Arc::new(GoogleImages::new()?), Arc::new(fetcher)))
    }

    /// Download up to `max_num` images matching `keyword` into the root directory.
    pub fn crawl(&self, keyword: &str, max_num: usize) -> Result<CrawlSummary> {
        fs::create_dir_all(&self.config.root_dir)?;
        if max_num == 0 {
            return Ok(CrawlSummary::default());
        }

        let page_urls = self.engine.page_urls(keyword, max_num)?;
        log::info!(
            "Crawling '{}': {} result pages, up to {} images into {}",
            keyword,
            page_urls.len(),
            max_num,
            self.config.root_dir.display()
        );

        let state = CrawlState::new(max_num);

        let (page_tx, page_rx) = crossbeam_channel::unbounded::<String>();
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<String>();

        let feeders = self.config.feeder_threads.max(1);
        let parsers = self.config.parser_threads.max(1);
        let downloaders = self.config.downloader_threads.max(1);

        thread::scope(|scope| -> Result<()> {
            let mut handles = Vec::new();

            for id in 0..feeders {
                let tx = page_tx.clone();
                let urls: Vec<String> = page_urls.iter().skip(id).step_by(feeders).cloned().collect();
                handles.push(
                    thread::Builder::new()
                        .name(format!("feeder-{id}"))
                        .spawn_scoped(scope, move || feed(urls, tx))?,
                );
            }
            drop(page_tx);

            for id in 0..parsers {
                let rx = page_rx.clone();
                let tx = task_tx.clone();
                let state = &state;
                handles.push(
                    thread::Builder::new()
                        .name(format!("parser-{id}"))
                        .spawn_scoped(scope, move || self.parse(rx, tx, state))?,
                );
            }
            drop(page_rx);
            drop(task_tx);

            for id in 0..downloaders {
                let rx = task_rx.clone();
                let state = &state;
                handles.push(
                    thread::Builder::new()
                        .name(format!("downloader-{id}"))
                        .spawn_scoped(scope, move || self.download(rx, state))?,
                );
            }
            drop(task_rx);

            for handle in handles {
                handle
                    .join()
                    .map_err(|_| Error::Crawler("worker thread panicked".to_string()))?;
            }
            Ok(())
        })?;

        let downloaded = *state
            .downloaded
            .lock()
            .map_err(|_| Error::Crawler("download counter poisoned".to_string()))?;
        let found = state
            .seen
            .lock()
            .map_err(|_| Error::Crawler("URL set poisoned".to_string()))?
            .len();
        let summary = CrawlSummary {
            pages: state.pages.load(Ordering::SeqCst),
            found,
            downloaded,
            failed: state.failed.load(Ordering::SeqCst),
        };

        log::info!(
            "Crawl complete: {} images from {} pages ({} found, {} failed)",
            summary.downloaded,
            summary.pages,
            summary.found,
            summary.failed
        );
        Ok(summary)
    }

    fn parse(&self, pages: Receiver<String>, tasks: Sender<String>, state: &CrawlState) {
        for page_url in pages.iter() {
            if state.is_done() {
                break;
            }

            let page = match self.fetcher.get(&page_url) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    log::warn!("Failed to fetch result page {}: {}", page_url, err);
                    continue;
                }
            };
            state.pages.fetch_add(1, Ordering::SeqCst);

            let image_urls = self.engine.parse_page(&page);
            log::debug!("{} image URLs on {}", image_urls.len(), page_url);

            for url in image_urls {
                if state.is_done() {
                    return;
                }
                let is_new = match state.seen.lock() {
                    Ok(mut seen) => seen.insert(url.clone()),
                    Err(_) => return,
                };
                // Every downloader has exited.
                if is_new && tasks.send(url).is_err() {
                    return;
                }
            }
        }
    }

    fn download(&self, tasks: Receiver<String>, state: &CrawlState) {
        for url in tasks.iter() {
            if state.is_done() {
                break;
            }

            let bytes = match self.fetcher.get(&url) {
                Ok(bytes) => bytes,
                Err(err) => {
                    log::warn!("Failed to download {}: {}", url, err);
                    state.failed.fetch_add(1, Ordering::SeqCst);
                    continue;
                }
            };

            let extension = match image::guess_format(&bytes) {
                Ok(format) => format.extensions_str().first().copied().unwrap_or("jpg"),
                Err(_) => {
                    log::warn!("Not an image: {}", url);
                    state.failed.fetch_add(1, Ordering::SeqCst);
                    continue;
                }
            };

            let Ok(mut downloaded) = state.downloaded.lock() else {
                return;
            };
            if *downloaded >= state.max_num {
                break;
            }

            let path = image_path(&self.config.root_dir, *downloaded + 1, extension);
            match fs::write(&path, &bytes) {
                Ok(()) => {
                    *downloaded += 1;
                    log::info!("image #{}\t{}", *downloaded, url);
                }
                Err(err) => {
                    log::warn!("Failed to write {}: {}", path.display(), err);
                    state.failed.fetch_add(1, Ordering::SeqCst);
                }
            }
        }
    }
}

fn feed(urls: Vec<String>, pages: Sender<String>) {
    for url in urls {
        if pages.send(url).is_err() {
            break;
        }
    }
}

/// File name of the `index`-th stored image (`000001.jpg`, ...).
fn image_path(root: &Path, index: usize, extension: &str) -> PathBuf {
    root.join(format!("{index:06}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::collections::HashMap;
    use std::io::Cursor;

    /// Pages are `page://N`; each page lists one image URL per line.
    struct LineEngine {
        pages: usize,
    }

    impl SearchEngine for LineEngine {
        fn page_urls(&self, _keyword: &str, _max_num: usize) -> Result<Vec<String>> {
            Ok((0..self.pages).map(|i| format!("page://{i}")).collect())
        }

        fn parse_page(&self, page: &str) -> Vec<String> {
            page.lines().map(str::to_string).collect()
        }
    }

    struct MemoryFetcher {
        responses: HashMap<String, Vec<u8>>,
    }

    impl Fetch for MemoryFetcher {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Crawler(format!("404 {url}")))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([1, 2, 3])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn crawler(root: &Path, pages: Vec<Vec<&str>>, images: &[&str]) -> Crawler {
        let mut responses = HashMap::new();
        let page_count = pages.len();
        for (i, lines) in pages.into_iter().enumerate() {
            responses.insert(format!("page://{i}"), lines.join("\n").into_bytes());
        }
        for url in images {
            responses.insert(url.to_string(), png_bytes());
        }
        responses.insert("http://img/not-an-image".to_string(), b"<html></html>".to_vec());

        Crawler::new(
            CrawlerConfig::new(root),
            Arc::new(LineEngine { pages: page_count }),
            Arc::new(MemoryFetcher { responses }),
        )
    }

    fn stored_files(root: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_downloads_every_image_with_sequential_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cows");
        let crawler = crawler(
            &root,
            vec![vec!["http://img/a", "http://img/b"], vec!["http://img/c"]],
            &["http://img/a", "http://img/b", "http://img/c"],
        );

        let summary = crawler.crawl("cow", 10).unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.found, 3);
        assert_eq!(summary.downloaded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(stored_files(&root), vec!["000001.png", "000002.png", "000003.png"]);
    }

    #[test]
    fn test_never_stores_more_than_max_num() {
        let dir = tempfile::tempdir().unwrap();
        let urls: Vec<String> = (0..12).map(|i| format!("http://img/{i}")).collect();
        let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let crawler = crawler(dir.path(), vec![url_refs.clone()], &url_refs);

        let summary = crawler.crawl("cow", 5).unwrap();

        assert_eq!(summary.downloaded, 5);
        assert_eq!(
            stored_files(dir.path()),
            vec!["000001.png", "000002.png", "000003.png", "000004.png", "000005.png"]
        );
    }

    #[test]
    fn test_failures_and_non_images_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler(
            dir.path(),
            vec![vec!["http://img/missing", "http://img/not-an-image", "http://img/ok"]],
            &["http://img/ok"],
        );

        let summary = crawler.crawl("cow", 10).unwrap();

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(stored_files(dir.path()), vec!["000001.png"]);
    }

    #[test]
    fn test_duplicate_urls_are_downloaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let crawler = crawler(
            dir.path(),
            vec![vec!["http://img/a", "http://img/a"], vec!["http://img/a"]],
            &["http://img/a"],
        );

        let summary = crawler.crawl("cow", 10).unwrap();

        assert_eq!(summary.found, 1);
        assert_eq!(summary.downloaded, 1);
    }

    #[test]
    fn test_zero_images_only_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("empty");
        let crawler = crawler(&root, vec![vec!["http://img/a"]], &["http://img/a"]);

        let summary = crawler.crawl("cow", 0).unwrap();

        assert_eq!(summary, CrawlSummary::default());
        assert!(root.is_dir());
        assert!(stored_files(&root).is_empty());
    }

    /// Serves the same page for every URL and fills the crawl while doing so.
    struct FillingFetcher {
        state: Arc<CrawlState>,
        page: Vec<u8>,
    }

    impl Fetch for FillingFetcher {
        fn get(&self, _url: &str) -> Result<Vec<u8>> {
            *self.state.downloaded.lock().unwrap() = self.state.max_num;
            Ok(self.page.clone())
        }
    }

    #[test]
    fn test_parser_stops_mid_page_once_max_num_is_reached() {
        let state = Arc::new(CrawlState::new(7));
        let urls: Vec<String> = (0..50).map(|i| format!("http://img/{i}")).collect();
        let fetcher = FillingFetcher {
            state: Arc::clone(&state),
            page: urls.join("\n").into_bytes(),
        };
        let crawler = Crawler::new(
            CrawlerConfig::default(),
            Arc::new(LineEngine { pages: 20 }),
            Arc::new(fetcher),
        );

        let (page_tx, page_rx) = crossbeam_channel::unbounded();
        let (task_tx, task_rx) = crossbeam_channel::unbounded();
        for i in 0..20 {
            page_tx.send(format!("page://{i}")).unwrap();
        }
        drop(page_tx);

        crawler.parse(page_rx, task_tx, &state);

        assert_eq!(state.pages.load(Ordering::SeqCst), 1);
        assert_eq!(task_rx.try_iter().count(), 0);
        assert!(state.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: CrawlerConfig =
            serde_json::from_str(r#"{"root_dir": "cows", "parser_threads": 8}"#).unwrap();

        assert_eq!(config.root_dir, PathBuf::from("cows"));
        assert_eq!(config.parser_threads, 8);
        assert_eq!(config.feeder_threads, 1);
        assert_eq!(config.downloader_threads, 4);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_thread_layout() {
        let config = CrawlerConfig::default();
        assert_eq!(
            (config.feeder_threads, config.parser_threads, config.downloader_threads),
            (1, 2, 4)
        );
    }
}
