use std::path::Path;

use reqwest::header::HeaderMap;

use crate::{
    api::{Blocked, FetchedPage},
    debug_dump::DebugDumps,
    page_source::PageSource,
    song::{Song, Source},
};

pub trait SiteTrait: Sized {
    const SOURCE: Source;
    const COOKIE_DOMAIN: &'static str;
    const ACCEPT_LANGUAGE: &'static str;
    /// Tried in order; the first accepted response wins.
    const FAVORITES_URLS: &'static [&'static str];
    /// File name of the manually saved page, relative to the snapshot directory.
    const SNAPSHOT_FILE: &'static str;
    const PAGE_SOURCES: &'static [PageSource];
    /// Where `--debug` saves each raw response, for sites where that helps.
    const RAW_DEBUG_FILE: Option<&'static str> = None;

    fn favorites_urls() -> Vec<String> {
        Self::FAVORITES_URLS.iter().map(|url| url.to_string()).collect()
    }

    fn extra_headers() -> HeaderMap {
        HeaderMap::new()
    }

    fn check_response(page: &FetchedPage) -> Result<(), Blocked>;

    fn manual_instructions(snapshot_path: &Path) -> String;

    fn parse(raw: &str, dumps: &DebugDumps) -> anyhow::Result<Vec<Song>>;
}
