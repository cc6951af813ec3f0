pub mod parser;

use std::path::Path;

use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    StatusCode,
};

use crate::{
    api::{Blocked, FetchedPage},
    debug_dump::DebugDumps,
    page_source::PageSource,
    site_trait::SiteTrait,
    song::{Song, Source},
};

pub const MY_SONGS_URL: &str = "https://www.tab4u.com/getMySongs.php?lan=0&otherUId=0&aID=0";

pub struct Tab4u;
impl SiteTrait for Tab4u {
    const SOURCE: Source = Source::Tab4u;
    const COOKIE_DOMAIN: &'static str = "tab4u.com";
    const ACCEPT_LANGUAGE: &'static str = "he-IL,he;q=0.9,en;q=0.8";
    const FAVORITES_URLS: &'static [&'static str] = &[MY_SONGS_URL];
    const SNAPSHOT_FILE: &'static str = "tab4u_mysongs.html";
    const PAGE_SOURCES: &'static [PageSource] = &[PageSource::Snapshot, PageSource::Network];
    const RAW_DEBUG_FILE: Option<&'static str> = Some("tab4u_ajax_debug.html");

    fn extra_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://www.tab4u.com/articles/chordsbook?mySongs=2"),
        );
        headers
    }

    fn check_response(page: &FetchedPage) -> Result<(), Blocked> {
        if *page.status() != StatusCode::OK {
            return Err(Blocked::Status(*page.status()));
        }
        if parser::is_login_wall(page.text()) {
            return Err(Blocked::LoginWall);
        }
        Ok(())
    }

    fn manual_instructions(snapshot_path: &Path) -> String {
        format!(
            "Tab4u session expired or not logged in.

    ONE-TIME MANUAL STEP:
    1. Log into tab4u.com in your browser.
    2. Navigate to this URL (while logged in):
       {MY_SONGS_URL}
    3. Save the page (Ctrl+S / Cmd+S) as {}
    4. Run this again; the saved page is read automatically.
",
            snapshot_path.display()
        )
    }

    fn parse(raw: &str, _dumps: &DebugDumps) -> anyhow::Result<Vec<Song>> {
        Ok(parser::parse(raw))
    }
}
