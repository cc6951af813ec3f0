pub mod parser;

use std::path::Path;

use log::info;

use crate::{
    api::{Blocked, FetchedPage},
    debug_dump::DebugDumps,
    page_source::PageSource,
    site_trait::SiteTrait,
    song::{Song, Source},
};

pub const DEBUG_FILE: &str = "ug_debug.json";

pub struct UltimateGuitar;
impl SiteTrait for UltimateGuitar {
    const SOURCE: Source = Source::UltimateGuitar;
    const COOKIE_DOMAIN: &'static str = "ultimate-guitar.com";
    const ACCEPT_LANGUAGE: &'static str = "en-US,en;q=0.9";
    const FAVORITES_URLS: &'static [&'static str] = &[
        "https://tabs.ultimate-guitar.com/user/favorites",
        "https://tabs.ultimate-guitar.com/user/mytabs",
    ];
    const SNAPSHOT_FILE: &'static str = "ug_favorites.html";
    const PAGE_SOURCES: &'static [PageSource] = &[PageSource::Network, PageSource::Snapshot];

    fn check_response(page: &FetchedPage) -> Result<(), Blocked> {
        if !page.status().is_success() {
            return Err(Blocked::Status(*page.status()));
        }
        if page.url().as_str().to_lowercase().contains("login") {
            return Err(Blocked::LoginRedirect(page.url().clone()));
        }
        Ok(())
    }

    fn manual_instructions(snapshot_path: &Path) -> String {
        format!(
            "Ultimate Guitar's bot protection usually blocks automated requests.

    ONE-TIME MANUAL STEP:
    1. Log into ultimate-guitar.com in your browser.
    2. Open your saved tabs page (profile menu -> My Tabs, or Favorites).
    3. Save the page (Ctrl+S / Cmd+S) as {}
    4. Run this again; the saved page is picked up automatically.
",
            snapshot_path.display()
        )
    }

    fn parse(raw: &str, dumps: &DebugDumps) -> anyhow::Result<Vec<Song>> {
        let page = parser::Page::parse(raw);
        if let Some(data) = page.next_data() {
            dumps.write_json(DEBUG_FILE, data);
        }
        Ok(match parser::extract_songs(&page) {
            Some((extractor, songs)) => {
                info!("Read {} song(s) with {extractor}", songs.len());
                songs
            }
            None => vec![],
        })
    }
}
