use itertools::Itertools;
use log::{debug, warn};
use scraper::Html;
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::song::{Song, Source, UNKNOWN};

pub const HOST: &str = "https://tabs.ultimate-guitar.com";

/// Locations of the tab list inside `__NEXT_DATA__`.  The layout depends on the page variant.
pub const TAB_LIST_POINTERS: [&str; 2] = [
    "/props/pageProps/store/page/data/tabs",
    "/props/pageProps/data/tabs",
];

pub struct Page<'a> {
    raw: &'a str,
    next_data: Option<Value>,
}

impl<'a> Page<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            next_data: parse_next_data(raw),
        }
    }

    pub fn next_data(&self) -> Option<&Value> {
        self.next_data.as_ref()
    }
}

fn parse_next_data(raw: &str) -> Option<Value> {
    let html = Html::parse_document(raw);
    let script = html.select(selector!("script#__NEXT_DATA__")).next()?;
    match serde_json::from_str(&script.text().collect::<String>()) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("Ignoring __NEXT_DATA__ that is not valid JSON: {e}");
            None
        }
    }
}

/// Ways of pulling songs out of a favorites page, in the order they are tried.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display, strum::EnumIter)]
pub enum Extractor {
    /// Server-rendered JSON in `<script id="__NEXT_DATA__">`.
    NextData,
    /// Absolute tab links in the markup, for the client-rendered variant.
    AnchorLinks,
}

impl Extractor {
    pub fn extract(self, page: &Page) -> Option<Vec<Song>> {
        match self {
            Extractor::NextData => songs_from_next_data(page.next_data()?),
            Extractor::AnchorLinks => Some(songs_from_links(page.raw)),
        }
    }
}

/// The first extractor that finds at least one song, with what it found.
pub fn extract_songs(page: &Page) -> Option<(Extractor, Vec<Song>)> {
    Extractor::iter().find_map(|extractor| {
        let songs = extractor.extract(page).filter(|songs| !songs.is_empty());
        debug!(
            "{extractor}: {} song(s)",
            songs.as_ref().map_or(0, Vec::len)
        );
        songs.map(|songs| (extractor, songs))
    })
}

pub fn songs_from_next_data(data: &Value) -> Option<Vec<Song>> {
    let tabs = TAB_LIST_POINTERS
        .iter()
        .find_map(|pointer| data.pointer(pointer)?.as_array())?;
    Some(
        tabs.iter()
            .filter_map(song_from_tab)
            .unique_by(|song| song.url.clone())
            .collect(),
    )
}

fn song_from_tab(tab: &Value) -> Option<Song> {
    let url = first_non_empty(tab, &["tab_url", "url"])?;
    let url = if url.starts_with("http") {
        url.to_owned()
    } else if url.starts_with('/') {
        format!("{HOST}{url}")
    } else {
        format!("{HOST}/{url}")
    };
    Some(
        Song::builder()
            .title(first_non_empty(tab, &["song_name", "name"]).unwrap_or(UNKNOWN))
            .artist(first_non_empty(tab, &["artist_name", "artist"]).unwrap_or(UNKNOWN))
            .url(url)
            .source(Source::UltimateGuitar)
            .build(),
    )
}

fn first_non_empty<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|&key| value.get(key)?.as_str())
        .find(|s| !s.is_empty())
}

pub fn songs_from_links(raw: &str) -> Vec<Song> {
    regex!(r#"href="(https://tabs\.ultimate-guitar\.com/tab/[^"]+)""#)
        .captures_iter(raw)
        .filter_map(|captures| captures.get(1))
        .map(|url| url.as_str())
        .unique()
        .map(|url| {
            let (artist, title) = parse_slug(url);
            Song::builder()
                .title(title)
                .artist(artist)
                .url(url)
                .source(Source::UltimateGuitar)
                .build()
        })
        .collect()
}

/// `(artist, title)` guessed from `.../tab/{artist-slug}/{title-slug}-{type}-{id}`.
pub fn parse_slug(url: &str) -> (String, String) {
    let path = url.split_once("/tab/").map_or("", |(_, path)| path);
    let (artist_slug, title_slug) = path.split_once('/').unwrap_or((path, ""));
    let mut title_parts = title_slug.split('-').collect_vec();
    if title_parts.len() >= 2 && title_parts.last().is_some_and(|id| is_number(id)) {
        // Drops both the id and the tab type before it.
        title_parts.truncate(title_parts.len() - 2);
    }
    (
        title_case(&artist_slug.replace('-', " ")),
        title_case(&title_parts.join(" ")),
    )
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Upper-cases every char that follows an uncased char and lower-cases the rest.
///
/// Only chars with case count as word characters, so a letter right after Hebrew text
/// still starts a word.
pub fn title_case(s: &str) -> String {
    let mut ret = String::with_capacity(s.len());
    let mut after_cased = false;
    for c in s.chars() {
        if after_cased {
            ret.extend(c.to_lowercase());
        } else {
            ret.extend(c.to_uppercase());
        }
        after_cased = c.is_uppercase() || c.is_lowercase();
    }
    ret
}
