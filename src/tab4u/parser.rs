use itertools::Itertools;

use crate::song::{Song, Source, UNKNOWN};

pub const HOST: &str = "https://www.tab4u.com";

/// Shorter bodies are what the endpoint serves to anonymous visitors.
const MIN_BODY_CHARS: usize = 200;

/// Whether the body is the "please log in" fragment rather than a song list.
pub fn is_login_wall(text: &str) -> bool {
    text.trim().chars().count() < MIN_BODY_CHARS
        || text.contains("firstLoginBut")
        || text.contains("להתחבר")
}

/// The part of the response holding the user's songs.
///
/// The endpoint separates its sections with `` `TOPALB` `` and `` `TOPEND` ``;
/// a saved page without them is used whole.
pub fn songs_section(raw: &str) -> &str {
    let raw = raw.split_once("`TOPALB`").map_or(raw, |(_, rest)| rest);
    raw.split_once("`TOPEND`").map_or(raw, |(_, rest)| rest)
}

pub fn parse(raw: &str) -> Vec<Song> {
    regex!(r#"/tabs/songs/[^\s"'<>\\]+\.html"#)
        .find_iter(songs_section(raw))
        .map(|m| m.as_str())
        .unique()
        .map(|path| {
            let (artist, title) = parse_song_filename(path);
            Song::builder()
                .title(title)
                .artist(artist)
                .url(format!("{HOST}{path}"))
                .source(Source::Tab4u)
                .build()
        })
        .collect()
}

/// `(artist, title)` from a song path like `/tabs/songs/74165_Foo_Fighters_-_My_Hero.html`.
pub fn parse_song_filename(path: &str) -> (String, String) {
    let path = path.split('?').next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    // Bytes that are not UTF-8 become U+FFFD; the rest of the name is still usable.
    let decoded = urlencoding::decode_binary(file_name.as_bytes());
    let file_name = String::from_utf8_lossy(&decoded);
    let stem = file_name.strip_suffix(".html").unwrap_or(&file_name);
    match stem.split_once("_-_") {
        Some((artist, title)) => (clean(strip_id(artist)), clean(title)),
        None => (UNKNOWN.to_owned(), clean(strip_id(stem))),
    }
}

fn strip_id(s: &str) -> &str {
    regex!(r"^\d+_").find(s).map_or(s, |m| &s[m.end()..])
}

fn clean(s: &str) -> String {
    s.replace('_', " ").trim().to_owned()
}
