use anyhow::Context;
use scraper::Html;

use crate::song::Song;

/// Renders the self-contained picker page with `songs` embedded in it.
pub fn generate(songs: &[Song]) -> anyhow::Result<String> {
    // `<` only ever occurs inside JSON strings, where `\u003c` means the same thing.
    let songs_json = serde_json::to_string_pretty(songs)?.replace('<', "\\u003c");
    Ok(format!(
        include_str!("random_song_template.html"),
        songs_json = songs_json
    ))
}

/// Reads back the records embedded by [`generate`].
pub fn parse_embedded(page: &str) -> anyhow::Result<Vec<Song>> {
    let html = Html::parse_document(page);
    let script = html
        .select(selector!("script#songs-data"))
        .next()
        .context("The page has no songs-data block")?;
    serde_json::from_str(&script.text().collect::<String>())
        .context("The songs-data block is not a valid song list")
}

#[cfg(test)]
mod tests {
    use crate::song::{Song, Source};

    use super::{generate, parse_embedded};

    fn song(title: &str, artist: &str, url: &str, source: Source) -> Song {
        Song::builder()
            .title(title)
            .artist(artist)
            .url(url)
            .source(source)
            .build()
    }

    #[test]
    fn test_empty_page() {
        let page = generate(&[]).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("Random Song Picker"));
        assert_eq!(parse_embedded(&page).unwrap(), []);
    }

    #[test]
    fn test_embedded_records_survive() {
        let songs = [
            song(
                "</script><script>alert(1)</script>",
                r#"Quote "Me" & <Co>"#,
                "https://tabs.ultimate-guitar.com/tab/x/y-chords-1",
                Source::UltimateGuitar,
            ),
            song(
                "ארץ",
                "שלום חנוך",
                "https://www.tab4u.com/tabs/songs/1_%D7%90_-_%D7%91.html",
                Source::Tab4u,
            ),
            song("Creep", "Radiohead", "https://tabs.ultimate-guitar.com/tab/radiohead/creep-chords-4169", Source::UltimateGuitar),
        ];
        let page = generate(&songs).unwrap();
        assert!(!page.contains("</script><script>alert"));
        assert_eq!(page.matches("</script>").count(), 2);
        assert_eq!(parse_embedded(&page).unwrap(), songs);
    }

    #[test]
    fn test_not_a_generated_page() {
        assert!(parse_embedded("<html><body>hi</body></html>").is_err());
    }
}
