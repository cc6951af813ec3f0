use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use tab_favorites::{page::parse_embedded, song::Source};

#[derive(Parser)]
struct Opts {
    /// A page written by `tab-favorites`.
    page: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let songs = parse_embedded(&fs_err::read_to_string(&opts.page)?)?;
    for song in &songs {
        println!("[{}] {} - {}", song.source, song.artist, song.title);
    }
    let counts = songs.iter().counts_by(|song| song.source);
    println!(
        "{} song(s): {}",
        songs.len(),
        [Source::UltimateGuitar, Source::Tab4u]
            .iter()
            .map(|source| format!("{source} {}", counts.get(source).unwrap_or(&0)))
            .join(", ")
    );
    Ok(())
}
