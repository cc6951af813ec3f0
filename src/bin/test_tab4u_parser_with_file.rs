use std::path::PathBuf;

use clap::Parser;
use tab_favorites::tab4u::parser;

#[derive(Parser)]
struct Opts {
    html_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let raw = fs_err::read_to_string(&opts.html_file)?;
    if parser::is_login_wall(&raw) {
        println!("This looks like a login wall, not a song list.");
    }
    let songs = parser::parse(&raw);
    println!("{} song(s)", songs.len());
    for song in songs {
        println!("{} - {}\n    {}", song.artist, song.title, song.url);
    }
    Ok(())
}
