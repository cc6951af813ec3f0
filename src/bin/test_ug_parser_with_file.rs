use std::path::PathBuf;

use clap::Parser;
use tab_favorites::ultimate_guitar::parser::{extract_songs, Page};

#[derive(Parser)]
struct Opts {
    html_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let raw = fs_err::read_to_string(&opts.html_file)?;
    let page = Page::parse(&raw);
    println!("__NEXT_DATA__ found: {}", page.next_data().is_some());
    match extract_songs(&page) {
        Some((extractor, songs)) => {
            println!("{} song(s) via {extractor}", songs.len());
            println!("{}", serde_json::to_string_pretty(&songs)?);
        }
        None => println!("No song found"),
    }
    Ok(())
}
