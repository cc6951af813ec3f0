use std::path::PathBuf;

use clap::Parser;
use log::info;
use log::LevelFilter;
use tab_favorites::config::Config;
use tab_favorites::cookie_store::Browser;
use tab_favorites::data_collector::collect;
use tab_favorites::data_collector::Selection;
use tab_favorites::page;
use tab_favorites::page_source::FetchContext;

/// Collects saved guitar tabs from Ultimate Guitar and Tab4u into a random song picker page.
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Browser to read the session cookies from.
    #[arg(long, value_enum, default_value_t = Browser::Chrome)]
    browser: Browser,
    /// Only fetch from Ultimate Guitar.
    #[arg(long)]
    ug_only: bool,
    /// Only fetch from Tab4u.
    #[arg(long)]
    tab4u_only: bool,
    /// Save the raw and parsed responses to the debug directory.
    #[arg(long)]
    debug: bool,
    /// Read the saved snapshots only, never connecting to the sites.
    #[arg(long)]
    offline: bool,
    /// TOML file overriding the default paths and request settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write the page.  Overrides `output_path` of the config.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    let opts = Opts::parse();

    let mut config = Config::load(opts.config.as_ref())?;
    if let Some(output) = opts.output {
        config.output_path = output;
    }
    let selection = Selection::from_flags(opts.ug_only, opts.tab4u_only);
    let ctx = FetchContext::builder()
        .config(config)
        .browser(opts.browser)
        .debug(opts.debug)
        .offline(opts.offline)
        .build();

    let songs = collect(selection, &ctx).await?;
    let output_path = &ctx.config.output_path;
    fs_err::write(output_path, page::generate(&songs)?)?;
    info!("Wrote {output_path:?}");

    println!("Total songs collected: {}", songs.len());
    println!("Open {} in your browser.", output_path.display());
    println!("Press Space to pick a random song, Enter to open it.");
    Ok(())
}
