use std::future::Future;

use log::{error, info, warn};

use crate::{
    cookie_store::CookieError,
    page_source::{fetch_favorites, FetchContext},
    song::{Song, Source},
    tab4u::Tab4u,
    ultimate_guitar::UltimateGuitar,
};

/// Which sites to collect from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Selection {
    pub ultimate_guitar: bool,
    pub tab4u: bool,
}

impl Selection {
    pub fn from_flags(ug_only: bool, tab4u_only: bool) -> Self {
        if ug_only && tab4u_only {
            warn!("Both --ug-only and --tab4u-only were given; no site will be fetched.");
        }
        Self {
            ultimate_guitar: !tab4u_only,
            tab4u: !ug_only,
        }
    }
}

pub async fn collect(selection: Selection, ctx: &FetchContext) -> anyhow::Result<Vec<Song>> {
    collect_songs(
        selection,
        fetch_favorites::<UltimateGuitar>(ctx),
        fetch_favorites::<Tab4u>(ctx),
    )
    .await
}

/// Runs the selected fetches one after another and concatenates their results.
///
/// A site that fails contributes nothing; only a [`CookieError`] aborts the whole run.
/// The futures of unselected sites are never polled.
pub async fn collect_songs(
    selection: Selection,
    ultimate_guitar: impl Future<Output = anyhow::Result<Vec<Song>>>,
    tab4u: impl Future<Output = anyhow::Result<Vec<Song>>>,
) -> anyhow::Result<Vec<Song>> {
    let mut songs = vec![];
    if selection.ultimate_guitar {
        songs.extend(isolate(Source::UltimateGuitar, ultimate_guitar.await)?);
    }
    if selection.tab4u {
        songs.extend(isolate(Source::Tab4u, tab4u.await)?);
    }
    info!("Collected {} song(s) in total", songs.len());
    Ok(songs)
}

fn isolate(source: Source, result: anyhow::Result<Vec<Song>>) -> anyhow::Result<Vec<Song>> {
    match result {
        Ok(songs) => Ok(songs),
        Err(e) if e.downcast_ref::<CookieError>().is_some() => Err(e),
        Err(e) => {
            error!("Failed to fetch {source} favorites: {e:#}");
            Ok(vec![])
        }
    }
}
