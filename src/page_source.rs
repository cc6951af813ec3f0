use std::{io, path::Path};

use itertools::Itertools;
use log::{debug, info, warn};
use typed_builder::TypedBuilder;

use crate::{
    api::SiteClient,
    config::Config,
    cookie_store::{get_cookies, Browser, CookieBackend},
    debug_dump::DebugDumps,
    site_trait::SiteTrait,
    song::Song,
};

/// Where the raw favorites page of a site can come from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display)]
pub enum PageSource {
    /// The page the operator saved by hand into the snapshot directory.
    Snapshot,
    /// A live request authenticated with the browser's cookies.
    Network,
}

#[derive(Debug, TypedBuilder)]
pub struct FetchContext {
    #[builder(default)]
    pub config: Config,
    #[builder(default = Browser::Chrome)]
    pub browser: Browser,
    #[builder(default)]
    pub debug: bool,
    /// Only read snapshots, never touch the network.
    #[builder(default)]
    pub offline: bool,
}

impl FetchContext {
    pub fn debug_dumps(&self) -> DebugDumps {
        if self.debug {
            DebugDumps::to_dir(&self.config.debug_dir)
        } else {
            DebugDumps::disabled()
        }
    }

    pub fn page_sources<T: SiteTrait>(&self) -> Vec<PageSource> {
        T::PAGE_SOURCES
            .iter()
            .copied()
            .filter(|&source| !(self.offline && source == PageSource::Network))
            .collect()
    }
}

pub async fn fetch_favorites<T: SiteTrait>(ctx: &FetchContext) -> anyhow::Result<Vec<Song>> {
    info!("Fetching {} favorites...", T::SOURCE);
    let sources = ctx.page_sources::<T>();
    let Some(raw) = acquire_page::<T>(ctx, &sources).await? else {
        info!(
            "Nothing to read for {} (tried: {})",
            T::SOURCE,
            sources.iter().join(", ")
        );
        return Ok(vec![]);
    };
    let songs = T::parse(&raw, &ctx.debug_dumps())?;
    info!("Found {} song(s) on {}", songs.len(), T::SOURCE);
    Ok(songs)
}

/// Walks `sources` in order and returns the first page one of them yields.
pub async fn acquire_page<T: SiteTrait>(
    ctx: &FetchContext,
    sources: &[PageSource],
) -> anyhow::Result<Option<String>> {
    let snapshot_path = ctx.config.snapshot_dir.join(T::SNAPSHOT_FILE);
    for source in sources {
        match source {
            PageSource::Snapshot => {
                if let Some(text) = read_snapshot(&snapshot_path)? {
                    info!("Found {snapshot_path:?}; using it.");
                    return Ok(Some(text));
                }
                debug!("No snapshot at {snapshot_path:?}");
            }
            PageSource::Network => {
                let cookies = get_cookies(
                    T::COOKIE_DOMAIN,
                    ctx.browser,
                    &CookieBackend::chain(&ctx.config),
                )?;
                let client = SiteClient::<T>::new(&ctx.config, &cookies)?;
                match client.download_favorites(&ctx.debug_dumps()).await? {
                    Ok(text) => return Ok(Some(text)),
                    Err(blocked) => {
                        warn!("{} did not serve the favorites: {blocked}", T::SOURCE);
                        println!("{}", T::manual_instructions(&snapshot_path));
                    }
                }
            }
        }
    }
    Ok(None)
}

fn read_snapshot(path: &Path) -> anyhow::Result<Option<String>> {
    match fs_err::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        marker::PhantomData,
        net::SocketAddr,
        path::Path,
        sync::{Arc, Mutex},
    };

    use reqwest::header::HeaderMap;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };
    use url::Url;

    use crate::{
        api::{Blocked, FetchedPage},
        config::Config,
        debug_dump::DebugDumps,
        site_trait::SiteTrait,
        song::{Song, Source},
        tab4u::Tab4u,
        ultimate_guitar::UltimateGuitar,
    };

    use super::{acquire_page, fetch_favorites, FetchContext, PageSource};

    thread_local! {
        static SERVER: Cell<Option<SocketAddr>> = const { Cell::new(None) };
        static INSTRUCTIONS_SHOWN: Cell<usize> = const { Cell::new(0) };
    }

    /// `T` with its favorites URLs moved to the local server in `SERVER`.
    struct Local<T>(PhantomData<T>);
    impl<T: SiteTrait> SiteTrait for Local<T> {
        const SOURCE: Source = T::SOURCE;
        const COOKIE_DOMAIN: &'static str = T::COOKIE_DOMAIN;
        const ACCEPT_LANGUAGE: &'static str = T::ACCEPT_LANGUAGE;
        const FAVORITES_URLS: &'static [&'static str] = T::FAVORITES_URLS;
        const SNAPSHOT_FILE: &'static str = T::SNAPSHOT_FILE;
        const PAGE_SOURCES: &'static [PageSource] = T::PAGE_SOURCES;
        const RAW_DEBUG_FILE: Option<&'static str> = T::RAW_DEBUG_FILE;

        fn favorites_urls() -> Vec<String> {
            let addr = SERVER.with(Cell::get).unwrap();
            T::FAVORITES_URLS
                .iter()
                .map(|url| format!("http://{addr}{}", Url::parse(url).unwrap().path()))
                .collect()
        }

        fn extra_headers() -> HeaderMap {
            T::extra_headers()
        }

        fn check_response(page: &FetchedPage) -> Result<(), Blocked> {
            T::check_response(page)
        }

        fn manual_instructions(snapshot_path: &Path) -> String {
            INSTRUCTIONS_SHOWN.with(|shown| shown.set(shown.get() + 1));
            T::manual_instructions(snapshot_path)
        }

        fn parse(raw: &str, dumps: &DebugDumps) -> anyhow::Result<Vec<Song>> {
            T::parse(raw, dumps)
        }
    }

    /// Answers every request with `status` and `body`, recording the requested paths.
    async fn serve(status: &'static str, body: &'static str) -> Arc<Mutex<Vec<String>>> {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        SERVER.with(|server| server.set(Some(listener.local_addr().unwrap())));
        let paths = Arc::new(Mutex::new(vec![]));
        let seen = Arc::clone(&paths);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request: Vec<u8> = vec![];
                let mut buf = [0; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let path = String::from_utf8_lossy(&request)
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_owned();
                seen.lock().unwrap().push(path);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });
        paths
    }

    /// Network-enabled context reading cookies from an empty jar in `dir`.
    fn online_context(dir: &Path) -> FetchContext {
        let cookie_jar_path = dir.join("cookies.json");
        fs_err::write(&cookie_jar_path, "[]").unwrap();
        FetchContext::builder()
            .config(Config {
                snapshot_dir: dir.to_owned(),
                cookie_jar_path,
                browser_store: false,
                ..Config::default()
            })
            .build()
    }

    fn offline_context(snapshot_dir: &Path) -> FetchContext {
        FetchContext::builder()
            .config(Config {
                snapshot_dir: snapshot_dir.to_owned(),
                ..Config::default()
            })
            .offline(true)
            .build()
    }

    #[test]
    fn test_default_precedence() {
        let ctx = FetchContext::builder().build();
        assert_eq!(
            ctx.page_sources::<UltimateGuitar>(),
            [PageSource::Network, PageSource::Snapshot]
        );
        assert_eq!(
            ctx.page_sources::<Tab4u>(),
            [PageSource::Snapshot, PageSource::Network]
        );
        let ctx = FetchContext::builder().offline(true).build();
        assert_eq!(ctx.page_sources::<UltimateGuitar>(), [PageSource::Snapshot]);
    }

    #[tokio::test]
    async fn test_missing_snapshot_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = offline_context(dir.path());
        let page = acquire_page::<Tab4u>(&ctx, &[PageSource::Snapshot])
            .await
            .unwrap();
        assert!(page.is_none());
        assert!(fetch_favorites::<UltimateGuitar>(&ctx)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(
            dir.path().join("tab4u_mysongs.html"),
            r#"<div class="songs"><a href="/tabs/songs/74165_Foo_Fighters_-_My_Hero.html">My Hero</a></div>"#,
        )
        .unwrap();
        let songs = fetch_favorites::<Tab4u>(&offline_context(dir.path()))
            .await
            .unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].artist, "Foo Fighters");
        assert_eq!(songs[0].title, "My Hero");
        assert_eq!(songs[0].source, Source::Tab4u);
    }

    #[tokio::test]
    async fn test_refused_network_falls_back_to_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(dir.path().join("ug_favorites.html"), "saved by hand").unwrap();
        let paths = serve("403 Forbidden", "Forbidden").await;
        let ctx = online_context(dir.path());

        let page = acquire_page::<Local<UltimateGuitar>>(
            &ctx,
            &[PageSource::Network, PageSource::Snapshot],
        )
        .await
        .unwrap();
        assert_eq!(page.as_deref(), Some("saved by hand"));
        assert_eq!(*paths.lock().unwrap(), ["/user/favorites", "/user/mytabs"]);
        assert_eq!(INSTRUCTIONS_SHOWN.with(Cell::get), 1);
    }

    #[tokio::test]
    async fn test_login_wall_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = serve("200 OK", "<button id=\"firstLoginBut\">login</button>").await;
        let ctx = online_context(dir.path());

        let page = acquire_page::<Local<Tab4u>>(&ctx, &[PageSource::Network])
            .await
            .unwrap();
        assert!(page.is_none());
        assert!(fetch_favorites::<Local<Tab4u>>(&ctx)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            *paths.lock().unwrap(),
            ["/getMySongs.php", "/getMySongs.php"]
        );
        assert_eq!(INSTRUCTIONS_SHOWN.with(Cell::get), 2);
    }
}
