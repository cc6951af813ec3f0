use std::marker::PhantomData;

use crate::config::Config;
use crate::cookie_store::SessionCookies;
use crate::debug_dump::DebugDumps;
use crate::site_trait::SiteTrait;
use anyhow::Context;
use getset::Getters;
use log::debug;
use reqwest::header;
use reqwest::header::HeaderValue;
use reqwest::IntoUrl;
use reqwest::StatusCode;
use url::Url;

/// Why a site's response was not accepted as the favorites page.
#[derive(Debug, thiserror::Error)]
pub enum Blocked {
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("redirected to a login page ({0})")]
    LoginRedirect(Url),
    #[error("the response asks to log in")]
    LoginWall,
}

/// A response body together with where it finally came from.
#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct FetchedPage {
    status: StatusCode,
    url: Url,
    text: String,
}
impl FetchedPage {
    pub fn new(status: StatusCode, url: Url, text: impl Into<String>) -> Self {
        Self {
            status,
            url,
            text: text.into(),
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

pub struct SiteClient<T> {
    client: reqwest::Client,
    cookie_header: Option<HeaderValue>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: SiteTrait> SiteClient<T> {
    pub fn new(config: &Config, cookies: &SessionCookies) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest_client(config)?,
            cookie_header: cookies.header_value()?,
            _phantom: PhantomData,
        })
    }

    /// Requests each of [`SiteTrait::favorites_urls`] once, returning the first accepted body,
    /// or the reason the last one was refused.
    pub async fn download_favorites(
        &self,
        dumps: &DebugDumps,
    ) -> anyhow::Result<Result<String, Blocked>> {
        let mut last_blocked = None;
        for url in T::favorites_urls() {
            let page = self.fetch(url.as_str()).await?;
            if let Some(file) = T::RAW_DEBUG_FILE {
                dumps.write_text(file, page.text());
            }
            match T::check_response(&page) {
                Ok(()) => return Ok(Ok(page.into_text())),
                Err(blocked) => {
                    debug!("{url} was not accepted: {blocked}");
                    last_blocked = Some(blocked);
                }
            }
        }
        Ok(Err(last_blocked.with_context(|| {
            format!("No favorites URL is configured for {}", T::SOURCE)
        })?))
    }

    pub async fn fetch(&self, url: impl IntoUrl) -> anyhow::Result<FetchedPage> {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT_LANGUAGE, T::ACCEPT_LANGUAGE)
            .headers(T::extra_headers());
        if let Some(cookie) = &self.cookie_header {
            request = request.header(header::COOKIE, cookie.clone());
        }
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        debug!("{status} from {url}");
        // Decode as UTF-8 whatever the declared charset is.
        let text = String::from_utf8_lossy(&response.bytes().await?).into_owned();
        Ok(FetchedPage { status, url, text })
    }
}

fn reqwest_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .connection_verbose(true)
        .build()
}
