use std::{
    borrow::Cow,
    fmt::{self, Display},
    path::PathBuf,
};

use anyhow::anyhow;
use clap::ValueEnum;
use derive_more::{Deref, From};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};
use reqwest::header::HeaderValue;
use serde::Deserialize;

use crate::{config::Config, fs_json_util::read_json};

#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
}

/// A cookie as read from any backend, before it is filtered by domain.
///
/// The field names match the JSON written by the usual cookie-export browser extensions,
/// so such an export can be used as a cookie jar as is.
#[derive(Clone, Debug, Deserialize)]
pub struct StoredCookie {
    pub domain: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
}
impl StoredCookie {
    fn matches_domain(&self, domain: &str) -> bool {
        let own = self.domain.trim_start_matches('.');
        own == domain
            || own
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CookieBackend {
    /// The browser's own cookie database.  Chrome values are decrypted.
    BrowserStore,
    /// A JSON cookie export, usable with any browser.
    JarFile(PathBuf),
}
impl Display for CookieBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieBackend::BrowserStore => f.write_str("browser cookie store"),
            CookieBackend::JarFile(path) => write!(f, "cookie jar {path:?}"),
        }
    }
}

impl CookieBackend {
    /// Backends in the order they are tried.
    pub fn chain(config: &Config) -> Vec<Self> {
        let jar = Self::JarFile(config.cookie_jar_path.clone());
        if config.browser_store {
            vec![Self::BrowserStore, jar]
        } else {
            vec![jar]
        }
    }

    fn is_available(&self) -> bool {
        match self {
            CookieBackend::BrowserStore => cfg!(feature = "browser-store"),
            CookieBackend::JarFile(path) => path.exists(),
        }
    }

    fn load(&self, domain: &str, browser: Browser) -> anyhow::Result<Vec<StoredCookie>> {
        match self {
            CookieBackend::BrowserStore => load_from_browser_store(domain, browser),
            CookieBackend::JarFile(path) => read_json(path),
        }
    }
}

#[cfg(feature = "browser-store")]
fn load_from_browser_store(domain: &str, browser: Browser) -> anyhow::Result<Vec<StoredCookie>> {
    let domains = Some(vec![domain.to_owned()]);
    let cookies = match browser {
        Browser::Chrome => rookie::chrome(domains),
        Browser::Firefox => rookie::firefox(domains),
    }
    .map_err(|e| anyhow!("{e:#}"))?;
    Ok(cookies
        .into_iter()
        .map(|cookie| StoredCookie {
            domain: cookie.domain,
            name: cookie.name,
            value: cookie.value,
        })
        .collect())
}

#[cfg(not(feature = "browser-store"))]
fn load_from_browser_store(_domain: &str, _browser: Browser) -> anyhow::Result<Vec<StoredCookie>> {
    anyhow::bail!("This build does not include the `browser-store` feature")
}

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error(
        "No way to read {browser} cookies: none of [{tried}] is available.  \
         Rebuild with `--features browser-store`, or export the site's cookies as JSON to the cookie jar path."
    )]
    NoBackend { browser: Browser, tried: String },
}

/// Session cookies for one domain, `name -> value`, with every value safe to put in a header.
#[derive(Clone, Default, Debug, From, Deref)]
pub struct SessionCookies(IndexMap<String, String>);

impl FromIterator<StoredCookie> for SessionCookies {
    fn from_iter<I: IntoIterator<Item = StoredCookie>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|cookie| (cookie.name, header_safe(&cookie.value).into_owned()))
                .collect(),
        )
    }
}

impl SessionCookies {
    /// The `Cookie` header, or `None` when there is nothing to send.
    pub fn header_value(&self) -> anyhow::Result<Option<HeaderValue>> {
        if self.0.is_empty() {
            return Ok(None);
        }
        let line = self
            .0
            .iter()
            .map(|(name, value)| format!("{}={value}", header_safe(name)))
            .join("; ");
        let bytes = line
            .chars()
            .map(u8::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(HeaderValue::from_bytes(&bytes)?))
    }
}

pub fn get_cookies(
    domain: &str,
    browser: Browser,
    backends: &[CookieBackend],
) -> anyhow::Result<SessionCookies> {
    let available = backends.iter().filter(|b| b.is_available()).collect_vec();
    if available.is_empty() {
        return Err(CookieError::NoBackend {
            browser,
            tried: backends.iter().join(", "),
        }
        .into());
    }
    for backend in available {
        match backend.load(domain, browser) {
            Ok(cookies) => {
                let cookies = cookies
                    .into_iter()
                    .filter(|cookie| cookie.matches_domain(domain))
                    .collect::<SessionCookies>();
                debug!(
                    "Read {} cookie(s) for {domain} from the {backend}",
                    cookies.len()
                );
                return Ok(cookies);
            }
            Err(e) => warn!("Failed to read {browser} cookies from the {backend}: {e:#}"),
        }
    }
    Err(anyhow!("Could not read {browser} cookies for {domain}"))
}

fn is_header_char(c: char) -> bool {
    c == '\t' || (' '..='~').contains(&c) || ('\u{80}'..='\u{ff}').contains(&c)
}

/// Returns `value` untouched if it fits in a Latin-1 header, otherwise its percent-encoding.
pub fn header_safe(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_header_char) {
        Cow::Borrowed(value)
    } else {
        urlencoding::encode(value)
    }
}
