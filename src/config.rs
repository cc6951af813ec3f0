use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};

use crate::fs_json_util::read_toml;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Paths and request settings.  Every field is optional in the TOML file.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_path: PathBuf,
    /// Directory holding the manually saved `ug_favorites.html` / `tab4u_mysongs.html`.
    pub snapshot_dir: PathBuf,
    pub debug_dir: PathBuf,
    pub cookie_jar_path: PathBuf,
    /// Read the browser's own cookie store before the jar file.
    pub browser_store: bool,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: "random_song.html".into(),
            snapshot_dir: ".".into(),
            debug_dir: ".".into(),
            cookie_jar_path: "cookies.json".into(),
            browser_store: true,
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(path) => read_toml(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Config;

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            output_path = "out/picker.html"
            timeout = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.output_path.to_str(), Some("out/picker.html"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.snapshot_dir.to_str(), Some("."));
        assert_eq!(config.cookie_jar_path.to_str(), Some("cookies.json"));
        assert!(config.browser_store);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<Config>("outptu_path = \"x\"").is_err());
    }
}
