//! `<STYLER_HOME>/config.toml` plus command line overrides.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::filter::MatchMode;

pub const CONFIG_FILE: &str = "config.toml";
const HOME_ENV: &str = "STYLER_HOME";
const DEFAULT_HOME_DIR: &str = ".styler";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory; set {HOME_ENV}")]
    NoHome,

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Directory holding the config file and logs: `$STYLER_HOME`, else `~/.styler`.
pub fn styler_home() -> Result<PathBuf, ConfigError> {
    if let Ok(env_home) = std::env::var(HOME_ENV)
        && !env_home.is_empty()
    {
        return Ok(PathBuf::from(env_home));
    }
    let mut home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
    home.push(DEFAULT_HOME_DIR);
    Ok(home)
}

/// On-disk shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigToml {
    data: Option<String>,
    match_mode: Option<MatchMode>,
    show_welcome: Option<bool>,
    analytics: Option<bool>,
    request_timeout_secs: Option<u64>,
}

/// Values supplied on the command line; `Some` wins over the file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data: Option<String>,
    pub match_mode: Option<MatchMode>,
    pub show_welcome: Option<bool>,
    pub analytics: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Base URL or directory holding `data/`.
    pub data: String,
    pub match_mode: MatchMode,
    pub show_welcome: bool,
    pub analytics: bool,
    pub request_timeout: Duration,
    pub styler_home: PathBuf,
}

impl ExplorerConfig {
    /// Load `<styler_home>/config.toml`. A missing file yields the defaults.
    pub fn load(styler_home: &Path, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::load_from(&styler_home.join(CONFIG_FILE), styler_home, overrides)
    }

    pub fn load_from(
        path: &Path,
        styler_home: &Path,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => {
                toml::from_str::<ConfigToml>(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => ConfigToml::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Ok(Self::merge(file, styler_home, overrides))
    }

    fn merge(file: ConfigToml, styler_home: &Path, overrides: ConfigOverrides) -> Self {
        Self {
            data: overrides
                .data
                .or(file.data)
                .unwrap_or_else(|| ".".to_string()),
            match_mode: overrides.match_mode.or(file.match_mode).unwrap_or_default(),
            show_welcome: overrides.show_welcome.or(file.show_welcome).unwrap_or(true),
            analytics: overrides.analytics.or(file.analytics).unwrap_or(false),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            styler_home: styler_home.to_path_buf(),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.styler_home.join("log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().expect("tempdir");
        let config = ExplorerConfig::load(home.path(), ConfigOverrides::default())
            .expect("defaults");
        assert_eq!(config.data, ".");
        assert_eq!(config.match_mode, MatchMode::All);
        assert!(config.show_welcome);
        assert!(!config.analytics);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_dir(), home.path().join("log"));
    }

    #[test]
    fn overrides_win_over_file() {
        let home = TempDir::new().expect("tempdir");
        std::fs::write(
            home.path().join(CONFIG_FILE),
            "data = \"https://example.org/styler/\"\nmatch_mode = \"any\"\nshow_welcome = false\nrequest_timeout_secs = 5\n",
        )
        .expect("write config");

        let config = ExplorerConfig::load(
            home.path(),
            ConfigOverrides {
                match_mode: Some(MatchMode::All),
                analytics: Some(true),
                ..ConfigOverrides::default()
            },
        )
        .expect("config");

        assert_eq!(config.data, "https://example.org/styler/");
        assert_eq!(config.match_mode, MatchMode::All);
        assert!(!config.show_welcome);
        assert!(config.analytics);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let home = TempDir::new().expect("tempdir");
        std::fs::write(home.path().join(CONFIG_FILE), "colour = \"blue\"\n").expect("write");
        assert_matches!(
            ExplorerConfig::load(home.path(), ConfigOverrides::default()),
            Err(ConfigError::Parse { .. })
        );
    }
}
