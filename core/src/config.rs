//! Handles the configuration of the client.
//!
//! this module is responsible for parsing the Waxlog.toml file, layering environment variables
//! and cli arguments on top of it, and locating the session token.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

use crate::errors::DirectoryError;

pub static DEFAULT_CONFIG: &str = include_str!("../Waxlog.toml");

/// Name of the file the session token is stored in, inside the data directory.
pub const TOKEN_FILE_NAME: &str = "token";

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// How to reach the backend, and where the session lives.
    #[serde(default)]
    pub client: ClientSettings,
    /// Page sizes of the list views.
    #[serde(default)]
    pub pagination: PaginationSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The config file is located at the path specified by the `--config` flag.
    ///
    /// The environment variables are prefixed with `WAXLOG_`, with `__` separating the section
    /// from the key (e.g. `WAXLOG_PAGINATION__RELEASES=24`).
    ///
    /// # Arguments
    ///
    /// * `config` - path to the config file.
    /// * `api_base` - overrides `client.api_base` when set.
    /// * `log_level` - overrides `client.log_level` when set.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid, which includes a page size of 0.
    #[inline]
    pub fn init(
        config: PathBuf,
        api_base: Option<String>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(
                Environment::with_prefix("WAXLOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(path) = settings.client.token_file.as_mut() {
            *path = shellexpand::tilde(&path.to_string_lossy())
                .into_owned()
                .into();
        }

        if let Some(api_base) = api_base {
            settings.client.api_base = api_base;
        }

        if let Some(log_level) = log_level {
            settings.client.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        let config_dir = crate::get_config_dir().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string())
        })?;

        // if the config directory does not exist, create it
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }
        let config_file = config_dir.join("Waxlog.toml");

        if !config_file.exists() {
            std::fs::write(&config_file, DEFAULT_CONFIG)?;
        }

        Ok(config_file)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL of the REST API, without a trailing slash.
    /// Default is `http://localhost:8000/api`.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// How long to wait for a response before giving up.
    /// Default is 30 seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where the session token is persisted between runs.
    /// If unset, a file named `token` in the data directory is used.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

impl ClientSettings {
    /// The file the session token is kept in.
    ///
    /// # Errors
    ///
    /// Fails if no token file is configured and the data directory can't be found.
    #[inline]
    pub fn token_path(&self) -> Result<PathBuf, DirectoryError> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => crate::get_data_dir().map(|dir| dir.join(TOKEN_FILE_NAME)),
        }
    }
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

fn default_api_base() -> String {
    "http://localhost:8000/api".into()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for ClientSettings {
    #[inline]
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            token_file: None,
            log_level: default_log_level(),
        }
    }
}

/// Records per page for each list view.
///
/// Zero is not a valid page size, and is rejected when the config is loaded.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct PaginationSettings {
    /// The releases list. Default is 12.
    #[serde(default = "default_releases")]
    pub releases: NonZeroUsize,
    /// The artists list. Default is 12.
    #[serde(default = "default_artists")]
    pub artists: NonZeroUsize,
    /// The uploads and favourites tabs of a profile. Default is 15.
    #[serde(default = "default_profile")]
    pub profile: NonZeroUsize,
    /// The releases shown on an artist's page. Default is 6.
    #[serde(default = "default_artist_releases")]
    pub artist_releases: NonZeroUsize,
    /// The reviews shown on a release's page. Default is 5.
    #[serde(default = "default_reviews")]
    pub reviews: NonZeroUsize,
}

const fn page_size(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    }
}

const fn default_releases() -> NonZeroUsize {
    page_size(12)
}

const fn default_artists() -> NonZeroUsize {
    page_size(12)
}

const fn default_profile() -> NonZeroUsize {
    page_size(15)
}

const fn default_artist_releases() -> NonZeroUsize {
    page_size(6)
}

const fn default_reviews() -> NonZeroUsize {
    page_size(5)
}

impl Default for PaginationSettings {
    #[inline]
    fn default() -> Self {
        Self {
            releases: default_releases(),
            artists: default_artists(),
            profile: default_profile(),
            artist_releases: default_artist_releases(),
            reviews: default_reviews(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("Waxlog.toml");
        std::fs::write(&config_path, contents).unwrap();
        (temp_dir, config_path)
    }

    #[test]
    fn test_init_config() {
        let (_dir, config_path) = write_config(
            r#"
[client]
api_base = "https://catalog.example/api"
timeout_secs = 5
token_file = "/tmp/waxlog-token"
log_level = "debug"

[pagination]
releases = 24
artists = 10
profile = 15
artist_releases = 3
reviews = 2
            "#,
        );

        let expected = Settings {
            client: ClientSettings {
                api_base: "https://catalog.example/api".into(),
                timeout_secs: 5,
                token_file: Some("/tmp/waxlog-token".into()),
                log_level: log::LevelFilter::Debug,
            },
            pagination: PaginationSettings {
                releases: page_size(24),
                artists: page_size(10),
                profile: page_size(15),
                artist_releases: page_size(3),
                reviews: page_size(2),
            },
        };

        let settings = Settings::init(config_path, None, None).unwrap();

        assert_eq!(settings, expected);
    }

    #[test]
    fn test_default_config_works() {
        let (_dir, config_path) = write_config(DEFAULT_CONFIG);

        let settings = Settings::init(config_path, None, None);

        assert!(settings.is_ok(), "Error: {:?}", settings.err());
        assert_eq!(settings.unwrap(), Settings::default());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let (_dir, config_path) = write_config("[pagination]\nreviews = 3\n");

        let settings = Settings::init(config_path, None, None).unwrap();

        assert_eq!(settings.client, ClientSettings::default());
        assert_eq!(settings.pagination.reviews.get(), 3);
        assert_eq!(settings.pagination.releases.get(), 12);
    }

    #[rstest]
    #[case::releases("releases")]
    #[case::reviews("reviews")]
    fn test_zero_page_size_is_rejected(#[case] key: &str) {
        let (_dir, config_path) = write_config(&format!("[pagination]\n{key} = 0\n"));

        assert!(Settings::init(config_path, None, None).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let (_dir, config_path) = write_config(DEFAULT_CONFIG);

        let settings = Settings::init(
            config_path,
            Some("http://127.0.0.1:9000/api".into()),
            Some(log::LevelFilter::Trace),
        )
        .unwrap();

        assert_eq!(settings.client.api_base, "http://127.0.0.1:9000/api");
        assert_eq!(settings.client.log_level, log::LevelFilter::Trace);
    }

    #[test]
    fn test_token_file_is_tilde_expanded() {
        let (_dir, config_path) = write_config("[client]\ntoken_file = \"~/waxlog/token\"\n");

        let settings = Settings::init(config_path, None, None).unwrap();
        let token_path = settings.client.token_path().unwrap();

        assert!(!token_path.starts_with("~"));
        assert!(token_path.ends_with("waxlog/token"));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let (_dir, config_path) = write_config("[client]\nlog_level = \"chatty\"\n");

        let settings = Settings::init(config_path, None, None).unwrap();

        assert_eq!(settings.client.log_level, log::LevelFilter::Info);
    }
}
