//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{num::NonZeroU32, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{CliArgs, Command, ListArgs, Overrides, SearchArgs, ShowArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postboard";
const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u64 = 10;
const DEFAULT_GROUP_SIZE: u64 = 5;
const DEFAULT_USER_ID: u64 = 1;
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub board: BoardSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoardSettings {
    pub page_size: NonZeroU32,
    pub group_size: NonZeroU32,
    /// Author id attached to created posts.
    pub user_id: u64,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("POSTBOARD").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    remote: RawRemoteSettings,
    board: RawBoardSettings,
    search: RawSearchSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRemoteSettings {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBoardSettings {
    page_size: Option<u64>,
    group_size: Option<u64>,
    user_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = overrides.base_url.as_ref() {
            self.remote.base_url = Some(url.clone());
        }
        if let Some(seconds) = overrides.timeout_seconds {
            self.remote.timeout_seconds = Some(seconds);
        }
        if let Some(size) = overrides.page_size {
            self.board.page_size = Some(u64::from(size));
        }
        if let Some(size) = overrides.group_size {
            self.board.group_size = Some(u64::from(size));
        }
        if let Some(id) = overrides.user_id {
            self.board.user_id = Some(id);
        }
        if let Some(ms) = overrides.debounce_ms {
            self.search.debounce_ms = Some(ms);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            remote,
            board,
            search,
            logging,
        } = raw;

        Ok(Self {
            remote: build_remote_settings(remote)?,
            board: build_board_settings(board)?,
            search: build_search_settings(search)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_remote_settings(remote: RawRemoteSettings) -> Result<RemoteSettings, LoadError> {
    let raw_url = remote
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("remote.base_url", format!("`{raw_url}`: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "remote.base_url",
            "scheme must be http or https",
        ));
    }

    let timeout_seconds = remote.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_seconds == 0 {
        return Err(LoadError::invalid(
            "remote.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(RemoteSettings {
        base_url,
        timeout: Duration::from_secs(timeout_seconds),
    })
}

fn build_board_settings(board: RawBoardSettings) -> Result<BoardSettings, LoadError> {
    Ok(BoardSettings {
        page_size: non_zero_u32(
            board.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            "board.page_size",
        )?,
        group_size: non_zero_u32(
            board.group_size.unwrap_or(DEFAULT_GROUP_SIZE),
            "board.group_size",
        )?,
        user_id: board.user_id.unwrap_or(DEFAULT_USER_ID),
    })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let debounce_ms = search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS);
    if debounce_ms > MAX_DEBOUNCE_MS {
        return Err(LoadError::invalid(
            "search.debounce_ms",
            format!("must be at most {MAX_DEBOUNCE_MS}"),
        ));
    }
    Ok(SearchSettings {
        debounce: Duration::from_millis(debounce_ms),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
