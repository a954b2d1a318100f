//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;
#[cfg(test)]
mod tests;

use std::{str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub use cli::{CliArgs, Command, ListArgs, SettingsOverrides, ShowArgs};

use crate::application::store::RefetchPolicy;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quire";
const ENV_PREFIX: &str = "QUIRE";
const DEFAULT_LIST_DELAY_MS: u64 = 1000;
const DEFAULT_DETAIL_DELAY_MS: u64 = 500;
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_MIN_DISPLAY_MS: u64 = 500;
const MAX_DELAY_MS: u64 = 60_000;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub provider: ProviderSettings,
    pub search: SearchSettings,
    pub store: StoreSettings,
    pub detail: DetailSettings,
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

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub list_delay: Duration,
    pub detail_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub refetch: RefetchPolicy,
}

#[derive(Debug, Clone)]
pub struct DetailSettings {
    pub min_display: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
///
/// Environment keys use a double underscore between segments, e.g.
/// `QUIRE__SEARCH__DEBOUNCE_MS=150`.
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    resolve(builder, environment(), &cli.overrides)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// Stack `env` over the file layers in `builder`, then the CLI overrides on top.
fn resolve(
    builder: ConfigBuilder<DefaultState>,
    env: Environment,
    overrides: &SettingsOverrides,
) -> Result<Settings, LoadError> {
    let mut raw: RawSettings = builder.add_source(env).build()?.try_deserialize()?;
    raw.apply_overrides(overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    provider: RawProviderSettings,
    search: RawSearchSettings,
    store: RawStoreSettings,
    detail: RawDetailSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(delay) = overrides.provider_list_delay_ms {
            self.provider.list_delay_ms = Some(delay);
        }
        if let Some(delay) = overrides.provider_detail_delay_ms {
            self.provider.detail_delay_ms = Some(delay);
        }
        if let Some(debounce) = overrides.search_debounce_ms {
            self.search.debounce_ms = Some(debounce);
        }
        if let Some(policy) = overrides.store_refetch.as_ref() {
            self.store.refetch = Some(policy.clone());
        }
        if let Some(min_display) = overrides.detail_min_display_ms {
            self.detail.min_display_ms = Some(min_display);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            provider,
            search,
            store,
            detail,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            provider: build_provider_settings(provider)?,
            search: build_search_settings(search)?,
            store: build_store_settings(store)?,
            detail: build_detail_settings(detail)?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
            provider: ProviderSettings {
                list_delay: Duration::from_millis(DEFAULT_LIST_DELAY_MS),
                detail_delay: Duration::from_millis(DEFAULT_DETAIL_DELAY_MS),
            },
            search: SearchSettings {
                debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            },
            store: StoreSettings {
                refetch: RefetchPolicy::default(),
            },
            detail: DetailSettings {
                min_display: Duration::from_millis(DEFAULT_MIN_DISPLAY_MS),
            },
        }
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_provider_settings(provider: RawProviderSettings) -> Result<ProviderSettings, LoadError> {
    let list_delay = bounded_millis(
        provider.list_delay_ms.unwrap_or(DEFAULT_LIST_DELAY_MS),
        "provider.list_delay_ms",
    )?;
    let detail_delay = bounded_millis(
        provider.detail_delay_ms.unwrap_or(DEFAULT_DETAIL_DELAY_MS),
        "provider.detail_delay_ms",
    )?;

    Ok(ProviderSettings {
        list_delay,
        detail_delay,
    })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let debounce = bounded_millis(
        search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
        "search.debounce_ms",
    )?;
    Ok(SearchSettings { debounce })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let refetch = match store.refetch {
        Some(value) => RefetchPolicy::from_str(&value)
            .map_err(|err| LoadError::invalid("store.refetch", err.to_string()))?,
        None => RefetchPolicy::default(),
    };
    Ok(StoreSettings { refetch })
}

fn build_detail_settings(detail: RawDetailSettings) -> Result<DetailSettings, LoadError> {
    let min_display = bounded_millis(
        detail.min_display_ms.unwrap_or(DEFAULT_MIN_DISPLAY_MS),
        "detail.min_display_ms",
    )?;
    Ok(DetailSettings { min_display })
}

/// Zero is allowed everywhere; it turns the corresponding wait off.
fn bounded_millis(value: u64, key: &'static str) -> Result<Duration, LoadError> {
    if value > MAX_DELAY_MS {
        return Err(LoadError::invalid(
            key,
            format!("must not exceed {MAX_DELAY_MS} milliseconds"),
        ));
    }
    Ok(Duration::from_millis(value))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawProviderSettings {
    list_delay_ms: Option<u64>,
    detail_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    refetch: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDetailSettings {
    min_display_ms: Option<u64>,
}
