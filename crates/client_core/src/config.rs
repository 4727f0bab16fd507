use std::{fs, path::Path, str::FromStr, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub const SETTINGS_FILE: &str = "biaslens.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid api base url '{0}': expected an http:// or https:// url")]
    InvalidBaseUrl(String),
    #[error("request timeout must be at least one second")]
    InvalidTimeout,
    #[error("unknown search route '{0}': expected 'primary' or 'legacy'")]
    UnknownSearchRoute(String),
}

/// Which of the two search endpoints the backend is queried through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchRoute {
    /// `GET {base}/?q=<query>`
    #[default]
    Primary,
    /// `GET {base}/news/?query=<query>`
    Legacy,
}

impl SearchRoute {
    pub(crate) fn path_and_param(self) -> (&'static str, &'static str) {
        match self {
            SearchRoute::Primary => ("", "q"),
            SearchRoute::Legacy => ("news/", "query"),
        }
    }
}

impl FromStr for SearchRoute {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(SearchRoute::Primary),
            "legacy" => Ok(SearchRoute::Legacy),
            other => Err(SettingsError::UnknownSearchRoute(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub search_route: SearchRoute,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            search_route: SearchRoute::Primary,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Normalizes the base url and rejects values no request could be built from.
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::InvalidTimeout);
        }
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    search_route: Option<SearchRoute>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if present, then environment overrides.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if path.exists() {
        match read_settings_file(path) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    apply_base_url(&mut settings, "settings file", &v);
                }
                if let Some(v) = file_cfg.search_route {
                    settings.search_route = v;
                }
                match file_cfg.request_timeout_secs {
                    Some(0) => warn!(
                        path = %path.display(),
                        "settings: ignoring zero request_timeout_secs"
                    ),
                    Some(v) => settings.request_timeout_secs = v,
                    None => {}
                }
            }
            Err(error) => warn!(
                path = %path.display(),
                error = %format!("{error:#}"),
                "settings: ignoring unreadable settings file"
            ),
        }
    }

    for key in ["BIASLENS_API_BASE_URL", "APP__API_BASE_URL"] {
        if let Some(v) = env(key) {
            apply_base_url(&mut settings, key, &v);
        }
    }

    if let Some(v) = env("APP__SEARCH_ROUTE") {
        match v.parse::<SearchRoute>() {
            Ok(route) => settings.search_route = route,
            Err(error) => warn!(%error, "settings: ignoring APP__SEARCH_ROUTE override"),
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warn!(value = %v, "settings: ignoring APP__REQUEST_TIMEOUT_SECS override"),
        }
    }

    settings
}

/// Invalid values leave the previous layer's url in place.
fn apply_base_url(settings: &mut ClientSettings, source: &str, raw: &str) {
    match normalize_base_url(raw) {
        Ok(url) => settings.api_base_url = url,
        Err(error) => warn!(source, %error, "settings: ignoring api base url"),
    }
}

fn read_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

/// Trims whitespace and trailing slashes; an empty value means the default.
pub fn normalize_base_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed =
        url::Url::parse(trimmed).map_err(|_| SettingsError::InvalidBaseUrl(trimmed.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(SettingsError::InvalidBaseUrl(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
