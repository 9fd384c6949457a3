//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CATALOG_CSV: &str = "cosmetic_p.csv";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub catalog_path: PathBuf,
    /// Built front-end directory holding `index.html` and `assets/`.
    pub dist_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    /// Route names to mark as requiring authentication.
    pub protected_routes: Vec<String>,
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `CATALOG_CSV`: default `cosmetic_p.csv`
    /// - `DIST_DIR`: unset serves route resolutions as JSON instead of the shell
    /// - `CORS_ORIGINS`: comma list, default `http://localhost:5173`
    /// - `PROTECTED_ROUTES`: comma list of route names, default none
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            catalog_path: non_empty(lookup("CATALOG_CSV")).map_or_else(|| PathBuf::from(DEFAULT_CATALOG_CSV), PathBuf::from),
            dist_dir: non_empty(lookup("DIST_DIR")).map(PathBuf::from),
            cors_origins: parse_list(&lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_owned())),
            protected_routes: lookup("PROTECTED_ROUTES").as_deref().map(parse_list).unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Split a comma list, trimming entries and dropping empty ones.
pub(crate) fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
}
