/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Hold the fixed package identity served by Syn-Get and the
    operational settings loaded from an optional TOML file.

  Security / Safety Notes:
    The upstream token is read from the environment only and
    is never serialised back out.

  Dependencies:
    serde + toml for the config file, dirs for its default
    location.

  Operational Scope:
    Built once at process start and shared read-only with the
    server, the upstream client, and the dispatcher.

  Revision History:
    2026-10-17 COD  Introduced service configuration.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Immutable configuration after startup
    - Unknown keys rejected rather than ignored
============================================================*/

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SynGetError};

pub const OWNER: &str = "0GMou";
pub const WINGET_REPO: &str = "D4RKO-WINGET";
pub const BRANCH: &str = "main";
pub const PACKAGE_IDENTIFIER: &str = "d4rko.mpv";
pub const PUBLISHER: &str = "D4RKO";
pub const DEFAULT_PACKAGE_NAME: &str = "MPV";
pub const DEFAULT_PACKAGE_LOCALE: &str = "en-US";
pub const BASE_DIR: &str = "manifests/d/d4rko/d4rko.mpv";
pub const SOURCE_IDENTIFIER: &str = "d4rko-rest";

/// Protocol versions advertised by `/information`. Append new ones at the end.
pub const SUPPORTED_API_VERSIONS: &[&str] = &[
    "1.0.0", "1.1.0", "1.2.0", "1.3.0", "1.4.0", "1.5.0", "1.6.0", "1.7.0", "1.8.0", "1.9.0",
];

const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// The single package this service exposes and where it lives upstream.
#[derive(Debug, Clone)]
pub struct PackageIdentity {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub base_dir: String,
    pub package_identifier: String,
    pub publisher: String,
    pub default_package_name: String,
    pub default_locale: String,
    pub source_identifier: String,
    pub supported_versions: Vec<String>,
}

impl Default for PackageIdentity {
    fn default() -> Self {
        Self {
            owner: OWNER.into(),
            repository: WINGET_REPO.into(),
            branch: BRANCH.into(),
            base_dir: BASE_DIR.into(),
            package_identifier: PACKAGE_IDENTIFIER.into(),
            publisher: PUBLISHER.into(),
            default_package_name: DEFAULT_PACKAGE_NAME.into(),
            default_locale: DEFAULT_PACKAGE_LOCALE.into(),
            source_identifier: SOURCE_IDENTIFIER.into(),
            supported_versions: SUPPORTED_API_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }
}

impl PackageIdentity {
    /// Case-insensitive comparison against the served identifier.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.eq_ignore_ascii_case(&self.package_identifier)
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(skip)]
    pub identity: PackageIdentity,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Seconds advertised through `cache-control`.
    pub cache_max_age: u64,
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            cache_max_age: 120,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    pub api_base: String,
    pub raw_base: String,
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub max_parallel_requests: usize,
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".into(),
            raw_base: "https://raw.githubusercontent.com".into(),
            user_agent: "d4rko-rest".into(),
            timeout: 30,
            max_parallel_requests: 8,
            token: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from an explicit path, the default location, or
    /// built-in defaults, in that order.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(explicit) => Self::load_file(explicit)?,
            None => match default_config_path() {
                Some(candidate) if candidate.is_file() => Self::load_file(&candidate)?,
                _ => Self::default(),
            },
        };
        config.upstream.token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            SynGetError::Config(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml(&raw)
            .map_err(|err| SynGetError::Config(format!("{}: {err}", path.display())))
    }

    fn from_toml(raw: &str) -> std::result::Result<Self, String> {
        let config: ServiceConfig = toml::from_str(raw).map_err(|err| err.to_string())?;
        if config.upstream.max_parallel_requests == 0 {
            return Err("upstream.max_parallel_requests must be at least 1".into());
        }
        Ok(config)
    }

    /// Directory for session logs.
    pub fn log_dir(&self) -> PathBuf {
        self.server.log_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join("synget")
                .join("logs")
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("synget").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_served_package() {
        let config = ServiceConfig::default();
        assert_eq!(config.identity.package_identifier, "d4rko.mpv");
        assert_eq!(config.identity.publisher, "D4RKO");
        assert_eq!(config.server.cache_max_age, 120);
        assert_eq!(config.identity.supported_versions.last().unwrap(), "1.9.0");
    }

    #[test]
    fn identity_match_ignores_case() {
        let identity = PackageIdentity::default();
        assert!(identity.matches("D4RKO.MPV"));
        assert!(identity.matches("d4rko.mpv"));
        assert!(!identity.matches("other.pkg"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nbind = \"0.0.0.0:9000\"\n\n[upstream]\ntimeout = 5"
        )
        .unwrap();

        let config = ServiceConfig::load_from_optional_path(Some(file.path())).unwrap();
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.server.cache_max_age, 120);
        assert_eq!(config.upstream.timeout, 5);
        assert_eq!(config.upstream.user_agent, "d4rko-rest");
        assert_eq!(config.identity.package_identifier, PACKAGE_IDENTIFIER);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ServiceConfig::from_toml("[server]\nport = 1").is_err());
        assert!(ServiceConfig::from_toml("[identity]\npackage_identifier = \"x\"").is_err());
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let err = ServiceConfig::from_toml("[upstream]\nmax_parallel_requests = 0").unwrap_err();
        assert!(err.contains("max_parallel_requests"));
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let err = ServiceConfig::load_from_optional_path(Some(Path::new(
            "/nonexistent/synget/config.toml",
        )))
        .unwrap_err();
        assert!(matches!(err, SynGetError::Config(_)));
    }
}
