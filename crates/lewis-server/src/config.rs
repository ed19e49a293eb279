//! Server configuration from the environment.

use lewis_core::CanvasConfig;
use std::collections::HashSet;
use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Port used when `LEWIS_BIND` is unset.
pub const DEFAULT_PORT: u16 = 3030;
/// Directory of the wasm-bindgen output when `LEWIS_PKG_DIR` is unset.
pub const DEFAULT_PKG_DIR: &str = "pkg";
/// Idle time after which a session's store is dropped when
/// `LEWIS_SESSION_TTL_SECS` is unset.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);
/// Module that boots the browser binding, relative to `/pkg`.
pub const SCRIPT_NAME: &str = "lewis_web.js";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value}: {source}")]
    Bind {
        value: String,
        source: AddrParseError,
    },
    #[error("Invalid session TTL {value}: {source}")]
    SessionTtl {
        value: String,
        source: ParseIntError,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid canvas file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Canvas {0} is defined twice")]
    DuplicateCanvas(String),
    #[error("Canvas name {0:?} is not URL-safe")]
    InvalidCanvasName(String),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Served under `/pkg`.
    pub pkg_dir: PathBuf,
    /// JSON file with extra canvas configurations.
    pub canvases_file: Option<PathBuf>,
    /// Stores untouched for this long are evicted.
    pub session_ttl: Duration,
}

impl ServerConfig {
    /// Read `LEWIS_BIND`, `LEWIS_PKG_DIR`, `LEWIS_CANVASES` and
    /// `LEWIS_SESSION_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = match lookup("LEWIS_BIND") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::Bind { value: value.clone(), source })?,
            None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        };
        let pkg_dir = lookup("LEWIS_PKG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PKG_DIR));
        let canvases_file = lookup("LEWIS_CANVASES").filter(|v| !v.is_empty()).map(PathBuf::from);
        let session_ttl = match lookup("LEWIS_SESSION_TTL_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|source| ConfigError::SessionTtl { value: value.clone(), source })?,
            None => DEFAULT_SESSION_TTL,
        };

        Ok(Self {
            bind,
            pkg_dir,
            canvases_file,
            session_ttl,
        })
    }

    /// Built-in canvases, with the configured file's canvases replacing
    /// presets of the same name or appended after them.
    pub fn load_canvases(&self) -> Result<Vec<CanvasConfig>, ConfigError> {
        let mut canvases = CanvasConfig::presets();
        if let Some(path) = &self.canvases_file {
            for extra in read_canvas_file(path)? {
                match canvases.iter_mut().find(|c| c.name == extra.name) {
                    Some(existing) => *existing = extra,
                    None => canvases.push(extra),
                }
            }
        }
        Ok(canvases)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            pkg_dir: PathBuf::from(DEFAULT_PKG_DIR),
            canvases_file: None,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

fn read_canvas_file(path: &Path) -> Result<Vec<CanvasConfig>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let canvases: Vec<CanvasConfig> = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    for canvas in &canvases {
        if !is_url_safe(&canvas.name) {
            return Err(ConfigError::InvalidCanvasName(canvas.name.clone()));
        }
        if !seen.insert(canvas.name.as_str()) {
            return Err(ConfigError::DuplicateCanvas(canvas.name.clone()));
        }
    }
    Ok(canvases)
}

/// Names and session ids appear in URLs unescaped.
pub fn is_url_safe(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 64
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0:3030".parse().unwrap());
        assert_eq!(config.pkg_dir, PathBuf::from("pkg"));
        assert!(config.canvases_file.is_none());
        assert_eq!(config.load_canvases().unwrap().len(), 4);
    }

    #[test]
    fn test_empty_lookup_matches_default() {
        assert_eq!(ServerConfig::from_lookup(|_| None).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LEWIS_BIND", "127.0.0.1:8080"),
            ("LEWIS_PKG_DIR", "/srv/pkg"),
            ("LEWIS_CANVASES", ""),
            ("LEWIS_SESSION_TTL_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.session_ttl, Duration::from_secs(90));
        assert_eq!(config.pkg_dir, PathBuf::from("/srv/pkg"));
        assert!(config.canvases_file.is_none());
    }

    #[test]
    fn test_invalid_bind() {
        let result = ServerConfig::from_lookup(lookup(&[("LEWIS_BIND", "localhost")]));
        assert!(matches!(result, Err(ConfigError::Bind { .. })));
    }

    #[test]
    fn test_invalid_session_ttl() {
        let result = ServerConfig::from_lookup(lookup(&[("LEWIS_SESSION_TTL_SECS", "an hour")]));
        assert!(matches!(result, Err(ConfigError::SessionTtl { .. })));
    }

    #[test]
    fn test_canvas_file_replaces_and_appends() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name":"organic","title":"Organic (short)","palette":[{{"label":"C","kind":"atom"}}]}},
                {{"name":"salts","title":"Salts","delete_enabled":true,"palette":[{{"label":"Na","kind":"atom"}}]}}
            ]"#
        )
        .unwrap();

        let config = ServerConfig {
            canvases_file: Some(file.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let canvases = config.load_canvases().unwrap();

        assert_eq!(canvases.len(), 5);
        assert_eq!(canvases[0].name, "organic");
        assert_eq!(canvases[0].palette.len(), 1);
        assert_eq!(canvases[4].name, "salts");
        assert!(canvases[4].delete_enabled);
    }

    #[test]
    fn test_canvas_file_errors() {
        let missing = ServerConfig {
            canvases_file: Some(PathBuf::from("/nonexistent/canvases.json")),
            ..ServerConfig::default()
        };
        assert!(matches!(missing.load_canvases(), Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name":"a","title":"A"}},{{"name":"a","title":"A again"}}]"#).unwrap();
        let duplicate = ServerConfig {
            canvases_file: Some(file.path().to_path_buf()),
            ..ServerConfig::default()
        };
        assert!(matches!(duplicate.load_canvases(), Err(ConfigError::DuplicateCanvas(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let garbage = ServerConfig {
            canvases_file: Some(file.path().to_path_buf()),
            ..ServerConfig::default()
        };
        assert!(matches!(garbage.load_canvases(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_url_safe() {
        assert!(is_url_safe("free-form"));
        assert!(is_url_safe("3f2a_b"));
        assert!(!is_url_safe(""));
        assert!(!is_url_safe("a/b"));
        assert!(!is_url_safe("<script>"));
        assert!(!is_url_safe(&"x".repeat(65)));
    }
}
