//! Configuration management for fix-review
//!
//! Stores settings in ~/.config/fix-review/config.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Where the backend listens unless told otherwise
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9026/";

/// Environment override for the endpoint
pub const ENDPOINT_ENV: &str = "FIX_REVIEW_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    pub endpoint: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// How long to wait for the close request when the surface goes away
    pub close_grace_ms: u64,
    /// Log filter directive (e.g. "debug", "fix_review=trace")
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 10,
            close_grace_ms: 1500,
            log_filter: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fix-review"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path. A file that doesn't parse is moved aside
    /// and defaults are used.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(err) => {
                    preserve_corrupt_config(path, &content);
                    eprintln!(
                        "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                        err
                    );
                }
            }
        }
        Self::default()
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)) {
                eprintln!("  Warning: Failed to set config directory permissions: {}", e);
            }
        }

        self.save_to(&dir.join("config.json"))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        #[cfg(unix)]
        {
            write_config_atomic(path, &content)
                .map_err(|e| format!("Failed to write config: {}", e))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;
        }

        Ok(())
    }

    /// Validate and store a new endpoint
    pub fn set_endpoint(&mut self, raw: &str) -> Result<(), String> {
        let url = parse_endpoint(raw)?;
        self.endpoint = url.to_string();
        Ok(())
    }

    /// Pick the endpoint: flag, then environment, then config
    pub fn resolve_endpoint(&self, flag: Option<&str>, env: Option<&str>) -> Result<Url, String> {
        let raw = flag
            .or(env.filter(|v| !v.trim().is_empty()))
            .unwrap_or(&self.endpoint);
        parse_endpoint(raw)
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/fix-review/config.json".to_string())
    }
}

/// Parse an endpoint URL; only http(s) is accepted
pub fn parse_endpoint(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("Invalid endpoint '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!(
            "Invalid endpoint '{}': unsupported scheme '{}'",
            raw, other
        )),
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

#[cfg(unix)]
fn write_config_atomic(path: &Path, content: &str) -> Result<(), String> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::PermissionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| e.to_string())?;

    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        eprintln!("  Warning: Failed to set temp config file permissions: {}", e);
    }

    file.write_all(content.as_bytes())
        .map_err(|e| e.to_string())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.close_grace_ms, 1500);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"endpoint":"http://h:1/"}"#).unwrap();
        assert_eq!(config.endpoint, "http://h:1/");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.set_endpoint("http://review.local:8080/").unwrap();
        config.log_filter = Some("debug".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
        assert!(!path.with_extension("tmp").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_corrupt_file_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(path.with_extension("json.corrupt")).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_endpoint_precedence() {
        let mut config = Config::default();
        config.endpoint = "http://from-config:1/".to_string();

        let url = config
            .resolve_endpoint(Some("http://from-flag:2/"), Some("http://from-env:3/"))
            .unwrap();
        assert_eq!(url.host_str(), Some("from-flag"));

        let url = config.resolve_endpoint(None, Some("http://from-env:3/")).unwrap();
        assert_eq!(url.host_str(), Some("from-env"));

        let url = config.resolve_endpoint(None, Some("  ")).unwrap();
        assert_eq!(url.host_str(), Some("from-config"));
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(parse_endpoint("localhost:9026").is_err());
        assert!(parse_endpoint("ftp://host/").is_err());
        assert!(parse_endpoint("not a url").is_err());
        assert_eq!(
            parse_endpoint(" http://localhost:9026 ").unwrap().as_str(),
            "http://localhost:9026/"
        );
        let mut config = Config::default();
        assert!(config.set_endpoint("nope").is_err());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }
}
