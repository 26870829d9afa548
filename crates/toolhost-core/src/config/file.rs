//! File-based configuration provider (YAML or JSON)
//!
//! Supports an explicit path, the project-level `config/mcp_config.json`
//! and the user-level `~/.config/toolhost/config.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::ServerConfig;
use crate::logging::Logger;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml` / `.yml` are YAML; everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Loads `ServerConfig` from a file
///
/// # Example
///
/// ```no_run
/// use toolhost_core::config::FileConfigProvider;
/// use toolhost_core::logging::NoOpLogger;
///
/// let provider = FileConfigProvider::new("config/mcp_config.json");
/// let config = provider.load_or_default(&NoOpLogger::new());
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    format: ConfigFormat,
}

impl FileConfigProvider {
    /// Create a provider for a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ConfigFormat::from_path(&path);
        Self { path, format }
    }

    /// Project-level config (`config/mcp_config.json`)
    pub fn project() -> Self {
        Self::new(Path::new("config").join("mcp_config.json"))
    }

    /// User-level config (~/.config/toolhost/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("toolhost").join("config.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and parse the file; any problem is an error
    pub fn load(&self) -> ConfigResult<ServerConfig> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = match self.format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Load the file, falling back to all-disabled defaults on any problem
    pub fn load_or_default(&self, logger: &dyn Logger) -> ServerConfig {
        match self.load() {
            Ok(config) => {
                crate::log_info!(logger, "[Config] Loaded configuration from {}", self.path.display());
                config
            }
            Err(ConfigError::NotFound(path)) => {
                crate::log_warn!(logger, "[Config] Config file not found: {}, using defaults", path.display());
                ServerConfig::default()
            }
            Err(e) => {
                crate::log_error!(logger, "[Config] Error loading {}: {}; using defaults", self.path.display(), e);
                ServerConfig::default()
            }
        }
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("exists", &self.exists())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger};
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/config.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("mcp_config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mcp_config.json");
        fs::write(
            &path,
            r#"{
                "tools": {"enabled": ["read_file", "lm_studio_generate"]},
                "resources": {"enabled": true, "base_path": "./data"},
                "lm_studio": {"enabled": true, "base_url": "http://localhost:1234"},
                "logging": {"level": "DEBUG"}
            }"#,
        )
        .unwrap();

        let config = FileConfigProvider::new(&path).load().unwrap();
        assert!(config.tools.enabled.contains("read_file"));
        assert!(config.tools.enabled.contains("lm_studio_generate"));
        assert!(config.resources.enabled);
        assert!(config.lm_studio.enabled);
        assert_eq!(config.lm_studio.base_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "tools:\n  enabled:\n    - write_file\nhttp:\n  timeout_secs: 5\n",
        )
        .unwrap();

        let provider = FileConfigProvider::new(&path);
        assert_eq!(provider.format(), ConfigFormat::Yaml);

        let config = provider.load().unwrap();
        assert!(config.tools.enabled.contains("write_file"));
        assert_eq!(config.http.timeout_secs, 5);
        assert!(!config.lm_studio.enabled);
    }

    #[test]
    fn test_missing_file_is_fail_closed() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("absent.json"));
        let logger = MemoryLogger::new();

        assert!(matches!(provider.load(), Err(ConfigError::NotFound(_))));

        let config = provider.load_or_default(&logger);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(logger.messages_at(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn test_malformed_file_is_fail_closed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mcp_config.json");
        fs::write(&path, "{ not json").unwrap();
        let logger = MemoryLogger::new();

        let provider = FileConfigProvider::new(&path);
        assert!(matches!(provider.load(), Err(ConfigError::Json(_))));

        let config = provider.load_or_default(&logger);
        assert!(config.tools.enabled.is_empty());
        assert!(!config.resources.enabled);
        assert_eq!(logger.messages_at(LogLevel::Error).len(), 1);
    }

    #[test]
    fn test_user_path() {
        let provider = FileConfigProvider::user();
        assert!(provider.path().ends_with("toolhost/config.yaml"));
    }
}
