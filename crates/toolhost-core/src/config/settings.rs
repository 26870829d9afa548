//! Server configuration structure
//!
//! Every section defaults to "disabled", so a missing or partial file never
//! exposes more than it names.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Environment variable consulted when the config names no gateway URL
pub const GATEWAY_URL_ENV: &str = "LM_STUDIO_URL";
/// Gateway address used when neither config nor environment name one
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:1234";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 60;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub tools: ToolsSection,
    pub resources: ResourcesSection,
    pub lm_studio: LmStudioSection,
    pub logging: LoggingSection,
    pub files: FilesSection,
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// Tool names exposed to callers
    pub enabled: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesSection {
    pub enabled: bool,
    pub base_path: String,
}

impl Default for ResourcesSection {
    fn default() -> Self {
        Self {
            enabled: false,
            base_path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LmStudioSection {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bounded per-request timeout, generous for generation latency; 0 means default
    pub timeout_secs: u64,
}

impl Default for LmStudioSection {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesSection {
    /// Directory the file tools are confined to
    pub root: String,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// 0 means default
    pub timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// The resolved subset of configuration that decides what gets exposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnablementConfig {
    pub enabled_tool_names: BTreeSet<String>,
    pub resources_enabled: bool,
    pub resource_base_path: String,
    pub inference_enabled: bool,
    pub inference_base_url: String,
}

impl Default for EnablementConfig {
    fn default() -> Self {
        ServerConfig::default().enablement_with_env(None)
    }
}

impl EnablementConfig {
    /// Enable a set of tools, leaving everything else disabled
    pub fn with_tools<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled_tool_names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl ServerConfig {
    /// Derive the enablement view, reading `LM_STUDIO_URL` from the environment
    pub fn enablement(&self) -> EnablementConfig {
        self.enablement_with_env(std::env::var(GATEWAY_URL_ENV).ok())
    }

    /// Derive the enablement view with an explicit environment override
    pub fn enablement_with_env(&self, env_url: Option<String>) -> EnablementConfig {
        EnablementConfig {
            enabled_tool_names: self.tools.enabled.clone(),
            resources_enabled: self.resources.enabled,
            resource_base_path: self.resources.base_path.clone(),
            inference_enabled: self.lm_studio.enabled,
            inference_base_url: resolve_gateway_url(self.lm_studio.base_url.as_deref(), env_url),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse_or_default(&self.logging.level)
    }

    pub fn http_timeout(&self) -> Duration {
        timeout_or_default(self.http.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS)
    }

    pub fn gateway_timeout(&self) -> Duration {
        timeout_or_default(self.lm_studio.timeout_secs, DEFAULT_GATEWAY_TIMEOUT_SECS)
    }
}

fn timeout_or_default(secs: u64, default_secs: u64) -> Duration {
    Duration::from_secs(if secs == 0 { default_secs } else { secs })
}

/// Pick the gateway URL: configured value, then environment, then the loopback default
pub fn resolve_gateway_url(configured: Option<&str>, env_url: Option<String>) -> String {
    configured
        .filter(|u| !u.trim().is_empty())
        .map(str::to_string)
        .or_else(|| env_url.filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
}
