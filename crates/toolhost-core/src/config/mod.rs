//! Configuration loading
//!
//! - `ServerConfig`: the on-disk structure (tools, resources, lm_studio, logging, files, http)
//! - `EnablementConfig`: the resolved view the capability registry owns
//! - `FileConfigProvider`: YAML/JSON file loading, fail-closed on request

mod file;
mod settings;

pub use file::{ConfigError, ConfigFormat, ConfigResult, FileConfigProvider};
pub use settings::{
    resolve_gateway_url, EnablementConfig, FilesSection, HttpSection, LmStudioSection,
    LoggingSection, ResourcesSection, ServerConfig, ToolsSection, DEFAULT_GATEWAY_TIMEOUT_SECS,
    DEFAULT_GATEWAY_URL, DEFAULT_HTTP_TIMEOUT_SECS, GATEWAY_URL_ENV,
};
