//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Every key is optional; omitted keys take the built-in defaults.

use crate::services::NOTIFICATION_TTL;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TRACKING_URL: &str = "http://fparcel.net:59/WebServiceExterne/tracking_position_STG";
const DEFAULT_COMPLAINT_URL: &str = "http://fparcel.net:59/WebServiceExterne/add_reclamation_STG";

#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySection {
    #[serde(default = "default_tracking_url")]
    pub tracking_url: String,
    #[serde(default = "default_complaint_url")]
    pub complaint_url: String,
    /// Request timeout in milliseconds (0 keeps the transport default)
    #[serde(default)]
    pub timeout_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            tracking_url: default_tracking_url(),
            complaint_url: default_complaint_url(),
            timeout_ms: 0,
        }
    }
}

fn default_tracking_url() -> String {
    DEFAULT_TRACKING_URL.to_string()
}

fn default_complaint_url() -> String {
    DEFAULT_COMPLAINT_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiSection {
    /// How long a notification stays on screen
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
    /// Redraw/input poll interval
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiSection {
    fn default() -> Self {
        Self { notification_ms: default_notification_ms(), tick_ms: default_tick_ms() }
    }
}

fn default_notification_ms() -> u64 {
    NOTIFICATION_TTL.as_millis() as u64
}

fn default_tick_ms() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log file for the TUI (stdout belongs to the terminal UI)
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    /// Emit JSON lines instead of the compact text format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { file: default_log_file(), json: false }
    }
}

fn default_log_file() -> Option<String> {
    Some("reclamation-form.log".to_string())
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub gateway: GatewaySection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Endpoints injected into the HTTP gateway at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub tracking_url: String,
    pub complaint_url: String,
    pub timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            tracking_url: default_tracking_url(),
            complaint_url: default_complaint_url(),
            timeout: None,
        }
    }
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    tracking_url: String,
    complaint_url: String,
    gateway_timeout_ms: u64,
    notification_ms: u64,
    tick_ms: u64,
    log_file: Option<String>,
    log_json: bool,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracking_url: default_tracking_url(),
            complaint_url: default_complaint_url(),
            gateway_timeout_ms: 0,
            notification_ms: default_notification_ms(),
            tick_ms: default_tick_ms(),
            log_file: default_log_file(),
            log_json: false,
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            tracking_url: toml_config.gateway.tracking_url,
            complaint_url: toml_config.gateway.complaint_url,
            gateway_timeout_ms: toml_config.gateway.timeout_ms,
            notification_ms: toml_config.ui.notification_ms,
            tick_ms: toml_config.ui.tick_ms,
            log_file: toml_config.logging.file.filter(|f| !f.is_empty()),
            log_json: toml_config.logging.json,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load(args: &[String]) -> Self {
        Self::load_from_path(&Self::resolve_config_path(args))
    }

    /// Load from an explicit path, falling back to defaults on any error
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            tracking_url: self.tracking_url.clone(),
            complaint_url: self.complaint_url.clone(),
            timeout: (self.gateway_timeout_ms > 0)
                .then(|| Duration::from_millis(self.gateway_timeout_ms)),
        }
    }

    pub fn tracking_url(&self) -> &str {
        &self.tracking_url
    }

    pub fn complaint_url(&self) -> &str {
        &self.complaint_url
    }

    pub fn gateway_timeout_ms(&self) -> u64 {
        self.gateway_timeout_ms
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref()
    }

    pub fn log_json(&self) -> bool {
        self.log_json
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Point both endpoints at a local base URL (mock gateway, tests)
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.tracking_url = format!("{}/WebServiceExterne/tracking_position_STG", base);
        self.complaint_url = format!("{}/WebServiceExterne/add_reclamation_STG", base);
        self
    }
}
