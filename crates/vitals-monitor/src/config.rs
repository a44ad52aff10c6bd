//! Configuration parsing for the vitals monitor
//!
//! This module provides TOML-based configuration for the report cadence,
//! report format, and the page context stamped onto exports.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::reporter::OutputFormat;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Monitor behaviour
    #[serde(default)]
    pub monitor: MonitorSettings,
    /// Page the monitor is attached to
    #[serde(default)]
    pub page: PageContext,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A value is out of range (e.g. a zero report interval)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vitals_monitor::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("vitals.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use vitals_monitor::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [page]
    ///     url = "https://shop.example.com/"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.monitor.report_interval_ms, 5000);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.monitor.report_interval_ms == 0 {
            anyhow::bail!("monitor.report_interval_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Monitor behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Period between snapshot reports in milliseconds (default: 5000)
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
    /// Whether to print reports on a timer (default: true)
    #[serde(default = "default_periodic_reports")]
    pub periodic_reports: bool,
    /// Format of printed reports (default: console)
    #[serde(default)]
    pub report_format: OutputFormat,
}

impl MonitorSettings {
    /// Report period, or `None` when periodic reports are disabled
    pub fn report_interval(&self) -> Option<Duration> {
        self.periodic_reports
            .then(|| Duration::from_millis(self.report_interval_ms))
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            report_interval_ms: default_report_interval_ms(),
            periodic_reports: default_periodic_reports(),
            report_format: OutputFormat::default(),
        }
    }
}

fn default_report_interval_ms() -> u64 {
    5000
}

fn default_periodic_reports() -> bool {
    true
}

/// Page context attached to every export bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    /// URL of the monitored page
    #[serde(default = "default_url")]
    pub url: String,
    /// User-agent string of the reporting client
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl PageContext {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl Default for PageContext {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_url() -> String {
    "about:blank".to_string()
}

fn default_user_agent() -> String {
    format!("vitals-monitor/{}", env!("CARGO_PKG_VERSION"))
}
