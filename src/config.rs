use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Tuning knobs for one probing pass. Loaded from an optional JSON file
/// named by the `PROBE_CONFIG` env var; every field has a default, so a
/// partial file (or none at all) works.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProbeConfig {
    #[serde(default = "default_echo_count")]
    pub echo_count: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Hosts averaging above this are never recommended.
    #[serde(default = "default_threshold_ms")]
    pub threshold_ms: f64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_echo_count() -> u32 {
    10
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_threshold_ms() -> f64 {
    200.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            echo_count: default_echo_count(),
            timeout_ms: default_timeout_ms(),
            threshold_ms: default_threshold_ms(),
            log_level: default_log_level(),
        }
    }
}

impl ProbeConfig {
    /// Loads the file named by `PROBE_CONFIG`, falling back to defaults when
    /// the variable is unset.
    pub async fn load() -> Result<Self> {
        match std::env::var("PROBE_CONFIG") {
            Ok(path) => Self::load_file(&path).await,
            Err(_) => Ok(Self::default()),
        }
    }

    pub async fn load_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path));
        }
        let content = fs::read_to_string(path).await?;
        let config: ProbeConfig = serde_json::from_str(&content)?;
        config.validate_log_level()?;
        Ok(config)
    }

    /// Get the log level as a tracing::Level
    pub fn get_tracing_level(&self) -> Result<tracing::Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" | "warning" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            _ => Err(anyhow::anyhow!(
                "Invalid log level: {}. Valid levels are: trace, debug, info, warn, error",
                self.log_level
            )),
        }
    }

    pub fn validate_log_level(&self) -> Result<()> {
        self.get_tracing_level().map(|_| ())
    }
}

/// Reads the host list: one host per line, trimmed, blank lines skipped.
/// An empty final list is an error since there would be nothing to probe.
pub async fn read_host_file(path: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).await?;
    let hosts: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if hosts.is_empty() {
        return Err(anyhow::anyhow!("Host list {} contains no hosts", path));
    }
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_knobs() {
        let cfg = ProbeConfig::default();
        assert_eq!(cfg.echo_count, 10);
        assert_eq!(cfg.timeout_ms, 1000);
        assert_eq!(cfg.threshold_ms, 200.0);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: ProbeConfig = serde_json::from_str(r#"{"echo_count": 3}"#).unwrap();
        assert_eq!(cfg.echo_count, 3);
        assert_eq!(cfg.timeout_ms, 1000);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let cfg = ProbeConfig {
            log_level: "loud".to_string(),
            ..ProbeConfig::default()
        };
        assert!(cfg.validate_log_level().is_err());
    }

    #[tokio::test]
    async fn host_file_skips_blank_lines_and_trims() {
        let dir = std::env::temp_dir();
        let path = dir.join("pingpick_hosts_test.txt");
        fs::write(&path, "a.example\n\n  b.example  \n\t\n").await.unwrap();
        let hosts = read_host_file(path.to_str().unwrap()).await.unwrap();
        assert_eq!(hosts, vec!["a.example", "b.example"]);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn empty_host_file_is_an_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("pingpick_empty_hosts_test.txt");
        fs::write(&path, "\n  \n").await.unwrap();
        assert!(read_host_file(path.to_str().unwrap()).await.is_err());
        let _ = fs::remove_file(&path).await;
    }
}
