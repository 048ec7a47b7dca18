//! Typed JSON configuration (C12).
//!
//! Mirrors every key in the configuration file. Missing keys fall back to
//! documented defaults; an empty/absent file is a first run, not an error.
//! Writes are atomic: write to a sibling temp file, then rename over the
//! target, so a crash mid-save never corrupts the existing config.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_scan_interval() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_latency_threshold() -> u64 {
    100
}
fn default_download_threshold() -> f64 {
    10.0
}
fn default_upload_threshold() -> f64 {
    5.0
}
fn default_internet_health_interval() -> u64 {
    3600
}
fn default_website_interval() -> u64 {
    300
}
fn default_security_interval() -> u64 {
    86400
}
fn default_confidence_threshold() -> f64 {
    0.5
}
fn default_max_threads() -> usize {
    10
}
fn default_fingerprint_timeout() -> u64 {
    2
}
fn default_fingerprint_scan_interval() -> u64 {
    86400
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}
fn default_web_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            scan_interval: default_scan_interval(),
            configured: false,
            debug_logging: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub subnet: String,
    #[serde(default = "default_true")]
    pub fallback_to_arp_scan: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            subnet: String::new(),
            fallback_to_arp_scan: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub new_device: bool,
    #[serde(default)]
    pub device_offline: bool,
    #[serde(default)]
    pub important_device_offline: bool,
    #[serde(default)]
    pub website_error: bool,
    #[serde(default)]
    pub suspicious_ports: bool,
    #[serde(default = "default_latency_threshold")]
    pub latency_threshold: u64,
    #[serde(default = "default_download_threshold")]
    pub download_speed_threshold: f64,
    #[serde(default = "default_upload_threshold")]
    pub upload_speed_threshold: f64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            new_device: false,
            device_offline: false,
            important_device_offline: false,
            website_error: false,
            suspicious_ports: false,
            latency_threshold: default_latency_threshold(),
            download_speed_threshold: default_download_threshold(),
            upload_speed_threshold: default_upload_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternetHealthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_internet_health_interval")]
    pub interval: u64,
}

impl Default for InternetHealthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: default_internet_health_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsitesConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default = "default_website_interval")]
    pub interval: u64,
}

impl Default for WebsitesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            urls: Vec::new(),
            interval: default_website_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_security_interval")]
    pub interval: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: default_security_interval(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub internet_health: InternetHealthConfig,
    #[serde(default)]
    pub websites: WebsitesConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
    #[serde(default = "default_fingerprint_timeout")]
    pub timeout: u64,
    #[serde(default = "default_fingerprint_scan_interval")]
    pub scan_interval: u64,
}

impl Default for FingerprintingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confidence_threshold: default_confidence_threshold(),
            max_threads: default_max_threads(),
            timeout: default_fingerprint_timeout(),
            scan_interval: default_fingerprint_scan_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebInterfaceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password_hash: String,
}

impl Default for WebInterfaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_web_host(),
            port: default_web_port(),
            username: String::new(),
            password_hash: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub fingerprinting: FingerprintingConfig,
    #[serde(default)]
    pub web_interface: WebInterfaceConfig,

    #[serde(skip)]
    path: PathBuf,
}

impl Config {
    /// Platform-appropriate default config path, `~/.config/netwatch/config.json`.
    pub fn default_path() -> PathBuf {
        let base = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Path::new(&base).join(".config").join("netwatch").join("config.json")
    }

    /// Load from `path`. A missing or empty file yields first-run defaults
    /// rather than an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            if raw.trim().is_empty() {
                Config::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Config::default()
        };
        cfg.path = path.to_path_buf();
        Ok(cfg)
    }

    /// Re-read the backing file, replacing every field in place.
    pub fn reload(&mut self) -> Result<()> {
        let reloaded = Config::load(&self.path)?;
        *self = reloaded;
        Ok(())
    }

    /// Atomically persist to the backing file: write to a temp sibling, then
    /// rename over the target.
    pub fn save(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AppError::configuration("config path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let tmp = parent.join(format!(
            ".{}.tmp",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("config.json")
        ));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Reset to first-run defaults at `path`, writing them out immediately.
    pub fn reset(path: &Path) -> Result<Self> {
        let mut cfg = Config::default();
        cfg.path = path.to_path_buf();
        cfg.general.configured = false;
        cfg.save()?;
        Ok(cfg)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.general.scan_interval, 60);
        assert!(!cfg.general.configured);
        assert_eq!(cfg.fingerprinting.confidence_threshold, 0.5);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.general.scan_interval, 60);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut cfg = Config::load(&path).unwrap();
        cfg.network.subnet = "192.168.1.0/24".to_string();
        cfg.general.configured = true;
        cfg.save().unwrap();

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.network.subnet, "192.168.1.0/24");
        assert!(reloaded.general.configured);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"network":{"subnet":"10.0.0.0/24"}}"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.network.subnet, "10.0.0.0/24");
        assert!(cfg.network.fallback_to_arp_scan);
        assert_eq!(cfg.monitoring.websites.interval, 300);
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut cfg = Config::load(&path).unwrap();
        cfg.save().unwrap();

        std::fs::write(&path, r#"{"general":{"scan_interval":120}}"#).unwrap();
        cfg.reload().unwrap();
        assert_eq!(cfg.general.scan_interval, 120);
    }

    #[test]
    fn reset_marks_unconfigured_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = Config::reset(&path).unwrap();
        assert!(!cfg.general.configured);
        assert!(path.exists());
    }
}
