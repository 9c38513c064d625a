use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Canonical reference locations (optional `[canonical]` section in config.toml).
///
/// Defaults point at the libraries' own published sources; override to use a
/// mirror or a local fixture server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalConfig {
    /// Root of tagged jQuery releases; `<version>/dist/jquery[.min].js` is appended.
    pub jquery_root: String,
    /// Fixed reference for the WordPress-bundled jQuery build.
    pub wordpress_jquery_url: String,
    /// Root of tagged WooCommerce releases; `<version>/<asset path>` is appended.
    pub woocommerce_root: String,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            jquery_root: "https://raw.githubusercontent.com/jquery/jquery/".to_string(),
            wordpress_jquery_url:
                "https://raw.githubusercontent.com/WordPress/WordPress/5.3/wp-includes/js/jquery/jquery.js"
                    .to_string(),
            woocommerce_root: "https://raw.githubusercontent.com/woocommerce/woocommerce/"
                .to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/scriptinel/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of sites scanned concurrently.
    pub workers: usize,
    /// Delay after each asset comparison on a site, in milliseconds.
    pub pacing_ms: u64,
    /// TCP/TLS connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Transfer timeout per request once connected, in seconds.
    pub read_timeout_secs: u64,
    /// Responses larger than this are aborted.
    pub max_body_bytes: u64,
    /// Value of the `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Normalized length difference (exclusive) still accepted as a match.
    pub length_tolerance: usize,
    /// Capacity of the result queue between comparisons and the output writer.
    pub sink_capacity: usize,
    /// Optional canonical source overrides; if missing, upstream defaults are used.
    #[serde(default)]
    pub canonical: Option<CanonicalConfig>,
    /// Additional fragments stripped verbatim before normalization.
    #[serde(default)]
    pub extra_benign_artifacts: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 16,
            pacing_ms: 100,
            connect_timeout_secs: 7,
            read_timeout_secs: 15,
            max_body_bytes: 8 * 1024 * 1024,
            user_agent: "scriptinel.com".to_string(),
            length_tolerance: 10,
            sink_capacity: 1024,
            canonical: None,
            extra_benign_artifacts: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Canonical locations, falling back to the upstream defaults.
    pub fn canonical_or_default(&self) -> CanonicalConfig {
        self.canonical.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("scriptinel")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScanConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ScanConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path. Missing file is an error.
pub fn load_from_path(path: &Path) -> Result<ScanConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ScanConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.workers, 16);
        assert_eq!(cfg.pacing_ms, 100);
        assert_eq!(cfg.connect_timeout_secs, 7);
        assert_eq!(cfg.read_timeout_secs, 15);
        assert_eq!(cfg.length_tolerance, 10);
        assert_eq!(cfg.user_agent, "scriptinel.com");
        assert!(cfg.canonical.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ScanConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ScanConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.workers, cfg.workers);
        assert_eq!(parsed.pacing_ms, cfg.pacing_ms);
        assert_eq!(parsed.max_body_bytes, cfg.max_body_bytes);
        assert_eq!(parsed.sink_capacity, cfg.sink_capacity);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            workers = 4
            pacing_ms = 0
            connect_timeout_secs = 2
            read_timeout_secs = 5
            max_body_bytes = 65536
            user_agent = "test-agent"
            length_tolerance = 3
            sink_capacity = 8
        "#;
        let cfg: ScanConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.pacing(), Duration::ZERO);
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(2));
        assert_eq!(cfg.length_tolerance, 3);
        assert!(cfg.canonical.is_none());
        assert!(cfg.extra_benign_artifacts.is_empty());
        assert_eq!(cfg.canonical_or_default(), CanonicalConfig::default());
    }

    #[test]
    fn config_toml_canonical_overrides() {
        let toml = r#"
            workers = 4
            pacing_ms = 0
            connect_timeout_secs = 2
            read_timeout_secs = 5
            max_body_bytes = 65536
            user_agent = "test-agent"
            length_tolerance = 10
            sink_capacity = 8
            extra_benign_artifacts = ["/* cdn */"]

            [canonical]
            jquery_root = "http://127.0.0.1:9000/jquery/"
            wordpress_jquery_url = "http://127.0.0.1:9000/wp/jquery.js"
            woocommerce_root = "http://127.0.0.1:9000/woo/"
        "#;
        let cfg: ScanConfig = toml::from_str(toml).unwrap();
        let canonical = cfg.canonical_or_default();
        assert_eq!(canonical.jquery_root, "http://127.0.0.1:9000/jquery/");
        assert_eq!(canonical.woocommerce_root, "http://127.0.0.1:9000/woo/");
        assert_eq!(cfg.extra_benign_artifacts, vec!["/* cdn */".to_string()]);
    }

    #[test]
    fn load_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.toml"));
    }
}
