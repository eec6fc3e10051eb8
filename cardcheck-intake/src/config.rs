//! Configuration for cardcheck-intake
//!
//! Settings resolve in priority order: command-line arguments and
//! `CARDCHECK_*` environment variables first, then an optional TOML file,
//! then built-in defaults. Everything is fixed at startup; there is no
//! runtime reconfiguration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WEB_ROOT: &str = "web";
const DEFAULT_OCR_LANG: &str = "eng";
/// Combined ceiling for the two encoded card images.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;
const DEFAULT_BOOKING_URL: &str = "https://ai.henigan.io/picture";
const DEFAULT_SELFPAY_URL: &str =
    "https://www.albertplasticsurgery.com/patient-resources/financing/";

/// Command-line arguments for cardcheck-intake
#[derive(Parser, Debug, Default)]
#[command(name = "cardcheck-intake")]
#[command(about = "Insurance card intake and plan eligibility service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CARDCHECK_PORT")]
    port: Option<u16>,

    /// Directory containing the upload UI assets
    #[arg(short, long, env = "CARDCHECK_WEB_ROOT")]
    web_root: Option<PathBuf>,

    /// Tesseract language(s), e.g. "eng" or "eng+spa"
    #[arg(long, env = "CARDCHECK_OCR_LANG")]
    ocr_lang: Option<String>,

    /// Override for the Tesseract language data directory
    #[arg(long, env = "CARDCHECK_TESSDATA_DIR")]
    tessdata_dir: Option<PathBuf>,

    /// Booking destination for eligible plans
    #[arg(long, env = "CARDCHECK_BOOKING_URL")]
    booking_url: Option<String>,

    /// Self-pay destination for ineligible plans
    #[arg(long, env = "CARDCHECK_SELFPAY_URL")]
    selfpay_url: Option<String>,

    /// Maximum accepted submission body size in bytes
    #[arg(long, env = "CARDCHECK_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Optional TOML configuration file
    #[arg(short, long, env = "CARDCHECK_CONFIG")]
    config: Option<PathBuf>,
}

/// Optional TOML configuration file contents
///
/// Every field is optional; anything absent falls through to the built-in
/// default, and command-line values win over the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub web_root: Option<PathBuf>,
    #[serde(default)]
    pub ocr_lang: Option<String>,
    #[serde(default)]
    pub tessdata_dir: Option<PathBuf>,
    #[serde(default)]
    pub booking_url: Option<String>,
    #[serde(default)]
    pub selfpay_url: Option<String>,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,

    /// Directory the static UI is served from
    pub web_root: PathBuf,

    /// Tesseract language(s)
    pub ocr_lang: String,

    /// Tesseract language data directory override
    pub tessdata_dir: Option<PathBuf>,

    /// Redirect destination for eligible plans
    pub booking_url: String,

    /// Redirect destination for ineligible plans
    pub selfpay_url: String,

    /// Combined submission body ceiling in bytes
    pub max_upload_bytes: usize,
}

impl Config {
    /// Resolve configuration from parsed arguments
    ///
    /// Reads the TOML file when one is named; a missing or unparseable file
    /// is a startup error, not a silent fallback.
    pub async fn load(args: Args) -> Result<Self> {
        let toml_config = match &args.config {
            Some(path) => {
                let toml_str = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                let parsed: TomlConfig = toml::from_str(&toml_str)
                    .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;
                info!("Loaded TOML configuration from {}", path.display());
                parsed
            }
            None => TomlConfig::default(),
        };

        Ok(Self::merge(args, toml_config))
    }

    fn merge(args: Args, toml: TomlConfig) -> Self {
        Self {
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            web_root: args
                .web_root
                .or(toml.web_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WEB_ROOT)),
            ocr_lang: args
                .ocr_lang
                .or(toml.ocr_lang)
                .unwrap_or_else(|| DEFAULT_OCR_LANG.to_string()),
            tessdata_dir: args.tessdata_dir.or(toml.tessdata_dir),
            booking_url: args
                .booking_url
                .or(toml.booking_url)
                .unwrap_or_else(|| DEFAULT_BOOKING_URL.to_string()),
            selfpay_url: args
                .selfpay_url
                .or(toml.selfpay_url)
                .unwrap_or_else(|| DEFAULT_SELFPAY_URL.to_string()),
            max_upload_bytes: args
                .max_upload_bytes
                .or(toml.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::merge(Args::default(), TomlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_setting() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.web_root, PathBuf::from("web"));
        assert_eq!(config.ocr_lang, "eng");
        assert_eq!(config.max_upload_bytes, 15 * 1024 * 1024);
        assert!(config.tessdata_dir.is_none());
        assert!(config.booking_url.starts_with("https://"));
        assert!(config.selfpay_url.starts_with("https://"));
    }

    #[test]
    fn cli_values_win_over_toml() {
        let args = Args {
            port: Some(8080),
            ..Args::default()
        };
        let toml = TomlConfig {
            port: Some(4000),
            ocr_lang: Some("eng+spa".to_string()),
            ..TomlConfig::default()
        };

        let config = Config::merge(args, toml);
        assert_eq!(config.port, 8080);
        assert_eq!(config.ocr_lang, "eng+spa");
    }

    #[test]
    fn toml_file_shape_parses() {
        let parsed: TomlConfig =
            toml::from_str("port = 5000\nweb_root = \"ui\"\nmax_upload_bytes = 1048576\n")
                .unwrap();
        assert_eq!(parsed.port, Some(5000));
        assert_eq!(parsed.web_root, Some(PathBuf::from("ui")));
        assert_eq!(parsed.max_upload_bytes, Some(1048576));
        assert_eq!(parsed.booking_url, None);
    }
}
