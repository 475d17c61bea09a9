//! Application configuration.
//!
//! These are the fixed parameters of an analysis run. They live in a
//! single JSON file and every field has a default, so a missing file is
//! never an error for [`AppConfig::load`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DnacomError, DnacomResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where rendered artifacts are written when no output
    /// path is given on the command line.
    pub output_dir: PathBuf,

    /// Analysis and rendering parameters.
    pub analysis: AnalysisDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters for the analysis and rendering stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Binning rule for the velocity histograms.
    pub histogram_bins: BinRule,

    /// Color written over the centroid pixel in the overlay video.
    pub highlight_rgb: [u8; 3],

    /// Delay between frames of the looping video, in milliseconds.
    pub frame_delay_ms: u32,

    /// Container for the looping video.
    pub video_format: VideoFormat,
}

/// How a histogram partitions its observed range into bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BinRule {
    /// Exactly `bins` equal-width bins.
    Fixed { bins: usize },

    /// `ceil(log2(n) + 1)` bins.
    Sturges,

    /// The narrower of the Sturges and Freedman-Diaconis bin widths.
    /// Falls back to Sturges when the interquartile range is zero.
    #[default]
    Auto,
}

/// Output container for the looping video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoFormat {
    /// Animated GIF set to repeat forever.
    #[default]
    Gif,
    /// Directory of numbered PNG frames.
    PngSequence,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "dnacom=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dnacom-output"),
            analysis: AnalysisDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            histogram_bins: BinRule::Auto,
            highlight_rgb: [255, 0, 0],
            frame_delay_ms: 50,
            video_format: VideoFormat::Gif,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl std::str::FromStr for BinRule {
    type Err = DnacomError;

    /// Parse `auto`, `sturges` or a positive bin count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "sturges" => Ok(Self::Sturges),
            other => match other.parse::<usize>() {
                Ok(0) => Err(DnacomError::config("histogram bin count must be at least 1")),
                Ok(bins) => Ok(Self::Fixed { bins }),
                Err(_) => Err(DnacomError::config(format!(
                    "unknown bin rule '{s}', expected 'auto', 'sturges' or a count"
                ))),
            },
        }
    }
}

impl VideoFormat {
    /// File name used for the video artifact inside an output directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Gif => "overlay.gif",
            Self::PngSequence => "overlay_frames",
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], any
    /// problem with the file is an error.
    pub fn load_from(path: impl AsRef<Path>) -> DnacomResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DnacomError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| DnacomError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Standard config file location.
    pub fn default_path() -> PathBuf {
        config_file_path()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject parameter combinations the renderer cannot honor.
    pub fn validate(&self) -> DnacomResult<()> {
        if let BinRule::Fixed { bins: 0 } = self.analysis.histogram_bins {
            return Err(DnacomError::config("histogram bin count must be at least 1"));
        }
        if self.analysis.frame_delay_ms == 0 {
            return Err(DnacomError::config("frame delay must be at least 1 ms"));
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("dnacom").join("config.json")
}
