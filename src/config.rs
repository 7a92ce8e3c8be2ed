//! Session configuration files.
//!
//! A session file captures everything needed to regenerate an image: the
//! equation or built-in, seed, resolution, mode and contrast settings. Split
//! files hold one such panel per side. Files are JSON, or YAML when the
//! extension is `.yaml`/`.yml`. Missing fields take their defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "equation": "x ^ (x ROL 13)",
//!   "seed": 12345,
//!   "resolution": 512,
//!   "mode": "bit",
//!   "bitIndex": 7
//! }
//! ```

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::types::{
    BuiltIn, ContrastConfig, GenerationRequest, Mode, PairScale, Resolution, DEFAULT_EQUATION,
    DEFAULT_SEED,
};

/// Settings for one generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelConfig {
    pub equation: String,
    pub seed: u32,
    pub resolution: Resolution,
    pub mode: Mode,
    pub bit_index: u8,
    /// Wire name of the selected built-in, empty for a custom equation.
    pub built_in_generator: String,
    pub contrast_stretch: ContrastConfig,
    pub pair_scale: PairScale,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            equation: DEFAULT_EQUATION.to_string(),
            seed: DEFAULT_SEED,
            resolution: Resolution::default(),
            mode: Mode::default(),
            bit_index: 0,
            built_in_generator: String::new(),
            contrast_stretch: ContrastConfig::default(),
            pair_scale: PairScale::default(),
        }
    }
}

impl PanelConfig {
    /// Build the request this panel describes.
    pub fn to_request(&self) -> Result<GenerationRequest> {
        let mut request = GenerationRequest::new(self.equation.clone())
            .with_seed(self.seed)
            .with_resolution(self.resolution)
            .with_mode(self.mode)
            .with_contrast(self.contrast_stretch)
            .with_pair_scale(self.pair_scale);
        request.bit_plane_index = self.bit_index;

        if !self.built_in_generator.is_empty() {
            let builtin: BuiltIn = self.built_in_generator.parse()?;
            request = request.with_built_in(builtin);
        }

        request.validate()?;
        Ok(request)
    }

    /// Capture a request as a panel.
    pub fn from_request(request: &GenerationRequest) -> Self {
        let built_in_generator = if request.use_built_in {
            request.built_in_type.clone()
        } else {
            String::new()
        };

        Self {
            equation: request.equation.clone(),
            seed: request.seed,
            resolution: request.resolution,
            mode: request.mode,
            bit_index: request.bit_plane_index,
            built_in_generator,
            contrast_stretch: request.contrast_stretch,
            pair_scale: request.pair_scale,
        }
    }
}

/// A single-view session file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(flatten)]
    pub panel: PanelConfig,
    /// Export time; informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SessionConfig {
    pub fn new(panel: PanelConfig) -> Self {
        Self {
            panel,
            timestamp: Some(export_timestamp()),
        }
    }

    /// Load a session from a JSON or YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        load_file(path)
    }

    /// Parse a session from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        parse_json(content)
    }

    /// Write the session as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(self, path)
    }
}

/// A split-view session file: one panel per side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitConfig {
    pub left_panel: PanelConfig,
    pub right_panel: PanelConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SplitConfig {
    pub fn new(left_panel: PanelConfig, right_panel: PanelConfig) -> Self {
        Self {
            left_panel,
            right_panel,
            timestamp: Some(export_timestamp()),
        }
    }

    /// Load a split session from a JSON or YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        load_file(path)
    }

    /// Parse a split session from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        parse_json(content)
    }

    /// Write the split session as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(self, path)
    }
}

/// Seconds since the Unix epoch, as a string.
fn export_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default()
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| VizError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read config: {}", e),
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| VizError::Config {
            message: format!("Invalid config {}: {}", path.display(), e),
            help: Some("Check YAML syntax".to_string()),
        })
    } else {
        parse_json(&content)
    }
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| VizError::Config {
        message: format!("Invalid config: {}", e),
        help: Some("Check JSON syntax".to_string()),
    })
}

fn save_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| VizError::Config {
        message: format!("Failed to serialize config: {}", e),
        help: None,
    })?;

    std::fs::write(path, content + "\n").map_err(|e| VizError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write config: {}", e),
    })
}
