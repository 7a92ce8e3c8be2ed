//! Generation requests: what to generate and how to draw it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::parser::compile;

use super::generator::{BuiltIn, Generator};

/// Equation used when nothing else is configured.
pub const DEFAULT_EQUATION: &str = "x ^ (x << 13)";

/// Seed used when nothing else is configured.
pub const DEFAULT_SEED: u32 = 12345;

/// Side length of the square output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Resolution {
    #[default]
    R256,
    R512,
    R1024,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::R256, Resolution::R512, Resolution::R1024];

    /// Side length in pixels.
    pub fn side(self) -> u32 {
        match self {
            Resolution::R256 => 256,
            Resolution::R512 => 512,
            Resolution::R1024 => 1024,
        }
    }

    /// Number of pixels (and generator steps) in one image.
    pub fn total_pixels(self) -> usize {
        let side = self.side() as usize;
        side * side
    }
}

impl TryFrom<u32> for Resolution {
    type Error = VizError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            256 => Ok(Resolution::R256),
            512 => Ok(Resolution::R512),
            1024 => Ok(Resolution::R1024),
            _ => Err(VizError::config(
                format!("Unsupported resolution: {}", value),
                Some("Use 256, 512, or 1024".to_string()),
            )),
        }
    }
}

impl From<Resolution> for u32 {
    fn from(resolution: Resolution) -> Self {
        resolution.side()
    }
}

impl FromStr for Resolution {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s.trim().parse().map_err(|_| {
            VizError::config(
                format!("Invalid resolution: '{}'", s),
                Some("Use 256, 512, or 1024".to_string()),
            )
        })?;
        Resolution::try_from(value)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.side(), self.side())
    }
}

/// How generated values are turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Value scaled to luminance.
    #[default]
    Raw,
    /// One isolated bit per pixel.
    #[serde(rename = "bit")]
    BitPlane,
    /// Population count scaled to luminance.
    Hamming,
    /// Density map of successive (previous, next) pairs.
    Pair,
    /// XOR of successive values scaled to luminance.
    Transition,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Raw,
        Mode::BitPlane,
        Mode::Hamming,
        Mode::Pair,
        Mode::Transition,
    ];

    /// Wire name (`raw`, `bit`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Mode::Raw => "raw",
            Mode::BitPlane => "bit",
            Mode::Hamming => "hamming",
            Mode::Pair => "pair",
            Mode::Transition => "transition",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Raw => "Raw Value",
            Mode::BitPlane => "Bit Plane",
            Mode::Hamming => "Hamming Weight",
            Mode::Pair => "Successive Pair",
            Mode::Transition => "Transition",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::Raw => "Each value scaled to a grey level; structure shows as bands or gradients",
            Mode::BitPlane => "One bit position per pixel; stuck or periodic bits show as stripes",
            Mode::Hamming => "Number of set bits per value; should look like uniform mid-grey noise",
            Mode::Pair => "Density of (previous, next) pairs; lattices reveal correlated outputs",
            Mode::Transition => "XOR of successive values; shows which bits flip between steps",
        }
    }
}

impl FromStr for Mode {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Mode::Raw),
            "bit" | "bitplane" | "bit-plane" => Ok(Mode::BitPlane),
            "hamming" => Ok(Mode::Hamming),
            "pair" => Ok(Mode::Pair),
            "transition" => Ok(Mode::Transition),
            _ => Err(VizError::config(
                format!("Unknown mode: '{}'", s),
                Some("Available modes: raw, bit, hamming, pair, transition".to_string()),
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Normalization of the Pair-mode density map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairScale {
    /// `ln(hits + 1) / ln(max + 1)`; keeps sparse clusters visible.
    #[default]
    Log,
    /// `hits / max`.
    Linear,
}

impl FromStr for PairScale {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(PairScale::Log),
            "linear" => Ok(PairScale::Linear),
            _ => Err(VizError::config(
                format!("Unknown pair scale: '{}'", s),
                Some("Use 'log' or 'linear'".to_string()),
            )),
        }
    }
}

/// Contrast-stretch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    pub enabled: bool,
    /// Use the observed grey range instead of `min`/`max`.
    pub auto: bool,
    pub min: u8,
    pub max: u8,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auto: true,
            min: 0,
            max: 255,
        }
    }
}

impl ContrastConfig {
    /// Enabled, using the observed range.
    pub fn auto() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Enabled, using a fixed range.
    pub fn manual(min: u8, max: u8) -> Self {
        Self {
            enabled: true,
            auto: false,
            min,
            max,
        }
    }
}

/// A request for one generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub equation: String,
    pub seed: u32,
    pub resolution: Resolution,
    pub mode: Mode,
    /// Bit isolated in BitPlane mode (0..=31).
    pub bit_plane_index: u8,
    pub contrast_stretch: ContrastConfig,
    pub use_built_in: bool,
    /// Wire name of the built-in; empty when none is selected.
    #[serde(default)]
    pub built_in_type: String,
    #[serde(default)]
    pub pair_scale: PairScale,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::new(DEFAULT_EQUATION)
    }
}

impl GenerationRequest {
    /// Create a request for a custom equation with default settings.
    pub fn new(equation: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
            seed: DEFAULT_SEED,
            resolution: Resolution::default(),
            mode: Mode::default(),
            bit_plane_index: 0,
            contrast_stretch: ContrastConfig::default(),
            use_built_in: false,
            built_in_type: String::new(),
            pair_scale: PairScale::default(),
        }
    }

    /// Create a request for a built-in generator.
    pub fn built_in(builtin: BuiltIn) -> Self {
        Self::new("").with_built_in(builtin)
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_bit_plane(mut self, index: u8) -> Self {
        self.mode = Mode::BitPlane;
        self.bit_plane_index = index;
        self
    }

    pub fn with_contrast(mut self, contrast: ContrastConfig) -> Self {
        self.contrast_stretch = contrast;
        self
    }

    pub fn with_pair_scale(mut self, scale: PairScale) -> Self {
        self.pair_scale = scale;
        self
    }

    pub fn with_built_in(mut self, builtin: BuiltIn) -> Self {
        self.use_built_in = true;
        self.built_in_type = builtin.id().to_string();
        self
    }

    /// Check settings that do not involve the equation.
    pub fn validate(&self) -> Result<()> {
        if self.bit_plane_index > 31 {
            return Err(VizError::config(
                format!("Bit plane index out of range: {}", self.bit_plane_index),
                Some("Bit planes are numbered 0 to 31".to_string()),
            ));
        }
        Ok(())
    }

    /// Resolve the built-in or compile the equation.
    ///
    /// All user-facing errors surface here, before any pixel is produced.
    pub fn generator(&self) -> Result<Generator> {
        self.validate()?;

        if self.use_built_in && !self.built_in_type.is_empty() {
            let builtin: BuiltIn = self.built_in_type.parse()?;
            return Ok(Generator::BuiltIn(builtin));
        }

        Ok(Generator::Custom(compile(&self.equation)?))
    }

    /// Short human-readable name of the generator source.
    pub fn source_label(&self) -> String {
        if self.use_built_in && !self.built_in_type.is_empty() {
            format!("built-in {}", self.built_in_type)
        } else {
            self.equation.trim().to_string()
        }
    }
}
