pub mod check;
pub mod completions;
pub mod presets;
pub mod render;
pub mod split;

use clap::{Args, Parser, Subcommand};
use rand::Rng;

use crate::config::PanelConfig;
use crate::error::Result;
use crate::types::{ContrastConfig, Mode, PairScale, Resolution};

/// bitviz - Visualize 32-bit feedback generators
#[derive(Parser, Debug)]
#[command(name = "bitviz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an image from an equation or built-in generator
    Render(render::RenderArgs),

    /// Generate two images side by side in parallel
    Split(split::SplitArgs),

    /// Compile an equation and show its postfix form
    Check(check::CheckArgs),

    /// List presets, built-in generators and modes
    Presets(presets::PresetsArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Generation settings shared by commands. Unset options keep the
/// configured (or default) value.
#[derive(Args, Debug, Default, Clone)]
pub struct GenOptions {
    /// Seed value (initial x)
    #[arg(long)]
    pub seed: Option<u32>,

    /// Draw a random seed and print it
    #[arg(long, conflicts_with = "seed")]
    pub random_seed: bool,

    /// Image size: 256, 512 or 1024
    #[arg(long, short)]
    pub resolution: Option<Resolution>,

    /// Visualization: raw, bit, hamming, pair, transition
    #[arg(long, short)]
    pub mode: Option<Mode>,

    /// Bit plane shown in bit mode (0-31); implies --mode bit
    #[arg(long)]
    pub bit: Option<u8>,

    /// Stretch the observed grey range to full contrast
    #[arg(long)]
    pub contrast: bool,

    /// Lower bound of a fixed contrast range
    #[arg(long)]
    pub manual_min: Option<u8>,

    /// Upper bound of a fixed contrast range
    #[arg(long)]
    pub manual_max: Option<u8>,

    /// Pair-mode density scale: log or linear
    #[arg(long)]
    pub pair_scale: Option<PairScale>,
}

impl GenOptions {
    /// Turn `--random-seed` into a concrete seed, returning the one drawn.
    pub fn roll_seed(&mut self) -> Option<u32> {
        if !self.random_seed {
            return None;
        }
        let seed = rand::thread_rng().gen();
        self.seed = Some(seed);
        self.random_seed = false;
        Some(seed)
    }

    /// Apply the options that were given on top of `panel`.
    pub fn apply(&self, panel: &mut PanelConfig) {
        if let Some(seed) = self.seed {
            panel.seed = seed;
        }
        if let Some(resolution) = self.resolution {
            panel.resolution = resolution;
        }
        if let Some(mode) = self.mode {
            panel.mode = mode;
        }
        if let Some(bit) = self.bit {
            panel.bit_index = bit;
            panel.mode = Mode::BitPlane;
        }
        if self.manual_min.is_some() || self.manual_max.is_some() {
            panel.contrast_stretch = ContrastConfig::manual(
                self.manual_min.unwrap_or(0),
                self.manual_max.unwrap_or(255),
            );
        } else if self.contrast {
            panel.contrast_stretch = ContrastConfig::auto();
        }
        if let Some(scale) = self.pair_scale {
            panel.pair_scale = scale;
        }
    }
}

/// Describe a panel for status output: "x + 1 (256x256, raw)".
pub(crate) fn describe(panel: &PanelConfig) -> String {
    let source = if panel.built_in_generator.is_empty() {
        panel.equation.clone()
    } else {
        format!("built-in {}", panel.built_in_generator)
    };
    let mode = match panel.mode {
        Mode::BitPlane => format!("bit {}", panel.bit_index),
        mode => mode.to_string(),
    };
    let contrast = if panel.contrast_stretch.enabled {
        ", contrast"
    } else {
        ""
    };
    format!("{} ({}, {}{})", source, panel.resolution, mode, contrast)
}

/// Path with `-suffix` inserted before the extension: `out.png` → `out-left.png`.
pub(crate) fn suffixed_path(path: &std::path::Path, suffix: &str) -> std::path::PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bitviz");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");
    path.with_file_name(format!("{}-{}.{}", stem, suffix, ext))
}

/// Reject a bit plane index before any work is queued.
pub(crate) fn check_panel(panel: &PanelConfig) -> Result<()> {
    panel.to_request().map(|_| ())
}
