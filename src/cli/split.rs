//! Split command implementation.
//!
//! Generates two images in parallel on independent workers, so two
//! generators or two seeds can be compared side by side.

use std::path::PathBuf;

use clap::Args;

use super::render::report;
use super::{check_panel, describe, suffixed_path, GenOptions};
use crate::config::{PanelConfig, SplitConfig};
use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::render::{write_png, MAX_SCALE};
use crate::types::{BuiltIn, DEFAULT_SEED};
use crate::worker::{Side, SplitView};

/// Generate two images side by side in parallel
#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Left equation, or the name of a built-in generator
    #[arg(long, short)]
    pub left: Option<String>,

    /// Right equation, or the name of a built-in generator
    #[arg(long = "right", short = 'R')]
    pub right: Option<String>,

    /// Start from a saved split session file (JSON or YAML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Settings applied to both sides
    #[command(flatten)]
    pub options: GenOptions,

    /// Seed for the right side (defaults to the left seed + 1)
    #[arg(long)]
    pub right_seed: Option<u32>,

    /// Output base name; writes <name>-left.png and <name>-right.png
    #[arg(long, short, default_value = "split.png")]
    pub output: PathBuf,

    /// Scale factor for output (integer upscaling, 1-32)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE)))]
    pub scale: u32,

    /// Save the settings used as a split session file
    #[arg(long)]
    pub export_config: Option<PathBuf>,
}

/// Resolve both panels from the config file, source flags and overrides.
pub fn resolve_panels(args: &SplitArgs) -> Result<(PanelConfig, PanelConfig)> {
    let (mut left, mut right) = match &args.config {
        Some(path) => {
            let config = SplitConfig::load(path)?;
            (config.left_panel, config.right_panel)
        }
        None => {
            let right = PanelConfig {
                seed: DEFAULT_SEED.wrapping_add(1),
                ..PanelConfig::default()
            };
            (PanelConfig::default(), right)
        }
    };

    if let Some(source) = &args.left {
        set_source(&mut left, source);
    }
    if let Some(source) = &args.right {
        set_source(&mut right, source);
    }

    args.options.apply(&mut left);
    args.options.apply(&mut right);

    // A shared --seed moves both sides, keeping them one apart
    if let Some(seed) = args.options.seed {
        right.seed = seed.wrapping_add(1);
    }
    if let Some(seed) = args.right_seed {
        right.seed = seed;
    }

    check_panel(&left)?;
    check_panel(&right)?;
    Ok((left, right))
}

/// A source naming a built-in selects it; anything else is an equation.
fn set_source(panel: &mut PanelConfig, source: &str) {
    match BuiltIn::get(source.trim()) {
        Some(builtin) => panel.built_in_generator = builtin.id().to_string(),
        None => {
            panel.equation = source.to_string();
            panel.built_in_generator.clear();
        }
    }
}

pub fn run(mut args: SplitArgs, printer: &Printer) -> Result<()> {
    if let Some(seed) = args.options.roll_seed() {
        printer.info("Seed", &format!("random seed {}", seed));
    }
    let (left, right) = resolve_panels(&args)?;

    if let Some(path) = &args.export_config {
        SplitConfig::new(left.clone(), right.clone()).save(path)?;
        printer.info("Exported", &display_path(path));
    }

    printer.status("Left", &describe(&left));
    printer.status("Right", &describe(&right));

    let view = SplitView::new()?;
    let mut progress = [0.0_f64; 2];
    let outcome = view.run_with_progress(left.to_request()?, right.to_request()?, |side, p| {
        match side {
            Side::Left => progress[0] = p,
            Side::Right => progress[1] = p,
        }
        printer.progress("Progress", (progress[0] + progress[1]) / 2.0);
    })?;
    printer.clear_progress();

    // One side failing does not stop the other from being written
    let mut first_error = None;
    let sides = [
        (Side::Left, outcome.left, &left),
        (Side::Right, outcome.right, &right),
    ];
    for (side, result, panel) in sides {
        let label = side.to_string();
        match result {
            Ok(result) => {
                report(&result, &panel.contrast_stretch, printer);
                let path = suffixed_path(&args.output, &label);
                write_png(&result, &path, args.scale)?;
                printer.status("Wrote", &display_path(&path));
            }
            Err(e) => {
                printer.error("Failed", &format!("{} side: {}", label, e));
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
