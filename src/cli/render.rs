//! Render command implementation.
//!
//! Generates one image on a background worker and writes it as PNG.

use std::path::PathBuf;

use clap::Args;

use super::{check_panel, describe, GenOptions};
use crate::config::{PanelConfig, SessionConfig};
use crate::error::{Result, VizError};
use crate::output::{biased_bits, bit_summary, display_path, Printer};
use crate::render::{stretch_bounds, write_png, GrayRange, MAX_SCALE};
use crate::types::{BuiltIn, BuiltinPresets, ContrastConfig, GenerationResult};
use crate::worker::{outcome_message, Worker};

/// Generate an image from an equation or built-in generator
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Equation in x, e.g. "x ^ (x << 13)"
    pub equation: Option<String>,

    /// Use a built-in generator instead of an equation
    #[arg(long, short, conflicts_with_all = ["equation", "preset"])]
    pub builtin: Option<BuiltIn>,

    /// Use a preset equation by name
    #[arg(long, short, conflicts_with = "equation")]
    pub preset: Option<String>,

    /// Start from a saved session file (JSON or YAML)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: GenOptions,

    /// Output PNG file
    #[arg(long, short, default_value = "bitviz.png")]
    pub output: PathBuf,

    /// Scale factor for output (integer upscaling, 1-32)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE)))]
    pub scale: u32,

    /// Print the result message as JSON on stdout
    #[arg(long)]
    pub stats: bool,

    /// Save the settings used as a session file
    #[arg(long)]
    pub export_config: Option<PathBuf>,
}

/// Resolve the panel from the config file, source flags and overrides.
pub fn resolve_panel(args: &RenderArgs) -> Result<PanelConfig> {
    let mut panel = match &args.config {
        Some(path) => SessionConfig::load(path)?.panel,
        None => PanelConfig::default(),
    };

    if let Some(name) = &args.preset {
        let preset = BuiltinPresets::get(name).ok_or_else(|| {
            let names: Vec<_> = BuiltinPresets::all().iter().map(|p| p.slug()).collect();
            VizError::config(
                format!("Unknown preset: {}", name),
                Some(format!("Available presets: {}", names.join(", "))),
            )
        })?;
        panel.equation = preset.equation.to_string();
        panel.built_in_generator.clear();
    }
    if let Some(equation) = &args.equation {
        panel.equation = equation.clone();
        panel.built_in_generator.clear();
    }
    if let Some(builtin) = args.builtin {
        panel.built_in_generator = builtin.id().to_string();
    }

    args.options.apply(&mut panel);
    check_panel(&panel)?;
    Ok(panel)
}

pub fn run(mut args: RenderArgs, printer: &Printer) -> Result<()> {
    if let Some(seed) = args.options.roll_seed() {
        printer.info("Seed", &format!("random seed {}", seed));
    }
    let panel = resolve_panel(&args)?;
    let request = panel.to_request()?;

    if let Some(path) = &args.export_config {
        SessionConfig::new(panel.clone()).save(path)?;
        printer.info("Exported", &display_path(path));
    }

    printer.status("Generating", &describe(&panel));

    let worker = Worker::spawn("render")?;
    let handle = worker.submit(request)?;
    let outcome = handle.wait_with_progress(|p| printer.progress("Progress", p));
    printer.clear_progress();
    worker.shutdown()?;

    if args.stats {
        println!("{}", outcome_message(&outcome));
    }
    let result = outcome?;

    report(&result, &panel.contrast_stretch, printer);

    write_png(&result, &args.output, args.scale)?;
    printer.status("Wrote", &display_path(&args.output));

    Ok(())
}

/// Print a summary of the result's statistics. Biased bits are a warning.
pub(crate) fn report(result: &GenerationResult, contrast: &ContrastConfig, printer: &Printer) {
    if let Some(stats) = result.stats.bit_stats() {
        if biased_bits(stats) > 0 {
            printer.warning("Bits", &bit_summary(stats));
        } else {
            printer.info("Bits", &bit_summary(stats));
        }
    }
    if let Some(max_hits) = result.stats.max_hits() {
        printer.info("Density", &format!("busiest cell hit {} times", max_hits));
    }
    if let Some(summary) = contrast_summary(result, contrast) {
        printer.info("Contrast", &summary);
    }
}

/// Describe the grey range of a result and what the stretch did with it.
///
/// `None` for Pair results, which carry no grey range.
pub(crate) fn contrast_summary(result: &GenerationResult, contrast: &ContrastConfig) -> Option<String> {
    let observed = GrayRange {
        min: result.min_val?,
        max: result.max_val?,
    };
    if !contrast.enabled {
        return Some(format!("range {}..{}", observed.min, observed.max));
    }

    let (min, max) = stretch_bounds(contrast, observed);
    let summary = if min >= max {
        format!("range {}..{}, too narrow to stretch", min, max)
    } else if contrast.auto {
        format!("stretched {}..{} to 0..255", min, max)
    } else {
        format!(
            "stretched {}..{} to 0..255 (observed {}..{})",
            min, max, observed.min, observed.max
        )
    };
    Some(summary)
}
