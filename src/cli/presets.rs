//! Presets command implementation.

use clap::Args;

use crate::error::Result;
use crate::output::Printer;
use crate::types::{BuiltIn, BuiltinPresets, Mode};

/// List presets, built-in generators and modes
#[derive(Args, Debug, Default)]
pub struct PresetsArgs {
    /// Print as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PresetsArgs, printer: &Printer) -> Result<()> {
    if args.json {
        println!("{}", listing());
        return Ok(());
    }

    printer.status("Presets", "");
    for preset in BuiltinPresets::all() {
        println!(
            "  {} {}",
            printer.bold(&format!("{:<20}", preset.slug())),
            printer.cyan(preset.equation)
        );
    }

    printer.status("Built-ins", "");
    for builtin in BuiltIn::ALL {
        println!(
            "  {} {}",
            printer.bold(&format!("{:<20}", builtin.id())),
            printer.dim(builtin.description())
        );
    }

    printer.status("Modes", "");
    for mode in Mode::ALL {
        println!(
            "  {} {}",
            printer.bold(&format!("{:<20}", mode.id())),
            printer.dim(mode.description())
        );
    }

    Ok(())
}

/// Everything the command lists, as JSON.
pub fn listing() -> serde_json::Value {
    let presets: Vec<_> = BuiltinPresets::all()
        .iter()
        .map(|p| serde_json::json!({ "name": p.name, "slug": p.slug(), "equation": p.equation }))
        .collect();
    let builtins: Vec<_> = BuiltIn::ALL
        .iter()
        .map(|b| {
            serde_json::json!({ "id": b.id(), "label": b.label(), "description": b.description() })
        })
        .collect();
    let modes: Vec<_> = Mode::ALL
        .iter()
        .map(|m| serde_json::json!({ "id": m.id(), "label": m.label(), "description": m.description() }))
        .collect();

    serde_json::json!({ "presets": presets, "builtIns": builtins, "modes": modes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_counts() {
        let value = listing();
        assert_eq!(value["presets"].as_array().unwrap().len(), 6);
        assert_eq!(value["builtIns"].as_array().unwrap().len(), 5);
        assert_eq!(value["modes"].as_array().unwrap().len(), 5);
        assert_eq!(value["builtIns"][3]["id"], "bad1");
    }
}
