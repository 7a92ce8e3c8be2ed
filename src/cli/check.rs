//! Check command implementation.
//!
//! Compiles an equation without generating anything, showing the tokens
//! and postfix program, and optionally the first few values it produces.

use clap::Args;

use crate::error::Result;
use crate::output::Printer;
use crate::parser::{compile, tokenize};
use crate::types::{Generator, DEFAULT_SEED};

/// Compile an equation and show its postfix form
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Equation to compile
    pub equation: String,

    /// Seed for the sample values
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u32,

    /// Number of values to print from the seed
    #[arg(long, short = 'n', default_value = "0")]
    pub steps: usize,
}

/// Compile the equation and return the first `steps` values after the seed.
pub fn sample(args: &CheckArgs) -> Result<Vec<u32>> {
    let program = compile(&args.equation)?;
    let generator = Generator::Custom(program);
    Ok(generator.iter(args.seed).take(args.steps).collect())
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let program = compile(&args.equation)?;
    let tokens = tokenize(&args.equation)?;
    let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

    printer.status("Compiled", &args.equation);
    printer.info("Tokens", &tokens.join(" "));
    printer.info("Postfix", &program.to_string());

    if args.steps > 0 {
        printer.info(
            "Sampling",
            &format!("{} values from seed {}", args.steps, args.seed),
        );
        for value in sample(&args)? {
            println!("{:#010x} {}", value, value);
        }
    }

    Ok(())
}
