use bitviz::cli::{Cli, Commands};
use bitviz::output::Printer;
use clap::Parser;
use miette::Result;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Render(args) => bitviz::cli::render::run(args, &printer)?,
        Commands::Split(args) => bitviz::cli::split::run(args, &printer)?,
        Commands::Check(args) => bitviz::cli::check::run(args, &printer)?,
        Commands::Presets(args) => bitviz::cli::presets::run(args, &printer)?,
        Commands::Completions(args) => bitviz::cli::completions::run(args)?,
    }

    Ok(())
}
