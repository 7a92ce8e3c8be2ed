//! Terminal output formatting for the bitviz CLI.
//!
//! Provides Cargo-style status output with right-aligned coloured verbs.
//! All status output goes to stderr; stdout is reserved for machine-readable output.

use std::io::{self, IsTerminal, Write};

use crate::types::BitStat;

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Width of the progress bar, in cells.
const BAR_WIDTH: usize = 30;

/// Imbalance above which a bit is flagged as biased.
pub const BIAS_THRESHOLD: f64 = 0.05;

/// Terminal-aware status printer.
///
/// Prints Cargo-style status lines to stderr with optional ANSI colours.
/// Colour and the live progress bar are enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "  Generating x ^ (x << 13) (256x256, raw)"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Redraw the progress bar in place. No-op when stderr is not a terminal.
    pub fn progress(&self, label: &str, percent: f64) {
        if !self.color {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\r{BOLD}{CYAN}{label:>VERB_WIDTH$}{RESET} {} {:>5.1}%",
            progress_bar(percent, BAR_WIDTH),
            percent
        );
        let _ = stderr.flush();
    }

    /// Clear the progress bar line.
    pub fn clear_progress(&self) {
        if !self.color {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a string as bold.
    pub fn bold(&self, text: &str) -> String {
        if self.color {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a string as cyan (for paths, info).
    pub fn cyan(&self, text: &str) -> String {
        if self.color {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Render a `[#####.....]` bar for a percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Number of bits whose imbalance exceeds the bias threshold.
pub fn biased_bits(stats: &[BitStat]) -> usize {
    stats.iter().filter(|s| s.imbalance > BIAS_THRESHOLD).count()
}

/// Summarize bit balance: the worst bit and how many exceed the bias threshold.
pub fn bit_summary(stats: &[BitStat]) -> String {
    let biased = biased_bits(stats);
    let worst = stats
        .iter()
        .max_by(|a, b| a.imbalance.total_cmp(&b.imbalance));

    match worst {
        Some(worst) => format!(
            "{} biased, worst bit {} at {:.1}% set",
            plural(biased, "bit", "bits"),
            worst.bit,
            worst.proportion * 100.0
        ),
        None => "no bits".to_string(),
    }
}

/// Pluralize a count: `plural(1, "bit", "bits")` → "1 bit".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &std::path::Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_singular() {
        assert_eq!(plural(1, "bit", "bits"), "1 bit");
    }

    #[test]
    fn test_plural_zero() {
        assert_eq!(plural(0, "bit", "bits"), "0 bits");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(50.0, 4), "[##..]");
        assert_eq!(progress_bar(100.0, 4), "[####]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
    }

    #[test]
    fn test_bit_summary() {
        let stats = vec![
            BitStat { bit: 0, proportion: 0.5, imbalance: 0.0 },
            BitStat { bit: 1, proportion: 1.0, imbalance: 0.5 },
            BitStat { bit: 2, proportion: 0.52, imbalance: 0.02 },
        ];
        assert_eq!(biased_bits(&stats), 1);
        assert_eq!(bit_summary(&stats), "1 bit biased, worst bit 1 at 100.0% set");
        assert_eq!(biased_bits(&stats[..1]), 0);
    }

    #[test]
    fn test_display_path_absolute() {
        use std::path::Path;
        // An absolute path outside cwd should stay absolute
        let p = Path::new("/nonexistent/path/to/file");
        assert_eq!(display_path(p), "/nonexistent/path/to/file");
    }
}
