//! Rendering module for bitviz.
//!
//! This module turns generator output into pixels: the synthesis engine,
//! contrast stretch, bit statistics, progress reporting and PNG output.

mod contrast;
mod png;
mod progress;
mod stats;
mod synth;

pub use contrast::{stretch, stretch_bounds};
pub use png::{to_image, write_png, MAX_SCALE};
pub use progress::ProgressReporter;
pub use stats::{BitCounter, GrayRange};
pub use synth::{generate, synthesize};
