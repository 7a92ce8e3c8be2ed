//! bitviz - Visualize 32-bit feedback generators
//!
//! A library for compiling bitwise equations into step functions, iterating
//! them from a seed, and rendering the produced sequence as an image that
//! makes statistical structure visible.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod render;
pub mod types;
pub mod worker;

pub use config::{PanelConfig, SessionConfig, SplitConfig};
pub use error::{Result, VizError};
pub use parser::compile;
pub use render::{generate, write_png};
pub use types::{
    BitStat, BuiltIn, BuiltinPresets, ContrastConfig, GenerationRequest, GenerationResult,
    Generator, Mode, PairScale, Preset, Program, Resolution, Stats,
};
pub use worker::{JobHandle, Side, SplitOutcome, SplitView, Worker, WorkerEvent};
