//! Core domain types for bitviz.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Token`/`Op` - Equation tokens and operators
//! - `Program` - Verified postfix programs
//! - `Generator`/`BuiltIn` - Step functions
//! - `GenerationRequest`/`GenerationResult` - What to draw and what was drawn

mod generator;
mod preset;
mod program;
mod request;
mod result;
mod token;

pub use generator::{BuiltIn, Generator};
pub use preset::{BuiltinPresets, Preset};
pub use program::{Program, MAX_STACK_DEPTH};
pub use request::{
    ContrastConfig, GenerationRequest, Mode, PairScale, Resolution, DEFAULT_EQUATION,
    DEFAULT_SEED,
};
pub use result::{BitStat, GenerationResult, Stats};
pub use token::{Op, Token};
