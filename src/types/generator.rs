//! Generators: compiled custom equations and the fixed built-ins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

use super::program::Program;

/// A fixed reference generator offered instead of a custom equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltIn {
    #[serde(rename = "lcg")]
    Lcg,
    #[serde(rename = "xorshift32")]
    Xorshift32,
    #[serde(rename = "splitmix")]
    SplitMix,
    #[serde(rename = "bad1")]
    BadPlusFour,
    #[serde(rename = "bad2")]
    BadTimesTwo,
}

impl BuiltIn {
    pub const ALL: [BuiltIn; 5] = [
        BuiltIn::Lcg,
        BuiltIn::Xorshift32,
        BuiltIn::SplitMix,
        BuiltIn::BadPlusFour,
        BuiltIn::BadTimesTwo,
    ];

    /// Look up a built-in by its wire name (`lcg`, `bad1`, ...) or long name.
    pub fn get(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "lcg" => Some(BuiltIn::Lcg),
            "xorshift32" | "xorshift" => Some(BuiltIn::Xorshift32),
            "splitmix" => Some(BuiltIn::SplitMix),
            "bad1" | "bad-plus-four" => Some(BuiltIn::BadPlusFour),
            "bad2" | "bad-times-two" => Some(BuiltIn::BadTimesTwo),
            _ => None,
        }
    }

    /// Wire name used in requests and config files.
    pub fn id(self) -> &'static str {
        match self {
            BuiltIn::Lcg => "lcg",
            BuiltIn::Xorshift32 => "xorshift32",
            BuiltIn::SplitMix => "splitmix",
            BuiltIn::BadPlusFour => "bad1",
            BuiltIn::BadTimesTwo => "bad2",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            BuiltIn::Lcg => "LCG",
            BuiltIn::Xorshift32 => "Xorshift32",
            BuiltIn::SplitMix => "SplitMix",
            BuiltIn::BadPlusFour => "Bad: +4",
            BuiltIn::BadTimesTwo => "Bad: x2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuiltIn::Lcg => "Linear Congruential Generator",
            BuiltIn::Xorshift32 => "Fast XOR-shift based generator",
            BuiltIn::SplitMix => "High-quality hash-based generator",
            BuiltIn::BadPlusFour => "Intentionally poor: x+4",
            BuiltIn::BadTimesTwo => "Intentionally poor: x*2",
        }
    }

    /// Advance the generator by one step.
    pub fn step(self, x: u32) -> u32 {
        match self {
            BuiltIn::Lcg => x.wrapping_mul(1664525).wrapping_add(1013904223),
            BuiltIn::Xorshift32 => {
                let mut x = x;
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x
            }
            BuiltIn::SplitMix => {
                let mut x = x;
                x = (x ^ (x >> 16)).wrapping_mul(0x85eb_ca6b);
                x = (x ^ (x >> 13)).wrapping_mul(0xc2b2_ae35);
                x ^ (x >> 16)
            }
            BuiltIn::BadPlusFour => x.wrapping_add(4),
            BuiltIn::BadTimesTwo => x.wrapping_mul(2),
        }
    }
}

impl fmt::Display for BuiltIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BuiltIn {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltIn::get(s).ok_or_else(|| {
            VizError::config(
                format!("Unknown built-in generator: {}", s),
                Some("Available built-ins: lcg, xorshift32, splitmix, bad1, bad2".to_string()),
            )
        })
    }
}

/// The active step function of a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
    Custom(Program),
    BuiltIn(BuiltIn),
}

impl Generator {
    /// Advance the generator: the previous output is the next input.
    #[inline]
    pub fn step(&self, x: u32) -> u32 {
        match self {
            Generator::Custom(program) => program.eval(x),
            Generator::BuiltIn(builtin) => builtin.step(x),
        }
    }

    /// Iterate the generator from `seed`, yielding each produced value.
    pub fn iter(&self, seed: u32) -> impl Iterator<Item = u32> + '_ {
        let mut x = seed;
        std::iter::repeat_with(move || {
            x = self.step(x);
            x
        })
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Custom(program) => write!(f, "custom [{}]", program),
            Generator::BuiltIn(builtin) => write!(f, "built-in {}", builtin),
        }
    }
}
