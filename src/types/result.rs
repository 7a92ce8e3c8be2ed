//! Generation results.

use serde::{Deserialize, Serialize};

/// Balance of one bit position across all generated values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitStat {
    pub bit: u8,
    /// Fraction of values with this bit set.
    pub proportion: f64,
    /// Distance of `proportion` from the ideal 0.5.
    pub imbalance: f64,
}

/// Mode-dependent statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stats {
    /// All modes except Pair: one entry per bit position.
    #[serde(rename_all = "camelCase")]
    Bits { bit_stats: Vec<BitStat> },
    /// Pair mode: hits in the densest histogram bin.
    #[serde(rename_all = "camelCase")]
    Pair { max_hits: u32 },
}

impl Stats {
    pub fn bit_stats(&self) -> Option<&[BitStat]> {
        match self {
            Stats::Bits { bit_stats } => Some(bit_stats),
            Stats::Pair { .. } => None,
        }
    }

    pub fn max_hits(&self) -> Option<u32> {
        match self {
            Stats::Pair { max_hits } => Some(*max_hits),
            Stats::Bits { .. } => None,
        }
    }

    /// Bit with the largest imbalance, if any.
    pub fn worst_bit(&self) -> Option<BitStat> {
        self.bit_stats()?
            .iter()
            .copied()
            .max_by(|a, b| a.imbalance.total_cmp(&b.imbalance))
    }
}

/// A generated image plus statistics.
///
/// The buffer is RGBA, row-major, `resolution² × 4` bytes with alpha 255.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    #[serde(skip)]
    pub buffer: Vec<u8>,
    pub resolution: u32,
    pub stats: Stats,
    /// Observed grey range; absent in Pair mode.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_val: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_val: Option<u8>,
}

impl GenerationResult {
    /// Grey level of the pixel at (`x`, `y`), read from the red channel.
    pub fn gray_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.resolution || y >= self.resolution {
            return None;
        }
        let idx = (y as usize * self.resolution as usize + x as usize) * 4;
        self.buffer.get(idx).copied()
    }

    /// Take ownership of the pixel buffer.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialization() {
        let stats = Stats::Pair { max_hits: 7 };
        assert_eq!(serde_json::to_string(&stats).unwrap(), r#"{"maxHits":7}"#);

        let stats = Stats::Bits {
            bit_stats: vec![BitStat {
                bit: 0,
                proportion: 0.5,
                imbalance: 0.0,
            }],
        };
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"bitStats":[{"bit":0,"proportion":0.5,"imbalance":0.0}]}"#
        );
    }

    #[test]
    fn test_worst_bit() {
        let stats = Stats::Bits {
            bit_stats: vec![
                BitStat { bit: 0, proportion: 0.5, imbalance: 0.0 },
                BitStat { bit: 1, proportion: 0.1, imbalance: 0.4 },
                BitStat { bit: 2, proportion: 0.6, imbalance: 0.1 },
            ],
        };
        assert_eq!(stats.worst_bit().unwrap().bit, 1);
        assert_eq!(Stats::Pair { max_hits: 1 }.worst_bit(), None);
    }

    #[test]
    fn test_gray_at() {
        let result = GenerationResult {
            buffer: vec![10, 10, 10, 255, 20, 20, 20, 255, 30, 30, 30, 255, 40, 40, 40, 255],
            resolution: 2,
            stats: Stats::Pair { max_hits: 1 },
            min_val: None,
            max_val: None,
        };
        assert_eq!(result.gray_at(1, 0), Some(20));
        assert_eq!(result.gray_at(0, 1), Some(30));
        assert_eq!(result.gray_at(2, 0), None);
    }
}
