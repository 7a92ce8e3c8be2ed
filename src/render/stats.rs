//! Bit balance and grey-range bookkeeping.

use crate::types::BitStat;

/// Running per-bit set counts.
#[derive(Debug, Clone, Default)]
pub struct BitCounter {
    counts: [u32; 32],
}

impl BitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, x: u32) {
        for (bit, count) in self.counts.iter_mut().enumerate() {
            *count += (x >> bit) & 1;
        }
    }

    /// Number of values seen with `bit` set.
    pub fn count(&self, bit: u8) -> u32 {
        self.counts[bit as usize]
    }

    /// Proportion and imbalance for every bit position.
    pub fn stats(&self, total: usize) -> Vec<BitStat> {
        self.counts
            .iter()
            .enumerate()
            .map(|(bit, &count)| {
                let proportion = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                BitStat {
                    bit: bit as u8,
                    proportion,
                    imbalance: (0.5 - proportion).abs(),
                }
            })
            .collect()
    }
}

/// Observed minimum and maximum grey level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayRange {
    pub min: u8,
    pub max: u8,
}

impl Default for GrayRange {
    /// Empty range: any observation replaces both bounds.
    fn default() -> Self {
        Self { min: 255, max: 0 }
    }
}

impl GrayRange {
    #[inline]
    pub fn observe(&mut self, gray: u8) {
        self.min = self.min.min(gray);
        self.max = self.max.max(gray);
    }
}
