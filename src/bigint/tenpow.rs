//! Cache of `10^(2^k)` used by decimal printing and by power-of-ten scaling.

use super::BigInt;
use crate::Vec;

/// Lazily grown table of `10^(2^k)`.
///
/// Each entry is the square of the previous one, so growing the table from any
/// thread of control always produces the same values.
#[derive(Debug, Clone)]
pub struct TenPowers {
    table: Vec<BigInt>,
}

impl Default for TenPowers {
    fn default() -> Self {
        Self::new()
    }
}

impl TenPowers {
    pub fn new() -> Self {
        TenPowers {
            table: Vec::from([BigInt::ten()]),
        }
    }

    /// Number of entries computed so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// `10^(2^k)`, squaring earlier entries as needed.
    pub fn get(&mut self, k: usize) -> &BigInt {
        while self.table.len() <= k {
            let next = self.table[self.table.len() - 1].square();
            tracing::trace!(entry = self.table.len(), words = next.len_words(), "growing power-of-ten cache");
            self.table.push(next);
        }
        &self.table[k]
    }

    /// `10^power` assembled from the binary expansion of `power`.
    pub fn ten_pow(&mut self, power: u64) -> BigInt {
        let mut result = BigInt::one();
        let mut p = power;
        let mut k = 0;
        while p != 0 {
            if p & 1 == 1 {
                result = &result * self.get(k);
            }
            p >>= 1;
            k += 1;
        }
        result
    }

    /// Smallest `k` with `10^(2^k) > z` (ignoring sign).
    pub fn depth_for(&mut self, z: &BigInt) -> usize {
        let mut k = 0;
        while self.get(k).cmp_abs(z) != core::cmp::Ordering::Greater {
            k += 1;
        }
        k
    }
}

/// `10^power` without a long-lived cache.
pub fn ten_pow(power: u64) -> BigInt {
    TenPowers::new().ten_pow(power)
}
