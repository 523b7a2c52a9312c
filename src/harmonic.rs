// 🔢 Harmonic Reduction - Digital roots on small integers
//
// Every table in the node comes back to one function:
//   harmonic(a, b) = ((a + b - 1) mod 9) + 1
// which is the digital root of a + b with 0 folded onto 9.

use serde::Serialize;
use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// The doubling circuit: 1 → 2 → 4 → 8 → 16 (7) → 32 (5) → 64 (1)
pub const VORTEX_SEQUENCE: [u8; 6] = [1, 2, 4, 8, 7, 5];

/// Digits that never enter the doubling circuit
pub const AXIS_SEQUENCE: [u8; 3] = [3, 6, 9];

// ============================================================================
// DIGIT
// ============================================================================

/// A single decimal digit in [0, 9]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Digit(u8);

impl Digit {
    /// Returns `None` when `value` is outside [0, 9]
    pub fn new(value: i64) -> Option<Self> {
        if (0..=9).contains(&value) {
            Some(Digit(value as u8))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Zero is the void; every other digit is "manifest"
    pub fn is_void(&self) -> bool {
        self.0 == 0
    }

    pub fn is_axis(&self) -> bool {
        is_axis(self.0 as i64)
    }

    pub fn in_vortex(&self) -> bool {
        in_vortex(self.0 as i64)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// REDUCTION
// ============================================================================

/// Harmonic reduction of a pair: digital root of `a + b`, with 0 mapped to 9.
///
/// Total over every `i64` pair. Operands are reduced with the Euclidean
/// remainder first, so negative inputs and values near `i64::MAX` are fine.
///
/// ```
/// use zeropoint_node::harmonic;
///
/// assert_eq!(harmonic(0, 0), 9);
/// assert_eq!(harmonic(4, 5), 9);
/// assert_eq!(harmonic(1, 1), 2);
/// ```
pub fn harmonic(a: i64, b: i64) -> u8 {
    let r = (a.rem_euclid(9) + b.rem_euclid(9)) % 9;
    if r == 0 {
        9
    } else {
        r as u8
    }
}

/// Reduce a single number to [1, 9]
pub fn reduce(n: i64) -> u8 {
    harmonic(n, 0)
}

pub fn is_axis(d: i64) -> bool {
    AXIS_SEQUENCE.iter().any(|&x| x as i64 == d)
}

pub fn in_vortex(d: i64) -> bool {
    VORTEX_SEQUENCE.iter().any(|&x| x as i64 == d)
}

/// One doubling step: `reduce(2 * d)`
pub fn vortex_next(d: u8) -> u8 {
    reduce(2 * d as i64)
}

/// Walk doubling steps from `start` until the walk returns to it.
///
/// Doubling is a permutation of 1..=9, so every walk closes:
/// 1 gives the vortex circuit, 3 gives [3, 6], 9 (and 0) give [9].
pub fn vortex_cycle(start: i64) -> Vec<u8> {
    let first = reduce(start);
    let mut cycle = vec![first];
    let mut current = vortex_next(first);

    while current != first {
        cycle.push(current);
        current = vortex_next(current);
    }

    cycle
}

// ============================================================================
// TESTS
// ============================================================================
