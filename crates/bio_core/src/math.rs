//! Fixed-point and integer helpers for deterministic rules.
//!
//! Rules that need a fractional multiplier (infection weakening a zone's
//! defense, immune staging boosting antibody output) use fixed-point
//! arithmetic so every client computes bit-identical results. Cost scaling
//! by faction uses integer percentages instead, since factors like 1.2 have
//! no exact binary representation and would floor one unit short.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all rule multipliers.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Convert an integer percentage into a fixed-point multiplier.
///
/// Percentages beyond the fixed-point range saturate.
#[must_use]
pub fn percent(value: u32) -> Fixed {
    Fixed::saturating_from_num(value) / Fixed::from_num(100)
}

/// Multiply `value` by `multiplier`, rounding toward zero.
///
/// Negative multipliers clamp to zero. Products beyond the fixed-point
/// range saturate instead of overflowing.
#[must_use]
pub fn scale_floor(value: u32, multiplier: Fixed) -> u32 {
    let scaled = Fixed::saturating_from_num(value)
        .saturating_mul(multiplier)
        .floor();
    if scaled <= Fixed::ZERO {
        0
    } else {
        scaled.saturating_to_num::<u32>()
    }
}

/// Apply an integer percentage to `value`, flooring the result.
#[must_use]
pub const fn apply_percent(value: u32, percent: u32) -> u32 {
    let scaled = (value as u64) * (percent as u64) / 100;
    if scaled > u32::MAX as u64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Integer position on the zone map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct MapPos {
    /// Column on the zone map.
    pub x: i32,
    /// Row on the zone map.
    pub y: i32,
}

impl MapPos {
    /// Create a new map position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by a delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Manhattan distance between two grid cells.
#[must_use]
pub const fn cell_distance(from: (u32, u32), to: (u32, u32)) -> u32 {
    from.0.abs_diff(to.0) + from.1.abs_diff(to.1)
}
