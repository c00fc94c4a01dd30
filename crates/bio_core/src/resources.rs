//! The four-component resource vector.
//!
//! Player pools, zone pools, unit costs, expansion costs and per-turn
//! generation all share the same shape: energy, antibodies, stem cells and
//! nutrients. All math is unsigned integer math; deduction only happens
//! after [`Resources::can_afford`] succeeds, so pools never go negative.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One component of a [`Resources`] vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Metabolic energy.
    Energy,
    /// Antibodies.
    Antibodies,
    /// Stem cells.
    StemCells,
    /// Nutrients.
    Nutrients,
}

impl ResourceKind {
    /// All kinds in canonical field order.
    pub const ALL: [Self; 4] = [
        Self::Energy,
        Self::Antibodies,
        Self::StemCells,
        Self::Nutrients,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Energy => "energy",
            Self::Antibodies => "antibodies",
            Self::StemCells => "stem cells",
            Self::Nutrients => "nutrients",
        })
    }
}

/// Resource vector {energy, antibodies, stem cells, nutrients}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Metabolic energy.
    pub energy: u32,
    /// Antibodies.
    pub antibodies: u32,
    /// Stem cells.
    pub stem_cells: u32,
    /// Nutrients.
    pub nutrients: u32,
}

impl Resources {
    /// Zero resources.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a resource vector in canonical field order.
    #[must_use]
    pub const fn new(energy: u32, antibodies: u32, stem_cells: u32, nutrients: u32) -> Self {
        Self {
            energy,
            antibodies,
            stem_cells,
            nutrients,
        }
    }

    /// Read one component.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Energy => self.energy,
            ResourceKind::Antibodies => self.antibodies,
            ResourceKind::StemCells => self.stem_cells,
            ResourceKind::Nutrients => self.nutrients,
        }
    }

    /// Mutable access to one component.
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Antibodies => &mut self.antibodies,
            ResourceKind::StemCells => &mut self.stem_cells,
            ResourceKind::Nutrients => &mut self.nutrients,
        }
    }

    /// Check if this pool covers `cost` in every component.
    #[must_use]
    pub fn can_afford(&self, cost: &Self) -> bool {
        self.first_shortfall(cost).is_none()
    }

    /// First component (in canonical order) that cannot cover `cost`.
    ///
    /// Returns `(kind, required, available)`.
    #[must_use]
    pub fn first_shortfall(&self, cost: &Self) -> Option<(ResourceKind, u32, u32)> {
        ResourceKind::ALL.into_iter().find_map(|kind| {
            let required = cost.get(kind);
            let available = self.get(kind);
            (available < required).then_some((kind, required, available))
        })
    }

    /// Spend `cost` if every component is covered.
    ///
    /// Returns true if the transaction succeeded.
    pub fn spend(&mut self, cost: &Self) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        *self = *self - *cost;
        true
    }

    /// Add another vector, saturating each component.
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self {
            energy: self.energy.saturating_add(rhs.energy),
            antibodies: self.antibodies.saturating_add(rhs.antibodies),
            stem_cells: self.stem_cells.saturating_add(rhs.stem_cells),
            nutrients: self.nutrients.saturating_add(rhs.nutrients),
        }
    }

    /// Subtract another vector, clamping each component at zero.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self {
            energy: self.energy.saturating_sub(rhs.energy),
            antibodies: self.antibodies.saturating_sub(rhs.antibodies),
            stem_cells: self.stem_cells.saturating_sub(rhs.stem_cells),
            nutrients: self.nutrients.saturating_sub(rhs.nutrients),
        }
    }

    /// Clamp each component to the matching component of `cap`.
    #[must_use]
    pub fn min(self, cap: Self) -> Self {
        Self {
            energy: self.energy.min(cap.energy),
            antibodies: self.antibodies.min(cap.antibodies),
            stem_cells: self.stem_cells.min(cap.stem_cells),
            nutrients: self.nutrients.min(cap.nutrients),
        }
    }

    /// Multiply each component by an integer factor, saturating.
    #[must_use]
    pub const fn scaled(self, factor: u32) -> Self {
        Self {
            energy: self.energy.saturating_mul(factor),
            antibodies: self.antibodies.saturating_mul(factor),
            stem_cells: self.stem_cells.saturating_mul(factor),
            nutrients: self.nutrients.saturating_mul(factor),
        }
    }

    /// Apply an integer percentage to each component, flooring.
    #[must_use]
    pub const fn percent_of(self, percent: u32) -> Self {
        use crate::math::apply_percent;
        Self {
            energy: apply_percent(self.energy, percent),
            antibodies: apply_percent(self.antibodies, percent),
            stem_cells: apply_percent(self.stem_cells, percent),
            nutrients: apply_percent(self.nutrients, percent),
        }
    }

    /// Check if every component is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.energy == 0 && self.antibodies == 0 && self.stem_cells == 0 && self.nutrients == 0
    }
}

impl std::ops::Add for Resources {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl std::ops::AddAssign for Resources {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl std::ops::Sub for Resources {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{energy: {}, antibodies: {}, stem cells: {}, nutrients: {}}}",
            self.energy, self.antibodies, self.stem_cells, self.nutrients
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_afford_all_four_components() {
        let pool = Resources::new(50, 10, 2, 6);
        assert!(pool.can_afford(&Resources::new(20, 10, 2, 6)));
        assert!(!pool.can_afford(&Resources::new(20, 11, 2, 6)));
        assert!(!pool.can_afford(&Resources::new(20, 10, 2, 7)));
    }

    #[test]
    fn test_first_shortfall_reports_canonical_order() {
        let pool = Resources::new(5, 0, 0, 0);
        assert_eq!(
            pool.first_shortfall(&Resources::new(10, 5, 0, 0)),
            Some((ResourceKind::Energy, 10, 5))
        );
        assert_eq!(
            pool.first_shortfall(&Resources::new(5, 0, 0, 1)),
            Some((ResourceKind::Nutrients, 1, 0))
        );
        assert_eq!(pool.first_shortfall(&Resources::new(5, 0, 0, 0)), None);
    }

    #[test]
    fn test_spend_leaves_pool_untouched_on_failure() {
        let mut pool = Resources::new(10, 10, 10, 10);
        assert!(!pool.spend(&Resources::new(11, 0, 0, 0)));
        assert_eq!(pool, Resources::new(10, 10, 10, 10));
        assert!(pool.spend(&Resources::new(10, 1, 2, 3)));
        assert_eq!(pool, Resources::new(0, 9, 8, 7));
    }

    #[test]
    fn test_saturating_arithmetic() {
        let big = Resources::new(u32::MAX, 1, 1, 1);
        assert_eq!((big + Resources::new(1, 1, 1, 1)).energy, u32::MAX);
        assert_eq!(
            Resources::new(1, 1, 1, 1) - Resources::new(2, 0, 0, 5),
            Resources::new(0, 1, 1, 0)
        );
    }

    #[test]
    fn test_percent_of_floors() {
        assert_eq!(
            Resources::new(150, 75, 15, 100).percent_of(120),
            Resources::new(180, 90, 18, 120)
        );
    }

    #[test]
    fn test_min_caps_each_component() {
        let capped = Resources::new(2000, 5, 500, 1000).min(Resources::new(1000, 1000, 100, 1000));
        assert_eq!(capped, Resources::new(1000, 5, 100, 1000));
    }
}
