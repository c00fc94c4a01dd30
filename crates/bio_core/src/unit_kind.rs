//! Unit catalog: the static table of every deployable unit type.
//!
//! The catalog is a `static` array indexed by [`UnitType`], built at compile
//! time and never mutated, so it is safe to read from any thread without
//! synchronization.
//!
//! # Example
//!
//! ```
//! use bio_core::unit_kind::{stats_of, UnitType};
//! use bio_core::factions::Faction;
//!
//! let info = stats_of(UnitType::TCell);
//! assert_eq!(info.stats.health, 80);
//! assert_eq!(info.faction, Faction::ImmuneSystem);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::factions::Faction::{self, ImmuneSystem, Pathogen};
use crate::resources::Resources;
use self::SpecialAbility as A;

/// Every unit type in the game.
///
/// Discriminants double as the wire index used by action requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    /// Cytotoxic T lymphocyte.
    TCell = 0,
    /// Antibody-producing B lymphocyte.
    BCell = 1,
    /// Heavy phagocyte.
    Macrophage = 2,
    /// Fast first responder.
    NeutrophilCell = 3,
    /// Antigen-presenting scout.
    DendriticCell = 4,
    /// Natural killer cell.
    NaturalKillerCell = 5,
    /// Fast, fragile replicator.
    Virus = 6,
    /// Sturdy replicator.
    Bacteria = 7,
    /// Slow, defensive colony.
    Fungus = 8,
    /// Resource-draining parasite.
    Parasite = 9,
    /// Durable malignant cell.
    CancerCell = 10,
    /// Glass-cannon toxin.
    Toxin = 11,
}

impl UnitType {
    /// All unit types in catalog order.
    pub const ALL: [Self; 12] = [
        Self::TCell,
        Self::BCell,
        Self::Macrophage,
        Self::NeutrophilCell,
        Self::DendriticCell,
        Self::NaturalKillerCell,
        Self::Virus,
        Self::Bacteria,
        Self::Fungus,
        Self::Parasite,
        Self::CancerCell,
        Self::Toxin,
    ];

    /// Resolve a wire index.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownUnitType`] for indices outside the catalog.
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(GameError::UnknownUnitType(index))
    }

    /// The wire index of this unit type.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The catalog entry for this unit type.
    #[must_use]
    pub fn info(self) -> &'static UnitInfo {
        stats_of(self)
    }

    /// Faction owning this unit type.
    #[must_use]
    pub fn faction(self) -> Faction {
        stats_of(self).faction
    }

    /// Whether this is an immune cell.
    #[must_use]
    pub fn is_immune_cell(self) -> bool {
        self.faction() == Faction::ImmuneSystem
    }

    /// Whether this is a pathogen.
    #[must_use]
    pub fn is_pathogen(self) -> bool {
        self.faction() == Faction::Pathogen
    }
}

impl TryFrom<u8> for UnitType {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
    }
}

/// Special ability tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAbility {
    /// Produce antibodies for the owning player.
    AntibodyProduction,
    /// Engulf debris: heal and recover resources.
    Phagocytosis,
    /// Signal nearby immune cells.
    CytokineRelease,
    /// Remember previously seen pathogens.
    MemoryResponse,
    /// Slip through tissue barriers.
    Infiltration,
    /// Restore the zone's resource pool.
    ZoneHealing,
    /// Copy into a neighbouring cell.
    Replication,
    /// Change surface markers.
    Mutation,
    /// Poison surrounding cells.
    ToxinRelease,
    /// Hide from immune detection.
    ImmuneEvasion,
    /// Spread to distant tissue.
    Metastasis,
    /// Siphon host resources.
    ResourceDrain,
}

/// Base combat and movement statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Maximum health.
    pub health: u16,
    /// Attack strength.
    pub attack: u16,
    /// Defense rating.
    pub defense: u16,
    /// Cells per move, also used as attack reach.
    pub movement_range: u8,
    /// Energy needed to deploy.
    pub energy_cost: u16,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInfo {
    /// Unit type this entry describes.
    pub unit_type: UnitType,
    /// Display name.
    pub name: &'static str,
    /// Base stats.
    pub stats: UnitStats,
    /// Ability slots in order.
    pub abilities: &'static [SpecialAbility],
    /// Owning faction.
    pub faction: Faction,
    /// Full deployment cost.
    pub cost: Resources,
}

impl UnitInfo {
    /// Ability in the given slot, if any.
    #[must_use]
    pub fn ability(&self, slot: u8) -> Option<SpecialAbility> {
        self.abilities.get(usize::from(slot)).copied()
    }
}

/// Look up the catalog entry for a unit type. Total and pure.
#[must_use]
pub fn stats_of(unit_type: UnitType) -> &'static UnitInfo {
    &CATALOG[unit_type as usize]
}

const fn stats(health: u16, attack: u16, defense: u16, movement_range: u8, energy_cost: u16) -> UnitStats {
    UnitStats {
        health,
        attack,
        defense,
        movement_range,
        energy_cost,
    }
}

/// Deployment cost derived from energy cost and faction.
///
/// Immune cells need the full range of host resources; pathogens only
/// consume energy and nutrients.
const fn deploy_cost(faction: Faction, energy_cost: u16) -> Resources {
    let e = energy_cost as u32;
    match faction {
        Faction::ImmuneSystem => Resources::new(e, e / 2, e / 10, e / 3),
        Faction::Pathogen => Resources::new(e, 0, 0, e / 2),
    }
}

const fn entry(
    unit_type: UnitType,
    name: &'static str,
    faction: Faction,
    stats: UnitStats,
    abilities: &'static [SpecialAbility],
) -> UnitInfo {
    UnitInfo {
        unit_type,
        name,
        stats,
        abilities,
        faction,
        cost: deploy_cost(faction, stats.energy_cost),
    }
}

static CATALOG: [UnitInfo; 12] = [
    entry(UnitType::TCell, "T-Cell", ImmuneSystem, stats(80, 15, 10, 3, 20), &[A::CytokineRelease, A::MemoryResponse]),
    entry(UnitType::BCell, "B-Cell", ImmuneSystem, stats(60, 8, 8, 2, 25), &[A::AntibodyProduction, A::MemoryResponse]),
    entry(UnitType::Macrophage, "Macrophage", ImmuneSystem, stats(120, 20, 15, 2, 30), &[A::Phagocytosis, A::CytokineRelease]),
    entry(UnitType::NeutrophilCell, "Neutrophil", ImmuneSystem, stats(70, 18, 8, 4, 15), &[A::Phagocytosis, A::Infiltration]),
    entry(UnitType::DendriticCell, "Dendritic Cell", ImmuneSystem, stats(50, 5, 12, 3, 35), &[A::CytokineRelease, A::Infiltration]),
    entry(UnitType::NaturalKillerCell, "Natural Killer Cell", ImmuneSystem, stats(90, 25, 10, 3, 40), &[A::CytokineRelease, A::ZoneHealing]),
    entry(UnitType::Virus, "Virus", Pathogen, stats(40, 12, 5, 4, 10), &[A::Replication, A::ImmuneEvasion]),
    entry(UnitType::Bacteria, "Bacteria", Pathogen, stats(60, 15, 8, 2, 15), &[A::Replication, A::ToxinRelease]),
    entry(UnitType::Fungus, "Fungus", Pathogen, stats(80, 10, 12, 1, 20), &[A::Replication, A::ResourceDrain]),
    entry(UnitType::Parasite, "Parasite", Pathogen, stats(70, 18, 6, 3, 25), &[A::ImmuneEvasion, A::ResourceDrain]),
    entry(UnitType::CancerCell, "Cancer Cell", Pathogen, stats(100, 20, 10, 2, 30), &[A::Replication, A::Metastasis]),
    entry(UnitType::Toxin, "Toxin", Pathogen, stats(30, 30, 2, 5, 5), &[A::ToxinRelease, A::ResourceDrain]),
];
