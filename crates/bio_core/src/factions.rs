//! Factions, player identities and zone ownership.
//!
//! The two-player model binds identity to faction for the whole game:
//! player one commands the immune system, player two the pathogen.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two opposing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Immune cells defending the host.
    ImmuneSystem,
    /// Invading pathogens.
    Pathogen,
}

impl Faction {
    /// Get the display name for this faction.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::ImmuneSystem => "Immune System",
            Self::Pathogen => "Pathogen",
        }
    }

    /// The opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::ImmuneSystem => Self::Pathogen,
            Self::Pathogen => Self::ImmuneSystem,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Identifier of an active player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player "1", always the immune system.
    One,
    /// Player "2", always the pathogen.
    Two,
}

impl PlayerId {
    /// Both players in turn order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// The faction this player commands.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Self::One => Faction::ImmuneSystem,
            Self::Two => Faction::Pathogen,
        }
    }

    /// The player commanding `faction`.
    #[must_use]
    pub const fn for_faction(faction: Faction) -> Self {
        match faction {
            Faction::ImmuneSystem => Self::One,
            Faction::Pathogen => Self::Two,
        }
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Array index for per-player storage.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("1"),
            Self::Two => f.write_str("2"),
        }
    }
}

/// Owner of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Owner {
    /// Held by player one.
    Player1,
    /// Held by player two.
    Player2,
    /// Unclaimed.
    #[default]
    Neutral,
}

impl Owner {
    /// The owning player, if any.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Self::Player1 => Some(PlayerId::One),
            Self::Player2 => Some(PlayerId::Two),
            Self::Neutral => None,
        }
    }

    /// Whether nobody owns the zone.
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Whether `player` owns the zone.
    #[must_use]
    pub fn is(self, player: PlayerId) -> bool {
        self.player() == Some(player)
    }
}

impl From<PlayerId> for Owner {
    fn from(player: PlayerId) -> Self {
        match player {
            PlayerId::One => Self::Player1,
            PlayerId::Two => Self::Player2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_faction_binding() {
        assert_eq!(PlayerId::One.faction(), Faction::ImmuneSystem);
        assert_eq!(PlayerId::Two.faction(), Faction::Pathogen);
        for player in PlayerId::ALL {
            assert_eq!(PlayerId::for_faction(player.faction()), player);
        }
    }

    #[test]
    fn test_owner_round_trip() {
        assert_eq!(Owner::from(PlayerId::One).player(), Some(PlayerId::One));
        assert_eq!(Owner::from(PlayerId::Two).player(), Some(PlayerId::Two));
        assert_eq!(Owner::Neutral.player(), None);
        assert!(Owner::Player2.is(PlayerId::Two));
        assert!(!Owner::Neutral.is(PlayerId::One));
    }

    #[test]
    fn test_player_display_matches_wire_ids() {
        assert_eq!(PlayerId::One.to_string(), "1");
        assert_eq!(PlayerId::Two.to_string(), "2");
    }
}
