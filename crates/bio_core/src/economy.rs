//! Per-turn resource accrual.
//!
//! Income comes from zone control: each zone where one player holds a
//! strict cell majority pays that zone's generation vector to the player.
//! Tied and empty zones pay nobody. A dominated zone's own pool also
//! restocks by the base vector, up to [`ZONE_POOL_CAP`].
//!
//! All arithmetic is integer and saturating, and every zone contributes
//! independently, so the result does not depend on zone order.

use crate::factions::PlayerId;
use crate::resources::Resources;
use crate::state::GameState;
use crate::zone::{Zone, ZONE_POOL_CAP};

/// Income a zone pays this turn, if any player dominates it.
#[must_use]
pub fn zone_income(zone: &Zone) -> Option<(PlayerId, Resources)> {
    zone.dominant_player()
        .map(|player| (player, zone.effective_generation()))
}

/// Total income each player would receive, indexed by [`PlayerId::index`].
#[must_use]
pub fn income_by_player(zones: &[Zone]) -> [Resources; 2] {
    let mut income = [Resources::ZERO; 2];
    for (player, amount) in zones.iter().filter_map(zone_income) {
        income[player.index()] += amount;
    }
    income
}

/// Apply one round of income to a copy of the state.
///
/// Player pools gain the generation of every zone they dominate, with the
/// antibody component scaled by the zone's antibody multiplier. The zone
/// pool of each dominated zone gains the base generation, capped.
#[must_use]
pub fn generate_resources(state: &GameState) -> GameState {
    let mut next = state.clone();
    let income = income_by_player(&next.zones);

    for player in PlayerId::ALL {
        let gained = income[player.index()];
        if !gained.is_empty() {
            tracing::trace!(%player, %gained, "Zone income");
        }
        *next.resources_of_mut(player) += gained;
    }

    for zone in &mut next.zones {
        if zone.dominant_player().is_some() {
            zone.pool = (zone.pool + zone.zone_type.resource_generation()).min(ZONE_POOL_CAP);
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::math::{percent, MapPos};
    use crate::unit_kind::UnitType;
    use crate::zone::{UnitInstance, ZoneId, ZoneType};

    fn fill(zone: &mut Zone, player: PlayerId, count: u32) {
        let unit_type = match player {
            PlayerId::One => UnitType::TCell,
            PlayerId::Two => UnitType::Virus,
        };
        let offset = zone.grid.units().count() as u32;
        for i in offset..offset + count {
            zone.grid.set(
                i / 16,
                i % 16,
                Some(UnitInstance::spawn(unit_type, player)),
            );
        }
    }

    fn single_zone_state(zone_type: ZoneType) -> GameState {
        let zones = vec![Zone::new(ZoneId(0), zone_type, MapPos::new(0, 0))];
        let mut state = GameState::new(zones, RulesConfig::default()).unwrap();
        state.resources = [Resources::ZERO; 2];
        state
    }

    #[test]
    fn test_majority_earns_generation() {
        let mut state = single_zone_state(ZoneType::Circulatory);
        fill(&mut state.zones[0], PlayerId::One, 5);
        fill(&mut state.zones[0], PlayerId::Two, 2);

        let next = generate_resources(&state);
        assert_eq!(*next.resources_of(PlayerId::One), Resources::new(10, 5, 2, 8));
        assert_eq!(*next.resources_of(PlayerId::Two), Resources::ZERO);
        // input untouched
        assert_eq!(*state.resources_of(PlayerId::One), Resources::ZERO);
    }

    #[test]
    fn test_tie_pays_nobody() {
        let mut state = single_zone_state(ZoneType::Organ);
        fill(&mut state.zones[0], PlayerId::One, 3);
        fill(&mut state.zones[0], PlayerId::Two, 3);

        let next = generate_resources(&state);
        assert_eq!(next.resources, [Resources::ZERO; 2]);
        assert_eq!(next.zones[0].pool, state.zones[0].pool);
    }

    #[test]
    fn test_antibody_multiplier_scales_income() {
        let mut state = single_zone_state(ZoneType::Barrier);
        state.zones[0].antibody_multiplier = percent(150);
        fill(&mut state.zones[0], PlayerId::One, 1);

        let next = generate_resources(&state);
        assert_eq!(next.resources_of(PlayerId::One).antibodies, 37);
    }

    #[test]
    fn test_zone_pool_accrues_and_caps() {
        let mut state = single_zone_state(ZoneType::Lymphatic);
        state.zones[0].pool = Resources::new(995, 10, 98, 0);
        fill(&mut state.zones[0], PlayerId::Two, 1);

        let next = generate_resources(&state);
        assert_eq!(next.zones[0].pool, Resources::new(1000, 30, 100, 5));
    }

    #[test]
    fn test_income_saturates() {
        let mut state = single_zone_state(ZoneType::Organ);
        *state.resources_of_mut(PlayerId::One) = Resources::new(u32::MAX, 0, 0, 0);
        fill(&mut state.zones[0], PlayerId::One, 1);

        let next = generate_resources(&state);
        assert_eq!(next.resources_of(PlayerId::One).energy, u32::MAX);
    }

    #[test]
    fn test_income_by_player_sums_zones() {
        let mut a = Zone::new(ZoneId(0), ZoneType::Tissue, MapPos::new(0, 0));
        let mut b = Zone::new(ZoneId(1), ZoneType::Organ, MapPos::new(1, 0));
        fill(&mut a, PlayerId::Two, 1);
        fill(&mut b, PlayerId::Two, 1);

        let income = income_by_player(&[a, b]);
        assert_eq!(income[PlayerId::Two.index()], Resources::new(20, 25, 4, 25));
        assert_eq!(income[PlayerId::One.index()], Resources::ZERO);
    }
}
