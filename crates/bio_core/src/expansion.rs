//! Territorial expansion.
//!
//! Four ways to grow: creating a new zone off a border zone, spreading
//! infection (pathogen), staging an immune response (immune system) and
//! conquering an enemy zone (either side). Every kind needs a source zone
//! the actor holds, by ownership or by cell majority.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{GameError, Rejection, Result};
use crate::factions::{Faction, Owner, PlayerId};
use crate::map;
use crate::math::{percent, MapPos};
use crate::outcome::{ensure_running, ActionOutcome, Attempt};
use crate::resources::Resources;
use crate::state::GameState;
use crate::zone::{Zone, ZoneId, ZoneType, ZONE_POOL_CAP};

/// Upper bound of the infection and immune response levels.
pub const MAX_LEVEL: u8 = 100;
/// Level gained by an infection spread or immune response.
pub const SPREAD_LEVEL_GAIN: u8 = 5;
/// Level gained by a conquest.
pub const CONQUEST_LEVEL_GAIN: u8 = 3;
/// Zone pool drained from an infected zone.
pub const INFECTION_DRAIN: Resources = Resources::new(50, 0, 0, 30);

/// Kind of expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpansionKind {
    /// Open a new zone next to a border zone.
    CreateNewZone,
    /// Pathogen pushes into an adjacent zone.
    InfectionSpread,
    /// Immune system stages defenses in an adjacent zone.
    ImmuneResponse,
    /// Take an adjacent enemy zone.
    ConquerZone,
}

/// An expansion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpansionRequest {
    /// What to do.
    pub kind: ExpansionKind,
    /// Zone the expansion starts from.
    pub source: ZoneId,
    /// Zone acted upon. Unused by [`ExpansionKind::CreateNewZone`].
    pub target: Option<ZoneId>,
    /// Type of the created zone. Only used by [`ExpansionKind::CreateNewZone`].
    pub new_zone_type: Option<ZoneType>,
}

impl ExpansionRequest {
    /// Create a zone of `zone_type` next to `source`.
    #[must_use]
    pub const fn create(source: ZoneId, zone_type: ZoneType) -> Self {
        Self {
            kind: ExpansionKind::CreateNewZone,
            source,
            target: None,
            new_zone_type: Some(zone_type),
        }
    }

    /// Spread infection from `source` into `target`.
    #[must_use]
    pub const fn infect(source: ZoneId, target: ZoneId) -> Self {
        Self::toward(ExpansionKind::InfectionSpread, source, target)
    }

    /// Stage an immune response from `source` into `target`.
    #[must_use]
    pub const fn immune_response(source: ZoneId, target: ZoneId) -> Self {
        Self::toward(ExpansionKind::ImmuneResponse, source, target)
    }

    /// Conquer `target` from `source`.
    #[must_use]
    pub const fn conquer(source: ZoneId, target: ZoneId) -> Self {
        Self::toward(ExpansionKind::ConquerZone, source, target)
    }

    const fn toward(kind: ExpansionKind, source: ZoneId, target: ZoneId) -> Self {
        Self {
            kind,
            source,
            target: Some(target),
            new_zone_type: None,
        }
    }
}

// ============================================================================
// Costs
// ============================================================================

/// Cost of creating a zone, scaled by the faction's percentage and floored
/// per component.
#[must_use]
pub const fn creation_cost(zone_type: ZoneType, faction: Faction, rules: &RulesConfig) -> Resources {
    zone_type
        .creation_cost()
        .percent_of(rules.creation_cost_percent(faction))
}

/// Cost of spreading infection into a zone of `target` type.
#[must_use]
pub const fn infection_cost(target: ZoneType) -> Resources {
    let resistance = match target {
        ZoneType::Barrier => 3,
        ZoneType::Lymphatic => 2,
        _ => 1,
    };
    let a = 100 * resistance;
    Resources::new(2 * a, 0, 0, a)
}

/// Cost of an immune response into a zone of `target` type.
#[must_use]
pub const fn immune_response_cost(target: ZoneType) -> Resources {
    let difficulty = match target {
        ZoneType::Tissue => 2,
        ZoneType::Organ => 3,
        _ => 1,
    };
    let a = 80 * difficulty;
    Resources::new(a, 2 * a, a / 4, a / 2)
}

/// Cost of conquering a zone of `target` type.
#[must_use]
pub const fn conquest_cost(target: ZoneType) -> Resources {
    let defense = match target {
        ZoneType::Barrier | ZoneType::Lymphatic => 2,
        ZoneType::Organ => 3,
        _ => 1,
    };
    let a = 250 * defense;
    Resources::new(3 * a, a, a / 5, 2 * a)
}

// ============================================================================
// Execution
// ============================================================================

/// Carry out an expansion for the current player.
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`] if the source or target zone does not
/// exist and [`GameError::InvalidState`] if the request lacks the target or
/// zone type its kind needs.
pub fn expand_zone(state: &GameState, request: &ExpansionRequest) -> Result<ActionOutcome> {
    ActionOutcome::resolve(state, try_expand(state, request))
}

fn try_expand(state: &GameState, request: &ExpansionRequest) -> Attempt {
    ensure_running(state)?;
    let player = state.current_player;
    let source = state.zone(request.source)?;

    let next = match request.kind {
        ExpansionKind::CreateNewZone => {
            let zone_type = request.new_zone_type.ok_or_else(|| {
                GameError::InvalidState("zone creation needs a zone type".to_string())
            })?;
            check_source(source, player)?;
            create_zone(state, source, zone_type)?
        }
        kind => {
            let target_id = request.target.ok_or_else(|| {
                GameError::InvalidState(format!("{kind:?} needs a target zone"))
            })?;
            let target = state.zone(target_id)?;
            check_faction(kind, player)?;
            check_source(source, player)?;
            if !map::are_adjacent(&state.zones, source.id, target.id) {
                return Err(Rejection::NotAdjacent.into());
            }
            check_target(kind, target, player)?;
            let cost = match kind {
                ExpansionKind::InfectionSpread => infection_cost(target.zone_type),
                ExpansionKind::ImmuneResponse => immune_response_cost(target.zone_type),
                _ => conquest_cost(target.zone_type),
            };
            let mut next = charge(state, player, &cost)?;
            apply_effect(&mut next, kind, target_id, player)?;
            next
        }
    };

    tracing::debug!(%player, kind = ?request.kind, source = %request.source, "Zone expanded");
    Ok(next)
}

fn check_faction(kind: ExpansionKind, player: PlayerId) -> std::result::Result<(), Rejection> {
    let faction = player.faction();
    let allowed = match kind {
        ExpansionKind::InfectionSpread => faction == Faction::Pathogen,
        ExpansionKind::ImmuneResponse => faction == Faction::ImmuneSystem,
        ExpansionKind::CreateNewZone | ExpansionKind::ConquerZone => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(Rejection::ExpansionNotAllowed { faction })
    }
}

fn check_source(source: &Zone, player: PlayerId) -> std::result::Result<(), Rejection> {
    if source.is_held_by(player) {
        Ok(())
    } else {
        Err(Rejection::SourceNotHeld)
    }
}

fn check_target(
    kind: ExpansionKind,
    target: &Zone,
    player: PlayerId,
) -> std::result::Result<(), Rejection> {
    match kind {
        ExpansionKind::ConquerZone if !target.owner.is(player.opponent()) => {
            Err(Rejection::TargetNotEnemy)
        }
        ExpansionKind::InfectionSpread | ExpansionKind::ImmuneResponse
            if target.owner.is(player) =>
        {
            Err(Rejection::AlreadyControlled)
        }
        _ => Ok(()),
    }
}

/// Copy of the state with `cost` taken from `player`.
fn charge(
    state: &GameState,
    player: PlayerId,
    cost: &Resources,
) -> std::result::Result<GameState, Rejection> {
    if let Some((resource, required, available)) = state.resources_of(player).first_shortfall(cost)
    {
        return Err(Rejection::InsufficientResources {
            resource,
            required,
            available,
        });
    }
    let mut next = state.clone();
    let pool = next.resources_of_mut(player);
    *pool = pool.saturating_sub(*cost);
    Ok(next)
}

fn create_zone(state: &GameState, source: &Zone, zone_type: ZoneType) -> Attempt {
    let rules = &state.rules;
    if !source.is_border {
        return Err(Rejection::NotBorderZone.into());
    }
    if state.zones.len() >= rules.max_zones {
        return Err(Rejection::MaxZonesReached(rules.max_zones).into());
    }
    let dir = map::free_direction(&state.zones, source).ok_or(Rejection::NoFreeConnection)?;
    let player = state.current_player;
    let mut next = charge(state, player, &creation_cost(zone_type, player.faction(), rules))?;

    let id = next.next_zone_id();
    let (dx, dy) = dir.delta();
    let position: MapPos = source.position.offset(dx, dy);
    let mut zone = Zone::new(id, zone_type, position).with_border(true);
    zone.pool = zone_type
        .resource_generation()
        .scaled(rules.new_zone_stockpile_turns)
        .min(ZONE_POOL_CAP);
    next.zones.push(zone);
    map::link(&mut next.zones, source.id, dir, id)?;

    tracing::debug!(zone = %id, ?zone_type, x = position.x, y = position.y, "Zone created");
    Ok(next)
}

fn apply_effect(
    next: &mut GameState,
    kind: ExpansionKind,
    target_id: ZoneId,
    player: PlayerId,
) -> Result<()> {
    let defense_factor = percent(next.rules.infection_defense_percent);
    let antibody_factor = percent(next.rules.immune_antibody_percent);
    let antibody_cap = percent(next.rules.max_antibody_percent);
    let target = next.zone_mut(target_id)?;
    let claim_neutral = |zone: &mut Zone| {
        if zone.owner.is_neutral() {
            zone.owner = Owner::from(player);
        }
    };

    match kind {
        ExpansionKind::InfectionSpread => {
            target.defense_multiplier = target.defense_multiplier.saturating_mul(defense_factor);
            target.pool = target.pool.saturating_sub(INFECTION_DRAIN);
            claim_neutral(target);
            next.infection_level = raise(next.infection_level, SPREAD_LEVEL_GAIN);
        }
        ExpansionKind::ImmuneResponse => {
            target.antibody_multiplier = target
                .antibody_multiplier
                .saturating_mul(antibody_factor)
                .min(antibody_cap);
            claim_neutral(target);
            next.immune_response_level = raise(next.immune_response_level, SPREAD_LEVEL_GAIN);
        }
        ExpansionKind::ConquerZone => {
            target.owner = Owner::from(player);
            target.pool.energy /= 2;
            target.pool.nutrients /= 2;
            match player.faction() {
                Faction::Pathogen => {
                    next.infection_level = raise(next.infection_level, CONQUEST_LEVEL_GAIN);
                }
                Faction::ImmuneSystem => {
                    next.immune_response_level =
                        raise(next.immune_response_level, CONQUEST_LEVEL_GAIN);
                }
            }
        }
        ExpansionKind::CreateNewZone => {}
    }
    Ok(())
}

fn raise(level: u8, by: u8) -> u8 {
    level.saturating_add(by).min(MAX_LEVEL)
}
