//! Zone connectivity.
//!
//! Adjacency is defined by the connection slots of each zone. Every link is
//! written to both endpoints, so `a` connects to `b` exactly when `b`
//! connects to `a`; [`validate_connections`] checks that this holds for a
//! whole map (for example after deserializing a snapshot).

use std::collections::{HashMap, HashSet};

use crate::error::{GameError, Result};
use crate::math::MapPos;
use crate::zone::{Direction, Zone, ZoneId};

/// Index of the zone with `id`.
#[must_use]
pub fn zone_index(zones: &[Zone], id: ZoneId) -> Option<usize> {
    zones.iter().position(|zone| zone.id == id)
}

/// Borrow the zone with `id`.
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`] if no zone has that id.
pub fn find_zone(zones: &[Zone], id: ZoneId) -> Result<&Zone> {
    zones
        .iter()
        .find(|zone| zone.id == id)
        .ok_or(GameError::ZoneNotFound(id))
}

/// Whether two zones are linked. Symmetric by construction.
#[must_use]
pub fn are_adjacent(zones: &[Zone], a: ZoneId, b: ZoneId) -> bool {
    if a == b {
        return false;
    }
    let forward = zones.iter().any(|z| z.id == a && z.connects_to(b));
    let backward = zones.iter().any(|z| z.id == b && z.connects_to(a));
    forward && backward
}

/// Link `a` to `b` in direction `dir` (and `b` back to `a`).
///
/// # Errors
///
/// Returns [`GameError::ZoneNotFound`] if either zone is missing and
/// [`GameError::InvalidState`] if a slot is already taken by another zone.
pub fn link(zones: &mut [Zone], a: ZoneId, dir: Direction, b: ZoneId) -> Result<()> {
    let ia = zone_index(zones, a).ok_or(GameError::ZoneNotFound(a))?;
    let ib = zone_index(zones, b).ok_or(GameError::ZoneNotFound(b))?;
    if ia == ib {
        return Err(GameError::InvalidState(format!("zone {a} cannot link to itself")));
    }

    let back = dir.opposite();
    for (index, slot, target) in [(ia, dir, b), (ib, back, a)] {
        if let Some(existing) = zones[index].neighbour(slot) {
            if existing != target {
                return Err(GameError::InvalidState(format!(
                    "zone {} already has {existing} to the {slot:?}",
                    zones[index].id
                )));
            }
        }
    }

    zones[ia].connections[dir.slot()] = Some(b);
    zones[ib].connections[back.slot()] = Some(a);
    Ok(())
}

/// Connect every pair of zones on orthogonally adjacent map positions.
///
/// # Errors
///
/// Returns [`GameError::InvalidState`] if two zones share a position.
pub fn connect_by_position(zones: &mut [Zone]) -> Result<()> {
    let mut by_pos: HashMap<MapPos, ZoneId> = HashMap::with_capacity(zones.len());
    for zone in zones.iter() {
        if let Some(other) = by_pos.insert(zone.position, zone.id) {
            return Err(GameError::InvalidState(format!(
                "zones {other} and {} share position ({}, {})",
                zone.id, zone.position.x, zone.position.y
            )));
        }
    }

    let ids: Vec<(ZoneId, MapPos)> = zones.iter().map(|z| (z.id, z.position)).collect();
    for (id, pos) in ids {
        // East and South cover every pair once
        for dir in [Direction::East, Direction::South] {
            let (dx, dy) = dir.delta();
            if let Some(&other) = by_pos.get(&pos.offset(dx, dy)) {
                link(zones, id, dir, other)?;
            }
        }
    }
    Ok(())
}

/// First direction (N, E, S, W) from `origin` where a new zone could go.
///
/// The slot must be empty and the map position behind it unoccupied.
#[must_use]
pub fn free_direction(zones: &[Zone], origin: &Zone) -> Option<Direction> {
    let taken: HashSet<MapPos> = zones.iter().map(|z| z.position).collect();
    Direction::ALL.into_iter().find(|&dir| {
        let (dx, dy) = dir.delta();
        origin.neighbour(dir).is_none() && !taken.contains(&origin.position.offset(dx, dy))
    })
}

/// Check zone ids are unique and every link is mirrored.
///
/// # Errors
///
/// Returns [`GameError::InvalidState`] describing the first violation.
pub fn validate_connections(zones: &[Zone]) -> Result<()> {
    let mut seen = HashSet::with_capacity(zones.len());
    for zone in zones {
        if !seen.insert(zone.id) {
            return Err(GameError::InvalidState(format!("duplicate zone id {}", zone.id)));
        }
    }

    for zone in zones {
        for dir in Direction::ALL {
            let Some(other_id) = zone.neighbour(dir) else {
                continue;
            };
            let other = find_zone(zones, other_id).map_err(|_| {
                GameError::InvalidState(format!("zone {} links to missing {other_id}", zone.id))
            })?;
            if other.neighbour(dir.opposite()) != Some(zone.id) {
                return Err(GameError::InvalidState(format!(
                    "link {} -> {other_id} is not mirrored",
                    zone.id
                )));
            }
        }
    }
    Ok(())
}
