//! Unit kinds and their movement profiles

use crate::board::{Faction, Position, Terrain};
use serde::{Deserialize, Serialize};

/// Unit kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Scout,
    Warrior,
    Engineer,
    QuantumSpecialist,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Scout,
        UnitKind::Warrior,
        UnitKind::Engineer,
        UnitKind::QuantumSpecialist,
    ];

    pub fn max_health(self) -> u32 {
        match self {
            UnitKind::Scout => 50,
            UnitKind::Warrior => 100,
            UnitKind::Engineer => 75,
            UnitKind::QuantumSpecialist => 60,
        }
    }

    pub fn max_movement(self) -> u32 {
        match self {
            UnitKind::Scout => 3,
            UnitKind::Warrior => 2,
            UnitKind::Engineer => 2,
            UnitKind::QuantumSpecialist => 2,
        }
    }

    /// Multiplier this kind applies to the base cost of entering `terrain`.
    /// Scouts travel light everywhere; engineers know their way through
    /// mountains.
    pub fn terrain_factor(self, terrain: Terrain) -> f64 {
        match (self, terrain) {
            (UnitKind::Scout, _) => 0.8,
            (UnitKind::Engineer, Terrain::Mountain) => 0.7,
            _ => 1.0,
        }
    }

    /// Cheapest possible cost of a single step for this kind, over all
    /// terrains, ignoring ownership surcharges.
    pub fn cheapest_step(self) -> f64 {
        Terrain::ALL
            .iter()
            .map(|&t| t.base_cost() * self.terrain_factor(t))
            .fold(f64::INFINITY, f64::min)
    }
}

/// A unit in play
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub faction: Faction,
    pub position: Position,
    pub health: u32,
    pub movement_points: u32,
}

impl Unit {
    /// Fresh unit at full health and movement
    pub fn new(kind: UnitKind, faction: Faction, position: Position) -> Self {
        Self {
            kind,
            faction,
            position,
            health: kind.max_health(),
            movement_points: kind.max_movement(),
        }
    }
}
