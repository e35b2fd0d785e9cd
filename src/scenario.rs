//! Scenario setup: seeded random maps and JSON persistence
//!
//! A [`Scenario`] is the flat, serializable description of a full game setup;
//! the engine itself only ever sees the [`GameState`] built from it.

use crate::board::{Board, Cell, Faction, Position, Terrain};
use crate::state::{GameState, PlayerState};
use crate::units::{Unit, UnitKind};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quantum nodes per map
pub const QUANTUM_NODE_COUNT: usize = 5;

/// Default triangular map edge length
pub const DEFAULT_MAP_SIZE: i32 = 11;

/// Preferred minimum hex separation between quantum nodes
const NODE_MIN_SEPARATION: i32 = 3;

/// Preferred minimum hex separation between starting positions
const START_MIN_SEPARATION: i32 = 6;

/// Flat description of a game setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub cells: Vec<(Position, Cell)>,
    pub players: Vec<PlayerState>,
    pub units: Vec<Unit>,
    pub seat_to_move: usize,
    pub turn: u32,
}

impl Scenario {
    /// Build the engine-facing snapshot
    pub fn to_game_state(&self) -> GameState {
        let mut board = Board::new();
        for &(pos, cell) in &self.cells {
            board.insert(pos, cell);
        }
        GameState {
            board,
            players: self.players.clone(),
            units: self.units.clone(),
            to_move: self.seat_to_move,
            turn: self.turn,
        }
    }

    /// Capture a snapshot back into a flat description
    pub fn from_state(name: &str, state: &GameState) -> Self {
        let mut cells: Vec<(Position, Cell)> =
            state.board().cells().map(|(pos, cell)| (pos, *cell)).collect();
        cells.sort_by_key(|&(pos, _)| pos);
        Self {
            name: name.to_string(),
            cells,
            players: state.players().to_vec(),
            units: state.units().to_vec(),
            seat_to_move: state.seat(),
            turn: state.turn,
        }
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate a random map and seat `factions` on it. Fully determined by
    /// `seed`: same seed, same scenario.
    pub fn random(name: &str, size: i32, factions: &[Faction], seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        // triangular axial region with stochastic terrain
        let mut board = Board::new();
        for q in 0..size {
            for r in 0..(size - q) {
                board.insert(
                    Position::new(q, r),
                    Cell {
                        terrain: random_basic_terrain(&mut rng),
                        owner: None,
                    },
                );
            }
        }

        place_quantum_nodes(&mut board, &mut rng);
        let starts = pick_starts(&board, factions.len(), &mut rng);

        let mut players = Vec::with_capacity(factions.len());
        let mut units = Vec::with_capacity(factions.len());
        for (i, &faction) in factions.iter().enumerate() {
            let mut player = PlayerState::new(faction);
            if let Some(&start) = starts.get(i) {
                board.set_owner(start, faction);
                player.territories = 1;
                if board.terrain_at(start) == Some(Terrain::QuantumNode) {
                    player.quantum_nodes = 1;
                }
                units.push(Unit::new(UnitKind::Scout, faction, start));
            }
            players.push(player);
        }

        let mut cells: Vec<(Position, Cell)> =
            board.cells().map(|(pos, cell)| (pos, *cell)).collect();
        cells.sort_by_key(|&(pos, _)| pos);

        Self {
            name: name.to_string(),
            cells,
            players,
            units,
            seat_to_move: 0,
            turn: 1,
        }
    }

    /// Named three-faction fixture on the default map
    pub fn skirmish() -> Self {
        Self::random("skirmish", DEFAULT_MAP_SIZE, &Faction::ALL, 12345)
    }
}

/// Stochastic terrain mix; water kept relatively rare
fn random_basic_terrain(rng: &mut ChaCha8Rng) -> Terrain {
    let p: f64 = rng.gen();
    if p < 0.42 {
        Terrain::Plains
    } else if p < 0.62 {
        Terrain::Forest
    } else if p < 0.78 {
        Terrain::Mountain
    } else if p < 0.92 {
        Terrain::Desert
    } else {
        Terrain::Water
    }
}

/// Convert exactly [`QUANTUM_NODE_COUNT`] non-water hexes into quantum nodes,
/// spread out where the map allows it
fn place_quantum_nodes(board: &mut Board, rng: &mut ChaCha8Rng) {
    let mut candidates: Vec<Position> = board
        .cells()
        .filter(|(_, cell)| cell.terrain != Terrain::Water)
        .map(|(pos, _)| pos)
        .collect();
    candidates.sort();
    candidates.shuffle(rng);

    let mut chosen: Vec<Position> = Vec::new();
    for &pos in &candidates {
        if chosen.len() >= QUANTUM_NODE_COUNT {
            break;
        }
        if chosen
            .iter()
            .all(|&c| pos.distance_to(c) >= NODE_MIN_SEPARATION)
        {
            chosen.push(pos);
        }
    }
    // relax spacing when the map cannot fit five spread nodes
    for &pos in &candidates {
        if chosen.len() >= QUANTUM_NODE_COUNT {
            break;
        }
        if !chosen.contains(&pos) {
            chosen.push(pos);
        }
    }

    for &pos in &chosen {
        if let Some(cell) = board.cell_mut(pos) {
            cell.terrain = Terrain::QuantumNode;
        }
    }
}

/// Pick spread-out starting hexes, avoiding water and quantum nodes where
/// possible
fn pick_starts(board: &Board, count: usize, rng: &mut ChaCha8Rng) -> Vec<Position> {
    let mut open: Vec<Position> = board
        .cells()
        .filter(|(_, cell)| cell.terrain != Terrain::Water)
        .map(|(pos, _)| pos)
        .collect();
    open.sort();
    open.shuffle(rng);

    let mut chosen: Vec<Position> = Vec::new();
    for &pos in &open {
        if chosen.len() >= count {
            break;
        }
        if board.terrain_at(pos) == Some(Terrain::QuantumNode) {
            continue;
        }
        if chosen
            .iter()
            .all(|&c| pos.distance_to(c) >= START_MIN_SEPARATION)
        {
            chosen.push(pos);
        }
    }
    // relax spacing, then allow node hexes as a last resort
    for &pos in &open {
        if chosen.len() >= count {
            break;
        }
        if board.terrain_at(pos) != Some(Terrain::QuantumNode) && !chosen.contains(&pos) {
            chosen.push(pos);
        }
    }
    for &pos in &open {
        if chosen.len() >= count {
            break;
        }
        if !chosen.contains(&pos) {
            chosen.push(pos);
        }
    }
    chosen
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skirmish_setup() {
        let scenario = Scenario::skirmish();
        // triangular 11-map has 11 + 10 + ... + 1 cells
        assert_eq!(scenario.cells.len(), 66);

        let nodes = scenario
            .cells
            .iter()
            .filter(|(_, cell)| cell.terrain == Terrain::QuantumNode)
            .count();
        assert_eq!(nodes, QUANTUM_NODE_COUNT);

        assert_eq!(scenario.players.len(), 3);
        assert_eq!(scenario.units.len(), 3);
        for player in &scenario.players {
            assert_eq!(player.resources, 100);
            assert_eq!(player.territories, 1);
        }

        // every faction starts on its own hex with a scout on it
        for unit in &scenario.units {
            assert_eq!(unit.kind, UnitKind::Scout);
            let (_, cell) = scenario
                .cells
                .iter()
                .find(|&&(pos, _)| pos == unit.position)
                .unwrap();
            assert_eq!(cell.owner, Some(unit.faction));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = Scenario::random("a", 7, &Faction::ALL, 42);
        let b = Scenario::random("a", 7, &Faction::ALL, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_state_round_trip() {
        let scenario = Scenario::random("round", 6, &Faction::ALL, 5);
        let state = scenario.to_game_state();
        assert_eq!(state.current_faction(), Faction::ExpansionEmpire);
        assert_eq!(state.turn, 1);

        let back = Scenario::from_state("round", &state);
        assert_eq!(back, scenario);
    }

    #[test]
    fn test_json_round_trip() {
        let scenario = Scenario::random("json", 5, &Faction::ALL[..2], 8);
        let text = serde_json::to_string_pretty(&scenario).unwrap();
        let parsed: Scenario = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, scenario);
    }
}
