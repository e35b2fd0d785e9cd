//! Hex board: axial geometry, terrain, and territory ownership

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub q: i32,
    pub r: i32,
}

impl Position {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Hex distance between two positions
    pub fn distance_to(&self, other: Position) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        dq.max(dr).max(ds)
    }

    /// The six adjacent positions, unclipped
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        DIRECTIONS
            .iter()
            .map(move |&(dq, dr)| Position::new(self.q + dq, self.r + dr))
    }
}

/// Direction vectors in axial coordinates (dq, dr)
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Terrain tag of a hex, fixed at board generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Forest,
    Mountain,
    Desert,
    Water,
    QuantumNode,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Plains,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Desert,
        Terrain::Water,
        Terrain::QuantumNode,
    ];

    /// Base traversal cost for entering a hex of this terrain
    pub fn base_cost(self) -> f64 {
        match self {
            Terrain::Plains => 1.0,
            Terrain::Forest => 1.5,
            Terrain::Mountain => 2.0,
            Terrain::Desert => 1.3,
            Terrain::Water => 3.0,
            Terrain::QuantumNode => 1.0,
        }
    }
}

/// Playing faction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    ExpansionEmpire,
    TechCollective,
    AdaptiveAlliance,
}

impl Faction {
    pub const ALL: [Faction; 3] = [
        Faction::ExpansionEmpire,
        Faction::TechCollective,
        Faction::AdaptiveAlliance,
    ];
}

/// One hex of the board. Terrain never changes after generation; ownership
/// only moves from unowned to owned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    pub owner: Option<Faction>,
}

/// Sparse hex board (position -> cell)
#[derive(Clone, Debug, Default)]
pub struct Board {
    cells: FxHashMap<Position, Cell>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: Position, cell: Cell) {
        self.cells.insert(pos, cell);
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.cells.get_mut(&pos)
    }

    pub fn terrain_at(&self, pos: Position) -> Option<Terrain> {
        self.cells.get(&pos).map(|c| c.terrain)
    }

    pub fn owner_of(&self, pos: Position) -> Option<Faction> {
        self.cells.get(&pos).and_then(|c| c.owner)
    }

    pub fn set_owner(&mut self, pos: Position, faction: Faction) {
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.owner = Some(faction);
        }
    }

    /// Adjacent positions clipped to the board
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        let ns: Vec<Position> = pos.neighbors().collect();
        ns.into_iter().filter(move |n| self.cells.contains_key(n))
    }

    /// Iterate all cells (unordered)
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells.iter().map(|(&pos, cell)| (pos, cell))
    }
}
