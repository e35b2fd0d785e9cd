//! Game snapshot, actions, and the state-transition rules

use crate::board::{Board, Faction, Position, Terrain};
use crate::units::{Unit, UnitKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// POLICY CONSTANTS
// ============================================================================

pub const EXPAND_COST: i32 = 30;
pub const BUILD_COST: i32 = 40;
pub const ECONOMY_COST: i32 = 25;

/// Flat payout of the Economy action
pub const ECONOMY_GAIN: i32 = 40;

/// Per-turn income: flat base plus a cut per held territory
pub const INCOME_BASE: i32 = 10;
pub const INCOME_PER_TERRITORY: i32 = 2;

/// Starting treasury of every player
pub const STARTING_RESOURCES: i32 = 100;

// ============================================================================
// ACTIONS
// ============================================================================

/// One candidate action for a single turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Claim an unowned hex adjacent to held territory
    Expand(Position),
    /// Raise a warrior on held territory
    Build,
    /// Invest for a flat resource payout
    Economy,
    EndTurn,
}

impl Action {
    pub fn cost(self) -> i32 {
        match self {
            Action::Expand(_) => EXPAND_COST,
            Action::Build => BUILD_COST,
            Action::Economy => ECONOMY_COST,
            Action::EndTurn => 0,
        }
    }
}

// ============================================================================
// PLAYERS & SNAPSHOT
// ============================================================================

/// Per-player ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub faction: Faction,
    pub resources: i32,
    pub territories: u32,
    pub quantum_nodes: u32,
}

impl PlayerState {
    pub fn new(faction: Faction) -> Self {
        Self {
            faction,
            resources: STARTING_RESOURCES,
            territories: 0,
            quantum_nodes: 0,
        }
    }
}

/// The four scalar quantities the evaluator consumes, derived from one
/// player's slice of the snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub resources: i32,
    pub territories: u32,
    pub quantum_nodes: u32,
    pub units: u32,
}

/// Immutable game snapshot: board ownership, player ledgers, unit arena, and
/// the seat to move. Simulation clones a snapshot per action; nothing is
/// mutated in place across frames.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) players: Vec<PlayerState>,
    pub(crate) units: Vec<Unit>,
    pub(crate) to_move: usize,
    pub turn: u32,
}

impl GameState {
    pub fn new(board: Board, players: Vec<PlayerState>, units: Vec<Unit>) -> Self {
        assert!(!players.is_empty(), "a game needs at least one player");
        Self {
            board,
            players,
            units,
            to_move: 0,
            turn: 1,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Seat index of the player to move
    pub fn seat(&self) -> usize {
        self.to_move
    }

    pub fn current_faction(&self) -> Faction {
        self.players[self.to_move].faction
    }

    pub fn player(&self, faction: Faction) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.faction == faction)
    }

    fn player_mut(&mut self, faction: Faction) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.faction == faction)
    }

    pub fn unit_count(&self, faction: Faction) -> u32 {
        self.units.iter().filter(|u| u.faction == faction).count() as u32
    }

    pub fn aggregate(&self, faction: Faction) -> PlayerAggregate {
        let player = self
            .player(faction)
            .expect("faction not seated in this game");
        PlayerAggregate {
            resources: player.resources,
            territories: player.territories,
            quantum_nodes: player.quantum_nodes,
            units: self.unit_count(faction),
        }
    }

    /// Pass the seat to the next player; a full cycle advances the turn
    /// counter
    pub fn advance_turn(&mut self) {
        self.to_move = (self.to_move + 1) % self.players.len();
        if self.to_move == 0 {
            self.turn += 1;
        }
    }

    /// Start-of-turn income for every player. Driven by the turn loop, never
    /// by simulation.
    pub fn income_tick(&mut self) {
        for player in &mut self.players {
            player.resources += INCOME_BASE + INCOME_PER_TERRITORY * player.territories as i32;
        }
    }
}

// ============================================================================
// LEGALITY
// ============================================================================

/// Unowned hexes adjacent to `faction` territory, in sorted position order
pub fn expand_candidates(state: &GameState, faction: Faction) -> Vec<Position> {
    let board = state.board();
    let mut candidates: Vec<Position> = board
        .cells()
        .filter(|(_, cell)| cell.owner == Some(faction))
        .flat_map(|(pos, _)| board.neighbors(pos))
        .filter(|&n| board.owner_of(n).is_none())
        .collect();
    candidates.sort();
    candidates.dedup();
    candidates
}

/// Deterministic Expand target: a quantum node on the frontier if there is
/// one, else the first frontier hex
pub fn expand_target(state: &GameState, faction: Faction) -> Option<Position> {
    let candidates = expand_candidates(state, faction);
    candidates
        .iter()
        .copied()
        .find(|&p| state.board().terrain_at(p) == Some(Terrain::QuantumNode))
        .or_else(|| candidates.first().copied())
}

/// Legal candidates for `faction`, in fixed enumeration order. EndTurn is
/// always present and always last.
pub fn legal_actions(state: &GameState, faction: Faction) -> Vec<Action> {
    let player = state
        .player(faction)
        .expect("faction not seated in this game");

    let mut actions = Vec::with_capacity(4);
    if player.resources >= EXPAND_COST {
        if let Some(target) = expand_target(state, faction) {
            actions.push(Action::Expand(target));
        }
    }
    if player.resources >= BUILD_COST {
        actions.push(Action::Build);
    }
    if player.resources >= ECONOMY_COST {
        actions.push(Action::Economy);
    }
    actions.push(Action::EndTurn);
    actions
}

// ============================================================================
// STATE TRANSITION
// ============================================================================

/// State-transition oracle. Legality is the caller's responsibility
/// ([`legal_actions`]); an implementation applies the action as given.
pub trait Rules {
    fn apply_action(&self, state: &GameState, faction: Faction, action: Action) -> GameState;
}

/// The stock rule set
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl StandardRules {
    /// Where a built warrior musters: the first held cell in sorted position
    /// order
    fn build_site(state: &GameState, faction: Faction) -> Option<Position> {
        state
            .board()
            .cells()
            .filter(|(_, cell)| cell.owner == Some(faction))
            .map(|(pos, _)| pos)
            .min()
    }
}

impl Rules for StandardRules {
    fn apply_action(&self, state: &GameState, faction: Faction, action: Action) -> GameState {
        let mut next = state.clone();
        match action {
            Action::Expand(target) => {
                // A hex's displayed resource value is cosmetic: capture
                // yields territory count only.
                let is_node = next.board.terrain_at(target) == Some(Terrain::QuantumNode);
                next.board.set_owner(target, faction);
                let player = next
                    .player_mut(faction)
                    .expect("faction not seated in this game");
                player.resources -= EXPAND_COST;
                player.territories += 1;
                if is_node {
                    player.quantum_nodes += 1;
                }
            }
            Action::Build => {
                let site = Self::build_site(&next, faction);
                let player = next
                    .player_mut(faction)
                    .expect("faction not seated in this game");
                player.resources -= BUILD_COST;
                if let Some(site) = site {
                    next.units.push(Unit::new(UnitKind::Warrior, faction, site));
                }
            }
            Action::Economy => {
                let player = next
                    .player_mut(faction)
                    .expect("faction not seated in this game");
                player.resources -= ECONOMY_COST;
                player.resources += ECONOMY_GAIN;
            }
            Action::EndTurn => {}
        }
        next
    }
}

// ============================================================================
// TESTS
// ============================================================================
