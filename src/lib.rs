//! QTW Core - Decision engine for Quantum Territory Wars
//!
//! This crate provides the turn-decision core of the game:
//! - Board geometry (hex grid with axial coordinates), terrain, and ownership
//! - Unit kinds and their movement profiles
//! - A* pathfinding with unit- and terrain-dependent step costs
//! - Fuzzy-inference position evaluation
//! - Minimax action selection with alpha-beta bounds
//! - Seeded scenario generation and JSON persistence
//!
//! Rendering, input handling, and the turn loop live in the surrounding
//! application; they drive this crate through immutable [`state::GameState`]
//! snapshots and the [`state::Rules`] transition trait.

pub mod board;
pub mod units;
pub mod state;
pub mod path;
pub mod eval;
pub mod ai;
pub mod scenario;

// Re-exports for convenient access
pub use ai::MinimaxAi;
pub use board::{Board, Cell, Faction, Position, Terrain, DIRECTIONS};
pub use eval::{defuzzify, FuzzyEvaluator, Rating, NEUTRAL_SCORE};
pub use path::{entry_cost, find_path, PathError, ENEMY_TERRITORY_FACTOR};
pub use scenario::Scenario;
pub use state::{
    legal_actions, Action, GameState, PlayerAggregate, PlayerState, Rules, StandardRules,
};
pub use units::{Unit, UnitKind};
