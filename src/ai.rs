//! Minimax action selection with alpha-beta bounds

use crate::board::Faction;
use crate::eval::FuzzyEvaluator;
use crate::state::{legal_actions, Action, GameState, Rules};

/// Lookahead in simulated plies; the shipped opponents use two
pub const DEFAULT_DEPTH: u32 = 2;

/// Game tree the recursion runs on: candidate enumeration, child expansion,
/// leaf valuation, and which side a frame belongs to
trait TreeGame {
    type State;
    type Action: Copy;

    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;
    fn child(&self, state: &Self::State, action: Self::Action) -> Self::State;
    fn leaf_value(&self, state: &Self::State) -> f64;
    fn maximizing(&self, state: &Self::State) -> bool;
}

/// Minimax value of `state` with alpha-beta bounds. Prunes siblings once
/// `beta <= alpha`; the pruned value at the root is identical to the
/// exhaustive one.
fn minimax<G: TreeGame>(
    game: &G,
    state: &G::State,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
) -> f64 {
    if depth == 0 {
        return game.leaf_value(state);
    }

    let actions = game.actions(state);
    assert!(
        !actions.is_empty(),
        "action enumeration returned no candidates"
    );

    if game.maximizing(state) {
        let mut best = f64::NEG_INFINITY;
        for action in actions {
            let child = game.child(state, action);
            best = best.max(minimax(game, &child, depth - 1, alpha, beta));
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = f64::INFINITY;
        for action in actions {
            let child = game.child(state, action);
            best = best.min(minimax(game, &child, depth - 1, alpha, beta));
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Root frame: arg-max over first-level candidates, first seen winning ties
fn search_root<G: TreeGame>(game: &G, state: &G::State, depth: u32) -> (G::Action, f64) {
    assert!(depth >= 1, "root search depth must be at least 1");
    assert!(
        game.maximizing(state),
        "root frame must belong to the maximizing player"
    );

    let actions = game.actions(state);
    assert!(
        !actions.is_empty(),
        "action enumeration returned no candidates"
    );

    let mut alpha = f64::NEG_INFINITY;
    let mut best_action = actions[0];
    let mut best_value = f64::NEG_INFINITY;
    for action in actions {
        let child = game.child(state, action);
        let value = minimax(game, &child, depth - 1, alpha, f64::INFINITY);
        if value > best_value {
            best_value = value;
            best_action = action;
        }
        alpha = alpha.max(best_value);
    }
    (best_action, best_value)
}

/// Turn-level tree over real snapshots: one candidate action per ply, the
/// seat passing after every simulated action
struct TurnTree<'a, R: Rules> {
    rules: &'a R,
    evaluator: &'a FuzzyEvaluator,
    faction: Faction,
}

impl<R: Rules> TreeGame for TurnTree<'_, R> {
    type State = GameState;
    type Action = Action;

    fn actions(&self, state: &GameState) -> Vec<Action> {
        legal_actions(state, state.current_faction())
    }

    fn child(&self, state: &GameState, action: Action) -> GameState {
        let mut next = self
            .rules
            .apply_action(state, state.current_faction(), action);
        next.advance_turn();
        next
    }

    fn leaf_value(&self, state: &GameState) -> f64 {
        self.evaluator.decision_score(state, self.faction)
    }

    fn maximizing(&self, state: &GameState) -> bool {
        state.current_faction() == self.faction
    }
}

/// Minimax AI player
#[derive(Clone, Debug)]
pub struct MinimaxAi {
    pub faction: Faction,
    pub depth: u32,
    evaluator: FuzzyEvaluator,
}

impl MinimaxAi {
    pub fn new(faction: Faction, depth: u32) -> Self {
        Self {
            faction,
            depth,
            evaluator: FuzzyEvaluator::new(),
        }
    }

    /// Best action for the snapshot. Panics if the seat to move is not this
    /// faction's or `depth` is zero; those are caller bugs, not game states.
    pub fn choose_action<R: Rules>(&self, rules: &R, state: &GameState) -> Action {
        let tree = TurnTree {
            rules,
            evaluator: &self.evaluator,
            faction: self.faction,
        };
        let (action, _) = search_root(&tree, state, self.depth);
        action
    }

    /// Decision score of a snapshot from this faction's perspective
    pub fn evaluate(&self, state: &GameState) -> f64 {
        self.evaluator.decision_score(state, self.faction)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell, Position, Terrain};
    use crate::state::{PlayerState, StandardRules};
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    const EMPIRE: Faction = Faction::ExpansionEmpire;
    const COLLECTIVE: Faction = Faction::TechCollective;

    // ------------------------------------------------------------------
    // Reference implementations without pruning
    // ------------------------------------------------------------------

    fn exhaustive<G: TreeGame>(game: &G, state: &G::State, depth: u32) -> f64 {
        if depth == 0 {
            return game.leaf_value(state);
        }
        let values = game
            .actions(state)
            .into_iter()
            .map(|action| exhaustive(game, &game.child(state, action), depth - 1));
        if game.maximizing(state) {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }

    fn exhaustive_root<G: TreeGame>(game: &G, state: &G::State, depth: u32) -> (G::Action, f64) {
        let actions = game.actions(state);
        let mut best_action = actions[0];
        let mut best_value = f64::NEG_INFINITY;
        for action in actions {
            let value = exhaustive(game, &game.child(state, action), depth - 1);
            if value > best_value {
                best_value = value;
                best_action = action;
            }
        }
        (best_action, best_value)
    }

    // ------------------------------------------------------------------
    // Synthetic tree with injected leaf values
    // ------------------------------------------------------------------

    /// Perfect tree of fixed branching; node (level, index), leaves read from
    /// a value table, sides alternating by level
    struct FixedTree {
        branching: usize,
        leaves: Vec<f64>,
    }

    impl TreeGame for FixedTree {
        type State = (u32, usize);
        type Action = usize;

        fn actions(&self, _state: &(u32, usize)) -> Vec<usize> {
            (0..self.branching).collect()
        }

        fn child(&self, &(level, index): &(u32, usize), action: usize) -> (u32, usize) {
            (level + 1, index * self.branching + action)
        }

        fn leaf_value(&self, &(_, index): &(u32, usize)) -> f64 {
            self.leaves[index]
        }

        fn maximizing(&self, &(level, _): &(u32, usize)) -> bool {
            level % 2 == 0
        }
    }

    #[test]
    fn test_pruned_search_matches_exhaustive_on_synthetic_trees() {
        let branching = 3;
        let depth = 3;
        for seed in 0..40 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let leaves: Vec<f64> = (0..branching_pow(branching, depth))
                .map(|_| rng.gen_range(-100.0..100.0))
                .collect();
            let tree = FixedTree { branching, leaves };
            let root = (0, 0);

            let (pruned_action, pruned_value) = search_root(&tree, &root, depth);
            let (full_action, full_value) = exhaustive_root(&tree, &root, depth);
            assert_eq!(pruned_action, full_action, "seed {}", seed);
            assert_eq!(pruned_value, full_value, "seed {}", seed);
        }
    }

    fn branching_pow(branching: usize, depth: u32) -> usize {
        branching.pow(depth)
    }

    // ------------------------------------------------------------------
    // Real snapshots
    // ------------------------------------------------------------------

    fn cell(terrain: Terrain, owner: Option<Faction>) -> Cell {
        Cell { terrain, owner }
    }

    /// Small two-player map with a claimable quantum node near the Empire
    fn small_state(empire_resources: i32, collective_resources: i32) -> GameState {
        let mut board = Board::new();
        board.insert(Position::new(0, 0), cell(Terrain::Plains, Some(EMPIRE)));
        board.insert(Position::new(1, 0), cell(Terrain::QuantumNode, None));
        board.insert(Position::new(0, 1), cell(Terrain::Plains, None));
        board.insert(Position::new(3, 0), cell(Terrain::Plains, Some(COLLECTIVE)));
        board.insert(Position::new(3, 1), cell(Terrain::Desert, None));

        let mut players = vec![PlayerState::new(EMPIRE), PlayerState::new(COLLECTIVE)];
        players[0].resources = empire_resources;
        players[0].territories = 1;
        players[1].resources = collective_resources;
        players[1].territories = 1;
        GameState::new(board, players, vec![])
    }

    #[test]
    fn test_pruned_search_matches_exhaustive_on_snapshots() {
        let rules = StandardRules;
        let evaluator = FuzzyEvaluator::new();
        for (mine, theirs) in [(100, 100), (35, 80), (250, 40), (60, 250)] {
            let state = small_state(mine, theirs);
            let tree = TurnTree {
                rules: &rules,
                evaluator: &evaluator,
                faction: EMPIRE,
            };
            for depth in 1..=3 {
                let (pruned_action, pruned_value) = search_root(&tree, &state, depth);
                let (full_action, full_value) = exhaustive_root(&tree, &state, depth);
                assert_eq!(pruned_action, full_action, "depth {}", depth);
                assert_eq!(pruned_value, full_value, "depth {}", depth);
            }
        }
    }

    #[test]
    fn test_chosen_action_is_legal() {
        let state = small_state(100, 100);
        let ai = MinimaxAi::new(EMPIRE, DEFAULT_DEPTH);
        let action = ai.choose_action(&StandardRules, &state);
        assert!(legal_actions(&state, EMPIRE).contains(&action));
    }

    #[test]
    fn test_broke_player_ends_turn() {
        let state = small_state(10, 100);
        let ai = MinimaxAi::new(EMPIRE, DEFAULT_DEPTH);
        assert_eq!(ai.choose_action(&StandardRules, &state), Action::EndTurn);
    }

    #[test]
    #[should_panic(expected = "root search depth")]
    fn test_zero_depth_root_is_a_caller_bug() {
        let state = small_state(100, 100);
        let ai = MinimaxAi::new(EMPIRE, 0);
        ai.choose_action(&StandardRules, &state);
    }

    #[test]
    #[should_panic(expected = "maximizing player")]
    fn test_wrong_seat_root_is_a_caller_bug() {
        let state = small_state(100, 100);
        let ai = MinimaxAi::new(COLLECTIVE, DEFAULT_DEPTH);
        ai.choose_action(&StandardRules, &state);
    }

    #[test]
    fn test_evaluate_matches_decision_score() {
        let state = small_state(300, 100);
        let ai = MinimaxAi::new(EMPIRE, DEFAULT_DEPTH);
        let eval = FuzzyEvaluator::new();
        assert_eq!(ai.evaluate(&state), eval.decision_score(&state, EMPIRE));
    }
}
