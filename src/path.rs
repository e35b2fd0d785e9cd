//! A* pathfinding over the hex board

use crate::board::{Board, Position};
use crate::units::Unit;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Surcharge for entering territory held by a rival faction
pub const ENEMY_TERRITORY_FACTOR: f64 = 1.5;

/// Route lookup failure
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("hex ({}, {}) is not on the board", pos.q, pos.r)]
    OffBoard { pos: Position },
    #[error("no route from ({}, {}) to ({}, {})", start.q, start.r, goal.q, goal.r)]
    Unreachable { start: Position, goal: Position },
}

/// Cost for `unit` to enter the hex at `to`: terrain base cost scaled by the
/// unit's kind, half again as much on rival territory. `None` off the board.
pub fn entry_cost(board: &Board, unit: &Unit, to: Position) -> Option<f64> {
    let cell = board.cell(to)?;
    let mut cost = cell.terrain.base_cost() * unit.kind.terrain_factor(cell.terrain);
    if cell.owner.map_or(false, |owner| owner != unit.faction) {
        cost *= ENEMY_TERRITORY_FACTOR;
    }
    Some(cost)
}

/// Frontier entry ordered for a min-heap: lowest f first, insertion order
/// breaking ties
#[derive(Clone, Copy, Debug)]
struct Frontier {
    f: f64,
    seq: u64,
    pos: Position,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Least-cost route from `start` to `goal` for `unit`, endpoints included.
///
/// The heuristic is hex distance scaled by the unit's cheapest possible step,
/// so it never overestimates the remaining cost and the returned route is
/// optimal. Same inputs always produce the same route.
pub fn find_path(
    board: &Board,
    start: Position,
    goal: Position,
    unit: &Unit,
) -> Result<Vec<Position>, PathError> {
    if !board.contains(start) {
        return Err(PathError::OffBoard { pos: start });
    }
    if !board.contains(goal) {
        return Err(PathError::OffBoard { pos: goal });
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let step = unit.kind.cheapest_step();
    let estimate = |pos: Position| pos.distance_to(goal) as f64 * step;

    let mut open = BinaryHeap::new();
    let mut best_cost: FxHashMap<Position, f64> = FxHashMap::default();
    let mut came_from: FxHashMap<Position, Position> = FxHashMap::default();
    let mut closed: FxHashSet<Position> = FxHashSet::default();
    let mut seq = 0u64;

    best_cost.insert(start, 0.0);
    open.push(Frontier {
        f: estimate(start),
        seq,
        pos: start,
    });

    while let Some(Frontier { pos: current, .. }) = open.pop() {
        if closed.contains(&current) {
            continue;
        }
        if current == goal {
            return Ok(reconstruct(&came_from, start, goal));
        }
        closed.insert(current);

        let through = best_cost[&current];
        for next in board.neighbors(current) {
            if closed.contains(&next) {
                continue;
            }
            let cost = match entry_cost(board, unit, next) {
                Some(c) => c,
                None => continue,
            };
            let tentative = through + cost;
            if best_cost.get(&next).map_or(true, |&known| tentative < known) {
                best_cost.insert(next, tentative);
                came_from.insert(next, current);
                seq += 1;
                open.push(Frontier {
                    f: tentative + estimate(next),
                    seq,
                    pos: next,
                });
            }
        }
    }

    Err(PathError::Unreachable { start, goal })
}

fn reconstruct(
    came_from: &FxHashMap<Position, Position>,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut route = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        route.push(current);
    }
    route.reverse();
    route
}

// ============================================================================
// TESTS
// ============================================================================
