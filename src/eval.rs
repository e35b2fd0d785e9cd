//! Fuzzy position evaluation
//!
//! Four game dimensions (resources, territories, quantum nodes, units) are
//! fuzzified into linguistic memberships, run through a fixed rule base, and
//! collapsed back into one comparable score. Pure and deterministic.

use crate::board::Faction;
use crate::state::{GameState, PlayerAggregate};
use serde::{Deserialize, Serialize};

/// Crisp output tags of the rule base
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Rating {
    pub fn crisp(self) -> f64 {
        match self {
            Rating::Poor => 150.0,
            Rating::Fair => 400.0,
            Rating::Good => 700.0,
            Rating::Excellent => 950.0,
        }
    }
}

/// Score substituted when no rule fires (midpoint of the output scale)
pub const NEUTRAL_SCORE: f64 = 550.0;

// Soft domain bounds; inputs clamp here before fuzzification
const RESOURCE_MAX: f64 = 600.0;
const TERRITORY_MAX: f64 = 18.0;
const NODE_MAX: f64 = 5.0;
const UNIT_MAX: f64 = 20.0;

// ============================================================================
// MEMBERSHIP FUNCTIONS
// ============================================================================

fn triangle(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x <= a || x >= c {
        0.0
    } else if x <= b {
        (x - a) / (b - a)
    } else {
        (c - x) / (c - b)
    }
}

/// Shoulders (a == b or c == d) hold full membership at the clamped domain
/// edges.
fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if (b..=c).contains(&x) {
        1.0
    } else if x > a && x < b {
        (x - a) / (b - a)
    } else if x > c && x < d {
        (d - x) / (d - c)
    } else {
        0.0
    }
}

struct ResourceLevel {
    low: f64,
    medium: f64,
    high: f64,
}

struct TerritorySpread {
    few: f64,
    moderate: f64,
    many: f64,
}

struct NodeControl {
    some: f64,
    many: f64,
}

struct UnitStrength {
    weak: f64,
    balanced: f64,
    strong: f64,
}

fn resource_level(resources: i32) -> ResourceLevel {
    let r = (resources as f64).clamp(0.0, RESOURCE_MAX);
    ResourceLevel {
        low: trapezoid(r, 0.0, 0.0, 120.0, 240.0),
        medium: triangle(r, 160.0, 300.0, 440.0),
        high: trapezoid(r, 360.0, 480.0, 600.0, 600.0),
    }
}

fn territory_spread(territories: u32) -> TerritorySpread {
    let t = (territories as f64).clamp(0.0, TERRITORY_MAX);
    TerritorySpread {
        few: trapezoid(t, 0.0, 0.0, 4.0, 7.0),
        moderate: triangle(t, 5.0, 9.0, 13.0),
        many: trapezoid(t, 11.0, 14.0, 18.0, 18.0),
    }
}

fn node_control(nodes: u32) -> NodeControl {
    let n = (nodes as f64).clamp(0.0, NODE_MAX);
    NodeControl {
        some: triangle(n, 1.0, 2.5, 4.0),
        many: trapezoid(n, 3.0, 4.0, 5.0, 5.0),
    }
}

fn unit_strength(units: u32) -> UnitStrength {
    let u = (units as f64).clamp(0.0, UNIT_MAX);
    UnitStrength {
        weak: trapezoid(u, 0.0, 0.0, 4.0, 7.0),
        balanced: triangle(u, 5.0, 8.5, 12.0),
        strong: trapezoid(u, 10.0, 13.0, 20.0, 20.0),
    }
}

// ============================================================================
// INFERENCE
// ============================================================================

/// Weighted average of fired rule strengths against their crisp outputs.
/// `None` when nothing fired.
pub fn defuzzify(fired: &[(f64, Rating)]) -> Option<f64> {
    let total: f64 = fired.iter().map(|&(strength, _)| strength).sum();
    if total <= 1e-9 {
        return None;
    }
    let weighted: f64 = fired
        .iter()
        .map(|&(strength, rating)| strength * rating.crisp())
        .sum();
    Some(weighted / total)
}

/// Stateless fuzzy inference scorer
#[derive(Clone, Copy, Debug, Default)]
pub struct FuzzyEvaluator;

impl FuzzyEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Fuzzy inference score for one player's aggregates, before crisp
    /// bonuses
    pub fn score(&self, agg: &PlayerAggregate) -> f64 {
        defuzzify(&self.fire_rules(agg)).unwrap_or(NEUTRAL_SCORE)
    }

    /// The fixed policy rule base. Multi-input antecedents combine by min
    /// (AND); rules that do not fire are dropped.
    fn fire_rules(&self, agg: &PlayerAggregate) -> Vec<(f64, Rating)> {
        let res = resource_level(agg.resources);
        let ter = territory_spread(agg.territories);
        let qn = node_control(agg.quantum_nodes);
        let un = unit_strength(agg.units);

        let rules = [
            // quantum-node priority
            (qn.many, Rating::Excellent),
            (qn.some.min(ter.many), Rating::Good),
            // resources x territories synergy
            (res.high.min(ter.many), Rating::Excellent),
            (res.high.min(ter.moderate), Rating::Good),
            (res.medium.min(ter.many), Rating::Good),
            (res.medium.min(ter.moderate), Rating::Fair),
            (res.low.min(ter.few), Rating::Poor),
            // unit impact
            (un.strong, Rating::Good),
            (un.balanced.min(ter.moderate), Rating::Good),
            (un.balanced.min(res.high), Rating::Good),
            (un.weak, Rating::Fair),
            // economy synergy
            (res.high.min(un.strong), Rating::Excellent),
            (res.medium.min(un.balanced), Rating::Good),
            // single-input fallbacks
            (res.low, Rating::Fair),
            (res.high, Rating::Good),
            (ter.few, Rating::Fair),
            (ter.many, Rating::Good),
        ];

        rules
            .iter()
            .copied()
            .filter(|&(strength, _)| strength > 0.0)
            .collect()
    }

    /// Crisp bonuses added after defuzzification
    pub fn crisp_bonus(&self, agg: &PlayerAggregate) -> f64 {
        let mut bonus = 0.0;
        if agg.territories >= 15 {
            bonus += 50.0;
        }
        if agg.quantum_nodes >= 4 {
            bonus += 80.0;
        }
        if agg.resources >= 450 {
            bonus += 40.0;
        }
        if agg.resources >= 250 {
            bonus += 20.0;
        }
        bonus
    }

    /// Fuzzy score plus crisp bonuses for one player
    pub fn player_score(&self, agg: &PlayerAggregate) -> f64 {
        self.score(agg) + self.crisp_bonus(agg)
    }

    /// Decision score for `faction`: its own score measured against the mean
    /// opponent score
    pub fn decision_score(&self, state: &GameState, faction: Faction) -> f64 {
        let mine = self.player_score(&state.aggregate(faction));
        let opponents: Vec<f64> = state
            .players()
            .iter()
            .filter(|p| p.faction != faction)
            .map(|p| self.player_score(&state.aggregate(p.faction)))
            .collect();
        if opponents.is_empty() {
            mine
        } else {
            mine - opponents.iter().sum::<f64>() / opponents.len() as f64
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
