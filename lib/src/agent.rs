use tracing::{debug, warn};

use crate::eval::evaluate;
use crate::movegen::successors;
use crate::search::{AlphaBeta, SearchConfig, SearchStats};
use crate::state::{Action, Arena, GameState, Side};

/// Trait that defines a combatant's decision-making interface.
pub trait Agent: Send + Sync {
    /// Returns the name of this agent for display purposes.
    fn name(&self) -> &str;

    /// Choose an action for `side` in the given state.
    fn choose_move(&self, arena: &Arena, state: &GameState, side: Side) -> Action;
}

impl Agent for Box<dyn Agent> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_move(&self, arena: &Arena, state: &GameState, side: Side) -> Action {
        (**self).choose_move(arena, state, side)
    }
}

/// Outcome of one root decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// Score of the chosen subtree; `None` when no root branch could be scored.
    pub score: Option<i32>,
    pub stats: SearchStats,
}

impl Decision {
    fn pass() -> Self {
        Self {
            action: Action::Pass,
            score: None,
            stats: SearchStats::default(),
        }
    }
}

/// Searches every root successor with alpha-beta and keeps the best.
pub struct MinimaxAgent {
    name: String,
    config: SearchConfig,
}

impl MinimaxAgent {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            name: "Minimax".to_string(),
            config,
        }
    }

    /// Expands the root once, then scores each child with the same side still
    /// to move. The first child wins ties. One search is shared by all root
    /// children, so the node limit covers the whole decision.
    pub fn decide(&self, arena: &Arena, state: &GameState, side: Side) -> Decision {
        let roots = match successors(arena, state, side) {
            Ok(roots) => roots,
            Err(e) => {
                warn!(error = %e, %side, "root expansion failed, passing");
                return Decision::pass();
            }
        };

        let mut search = AlphaBeta::new(arena, side, self.config);
        let mut best: Option<(i32, Action)> = None;
        for root in &roots {
            let Some(score) = search.search(&root.state, self.config.depth, side) else {
                continue;
            };
            debug!(action = %root.action, score, "root branch scored");
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, root.action));
            }
        }

        let stats = search.stats();
        let Some((score, action)) = best else {
            return Decision {
                stats,
                ..Decision::pass()
            };
        };
        debug!(
            %action,
            score,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            skipped = stats.skipped,
            "decision made"
        );
        Decision {
            action,
            score: Some(score),
            stats,
        }
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&self, arena: &Arena, state: &GameState, side: Side) -> Action {
        self.decide(arena, state, side).action
    }
}

/// Picks the root successor with the best static evaluation, no lookahead.
pub struct GreedyAgent {
    name: String,
}

impl GreedyAgent {
    pub fn new() -> Self {
        Self {
            name: "Greedy".to_string(),
        }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&self, arena: &Arena, state: &GameState, side: Side) -> Action {
        let Ok(roots) = successors(arena, state, side) else {
            return Action::Pass;
        };
        let mut best: Option<(i32, Action)> = None;
        for root in &roots {
            let score = evaluate(&root.state, side);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, root.action));
            }
        }
        best.map_or(Action::Pass, |(_, action)| action)
    }
}
