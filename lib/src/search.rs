use tracing::warn;

use crate::eval::{WIN, evaluate};
use crate::movegen::successors;
use crate::state::{Arena, GameState, Side};

/// Search depth used when nothing else is configured. Depth only drops when a
/// side passes, so this is counted in turns, not in actions.
pub const DEFAULT_DEPTH: u32 = 30;

/// Node budget the binary applies to one decision unless told otherwise. At
/// [`DEFAULT_DEPTH`] an unbounded search does not finish on ordinary boards.
pub const DEFAULT_NODE_LIMIT: u64 = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of passes the search looks ahead.
    pub depth: u32,
    /// Expanded nodes after which every further node is scored statically.
    /// Counted over everything one [`AlphaBeta`] searches.
    pub node_limit: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            node_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub nodes: u64,
    pub cutoffs: u64,
    /// Branches dropped because generating their successors failed.
    pub skipped: u64,
}

/// Depth-limited minimax with alpha-beta pruning, scored for one side.
///
/// The side to move keeps acting until it passes; only a pass hands the turn
/// over and uses up one level of depth.
pub struct AlphaBeta<'a> {
    arena: &'a Arena,
    searching: Side,
    config: SearchConfig,
    stats: SearchStats,
}

impl<'a> AlphaBeta<'a> {
    pub fn new(arena: &'a Arena, searching: Side, config: SearchConfig) -> Self {
        Self {
            arena,
            searching,
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Score of `state` with `to_move` acting next, searched `depth` passes
    /// deep. `None` when the state's successors could not be generated.
    pub fn search(&mut self, state: &GameState, depth: u32, to_move: Side) -> Option<i32> {
        self.alpha_beta(state, depth, to_move, -WIN, WIN)
    }

    fn out_of_nodes(&self) -> bool {
        self.config
            .node_limit
            .is_some_and(|limit| self.stats.nodes >= limit)
    }

    fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: u32,
        to_move: Side,
        mut alpha: i32,
        mut beta: i32,
    ) -> Option<i32> {
        if depth == 0 || state.is_terminal() || self.out_of_nodes() {
            return Some(evaluate(state, self.searching));
        }
        self.stats.nodes += 1;

        let children = match successors(self.arena, state, to_move) {
            Ok(children) => children,
            Err(e) => {
                warn!(error = %e, side = %to_move, "successor generation failed, skipping branch");
                self.stats.skipped += 1;
                return None;
            }
        };

        let maximizing = to_move == self.searching;
        let mut best: Option<i32> = None;
        for child in &children {
            let (next_side, next_depth) = if child.action.is_pass() {
                (to_move.opponent(), depth - 1)
            } else {
                (to_move, depth)
            };
            let Some(score) = self.alpha_beta(&child.state, next_depth, next_side, alpha, beta)
            else {
                continue;
            };
            if maximizing {
                best = Some(best.map_or(score, |b| b.max(score)));
                alpha = alpha.max(score);
            } else {
                best = Some(best.map_or(score, |b| b.min(score)));
                beta = beta.min(score);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Some(best.unwrap_or_else(|| evaluate(state, self.searching)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeMode;
    use crate::state::{Board, Item, ItemCatalog, Player};

    fn setup(height: usize, width: usize, a: Player, b: Player, wire: &str) -> (Arena, GameState) {
        let arena = Arena::new(height, width, ItemCatalog::default());
        let board = Board::from_wire(wire, height, width, DecodeMode::Strict).unwrap();
        (arena, GameState::new(a, b, board))
    }

    #[test]
    fn test_depth_zero_is_static() {
        let (arena, state) = setup(
            3,
            3,
            Player::new(10, 5, 0, 20, 0),
            Player::new(4, 0, 0, 0, 0),
            "A A1 B A2 ",
        );
        let mut search = AlphaBeta::new(&arena, Side::A, SearchConfig::default());
        assert_eq!(search.search(&state, 0, Side::A), Some(15 - 4));
        assert_eq!(search.stats().nodes, 0);
    }

    #[test]
    fn test_finds_kill_within_turn() {
        // two strikes of 5 finish a 10 health opponent before passing
        let (arena, state) = setup(
            3,
            3,
            Player::new(10, 5, 0, 20, 0),
            Player::new(10, 0, 0, 0, 0),
            "A A1 B A2 ",
        );
        let mut search = AlphaBeta::new(&arena, Side::A, SearchConfig::default());
        assert_eq!(search.search(&state, 1, Side::A), Some(WIN));
        // a won line leaves nothing for the remaining siblings to improve
        assert!(search.stats().cutoffs > 0);
    }

    #[test]
    fn test_minimizer_assumes_opponent_strikes() {
        // A has nothing to do; B hits for 3 then its turn ends
        let (arena, state) = setup(
            3,
            3,
            Player::new(10, 0, 0, 0, 0),
            Player::new(10, 3, 0, 10, 0),
            "A A1 B A2 ",
        );
        let mut search = AlphaBeta::new(&arena, Side::A, SearchConfig::default());
        // A passes (depth 2 -> 1), B attacks and passes (1 -> 0)
        assert_eq!(search.search(&state, 2, Side::A), Some(7 - 13));
    }

    #[test]
    fn test_only_passes_consume_depth() {
        let (arena, state) = setup(
            1,
            5,
            Player::new(10, 5, 0, 20, 0),
            Player::new(10, 0, 0, 0, 0),
            "A A1 B A5 ",
        );
        // depth 1 still lets A walk up and strike once before its pass
        let mut search = AlphaBeta::new(&arena, Side::A, SearchConfig::default());
        assert_eq!(search.search(&state, 1, Side::A), Some(15 - 5));
    }

    #[test]
    fn test_node_limit_caps_work() {
        let (arena, state) = setup(
            5,
            5,
            Player::new(10, 5, 0, 20, 0),
            Player::new(10, 5, 0, 20, 0),
            "A A1 m C3 o0 E5 B A5 ",
        );
        let config = SearchConfig {
            depth: DEFAULT_DEPTH,
            node_limit: Some(50),
        };
        let mut search = AlphaBeta::new(&arena, Side::A, config);
        assert!(search.search(&state, config.depth, Side::A).is_some());
        assert!(search.stats().nodes <= 50);
    }

    /// Exhaustive minimax with the same turn rules, no pruning.
    fn minimax(
        arena: &Arena,
        state: &GameState,
        depth: u32,
        to_move: Side,
        searching: Side,
    ) -> i32 {
        if depth == 0 || state.is_terminal() {
            return evaluate(state, searching);
        }
        let scores = successors(arena, state, to_move).unwrap().into_iter().map(|child| {
            if child.action.is_pass() {
                minimax(arena, &child.state, depth - 1, to_move.opponent(), searching)
            } else {
                minimax(arena, &child.state, depth, to_move, searching)
            }
        });
        if to_move == searching {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    #[test]
    fn test_pruning_matches_exhaustive_minimax() {
        let items =
            ItemCatalog::new(vec![Item::new(3, 0, 0, 0), Item::new(0, 2, -1, 0)]).unwrap();
        let boards = [
            (4, 4, "A A1 o0 B3 m C2 B D4 "),
            (3, 5, "A B1 m A3 o1 C4 B B5 "),
            (4, 4, "o1 A2 A B2 B C2 m D1 "),
        ];
        let mut cutoffs = 0;
        for (height, width, wire) in boards {
            let arena = Arena::new(height, width, items.clone());
            let board = Board::from_wire(wire, height, width, DecodeMode::Strict).unwrap();
            let state = GameState::new(
                Player::new(12, 4, 1, 12, 0),
                Player::new(11, 3, 2, 11, 1),
                board,
            );
            for depth in 1..=3 {
                for side in [Side::A, Side::B] {
                    let mut search = AlphaBeta::new(&arena, side, SearchConfig::default());
                    assert_eq!(
                        search.search(&state, depth, side),
                        Some(minimax(&arena, &state, depth, side, side)),
                        "{wire} depth {depth} side {side}"
                    );
                    cutoffs += search.stats().cutoffs;
                }
            }
        }
        assert!(cutoffs > 0);
    }
}
