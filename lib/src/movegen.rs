//! Successor generation for the side to act.
//!
//! Transitions come out in a fixed order: dealing with the opponent first,
//! then every item and every monster in board order, then a closing pass.
//! The order matters: the driver keeps the first of equally scored moves.

use tracing::{trace, warn};

use crate::error::MoveGenError;
use crate::pathfind::closest_reachable;
use crate::state::{Action, Arena, Board, GameState, Point, Side};

/// Stamina an attack costs.
pub const ATTACK_COST: i32 = 10;
/// Health gained for slaying a monster.
pub const MONSTER_HEAL: i32 = 10;

/// Cells tried around an adjacent opponent when there is no stamina to strike.
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, 1), (-1, 1), (1, -1)];
/// Cells tried around a distant target: right, left, down, up.
const ORTHOGONALS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A successor state together with the action that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub action: Action,
}

impl Transition {
    fn pass(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            action: Action::Pass,
        }
    }
}

/// Legal successors of `state` for `side`. Never empty; the last entry is
/// always a pass that leaves the state untouched.
pub fn successors(
    arena: &Arena,
    state: &GameState,
    side: Side,
) -> Result<Vec<Transition>, MoveGenError> {
    let budget = state.player(side).stamina;
    if budget <= 0 {
        return Ok(vec![Transition::pass(state)]);
    }
    let (Some(me), Some(foe)) = (
        state.board.locate(side),
        state.board.locate(side.opponent()),
    ) else {
        trace!(%side, "player record missing, only passing");
        return Ok(vec![Transition::pass(state)]);
    };

    let items = state.board.items().count();
    let monsters = state.board.monsters().count();
    trace!(%side, %me, %foe, budget, items, monsters, "expanding");

    let mut expander = Expander {
        arena,
        parent: state,
        side,
        me,
        budget,
        out: Vec::with_capacity(items + monsters + 5),
    };
    expander.engage(foe)?;
    expander.collect_items()?;
    expander.hunt_monsters()?;
    expander.out.push(Transition::pass(state));
    Ok(expander.out)
}

/// In-bounds, unoccupied neighbours of `around`, in the order of `offsets`.
fn open_cells<'b>(
    arena: &'b Arena,
    board: &'b Board,
    around: Point,
    offsets: &'b [(i32, i32)],
) -> impl Iterator<Item = Point> + 'b {
    offsets
        .iter()
        .filter_map(move |&(dr, dc)| around.offset(dr, dc))
        .filter(move |&cell| arena.contains(cell) && !board.is_occupied(cell))
}

struct Expander<'a> {
    arena: &'a Arena,
    parent: &'a GameState,
    side: Side,
    me: Point,
    budget: i32,
    out: Vec<Transition>,
}

impl<'a> Expander<'a> {
    fn pass(&mut self) {
        self.out.push(Transition::pass(self.parent));
    }

    /// Moves onto `to`, paying `cost` stamina.
    fn step_to(&mut self, to: Point, cost: i32) -> Result<(), MoveGenError> {
        let mut next = self.parent.clone();
        next.board.relocate(self.side, to)?;
        next.player_mut(self.side).stamina -= cost;
        self.out.push(Transition {
            state: next,
            action: Action::Move { to },
        });
        Ok(())
    }

    /// Spends the whole turn getting as close to `target` as the pathfinder
    /// allows, or passes when it finds no free cell.
    fn approach(&mut self, target: Point) -> Result<(), MoveGenError> {
        let parent: &'a GameState = self.parent;
        let (arena, me, budget) = (self.arena, self.me, self.budget);
        let stop = closest_reachable(arena, &parent.board, me, target, budget).filter(|&p| {
            arena.contains(p) && !parent.board.is_occupied(p) && me.manhattan(p) <= budget
        });
        match stop {
            Some(to) => {
                let mut next = parent.clone();
                next.board.relocate(self.side, to)?;
                next.player_mut(self.side).stamina = 0;
                self.out.push(Transition {
                    state: next,
                    action: Action::Move { to },
                });
            }
            None => self.pass(),
        }
        Ok(())
    }

    fn engage(&mut self, foe: Point) -> Result<(), MoveGenError> {
        let parent: &'a GameState = self.parent;
        let gap = self.me.manhattan(foe);

        if gap == 1 {
            if self.budget >= ATTACK_COST {
                let other = self.side.opponent();
                let damage =
                    (parent.player(self.side).attack - parent.player(other).defense).max(0);
                let mut next = parent.clone();
                next.player_mut(other).health -= damage;
                next.player_mut(self.side).stamina -= ATTACK_COST;
                self.out.push(Transition {
                    state: next,
                    action: Action::Attack { target: foe },
                });
                return Ok(());
            }
            for cell in open_cells(self.arena, &parent.board, foe, &DIAGONALS) {
                let cost = self.me.manhattan(cell);
                if cost <= self.budget {
                    return self.step_to(cell, cost);
                }
            }
            return Ok(());
        }

        for cell in open_cells(self.arena, &parent.board, foe, &ORTHOGONALS) {
            let cost = self.me.manhattan(cell);
            if cost + ATTACK_COST <= self.budget {
                // room left over to strike once there
                return self.step_to(cell, cost);
            } else if gap - 1 > self.budget {
                self.approach(cell)?;
            } else {
                self.pass();
                break;
            }
        }
        Ok(())
    }

    fn collect_items(&mut self) -> Result<(), MoveGenError> {
        let parent: &'a GameState = self.parent;
        for (id, index, at) in parent.board.items() {
            let cost = self.me.manhattan(at);
            if cost > self.budget {
                self.approach(at)?;
                continue;
            }
            let mut next = parent.clone();
            next.board.remove(id)?;
            next.board.relocate(self.side, at)?;
            let player = next.player_mut(self.side);
            player.stamina -= cost;
            match self.arena.items.get(index) {
                Some(item) => item.apply_to(player),
                None => warn!(index, %at, "item has no catalog entry, picked up for nothing"),
            }
            self.out.push(Transition {
                state: next,
                action: Action::Move { to: at },
            });
        }
        Ok(())
    }

    fn hunt_monsters(&mut self) -> Result<(), MoveGenError> {
        let parent: &'a GameState = self.parent;
        for (id, at) in parent.board.monsters() {
            let gap = self.me.manhattan(at);
            if gap == 1 && self.budget >= ATTACK_COST {
                let mut next = parent.clone();
                next.board.remove(id)?;
                let player = next.player_mut(self.side);
                player.stamina -= ATTACK_COST;
                player.health += MONSTER_HEAL;
                self.out.push(Transition {
                    state: next,
                    action: Action::Attack { target: at },
                });
                continue;
            }
            for cell in open_cells(self.arena, &parent.board, at, &ORTHOGONALS) {
                let cost = self.me.manhattan(cell);
                if cost <= self.budget {
                    self.step_to(cell, cost)?;
                    break;
                }
                if gap > self.budget {
                    self.approach(cell)?;
                    break;
                }
            }
        }
        Ok(())
    }
}
