//! Greedy approach toward a cell that is out of reach this turn.
//!
//! This is not a shortest-path search. Obstacles are only looked at on the
//! final cell, so callers must re-check whatever comes back.

use crate::state::{Arena, Board, Point};

/// Walks from `start` toward `target`, spending `primary` steps first
/// (rows down, columns right, rows up, columns left) and then `secondary` steps
/// (columns right, columns left, rows down, rows up).
fn advance(start: Point, target: Point, mut primary: i32, mut secondary: i32) -> (i32, i32) {
    let (tr, tc) = (i32::from(target.row), i32::from(target.col));
    let (mut r, mut c) = (i32::from(start.row), i32::from(start.col));

    let walk = |pos: &mut i32, goal: i32, step: i32, budget: &mut i32| {
        while (goal - *pos) * step > 0 && *budget > 0 {
            *pos += step;
            *budget -= 1;
        }
    };

    walk(&mut r, tr, 1, &mut primary);
    walk(&mut c, tc, 1, &mut primary);
    walk(&mut r, tr, -1, &mut primary);
    walk(&mut c, tc, -1, &mut primary);

    walk(&mut c, tc, 1, &mut secondary);
    walk(&mut c, tc, -1, &mut secondary);
    walk(&mut r, tr, 1, &mut secondary);
    walk(&mut r, tr, -1, &mut secondary);

    (r, c)
}

/// Closest free cell toward `target` that `budget` steps from `start` can buy.
///
/// Starts with the whole budget on the primary walk. While the landing cell is
/// off the board or taken, moves one step at a time from the primary to the
/// secondary walk, and after each full sweep gives up one step of budget.
/// The last candidate is returned even if it is still blocked; `None` only when
/// it cannot be expressed as a point at all.
pub fn closest_reachable(
    arena: &Arena,
    board: &Board,
    start: Point,
    target: Point,
    mut budget: i32,
) -> Option<Point> {
    let to_point =
        |(r, c): (i32, i32)| Point::new(usize::try_from(r).ok()?, usize::try_from(c).ok()?);
    let valid = |cell: (i32, i32)| {
        to_point(cell).is_some_and(|p| arena.contains(p) && !board.is_occupied(p))
    };

    let mut closest = advance(start, target, budget, 0);
    while !valid(closest) && budget > 0 {
        let mut secondary = 0;
        while !valid(closest) && secondary <= budget {
            closest = advance(start, target, budget - secondary, secondary);
            secondary += 1;
        }
        budget -= 1;
    }
    to_point(closest)
}
