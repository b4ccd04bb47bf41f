use crate::state::{GameState, Side};

/// Score of a decided game. Far above any sum of stats a real board reaches.
pub const WIN: i32 = i32::MAX / 4;

/// Static evaluation from `perspective`'s point of view.
///
/// Decided games score [`WIN`] or `-WIN`; anything else is the difference of
/// health + attack + defense + speed between the two players. Stamina is left
/// out since it only lasts for the current turn.
pub fn evaluate(state: &GameState, perspective: Side) -> i32 {
    let own = state.player(perspective);
    let other = state.player(perspective.opponent());
    if state.is_terminal() {
        return if own.is_alive() { WIN } else { -WIN };
    }
    own.strength() - other.strength()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Board, Player};

    fn state(a: Player, b: Player) -> GameState {
        GameState::new(a, b, Board::new())
    }

    #[test]
    fn test_evaluate_linear_difference() {
        let s = state(Player::new(20, 5, 3, 40, 2), Player::new(15, 4, 1, 7, 1));
        assert_eq!(evaluate(&s, Side::A), 30 - 21);
        assert_eq!(evaluate(&s, Side::B), 21 - 30);
    }

    #[test]
    fn test_evaluate_ignores_stamina() {
        let a = state(Player::new(10, 1, 1, 0, 1), Player::new(10, 1, 1, 0, 1));
        let b = state(Player::new(10, 1, 1, 99, 1), Player::new(10, 1, 1, 0, 1));
        assert_eq!(evaluate(&a, Side::A), evaluate(&b, Side::A));
    }

    #[test]
    fn test_evaluate_dead_player() {
        let s = state(Player::new(12, 5, 5, 10, 5), Player::new(-3, 50, 50, 10, 50));
        assert_eq!(evaluate(&s, Side::A), WIN);
        assert_eq!(evaluate(&s, Side::B), -WIN);
    }

    #[test]
    fn test_terminal_dominates_heuristic() {
        // a huge but living lead must still lose to any decided win
        let lead = state(Player::new(30_000, 30_000, 30_000, 0, 30_000), Player::new(1, 0, 0, 0, 0));
        let won = state(Player::new(1, 0, 0, 0, 0), Player::new(0, 0, 0, 0, 0));
        assert!(evaluate(&won, Side::A) > evaluate(&lead, Side::A));
        assert!(-WIN < -evaluate(&lead, Side::A));
    }
}
