//! Reader for the textual game description.
//!
//! ```text
//! height width side
//! H A D s S        (side A)
//! H A D s S        (side B)
//! item_count
//! dH dA dD dS      (item_count lines)
//! <encoded board>
//! ```

use std::str::{FromStr, SplitWhitespace};

use crate::codec::{DecodeMode, MAX_COLS, MAX_ROWS};
use crate::error::InputError;
use crate::state::{Arena, Board, GameState, Item, ItemCatalog, Player, Side};

/// Everything needed to pick one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub arena: Arena,
    pub state: GameState,
    /// The side that has to act now.
    pub side: Side,
}

impl Scenario {
    pub fn parse(text: &str) -> Result<Self, InputError> {
        Self::parse_with(text, DecodeMode::Lenient)
    }

    /// Like [`Scenario::parse`], but the board line is decoded with `mode`.
    pub fn parse_with(text: &str, mode: DecodeMode) -> Result<Self, InputError> {
        let mut cursor = Cursor::new(text);

        let height: usize = cursor.number("height")?;
        let width: usize = cursor.number("width")?;
        if !(1..=MAX_ROWS).contains(&height) || !(1..=MAX_COLS).contains(&width) {
            return Err(InputError::Field {
                field: "board size",
                value: format!("{height}x{width}"),
            });
        }
        let word = cursor.word("acting side")?;
        let mut chars = word.chars();
        let side = match (chars.next(), chars.next()) {
            (Some(c), None) => Side::from_char(c),
            _ => None,
        }
        .ok_or_else(|| InputError::Side(word.to_string()))?;

        let a = cursor.player()?;
        let b = cursor.player()?;

        let count: usize = cursor.number("item count")?;
        if count > ItemCatalog::CAPACITY {
            return Err(InputError::Field {
                field: "item count",
                value: count.to_string(),
            });
        }
        let items = (0..count)
            .map(|_| cursor.item())
            .collect::<Result<Vec<_>, _>>()?;
        let items = ItemCatalog::new(items).ok_or(InputError::Field {
            field: "item count",
            value: count.to_string(),
        })?;

        let wire = cursor.next_line().unwrap_or_default();
        let board = Board::from_wire(wire.trim_end_matches('\r'), height, width, mode)?;

        Ok(Self {
            arena: Arena::new(height, width, items),
            state: GameState::new(a, b, board),
            side,
        })
    }
}

impl FromStr for Scenario {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whitespace-separated words that remembers which line it is on, so the
/// board can be taken as the line after the last number.
struct Cursor<'a> {
    lines: Vec<&'a str>,
    line: usize,
    words: SplitWhitespace<'a>,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let words = lines.first().copied().unwrap_or_default().split_whitespace();
        Self {
            lines,
            line: 0,
            words,
        }
    }

    fn word(&mut self, what: &'static str) -> Result<&'a str, InputError> {
        loop {
            if let Some(word) = self.words.next() {
                return Ok(word);
            }
            self.line += 1;
            let line = self
                .lines
                .get(self.line)
                .copied()
                .ok_or(InputError::Truncated(what))?;
            self.words = line.split_whitespace();
        }
    }

    fn number<T: FromStr>(&mut self, what: &'static str) -> Result<T, InputError> {
        let word = self.word(what)?;
        word.parse().map_err(|_| InputError::Field {
            field: what,
            value: word.to_string(),
        })
    }

    fn player(&mut self) -> Result<Player, InputError> {
        Ok(Player::new(
            self.number("health")?,
            self.number("attack")?,
            self.number("defense")?,
            self.number("stamina")?,
            self.number("speed")?,
        ))
    }

    fn item(&mut self) -> Result<Item, InputError> {
        Ok(Item::new(
            self.number("item health")?,
            self.number("item attack")?,
            self.number("item defense")?,
            self.number("item speed")?,
        ))
    }

    /// The line after the one the last word came from; the rest of the
    /// current line is discarded.
    fn next_line(&mut self) -> Option<&'a str> {
        self.line += 1;
        self.lines.get(self.line).copied()
    }
}
