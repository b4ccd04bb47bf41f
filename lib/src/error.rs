use thiserror::Error;

use crate::state::Side;

/// Errors raised by the strict codec paths, grid construction and point validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("board of {height}x{width} cannot be addressed (rows 1..=52, columns 1..=99)")]
    Dimensions { height: usize, width: usize },
    #[error("cell at row {row}, column {col} cannot be addressed")]
    Point { row: usize, col: usize },
    #[error("malformed token at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
    #[error("token at byte {offset} lies outside the board ({row_char}{col})")]
    OutOfBounds {
        offset: usize,
        row_char: char,
        col: usize,
    },
    #[error("token at byte {offset} collides with an entity already at {row_char}{col}")]
    Collision {
        offset: usize,
        row_char: char,
        col: usize,
    },
}

/// Errors raised while reading the textual game description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unexpected end of input while reading {0}")]
    Truncated(&'static str),
    #[error("invalid {field}: {value:?}")]
    Field { field: &'static str, value: String },
    #[error("acting side must be 'A' or 'B', got {0:?}")]
    Side(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// An edit of the entity records that contradicts the state it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenError {
    #[error("no entity in slot {0}")]
    MissingEntity(usize),
    #[error("player {0} has no record on the board")]
    MissingPlayer(Side),
}
