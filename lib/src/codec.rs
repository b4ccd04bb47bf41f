//! Compact token encoding of a board.
//!
//! Every entity on the board is written as `[o]entity row col ` where `o` marks
//! item tokens (the entity is then the item's catalog digit), `row` is a single
//! letter (`A`..`Z` for rows 0..25, `a`..`z` for rows 26..51) and `col` is the
//! 1-based column in one or two decimal digits.

use std::fmt;

use crate::error::CodecError;

/// Reserved prefix in front of item digits.
pub const ITEM_PREFIX: u8 = b'o';
/// Marker for cells holding nothing.
pub const EMPTY: char = '.';
pub const MAX_ROWS: usize = 52;
pub const MAX_COLS: usize = 99;

/// Row index (0..52) to its encoded letter.
pub fn row_char(row: usize) -> Option<char> {
    match row {
        0..=25 => Some((b'A' + row as u8) as char),
        26..=51 => Some((b'a' + (row - 26) as u8) as char),
        _ => None,
    }
}

/// Encoded row letter back to its index.
pub fn row_index(c: char) -> Option<usize> {
    match c {
        'A'..='Z' => Some(c as usize - 'A' as usize),
        'a'..='z' => Some(c as usize - 'a' as usize + 26),
        _ => None,
    }
}

/// How [`decode_with`] reacts to tokens it cannot place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Drop malformed or out-of-bounds tokens.
    #[default]
    Lenient,
    /// Report the first malformed, out-of-bounds or colliding token.
    Strict,
}

/// A dense height x width board of entity characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<char>,
}

impl Grid {
    /// An all-empty grid. Fails if the wire format cannot address every cell.
    pub fn new(height: usize, width: usize) -> Result<Self, CodecError> {
        if !(1..=MAX_ROWS).contains(&height) || !(1..=MAX_COLS).contains(&width) {
            return Err(CodecError::Dimensions { height, width });
        }
        Ok(Self {
            height,
            width,
            cells: vec![EMPTY; height * width],
        })
    }

    /// Builds a grid from equally long text rows, one character per cell.
    pub fn from_rows(rows: &[&str]) -> Result<Self, CodecError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Self::new(height, width)?;
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(CodecError::Dimensions { height, width });
            }
            for (c, ch) in line.chars().enumerate() {
                grid.cells[r * width + c] = ch;
            }
        }
        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at a 0-based row and 0-based column.
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        (row < self.height && col < self.width).then(|| self.cells[row * self.width + col])
    }

    /// Writes a cell; returns false when the coordinates are off the board.
    pub fn set(&mut self, row: usize, col: usize, ch: char) -> bool {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = ch;
            true
        } else {
            false
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for ch in row {
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Appends one token to `out`.
pub(crate) fn push_token(out: &mut String, entity: char, item: bool, row: usize, col: usize) {
    if item {
        out.push(ITEM_PREFIX as char);
    }
    out.push(entity);
    out.push(' ');
    // rows and columns come from validated grids and points
    if let Some(rc) = row_char(row) {
        out.push(rc);
    }
    if col >= 10 {
        out.push(char::from(b'0' + (col / 10 % 10) as u8));
    }
    out.push(char::from(b'0' + (col % 10) as u8));
    out.push(' ');
}

/// Serializes every digit or letter cell of the grid, row-major.
pub fn encode(grid: &Grid) -> String {
    let mut out = String::new();
    for (r, row) in grid.rows().enumerate() {
        for (c, &ch) in row.iter().enumerate() {
            if ch.is_ascii_digit() {
                push_token(&mut out, ch, true, r, c + 1);
            } else if ch.is_ascii_alphabetic() {
                push_token(&mut out, ch, false, r, c + 1);
            }
        }
    }
    out
}

/// Parses `input` onto a fresh `height` x `width` grid, dropping bad tokens.
///
/// Only the dimensions can fail; token problems never do.
pub fn decode(input: &str, height: usize, width: usize) -> Result<Grid, CodecError> {
    decode_with(input, height, width, DecodeMode::Lenient)
}

pub fn decode_with(
    input: &str,
    height: usize,
    width: usize,
    mode: DecodeMode,
) -> Result<Grid, CodecError> {
    let mut grid = Grid::new(height, width)?;
    for token in Tokens::new(input) {
        let token = match (token, mode) {
            (Ok(token), _) => token,
            (Err(_), DecodeMode::Lenient) => continue,
            (Err(e), DecodeMode::Strict) => return Err(e),
        };
        if !token.fits(height, width) {
            if mode == DecodeMode::Strict {
                return Err(token.out_of_bounds());
            }
            continue;
        }
        let (r, c) = (token.row, token.col - 1);
        if mode == DecodeMode::Strict && grid.get(r, c) != Some(EMPTY) {
            return Err(token.collision());
        }
        grid.set(r, c, token.entity);
    }
    Ok(grid)
}

/// One parsed token, with coordinates not yet checked against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub entity: char,
    pub row: usize,
    /// 1-based.
    pub col: usize,
    /// Byte offset of the token's first character.
    pub offset: usize,
}

impl Token {
    pub fn fits(&self, height: usize, width: usize) -> bool {
        self.row < height && (1..=width).contains(&self.col)
    }

    pub(crate) fn out_of_bounds(&self) -> CodecError {
        CodecError::OutOfBounds {
            offset: self.offset,
            row_char: row_char(self.row).unwrap_or('?'),
            col: self.col,
        }
    }

    pub(crate) fn collision(&self) -> CodecError {
        CodecError::Collision {
            offset: self.offset,
            row_char: row_char(self.row).unwrap_or('?'),
            col: self.col,
        }
    }
}

/// Iterator over the tokens of an encoded board.
///
/// A malformed token yields an error and the scan resumes after the next
/// whitespace run, so later tokens are still reported.
pub struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn skip_word(&mut self) {
        while self.peek().is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn malformed(&mut self, offset: usize, reason: &'static str) -> CodecError {
        self.skip_word();
        CodecError::Malformed { offset, reason }
    }

    fn token(&mut self) -> Result<Token, CodecError> {
        let offset = self.pos;
        if self.peek() == Some(ITEM_PREFIX)
            && self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit)
        {
            self.pos += 1;
        }
        let entity = self.bytes[self.pos];
        self.pos += 1;
        if !entity.is_ascii_graphic() {
            return Err(self.malformed(offset, "entity is not a printable character"));
        }
        if self.peek() == Some(b' ') {
            self.pos += 1;
        }
        let Some(rc) = self.peek() else {
            return Err(self.malformed(offset, "token ends before its position"));
        };
        self.pos += 1;
        let Some(row) = row_index(rc as char) else {
            return Err(self.malformed(offset, "row is not a letter"));
        };
        let mut col = match self.peek() {
            Some(d) if d.is_ascii_digit() => usize::from(d - b'0'),
            _ => return Err(self.malformed(offset, "column is missing")),
        };
        self.pos += 1;
        if let Some(d) = self.peek().filter(u8::is_ascii_digit) {
            col = col * 10 + usize::from(d - b'0');
            self.pos += 1;
        }
        if self.peek().is_some_and(|b| !b.is_ascii_whitespace()) {
            return Err(self.malformed(offset, "column has trailing characters"));
        }
        Ok(Token {
            entity: entity as char,
            row,
            col,
            offset,
        })
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_space();
        self.peek()?;
        Some(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_row_chars() {
        assert_eq!(row_char(0), Some('A'));
        assert_eq!(row_char(25), Some('Z'));
        assert_eq!(row_char(26), Some('a'));
        assert_eq!(row_char(51), Some('z'));
        assert_eq!(row_char(52), None);
        assert_eq!(row_index('a'), Some(26));
        assert_eq!(row_index('@'), None);
    }

    #[test]
    fn test_encode_layout() {
        let grid = Grid::from_rows(&["A..3", "..m.", "...B"]).unwrap();
        assert_eq!(encode(&grid), "A A1 o3 A4 m B3 B C4 ");
    }

    #[test]
    fn test_encode_two_digit_columns_and_lower_rows() {
        let mut grid = Grid::new(30, 12).unwrap();
        grid.set(27, 11, 'B');
        grid.set(0, 9, '0');
        assert_eq!(encode(&grid), "o0 A10 B b12 ");
    }

    #[test]
    fn test_encode_skips_unrecognized_cells() {
        let grid = Grid::from_rows(&["#A", "~-"]).unwrap();
        assert_eq!(encode(&grid), "A A2 ");
    }

    #[test]
    fn test_decode_places_tokens() {
        let grid = decode("A A1 o3 A4 m B3 B C4 ", 3, 4).unwrap();
        assert_eq!(grid, Grid::from_rows(&["A..3", "..m.", "...B"]).unwrap());
    }

    #[test]
    fn test_decode_drops_bad_tokens() {
        // bad row, out of bounds column, missing column
        let grid = decode("A ?1 m A9 B B2 x C ", 3, 3).unwrap();
        assert_eq!(grid, Grid::from_rows(&["...", ".B.", "..."]).unwrap());
    }

    #[test]
    fn test_decode_strict_reports() {
        assert!(matches!(
            decode_with("A A1 m Z1 ", 3, 3, DecodeMode::Strict),
            Err(CodecError::OutOfBounds { offset: 5, .. })
        ));
        assert!(matches!(
            decode_with("A A1 m A1 ", 3, 3, DecodeMode::Strict),
            Err(CodecError::Collision { .. })
        ));
        assert!(matches!(
            decode_with("A 11 ", 3, 3, DecodeMode::Strict),
            Err(CodecError::Malformed { offset: 0, .. })
        ));
    }

    #[test]
    fn test_letter_o_is_an_entity() {
        let grid = Grid::from_rows(&["o.", ".A"]).unwrap();
        let encoded = encode(&grid);
        assert_eq!(encoded, "o A1 A B2 ");
        assert_eq!(decode(&encoded, 2, 2).unwrap(), grid);
    }

    #[test]
    fn test_grid_dimensions() {
        assert!(Grid::new(0, 3).is_err());
        assert!(Grid::new(53, 3).is_err());
        assert!(Grid::new(52, 100).is_err());
        assert!(Grid::new(52, 99).is_ok());
    }

    fn entity_cell() -> impl Strategy<Value = char> {
        prop_oneof![
            6 => Just(EMPTY),
            1 => proptest::char::range('0', '9'),
            1 => proptest::char::range('A', 'Z'),
            1 => proptest::char::range('a', 'z'),
        ]
    }

    fn grid() -> impl Strategy<Value = Grid> {
        (1..=MAX_ROWS, 1..=MAX_COLS).prop_flat_map(|(h, w)| {
            proptest::collection::vec(entity_cell(), h * w).prop_map(move |cells| {
                let mut grid = Grid::new(h, w).unwrap();
                for (i, ch) in cells.into_iter().enumerate() {
                    grid.set(i / w, i % w, ch);
                }
                grid
            })
        })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(g in grid()) {
            let encoded = encode(&g);
            prop_assert_eq!(decode(&encoded, g.height(), g.width()).unwrap(), g.clone());
            prop_assert_eq!(
                decode_with(&encoded, g.height(), g.width(), DecodeMode::Strict).unwrap(),
                g
            );
        }
    }
}
