use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{self, DecodeMode, MAX_COLS, MAX_ROWS, Tokens};
use crate::error::{CodecError, MoveGenError};

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Side::A => 'A',
            Side::B => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'A' => Some(Side::A),
            'B' => Some(Side::B),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Per-player stats. Health below one means the player is defeated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
    /// Movement and action points left this turn.
    pub stamina: i32,
    /// Carried and counted by the evaluation, never spent.
    pub speed: i32,
}

impl Player {
    pub fn new(health: i32, attack: i32, defense: i32, stamina: i32, speed: i32) -> Self {
        Self {
            health,
            attack,
            defense,
            stamina,
            speed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Sum of the stats the evaluation weighs.
    pub fn strength(&self) -> i32 {
        self.health + self.attack + self.defense + self.speed
    }
}

/// Stat deltas granted by picking an item up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl Item {
    pub fn new(health: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            health,
            attack,
            defense,
            speed,
        }
    }

    pub fn apply_to(&self, player: &mut Player) {
        player.health += self.health;
        player.attack += self.attack;
        player.defense += self.defense;
        player.speed += self.speed;
    }
}

/// Item kinds of one game, addressed by the single digit on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCatalog(Vec<Item>);

impl ItemCatalog {
    pub const CAPACITY: usize = 10;

    /// Returns `None` when there are more kinds than board digits.
    pub fn new(items: Vec<Item>) -> Option<Self> {
        (items.len() <= Self::CAPACITY).then_some(Self(items))
    }

    pub fn get(&self, index: u8) -> Option<&Item> {
        self.0.get(usize::from(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A board cell: 0-based row, 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

#[derive(Deserialize)]
struct RawPoint {
    row: usize,
    col: usize,
}

impl TryFrom<RawPoint> for Point {
    type Error = CodecError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Point::new(raw.row, raw.col).ok_or(CodecError::Point {
            row: raw.row,
            col: raw.col,
        })
    }
}

impl Point {
    pub fn new(row: usize, col: usize) -> Option<Point> {
        (row < MAX_ROWS && (1..=MAX_COLS).contains(&col)).then(|| Point {
            row: row as u8,
            col: col as u8,
        })
    }

    pub fn manhattan(self, other: Point) -> i32 {
        (i32::from(self.row) - i32::from(other.row)).abs()
            + (i32::from(self.col) - i32::from(other.col)).abs()
    }

    /// The point `rows` down and `cols` right, if the wire format can hold it.
    pub fn offset(self, rows: i32, cols: i32) -> Option<Point> {
        let row = i32::from(self.row) + rows;
        let col = i32::from(self.col) + cols;
        Point::new(usize::try_from(row).ok()?, usize::try_from(col).ok()?)
    }

    pub fn row_char(self) -> char {
        codec::row_char(usize::from(self.row)).unwrap_or('?')
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_char(), self.col)
    }
}

/// How a successor state was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Move { to: Point },
    Attack { target: Point },
    Pass,
}

impl Action {
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }

    pub fn target(&self) -> Option<Point> {
        match *self {
            Action::Move { to } => Some(to),
            Action::Attack { target } => Some(target),
            Action::Pass => None,
        }
    }

    pub fn type_char(&self) -> char {
        match self {
            Action::Move { .. } => 'm',
            Action::Attack { .. } => 'a',
            Action::Pass => 'p',
        }
    }
}

/// `m A 4`, `a b 10`, `p . 0`.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(p) => write!(f, "{} {} {}", self.type_char(), p.row_char(), p.col),
            None => write!(f, "{} . 0", self.type_char()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player(Side),
    Monster,
    /// Catalog index, 0..=9.
    Item(u8),
    /// Any other letter. Blocks its cell and is never interacted with.
    Other(char),
}

impl EntityKind {
    fn from_char(c: char) -> EntityKind {
        match c {
            'm' => EntityKind::Monster,
            '0'..='9' => EntityKind::Item(c as u8 - b'0'),
            _ => Side::from_char(c).map_or(EntityKind::Other(c), EntityKind::Player),
        }
    }

    fn as_char(self) -> char {
        match self {
            EntityKind::Player(side) => side.as_char(),
            EntityKind::Monster => 'm',
            EntityKind::Item(index) => char::from(b'0' + index),
            EntityKind::Other(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub at: Point,
}

/// Stable handle of an entity record inside one [`Board`] and its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

/// Entity records in insertion order.
///
/// Removal leaves an empty slot behind so ids stay valid across clones of the
/// same board.
#[derive(Debug, Clone, Default)]
pub struct Board {
    slots: Vec<Option<Entity>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the wire format, keeping only tokens that fit a `height` x `width`
    /// board. Lenient mode never fails.
    pub fn from_wire(
        input: &str,
        height: usize,
        width: usize,
        mode: DecodeMode,
    ) -> Result<Board, CodecError> {
        let mut board = Board::new();
        for token in Tokens::new(input) {
            let token = match (token, mode) {
                (Ok(token), _) => token,
                (Err(_), DecodeMode::Lenient) => continue,
                (Err(e), DecodeMode::Strict) => return Err(e),
            };
            let at = match Point::new(token.row, token.col) {
                Some(at) if token.fits(height, width) => at,
                _ if mode == DecodeMode::Strict => return Err(token.out_of_bounds()),
                _ => continue,
            };
            if mode == DecodeMode::Strict && board.is_occupied(at) {
                return Err(token.collision());
            }
            board.push(Entity {
                kind: EntityKind::from_char(token.entity),
                at,
            });
        }
        Ok(board)
    }

    pub fn to_wire(&self) -> String {
        let mut out = String::new();
        for (_, entity) in self.iter() {
            codec::push_token(
                &mut out,
                entity.kind.as_char(),
                matches!(entity.kind, EntityKind::Item(_)),
                usize::from(entity.at.row),
                usize::from(entity.at.col),
            );
        }
        out
    }

    pub fn push(&mut self, entity: Entity) -> EntityId {
        self.slots.push(Some(entity));
        EntityId(self.slots.len() - 1)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn remove(&mut self, id: EntityId) -> Result<Entity, MoveGenError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(MoveGenError::MissingEntity(id.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EntityId(i), e)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// First record of the side's player.
    pub fn player(&self, side: Side) -> Option<(EntityId, Point)> {
        self.iter()
            .find(|(_, e)| e.kind == EntityKind::Player(side))
            .map(|(id, e)| (id, e.at))
    }

    pub fn locate(&self, side: Side) -> Option<Point> {
        self.player(side).map(|(_, at)| at)
    }

    pub fn relocate(&mut self, side: Side, to: Point) -> Result<(), MoveGenError> {
        let (id, _) = self.player(side).ok_or(MoveGenError::MissingPlayer(side))?;
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(entity) => {
                entity.at = to;
                Ok(())
            }
            None => Err(MoveGenError::MissingEntity(id.0)),
        }
    }

    pub fn is_occupied(&self, at: Point) -> bool {
        self.iter().any(|(_, e)| e.at == at)
    }

    pub fn monsters(&self) -> impl Iterator<Item = (EntityId, Point)> + '_ {
        self.iter()
            .filter(|(_, e)| e.kind == EntityKind::Monster)
            .map(|(id, e)| (id, e.at))
    }

    /// Item records with their catalog index.
    pub fn items(&self) -> impl Iterator<Item = (EntityId, u8, Point)> + '_ {
        self.iter().filter_map(|(id, e)| match e.kind {
            EntityKind::Item(index) => Some((id, index, e.at)),
            _ => None,
        })
    }
}

/// Boards are equal when their live records match in order.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.iter().map(|(_, e)| e).eq(other.iter().map(|(_, e)| e))
    }
}

impl Eq for Board {}

/// Board constants the state does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    pub height: usize,
    pub width: usize,
    pub items: ItemCatalog,
}

impl Arena {
    pub fn new(height: usize, width: usize, items: ItemCatalog) -> Self {
        Self {
            height,
            width,
            items,
        }
    }

    pub fn contains(&self, at: Point) -> bool {
        usize::from(at.row) < self.height && (1..=self.width).contains(&usize::from(at.col))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Indexed by [`Side::index`].
    pub players: [Player; 2],
    pub board: Board,
}

impl GameState {
    pub fn new(a: Player, b: Player, board: Board) -> Self {
        Self {
            players: [a, b],
            board,
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn is_terminal(&self) -> bool {
        self.players.iter().any(|p| !p.is_alive())
    }
}
