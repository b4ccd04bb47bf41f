pub mod agent;
pub mod codec;
pub mod error;
mod eval;
pub mod input;
pub mod movegen;
mod pathfind;
pub mod search;
pub mod state;

pub use agent::{Agent, Decision, GreedyAgent, MinimaxAgent};
pub use error::{CodecError, InputError, MoveGenError};
pub use eval::{WIN, evaluate};
pub use input::Scenario;
pub use search::{SearchConfig, SearchStats};
pub use state::{Action, Arena, Board, GameState, Item, ItemCatalog, Player, Point, Side};
