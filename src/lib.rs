//! In-memory tic-tac-toe match engine.
//!
//! Two-player matches over request/response calls: players register, create
//! or join a match, submit moves, and query match or player state. The crate
//! is the core of such a service (the state machine and the registries),
//! while HTTP routing, payload validation, and status-code mapping belong to
//! the consumer.
//!
//! # Architecture
//!
//! - **Board**: pure 3x3 value type with win/draw evaluation
//! - **Game**: per-match state machine (`waiting -> active -> completed | draw`)
//! - **GameRegistry** / **PlayerRegistry**: shared in-memory maps; every
//!   mutation runs under the registry lock, so concurrent requests never
//!   observe a half-applied transition
//! - **Engine**: composition root wiring terminal match results into player
//!   statistics
//!
//! # Example
//!
//! ```
//! use gridmatch::Engine;
//!
//! # fn main() -> Result<(), gridmatch::Error> {
//! let engine = Engine::new();
//! let alice = engine.players().create("Alice", "alice@example.com")?;
//! let bob = engine.players().create("Bob", "bob@example.com")?;
//!
//! let game = engine.games().create(Some("lunch break".to_string()));
//! engine.join_game(game.id(), alice.id())?;
//! engine.join_game(game.id(), bob.id())?;
//!
//! // Alice joined first, so she has the opening move.
//! let (game, _record) = engine.make_move(game.id(), alice.id(), 0, 0)?;
//! assert_eq!(game.current_player_id().as_deref(), Some(bob.id().as_str()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod engine;
mod error;
mod game;
mod players;
mod registry;

pub use board::{BOARD_SIZE, Board, Coord, LineKind, WinLine};
pub use engine::Engine;
pub use error::{EntityKind, Error};
pub use game::{
    Game, GameConcluded, GameId, GameStats, GameStatus, MoveRecord, Participant,
    ParticipantResult,
};
pub use players::{Player, PlayerId, PlayerRegistry, PlayerStats, PlayerUpdate};
pub use registry::{GameRegistry, MoveOutcome};
