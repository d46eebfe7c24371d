//! Typed error kinds for the match engine.
//!
//! Every rejection the engine can produce is one of these kinds. Callers
//! (an HTTP layer, a load harness) match on the variant, never on message
//! text, to choose a status code. None of these errors is retryable: they
//! signal caller misuse or a business-rule rejection, and the engine never
//! leaves partial state behind a failure.

use derive_more::{Display, Error};

use crate::game::GameStatus;

/// The kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntityKind {
    /// A match in the game registry.
    #[display("match")]
    Match,
    /// A player in the player registry.
    #[display("player")]
    Player,
}

/// Error kinds produced by the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// No entity with the given identifier exists.
    #[display("{kind} {id} not found")]
    NotFound {
        /// Which registry missed.
        kind: EntityKind,
        /// The identifier that was looked up.
        id: String,
    },
    /// The operation is not legal for the match's current lifecycle state.
    #[display("operation not allowed while the match is {status}")]
    InvalidState {
        /// The status the match was in when the operation was rejected.
        status: GameStatus,
    },
    /// A player submitted a move out of turn.
    #[display("not player {player_id}'s turn")]
    Forbidden {
        /// The player that moved out of turn.
        player_id: String,
    },
    /// Move coordinates fall outside the 3x3 board.
    #[display("coordinates ({row}, {col}) are outside the board")]
    OutOfRange {
        /// Submitted row.
        row: usize,
        /// Submitted column.
        col: usize,
    },
    /// The targeted cell already holds a mark.
    #[display("cell ({row}, {col}) is already occupied")]
    Occupied {
        /// Row of the occupied cell.
        row: usize,
        /// Column of the occupied cell.
        col: usize,
    },
    /// A uniqueness rule was violated (duplicate join, duplicate email).
    #[display("{reason}")]
    Conflict {
        /// What collided.
        reason: String,
    },
    /// The match already has two players.
    #[display("match already has two players")]
    Full,
    /// A malformed name, email, or limit was supplied.
    #[display("{reason}")]
    InvalidArgument {
        /// What was malformed.
        reason: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] with an owned id.
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
