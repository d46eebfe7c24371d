//! Per-match state machine.
//!
//! A [`Game`] owns one board, its joined participants, the turn pointer,
//! the move history, and the lifecycle status. It is mutated only through
//! [`Game::join`] and [`Game::make_move`]; both are called by the registry
//! while it holds the map lock, so a match never observes a half-applied
//! transition.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::board::{Board, Coord};
use crate::error::Error;
use crate::players::PlayerId;

/// Unique identifier for a match.
pub type GameId = String;

/// Lifecycle status of a match.
///
/// Transitions are `waiting -> active -> completed | draw`; the two
/// terminal states permit no further board or player mutation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Created, fewer than two players joined.
    Waiting,
    /// Two players joined, moves are being exchanged.
    Active,
    /// A player completed a winning line.
    Completed,
    /// The board filled with no winner.
    Draw,
}

impl GameStatus {
    /// True for `completed` and `draw`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Draw)
    }
}

/// Point-in-time snapshot of a player taken at join time.
///
/// This is a copy of `{id, name}`, not a live reference: later profile
/// edits never alter the historical match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Participant {
    /// The player's id.
    pub id: PlayerId,
    /// The player's display name as of join time.
    pub name: String,
}

/// One recorded move. Immutable once appended to a match's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MoveRecord {
    /// Unique id of the move.
    id: String,
    /// The match this move belongs to.
    game_id: GameId,
    /// The player that moved.
    player_id: PlayerId,
    /// Row of the marked cell.
    row: usize,
    /// Column of the marked cell.
    col: usize,
    /// When the move was recorded.
    timestamp: DateTime<Utc>,
}

/// Timing summary for one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Number of recorded moves.
    pub total_moves: usize,
    /// Elapsed time between creation and the last update, in milliseconds.
    pub duration_ms: i64,
    /// Average time per move in milliseconds, 0 if no moves were made.
    pub average_move_ms: f64,
}

/// Per-participant share of a concluded match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct ParticipantResult {
    /// The participant's player id.
    pub player_id: PlayerId,
    /// How many moves that player made in the match.
    pub moves_made: usize,
}

/// Terminal-state event: emitted once when a match completes or draws,
/// consumed by the player registry to update aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConcluded {
    /// The match that ended.
    pub game_id: GameId,
    /// The winner, or `None` for a draw.
    pub winner_id: Option<PlayerId>,
    /// Both participants with their move counts.
    pub participants: Vec<ParticipantResult>,
}

/// One match, from creation to a terminal state or deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Game {
    /// Unique, immutable identifier.
    id: GameId,
    /// Display name.
    name: String,
    /// Lifecycle status.
    status: GameStatus,
    /// The board.
    board: Board,
    /// Joined participants, in join order (capacity 2).
    players: Vec<Participant>,
    /// Id of the player whose turn it is; set only while active.
    current_player_id: Option<PlayerId>,
    /// Id of the winning player; set only when completed.
    winner_id: Option<PlayerId>,
    /// Chronological move history.
    moves: Vec<MoveRecord>,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Time of the last accepted mutation.
    updated_at: DateTime<Utc>,
}

impl Game {
    /// Creates a match in `waiting` with an empty board.
    ///
    /// `name` defaults to a generated `game-<millis>` label when absent.
    pub fn new(name: Option<String>) -> Self {
        let now = Utc::now();
        let name = name.unwrap_or_else(|| format!("game-{}", now.timestamp_millis()));
        let game = Self {
            id: Uuid::new_v4().to_string(),
            name,
            status: GameStatus::Waiting,
            board: Board::new(),
            players: Vec::new(),
            current_player_id: None,
            winner_id: None,
            moves: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        info!(game_id = %game.id, name = %game.name, "match created");
        game
    }

    /// Seats a participant.
    ///
    /// On the second successful join the match becomes `active` and the
    /// first joiner gets the opening move.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the match is no longer waiting, `Full` if two
    /// players are already seated, `Conflict` if this player already joined.
    #[instrument(skip(self, participant), fields(game_id = %self.id, player_id = %participant.id))]
    pub fn join(&mut self, participant: Participant) -> Result<(), Error> {
        if self.status != GameStatus::Waiting {
            warn!(game_id = %self.id, status = %self.status, "join rejected: match not accepting players");
            return Err(Error::InvalidState {
                status: self.status,
            });
        }
        if self.players.len() >= 2 {
            warn!(game_id = %self.id, "join rejected: match full");
            return Err(Error::Full);
        }
        if self.players.iter().any(|p| p.id == participant.id) {
            warn!(game_id = %self.id, player_id = %participant.id, "join rejected: already seated");
            return Err(Error::Conflict {
                reason: format!("player {} already joined the match", participant.id),
            });
        }

        info!(game_id = %self.id, player_id = %participant.id, seat = self.players.len(), "player joined");
        self.players.push(participant);
        if self.players.len() == 2 {
            self.status = GameStatus::Active;
            self.current_player_id = Some(self.players[0].id.clone());
            info!(game_id = %self.id, first_mover = %self.players[0].id, "match active");
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Applies a move for `player_id` at `(row, col)`.
    ///
    /// On success the cell is marked, a [`MoveRecord`] is appended, and the
    /// terminal conditions are evaluated in order: win for the mover, then
    /// full-board draw, then turn rotation to the other participant. In
    /// both terminal states the turn pointer is cleared.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the match is not active, `Forbidden` if it is not
    /// this player's turn, `OutOfRange` for coordinates outside 0-2,
    /// `Occupied` if the cell is taken.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn make_move(
        &mut self,
        player_id: &str,
        row: usize,
        col: usize,
    ) -> Result<MoveRecord, Error> {
        if self.status != GameStatus::Active {
            warn!(game_id = %self.id, status = %self.status, "move rejected: match not active");
            return Err(Error::InvalidState {
                status: self.status,
            });
        }
        if self.current_player_id.as_deref() != Some(player_id) {
            warn!(game_id = %self.id, player_id, "move rejected: out of turn");
            return Err(Error::Forbidden {
                player_id: player_id.to_string(),
            });
        }
        if row > 2 || col > 2 {
            warn!(game_id = %self.id, row, col, "move rejected: out of range");
            return Err(Error::OutOfRange { row, col });
        }
        if self.board.get(row, col).is_some() {
            warn!(game_id = %self.id, row, col, "move rejected: cell occupied");
            return Err(Error::Occupied { row, col });
        }

        self.board.place(row, col, player_id.to_string());
        let record = MoveRecord {
            id: Uuid::new_v4().to_string(),
            game_id: self.id.clone(),
            player_id: player_id.to_string(),
            row,
            col,
            timestamp: Utc::now(),
        };
        self.updated_at = record.timestamp;
        self.moves.push(record.clone());

        if let Some(line) = self.board.winning_line(player_id) {
            self.status = GameStatus::Completed;
            self.winner_id = Some(player_id.to_string());
            self.current_player_id = None;
            info!(
                game_id = %self.id,
                winner = %player_id,
                line_kind = ?line.kind,
                line_index = line.index,
                "match completed"
            );
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
            self.current_player_id = None;
            info!(game_id = %self.id, "match drawn");
        } else if let Some(next) = self.players.iter().find(|p| p.id != player_id) {
            self.current_player_id = Some(next.id.clone());
        }

        Ok(record)
    }

    /// Coordinates of all empty cells, regardless of status.
    ///
    /// Callers gate on `status == active` before treating these as moves
    /// that may be played now.
    pub fn valid_moves(&self) -> Vec<Coord> {
        self.board.open_cells()
    }

    /// Move count, elapsed duration, and average time per move.
    pub fn stats(&self) -> GameStats {
        let total_moves = self.moves.len();
        let duration_ms = (self.updated_at - self.created_at).num_milliseconds();
        let average_move_ms = if total_moves > 0 {
            duration_ms as f64 / total_moves as f64
        } else {
            0.0
        };
        GameStats {
            total_moves,
            duration_ms,
            average_move_ms,
        }
    }

    /// The terminal-state event for this match, or `None` while it is
    /// still waiting or active.
    pub fn concluded(&self) -> Option<GameConcluded> {
        if !self.status.is_terminal() {
            return None;
        }
        let participants = self
            .players
            .iter()
            .map(|p| {
                let moves_made = self.moves.iter().filter(|m| m.player_id == p.id).count();
                ParticipantResult::new(p.id.clone(), moves_made)
            })
            .collect();
        Some(GameConcluded {
            game_id: self.id.clone(),
            winner_id: self.winner_id.clone(),
            participants,
        })
    }
}
