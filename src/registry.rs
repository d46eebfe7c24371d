//! Match registry: owns every match and serializes mutation.
//!
//! All matches live in one shared map behind a mutex. Join and move
//! transitions run while the lock is held, so two concurrent moves against
//! the same match can never both observe "my turn": the second sees the
//! board the first left behind. A registry-wide lock trades throughput for
//! simplicity; this workload is not latency-critical.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument, warn};

use crate::board::Coord;
use crate::error::{EntityKind, Error};
use crate::game::{Game, GameConcluded, GameId, GameStats, GameStatus, MoveRecord, Participant};

/// Result of a successfully applied move.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Snapshot of the match after the move.
    pub game: Game,
    /// The recorded move.
    pub record: MoveRecord,
    /// The terminal event, present only when this move ended the match.
    pub concluded: Option<GameConcluded>,
}

/// Shared, in-memory registry of all matches.
///
/// Clones share the same underlying map, so one registry handle per
/// process can be passed to every request handler.
#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    games: Arc<Mutex<HashMap<GameId, Game>>>,
}

impl GameRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a match and returns its snapshot. Always succeeds.
    #[instrument(skip(self))]
    pub fn create(&self, name: Option<String>) -> Game {
        let game = Game::new(name);
        let mut games = self.games.lock().unwrap();
        games.insert(game.id().clone(), game.clone());
        game
    }

    /// Returns a point-in-time snapshot of the match.
    ///
    /// # Errors
    ///
    /// `NotFound` if no match has this id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Game, Error> {
        let games = self.games.lock().unwrap();
        games
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::Match, id))
    }

    /// Seats a participant in the match and returns the updated snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown match; otherwise whatever
    /// [`Game::join`] rejects with.
    #[instrument(skip(self, participant), fields(player_id = %participant.id))]
    pub fn join(&self, id: &str, participant: Participant) -> Result<Game, Error> {
        let mut games = self.games.lock().unwrap();
        let game = games
            .get_mut(id)
            .ok_or_else(|| Error::not_found(EntityKind::Match, id))?;
        game.join(participant)?;
        Ok(game.clone())
    }

    /// Applies a move while holding the registry lock.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown match; otherwise whatever
    /// [`Game::make_move`] rejects with. A failed move leaves the match
    /// untouched.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        id: &str,
        player_id: &str,
        row: usize,
        col: usize,
    ) -> Result<MoveOutcome, Error> {
        let mut games = self.games.lock().unwrap();
        let game = games
            .get_mut(id)
            .ok_or_else(|| Error::not_found(EntityKind::Match, id))?;
        let record = game.make_move(player_id, row, col)?;
        Ok(MoveOutcome {
            game: game.clone(),
            record,
            concluded: game.concluded(),
        })
    }

    /// Lists match snapshots, newest-created first, optionally filtered by
    /// status.
    #[instrument(skip(self))]
    pub fn list(&self, status: Option<GameStatus>) -> Vec<Game> {
        let games = self.games.lock().unwrap();
        let mut listed: Vec<Game> = games
            .values()
            .filter(|g| status.is_none_or(|s| *g.status() == s))
            .cloned()
            .collect();
        drop(games);
        listed.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        debug!(count = listed.len(), "listed matches");
        listed
    }

    /// Coordinates of the match's empty cells.
    ///
    /// # Errors
    ///
    /// `NotFound` if no match has this id.
    #[instrument(skip(self))]
    pub fn valid_moves(&self, id: &str) -> Result<Vec<Coord>, Error> {
        let games = self.games.lock().unwrap();
        games
            .get(id)
            .map(Game::valid_moves)
            .ok_or_else(|| Error::not_found(EntityKind::Match, id))
    }

    /// Timing summary for the match.
    ///
    /// # Errors
    ///
    /// `NotFound` if no match has this id.
    #[instrument(skip(self))]
    pub fn stats(&self, id: &str) -> Result<GameStats, Error> {
        let games = self.games.lock().unwrap();
        games
            .get(id)
            .map(Game::stats)
            .ok_or_else(|| Error::not_found(EntityKind::Match, id))
    }

    /// Removes a match. Active matches are protected; any other status may
    /// be deleted. Removal is atomic: a concurrent move against a
    /// just-deleted match fails `NotFound`, never partially applies.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown match, `InvalidState` while it is active.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<(), Error> {
        let mut games = self.games.lock().unwrap();
        let game = games
            .get(id)
            .ok_or_else(|| Error::not_found(EntityKind::Match, id))?;
        if *game.status() == GameStatus::Active {
            warn!(game_id = id, "delete rejected: match is active");
            return Err(Error::InvalidState {
                status: GameStatus::Active,
            });
        }
        games.remove(id);
        info!(game_id = id, "match deleted");
        Ok(())
    }
}
