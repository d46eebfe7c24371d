//! Composition root: both registries plus the stat-aggregation wiring.
//!
//! The engine is what the request-handling layer gets injected with: one
//! value owning the match and player registries, instead of module-level
//! singletons. It resolves the player snapshot at join time and forwards
//! terminal match events to the player registry so aggregate statistics
//! actually move.

use tracing::{info, instrument};

use crate::error::Error;
use crate::game::{Game, MoveRecord, Participant};
use crate::players::PlayerRegistry;
use crate::registry::GameRegistry;

/// The match engine: match registry, player registry, and the wiring
/// between them.
///
/// Cloning is cheap and shares the underlying registries.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    games: GameRegistry,
    players: PlayerRegistry,
}

impl Engine {
    /// Creates an engine with empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// The match registry.
    pub fn games(&self) -> &GameRegistry {
        &self.games
    }

    /// The player registry.
    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    /// Seats a registered player in a match.
    ///
    /// The player's `{id, name}` is copied into the match at this point;
    /// later profile edits do not change the historical record.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown player or match; otherwise whatever
    /// [`GameRegistry::join`] rejects with.
    #[instrument(skip(self))]
    pub fn join_game(&self, game_id: &str, player_id: &str) -> Result<Game, Error> {
        let player = self.players.get(player_id)?;
        let participant = Participant::new(player.id().clone(), player.name().clone());
        self.games.join(game_id, participant)
    }

    /// Applies a move and, when it concludes the match, records the result
    /// against both participants' statistics.
    ///
    /// # Errors
    ///
    /// Whatever [`GameRegistry::make_move`] rejects with. Stat recording
    /// itself cannot fail; a participant deleted mid-match is skipped.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        game_id: &str,
        player_id: &str,
        row: usize,
        col: usize,
    ) -> Result<(Game, MoveRecord), Error> {
        let outcome = self.games.make_move(game_id, player_id, row, col)?;
        if let Some(event) = &outcome.concluded {
            info!(
                game_id = %event.game_id,
                winner = ?event.winner_id,
                "match concluded, recording results"
            );
            self.players.record_result(event);
        }
        Ok((outcome.game, outcome.record))
    }
}
