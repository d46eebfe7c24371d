//! Player registry and aggregate statistics.
//!
//! Players are identity records (name, normalized email) plus raw stat
//! counters. Derived values (win rate, efficiency, average moves per win)
//! are computed on demand from the counters, so they can never drift out of
//! sync with the stored totals. Counters advance only when a concluded
//! match is recorded (see [`PlayerRegistry::record_result`]).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{EntityKind, Error};
use crate::game::GameConcluded;

/// Unique identifier for a player.
pub type PlayerId = String;

/// Basic `local@domain.tld` shape check; full RFC validation is not the
/// registry's job.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Raw aggregate counters for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerStats {
    /// Matches that reached a terminal state with this player seated.
    games_played: u64,
    /// Matches won.
    games_won: u64,
    /// Matches lost.
    games_lost: u64,
    /// Matches drawn.
    games_drawn: u64,
    /// Moves made across all concluded matches.
    total_moves: u64,
}

impl PlayerStats {
    /// Win rate as a percentage of games played, 0 if no games.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64 * 100.0
        }
    }

    /// Wins per move made, 0 if no moves.
    pub fn efficiency(&self) -> f64 {
        if self.total_moves == 0 {
            0.0
        } else {
            self.games_won as f64 / self.total_moves as f64
        }
    }

    /// Moves made per win, 0 if no wins.
    pub fn average_moves_per_win(&self) -> f64 {
        if self.games_won == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games_won as f64
        }
    }
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Player {
    /// Unique, immutable identifier.
    id: PlayerId,
    /// Display name, trimmed.
    name: String,
    /// Normalized (lowercased, trimmed) email, unique across all players.
    email: String,
    /// Aggregate statistics.
    stats: PlayerStats,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Time of the last profile or stat update.
    updated_at: DateTime<Utc>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    /// New display name, validated like on create.
    pub name: Option<String>,
    /// New email, validated and checked for uniqueness like on create.
    pub email: Option<String>,
}

/// Shared, in-memory registry of all players.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Arc<Mutex<HashMap<PlayerId, Player>>>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player with zeroed stats.
    ///
    /// The name is trimmed and the email normalized to lowercase before
    /// the uniqueness check.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name or a malformed email,
    /// `Conflict` if another player already holds the normalized email.
    #[instrument(skip(self))]
    pub fn create(&self, name: &str, email: &str) -> Result<Player, Error> {
        let name = valid_name(name)?;
        let email = valid_email(email)?;

        let mut players = self.players.lock().unwrap();
        if players.values().any(|p| p.email == email) {
            warn!(email = %email, "create rejected: email already in use");
            return Err(Error::Conflict {
                reason: format!("email {email} is already in use by another player"),
            });
        }

        let now = Utc::now();
        let player = Player {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            stats: PlayerStats::default(),
            created_at: now,
            updated_at: now,
        };
        players.insert(player.id.clone(), player.clone());
        info!(player_id = %player.id, "player created");
        Ok(player)
    }

    /// Returns a point-in-time snapshot of the player.
    ///
    /// # Errors
    ///
    /// `NotFound` if no player has this id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Player, Error> {
        let players = self.players.lock().unwrap();
        players
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::Player, id))
    }

    /// Looks a player up by email; the argument is normalized before the
    /// comparison. Absence is not an error here.
    #[instrument(skip(self))]
    pub fn get_by_email(&self, email: &str) -> Option<Player> {
        let normalized = email.trim().to_lowercase();
        let players = self.players.lock().unwrap();
        players.values().find(|p| p.email == normalized).cloned()
    }

    /// Applies a partial profile update.
    ///
    /// Provided fields are re-validated with the same rules as
    /// [`PlayerRegistry::create`]; the email uniqueness check excludes the
    /// player being updated. A failed update changes nothing.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown player, `InvalidArgument`/`Conflict` from
    /// field validation.
    #[instrument(skip(self, update))]
    pub fn update(&self, id: &str, update: PlayerUpdate) -> Result<Player, Error> {
        let mut players = self.players.lock().unwrap();
        if !players.contains_key(id) {
            return Err(Error::not_found(EntityKind::Player, id));
        }

        let name = update.name.as_deref().map(valid_name).transpose()?;
        let email = update.email.as_deref().map(valid_email).transpose()?;
        if let Some(email) = &email {
            if players.values().any(|p| p.email == *email && p.id != id) {
                warn!(player_id = id, email = %email, "update rejected: email already in use");
                return Err(Error::Conflict {
                    reason: format!("email {email} is already in use by another player"),
                });
            }
        }

        let player = players
            .get_mut(id)
            .ok_or_else(|| Error::not_found(EntityKind::Player, id))?;
        if let Some(name) = name {
            player.name = name;
        }
        if let Some(email) = email {
            player.email = email;
        }
        player.updated_at = Utc::now();
        info!(player_id = %player.id, "player updated");
        Ok(player.clone())
    }

    /// Removes a player.
    ///
    /// Matches the player already joined keep their participant snapshot;
    /// only future stat updates are skipped.
    ///
    /// # Errors
    ///
    /// `NotFound` if no player has this id.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<(), Error> {
        let mut players = self.players.lock().unwrap();
        if players.remove(id).is_none() {
            return Err(Error::not_found(EntityKind::Player, id));
        }
        info!(player_id = id, "player deleted");
        Ok(())
    }

    /// All players ordered by games won descending, ties broken by
    /// efficiency descending.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<Player> {
        let players = self.players.lock().unwrap();
        let mut listed: Vec<Player> = players.values().cloned().collect();
        drop(players);
        listed.sort_by(|a, b| {
            b.stats
                .games_won
                .cmp(&a.stats.games_won)
                .then_with(|| cmp_f64_desc(a.stats.efficiency(), b.stats.efficiency()))
        });
        listed
    }

    /// Case-insensitive substring search on player names, ordered by games
    /// won descending and truncated to `limit`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty query or a limit outside `[1, 100]`.
    #[instrument(skip(self))]
    pub fn search_by_name(&self, query: &str, limit: usize) -> Result<Vec<Player>, Error> {
        if query.is_empty() {
            return Err(Error::InvalidArgument {
                reason: "search query must be non-empty".to_string(),
            });
        }
        valid_limit(limit)?;

        let needle = query.trim().to_lowercase();
        let players = self.players.lock().unwrap();
        let mut found: Vec<Player> = players
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        drop(players);
        found.sort_by(|a, b| b.stats.games_won.cmp(&a.stats.games_won));
        found.truncate(limit);
        debug!(count = found.len(), "search finished");
        Ok(found)
    }

    /// Leaderboard by games won, truncated to `limit`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a limit outside `[1, 100]`.
    #[instrument(skip(self))]
    pub fn top_by_wins(&self, limit: usize) -> Result<Vec<Player>, Error> {
        valid_limit(limit)?;
        let mut listed = self.list();
        listed.truncate(limit);
        Ok(listed)
    }

    /// Leaderboard by efficiency (wins per move), ties broken by games won,
    /// truncated to `limit`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a limit outside `[1, 100]`.
    #[instrument(skip(self))]
    pub fn top_by_efficiency(&self, limit: usize) -> Result<Vec<Player>, Error> {
        valid_limit(limit)?;
        let players = self.players.lock().unwrap();
        let mut listed: Vec<Player> = players.values().cloned().collect();
        drop(players);
        listed.sort_by(|a, b| {
            cmp_f64_desc(a.stats.efficiency(), b.stats.efficiency())
                .then_with(|| b.stats.games_won.cmp(&a.stats.games_won))
        });
        listed.truncate(limit);
        Ok(listed)
    }

    /// Applies a concluded match to both participants' counters under one
    /// lock acquisition.
    ///
    /// Each seated participant gets `games_played + 1` and their move
    /// count added to `total_moves`; the winner gets `games_won + 1`, the
    /// other side `games_lost + 1`, or both `games_drawn + 1` on a draw.
    /// A participant deleted mid-match is skipped with a warning.
    #[instrument(skip(self, event), fields(game_id = %event.game_id))]
    pub fn record_result(&self, event: &GameConcluded) {
        let mut players = self.players.lock().unwrap();
        for result in &event.participants {
            let Some(player) = players.get_mut(&result.player_id) else {
                warn!(
                    player_id = %result.player_id,
                    "participant no longer registered, skipping stat update"
                );
                continue;
            };
            player.stats.games_played += 1;
            player.stats.total_moves += result.moves_made as u64;
            match &event.winner_id {
                Some(winner) if *winner == result.player_id => player.stats.games_won += 1,
                Some(_) => player.stats.games_lost += 1,
                None => player.stats.games_drawn += 1,
            }
            player.updated_at = Utc::now();
            debug!(
                player_id = %player.id,
                games_played = player.stats.games_played,
                "stats updated"
            );
        }
    }
}

fn valid_name(name: &str) -> Result<String, Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument {
            reason: "player name must be a non-empty string".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn valid_email(email: &str) -> Result<String, Error> {
    let normalized = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(Error::InvalidArgument {
            reason: format!("'{email}' is not a valid email address"),
        });
    }
    Ok(normalized)
}

fn valid_limit(limit: usize) -> Result<(), Error> {
    if !(1..=100).contains(&limit) {
        return Err(Error::InvalidArgument {
            reason: format!("limit must be between 1 and 100, got {limit}"),
        });
    }
    Ok(())
}

fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
