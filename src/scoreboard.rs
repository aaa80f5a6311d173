//! Win/loss/draw tallies fed by finished games.

use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strictly_tictactoe::{GameOutcome, Participant, ParticipantId};
use tracing::{debug, info, instrument};

/// One participant's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LeaderboardEntry {
    /// Display name.
    username: String,
    /// Games won.
    wins: u32,
    /// Games lost.
    losses: u32,
    /// Games drawn.
    draws: u32,
    /// Finished games of any result.
    games_played: u32,
}

impl LeaderboardEntry {
    fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
        }
    }
}

/// Running tallies for every participant who has finished a game.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    entries: Arc<Mutex<HashMap<ParticipantId, LeaderboardEntry>>>,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits a finished game to everyone who played it.
    #[instrument(skip(self, outcome), fields(draw = outcome.is_draw()))]
    pub fn record(&self, outcome: &GameOutcome) {
        let winner = outcome.winner().as_ref().map(|p| *p.id());
        let mut entries = self.entries.lock();
        for participant in outcome.participants() {
            let entry = entries
                .entry(*participant.id())
                .or_insert_with(|| LeaderboardEntry::new(participant.name()));
            match winner {
                _ if *outcome.is_draw() => entry.draws += 1,
                Some(id) if id == *participant.id() => entry.wins += 1,
                _ => entry.losses += 1,
            }
            entry.games_played += 1;
            debug!(
                participant = %participant.name(),
                wins = entry.wins,
                losses = entry.losses,
                draws = entry.draws,
                games_played = entry.games_played,
                "Tally updated"
            );
        }
        info!(players = outcome.participants().len(), "Game recorded");
    }

    /// Record for one participant; all zeros until their first finished game.
    pub fn entry(&self, participant: &Participant) -> LeaderboardEntry {
        self.entries
            .lock()
            .get(participant.id())
            .cloned()
            .unwrap_or_else(|| LeaderboardEntry::new(participant.name()))
    }

    /// All records, best first: most wins, then fewest losses, then most draws,
    /// then name.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut board: Vec<_> = self.entries.lock().values().cloned().collect();
        board.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(a.losses.cmp(&b.losses))
                .then(b.draws.cmp(&a.draws))
                .then_with(|| a.username.cmp(&b.username))
        });
        board
    }
}
