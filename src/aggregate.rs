use std::collections::HashSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{normalize_boxscore, BoxScoreShape};
use crate::state::{LiveGame, PlayerStatLine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Not started, rate limited, 404/5xx or timed out.
    Unavailable,
    /// Transport or parse failure.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGame {
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub matchup: String,
    pub reason: SkipReason,
}

/// Merged rows for every available game, in game iteration order.
#[derive(Debug, Clone, Default)]
pub struct GameTable {
    pub rows: Vec<PlayerStatLine>,
    pub skipped: Vec<SkippedGame>,
    pub games_seen: usize,
}

impl GameTable {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Drops repeated game ids (overlapping date windows); first occurrence wins.
pub fn dedup_games(games: Vec<LiveGame>) -> Vec<LiveGame> {
    let mut seen = HashSet::with_capacity(games.len());
    games
        .into_iter()
        .filter(|g| seen.insert(g.game_id.clone()))
        .collect()
}

/// Fetches and normalizes each game once, one at a time. A game whose box
/// score is unavailable or fails to load is recorded in `skipped`; it never
/// aborts the rest of the pull.
pub fn aggregate_games<F>(shape: BoxScoreShape, games: &[LiveGame], mut fetch: F) -> GameTable
where
    F: FnMut(&LiveGame) -> Result<Option<Value>>,
{
    let mut table = GameTable::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(games.len());

    for game in games {
        if !seen.insert(game.game_id.as_str()) {
            continue;
        }
        table.games_seen += 1;

        let raw = match fetch(game) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(game_id = %game.game_id, "box score not available yet");
                table.skipped.push(SkippedGame {
                    game_id: game.game_id.clone(),
                    matchup: game.matchup(),
                    reason: SkipReason::Unavailable,
                });
                continue;
            }
            Err(err) => {
                tracing::warn!(game_id = %game.game_id, error = %format!("{err:#}"), "box score fetch failed");
                table.skipped.push(SkippedGame {
                    game_id: game.game_id.clone(),
                    matchup: game.matchup(),
                    reason: SkipReason::Error(format!("{err:#}")),
                });
                continue;
            }
        };

        let mut rows = normalize_boxscore(shape, &raw);
        tag_rows(&mut rows, game);
        for row in rows.iter().filter(|r| !r.shooting_is_consistent()) {
            tracing::debug!(player = %row.name, game_id = %game.game_id, "made exceeds attempted upstream");
        }
        table.rows.extend(rows);
    }

    tracing::info!(
        games = table.games_seen,
        rows = table.rows.len(),
        skipped = table.skipped_count(),
        "aggregated box scores"
    );
    table
}

pub fn tag_rows(rows: &mut [PlayerStatLine], game: &LiveGame) {
    let matchup = game.matchup();
    for row in rows {
        row.matchup = matchup.clone();
        row.game_id = game.game_id.clone();
    }
}
