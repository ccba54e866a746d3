use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::state::PlayerStatLine;

/// Outcome of one refresh cycle as seen by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Ready,
    /// The games list itself was empty.
    NoGames,
    /// Games exist but none produced player rows yet.
    NoPlayerRows,
    /// The games-list fetch failed; nothing could be aggregated.
    FeedUnavailable,
}

impl TableStatus {
    pub fn notice(self) -> Option<&'static str> {
        match self {
            TableStatus::Ready => None,
            TableStatus::NoGames => Some("No live games found right now"),
            TableStatus::NoPlayerRows => Some("No player stats available yet"),
            TableStatus::FeedUnavailable => Some("Feed temporarily unavailable"),
        }
    }
}

pub fn classify(games: usize, rows: usize) -> TableStatus {
    if games == 0 {
        TableStatus::NoGames
    } else if rows == 0 {
        TableStatus::NoPlayerRows
    } else {
        TableStatus::Ready
    }
}

/// Stable sort: PTS, then FGA, then 3PA, then TO, all descending. Fully
/// tied rows keep their aggregation order.
pub fn sort_rows(rows: &mut [PlayerStatLine]) {
    rows.sort_by(compare_rows);
}

pub fn compare_rows(a: &PlayerStatLine, b: &PlayerStatLine) -> Ordering {
    sort_key(b).cmp(&sort_key(a))
}

fn sort_key(row: &PlayerStatLine) -> (u32, u32, u32, u32) {
    (row.pts, row.fga, row.fg3a, row.tov)
}
