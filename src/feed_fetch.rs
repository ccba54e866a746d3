use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::config::FeedConfig;
use crate::http_client::{fetch_json, fetch_json_optional, http_client};
use crate::normalize::BoxScoreShape;
use crate::state::LiveGame;

const NBA_HEADERS: &[(&str, &str)] = &[
    ("Referer", "https://www.nba.com/"),
    ("Origin", "https://www.nba.com"),
];

/// Upstream collaborator for one refresh cycle.
///
/// `live_games` errors end the cycle. `boxscore` returns `Ok(None)` when the
/// game has no box score yet (or the feed is temporarily refusing us); the
/// aggregator skips those games and errors alike.
pub trait LiveFeed {
    fn label(&self) -> &'static str;
    fn shape(&self) -> BoxScoreShape;
    fn live_games(&mut self) -> Result<Vec<LiveGame>>;
    fn boxscore(&mut self, game: &LiveGame) -> Result<Option<Value>>;
}

pub struct NbaCdnFeed {
    scoreboard_url: String,
    boxscore_url: String,
    timeout_secs: u64,
}

impl NbaCdnFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            scoreboard_url: config.nba_scoreboard_url.clone(),
            boxscore_url: config.nba_boxscore_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl LiveFeed for NbaCdnFeed {
    fn label(&self) -> &'static str {
        "NBA CDN"
    }

    fn shape(&self) -> BoxScoreShape {
        BoxScoreShape::NbaCdn
    }

    fn live_games(&mut self) -> Result<Vec<LiveGame>> {
        let client = http_client(self.timeout_secs)?;
        let body = fetch_json(client, &self.scoreboard_url, NBA_HEADERS)
            .context("nba scoreboard request failed")?;
        parse_nba_scoreboard_json(&body)
    }

    fn boxscore(&mut self, game: &LiveGame) -> Result<Option<Value>> {
        let client = http_client(self.timeout_secs)?;
        let url = self.boxscore_url.replace("{game_id}", &game.game_id);
        let Some(body) = fetch_json_optional(client, &url, NBA_HEADERS)
            .with_context(|| format!("nba boxscore {} failed", game.game_id))?
        else {
            return Ok(None);
        };
        parse_boxscore_json(&body)
    }
}

pub struct EspnFeed {
    scoreboard_url: String,
    summary_url: String,
    window_days: u32,
    timeout_secs: u64,
}

impl EspnFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            scoreboard_url: config.espn_scoreboard_url.clone(),
            summary_url: config.espn_summary_url.clone(),
            window_days: config.espn_window_days,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl LiveFeed for EspnFeed {
    fn label(&self) -> &'static str {
        "ESPN"
    }

    fn shape(&self) -> BoxScoreShape {
        BoxScoreShape::EspnSummary
    }

    /// Today plus the previous days in the window (UTC), so late US games
    /// are still listed after midnight UTC. Overlaps are removed later.
    fn live_games(&mut self) -> Result<Vec<LiveGame>> {
        let client = http_client(self.timeout_secs)?;
        let mut games = Vec::new();
        for date in espn_dates(self.window_days) {
            let url = format!("{}?dates={date}", self.scoreboard_url);
            let body = fetch_json(client, &url, &[])
                .with_context(|| format!("espn scoreboard {date} failed"))?;
            games.extend(parse_espn_scoreboard_json(&body)?);
        }
        Ok(games)
    }

    fn boxscore(&mut self, game: &LiveGame) -> Result<Option<Value>> {
        let client = http_client(self.timeout_secs)?;
        let url = format!("{}?event={}", self.summary_url, game.game_id);
        let Some(body) = fetch_json_optional(client, &url, &[])
            .with_context(|| format!("espn summary {} failed", game.game_id))?
        else {
            return Ok(None);
        };
        parse_boxscore_json(&body)
    }
}

pub fn espn_dates(days: u32) -> Vec<String> {
    let today = Utc::now().date_naive();
    (0..days.max(1))
        .map(|offset| {
            (today - ChronoDuration::days(i64::from(offset)))
                .format("%Y%m%d")
                .to_string()
        })
        .collect()
}

/// A box-score body. Empty or `null` means the game is not available.
pub fn parse_boxscore_json(raw: &str) -> Result<Option<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(trimmed).context("invalid boxscore json")?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(value))
}

#[derive(Debug, Deserialize)]
struct NbaScoreboardResponse {
    #[serde(default)]
    scoreboard: Option<NbaScoreboard>,
}

#[derive(Debug, Deserialize)]
struct NbaScoreboard {
    #[serde(rename = "gameDate")]
    game_date: Option<String>,
    #[serde(default)]
    games: Vec<NbaGame>,
}

#[derive(Debug, Deserialize)]
struct NbaGame {
    #[serde(rename = "gameId")]
    game_id: String,
    #[serde(rename = "gameStatusText")]
    game_status_text: Option<String>,
    #[serde(rename = "gameEt")]
    game_et: Option<String>,
    #[serde(rename = "homeTeam", default)]
    home_team: NbaTeam,
    #[serde(rename = "awayTeam", default)]
    away_team: NbaTeam,
}

#[derive(Debug, Default, Deserialize)]
struct NbaTeam {
    #[serde(rename = "teamTricode", default)]
    team_tricode: String,
}

pub fn parse_nba_scoreboard_json(raw: &str) -> Result<Vec<LiveGame>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: NbaScoreboardResponse =
        serde_json::from_str(trimmed).context("invalid nba scoreboard json")?;
    let Some(board) = data.scoreboard else {
        return Ok(Vec::new());
    };

    let game_date = board.game_date;
    Ok(board
        .games
        .into_iter()
        .map(|g| LiveGame {
            game_id: g.game_id,
            date: g
                .game_et
                .as_deref()
                .and_then(|et| et.get(..10))
                .map(str::to_string)
                .or_else(|| game_date.clone()),
            home: g.home_team.team_tricode,
            away: g.away_team.team_tricode,
            status: g.game_status_text.map(|s| s.trim().to_string()),
        })
        .collect())
}

/// ESPN scoreboards are parsed leniently; events without an id are dropped.
pub fn parse_espn_scoreboard_json(raw: &str) -> Result<Vec<LiveGame>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid espn scoreboard json")?;
    let mut games = Vec::new();
    let Some(events) = root.get("events").and_then(|v| v.as_array()) else {
        return Ok(games);
    };

    for event in events {
        let Some(game_id) = event.get("id").and_then(value_to_id) else {
            continue;
        };
        let competitors = event
            .get("competitions")
            .and_then(|v| v.as_array())
            .and_then(|list| list.first())
            .and_then(|c| c.get("competitors"))
            .and_then(|v| v.as_array());
        let mut home = String::new();
        let mut away = String::new();
        for competitor in competitors.into_iter().flatten() {
            let abbr = competitor
                .get("team")
                .and_then(|t| t.get("abbreviation"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .trim()
                .to_string();
            match competitor.get("homeAway").and_then(|v| v.as_str()) {
                Some("home") => home = abbr,
                Some("away") => away = abbr,
                _ => {}
            }
        }
        let status = event
            .get("status")
            .and_then(|s| s.get("type"))
            .and_then(|t| t.get("shortDetail").or_else(|| t.get("state")))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let date = event
            .get("date")
            .and_then(|v| v.as_str())
            .and_then(|d| d.get(..10))
            .map(str::to_string);

        games.push(LiveGame {
            game_id,
            date,
            home,
            away,
            status,
        });
    }
    Ok(games)
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
