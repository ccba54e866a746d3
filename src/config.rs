use std::env;

use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::state::clamp_refresh_secs;

pub const NBA_SCOREBOARD_URL: &str =
    "https://cdn.nba.com/static/json/liveData/scoreboard/todaysScoreboard_00.json";
pub const NBA_BOXSCORE_URL: &str =
    "https://cdn.nba.com/static/json/liveData/boxscore/boxscore_{game_id}.json";
pub const ESPN_SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/scoreboard";
pub const ESPN_SUMMARY_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/summary";

const DEFAULT_REFRESH_SECS: u64 = 15;
const DEFAULT_ESPN_WINDOW_DAYS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Nba,
    Espn,
    Demo,
}

impl Provider {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nba" | "nba_cdn" | "cdn" => Some(Provider::Nba),
            "espn" => Some(Provider::Espn),
            "demo" | "fake" | "offline" => Some(Provider::Demo),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Nba => "NBA CDN",
            Provider::Espn => "ESPN",
            Provider::Demo => "Demo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub provider: Provider,
    pub refresh_secs: u64,
    pub timeout_secs: u64,
    pub nba_scoreboard_url: String,
    pub nba_boxscore_url: String,
    pub espn_scoreboard_url: String,
    pub espn_summary_url: String,
    pub espn_window_days: u32,
    pub advanced_unlocked: bool,
    pub log_dir: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Nba,
            refresh_secs: DEFAULT_REFRESH_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            nba_scoreboard_url: NBA_SCOREBOARD_URL.to_string(),
            nba_boxscore_url: NBA_BOXSCORE_URL.to_string(),
            espn_scoreboard_url: ESPN_SCOREBOARD_URL.to_string(),
            espn_summary_url: ESPN_SUMMARY_URL.to_string(),
            espn_window_days: DEFAULT_ESPN_WINDOW_DAYS,
            advanced_unlocked: false,
            log_dir: None,
        }
    }
}

impl FeedConfig {
    /// Reads the process environment. Call `load_dotenv` first to pick up
    /// `.env.local` / `.env`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let provider = opt_env("FEED_PROVIDER")
            .and_then(|raw| Provider::parse(&raw))
            .unwrap_or(defaults.provider);
        let refresh_secs = clamp_refresh_secs(env_u64("REFRESH_SECS", DEFAULT_REFRESH_SECS));
        let timeout_secs = env_u64("HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS).clamp(1, 120);
        let espn_window_days = env::var("ESPN_DATE_WINDOW_DAYS")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_ESPN_WINDOW_DAYS)
            .clamp(1, 7);

        Self {
            provider,
            refresh_secs,
            timeout_secs,
            nba_scoreboard_url: opt_env("NBA_SCOREBOARD_URL").unwrap_or(defaults.nba_scoreboard_url),
            nba_boxscore_url: opt_env("NBA_BOXSCORE_URL").unwrap_or(defaults.nba_boxscore_url),
            espn_scoreboard_url: opt_env("ESPN_SCOREBOARD_URL")
                .unwrap_or(defaults.espn_scoreboard_url),
            espn_summary_url: opt_env("ESPN_SUMMARY_URL").unwrap_or(defaults.espn_summary_url),
            espn_window_days,
            advanced_unlocked: env_bool("ADVANCED_UNLOCKED", false),
            log_dir: opt_env("STATLINE_LOG_DIR"),
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            t == "1" || t == "true" || t == "on" || t == "yes"
        })
        .unwrap_or(default)
}
