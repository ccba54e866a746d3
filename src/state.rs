use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::advanced::{compute_advanced, AdvancedStatLine};
use crate::feed::CycleSnapshot;
use crate::table::TableStatus;
use crate::watchlist::{WatchRow, WatchStat, Watchlist};

pub const MIN_REFRESH_SECS: u64 = 5;
pub const MAX_REFRESH_SECS: u64 = 60;
pub const REFRESH_STEP_SECS: u64 = 5;
pub const TARGET_STEP: f64 = 0.5;

const MAX_LOGS: usize = 200;

/// One player's box-score line for a single game snapshot.
///
/// Every provider adapter converges on this record; nothing downstream reads
/// provider-specific keys. Missing JSON fields deserialize to zero/empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStatLine {
    pub name: String,
    pub team: String,
    pub matchup: String,
    #[serde(rename = "gameId")]
    pub game_id: String,
    /// Decimal minutes.
    #[serde(rename = "MIN")]
    pub minutes: f64,
    #[serde(rename = "PTS")]
    pub pts: u32,
    #[serde(rename = "FGM")]
    pub fgm: u32,
    #[serde(rename = "FGA")]
    pub fga: u32,
    #[serde(rename = "3PM")]
    pub fg3m: u32,
    #[serde(rename = "3PA")]
    pub fg3a: u32,
    #[serde(rename = "FTM")]
    pub ftm: u32,
    #[serde(rename = "FTA")]
    pub fta: u32,
    #[serde(rename = "OREB")]
    pub oreb: u32,
    #[serde(rename = "DREB")]
    pub dreb: u32,
    #[serde(rename = "REB")]
    pub reb: u32,
    #[serde(rename = "AST")]
    pub ast: u32,
    #[serde(rename = "STL")]
    pub stl: u32,
    #[serde(rename = "BLK")]
    pub blk: u32,
    #[serde(rename = "TO")]
    pub tov: u32,
    #[serde(rename = "PF")]
    pub pf: u32,
}

impl PlayerStatLine {
    /// Looks up a box-score column by its display name (`PTS`, `3PA`, `MIN`, ...).
    pub fn stat(&self, column: &str) -> Option<f64> {
        let value = match column.trim().to_ascii_uppercase().as_str() {
            "MIN" => return Some(self.minutes),
            "PTS" => self.pts,
            "FGM" => self.fgm,
            "FGA" => self.fga,
            "3PM" | "FG3M" => self.fg3m,
            "3PA" | "FG3A" => self.fg3a,
            "FTM" => self.ftm,
            "FTA" => self.fta,
            "OREB" => self.oreb,
            "DREB" => self.dreb,
            "REB" => self.reb,
            "AST" => self.ast,
            "STL" => self.stl,
            "BLK" => self.blk,
            "TO" | "TOV" => self.tov,
            "PF" => self.pf,
            _ => return None,
        };
        Some(f64::from(value))
    }

    /// Made never exceeds attempted for any shot type.
    pub fn shooting_is_consistent(&self) -> bool {
        self.fgm <= self.fga && self.fg3m <= self.fg3a && self.ftm <= self.fta
    }
}

/// A game from the provider's "today" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveGame {
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub date: Option<String>,
    #[serde(rename = "homeTricode")]
    pub home: String,
    #[serde(rename = "awayTricode")]
    pub away: String,
    pub status: Option<String>,
}

impl LiveGame {
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away, self.home)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    BoxScore,
    Advanced,
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetSnapshot(CycleSnapshot),
    RefreshInterval(u64),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshNow,
    SetRefreshSecs(u64),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub provider_label: String,
    pub tab: Tab,
    pub selected: usize,
    pub snapshot: Option<CycleSnapshot>,
    pub last_cycle: u64,
    pub refresh_secs: u64,
    pub advanced_unlocked: bool,
    pub watchlist: Watchlist,
    pub watch_stat: WatchStat,
    pub watch_target: f64,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            provider_label: String::new(),
            tab: Tab::BoxScore,
            selected: 0,
            snapshot: None,
            last_cycle: 0,
            refresh_secs: 15,
            advanced_unlocked: false,
            watchlist: Watchlist::new(),
            watch_stat: WatchStat::Pts,
            watch_target: 0.0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn rows(&self) -> &[PlayerStatLine] {
        self.snapshot
            .as_ref()
            .map(|s| s.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn status(&self) -> Option<TableStatus> {
        self.snapshot.as_ref().map(|s| s.status)
    }

    pub fn skipped_count(&self) -> usize {
        self.snapshot.as_ref().map(|s| s.skipped.len()).unwrap_or(0)
    }

    /// Recomputed on every call; the live table changes between cycles.
    pub fn advanced_rows(&self) -> Vec<AdvancedStatLine> {
        compute_advanced(self.rows())
    }

    pub fn watch_rows(&self) -> Vec<WatchRow> {
        self.watchlist.evaluate(self.rows())
    }

    pub fn selected_player(&self) -> Option<&PlayerStatLine> {
        self.rows().get(self.selected)
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            Tab::BoxScore => Tab::Advanced,
            Tab::Advanced => Tab::BoxScore,
        };
    }

    pub fn select_next(&mut self) {
        let total = self.rows().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let total = self.rows().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn cycle_watch_stat_next(&mut self) {
        self.watch_stat = self.watch_stat.next();
    }

    pub fn cycle_watch_stat_prev(&mut self) {
        self.watch_stat = self.watch_stat.prev();
    }

    pub fn bump_watch_target(&mut self, steps: i32) {
        let next = self.watch_target + f64::from(steps) * TARGET_STEP;
        self.watch_target = next.max(0.0);
    }

    /// Adds the highlighted player with the current stat/target selection.
    pub fn add_selected_to_watchlist(&mut self) -> bool {
        let Some(player) = self.selected_player().map(|p| p.name.clone()) else {
            self.push_log("[INFO] No player selected for watchlist");
            return false;
        };
        let target = Some(self.watch_target);
        self.watchlist.add(player.clone(), self.watch_stat, target);
        let msg = match self.watchlist.entries().last().and_then(|e| e.target) {
            Some(t) => format!(
                "[INFO] Watching {player} {} >= {}",
                self.watch_stat.label(),
                crate::watchlist::format_stat_value(t)
            ),
            None => format!("[INFO] Watching {player} {}", self.watch_stat.label()),
        };
        self.push_log(msg);
        true
    }

    pub fn clear_watchlist(&mut self) {
        self.watchlist.clear();
        self.push_log("[INFO] Watchlist cleared");
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn clamp_refresh_secs(secs: u64) -> u64 {
    secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS)
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetSnapshot(snapshot) => {
            if state.last_cycle != 0 && snapshot.cycle <= state.last_cycle {
                state.push_log(format!(
                    "[INFO] Discarded stale cycle {} (showing {})",
                    snapshot.cycle, state.last_cycle
                ));
                return;
            }
            let selected_name = state.selected_player().map(|p| p.name.clone());
            let skipped = snapshot.skipped.len();
            if skipped > 0 {
                state.push_log(format!(
                    "[INFO] Skipped {skipped} game(s) (box score not available yet)"
                ));
            }
            if let Some(notice) = snapshot.notice.as_ref() {
                state.push_log(format!("[WARN] {notice}"));
            }
            state.last_cycle = snapshot.cycle;
            state.snapshot = Some(snapshot);

            // Keep the cursor on the same player across re-sorts.
            if let Some(name) = selected_name
                && let Some(pos) = state.rows().iter().position(|r| r.name == name)
            {
                state.selected = pos;
            }
            state.clamp_selection();
        }
        Delta::RefreshInterval(secs) => {
            state.refresh_secs = clamp_refresh_secs(secs);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
