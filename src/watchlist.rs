use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::normalize::format_minutes;
use crate::state::PlayerStatLine;

/// Box-score columns a user can put on the watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchStat {
    Pts,
    Fga,
    Fg3a,
    Tov,
    Ast,
    Reb,
    Stl,
    Blk,
    Min,
    Fta,
    Pf,
}

impl WatchStat {
    pub const ALL: [WatchStat; 11] = [
        WatchStat::Pts,
        WatchStat::Fga,
        WatchStat::Fg3a,
        WatchStat::Tov,
        WatchStat::Ast,
        WatchStat::Reb,
        WatchStat::Stl,
        WatchStat::Blk,
        WatchStat::Min,
        WatchStat::Fta,
        WatchStat::Pf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WatchStat::Pts => "PTS",
            WatchStat::Fga => "FGA",
            WatchStat::Fg3a => "3PA",
            WatchStat::Tov => "TO",
            WatchStat::Ast => "AST",
            WatchStat::Reb => "REB",
            WatchStat::Stl => "STL",
            WatchStat::Blk => "BLK",
            WatchStat::Min => "MIN",
            WatchStat::Fta => "FTA",
            WatchStat::Pf => "PF",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.as_str() {
            "TOV" => return Some(WatchStat::Tov),
            "FG3A" => return Some(WatchStat::Fg3a),
            _ => {}
        }
        Self::ALL.into_iter().find(|s| s.label() == upper)
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub player: String,
    pub stat: WatchStat,
    pub target: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WatchStatus {
    Hit,
    Pending { current: f64, target: f64 },
    /// No target set.
    Untracked,
}

impl WatchStatus {
    pub fn label(&self) -> String {
        match self {
            WatchStatus::Hit => "Hit".to_string(),
            WatchStatus::Pending { current, target } => {
                format!("{}/{}", format_stat_value(*current), format_stat_value(*target))
            }
            WatchStatus::Untracked => String::new(),
        }
    }
}

pub const WATCH_COLUMNS: [&str; 7] =
    ["Player", "Team", "Matchup", "Stat", "Current", "Target", "Status"];

/// One rendered watchlist line: Player/Team/Matchup/Stat/Current/Target/Status.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRow {
    pub player: String,
    pub team: String,
    pub matchup: String,
    pub stat: WatchStat,
    pub current: f64,
    pub target: Option<f64>,
    pub status: WatchStatus,
}

impl WatchRow {
    /// Display text in `WATCH_COLUMNS` order. `MIN` renders as `MM:SS`.
    pub fn cells(&self) -> [String; 7] {
        let current = if self.stat == WatchStat::Min {
            format_minutes(self.current)
        } else {
            format_stat_value(self.current)
        };
        [
            self.player.clone(),
            self.team.clone(),
            self.matchup.clone(),
            self.stat.label().to_string(),
            current,
            self.target.map(format_stat_value).unwrap_or_default(),
            self.status.label(),
        ]
    }
}

/// Session-scoped watchlist. Entries are only appended or cleared; they are
/// evaluated against whatever table is current.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Zero, negative or non-finite targets mean "no target".
    /// Duplicates are kept.
    pub fn add(&mut self, player: impl Into<String>, stat: WatchStat, target: Option<f64>) {
        let target = target.filter(|t| t.is_finite() && *t > 0.0);
        self.entries.push(WatchlistEntry {
            player: player.into(),
            stat,
            target,
        });
    }

    pub fn add_named(&mut self, player: impl Into<String>, stat: &str, target: Option<f64>) -> Result<()> {
        let Some(stat) = WatchStat::parse(stat) else {
            bail!("unrecognized watch stat: {stat}");
        };
        self.add(player, stat, target);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose player has no row in `rows` are left out. The first row
    /// with an exact name match is used.
    pub fn evaluate(&self, rows: &[PlayerStatLine]) -> Vec<WatchRow> {
        let mut out = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(row) = rows.iter().find(|r| r.name == entry.player) else {
                continue;
            };
            let current = row.stat(entry.stat.label()).unwrap_or(0.0);
            let status = match entry.target {
                Some(target) if current >= target => WatchStatus::Hit,
                Some(target) => WatchStatus::Pending { current, target },
                None => WatchStatus::Untracked,
            };
            out.push(WatchRow {
                player: entry.player.clone(),
                team: row.team.clone(),
                matchup: row.matchup.clone(),
                stat: entry.stat,
                current,
                target: entry.target,
                status,
            });
        }
        out
    }
}

/// Whole numbers print without a decimal point.
pub fn format_stat_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_labels_and_aliases() {
        assert_eq!(WatchStat::parse("pts"), Some(WatchStat::Pts));
        assert_eq!(WatchStat::parse("3PA"), Some(WatchStat::Fg3a));
        assert_eq!(WatchStat::parse("FG3A"), Some(WatchStat::Fg3a));
        assert_eq!(WatchStat::parse("tov"), Some(WatchStat::Tov));
        assert_eq!(WatchStat::parse("PRA"), None);
    }

    #[test]
    fn stat_cycle_wraps() {
        assert_eq!(WatchStat::Pf.next(), WatchStat::Pts);
        assert_eq!(WatchStat::Pts.prev(), WatchStat::Pf);
    }

    #[test]
    fn format_stat_value_trims() {
        assert_eq!(format_stat_value(15.0), "15");
        assert_eq!(format_stat_value(20.5), "20.5");
        assert_eq!(format_stat_value(25.25), "25.25");
    }

    #[test]
    fn zero_target_means_no_target() {
        let mut list = Watchlist::new();
        list.add("A", WatchStat::Pts, Some(0.0));
        list.add("A", WatchStat::Pts, Some(-2.0));
        list.add("A", WatchStat::Pts, None);
        assert!(list.entries().iter().all(|e| e.target.is_none()));
    }
}
