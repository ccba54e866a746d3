use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::PlayerStatLine;

/// Raw box-score layouts seen upstream. Each one has its own adapter below;
/// all of them produce the same `PlayerStatLine` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxScoreShape {
    /// NBA CDN live data: nested `statistics` objects with long camelCase keys.
    NbaCdn,
    /// ESPN summary: label lists plus aligned string stat lists (`"7-16"`).
    EspnSummary,
    /// Flat records keyed by box-score abbreviations (`PTS`, `3PM`, `TOV`).
    Flat,
}

pub fn normalize_boxscore(shape: BoxScoreShape, root: &Value) -> Vec<PlayerStatLine> {
    match shape {
        BoxScoreShape::NbaCdn => normalize_nba_cdn(root),
        BoxScoreShape::EspnSummary => normalize_espn_summary(root),
        BoxScoreShape::Flat => normalize_flat(root),
    }
}

pub fn normalize_nba_cdn(root: &Value) -> Vec<PlayerStatLine> {
    let game = root.get("game").unwrap_or(root);
    let mut rows = Vec::new();
    for side in ["homeTeam", "awayTeam"] {
        let Some(team) = game.get(side) else {
            continue;
        };
        let tricode = pick_string(team, &["teamTricode", "tricode"]).unwrap_or_default();
        let Some(players) = team.get("players").and_then(|v| v.as_array()) else {
            continue;
        };
        for player in players {
            rows.push(nba_cdn_player_line(player, &tricode));
        }
    }
    rows
}

pub fn nba_cdn_player_line(player: &Value, team: &str) -> PlayerStatLine {
    let stats = player.get("statistics").unwrap_or(&Value::Null);
    let name = player_name(player, &["firstName"], &["familyName", "lastName"], &["name"]);
    let minutes = pick(stats, &["minutes", "minutesCalculated"]);

    PlayerStatLine {
        name,
        team: team.to_string(),
        minutes: parse_minutes(minutes),
        pts: to_count(stats.get("points")),
        fgm: to_count(stats.get("fieldGoalsMade")),
        fga: to_count(stats.get("fieldGoalsAttempted")),
        fg3m: to_count(stats.get("threePointersMade")),
        fg3a: to_count(stats.get("threePointersAttempted")),
        ftm: to_count(stats.get("freeThrowsMade")),
        fta: to_count(stats.get("freeThrowsAttempted")),
        oreb: to_count(stats.get("reboundsOffensive")),
        dreb: to_count(stats.get("reboundsDefensive")),
        reb: to_count(stats.get("reboundsTotal")),
        ast: to_count(stats.get("assists")),
        stl: to_count(stats.get("steals")),
        blk: to_count(stats.get("blocks")),
        tov: to_count(stats.get("turnovers")),
        pf: to_count(stats.get("foulsPersonal")),
        ..PlayerStatLine::default()
    }
}

pub fn normalize_espn_summary(root: &Value) -> Vec<PlayerStatLine> {
    let mut rows = Vec::new();
    let Some(teams) = root
        .get("boxscore")
        .and_then(|v| v.get("players"))
        .and_then(|v| v.as_array())
    else {
        return rows;
    };

    for team_block in teams {
        let tricode = team_block
            .get("team")
            .and_then(|t| pick_string(t, &["abbreviation"]))
            .unwrap_or_default();
        let Some(groups) = team_block.get("statistics").and_then(|v| v.as_array()) else {
            continue;
        };
        for group in groups {
            let labels: Vec<String> = group
                .get("labels")
                .and_then(|v| v.as_array())
                .map(|list| list.iter().map(value_text).collect())
                .unwrap_or_default();
            let Some(athletes) = group.get("athletes").and_then(|v| v.as_array()) else {
                continue;
            };
            for athlete in athletes {
                rows.push(espn_athlete_line(&labels, athlete, &tricode));
            }
        }
    }
    rows
}

pub fn espn_athlete_line(labels: &[String], entry: &Value, team: &str) -> PlayerStatLine {
    let athlete = entry.get("athlete").unwrap_or(&Value::Null);
    let name = player_name(athlete, &["firstName"], &["lastName"], &["displayName"]);
    let stats = entry
        .get("stats")
        .and_then(|v| v.as_array())
        .map(|list| list.as_slice())
        .unwrap_or(&[]);
    let lookup = |label: &str| labeled(labels, stats, label);

    let (fgm, fga) = split_made_attempted(lookup("FG"));
    let (fg3m, fg3a) = split_made_attempted(lookup("3PT"));
    let (ftm, fta) = split_made_attempted(lookup("FT"));

    PlayerStatLine {
        name,
        team: team.to_string(),
        minutes: parse_minutes(lookup("MIN")),
        pts: to_count(lookup("PTS")),
        fgm,
        fga,
        fg3m,
        fg3a,
        ftm,
        fta,
        oreb: to_count(lookup("OREB")),
        dreb: to_count(lookup("DREB")),
        reb: to_count(lookup("REB")),
        ast: to_count(lookup("AST")),
        stl: to_count(lookup("STL")),
        blk: to_count(lookup("BLK")),
        tov: to_count(lookup("TO")),
        pf: to_count(lookup("PF")),
        ..PlayerStatLine::default()
    }
}

fn labeled<'a>(labels: &[String], stats: &'a [Value], label: &str) -> Option<&'a Value> {
    labels
        .iter()
        .position(|l| l.eq_ignore_ascii_case(label))
        .and_then(|idx| stats.get(idx))
}

pub fn normalize_flat(root: &Value) -> Vec<PlayerStatLine> {
    let mut rows = Vec::new();
    if let Some(players) = root.get("players").and_then(|v| v.as_array()) {
        for player in players {
            rows.push(flat_player_line(player, ""));
        }
        return rows;
    }

    for keys in [["home", "homeTeam"], ["away", "awayTeam"]] {
        let Some(roster) = keys.iter().find_map(|k| root.get(*k)) else {
            continue;
        };
        let tricode =
            pick_string(roster, &["tricode", "teamTricode", "abbreviation"]).unwrap_or_default();
        let Some(players) = roster.get("players").and_then(|v| v.as_array()) else {
            continue;
        };
        for player in players {
            rows.push(flat_player_line(player, &tricode));
        }
    }
    rows
}

/// Flat record adapter. A player's own `team` key wins over the roster tricode.
pub fn flat_player_line(player: &Value, roster_team: &str) -> PlayerStatLine {
    let name = player_name(
        player,
        &["first_name", "firstName"],
        &["last_name", "lastName", "familyName"],
        &["name", "player"],
    );
    let team = pick_string(player, &["team", "team_abbreviation", "tricode"])
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| roster_team.to_string());

    let made_att = |made: &[&str], att: &[&str], combined: &str| -> (u32, u32) {
        match (pick(player, made), pick(player, att)) {
            (None, None) => split_made_attempted(player.get(combined)),
            (m, a) => (to_count(m), to_count(a)),
        }
    };
    let (fgm, fga) = made_att(&["FGM", "fgm"], &["FGA", "fga"], "FG");
    let (fg3m, fg3a) = made_att(&["3PM", "FG3M", "fg3m"], &["3PA", "FG3A", "fg3a"], "3PT");
    let (ftm, fta) = made_att(&["FTM", "ftm"], &["FTA", "fta"], "FT");

    PlayerStatLine {
        name,
        team,
        minutes: parse_minutes(pick(player, &["MIN", "min", "minutes"])),
        pts: to_count(pick(player, &["PTS", "pts", "points"])),
        fgm,
        fga,
        fg3m,
        fg3a,
        ftm,
        fta,
        oreb: to_count(pick(player, &["OREB", "oreb"])),
        dreb: to_count(pick(player, &["DREB", "dreb"])),
        reb: to_count(pick(player, &["REB", "reb", "TREB"])),
        ast: to_count(pick(player, &["AST", "ast"])),
        stl: to_count(pick(player, &["STL", "stl"])),
        blk: to_count(pick(player, &["BLK", "blk"])),
        tov: to_count(pick(player, &["TO", "TOV", "tov", "turnovers"])),
        pf: to_count(pick(player, &["PF", "pf"])),
        ..PlayerStatLine::default()
    }
}

/// Integer coercion for counting stats. Anything that is not a non-negative
/// integer (or an integral-looking number) becomes 0.
pub fn to_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(0)
            } else if n.is_i64() {
                0
            } else {
                n.as_f64().map(truncate_count).unwrap_or(0)
            }
        }
        Some(Value::String(s)) => parse_count(s),
        _ => 0,
    }
}

pub fn parse_count(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn truncate_count(v: f64) -> u32 {
    if v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX) {
        v.trunc() as u32
    } else {
        0
    }
}

/// Splits `"M-A"` on the first `-`. No separator, empty or non-string input
/// yields `(0, 0)`.
pub fn split_made_attempted(value: Option<&Value>) -> (u32, u32) {
    match value {
        Some(Value::String(s)) => split_made_att(s),
        _ => (0, 0),
    }
}

pub fn split_made_att(raw: &str) -> (u32, u32) {
    match raw.split_once('-') {
        Some((made, att)) => (parse_count(made), parse_count(att)),
        None => (0, 0),
    }
}

/// Minutes as decimal minutes. Accepts numbers, `MM:SS`, plain `MM` and
/// ISO-8601 durations (`PT25M01.00S`).
pub fn parse_minutes(value: Option<&Value>) -> f64 {
    let minutes = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_minutes_str(s),
        _ => 0.0,
    };
    if minutes.is_finite() && minutes > 0.0 {
        minutes
    } else {
        0.0
    }
}

pub fn parse_minutes_str(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(rest) = trimmed
        .strip_prefix("PT")
        .or_else(|| trimmed.strip_prefix("pt"))
    {
        return parse_iso_minutes(rest);
    }
    if let Some((mins, secs)) = trimmed.split_once(':') {
        let mins = mins.trim().parse::<f64>().unwrap_or(0.0);
        let secs = secs.trim().parse::<f64>().unwrap_or(0.0);
        return mins + secs / 60.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

fn parse_iso_minutes(rest: &str) -> f64 {
    let upper = rest.to_ascii_uppercase();
    let (mins, tail) = match upper.split_once('M') {
        Some((m, tail)) => (m.parse::<f64>().unwrap_or(0.0), tail.to_string()),
        None => (0.0, upper.clone()),
    };
    let secs = tail
        .strip_suffix('S')
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    mins + secs / 60.0
}

/// Renders decimal minutes as `MM:SS`.
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0:00".to_string();
    }
    let total_secs = (minutes * 60.0).round() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn join_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

fn player_name(value: &Value, first_keys: &[&str], last_keys: &[&str], full_keys: &[&str]) -> String {
    let first = pick_string(value, first_keys).unwrap_or_default();
    let last = pick_string(value, last_keys).unwrap_or_default();
    let joined = join_name(&first, &last);
    if !joined.is_empty() {
        return joined;
    }
    pick_string(value, full_keys).unwrap_or_default()
}

fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| value.get(*k).filter(|v| !v.is_null()))
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            match v {
                Value::String(s) => return Some(s.trim().to_string()),
                Value::Number(n) => return Some(n.to_string()),
                _ => {}
            }
        }
    }
    None
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn split_made_att_handles_pairs_and_garbage() {
        assert_eq!(split_made_att("7-16"), (7, 16));
        assert_eq!(split_made_att("0-0"), (0, 0));
        assert_eq!(split_made_att("12"), (0, 0));
        assert_eq!(split_made_att(""), (0, 0));
        assert_eq!(split_made_att("3-x"), (3, 0));
        assert_eq!(split_made_attempted(None), (0, 0));
        assert_eq!(split_made_attempted(Some(&json!(7))), (0, 0));
    }

    #[test]
    fn to_count_never_fails() {
        assert_eq!(to_count(Some(&json!(12))), 12);
        assert_eq!(to_count(Some(&json!("12"))), 12);
        assert_eq!(to_count(Some(&json!(" 4 "))), 4);
        assert_eq!(to_count(Some(&json!(7.9))), 7);
        assert_eq!(to_count(Some(&json!("7.5"))), 0);
        assert_eq!(to_count(Some(&json!("--"))), 0);
        assert_eq!(to_count(Some(&json!(-3))), 0);
        assert_eq!(to_count(Some(&Value::Null)), 0);
        assert_eq!(to_count(None), 0);
    }

    #[test]
    fn minutes_accept_every_provider_format() {
        assert!((parse_minutes_str("PT25M30.00S") - 25.5).abs() < 1e-9);
        assert!((parse_minutes_str("PT12M") - 12.0).abs() < 1e-9);
        assert!((parse_minutes_str("31:45") - 31.75).abs() < 1e-9);
        assert!((parse_minutes_str("28") - 28.0).abs() < 1e-9);
        assert_eq!(parse_minutes_str("DNP"), 0.0);
        assert_eq!(parse_minutes(Some(&json!(33.5))), 33.5);
        assert_eq!(parse_minutes(Some(&json!(-1))), 0.0);
        assert_eq!(parse_minutes(None), 0.0);
    }

    #[test]
    fn format_minutes_rounds_to_seconds() {
        assert_eq!(format_minutes(25.5), "25:30");
        assert_eq!(format_minutes(0.0), "0:00");
        assert_eq!(format_minutes(9.999), "10:00");
    }

    #[test]
    fn join_name_trims_components() {
        assert_eq!(join_name(" Jayson ", "Tatum "), "Jayson Tatum");
        assert_eq!(join_name("", "Nene"), "Nene");
        assert_eq!(join_name("", ""), "");
    }

    #[test]
    fn flat_line_reads_aliases_and_combined_strings() {
        let player = json!({
            "first_name": "Test",
            "last_name": "Guard",
            "PTS": "21",
            "FG": "8-15",
            "FG3M": 3,
            "FG3A": 7,
            "TOV": 2,
            "MIN": "30:00"
        });
        let line = flat_player_line(&player, "BOS");
        assert_eq!(line.name, "Test Guard");
        assert_eq!(line.team, "BOS");
        assert_eq!((line.pts, line.fgm, line.fga), (21, 8, 15));
        assert_eq!((line.fg3m, line.fg3a), (3, 7));
        assert_eq!(line.tov, 2);
        assert_eq!((line.ftm, line.fta), (0, 0));
        assert_eq!(line.minutes, 30.0);
    }

    #[test]
    fn null_under_first_key_falls_back_to_alias() {
        let player = json!({ "name": "X", "TO": null, "TOV": 3, "PTS": null, "pts": 12 });
        let line = flat_player_line(&player, "BOS");
        assert_eq!(line.tov, 3);
        assert_eq!(line.pts, 12);

        let cdn = json!({
            "name": "Y",
            "statistics": { "minutes": null, "minutesCalculated": "PT24M", "points": 9 }
        });
        let line = nba_cdn_player_line(&cdn, "NYK");
        assert_eq!(line.minutes, 24.0);
        assert_eq!(line.pts, 9);
    }

    #[test]
    fn every_adapter_fills_the_same_fields_from_empty_input() {
        let empty = json!({});
        let a = nba_cdn_player_line(&empty, "");
        let b = espn_athlete_line(&[], &empty, "");
        let c = flat_player_line(&empty, "");
        assert_eq!(a, PlayerStatLine::default());
        assert_eq!(b, PlayerStatLine::default());
        assert_eq!(c, PlayerStatLine::default());
    }
}
