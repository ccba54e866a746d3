use std::fs;
use std::path::PathBuf;

use statline_terminal::feed_fetch::{
    parse_boxscore_json, parse_espn_scoreboard_json, parse_nba_scoreboard_json,
};
use statline_terminal::normalize::{
    format_minutes, normalize_boxscore, normalize_espn_summary, normalize_flat,
    normalize_nba_cdn, BoxScoreShape,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_nba_scoreboard_fixture() {
    let raw = read_fixture("nba_scoreboard.json");
    let games = parse_nba_scoreboard_json(&raw).expect("fixture should parse");
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].game_id, "0022500601");
    assert_eq!(games[0].home, "BOS");
    assert_eq!(games[0].away, "NYK");
    assert_eq!(games[0].matchup(), "NYK @ BOS");
    assert_eq!(games[0].status.as_deref(), Some("Q3 5:12"));
    assert_eq!(games[0].date.as_deref(), Some("2026-01-14"));
    // No gameEt: falls back to the scoreboard date.
    assert_eq!(games[1].date.as_deref(), Some("2026-01-14"));
}

#[test]
fn empty_nba_scoreboard_is_no_games() {
    assert!(parse_nba_scoreboard_json("{}").expect("parse").is_empty());
    assert!(parse_nba_scoreboard_json("").expect("parse").is_empty());
    assert!(parse_nba_scoreboard_json("[oops").is_err());
}

#[test]
fn parses_espn_scoreboard_fixture() {
    let raw = read_fixture("espn_scoreboard.json");
    let games = parse_espn_scoreboard_json(&raw).expect("fixture should parse");
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].game_id, "401810001");
    assert_eq!(games[0].home, "BOS");
    assert_eq!(games[0].away, "NY");
    assert_eq!(games[0].status.as_deref(), Some("3rd 5:12"));
    assert_eq!(games[0].date.as_deref(), Some("2026-01-15"));
    assert_eq!(games[1].game_id, "401810002");
    assert_eq!(games[1].status.as_deref(), Some("pre"));
}

#[test]
fn normalizes_nba_cdn_boxscore_fixture() {
    let raw = read_fixture("nba_boxscore.json");
    let value = parse_boxscore_json(&raw)
        .expect("fixture should parse")
        .expect("fixture is available");
    let rows = normalize_nba_cdn(&value);
    assert_eq!(rows.len(), 3);

    let tatum = &rows[0];
    assert_eq!(tatum.name, "Jayson Tatum");
    assert_eq!(tatum.team, "BOS");
    assert_eq!(tatum.pts, 24);
    assert_eq!((tatum.fgm, tatum.fga), (8, 17));
    assert_eq!((tatum.fg3m, tatum.fg3a), (3, 8));
    assert_eq!((tatum.ftm, tatum.fta), (5, 6));
    assert_eq!(tatum.reb, 8);
    assert_eq!(tatum.tov, 3);
    assert_eq!(format_minutes(tatum.minutes), "25:30");

    assert_eq!(rows[2].name, "Jalen Brunson");
    assert_eq!(rows[2].team, "NYK");
    assert!(rows.iter().all(|r| r.shooting_is_consistent()));
}

#[test]
fn normalizes_espn_summary_fixture() {
    let raw = read_fixture("espn_summary.json");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("fixture json");
    let rows = normalize_espn_summary(&value);
    assert_eq!(rows.len(), 4);

    let tatum = &rows[0];
    assert_eq!(tatum.name, "Jayson Tatum");
    assert_eq!(tatum.team, "BOS");
    assert_eq!(tatum.pts, 24);
    assert_eq!((tatum.fgm, tatum.fga), (8, 17));
    assert_eq!((tatum.fg3m, tatum.fg3a), (3, 8));
    assert_eq!(tatum.tov, 3);
    assert_eq!(tatum.minutes, 25.0);

    // "--" placeholders for a player who has not checked in.
    let dnp = &rows[3];
    assert_eq!(dnp.name, "Mitchell Robinson");
    assert_eq!(dnp.team, "NY");
    assert_eq!((dnp.pts, dnp.fgm, dnp.fga, dnp.tov), (0, 0, 0, 0));
    assert_eq!(dnp.minutes, 0.0);
}

#[test]
fn same_player_normalizes_identically_across_shapes() {
    let nba = parse_boxscore_json(&read_fixture("nba_boxscore.json"))
        .expect("parse")
        .expect("available");
    let espn: serde_json::Value =
        serde_json::from_str(&read_fixture("espn_summary.json")).expect("fixture json");
    let flat = serde_json::json!({
        "players": [{
            "name": "Jayson Tatum",
            "team": "BOS",
            "PTS": "24",
            "FG": "8-17",
            "3PM": 3,
            "3PA": 8,
            "FTM": 5,
            "FTA": 6,
            "REB": 8,
            "AST": 5,
            "TOV": 3
        }]
    });

    let a = &normalize_boxscore(BoxScoreShape::NbaCdn, &nba)[0];
    let b = &normalize_boxscore(BoxScoreShape::EspnSummary, &espn)[0];
    let c = &normalize_boxscore(BoxScoreShape::Flat, &flat)[0];
    for row in [b, c] {
        assert_eq!(row.name, a.name);
        assert_eq!(row.pts, a.pts);
        assert_eq!((row.fgm, row.fga), (a.fgm, a.fga));
        assert_eq!((row.fg3m, row.fg3a), (a.fg3m, a.fg3a));
        assert_eq!((row.ftm, row.fta), (a.ftm, a.fta));
        assert_eq!(row.reb, a.reb);
        assert_eq!(row.ast, a.ast);
        assert_eq!(row.tov, a.tov);
    }
}

#[test]
fn flat_rosters_take_team_from_tricode() {
    let value = serde_json::json!({
        "home": { "tricode": "DEN", "players": [{ "first_name": "Nikola", "last_name": "Jokic", "PTS": 31, "TO": 4 }] },
        "away": { "tricode": "LAL", "players": [{ "name": "Austin Reaves", "PTS": -3, "MIN": "31:45" }] }
    });
    let rows = normalize_flat(&value);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Nikola Jokic");
    assert_eq!(rows[0].team, "DEN");
    assert_eq!(rows[0].tov, 4);
    assert_eq!(rows[1].team, "LAL");
    assert_eq!(rows[1].pts, 0);
    assert_eq!(format_minutes(rows[1].minutes), "31:45");
}
