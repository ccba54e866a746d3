use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use crate::feed_fetch::LiveFeed;
use crate::normalize::BoxScoreShape;
use crate::state::LiveGame;

const DEMO_SLATE: &[(&str, &str, &str)] = &[
    ("demo-0001", "BOS", "NYK"),
    ("demo-0002", "DEN", "LAL"),
    ("demo-0003", "OKC", "MIN"),
    ("demo-0004", "GSW", "PHX"),
];

/// Games in this list report "not started" and have no box score.
const NOT_STARTED: &[&str] = &["demo-0004"];

const FIRST_NAMES: &[&str] = &[
    "Alex", "Brandon", "Chris", "Darius", "Evan", "Franz", "Gary", "Hugo", "Isaiah", "Jalen",
];
const LAST_NAMES: &[&str] = &[
    "Stone", "Vega", "Holt", "Nox", "Vale", "Rook", "Quinn", "Park", "Moss", "Noor",
];

const ROSTER_SIZE: usize = 5;

#[derive(Debug, Clone, Default)]
struct DemoLine {
    first: String,
    last: String,
    seconds: u32,
    fgm: u32,
    fga: u32,
    fg3m: u32,
    fg3a: u32,
    ftm: u32,
    fta: u32,
    oreb: u32,
    dreb: u32,
    ast: u32,
    stl: u32,
    blk: u32,
    tov: u32,
    pf: u32,
}

impl DemoLine {
    fn points(&self) -> u32 {
        2 * (self.fgm - self.fg3m) + 3 * self.fg3m + self.ftm
    }

    /// One stretch of play. Keeps made <= attempted for every shot type.
    fn advance(&mut self, rng: &mut StdRng) {
        self.seconds += rng.gen_range(30..=150);
        let threes = rng.gen_range(0..=2);
        let threes_made = rng.gen_range(0..=threes);
        let twos = rng.gen_range(0..=3);
        let twos_made = rng.gen_range(0..=twos);
        self.fg3a += threes;
        self.fg3m += threes_made;
        self.fga += threes + twos;
        self.fgm += threes_made + twos_made;
        if rng.gen_bool(0.3) {
            let trips = rng.gen_range(1..=3);
            self.fta += trips;
            self.ftm += rng.gen_range(0..=trips);
        }
        self.oreb += u32::from(rng.gen_bool(0.15));
        self.dreb += rng.gen_range(0..=2);
        self.ast += rng.gen_range(0..=2);
        self.stl += u32::from(rng.gen_bool(0.12));
        self.blk += u32::from(rng.gen_bool(0.08));
        self.tov += u32::from(rng.gen_bool(0.2));
        self.pf += u32::from(rng.gen_bool(0.15));
    }

    /// Flat record. Alternates between separate made/attempted keys and
    /// combined `"M-A"` strings, and between `TO`/`TOV`, the way mixed
    /// sources do.
    fn to_json(&self, combined: bool) -> Value {
        let mut record = json!({
            "first_name": self.first,
            "last_name": self.last,
            "MIN": format!("{}:{:02}", self.seconds / 60, self.seconds % 60),
            "PTS": self.points(),
            "OREB": self.oreb,
            "DREB": self.dreb,
            "REB": self.oreb + self.dreb,
            "AST": self.ast,
            "STL": self.stl,
            "BLK": self.blk,
            "PF": self.pf,
        });
        if let Some(map) = record.as_object_mut() {
            if combined {
                map.insert("FG".into(), json!(format!("{}-{}", self.fgm, self.fga)));
                map.insert("3PT".into(), json!(format!("{}-{}", self.fg3m, self.fg3a)));
                map.insert("FT".into(), json!(format!("{}-{}", self.ftm, self.fta)));
                map.insert("TOV".into(), json!(self.tov));
            } else {
                map.insert("FGM".into(), json!(self.fgm));
                map.insert("FGA".into(), json!(self.fga));
                map.insert("3PM".into(), json!(self.fg3m));
                map.insert("3PA".into(), json!(self.fg3a));
                map.insert("FTM".into(), json!(self.ftm));
                map.insert("FTA".into(), json!(self.fta));
                map.insert("TO".into(), json!(self.tov));
            }
        }
        record
    }
}

/// Offline feed. Produces flat box scores that grow every cycle.
pub struct DemoFeed {
    rng: StdRng,
    rosters: HashMap<String, Vec<DemoLine>>,
}

impl Default for DemoFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoFeed {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().r#gen())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rosters = HashMap::new();
        for (slot, (_, home, away)) in DEMO_SLATE.iter().enumerate() {
            for (side, team) in [home, away].into_iter().enumerate() {
                let lines = (0..ROSTER_SIZE)
                    .map(|i| {
                        let n = slot * 2 * ROSTER_SIZE + side * ROSTER_SIZE + i;
                        DemoLine {
                            first: FIRST_NAMES[n % FIRST_NAMES.len()].to_string(),
                            last: format!(
                                "{}{}",
                                LAST_NAMES[(n / FIRST_NAMES.len() + i) % LAST_NAMES.len()],
                                if n >= FIRST_NAMES.len() * 2 { "-Jr" } else { "" }
                            ),
                            seconds: rng.gen_range(0..120),
                            ..DemoLine::default()
                        }
                    })
                    .collect();
                rosters.insert(team.to_string(), lines);
            }
        }
        Self { rng, rosters }
    }

    fn roster_json(&self, team: &str) -> Value {
        let players: Vec<Value> = self
            .rosters
            .get(team)
            .map(|lines| {
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| line.to_json(i % 2 == 1))
                    .collect()
            })
            .unwrap_or_default();
        json!({ "tricode": team, "players": players })
    }
}

impl LiveFeed for DemoFeed {
    fn label(&self) -> &'static str {
        "Demo"
    }

    fn shape(&self) -> BoxScoreShape {
        BoxScoreShape::Flat
    }

    fn live_games(&mut self) -> Result<Vec<LiveGame>> {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        Ok(DEMO_SLATE
            .iter()
            .map(|(id, home, away)| LiveGame {
                game_id: id.to_string(),
                date: Some(date.clone()),
                home: home.to_string(),
                away: away.to_string(),
                status: Some(if NOT_STARTED.contains(id) {
                    "Scheduled".to_string()
                } else {
                    "Live".to_string()
                }),
            })
            .collect())
    }

    fn boxscore(&mut self, game: &LiveGame) -> Result<Option<Value>> {
        if NOT_STARTED.contains(&game.game_id.as_str()) {
            return Ok(None);
        }
        for team in [&game.home, &game.away] {
            if let Some(lines) = self.rosters.get_mut(team.as_str()) {
                for line in lines.iter_mut() {
                    if self.rng.gen_bool(0.7) {
                        line.advance(&mut self.rng);
                    }
                }
            }
        }
        Ok(Some(json!({
            "gameId": game.game_id,
            "home": self.roster_json(&game.home),
            "away": self.roster_json(&game.away),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_flat;

    #[test]
    fn demo_box_scores_normalize_consistently() {
        let mut feed = DemoFeed::with_seed(7);
        let games = feed.live_games().expect("demo games");
        assert_eq!(games.len(), DEMO_SLATE.len());

        let first = feed.boxscore(&games[0]).expect("ok").expect("available");
        let rows = normalize_flat(&first);
        assert_eq!(rows.len(), ROSTER_SIZE * 2);
        assert!(rows.iter().all(|r| r.shooting_is_consistent()));
        assert!(rows.iter().all(|r| !r.name.is_empty()));
        assert_eq!(rows[0].team, "BOS");
        assert_eq!(rows[ROSTER_SIZE].team, "NYK");
    }

    #[test]
    fn scheduled_demo_game_is_unavailable() {
        let mut feed = DemoFeed::with_seed(1);
        let games = feed.live_games().expect("demo games");
        let scheduled = games
            .iter()
            .find(|g| NOT_STARTED.contains(&g.game_id.as_str()))
            .expect("scheduled game");
        assert!(feed.boxscore(scheduled).expect("ok").is_none());
    }
}
