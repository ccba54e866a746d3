use anyhow::{Context, Result};
use serde_json::json;

use statline_terminal::advanced::compute_advanced;
use statline_terminal::config::{load_dotenv, FeedConfig, Provider};
use statline_terminal::feed::{build_feed, run_cycle};
use statline_terminal::logging::init_stderr_logging;
use statline_terminal::normalize::format_minutes;

fn main() -> Result<()> {
    load_dotenv();
    init_stderr_logging();

    let mut config = FeedConfig::from_env();
    if let Some(raw) = arg_value("--provider") {
        config.provider =
            Provider::parse(&raw).with_context(|| format!("unknown provider: {raw}"))?;
    }
    let as_json = std::env::args().any(|a| a == "--json");

    let mut feed = build_feed(&config);
    let snapshot = run_cycle(feed.as_mut(), 1);

    if let Some(notice) = snapshot.status.notice() {
        eprintln!("{notice}");
    }
    if let Some(detail) = snapshot.notice.as_deref() {
        eprintln!("{detail}");
    }
    if !snapshot.skipped.is_empty() {
        eprintln!("skipped {} game(s)", snapshot.skipped.len());
    }

    if as_json {
        let payload = json!({
            "snapshot": snapshot,
            "advanced": compute_advanced(&snapshot.rows),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{:<24} {:<4} {:<11} {:>6} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4}",
        "Player", "Team", "Matchup", "MIN", "PTS", "FGA", "3PA", "FTA", "REB", "AST", "STL", "TO"
    );
    for r in &snapshot.rows {
        println!(
            "{:<24} {:<4} {:<11} {:>6} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4}",
            r.name,
            r.team,
            r.matchup,
            format_minutes(r.minutes),
            r.pts,
            r.fga,
            r.fg3a,
            r.fta,
            r.reb,
            r.ast,
            r.stl,
            r.tov
        );
    }
    println!(
        "{} rows from {} game(s) at {}",
        snapshot.rows.len(),
        snapshot.games,
        snapshot.fetched_at
    );

    Ok(())
}

fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if arg == flag {
            return args.get(idx + 1).cloned();
        }
        if let Some(rest) = arg.strip_prefix(&format!("{flag}=")) {
            return Some(rest.to_string());
        }
    }
    None
}
