use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;

use crate::aggregate::{aggregate_games, dedup_games, SkippedGame};
use crate::config::{FeedConfig, Provider};
use crate::fake_feed::DemoFeed;
use crate::feed_fetch::{EspnFeed, LiveFeed, NbaCdnFeed};
use crate::state::{clamp_refresh_secs, Delta, PlayerStatLine, ProviderCommand};
use crate::table::{classify, sort_rows, TableStatus};

/// Result of one fetch -> normalize -> aggregate -> sort pass.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSnapshot {
    pub cycle: u64,
    pub fetched_at: String,
    pub status: TableStatus,
    pub games: usize,
    pub rows: Vec<PlayerStatLine>,
    pub skipped: Vec<SkippedGame>,
    pub notice: Option<String>,
}

impl CycleSnapshot {
    fn empty(cycle: u64, status: TableStatus, notice: Option<String>) -> Self {
        Self {
            cycle,
            fetched_at: now_label(),
            status,
            games: 0,
            rows: Vec::new(),
            skipped: Vec::new(),
            notice,
        }
    }
}

pub fn build_feed(config: &FeedConfig) -> Box<dyn LiveFeed + Send> {
    match config.provider {
        Provider::Nba => Box::new(NbaCdnFeed::new(config)),
        Provider::Espn => Box::new(EspnFeed::new(config)),
        Provider::Demo => Box::new(DemoFeed::new()),
    }
}

/// Runs one synchronous cycle. A failing games list yields an empty
/// `FeedUnavailable` snapshot; per-game failures only add to `skipped`.
pub fn run_cycle(feed: &mut dyn LiveFeed, cycle: u64) -> CycleSnapshot {
    let games = match feed.live_games() {
        Ok(games) => dedup_games(games),
        Err(err) => {
            tracing::warn!(provider = feed.label(), error = %format!("{err:#}"), "games list unavailable");
            return CycleSnapshot::empty(
                cycle,
                TableStatus::FeedUnavailable,
                Some(format!("{} games list unavailable: {err}", feed.label())),
            );
        }
    };
    if games.is_empty() {
        return CycleSnapshot::empty(cycle, TableStatus::NoGames, None);
    }

    let shape = feed.shape();
    let table = aggregate_games(shape, &games, |game| feed.boxscore(game));
    let mut rows = table.rows;
    sort_rows(&mut rows);

    CycleSnapshot {
        cycle,
        fetched_at: now_label(),
        status: classify(table.games_seen, rows.len()),
        games: table.games_seen,
        rows,
        skipped: table.skipped,
        notice: None,
    }
}

/// Background refresh loop: one cycle per interval, plus on demand. Stops
/// once the receiving side hangs up.
pub fn spawn_provider(config: FeedConfig, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut feed = build_feed(&config);
        let mut interval = Duration::from_secs(clamp_refresh_secs(config.refresh_secs));
        let mut cycle: u64 = 0;
        let mut last_cycle: Option<Instant> = None;
        let mut force = true;

        let _ = tx.send(Delta::Log(format!(
            "[INFO] Feed: {} (refresh {}s)",
            feed.label(),
            interval.as_secs()
        )));

        loop {
            loop {
                match cmd_rx.try_recv() {
                    Ok(ProviderCommand::RefreshNow) => force = true,
                    Ok(ProviderCommand::SetRefreshSecs(secs)) => {
                        let secs = clamp_refresh_secs(secs);
                        interval = Duration::from_secs(secs);
                        if tx.send(Delta::RefreshInterval(secs)).is_err() {
                            return;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let due = last_cycle.is_none_or(|t| t.elapsed() >= interval);
            if force || due {
                force = false;
                cycle += 1;
                let started = Instant::now();
                let snapshot = run_cycle(feed.as_mut(), cycle);
                tracing::debug!(
                    cycle,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    status = ?snapshot.status,
                    "cycle finished"
                );
                last_cycle = Some(Instant::now());
                if tx.send(Delta::SetSnapshot(snapshot)).is_err() {
                    return;
                }
            }

            thread::sleep(Duration::from_millis(200));
        }
    });
}

fn now_label() -> String {
    Utc::now().format("%H:%M:%S UTC").to_string()
}
