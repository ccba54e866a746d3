use statline_terminal::feed::CycleSnapshot;
use statline_terminal::state::{apply_delta, AppState, Delta, PlayerStatLine, Tab};
use statline_terminal::table::TableStatus;
use statline_terminal::watchlist::WatchStat;

fn player(name: &str, pts: u32) -> PlayerStatLine {
    PlayerStatLine {
        name: name.to_string(),
        team: "BOS".to_string(),
        pts,
        ..PlayerStatLine::default()
    }
}

fn snapshot(cycle: u64, rows: Vec<PlayerStatLine>) -> CycleSnapshot {
    CycleSnapshot {
        cycle,
        fetched_at: "12:00:00 UTC".to_string(),
        status: if rows.is_empty() {
            TableStatus::NoPlayerRows
        } else {
            TableStatus::Ready
        },
        games: 1,
        rows,
        skipped: Vec::new(),
        notice: None,
    }
}

#[test]
fn newer_cycle_replaces_table() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(1, vec![player("A", 10)])));
    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2, vec![player("A", 12), player("B", 8)])),
    );
    assert_eq!(state.last_cycle, 2);
    assert_eq!(state.rows().len(), 2);
    assert_eq!(state.rows()[0].pts, 12);
}

#[test]
fn stale_cycle_is_discarded() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(3, vec![player("A", 20)])));
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2, vec![player("A", 5)])));
    assert_eq!(state.last_cycle, 3);
    assert_eq!(state.rows()[0].pts, 20);
    assert!(state.logs.iter().any(|l| l.contains("stale cycle 2")));
}

#[test]
fn selection_follows_player_across_resort() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(1, vec![player("A", 20), player("B", 10)])),
    );
    state.select_next();
    assert_eq!(state.selected_player().map(|p| p.name.as_str()), Some("B"));

    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(2, vec![player("B", 25), player("A", 20)])),
    );
    assert_eq!(state.selected, 0);
    assert_eq!(state.selected_player().map(|p| p.name.as_str()), Some("B"));
}

#[test]
fn selection_clamps_when_table_shrinks() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetSnapshot(snapshot(1, vec![player("A", 20), player("B", 10), player("C", 5)])),
    );
    state.select_next();
    state.select_next();
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(2, vec![player("A", 22)])));
    assert_eq!(state.selected, 0);
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(3, Vec::new())));
    assert_eq!(state.selected, 0);
    assert_eq!(state.status(), Some(TableStatus::NoPlayerRows));
}

#[test]
fn refresh_interval_is_clamped() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::RefreshInterval(1));
    assert_eq!(state.refresh_secs, 5);
    apply_delta(&mut state, Delta::RefreshInterval(300));
    assert_eq!(state.refresh_secs, 60);
    apply_delta(&mut state, Delta::RefreshInterval(20));
    assert_eq!(state.refresh_secs, 20);
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
    assert_eq!(state.logs.back().map(String::as_str), Some("line 249"));
}

#[test]
fn skipped_games_and_notices_are_logged() {
    let mut state = AppState::new();
    let mut snap = snapshot(1, vec![player("A", 3)]);
    snap.skipped.push(statline_terminal::aggregate::SkippedGame {
        game_id: "g2".to_string(),
        matchup: "DEN @ LAL".to_string(),
        reason: statline_terminal::aggregate::SkipReason::Unavailable,
    });
    apply_delta(&mut state, Delta::SetSnapshot(snap));
    assert_eq!(state.skipped_count(), 1);
    assert!(state.logs.iter().any(|l| l.contains("Skipped 1 game")));
}

#[test]
fn watchlist_controls_use_selected_player() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetSnapshot(snapshot(1, vec![player("A", 20)])));
    state.cycle_watch_stat_next();
    assert_eq!(state.watch_stat, WatchStat::Fga);
    state.cycle_watch_stat_prev();
    state.bump_watch_target(3);
    assert_eq!(state.watch_target, 1.5);
    state.bump_watch_target(-10);
    assert_eq!(state.watch_target, 0.0);
    state.bump_watch_target(40);
    assert!(state.add_selected_to_watchlist());

    let rows = state.watch_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status.label(), "Hit");

    state.clear_watchlist();
    assert!(state.watch_rows().is_empty());
}

#[test]
fn add_without_rows_does_nothing() {
    let mut state = AppState::new();
    assert!(!state.add_selected_to_watchlist());
    assert!(state.watchlist.is_empty());
}

#[test]
fn toggle_tab_switches_views() {
    let mut state = AppState::new();
    assert_eq!(state.tab, Tab::BoxScore);
    state.toggle_tab();
    assert_eq!(state.tab, Tab::Advanced);
    state.toggle_tab();
    assert_eq!(state.tab, Tab::BoxScore);
}
