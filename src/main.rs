use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

use statline_terminal::advanced::AdvancedStatLine;
use statline_terminal::config::{load_dotenv, FeedConfig};
use statline_terminal::feed;
use statline_terminal::logging::init_file_logging;
use statline_terminal::normalize::format_minutes;
use statline_terminal::state::{
    apply_delta, AppState, Delta, PlayerStatLine, ProviderCommand, Tab, REFRESH_STEP_SECS,
};
use statline_terminal::table::TableStatus;
use statline_terminal::watchlist::{format_stat_value, WatchStatus, WATCH_COLUMNS};

const BOX_COLUMNS: [&str; 17] = [
    "Player", "Team", "Matchup", "MIN", "PTS", "FGM", "FGA", "3PM", "3PA", "FTM", "FTA", "REB",
    "AST", "STL", "BLK", "TO", "PF",
];

const ADVANCED_COLUMNS: [&str; 23] = [
    "Player", "Team", "Matchup", "MIN", "PRA", "PR", "PA", "RA", "STOCKS", "USG_PROXY",
    "PTS_PER_USG", "FG%", "3P%", "FT%", "PTS", "REB", "AST", "STL", "BLK", "TO", "FGA", "3PA",
    "FTA",
];

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(config: &FeedConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        let mut state = AppState::new();
        state.provider_label = config.provider.label().to_string();
        state.refresh_secs = config.refresh_secs;
        state.advanced_unlocked = config.advanced_unlocked;
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.toggle_tab(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(']') => self.state.cycle_watch_stat_next(),
            KeyCode::Char('[') => self.state.cycle_watch_stat_prev(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.bump_watch_target(1),
            KeyCode::Char('-') => self.state.bump_watch_target(-1),
            KeyCode::Char('a') | KeyCode::Enter => {
                self.state.add_selected_to_watchlist();
            }
            KeyCode::Char('c') => self.state.clear_watchlist(),
            KeyCode::Char('r') => self.send(ProviderCommand::RefreshNow, "Refresh requested"),
            KeyCode::Char('>') | KeyCode::Char('.') => {
                let secs = self.state.refresh_secs + REFRESH_STEP_SECS;
                self.send(
                    ProviderCommand::SetRefreshSecs(secs),
                    "Refresh interval change sent",
                );
            }
            KeyCode::Char('<') | KeyCode::Char(',') => {
                let secs = self.state.refresh_secs.saturating_sub(REFRESH_STEP_SECS);
                self.send(
                    ProviderCommand::SetRefreshSecs(secs),
                    "Refresh interval change sent",
                );
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Feed unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Feed thread stopped");
        } else {
            self.state.push_log(format!("[INFO] {what}"));
        }
    }
}

fn main() -> io::Result<()> {
    load_dotenv();
    let config = FeedConfig::from_env();
    let _log_guard = init_file_logging(config.log_dir.as_deref());
    tracing::info!(provider = config.provider.label(), "starting dashboard");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(config.clone(), tx, cmd_rx);

    let mut app = App::new(&config, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(chunks[1]);
    render_watchlist(frame, body[0], &app.state);
    match app.state.tab {
        Tab::BoxScore => render_box_score(frame, body[1], &app.state),
        Tab::Advanced => render_advanced(frame, body[1], &app.state),
    }

    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let tab = match state.tab {
        Tab::BoxScore => "Box Score",
        Tab::Advanced => "Advanced (beta)",
    };
    let cycle = match &state.snapshot {
        Some(s) => format!("cycle #{} @ {}", s.cycle, s.fetched_at),
        None => "waiting for first cycle".to_string(),
    };
    let line1 = format!(
        " LIVE STAT LINES | {} | {} | refresh {}s",
        state.provider_label, tab, state.refresh_secs
    );
    let skipped = state.skipped_count();
    let line2 = if skipped > 0 {
        format!(" {cycle} | skipped {skipped} game(s)")
    } else {
        format!(" {cycle}")
    };
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    let target = if state.watch_target > 0.0 {
        format_stat_value(state.watch_target)
    } else {
        "-".to_string()
    };
    format!(
        "Tab Box/Adv | j/k Move | [/] Stat {} | +/- Target {} | a Add | c Clear | r Refresh | </> Interval | ? Help | q Quit",
        state.watch_stat.label(),
        target
    )
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let notice = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(notice, area);
}

fn table_notice(state: &AppState) -> Option<&'static str> {
    match state.status() {
        None => Some("Loading live games..."),
        Some(TableStatus::Ready) => None,
        Some(status) => status.notice(),
    }
}

fn render_box_score(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = " All Live Players (Box Score) ";
    if let Some(notice) = table_notice(state) {
        render_notice(frame, area, title, notice);
        return;
    }

    let rows: Vec<Row> = state.rows().iter().map(box_row).collect();
    let widths = [
        Constraint::Length(22),
        Constraint::Length(4),
        Constraint::Length(11),
        Constraint::Length(6),
    ]
    .into_iter()
    .chain(std::iter::repeat(Constraint::Length(4)).take(BOX_COLUMNS.len() - 4));

    let table = Table::new(rows, widths)
        .header(header_row(&BOX_COLUMNS))
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::White).bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn box_row(r: &PlayerStatLine) -> Row<'static> {
    Row::new(vec![
        r.name.clone(),
        r.team.clone(),
        r.matchup.clone(),
        format_minutes(r.minutes),
        r.pts.to_string(),
        r.fgm.to_string(),
        r.fga.to_string(),
        r.fg3m.to_string(),
        r.fg3a.to_string(),
        r.ftm.to_string(),
        r.fta.to_string(),
        r.reb.to_string(),
        r.ast.to_string(),
        r.stl.to_string(),
        r.blk.to_string(),
        r.tov.to_string(),
        r.pf.to_string(),
    ])
}

fn render_advanced(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = " Advanced Stats ";
    if !state.advanced_unlocked {
        render_notice(
            frame,
            area,
            title,
            "Advanced stats are locked right now. Set ADVANCED_UNLOCKED=true to enable.",
        );
        return;
    }
    if let Some(notice) = table_notice(state) {
        render_notice(frame, area, title, notice);
        return;
    }

    let adv = state.advanced_rows();
    let rows: Vec<Row> = adv.iter().map(advanced_row).collect();
    let widths = [
        Constraint::Length(22),
        Constraint::Length(4),
        Constraint::Length(11),
        Constraint::Length(6),
    ]
    .into_iter()
    .chain(std::iter::repeat(Constraint::Length(6)).take(ADVANCED_COLUMNS.len() - 4));

    let table = Table::new(rows, widths)
        .header(header_row(&ADVANCED_COLUMNS))
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::White).bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn advanced_row(a: &AdvancedStatLine) -> Row<'static> {
    let b = &a.base;
    Row::new(vec![
        b.name.clone(),
        b.team.clone(),
        b.matchup.clone(),
        format_minutes(b.minutes),
        a.pra.to_string(),
        a.pr.to_string(),
        a.pa.to_string(),
        a.ra.to_string(),
        a.stocks.to_string(),
        format!("{:.1}", a.usg_proxy),
        format!("{:.2}", a.pts_per_usg),
        format!("{:.3}", a.fg_pct),
        format!("{:.3}", a.fg3_pct),
        format!("{:.3}", a.ft_pct),
        b.pts.to_string(),
        b.reb.to_string(),
        b.ast.to_string(),
        b.stl.to_string(),
        b.blk.to_string(),
        b.tov.to_string(),
        b.fga.to_string(),
        b.fg3a.to_string(),
        b.fta.to_string(),
    ])
}

fn header_row(columns: &[&'static str]) -> Row<'static> {
    Row::new(columns.iter().map(|c| Cell::from(*c)))
        .style(Style::default().add_modifier(Modifier::BOLD))
}

fn render_watchlist(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title(" Watchlist ").borders(Borders::ALL);
    if state.watchlist.is_empty() {
        let hint = Paragraph::new("Select a player, pick a stat with [ ] and a target with + -, then press a.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let rows: Vec<Row> = state
        .watch_rows()
        .into_iter()
        .map(|w| {
            let style = match w.status {
                WatchStatus::Hit => Style::default().fg(Color::Green),
                WatchStatus::Pending { .. } => Style::default().fg(Color::Yellow),
                WatchStatus::Untracked => Style::default(),
            };
            Row::new(w.cells())
            .style(style)
        })
        .collect();
    let widths = [
        Constraint::Min(14),
        Constraint::Length(4),
        Constraint::Length(11),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&WATCH_COLUMNS))
        .block(block);
    frame.render_widget(table, area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|msg| {
            let style = if msg.starts_with("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::styled(msg.clone(), style)
        })
        .collect();
    let console = Paragraph::new(lines).block(Block::default().title(" Console ").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    let text = [
        "Tab        switch Box Score / Advanced",
        "j/k ↑/↓    move selection",
        "[ ]        cycle watch stat",
        "+ -        adjust watch target (0 = no target)",
        "a / Enter  add selected player to watchlist",
        "c          clear watchlist",
        "r          refresh now",
        "< >        refresh interval -/+ 5s (5..60)",
        "?          toggle help",
        "q          quit",
    ]
    .join("\n");
    frame.render_widget(Clear, popup);
    let help = Paragraph::new(text).block(Block::default().title(" Help ").borders(Borders::ALL));
    frame.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
