use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap};
use tracing::{info, warn};

use kleague_ignobel::awards;
use kleague_ignobel::config::Settings;
use kleague_ignobel::dashboard::{
    DashboardData, DashboardState, EntityRow, PitchMode, Screen, ScoreRow, WINNER_MAP_TOP,
};
use kleague_ignobel::metrics::Metric;
use kleague_ignobel::pitch::{PITCH_LENGTH, PITCH_WIDTH, ZoneX, ZoneY};
use kleague_ignobel::{logging, text};

struct App {
    data: DashboardData,
    state: DashboardState,
    artifacts_dir: PathBuf,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(artifacts_dir: PathBuf) -> Self {
        let mut app = Self {
            data: DashboardData::default(),
            state: DashboardState::default(),
            artifacts_dir,
            status: None,
            should_quit: false,
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        match DashboardData::load(&self.artifacts_dir) {
            Ok(data) => {
                self.data = data;
                self.state = DashboardState {
                    screen: self.state.screen,
                    ..DashboardState::default()
                };
                self.status = None;
            }
            Err(err) => {
                warn!("dashboard load failed: {err}");
                let hint = if err.is_missing_input() {
                    " (run build_artifacts first)"
                } else {
                    ""
                };
                self.status = Some(format!("{err}{hint}"));
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_screen(Screen::Awards),
            KeyCode::Char('2') => self.state.set_screen(Screen::Teams),
            KeyCode::Char('3') => self.state.set_screen(Screen::Players),
            KeyCode::Char('4') => self.state.set_screen(Screen::Patterns),
            KeyCode::Char('5') => self.state.set_screen(Screen::Pitch),
            KeyCode::Tab => {
                let idx = Screen::ALL
                    .iter()
                    .position(|s| *s == self.state.screen)
                    .unwrap_or(0);
                self.state.set_screen(Screen::ALL[(idx + 1) % Screen::ALL.len()]);
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.set_screen(Screen::Awards),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(&self.data),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(&self.data),
            KeyCode::Char('l') | KeyCode::Right => self.state.cycle(&self.data, true),
            KeyCode::Char('h') | KeyCode::Left => self.state.cycle(&self.data, false),
            KeyCode::Char('a') => self.state.cycle_action(&self.data),
            KeyCode::Enter if self.state.screen == Screen::Players => {
                self.state.toggle_player_detail()
            }
            KeyCode::Char('c') if self.state.screen == Screen::Players => {
                self.state.toggle_pin(&self.data)
            }
            KeyCode::Char('w') if self.state.screen == Screen::Pitch => {
                self.state.toggle_pitch_mode()
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let settings = Settings::load();
    if let Err(err) = logging::init_file(Path::new("logs/dashboard.log")) {
        eprintln!("logging disabled: {err:#}");
    }
    info!("dashboard reading {}", settings.artifacts_dir.display());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(settings.artifacts_dir);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
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
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if let Some(status) = &app.status {
        let msg = Paragraph::new(status.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, chunks[1]);
    } else {
        match app.state.screen {
            Screen::Awards => render_awards(frame, chunks[1], app),
            Screen::Teams => render_teams(frame, chunks[1], app),
            Screen::Players => render_players(frame, chunks[1], app),
            Screen::Patterns => render_patterns(frame, chunks[1], app),
            Screen::Pitch => render_pitch(frame, chunks[1], app),
        }
    }

    let footer = Paragraph::new(footer_text(app.state.screen))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let tabs: Vec<String> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if *s == app.state.screen {
                format!("[{} {}]", i + 1, s.label())
            } else {
                format!(" {} {} ", i + 1, s.label())
            }
        })
        .collect();
    let context = match app.state.screen {
        Screen::Awards => {
            let award = app.state.current_award();
            format!("{} {}", award.icon, award.title)
        }
        Screen::Players => match app.state.selected_player(&app.data) {
            Some(p) if app.state.player_detail => format!("{} ({})", p.name, p.team_name),
            _ => format!("Sort: {}", app.state.player_metric().name()),
        },
        Screen::Pitch if app.state.pitch_mode == PitchMode::Winners => {
            let award = app.state.current_award();
            format!("{} {} winners", award.icon, award.title)
        }
        Screen::Patterns | Screen::Pitch => format!(
            "{} | {}",
            app.state.team(&app.data).map(|t| t.name.as_str()).unwrap_or("-"),
            app.state.action(&app.data).unwrap_or("-")
        ),
        Screen::Teams => format!("{} teams", app.data.teams.len()),
    };
    let line1 = format!("  K LEAGUE IGNOBEL | {context}");
    let line2 = format!("  {}", tabs.join(""));
    let line3 = format!("  {}", app.artifacts_dir.display());
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Awards => "1-5/Tab Screens | j/k Move | h/l Award | r Reload | ? Help | q Quit",
        Screen::Teams => "1-5/Tab Screens | j/k Move | r Reload | ? Help | q Quit",
        Screen::Players => {
            "1-5/Tab Screens | j/k Move | h/l Sort | Enter Profile | c Compare | a Action | ? Help | q Quit"
        }
        Screen::Patterns => "1-5/Tab Screens | h/l Team | a Action | b/Esc Back | ? Help | q Quit",
        Screen::Pitch => {
            "1-5/Tab Screens | h/l Team or award | a Action | w Winner map | ? Help | q Quit"
        }
    }
}

fn render_awards(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let award = app.state.current_award();
    let rows = app.data.award_rows(award.id);
    let info = match rows.get(app.state.selected).and_then(|r| r.award_score()) {
        Some(score) => text::blurb(&score),
        None => format!(
            "{}\nFormula: {}\n{} | {} | {} is worse | min attempts {}",
            award.description,
            award.formula,
            award.level.label(),
            award.category,
            award.direction.label(),
            award.min_attempts
        ),
    };
    frame.render_widget(
        Paragraph::new(info).wrap(Wrap { trim: true }),
        sections[0],
    );

    let widths = award_columns();
    render_header_row(
        frame,
        sections[1],
        &widths,
        &["Rank", "Name", "Team", "Score", "Pct", "Sample"],
    );

    if rows.is_empty() {
        render_empty(frame, sections[2], "No qualifying entries for this award");
        return;
    }
    render_rows(frame, sections[2], &widths, Some(app.state.selected), rows.len(), |idx| {
        let r = rows[idx];
        vec![
            text::rank_label(r.rank),
            r.entity_name.clone(),
            r.team_name.clone(),
            text::format_score(award, r.score),
            format!("{:.0}", r.percentile),
            r.sample_size.map(|n| n.to_string()).unwrap_or_default(),
        ]
    });
}

fn award_columns() -> [Constraint; 6] {
    [
        Constraint::Length(9),
        Constraint::Min(16),
        Constraint::Min(14),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(7),
    ]
}

fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(45),
            Constraint::Min(3),
        ])
        .split(area);

    let mut widths = vec![Constraint::Min(16), Constraint::Length(6), Constraint::Length(7)];
    widths.extend(Metric::TEAM.iter().map(|_| Constraint::Length(12)));
    let mut headers = vec!["Team", "Games", "H/A"];
    headers.extend(Metric::TEAM.iter().map(|m| m.name()));
    render_header_row(frame, sections[0], &widths, &headers);

    if app.data.teams.is_empty() {
        render_empty(frame, sections[1], "No team snapshot rows");
        return;
    }
    render_rows(frame, sections[1], &widths, Some(app.state.selected), app.data.teams.len(), |idx| {
        let t = &app.data.teams[idx];
        let home_away = app
            .data
            .home_away
            .get(&t.id)
            .map(|h| format!("{}/{}", h.home, h.away))
            .unwrap_or_else(|| "-".to_string());
        let mut cells = vec![t.name.clone(), t.games.to_string(), home_away];
        cells.extend(Metric::TEAM.iter().map(|m| metric_cell(t.metrics.get(m).copied(), *m)));
        cells
    });

    if let Some(team) = app.state.selected_team(&app.data) {
        render_team_actions(frame, sections[2], app, team);
    }
}

fn render_team_actions(frame: &mut Frame, area: Rect, app: &App, team: &EntityRow) {
    let block = Block::default()
        .title(format!("{} per game", team.name))
        .borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    let widths = [
        Constraint::Min(18),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(9),
    ];
    render_header_row(frame, sections[0], &widths, &["Action", "Total", "Fails", "Per game"]);

    let rows = app.data.team_action_rows(team.id);
    if rows.is_empty() {
        render_empty(frame, sections[1], "No action rows for this team");
        return;
    }
    render_rows(frame, sections[1], &widths, None, rows.len(), |idx| {
        let r = rows[idx];
        vec![
            r.action.clone(),
            r.total.to_string(),
            r.fails.to_string(),
            format!("{:.1}", r.per_game),
        ]
    });
}

fn metric_cell(value: Option<f64>, metric: Metric) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if metric.per_game() => format!("{v:.1}"),
        Some(v) => format!("{v:.3}"),
    }
}

fn render_players(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.player_detail {
        match app.state.selected_player(&app.data) {
            Some(player) => render_player_detail(frame, area, app, player),
            None => render_empty(frame, area, "No player selected"),
        }
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let metric = app.state.player_metric();
    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(10),
    ];
    render_header_row(
        frame,
        sections[0],
        &widths,
        &["#", "Player", "Team", "Games", metric.name()],
    );

    let players = app.state.sorted_players(&app.data);
    if players.is_empty() {
        render_empty(frame, sections[1], "No player snapshot rows");
        return;
    }
    let pinned = app.state.pinned;
    render_rows(frame, sections[1], &widths, Some(app.state.selected), players.len(), |idx| {
        let p = players[idx];
        let mark = if pinned == Some((p.id, p.team_id)) { "*" } else { "" };
        vec![
            format!("{}{mark}", idx + 1),
            p.name.clone(),
            p.team_name.clone(),
            p.games.to_string(),
            metric_cell(p.metrics.get(&metric).copied(), metric),
        ]
    });
}

fn render_player_detail(frame: &mut Frame, area: Rect, app: &App, player: &EntityRow) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[1]);

    render_player_profile(frame, halves[0], app, player);
    match app.state.pinned_player(&app.data) {
        Some(other) if other != player => render_comparison(frame, right[0], app, player, other),
        _ => {
            let hint = Paragraph::new("Press c on one player, then open another to compare.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Compare").borders(Borders::ALL));
            frame.render_widget(hint, right[0]);
        }
    }
    render_player_zones(frame, right[1], app, player);
}

fn render_player_profile(frame: &mut Frame, area: Rect, app: &App, player: &EntityRow) {
    let block = Block::default()
        .title(format!("{} ({}) | {} games", player.name, player.team_name, player.games))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    let widths = [
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(8),
    ];
    render_header_row(frame, sections[0], &widths, &["Award", "Rank", "Pct", "Score"]);

    let rows = app.data.player_profile(player);
    if rows.is_empty() {
        render_empty(frame, sections[1], "Not ranked in any award");
        return;
    }
    render_rows(frame, sections[1], &widths, None, rows.len(), |idx| {
        let r = rows[idx];
        match awards::find(&r.award_id) {
            Some(award) => vec![
                format!("{} {}", award.icon, award.title),
                text::rank_label(r.rank),
                format!("{:.0}", r.percentile),
                text::format_score(award, r.score),
            ],
            None => vec![
                r.award_id.clone(),
                text::rank_label(r.rank),
                format!("{:.0}", r.percentile),
                format!("{:.3}", r.score),
            ],
        }
    });
}

fn render_comparison(frame: &mut Frame, area: Rect, app: &App, left: &EntityRow, right: &EntityRow) {
    let block = Block::default()
        .title(format!("{} vs {}", left.name, right.name))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);
    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
    ];
    render_header_row(frame, sections[0], &widths, &["Award", "Pct A", "Pct B", "Gap"]);

    let rows = app.data.compare_players(left, right);
    if rows.is_empty() {
        render_empty(frame, sections[1], "Neither player is ranked");
        return;
    }
    let pct = |s: Option<&ScoreRow>| {
        s.map(|r| format!("{:.0}", r.percentile))
            .unwrap_or_else(|| "-".to_string())
    };
    render_rows(frame, sections[1], &widths, None, rows.len(), |idx| {
        let r = &rows[idx];
        vec![
            format!("{} {}", r.award.icon, r.award.title),
            pct(r.left),
            pct(r.right),
            format!("{:+.0}", r.diff()),
        ]
    });
}

fn render_player_zones(frame: &mut Frame, area: Rect, app: &App, player: &EntityRow) {
    let Some(action) = app.state.action(&app.data) else {
        render_empty(frame, area, "No zone data");
        return;
    };
    let block = Block::default()
        .title(format!("{action} by zone"))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let grid = app.data.player_heatmap(player, action);
    let cells = grid.map(|col| col.map(|(count, fails)| (count, format!("{fails} fail"))));
    render_zone_grid(frame, sections[0], &cells, false);

    let top: Vec<String> = app
        .data
        .top_zones(player, action, 3)
        .into_iter()
        .map(|(zone, n)| format!("{} {n}", zone.label()))
        .collect();
    let line = if top.is_empty() {
        "No events".to_string()
    } else {
        format!("Top zones: {}", top.join(", "))
    };
    frame.render_widget(Paragraph::new(line), sections[1]);
}

fn render_patterns(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(team), Some(action)) = (app.state.team(&app.data), app.state.action(&app.data)) else {
        render_empty(frame, area, "No zone data");
        return;
    };
    let grid = app.data.heatmap(team.id, action);
    let cells = grid.map(|col| col.map(|(count, avg)| (count, format!("league {avg:.1}"))));
    render_zone_grid(frame, area, &cells, true);
}

/// Draws a 4 x 3 zone grid, own goal on the left. Each cell shows its count
/// above a caption.
fn render_zone_grid(frame: &mut Frame, area: Rect, cells: &[[(u32, String); 3]; 4], titled: bool) {
    let peak = cells
        .iter()
        .flatten()
        .map(|(count, _)| *count as f64)
        .fold(0.0f64, f64::max);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for (xi, x) in ZoneX::ALL.into_iter().enumerate() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(columns[xi]);
        for (yi, y) in ZoneY::ALL.into_iter().enumerate() {
            let (count, caption) = &cells[xi][yi];
            let mut block = Block::default().borders(Borders::ALL);
            if titled {
                block = block.title(format!("{}-{}", x.label(), y.label()));
            }
            let cell = Paragraph::new(format!("{count}\n{caption}"))
                .alignment(Alignment::Center)
                .style(heat_style(*count as f64, peak))
                .block(block);
            frame.render_widget(cell, rows[yi]);
        }
    }
}

fn heat_style(value: f64, peak: f64) -> Style {
    if peak <= 0.0 || value <= 0.0 {
        return Style::default().fg(Color::DarkGray);
    }
    let share = value / peak;
    let bg = if share >= 0.75 {
        Color::Red
    } else if share >= 0.5 {
        Color::LightRed
    } else if share >= 0.25 {
        Color::Yellow
    } else {
        Color::Blue
    };
    Style::default().fg(Color::Black).bg(bg)
}

fn pitch_chart<'a>(title: String, datasets: Vec<Dataset<'a>>) -> Chart<'a> {
    Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, PITCH_LENGTH])
                .labels(vec!["0".into(), "35".into(), "70".into(), "105".into()]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, PITCH_WIDTH])
                .labels(vec!["0".into(), "34".into(), "68".into()]),
        )
}

fn scatter(name: String, color: Color, points: &[(f64, f64)]) -> Dataset<'_> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color))
        .data(points)
}

fn render_pitch(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.pitch_mode == PitchMode::Winners {
        render_winner_map(frame, area, app);
        return;
    }
    let (Some(team), Some(action)) = (app.state.team(&app.data), app.state.action(&app.data)) else {
        render_empty(frame, area, "No event data");
        return;
    };
    let (ok, other) = app.data.pitch_points(team.id, action);
    let title = format!(
        "{} {action}: {} success, {} other",
        team.name,
        ok.len(),
        other.len()
    );
    let datasets = vec![
        scatter("success".to_string(), Color::Green, &ok),
        scatter("other".to_string(), Color::Red, &other),
    ];
    frame.render_widget(pitch_chart(title, datasets), area);
}

fn render_winner_map(frame: &mut Frame, area: Rect, app: &App) {
    const COLORS: [Color; 3] = [Color::Yellow, Color::Cyan, Color::Magenta];

    let award = app.state.current_award();
    let trails = app.data.winner_trails(award, WINNER_MAP_TOP);
    if trails.iter().all(|t| t.points.is_empty()) {
        render_empty(frame, area, "No events for this award's top entries");
        return;
    }
    let datasets = trails
        .iter()
        .enumerate()
        .map(|(i, t)| {
            scatter(
                format!("{} {}", text::rank_label(t.rank), t.name),
                COLORS[i % COLORS.len()],
                &t.points,
            )
        })
        .collect();
    let title = format!("{} {}: top {WINNER_MAP_TOP}", award.icon, award.title);
    frame.render_widget(pitch_chart(title, datasets), area);
}

fn render_header_row(frame: &mut Frame, area: Rect, widths: &[Constraint], titles: &[&str]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (col, title) in cols.iter().zip(titles) {
        render_cell_text(frame, *col, title, style);
    }
}

fn render_rows<F>(
    frame: &mut Frame,
    area: Rect,
    widths: &[Constraint],
    selected: Option<usize>,
    total: usize,
    cells: F,
) where
    F: Fn(usize) -> Vec<String>,
{
    if area.height == 0 {
        return;
    }
    let (start, end) = visible_range(selected.unwrap_or(0), total, area.height as usize);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + i as u16,
            width: area.width,
            height: 1,
        };
        let row_style = if selected == Some(idx) {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected == Some(idx) {
            frame.render_widget(Block::default().style(row_style), row_area);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        for (col, value) in cols.iter().zip(cells(idx)) {
            render_cell_text(frame, *col, &value, row_style);
        }
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_empty(frame: &mut Frame, area: Rect, msg: &str) {
    let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(empty, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "K League Ignobel - Help",
        "",
        "Global:",
        "  1-5 / Tab    Switch screen",
        "  b / Esc      Back to awards",
        "  r            Reload snapshots",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  h/l or ←/→   Award (Awards), sort metric (Players)",
        "",
        "Players:",
        "  Enter        Profile of the selected player",
        "  c            Hold player for comparison",
        "  a            Action type for the zone grid",
        "",
        "Patterns / Pitch:",
        "  h/l          Team (award on the winner map)",
        "  a            Action type",
        "  w            Team events / award winner map",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
