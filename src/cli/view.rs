//! Interactive TUI viewer shared by `watch` and `replay`.

use super::CliError;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ludo::game::{GRID_SIZE, PlayerId};
use ludo::replay::{Glyph, ReplayEngine, board_glyphs, phase_text};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

/// Viewer options.
#[derive(Debug, Clone, Copy)]
pub(super) struct ViewOptions {
    /// Window title.
    pub(super) title: &'static str,
    /// Delay between automatic steps.
    pub(super) speed_ms: u64,
    /// Step automatically from the start.
    pub(super) autoplay: bool,
    /// Highlight one player's pawns.
    pub(super) player_view: Option<PlayerId>,
}

/// App state for the TUI.
struct App {
    engine: ReplayEngine,
    options: ViewOptions,
    paused: bool,
    last_step: Instant,
}

impl App {
    fn new(engine: ReplayEngine, options: ViewOptions) -> Self {
        Self {
            engine,
            options,
            paused: !options.autoplay,
            last_step: Instant::now(),
        }
    }

    fn step_forward(&mut self) {
        if !self.engine.is_game_over() {
            if let Err(e) = self.engine.step_forward() {
                log::debug!("step forward: {e}");
            }
            self.last_step = Instant::now();
        }
    }

    fn step_backward(&mut self) {
        if let Err(e) = self.engine.step_backward() {
            log::debug!("step backward: {e}");
        }
        self.last_step = Instant::now();
    }

    fn restart(&mut self) {
        if let Err(e) = self.engine.goto_turn(0) {
            log::warn!("restart failed: {e}");
        }
        self.paused = true;
    }

    fn toggle_player_view(&mut self, id: PlayerId) {
        let known = usize::from(id) < self.engine.state().players().len();
        self.options.player_view = match self.options.player_view {
            Some(current) if current == id => None,
            _ if known => Some(id),
            current => current,
        };
    }

    fn increase_speed(&mut self) {
        self.options.speed_ms = self.options.speed_ms.saturating_sub(100).max(50);
    }

    fn decrease_speed(&mut self) {
        self.options.speed_ms = (self.options.speed_ms + 100).min(2000);
    }

    fn should_auto_step(&self) -> bool {
        !self.paused
            && !self.engine.is_game_over()
            && self.last_step.elapsed() >= Duration::from_millis(self.options.speed_ms)
    }

    /// Returns `false` when the viewer should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Right | KeyCode::Char('l') => {
                self.paused = true;
                self.step_forward();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.paused = true;
                self.step_backward();
            }
            KeyCode::Char('+' | '=') => self.increase_speed(),
            KeyCode::Char('-') => self.decrease_speed(),
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(digit) = c.to_digit(10).and_then(|d| PlayerId::try_from(d).ok()) {
                    self.toggle_player_view(digit - 1);
                }
            }
            _ => {}
        }
        true
    }
}

/// Run the viewer until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be driven.
pub(super) fn run_tui(engine: ReplayEngine, options: ViewOptions) -> Result<(), CliError> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(engine, options);
    let outcome = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    outcome
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if app.should_auto_step() {
            app.step_forward();
        }

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(17),   // Board and side panels
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(35), Constraint::Min(30)])
        .split(chunks[1]);

    render_board(f, main_chunks[0], app);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);

    render_players(f, side_chunks[0], app);
    render_events(f, side_chunks[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let turn = app.engine.turn();
    let max_turns = app.engine.recording().config.max_turns;

    let status = if app.engine.is_game_over() {
        "GAME OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " {} | Seed {} | Turn {turn}/{max_turns} | {status} | Speed: {}ms | {} ",
        app.options.title,
        app.engine.recording().seed,
        app.options.speed_ms,
        phase_text(app.engine.state()),
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

/// Terminal color for a pawn color.
const fn tui_color(color: ludo::Color) -> Color {
    match color {
        ludo::Color::Red => Color::Red,
        ludo::Color::Blue => Color::Blue,
        ludo::Color::Yellow => Color::Yellow,
        ludo::Color::Green => Color::Green,
    }
}

fn glyph_style(glyph: Glyph, focus: Option<ludo::Color>) -> Style {
    let dimmed = focus.is_some_and(|f| glyph.occupied && glyph.color != Some(f));
    match (glyph.color, glyph.occupied) {
        _ if dimmed => Style::default().fg(Color::DarkGray),
        (Some(color), true) => Style::default()
            .fg(tui_color(color))
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        (Some(color), false) => Style::default().fg(tui_color(color)),
        (None, true) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        (None, false) if glyph.symbol == '*' => {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        }
        (None, false) => Style::default().fg(Color::DarkGray),
    }
}

fn render_board(f: &mut Frame, area: Rect, app: &App) {
    let state = app.engine.state();
    let focus = app
        .options
        .player_view
        .and_then(|id| state.player(id))
        .map(|p| p.color);

    let lines: Vec<Line> = board_glyphs(state)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .flat_map(|glyph| {
                    [
                        Span::styled(glyph.symbol.to_string(), glyph_style(glyph, focus)),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!(" Board {GRID_SIZE}x{GRID_SIZE} ");
    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(board, area);
}

fn render_players(f: &mut Frame, area: Rect, app: &App) {
    let state = app.engine.state();
    let terminal = state.terminal();
    let seats = &app.engine.recording().seats;
    let current = state.current_player().id;
    let mut lines = Vec::new();

    for player in state.players() {
        let color = tui_color(player.color);
        let strategy = seats
            .get(usize::from(player.id))
            .map_or("?", |s| s.strategy.name());
        let marker = if player.id == current && !state.is_game_over() {
            "> "
        } else {
            "  "
        };
        let mut name_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        if app.options.player_view == Some(player.id) {
            name_style = name_style.add_modifier(Modifier::UNDERLINED);
        }

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{} ", player.name), name_style),
            Span::raw(format!("({}, {strategy})", player.color)),
        ]));
        let progress: Vec<String> = player
            .pawns()
            .iter()
            .map(|p| p.progress().to_string())
            .collect();
        lines.push(Line::from(format!(
            "    Home {}/4  In play {}  Pawns [{}]",
            player.pawns_home(terminal),
            player.pawns_in_play(terminal),
            progress.join(" ")
        )));
        lines.push(Line::from(format!(
            "    Captures {}  Captured {}  Stars {}",
            player.captures, player.times_captured, player.stars_triggered
        )));
    }

    let players = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Players "))
        .wrap(Wrap { trim: false });

    f.render_widget(players, area);
}

fn render_events(f: &mut Frame, area: Rect, app: &App) {
    let state = app.engine.state();
    let lines: Vec<Line> = app
        .engine
        .last_events()
        .iter()
        .map(|event| {
            let color = state
                .player(event.player())
                .map_or(Color::White, |p| tui_color(p.color));
            Line::from(Span::styled(event.to_string(), Style::default().fg(color)))
        })
        .collect();

    let events = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Last turn "))
        .wrap(Wrap { trim: true });

    f.render_widget(events, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.engine.is_game_over() {
        " [q] Quit  [r] Restart  [←/→] Step  [1-4] Player view "
    } else {
        " [q] Quit  [Space] Pause  [←/→] Step  [+/-] Speed  [r] Restart  [1-4] Player view "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
