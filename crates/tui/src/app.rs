use std::{collections::HashMap, io, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info};

use lesny_core::{
    save::SaveError,
    session, Engine, Hue, SaveFile, Tone,
};

use crate::background::MenuBackground;

const TICK_RATE: Duration = Duration::from_millis(250);
const TITLE: &str = "LESNY DUNGEON";
const SUBTITLE: &str = "By the Lesny Dungeon crew";
const LOG_PANEL_HEIGHT: u16 = 7;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Yellow,
            muted: Color::DarkGray,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Play,
}

pub struct LesnyApp {
    theme: Theme,
    background: MenuBackground,
    screen: Screen,
    engine: Option<Engine>,
    save: SaveFile,
    popup: Option<String>,
    should_quit: bool,
}

impl LesnyApp {
    pub fn new(background: MenuBackground) -> Self {
        Self {
            theme: Theme::default(),
            background,
            screen: Screen::Menu,
            engine: None,
            save: SaveFile::default_slot(),
            popup: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                return Ok(());
            }
            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key)?;
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // A modal message swallows the next key press, whatever it is.
        if self.popup.take().is_some() {
            return Ok(());
        }
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Play => self.handle_play_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.engine = Some(session::new_session()?);
                self.screen = Screen::Play;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => match self.save.read() {
                Ok(payload) => {
                    info!(saved_at = %payload.saved_at, "continuing saved session");
                    self.engine = Some(payload.engine);
                    self.screen = Screen::Play;
                }
                Err(SaveError::NotFound(_)) => {
                    self.popup = Some("No saved game to load.".to_string());
                }
                Err(err) => {
                    error!(?err, "loading save failed");
                    self.popup = Some(format!("Failed to load save:\n{err}"));
                }
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_play_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(engine) = self.engine.as_mut() else {
            self.screen = Screen::Menu;
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                match self.save.write(engine) {
                    Ok(()) => {
                        self.screen = Screen::Menu;
                    }
                    Err(err) => {
                        error!(?err, "saving session failed");
                        self.popup = Some(format!("Failed to save game:\n{err}"));
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => engine.move_player(0, -1),
            KeyCode::Down | KeyCode::Char('j') => engine.move_player(0, 1),
            KeyCode::Left | KeyCode::Char('h') => engine.move_player(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => engine.move_player(1, 0),
            KeyCode::Char('>') => engine.descend(&mut rand::thread_rng()),
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Menu => self.draw_menu(frame),
            Screen::Play => self.draw_play(frame),
        }
        if let Some(text) = self.popup.clone() {
            self.render_popup(frame, &text);
        }
    }

    fn draw_menu(&self, frame: &mut Frame) {
        let area = frame.size();

        let backdrop: Vec<Line> = (0..area.height)
            .map(|y| {
                Line::from(
                    (0..area.width)
                        .map(|x| {
                            let cell = self.background.cell(x, y);
                            Span::styled(
                                cell.glyph.to_string(),
                                Style::default().fg(cell.color),
                            )
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(backdrop), area);

        let title_y = (area.height / 2).saturating_sub(4);
        let title = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, Rect::new(area.x, area.y + title_y, area.width, 1));

        let menu_items = ["[N] Play a new game", "[C] Continue last game", "[Q] Quit"];
        for (idx, item) in menu_items.iter().enumerate() {
            let line = Line::from(Span::styled(
                format!("{item:<24}"),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .bg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ));
            let y = area.y + title_y + 2 + idx as u16;
            if y < area.bottom() {
                let row = centered_rect(24, 1, Rect::new(area.x, y, area.width, 1));
                frame.render_widget(Paragraph::new(line), row);
            }
        }

        if area.height > 1 {
            let subtitle = Paragraph::new(Line::from(Span::styled(
                SUBTITLE,
                Style::default().fg(self.theme.muted),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(
                subtitle,
                Rect::new(area.x, area.bottom().saturating_sub(2), area.width, 1),
            );
        }
    }

    fn draw_play(&self, frame: &mut Frame) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(LOG_PANEL_HEIGHT),
            ])
            .split(frame.size());

        self.render_status(frame, chunks[0], engine);
        self.render_map(frame, chunks[1], engine);
        self.render_log(frame, chunks[2], engine);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, engine: &Engine) {
        let fighter = &engine.player.fighter;
        let status = Line::from(vec![
            Span::styled(
                engine.player.name.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  HP {}/{}  Floor {}  Turn {}",
                fighter.hp, fighter.max_hp, engine.world.current_floor, engine.turn
            )),
        ]);
        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_map(&self, frame: &mut Frame, area: Rect, engine: &Engine) {
        let mut glyphs: HashMap<(i32, i32), (char, Color)> = HashMap::new();
        for item in &engine.items {
            glyphs.insert((item.x, item.y), (item.glyph, self.hue_color(item.hue)));
        }
        for monster in &engine.monsters {
            glyphs.insert(
                monster.pos(),
                (monster.glyph, self.hue_color(monster.hue)),
            );
        }
        glyphs.insert(
            engine.player.pos(),
            (engine.player.glyph, self.hue_color(engine.player.hue)),
        );

        let rows = (area.height as i32).min(engine.map.height);
        let cols = (area.width as i32).min(engine.map.width);
        let lines: Vec<Line> = (0..rows)
            .map(|y| {
                let spans: Vec<Span> = (0..cols)
                    .map(|x| {
                        let visible = engine.map.is_visible(x, y);
                        if visible {
                            if let Some(&(glyph, color)) = glyphs.get(&(x, y)) {
                                return Span::styled(
                                    glyph.to_string(),
                                    Style::default().fg(color),
                                );
                            }
                        }
                        let tile = engine.map.tile(x, y);
                        let glyph = match tile.kind {
                            lesny_core::TileKind::Wall => '#',
                            lesny_core::TileKind::Floor => '.',
                            lesny_core::TileKind::DownStairs => '>',
                        };
                        if visible {
                            Span::styled(
                                glyph.to_string(),
                                Style::default().fg(self.theme.primary_fg),
                            )
                        } else if engine.map.is_explored(x, y) {
                            Span::styled(glyph.to_string(), Style::default().fg(self.theme.muted))
                        } else {
                            Span::raw(" ")
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, engine: &Engine) {
        let capacity = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = engine
            .log
            .tail(capacity)
            .iter()
            .map(|message| {
                Line::from(Span::styled(
                    message.full_text(),
                    Style::default().fg(self.tone_color(message.tone)),
                ))
            })
            .collect();
        let log = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Log"))
            .wrap(Wrap { trim: false });
        frame.render_widget(log, area);
    }

    fn render_popup(&self, frame: &mut Frame, text: &str) {
        let area = frame.size();
        let width = (text.lines().map(str::len).max().unwrap_or(0) as u16 + 4).min(area.width);
        let height = (text.lines().count() as u16 + 2).min(area.height);
        let popup = centered_rect(width, height, area);
        frame.render_widget(Clear, popup);
        let body = Paragraph::new(text.to_string())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.warning)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
        frame.render_widget(body, popup);
    }

    fn hue_color(&self, hue: Hue) -> Color {
        match hue {
            Hue::Player => Color::White,
            Hue::Monster => self.theme.danger,
            Hue::Item => Color::Magenta,
        }
    }

    fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Welcome => Color::Cyan,
            Tone::Info => self.theme.primary_fg,
            Tone::Combat => self.theme.danger,
            Tone::Warning => self.theme.warning,
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
