use std::{io, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use arboard::Clipboard;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use raildoor_core::{
    dataset::{DatasetLoader, PreparedDataset},
    export,
    models::Station,
    selection::Selection,
    view::ResultsView,
};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Query,
    Lines,
    Directions,
}

enum AppEvent {
    Input(Event),
    Tick,
}

struct UiState {
    query: String,
    suggestions: Vec<Station>,
    suggestion_cursor: usize,
    focus: Focus,
    status: String,
    results_scroll: u16,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            suggestion_cursor: 0,
            focus: Focus::Query,
            status: "Ready".to_string(),
            results_scroll: 0,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn move_suggestion_cursor(&mut self, delta: isize) {
        if self.suggestions.is_empty() {
            self.suggestion_cursor = 0;
            return;
        }
        let len = self.suggestions.len() as isize;
        let mut idx = self.suggestion_cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= len {
            idx = len - 1;
        }
        self.suggestion_cursor = idx as usize;
    }
}

/// High-level application state for the raildoor TUI.
pub struct RaildoorApp {
    loader: DatasetLoader,
    data: Arc<PreparedDataset>,
    selection: Selection,
    state: UiState,
    theme: Theme,
}

impl RaildoorApp {
    pub fn new(loader: DatasetLoader, data: Arc<PreparedDataset>) -> Self {
        Self {
            loader,
            data,
            selection: Selection::new(),
            state: UiState::default(),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state.set_status(format!(
            "Loaded {} stations, type to search",
            self.data.dataset.stations.len()
        ));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => {
                    if let Err(err) = self.handle_input(event) {
                        self.state.set_status(format!("Error: {err}"));
                    }
                }
                Some(AppEvent::Tick) => {}
                None => break,
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) => Ok(()),
            Event::Mouse(_) => Ok(()),
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.handle_global_shortcut(&key) {
            return Ok(());
        }
        match self.state.focus {
            Focus::Query => self.handle_query_key(key),
            Focus::Lines => self.handle_picker_key(key, Focus::Lines),
            Focus::Directions => self.handle_picker_key(key, Focus::Directions),
        }
        Ok(())
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers == KeyModifiers::CONTROL {
            match key.code {
                KeyCode::Char('c') => {
                    self.state.should_quit = true;
                    return true;
                }
                KeyCode::Char('y') => {
                    self.copy_summary();
                    return true;
                }
                KeyCode::Char('r') => {
                    self.reload_dataset();
                    return true;
                }
                _ => {}
            }
        }
        match key.code {
            KeyCode::PageDown => {
                self.state.results_scroll = self.state.results_scroll.saturating_add(4);
                true
            }
            KeyCode::PageUp => {
                self.state.results_scroll = self.state.results_scroll.saturating_sub(4);
                true
            }
            _ => false,
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.state.query.is_empty() && !self.selection.has_station() {
                    self.state.should_quit = true;
                } else {
                    self.clear_selection();
                }
            }
            KeyCode::Enter => {
                if let Some(station) = self
                    .state
                    .suggestions
                    .get(self.state.suggestion_cursor)
                    .cloned()
                {
                    self.select_station(station);
                } else if !self.state.query.trim().is_empty() {
                    self.state.set_status("No matching stations".to_string());
                }
            }
            KeyCode::Up => self.state.move_suggestion_cursor(-1),
            KeyCode::Down => self.state.move_suggestion_cursor(1),
            KeyCode::Backspace => {
                self.state.query.pop();
                self.update_query();
            }
            KeyCode::Tab => self.focus_picker(Focus::Lines),
            KeyCode::BackTab => self.focus_picker(Focus::Directions),
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.query.push(c);
                    self.update_query();
                }
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent, focus: Focus) {
        let delta = match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => Some(-1),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => Some(1),
            _ => None,
        };
        if let Some(delta) = delta {
            match focus {
                Focus::Lines => self.selection.cycle_line(delta),
                _ => self.selection.cycle_direction(delta),
            }
            self.state.results_scroll = 0;
            self.announce_active_pick();
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.state.focus = Focus::Query;
                self.state.set_status("Back to search".to_string());
            }
            KeyCode::Tab => match focus {
                Focus::Lines => self.focus_picker(Focus::Directions),
                _ => {
                    self.state.focus = Focus::Query;
                }
            },
            KeyCode::BackTab => match focus {
                Focus::Directions => self.focus_picker(Focus::Lines),
                _ => {
                    self.state.focus = Focus::Query;
                }
            },
            KeyCode::Char('c') => self.copy_summary(),
            KeyCode::Char('q') => self.state.should_quit = true,
            _ => {}
        }
    }

    fn focus_picker(&mut self, focus: Focus) {
        if self.selection.has_station() {
            self.state.focus = focus;
        } else {
            self.state.set_status("Select a station first".to_string());
        }
    }

    fn announce_active_pick(&mut self) {
        let line = self
            .selection
            .active_line_code()
            .map(|code| format!("{} Line", self.data.dataset.line_name(code)));
        let direction = self.selection.active_direction().map(|dir| dir.label.clone());
        if let (Some(line), Some(direction)) = (line, direction) {
            self.state.set_status(format!("{line}, {direction}"));
        }
    }

    fn update_query(&mut self) {
        if self.selection.sync_with_query(&self.state.query) {
            self.state.results_scroll = 0;
            self.state.focus = Focus::Query;
        }
        self.state.suggestions = self
            .data
            .suggestions(&self.state.query)
            .into_iter()
            .cloned()
            .collect();
        self.state.suggestion_cursor = 0;
    }

    fn select_station(&mut self, station: Station) {
        info!(station = %station.name, "Station selected");
        self.state.query = station.name.clone();
        self.state.suggestions.clear();
        self.state.suggestion_cursor = 0;
        self.state.results_scroll = 0;
        self.state
            .set_status(format!("Showing {}", station.display_name()));
        self.selection.select(station);
    }

    fn clear_selection(&mut self) {
        self.state.query.clear();
        self.state.suggestions.clear();
        self.state.suggestion_cursor = 0;
        self.state.results_scroll = 0;
        self.state.focus = Focus::Query;
        self.selection.clear();
        self.state.set_status("Cleared".to_string());
    }

    fn copy_summary(&mut self) {
        let Some(payload) = export::clipboard_payload(&self.selection, &self.data.dataset) else {
            self.state
                .set_status("Select a station before copying".to_string());
            return;
        };
        write_clipboard(payload);
        self.state.set_status("Summary copied".to_string());
    }

    fn reload_dataset(&mut self) {
        self.loader.refresh(self.loader.path());
        match self.loader.load() {
            Ok(data) => {
                self.data = data;
                self.selection.clear();
                self.state.suggestions.clear();
                self.state.suggestion_cursor = 0;
                self.state.results_scroll = 0;
                self.update_query();
                self.state.set_status(format!(
                    "Reloaded {} stations",
                    self.data.dataset.stations.len()
                ));
            }
            Err(err) => {
                self.state.set_status(format!("Reload failed: {err}"));
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(24)])
            .split(rows[1]);

        self.render_search(frame, rows[0]);
        self.render_sidebar(frame, body[0]);
        self.render_results(frame, body[1]);
        self.render_status(frame, rows[2]);

        if !self.state.suggestions.is_empty() {
            self.render_suggestions(frame, rows[0], area);
        }
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == Focus::Query;
        let border_style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default()
        };
        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(self.state.query.clone()),
        ]);
        let paragraph = Paragraph::new(input_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Station"),
        );
        frame.render_widget(paragraph, area);

        if focused {
            let cursor_x =
                (area.x + 3 + self.state.query.len() as u16).min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1);
        }
    }

    fn render_suggestions(&self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        let height = (self.state.suggestions.len() as u16 + 2)
            .min(bounds.height.saturating_sub(anchor.y + anchor.height));
        if height < 3 {
            return;
        }
        let width = anchor.width.saturating_sub(4).min(60);
        if width < 16 {
            return;
        }
        let area = Rect::new(anchor.x + 2, anchor.y + anchor.height, width, height);

        frame.render_widget(Clear, area);

        let items: Vec<ListItem> = self
            .state
            .suggestions
            .iter()
            .enumerate()
            .map(|(idx, station)| {
                let marker = if idx == self.state.suggestion_cursor {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let mut spans = vec![
                    marker,
                    Span::styled(
                        station.name.clone(),
                        Style::default()
                            .fg(self.theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                ];
                if !station.subtitle.trim().is_empty() {
                    spans.push(Span::styled(
                        format!(" · {}", station.subtitle),
                        Style::default().fg(self.theme.muted),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(
            self.state
                .suggestion_cursor
                .min(self.state.suggestions.len().saturating_sub(1)),
        ));

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Suggestions"))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.lines_block_height()),
                Constraint::Length(self.directions_block_height()),
                Constraint::Min(4),
                Constraint::Length(7),
            ])
            .split(area);

        self.render_lines(frame, chunks[0]);
        self.render_directions(frame, chunks[1]);
        self.render_station_info(frame, chunks[2]);
        self.render_help(frame, chunks[3]);
    }

    fn lines_block_height(&self) -> u16 {
        let count = self
            .selection
            .station()
            .map(|station| station.lines.len().max(1))
            .unwrap_or(1) as u16;
        count + 2
    }

    fn directions_block_height(&self) -> u16 {
        let count = self
            .selection
            .station()
            .map(|station| station.directions.len().max(1))
            .unwrap_or(1) as u16;
        count + 2
    }

    fn render_lines(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == Focus::Lines;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(self.theme.accent)
            } else {
                Style::default()
            })
            .title("Line");

        let Some(station) = self.selection.station() else {
            let placeholder = Paragraph::new(Span::styled(
                "Select a station first",
                Style::default().fg(self.theme.muted),
            ))
            .block(block);
            frame.render_widget(placeholder, area);
            return;
        };

        let lines: Vec<Line> = station
            .lines
            .iter()
            .enumerate()
            .map(|(idx, code)| {
                let active = idx == self.selection.line_index();
                let marker = if active {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let name = self.data.dataset.line_name(code);
                let tag_style = match self
                    .data
                    .dataset
                    .lines
                    .get(code)
                    .and_then(|line| parse_hex_color(&line.color))
                {
                    Some(color) => Style::default().bg(color).fg(contrast_color(color)),
                    None => Style::default().fg(self.theme.primary_fg),
                };
                let mut spans = vec![marker, Span::styled(format!(" {name} "), tag_style)];
                spans.push(Span::raw(" Line"));
                if active {
                    spans.push(Span::styled(
                        "  (active)",
                        Style::default().fg(self.theme.muted),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_directions(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == Focus::Directions;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(self.theme.accent)
            } else {
                Style::default()
            })
            .title("Direction");

        let Some(station) = self.selection.station() else {
            let placeholder = Paragraph::new(Span::styled(
                "Select a station first",
                Style::default().fg(self.theme.muted),
            ))
            .block(block);
            frame.render_widget(placeholder, area);
            return;
        };

        let lines: Vec<Line> = station
            .directions
            .iter()
            .enumerate()
            .map(|(idx, direction)| {
                let active = idx == self.selection.direction_index();
                let marker = if active {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let style = if active {
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                Line::from(vec![marker, Span::styled(direction.label.clone(), style)])
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_station_info(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Station Info");
        let Some(station) = self.selection.station() else {
            let paragraph = Paragraph::new(Span::styled(
                "No station selected",
                Style::default().fg(self.theme.muted),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            station.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if !station.subtitle.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                station.subtitle.clone(),
                Style::default().fg(self.theme.muted),
            )));
        }
        if !station.alt.trim().is_empty() {
            lines.push(Line::from(format!("Also known as: {}", station.alt)));
        }
        if !station.platform_type.trim().is_empty() {
            lines.push(Line::from(format!("Platform: {}", station.platform_type)));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = [
            "Type to search, Enter selects",
            "Tab focus line/direction",
            "←/→ change the active pick",
            "Ctrl+Y copy summary",
            "Ctrl+R reload, Ctrl+C quit",
        ];
        let lines: Vec<Line> = help
            .iter()
            .map(|entry| Line::from(Span::styled(*entry, Style::default().fg(self.theme.muted))))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Keys"));
        frame.render_widget(paragraph, area);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Doors");

        let Some(view) = ResultsView::build(&self.selection, &self.data.dataset) else {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Select a station to see which doors",
                    Style::default().fg(self.theme.muted),
                )),
                Line::from(Span::styled(
                    "line up with escalators, stairs, and elevators.",
                    Style::default().fg(self.theme.muted),
                )),
            ])
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        };

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                view.title,
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                view.subtitle,
                Style::default().fg(self.theme.muted),
            )),
            Line::from(""),
        ];

        for group in &view.groups {
            lines.push(Line::from(Span::styled(
                group.label,
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            if group.entries.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  No entries.",
                    Style::default().fg(self.theme.muted),
                )));
            } else {
                for entry in &group.entries {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", entry.title),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(format!("    {}", entry.doors)));
                    lines.push(Line::from(Span::styled(
                        format!("    {}", entry.detail),
                        Style::default().fg(self.theme.muted),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        let visible = area.height.saturating_sub(2);
        let max_scroll = (lines.len() as u16).saturating_sub(visible);
        if self.state.results_scroll > max_scroll {
            self.state.results_scroll = max_scroll;
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.state.results_scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let meta = &self.data.dataset.meta;
        let stats = format!(
            "{} stations · {} doors over {} cars",
            self.data.dataset.stations.len(),
            meta.door_count,
            meta.car_count
        );
        let line = Line::from(vec![
            Span::raw(self.state.status.clone()),
            Span::styled(
                format!("  •  {stats}"),
                Style::default().fg(self.theme.muted),
            ),
        ]);
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(paragraph, area);
    }
}

/// Copy the payload to the system clipboard. A missing or failing clipboard
/// is invisible to the user.
fn write_clipboard(payload: String) {
    match Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(err) = clipboard.set_text(payload) {
                debug!(?err, "Clipboard write failed");
            }
        }
        Err(err) => debug!(?err, "Clipboard unavailable"),
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn contrast_color(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
            if luminance > 186.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => Color::White,
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
