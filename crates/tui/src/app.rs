use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use explorer_core::{
    catalog::{self, query, GeneratorOptions},
    favorites::{FavoritesSet, FavoritesStore},
    models::{format_price, GameRecord, RatingTier},
    storage::KeyValueStore,
    Catalog,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    favorite: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            favorite: Color::LightRed,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

impl Theme {
    fn rating_color(&self, tier: RatingTier) -> Color {
        match tier {
            RatingTier::High => self.success,
            RatingTier::Mid => self.warning,
            RatingTier::Low => Color::LightRed,
        }
    }

    fn genre_color(&self, genre: &str) -> Color {
        match genre {
            "Adventure" => Color::Green,
            "Action" => Color::Red,
            "RPG" => Color::Magenta,
            "Action RPG" => Color::Blue,
            "Superhero" => Color::LightBlue,
            "Metroidvania" => Color::Rgb(255, 165, 0),
            _ => self.muted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

enum AppEvent {
    Input(Event),
    Tick,
    CatalogLoaded(Catalog),
}

/// Terminal front end: game list, details pane and favorites toggling.
pub struct ExplorerApp<S> {
    favorites: FavoritesStore<S>,
    options: GeneratorOptions,
    state: UiState,
    theme: Theme,
    loading: bool,
    event_tx: Option<mpsc::Sender<AppEvent>>,
}

impl<S: KeyValueStore> ExplorerApp<S> {
    pub fn new(favorites: FavoritesStore<S>, options: GeneratorOptions) -> Self {
        Self {
            favorites,
            options,
            state: UiState::default(),
            theme: Theme::default(),
            loading: false,
            event_tx: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);
        self.start_catalog_load();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn start_catalog_load(&mut self) {
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        self.loading = true;
        self.state.set_status("Loading games...".to_string());
        let options = self.options.clone();
        spawn(async move {
            let catalog = catalog::fetch_catalog(options).await;
            if sender.send(AppEvent::CatalogLoaded(catalog)).await.is_err() {
                error!("Catalog loaded after the UI shut down");
            }
        });
    }

    fn handle_catalog_loaded(&mut self, catalog: Catalog) {
        self.loading = false;
        info!(total = catalog.len(), seed = ?catalog.seed, "Catalog loaded");
        self.state.set_games(catalog.into_records());
        self.state.apply_filter(self.favorites.current());
        self.state.set_status(format!(
            "Loaded {} games • {} favorites",
            self.state.all_games.len(),
            self.favorites.current().len()
        ));
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::CatalogLoaded(catalog)) => {
                self.handle_catalog_loaded(catalog);
                true
            }
            None => false,
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) => Ok(()),
            Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state.mode {
            Mode::Filter => self.handle_filter_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.set_status("Search closed".to_string());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state.set_status(format!(
                    "Search applied: {} ({} matches)",
                    self.state.filter,
                    self.state.filtered.len()
                ));
            }
            KeyCode::Backspace => {
                self.state.filter.pop();
                self.state.apply_filter(self.favorites.current());
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.filter.push(c);
                    self.state.apply_filter(self.favorites.current());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Home => self.state.move_to(0),
            KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Filter;
                self.state.set_status("Type to search games".to_string());
            }
            KeyCode::Char('f') | KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle_current_favorite()?;
            }
            KeyCode::Char('F') => {
                self.state.favorites_only = !self.state.favorites_only;
                self.state.apply_filter(self.favorites.current());
                let message = if self.state.favorites_only {
                    "Showing favorites only"
                } else {
                    "Showing all games"
                };
                self.state.set_status(message.to_string());
            }
            KeyCode::Char('*') => {
                self.state.featured_only = !self.state.featured_only;
                self.state.apply_filter(self.favorites.current());
                let message = if self.state.featured_only {
                    "Showing featured games"
                } else {
                    "Featured filter off"
                };
                self.state.set_status(message.to_string());
            }
            KeyCode::Char('g') if key.modifiers.is_empty() => {
                self.state.cycle_genre();
                self.state.apply_filter(self.favorites.current());
                let message = match &self.state.genre {
                    Some(genre) => format!("Genre: {genre}"),
                    None => "Genre: all".to_string(),
                };
                self.state.set_status(message);
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !self.loading {
                    self.start_catalog_load();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_current_favorite(&mut self) -> Result<()> {
        let Some(game) = self.state.current_game() else {
            return Ok(());
        };
        let (id, title) = (game.id, game.title.clone());
        let result = self.favorites.toggle(id);
        self.state.apply_filter_keep_cursor(self.favorites.current());
        let now_favorite = result.with_context(|| format!("failed to save favorite {title}"))?;
        let verb = if now_favorite { "Added" } else { "Removed" };
        self.state.set_status(format!(
            "{verb} {title} {} favorites at {}",
            if now_favorite { "to" } else { "from" },
            Local::now().format("%H:%M:%S")
        ));
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        self.render_search(frame, chunks[0]);
        self.render_game_list(frame, body_chunks[0]);
        self.render_game_info(frame, body_chunks[1]);
        self.render_status(frame, chunks[2]);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let style = if self.state.mode == Mode::Filter {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        let text = if self.state.filter.is_empty() && self.state.mode == Mode::Browse {
            "Search games... (press /)".to_string()
        } else {
            self.state.filter.clone()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
            .block(Block::default().borders(Borders::ALL).title("Game Explorer"));
        frame.render_widget(paragraph, area);
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(2) as usize;
        self.state.clamp_cursor();
        self.state.ensure_cursor_visible();

        let block = Block::default().borders(Borders::ALL).title(self.list_title());
        if self.state.filtered.is_empty() {
            let message = if self.loading {
                "Loading games..."
            } else {
                "No games found."
            };
            let paragraph = Paragraph::new(Span::styled(
                message,
                Style::default().fg(self.theme.muted),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let mut list_state = ListState::default();
        let height = self.state.list_height;
        let games = self.state.visible_games(height);
        let selected = self
            .state
            .cursor
            .saturating_sub(self.state.offset)
            .min(games.len().saturating_sub(1));
        list_state.select(Some(selected));

        let favorites = self.favorites.current();
        let items: Vec<ListItem> = games
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let is_selected = self.state.cursor == self.state.offset + idx;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let heart = if favorites.contains(game.id) {
                    Span::styled("♥ ", Style::default().fg(self.theme.favorite))
                } else {
                    Span::styled("♡ ", Style::default().fg(self.theme.muted))
                };
                let mut line = vec![
                    marker,
                    heart,
                    Span::styled(
                        game.title.clone(),
                        Style::default()
                            .fg(self.theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" ★{}", game.rating),
                        Style::default().fg(self.theme.rating_color(game.rating_tier())),
                    ),
                ];
                if game.is_on_sale {
                    line.push(Span::styled(
                        format!(" -{}%", game.discount_percentage),
                        Style::default()
                            .fg(self.theme.danger)
                            .add_modifier(Modifier::BOLD),
                    ));
                }
                ListItem::new(Line::from(line))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn list_title(&self) -> String {
        let mut title = format!("Games ({})", self.state.filtered.len());
        if let Some(genre) = &self.state.genre {
            title.push_str(&format!(" · {genre}"));
        }
        if self.state.featured_only {
            title.push_str(" · featured");
        }
        if self.state.favorites_only {
            title.push_str(" · favorites");
        }
        title
    }

    fn render_game_info(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Game Details");
        let Some(game) = self.state.current_game() else {
            let paragraph = Paragraph::new("No game selected").block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let favorite = if self.favorites.is_favorite(game.id) {
            Span::styled("♥ Favorite", Style::default().fg(self.theme.favorite))
        } else {
            Span::styled("♡ Not a favorite", Style::default().fg(self.theme.muted))
        };
        let mut lines = vec![
            Line::from(Span::styled(
                game.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(favorite),
            Line::from(""),
            Line::from(game.description.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    game.genre.clone(),
                    Style::default().fg(self.theme.genre_color(&game.genre)),
                ),
                Span::styled(
                    format!("  by {}", game.developer),
                    Style::default().fg(self.theme.muted),
                ),
            ]),
            Line::from(Span::styled(
                format!("★ {}/10", game.rating),
                Style::default().fg(self.theme.rating_color(game.rating_tier())),
            )),
        ];

        let mut price_line = Vec::new();
        if let Some(original) = game.original_price() {
            price_line.push(Span::styled(
                format_price(original),
                Style::default()
                    .fg(self.theme.muted)
                    .add_modifier(Modifier::CROSSED_OUT),
            ));
            price_line.push(Span::raw(" "));
        }
        let price_color = if game.is_on_sale {
            self.theme.danger
        } else {
            self.theme.success
        };
        price_line.push(Span::styled(
            format_price(game.price),
            Style::default()
                .fg(price_color)
                .add_modifier(Modifier::BOLD),
        ));
        if game.is_on_sale {
            price_line.push(Span::styled(
                format!("  -{}%", game.discount_percentage),
                Style::default().fg(self.theme.danger),
            ));
        }
        lines.push(Line::from(price_line));
        lines.push(Line::from(Span::styled(
            game.platform.join(" · "),
            Style::default().fg(self.theme.muted),
        )));
        lines.push(Line::from(Span::styled(
            game.image.clone(),
            Style::default().fg(self.theme.muted),
        )));

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Filter {
            format!("Search: {}", self.state.filter)
        } else {
            self.state.status.clone()
        };
        let secondary =
            "/ search  f toggle favorite  F favorites  g genre  * featured  ^R reload  q quit"
                .to_string();
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
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

struct UiState {
    all_games: Vec<GameRecord>,
    filtered: Vec<GameRecord>,
    genres: Vec<String>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    filter: String,
    genre: Option<String>,
    featured_only: bool,
    favorites_only: bool,
    status: String,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            all_games: Vec::new(),
            filtered: Vec::new(),
            genres: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            filter: String::new(),
            genre: None,
            featured_only: false,
            favorites_only: false,
            status: "Ready".to_string(),
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_games(&mut self, games: Vec<GameRecord>) {
        self.genres = query::genres(&games);
        if let Some(genre) = &self.genre {
            if !self.genres.contains(genre) {
                self.genre = None;
            }
        }
        self.all_games = games;
    }

    fn apply_filter(&mut self, favorites: &FavoritesSet) {
        let mut games = query::search(&self.all_games, &self.filter);
        if let Some(genre) = &self.genre {
            games = query::by_genre(&games, genre);
        }
        if self.featured_only {
            games = query::featured(&games);
        }
        if self.favorites_only {
            games.retain(|game| favorites.contains(game.id));
        }
        self.filtered = games;
        self.cursor = 0;
        self.offset = 0;
    }

    fn apply_filter_keep_cursor(&mut self, favorites: &FavoritesSet) {
        let cursor = self.cursor;
        self.apply_filter(favorites);
        self.cursor = cursor;
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    fn cycle_genre(&mut self) {
        self.genre = match &self.genre {
            None => self.genres.first().cloned(),
            Some(current) => self
                .genres
                .iter()
                .position(|genre| genre == current)
                .and_then(|idx| self.genres.get(idx + 1))
                .cloned(),
        };
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len() as isize;
        let idx = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = index.min(self.filtered.len() - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = self.filtered.len() - 1;
        self.ensure_cursor_visible();
    }

    fn page_down(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.filtered.len());
        self.move_cursor(delta as isize);
    }

    fn page_up(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            return;
        }
        let delta = self.list_height.min(self.filtered.len());
        self.move_cursor(-(delta as isize));
    }

    fn visible_games(&self, height: usize) -> &[GameRecord] {
        if self.filtered.is_empty() {
            return &[];
        }
        let end = (self.offset + height).min(self.filtered.len());
        &self.filtered[self.offset..end]
    }

    fn current_game(&self) -> Option<&GameRecord> {
        self.filtered.get(self.cursor)
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }

    fn ensure_cursor_visible(&mut self) {
        if self.filtered.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.filtered.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}
