use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use marquee_core::{
    filter, CatalogEntry, ElementHandle, HandleAllocator, LazyLoadCoordinator, Rect as Bounds,
    ViewportObserver,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::time::Duration;

use crate::poster::{self, PosterInfo};
use crate::theme::GridTheme;

/// Screen size used when running without a terminal.
pub const HEADLESS_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>>;
}
pub struct RealEventSource;
impl EventSource for RealEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if crossterm::event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, Clone)]
pub struct GridOptions {
    pub title: String,
    pub asset_root: String,
    pub columns: u16,
    pub tile_height: u16,
    pub theme: GridTheme,
}

/// A rendered tile. `index` is fixed when the element is created and is
/// what the coordinator sees; the tile's slot in the grid is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileElement {
    handle: ElementHandle,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct Areas {
    header: Rect,
    search: Option<Rect>,
    grid: Rect,
    footer: Rect,
}

pub struct GridSession {
    coordinator: LazyLoadCoordinator<ViewportObserver>,
    opts: GridOptions,
    handles: HandleAllocator,
    // rendered elements by catalog index
    tiles: BTreeMap<usize, TileElement>,
    posters: HashMap<usize, PosterInfo>,
    query: String,
    search_open: bool,
    scroll: u32,
    viewport_rows: u32,
    content_rows: u32,
}

impl GridSession {
    /// `entries` is `None` when the manifest could not be loaded; the grid
    /// then runs with an empty catalog.
    pub fn new(entries: Option<Vec<CatalogEntry>>, opts: GridOptions) -> Result<Self> {
        let mut coordinator = LazyLoadCoordinator::new(ViewportObserver::new());
        if let Some(entries) = entries {
            coordinator.initialize_catalog(entries)?;
        }
        let mut session = Self {
            coordinator,
            opts,
            handles: HandleAllocator::new(),
            tiles: BTreeMap::new(),
            posters: HashMap::new(),
            query: String::new(),
            search_open: false,
            scroll: 0,
            viewport_rows: 0,
            content_rows: 0,
        };
        session.reconcile()?;
        Ok(session)
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll > 0
    }

    /// Catalog indices currently rendered, in grid order.
    pub fn rendered_indices(&self) -> Vec<usize> {
        filter::apply(&self.query, self.coordinator.store().snapshot())
            .into_iter()
            .map(|(i, _)| i)
            .collect()
    }

    pub fn set_query(&mut self, query: &str) -> Result<()> {
        if self.query != query {
            self.query = query.to_string();
            self.scroll = 0;
            self.reconcile()?;
        }
        Ok(())
    }

    /// Bring rendered elements in line with the filtered view: tiles that
    /// left the view are withdrawn, newcomers get a fresh element.
    fn reconcile(&mut self) -> Result<()> {
        let wanted = self.rendered_indices();
        let keep: HashSet<usize> = wanted.iter().copied().collect();
        let gone: Vec<usize> = self
            .tiles
            .keys()
            .filter(|i| !keep.contains(i))
            .copied()
            .collect();
        for i in gone {
            if let Some(el) = self.tiles.remove(&i) {
                self.coordinator.withdraw(el.handle);
            }
        }
        for index in wanted {
            if self.tiles.contains_key(&index) {
                continue;
            }
            let el = TileElement {
                handle: self.handles.next_handle(),
                index,
            };
            self.coordinator.register(el.index, el.handle)?;
            self.tiles.insert(index, el);
        }
        Ok(())
    }

    fn tile_width(&self, width: u32) -> u32 {
        (width / self.opts.columns.max(1) as u32).max(1)
    }

    /// Content-space bounds for every rendered tile, in grid order.
    fn layout(&self, width: u32) -> Vec<(TileElement, Bounds)> {
        let cols = self.opts.columns.max(1) as usize;
        let tile_w = self.tile_width(width);
        let tile_h = self.opts.tile_height as u32;
        self.rendered_indices()
            .into_iter()
            .enumerate()
            .filter_map(|(slot, index)| {
                let el = self.tiles.get(&index)?;
                let row = (slot / cols) as u32;
                let col = (slot % cols) as u32;
                Some((*el, Bounds::new(col * tile_w, row * tile_h, tile_w, tile_h)))
            })
            .collect()
    }

    fn max_scroll(&self) -> u32 {
        self.content_rows.saturating_sub(self.viewport_rows)
    }

    fn scroll_by(&mut self, delta: i64) {
        let next = (self.scroll as i64 + delta).clamp(0, self.max_scroll() as i64);
        self.scroll = next as u32;
    }

    /// Push geometry into the observer and apply whatever became visible.
    /// `grid` is the inner grid area in screen cells. Returns the indices
    /// that were loaded by this pass.
    fn sync(&mut self, grid: Rect) -> Result<Vec<usize>> {
        let width = grid.width as u32;
        let placed = self.layout(width);
        let cols = self.opts.columns.max(1) as u32;
        self.content_rows = (placed.len() as u32).div_ceil(cols) * self.opts.tile_height as u32;
        self.viewport_rows = grid.height as u32;
        self.scroll = self.scroll.min(self.max_scroll());

        let observer = self.coordinator.observer_mut();
        observer.set_viewport(Bounds::new(0, self.scroll, width, grid.height as u32));
        for (el, b) in &placed {
            observer.set_bounds(el.handle, *b);
        }
        let hits = observer.take_intersections();
        let loaded = self.coordinator.on_intersect_batch(hits)?;

        for &index in &loaded {
            let resource = self
                .coordinator
                .store()
                .get(index)
                .and_then(|item| item.resource(&self.opts.asset_root));
            if let Some(resource) = resource {
                let info = poster::probe(&resource, &self.opts.asset_root);
                self.posters.insert(index, info);
            }
        }
        Ok(loaded)
    }

    /// Lay out for a screen of `area` and process visibility without
    /// drawing.
    pub fn tick(&mut self, area: Rect) -> Result<Vec<usize>> {
        let grid = Self::grid_block().inner(self.areas(area).grid);
        self.sync(grid)
    }

    fn areas(&self, area: Rect) -> Areas {
        if self.search_open {
            let c = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // header
                    Constraint::Length(3), // search input
                    Constraint::Min(3),    // grid
                    Constraint::Length(1), // shortcuts
                ])
                .split(area);
            Areas {
                header: c[0],
                search: Some(c[1]),
                grid: c[2],
                footer: c[3],
            }
        } else {
            let c = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ])
                .split(area);
            Areas {
                header: c[0],
                search: None,
                grid: c[1],
                footer: c[2],
            }
        }
    }

    fn grid_block() -> Block<'static> {
        Block::default().borders(Borders::ALL)
    }

    pub fn render(&mut self, f: &mut Frame) -> Result<()> {
        let areas = self.areas(f.area());
        let inner = Self::grid_block().inner(areas.grid);
        self.sync(inner)?;
        let thm = self.opts.theme;

        // header changes look once the grid is scrolled
        let header_block = if self.is_scrolled() {
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(
                    Style::default()
                        .fg(thm.header_scrolled_fg)
                        .add_modifier(Modifier::BOLD),
                )
        } else {
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(thm.header_fg))
        };
        let header = Paragraph::new(Line::from(self.opts.title.as_str()))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(header_block);
        f.render_widget(header, areas.header);

        if let Some(search_area) = areas.search {
            let input = Paragraph::new(self.query.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Search")
                    .border_style(Style::default().fg(thm.border_fg)),
            );
            f.render_widget(input, search_area);
        }

        let store = self.coordinator.store();
        let placed = self.layout(inner.width as u32);
        let title = format!(
            "{} of {} • {} loaded",
            placed.len(),
            store.len(),
            store.loaded_count()
        );
        f.render_widget(
            Self::grid_block()
                .title(title)
                .border_style(Style::default().fg(thm.border_fg)),
            areas.grid,
        );

        let viewport = Bounds::new(0, self.scroll, inner.width as u32, inner.height as u32);
        for (el, b) in &placed {
            let Some(vis) = b.intersection(&viewport) else { continue };
            let Some(item) = store.get(el.index) else { continue };
            let cell = Rect::new(
                inner.x + vis.x as u16,
                inner.y + (vis.y - self.scroll) as u16,
                vis.width as u16,
                vis.height as u16,
            );
            // unloaded tiles carry no resource reference at all
            let body = match (self.posters.get(&el.index), item.resource(&self.opts.asset_root)) {
                (Some(info), _) => info.describe(),
                (None, Some(resource)) => resource,
                (None, None) => String::new(),
            };
            let tile = Paragraph::new(body)
                .style(Style::default().fg(thm.loaded_fg))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(item.name.as_str())
                        .border_style(Style::default().fg(thm.border_fg)),
                );
            f.render_widget(tile, cell);
        }

        let help = if self.search_open {
            "type to filter | Esc close search | ↑/↓ PgUp/PgDn scroll"
        } else {
            "/ search | ↑/↓ PgUp/PgDn Home/End scroll | q quit"
        };
        f.render_widget(
            Paragraph::new(help).style(Style::default().fg(thm.help_fg)),
            areas.footer,
        );
        Ok(())
    }

    pub fn handle_key(&mut self, k: KeyEvent) -> Result<Flow> {
        if k.kind != KeyEventKind::Press {
            return Ok(Flow::Continue);
        }
        let page = self.viewport_rows.max(1) as i64;
        match k.code {
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Flow::Quit)
            }
            // hiding the input keeps the current term applied
            KeyCode::Esc => {
                if self.search_open {
                    self.search_open = false;
                } else {
                    return Ok(Flow::Quit);
                }
            }
            // once open, '/' is ordinary query text
            KeyCode::Char('/') if !self.search_open => self.search_open = true,
            KeyCode::Char(ch) if self.search_open => {
                let mut q = self.query.clone();
                q.push(ch);
                self.set_query(&q)?;
            }
            KeyCode::Backspace if self.search_open => {
                let mut q = self.query.clone();
                if q.pop().is_some() {
                    self.set_query(&q)?;
                }
            }
            KeyCode::Char('q') => return Ok(Flow::Quit),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown => self.scroll_by(page),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    pub fn teardown(&mut self) {
        self.tiles.clear();
        self.coordinator.teardown();
    }
}

#[cfg(test)]
impl GridSession {
    fn coordinator(&self) -> &LazyLoadCoordinator<ViewportObserver> {
        &self.coordinator
    }

    fn scroll(&self) -> u32 {
        self.scroll
    }

    fn query(&self) -> &str {
        &self.query
    }

    fn search_open(&self) -> bool {
        self.search_open
    }

    fn poster(&self, index: usize) -> Option<&PosterInfo> {
        self.posters.get(&index)
    }

    fn tile_handle(&self, index: usize) -> Option<ElementHandle> {
        self.tiles.get(&index).map(|t| t.handle)
    }

    fn state(&self, index: usize) -> Option<marquee_core::TileState> {
        self.coordinator.state(index)
    }
}

pub fn run_grid_default(session: &mut GridSession, alt_screen: bool) -> Result<()> {
    let mut es = RealEventSource;
    run_grid_with(session, &mut es, true, alt_screen)
}

pub fn run_grid_with(
    session: &mut GridSession,
    es: &mut dyn EventSource,
    draw: bool,
    alt_screen: bool,
) -> Result<()> {
    let mut terminal = if draw {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if alt_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        }
        let backend = CrosstermBackend::new(stdout);
        Some(Terminal::new(backend)?)
    } else {
        None
    };

    let outcome = drive(session, es, &mut terminal);

    if draw {
        disable_raw_mode()?;
        if alt_screen {
            crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        }
    }
    session.teardown();
    outcome
}

fn drive(
    session: &mut GridSession,
    es: &mut dyn EventSource,
    terminal: &mut Option<Terminal<CrosstermBackend<io::Stdout>>>,
) -> Result<()> {
    loop {
        if let Some(term) = terminal.as_mut() {
            let mut drawn = Ok(());
            term.draw(|f| drawn = session.render(f))?;
            drawn?;
        } else {
            session.tick(HEADLESS_AREA)?;
        }

        if let Some(Event::Key(k)) = es.poll(Duration::from_millis(100))? {
            if session.handle_key(k)? == Flow::Quit {
                return Ok(());
            }
        }
    }
}
