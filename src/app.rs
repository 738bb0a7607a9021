use crate::config::{self, Config};
use crate::deck::{CardSummary, Deck};
use crate::events::{AppEvent, Command, LayoutRequest};
use crate::store::{self, CategorySelector, Shortcut, Store};
use async_channel::Receiver;
use orbit::{
    Carousel, Key, LayoutMode, NavReport, NavigationObserver, Navigation, Step, SwipeTracker,
    ViewportKind, WheelAccumulator, key_step,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// What `status` reports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub category: Option<String>,
    pub nav: Option<NavReport>,
    pub cards: Vec<CardSummary>,
}

pub type SharedSnapshot = Arc<RwLock<Snapshot>>;

struct StatusPublisher(SharedSnapshot);

impl NavigationObserver for StatusPublisher {
    fn navigated(&mut self, report: &NavReport) {
        log::debug!(
            "nav: cursor={} window={}..{} rebuilt={}",
            report.cursor,
            report.window.start,
            report.window.end,
            report.rebuilt
        );
        self.0.write().nav = Some(*report);
    }
}

pub struct App {
    config: Config,
    store: Store,
    category: usize,
    viewport_width: u32,
    carousel: Carousel<Shortcut, Deck>,
    wheel: WheelAccumulator,
    swipe: SwipeTracker,
    snapshot: SharedSnapshot,
}

impl App {
    pub fn new(config: Config, store: Store, snapshot: SharedSnapshot) -> Self {
        let category = store.resolve(0, &config.start_category).unwrap_or(0);
        let carousel = Carousel::new(Deck::new(), config.carousel_settings())
            .with_observer(StatusPublisher(snapshot.clone()));

        let mut app = Self {
            viewport_width: config.viewport_width,
            wheel: WheelAccumulator::new(config.input),
            swipe: SwipeTracker::new(&config.input),
            config,
            store,
            category,
            carousel,
            snapshot,
        };
        let items = app.active_list();
        app.carousel.on_category_changed(&items);
        app.publish();
        app
    }

    pub fn cursor(&self) -> usize {
        self.carousel.cursor()
    }

    pub fn category(&self) -> usize {
        self.category
    }

    pub fn mode(&self) -> LayoutMode {
        self.carousel.mode()
    }

    pub fn deck(&self) -> &Deck {
        self.carousel.stage()
    }

    fn active_list(&self) -> Vec<Shortcut> {
        self.store.active_list(self.category)
    }

    /// Blocks on `rx`, printing a frame after every event that changed the deck.
    pub fn run(mut self, rx: Receiver<AppEvent>) {
        println!("{}", self.frame());
        while let Ok(event) = rx.recv_blocking() {
            if self.update(event) {
                println!("{}", self.frame());
            }
        }
        self.carousel.teardown();
    }

    pub fn frame(&self) -> String {
        let title = self
            .store
            .category(self.category)
            .map(|c| format!("{} {}", c.icon, c.name))
            .unwrap_or_default();
        format!(
            "[{}] {}\n{}",
            self.carousel.mode(),
            title,
            self.deck().render(self.carousel.indicator())
        )
    }

    /// Returns whether anything visible changed.
    pub fn update(&mut self, event: AppEvent) -> bool {
        // previous eased moves have landed by the time the next event arrives
        self.carousel.stage_mut().settle();

        let changed = match event {
            AppEvent::Command(command) => self.handle(command, Instant::now()),
            AppEvent::ConfigReload => self.reload_config(),
            AppEvent::StoreReload => self.reload_store(),
        };
        if changed {
            self.publish();
        }
        changed
    }

    pub fn handle(&mut self, command: Command, now: Instant) -> bool {
        let items = self.active_list();

        let nav = match command {
            Command::Next => self.carousel.advance(&items),
            Command::Prev => self.carousel.retreat(&items),
            Command::GoTo(index) => self.carousel.go_to(&items, index),
            Command::Page(page) => self.carousel.jump_to_page(&items, page),
            Command::Category(selector) => return self.select_category(&selector),
            Command::Layout(request) => {
                let mode = match request {
                    LayoutRequest::Set(mode) => mode,
                    LayoutRequest::Toggle => self.carousel.mode().toggled(),
                };
                log::info!("Layout: {}", mode);
                self.carousel.set_mode(&items, mode)
            }
            Command::Resize(width) => return self.resize(width),
            Command::Wheel(delta) => match self.wheel.push(delta, now) {
                Some(step) => self.step(step, &items),
                None => Navigation::Ignored,
            },
            Command::Swipe { from, to } => {
                self.swipe.begin(from);
                let axis = match self.carousel.mode() {
                    LayoutMode::Carousel => self.carousel.viewport(),
                    LayoutMode::Grid => ViewportKind::Compact,
                };
                match self.swipe.end(to, axis) {
                    Some(step) => self.step(step, &items),
                    None => Navigation::Ignored,
                }
            }
            Command::Key(key) => return self.key(key, &items),
            Command::Status => Navigation::Ignored,
        };
        nav != Navigation::Ignored
    }

    /// Steps the carousel, or the category while the grid is shown.
    fn step(&mut self, step: Step, items: &[Shortcut]) -> Navigation {
        match self.carousel.mode() {
            LayoutMode::Carousel => {
                let target = self.cursor() as isize + step.offset();
                self.carousel.go_to(items, target)
            }
            LayoutMode::Grid => {
                let selector = match step {
                    Step::Forward => CategorySelector::Next,
                    Step::Back => CategorySelector::Prev,
                };
                if self.select_category(&selector) {
                    Navigation::Rebuilt
                } else {
                    Navigation::Ignored
                }
            }
        }
    }

    fn key(&mut self, key: Key, items: &[Shortcut]) -> bool {
        let carousel_active = self.carousel.mode() == LayoutMode::Carousel && !items.is_empty();

        let selector = match (key, self.carousel.mode()) {
            (Key::ArrowLeft | Key::ArrowRight, LayoutMode::Carousel) => {
                return carousel_active
                    && key_step(key)
                        .is_some_and(|step| self.step(step, items) != Navigation::Ignored);
            }
            (Key::ArrowUp, _) | (Key::ArrowLeft, LayoutMode::Grid) => CategorySelector::Prev,
            (Key::ArrowDown, _) | (Key::ArrowRight, LayoutMode::Grid) => CategorySelector::Next,
            (Key::Escape, _) => return false,
        };
        self.select_category(&selector)
    }

    fn select_category(&mut self, selector: &CategorySelector) -> bool {
        let Some(index) = self.store.resolve(self.category, selector) else {
            log::warn!("No category matches '{}'", selector);
            return false;
        };
        if index == self.category {
            return false;
        }
        self.category = index;
        let items = self.active_list();
        log::info!("Category {} ({} shortcuts)", index, items.len());
        self.carousel.on_category_changed(&items);
        true
    }

    fn resize(&mut self, width: u32) -> bool {
        self.viewport_width = width;
        let changed = self.carousel.on_viewport_resize(width);
        if changed {
            self.carousel.relayout();
        }
        changed
    }

    fn reload_config(&mut self) -> bool {
        match config::load_config() {
            Ok(new_config) => {
                self.wheel = WheelAccumulator::new(new_config.input);
                self.swipe = SwipeTracker::new(&new_config.input);
                let mut settings = new_config.carousel_settings();
                settings.mode = self.carousel.mode();
                settings.viewport =
                    ViewportKind::from_width(self.viewport_width, new_config.breakpoint);
                self.config = new_config;

                let items = self.active_list();
                self.carousel.reconfigure(&items, settings);
                log::info!("Configuration reloaded");
                true
            }
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                false
            }
        }
    }

    fn reload_store(&mut self) -> bool {
        let loaded = store::get_store_path().and_then(|path| Store::load(&path));
        match loaded {
            Ok(new_store) => {
                self.replace_store(new_store);
                log::info!("Shortcuts reloaded");
                true
            }
            Err(e) => {
                log::error!("Failed to reload shortcuts: {}", e);
                false
            }
        }
    }

    pub fn replace_store(&mut self, store: Store) {
        self.store = store;
        if self.store.category(self.category).is_none() {
            self.category = 0;
        }
        let items = self.active_list();
        self.carousel.on_category_changed(&items);
        self.publish();
    }

    fn publish(&self) {
        let mut snapshot = self.snapshot.write();
        snapshot.category = self.store.category(self.category).map(|c| c.name.to_string());
        snapshot.cards = self.deck().summaries();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
