use crate::layout::{LayoutParams, ViewportKind, compute_transforms};
use crate::stage::{CardFactory, NavigationObserver, TransformApplier};
use crate::window::{PageSize, PageWindow, page_count, page_of, select_window, wrap_index};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

pub const DEFAULT_EASE: Duration = Duration::from_millis(250);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Every item materialized, no windowing and no ring.
    Grid,
    #[default]
    Carousel,
}

impl LayoutMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::Carousel,
            Self::Carousel => Self::Grid,
        }
    }
}

/// One dot per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageIndicator {
    pub total_pages: usize,
    pub active_page: usize,
}

impl PageIndicator {
    pub fn dots(self) -> impl Iterator<Item = bool> {
        (0..self.total_pages).map(move |page| page == self.active_page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Nothing to navigate (empty list or grid mode).
    Ignored,
    /// Cursor moved inside the materialized page.
    Moved { from: usize, to: usize },
    /// Cursor crossed into another page and the slice was rebuilt.
    PageChanged { from_page: usize, to_page: usize },
    /// The slice was rebuilt from scratch (new list or mode).
    Rebuilt,
}

impl Navigation {
    pub fn rebuilt(&self) -> bool {
        matches!(self, Self::PageChanged { .. } | Self::Rebuilt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavReport {
    pub mode: LayoutMode,
    pub cursor: usize,
    pub window: PageWindow,
    pub indicator: Option<PageIndicator>,
    pub rebuilt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSettings {
    pub page_size: PageSize,
    pub params: LayoutParams,
    pub viewport: ViewportKind,
    pub breakpoint: u32,
    pub ease: Duration,
    pub mode: LayoutMode,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            params: LayoutParams::default(),
            viewport: ViewportKind::Full,
            breakpoint: crate::layout::DEFAULT_BREAKPOINT,
            ease: DEFAULT_EASE,
            mode: LayoutMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Immediate,
    Eased,
}

struct Materialized<H> {
    index: usize,
    handle: H,
}

/// Crossing a page boundary rebuilds the slice and snaps it into place.
/// Moves inside the page only ease the existing cards.
pub struct Carousel<T, S: CardFactory<T>> {
    cursor: usize,
    settings: CarouselSettings,
    stage: S,
    slice: Vec<Materialized<S::Handle>>,
    materialized_page: Option<usize>,
    indicator: Option<PageIndicator>,
    observer: Option<Box<dyn NavigationObserver>>,
    _item: PhantomData<fn(&T)>,
}

impl<T, S> Carousel<T, S>
where
    S: CardFactory<T> + TransformApplier<<S as CardFactory<T>>::Handle>,
{
    pub fn new(stage: S, settings: CarouselSettings) -> Self {
        Self {
            cursor: 0,
            settings,
            stage,
            slice: Vec::new(),
            materialized_page: None,
            indicator: None,
            observer: None,
            _item: PhantomData,
        }
    }

    pub fn with_observer(mut self, observer: impl NavigationObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page(&self) -> usize {
        page_of(self.cursor, self.settings.page_size)
    }

    pub fn mode(&self) -> LayoutMode {
        self.settings.mode
    }

    pub fn viewport(&self) -> ViewportKind {
        self.settings.viewport
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    /// Dots as of the last navigation. `None` while nothing is paged.
    pub fn indicator(&self) -> Option<PageIndicator> {
        self.indicator
    }

    pub fn window(&self, len: usize) -> PageWindow {
        select_window(len, self.cursor, self.settings.page_size)
    }

    /// Global list index and handle of every live card, in list order.
    pub fn materialized(&self) -> impl Iterator<Item = (usize, &S::Handle)> {
        self.slice.iter().map(|m| (m.index, &m.handle))
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn go_to(&mut self, items: &[T], target: isize) -> Navigation {
        if self.settings.mode == LayoutMode::Grid {
            return Navigation::Ignored;
        }
        let Some(index) = wrap_index(target, items.len()) else {
            return Navigation::Ignored;
        };

        let page_size = self.settings.page_size;
        let (from, from_page) = (self.cursor, self.page());
        let to_page = page_of(index, page_size);
        self.cursor = index;

        let outcome = if from_page != to_page || self.materialized_page != Some(to_page) {
            self.rebuild(items);
            self.reposition(Motion::Immediate);
            Navigation::PageChanged { from_page, to_page }
        } else {
            debug!("carousel: cursor {} -> {}", from, index);
            self.reposition(Motion::Eased);
            Navigation::Moved { from, to: index }
        };

        self.refresh_indicator(items.len());
        self.notify(items.len(), outcome.rebuilt());
        outcome
    }

    pub fn advance(&mut self, items: &[T]) -> Navigation {
        self.go_to(items, self.cursor as isize + 1)
    }

    pub fn retreat(&mut self, items: &[T]) -> Navigation {
        self.go_to(items, self.cursor as isize - 1)
    }

    /// Centers the first card of `page`. Out of range pages wrap through the
    /// resulting item index.
    pub fn jump_to_page(&mut self, items: &[T], page: usize) -> Navigation {
        let len = items.len().max(1);
        let size = self.settings.page_size.get();
        let index = (page % len) as u128 * (size % len) as u128 % len as u128;
        // index < len, and slice lengths never exceed isize::MAX
        self.go_to(items, index as isize)
    }

    /// The active list changed identity: reset to the first card and rebuild.
    pub fn on_category_changed(&mut self, items: &[T]) -> Navigation {
        self.cursor = 0;

        match self.settings.mode {
            LayoutMode::Grid => self.materialize_all(items),
            LayoutMode::Carousel => {
                self.rebuild(items);
                self.reposition(Motion::Immediate);
                self.refresh_indicator(items.len());
            }
        }

        self.notify(items.len(), true);
        Navigation::Rebuilt
    }

    /// Switching modes always starts over at the first card.
    pub fn set_mode(&mut self, items: &[T], mode: LayoutMode) -> Navigation {
        info!("carousel: layout {} -> {}", self.settings.mode, mode);
        self.settings.mode = mode;
        self.on_category_changed(items)
    }

    /// Replaces the settings, then rebuilds against `items`.
    pub fn reconfigure(&mut self, items: &[T], settings: CarouselSettings) -> Navigation {
        self.settings = settings;
        self.on_category_changed(items)
    }

    /// Picks the ring constants for the new width. Nothing is re-solved until
    /// the next navigation or [`Carousel::relayout`]. Returns whether the
    /// viewport kind changed.
    pub fn on_viewport_resize(&mut self, width: u32) -> bool {
        let kind = ViewportKind::from_width(width, self.settings.breakpoint);
        let changed = kind != self.settings.viewport;
        self.settings.viewport = kind;
        changed
    }

    /// Snaps the current slice to freshly solved transforms.
    pub fn relayout(&mut self) {
        if self.settings.mode == LayoutMode::Carousel {
            self.reposition(Motion::Immediate);
        }
    }

    /// Destroys every live card.
    pub fn teardown(&mut self) {
        for card in self.slice.drain(..) {
            self.stage.destroy(card.handle);
        }
        self.materialized_page = None;
        self.indicator = None;
    }

    fn rebuild(&mut self, items: &[T]) {
        self.teardown();

        if items.is_empty() {
            self.stage.show_placeholder();
            return;
        }

        let window = self.window(items.len());
        for index in window.range() {
            let handle = self.stage.materialize(&items[index], index);
            self.slice.push(Materialized { index, handle });
        }
        self.materialized_page = Some(self.page());
        info!(
            "carousel: materialized page {} [{}..{}) of {} cards",
            self.page(),
            window.start,
            window.end,
            items.len()
        );
    }

    fn materialize_all(&mut self, items: &[T]) {
        self.teardown();

        if items.is_empty() {
            self.stage.show_placeholder();
            return;
        }

        for (index, item) in items.iter().enumerate() {
            let handle = self.stage.materialize(item, index);
            self.slice.push(Materialized { index, handle });
        }
        info!("carousel: grid materialized {} cards", items.len());
    }

    fn reposition(&mut self, motion: Motion) {
        let Some(start) = self.slice.first().map(|m| m.index) else {
            return;
        };
        let local_offset = self.cursor.saturating_sub(start);
        let transforms = compute_transforms(
            self.slice.len(),
            local_offset,
            self.settings.viewport,
            &self.settings.params,
        );

        for (card, transform) in self.slice.iter().zip(&transforms) {
            match motion {
                Motion::Immediate => self.stage.apply_immediate(&card.handle, transform),
                Motion::Eased => self
                    .stage
                    .apply_eased(&card.handle, transform, self.settings.ease),
            }
        }
    }

    fn refresh_indicator(&mut self, len: usize) {
        self.indicator = (len > 0).then(|| PageIndicator {
            total_pages: page_count(len, self.settings.page_size),
            active_page: self.page(),
        });
    }

    fn notify(&mut self, len: usize, rebuilt: bool) {
        let report = NavReport {
            mode: self.settings.mode,
            cursor: self.cursor,
            window: match self.settings.mode {
                LayoutMode::Carousel => self.window(len),
                LayoutMode::Grid => PageWindow { start: 0, end: len },
            },
            indicator: self.indicator,
            rebuilt,
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.navigated(&report);
        }
    }
}
