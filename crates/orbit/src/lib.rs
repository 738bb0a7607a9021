pub mod carousel;
pub mod input;
pub mod layout;
pub mod stage;
pub mod window;

pub use carousel::{
    Carousel, CarouselSettings, LayoutMode, NavReport, Navigation, PageIndicator, DEFAULT_EASE,
};
pub use input::{InputConfig, Key, Step, SwipeTracker, TouchPoint, WheelAccumulator, key_step};
pub use layout::{LayoutParams, ModeParams, Transform, ViewportKind, compute_transforms};
pub use stage::{CardFactory, NavigationObserver, TransformApplier};
pub use window::{PageSize, PageSizeError, PageWindow, page_count, page_of, select_window};
