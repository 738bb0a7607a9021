use crate::layout::ViewportKind;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumString};

const FRAME: Duration = Duration::from_millis(16);
const MAX_SETTLE_FRAMES: u128 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Back,
}

impl Step {
    pub fn offset(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Back => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub wheel_threshold: f64,
    pub wheel_burst_ms: u64,
    pub wheel_idle_ms: u64,
    pub wheel_burst_gain: f64,
    pub wheel_fresh_gain: f64,
    pub wheel_decay: f64,
    pub swipe_threshold: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_threshold: 150.0,
            wheel_burst_ms: 200,
            wheel_idle_ms: 150,
            wheel_burst_gain: 0.5,
            wheel_fresh_gain: 0.8,
            wheel_decay: 0.92,
            swipe_threshold: 50.0,
        }
    }
}

/// Accumulates wheel deltas until they cross the threshold.
///
/// Deltas arriving in quick succession add up at a reduced gain; a delta after
/// a pause restarts the accumulator. Once the wheel has been idle for
/// `wheel_idle_ms` the value decays one step per elapsed frame.
#[derive(Debug, Clone)]
pub struct WheelAccumulator {
    config: InputConfig,
    value: f64,
    last: Option<Instant>,
}

impl WheelAccumulator {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            value: 0.0,
            last: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn push(&mut self, delta: f64, now: Instant) -> Option<Step> {
        if !delta.is_finite() {
            return None;
        }
        let burst = Duration::from_millis(self.config.wheel_burst_ms);
        let gap = self.last.map(|last| now.saturating_duration_since(last));
        let in_burst = gap.is_some_and(|gap| gap < burst);
        self.last = Some(now);

        if let Some(gap) = gap {
            self.settle(gap);
        }

        if in_burst {
            self.value += delta * self.config.wheel_burst_gain;
        } else {
            self.value = delta * self.config.wheel_fresh_gain;
        }

        let threshold = self.config.wheel_threshold;
        let step = if self.value > threshold {
            Some(Step::Forward)
        } else if self.value < -threshold {
            Some(Step::Back)
        } else {
            None
        };
        if step.is_some() {
            self.value = 0.0;
        }
        step
    }

    fn settle(&mut self, gap: Duration) {
        let idle = gap.saturating_sub(Duration::from_millis(self.config.wheel_idle_ms));
        let frames = idle.as_millis() / FRAME.as_millis();
        for _ in 0..frames.min(MAX_SETTLE_FRAMES) {
            self.decay();
        }
    }

    /// One idle settling tick.
    pub fn decay(&mut self) {
        if self.value.abs() > 1.0 {
            self.value *= self.config.wheel_decay;
        } else {
            self.value = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start: Option<TouchPoint>,
}

impl SwipeTracker {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            threshold: config.swipe_threshold,
            start: None,
        }
    }

    pub fn begin(&mut self, point: TouchPoint) {
        self.start = Some(point);
    }

    /// Compact viewports swipe along the vertical axis, full ones horizontally.
    pub fn end(&mut self, point: TouchPoint, kind: ViewportKind) -> Option<Step> {
        let start = self.start.take()?;
        let delta = match kind {
            ViewportKind::Compact => start.y - point.y,
            ViewportKind::Full => start.x - point.x,
        };

        (delta.abs() > self.threshold).then_some(if delta > 0.0 {
            Step::Forward
        } else {
            Step::Back
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowLeft", serialize = "left")]
    ArrowLeft,
    #[strum(serialize = "ArrowRight", serialize = "right")]
    ArrowRight,
    #[strum(serialize = "ArrowUp", serialize = "up")]
    ArrowUp,
    #[strum(serialize = "ArrowDown", serialize = "down")]
    ArrowDown,
    #[strum(serialize = "Escape", serialize = "esc")]
    Escape,
}

pub fn key_step(key: Key) -> Option<Step> {
    match key {
        Key::ArrowLeft => Some(Step::Back),
        Key::ArrowRight => Some(Step::Forward),
        _ => None,
    }
}
