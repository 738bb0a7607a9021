use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumString};

pub const DEFAULT_BREAKPOINT: u32 = 768;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ViewportKind {
    /// Narrow viewport, cards travel vertically.
    Compact,
    /// Wide viewport, cards travel horizontally and tilt.
    Full,
}

impl ViewportKind {
    pub fn from_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            Self::Compact
        } else {
            Self::Full
        }
    }
}

/// Ring constants for one viewport kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeParams {
    pub radius: f64,
    pub radius_factor: f64,
    pub depth: f64,
    pub scale_floor: f64,
    pub opacity_floor: f64,
    pub tilt: f64,
}

impl ModeParams {
    pub const COMPACT: Self = Self {
        radius: 200.0,
        radius_factor: 0.8,
        depth: 150.0,
        scale_floor: 0.7,
        opacity_floor: 0.6,
        tilt: 0.0,
    };

    pub const FULL: Self = Self {
        radius: 320.0,
        radius_factor: 1.0,
        depth: 250.0,
        scale_floor: 0.65,
        opacity_floor: 0.5,
        tilt: 0.4,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub min_divisor: usize, // floor on angular divisions for short pages
    pub interactivity_threshold: f64,
    pub z_base: f64,
    pub z_spread: f64,
    pub compact: ModeParams,
    pub full: ModeParams,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            min_divisor: 5,
            interactivity_threshold: 0.3,
            z_base: 50.0,
            z_spread: 50.0,
            compact: ModeParams::COMPACT,
            full: ModeParams::FULL,
        }
    }
}

impl LayoutParams {
    pub fn mode(&self, kind: ViewportKind) -> &ModeParams {
        match kind {
            ViewportKind::Compact => &self.compact,
            ViewportKind::Full => &self.full,
        }
    }

    pub fn angle_step(&self, count: usize) -> f64 {
        2.0 * PI / count.max(self.min_divisor).max(1) as f64
    }
}

/// Where a materialized card sits on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Transform {
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotate_y: f64, // degrees
    pub scale: f64,
    pub opacity: f64,
    pub normalized_depth: f64,
    pub z_index: i32,
    pub interactive: bool,
}

impl Transform {
    pub fn solve(
        local_index: usize,
        local_offset: usize,
        step: f64,
        kind: ViewportKind,
        params: &LayoutParams,
    ) -> Self {
        let mode = params.mode(kind);
        let angle = step * (local_index as f64 - local_offset as f64);
        let depth = angle.cos();
        let normalized_depth = (depth + 1.0) / 2.0;
        let displacement = angle.sin() * mode.radius * mode.radius_factor;

        let (x, y) = match kind {
            ViewportKind::Compact => (0.0, displacement),
            ViewportKind::Full => (displacement, 0.0),
        };

        Self {
            angle,
            x,
            y,
            z: depth * mode.depth,
            rotate_y: -angle.to_degrees() * mode.tilt,
            scale: mode.scale_floor + (1.0 - mode.scale_floor) * normalized_depth,
            opacity: mode.opacity_floor + (1.0 - mode.opacity_floor) * normalized_depth,
            normalized_depth,
            z_index: (params.z_base + params.z_spread * normalized_depth).round() as i32,
            interactive: normalized_depth > params.interactivity_threshold,
        }
    }
}

/// Lays out `count` materialized cards around a ring with the card at
/// `local_offset` centered (angle 0, nearest, on top).
pub fn compute_transforms(
    count: usize,
    local_offset: usize,
    kind: ViewportKind,
    params: &LayoutParams,
) -> Vec<Transform> {
    let step = params.angle_step(count);

    (0..count)
        .map(|i| Transform::solve(i, local_offset, step, kind, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_card_is_nearest() {
        let params = LayoutParams::default();
        for kind in [ViewportKind::Compact, ViewportKind::Full] {
            for offset in 0..8 {
                let transforms = compute_transforms(8, offset, kind, &params);
                let centered = transforms[offset];
                assert_eq!(centered.angle, 0.0);
                assert_eq!(centered.normalized_depth, 1.0);
                assert_eq!(centered.z_index, 100);
                assert!(
                    transforms
                        .iter()
                        .all(|t| t.normalized_depth <= centered.normalized_depth)
                );
            }
        }
    }

    #[test]
    fn test_transforms_are_deterministic() {
        let params = LayoutParams::default();
        let a = compute_transforms(7, 3, ViewportKind::Full, &params);
        let b = compute_transforms(7, 3, ViewportKind::Full, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn test_interactivity_cutoff() {
        let params = LayoutParams::default();
        for count in 1..=8 {
            for t in compute_transforms(count, 0, ViewportKind::Full, &params) {
                assert_eq!(t.interactive, t.normalized_depth > 0.3);
            }
        }
        // opposite side of an 8-card ring is fully behind
        let back = compute_transforms(8, 0, ViewportKind::Full, &params)[4];
        assert!(back.normalized_depth < 1e-9);
        assert!(!back.interactive);
    }

    #[test]
    fn test_short_pages_use_min_divisor() {
        let params = LayoutParams::default();
        let transforms = compute_transforms(2, 0, ViewportKind::Full, &params);
        assert!((transforms[1].angle - 2.0 * PI / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_compact_moves_vertically() {
        let params = LayoutParams::default();
        let compact = compute_transforms(8, 0, ViewportKind::Compact, &params);
        assert!(compact.iter().all(|t| t.x == 0.0 && t.rotate_y == 0.0));
        assert!((compact[2].y - 160.0).abs() < 1e-9);
        assert!((compact[0].scale - 1.0).abs() < 1e-12);
        assert!((compact[4].scale - 0.7).abs() < 1e-9);
        assert!((compact[4].opacity - 0.6).abs() < 1e-9);

        let full = compute_transforms(8, 0, ViewportKind::Full, &params);
        assert!(full.iter().all(|t| t.y == 0.0));
        assert!((full[2].x - 320.0).abs() < 1e-9);
        assert!((full[2].z).abs() < 1e-9);
        assert!((full[2].rotate_y + 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_kind_from_width() {
        assert_eq!(
            ViewportKind::from_width(768, DEFAULT_BREAKPOINT),
            ViewportKind::Compact
        );
        assert_eq!(
            ViewportKind::from_width(769, DEFAULT_BREAKPOINT),
            ViewportKind::Full
        );
        assert_eq!("FULL".parse::<ViewportKind>().unwrap(), ViewportKind::Full);
    }

    #[test]
    fn test_params_fill_defaults() {
        let params: LayoutParams = serde_json::from_str(r#"{"min_divisor": 6}"#).unwrap();
        assert_eq!(params.min_divisor, 6);
        assert_eq!(params.full, ModeParams::FULL);
    }
}
