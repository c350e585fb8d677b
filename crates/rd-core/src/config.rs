//! Reel geometry, motion and spin timing configuration
//!
//! All values are read-only inputs at initialization; nothing here mutates
//! during play.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{RdError, RdResult};

/// Grid and reel column geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReelGeometry {
    /// Number of reels (columns)
    pub reel_count: u8,
    /// Number of visible rows per reel
    pub rows: u8,
    /// Hidden buffer rows above and below the visible window
    pub buffer_rows: u8,
    /// Symbol sprite size (px)
    pub symbol_size: f64,
    /// Gap between symbols (px)
    pub symbol_gutter: f64,
}

impl ReelGeometry {
    /// Standard 5×3 layout
    pub fn standard_5x3() -> Self {
        Self {
            reel_count: 5,
            rows: 3,
            buffer_rows: 2,
            symbol_size: 140.0,
            symbol_gutter: 12.0,
        }
    }

    /// Classic 3×3 layout
    pub fn classic_3x3() -> Self {
        Self {
            reel_count: 3,
            rows: 3,
            buffer_rows: 2,
            symbol_size: 140.0,
            symbol_gutter: 12.0,
        }
    }

    /// Vertical distance between adjacent symbol centers
    pub fn symbol_spacing(&self) -> f64 {
        self.symbol_size + self.symbol_gutter
    }

    /// Containers in one reel's circular buffer
    pub fn container_count(&self) -> usize {
        self.rows as usize + 2 * self.buffer_rows as usize
    }

    /// Full circular range of a reel's container ring. Equals
    /// `2 × (visible_height / 2 + buffer_rows × spacing)`.
    pub fn wrap_height(&self) -> f64 {
        self.container_count() as f64 * self.symbol_spacing()
    }

    /// Local Y of the visible row `row` at rest (0 = top), centered on the
    /// column midpoint.
    pub fn row_center_y(&self, row: u8) -> f64 {
        let mid = (self.rows as f64 - 1.0) / 2.0;
        (row as f64 - mid) * self.symbol_spacing()
    }

    pub fn validate(&self) -> RdResult<()> {
        if self.reel_count == 0 || self.rows == 0 {
            return Err(RdError::InvalidConfig(
                "reel_count and rows must be non-zero".into(),
            ));
        }
        if self.symbol_spacing() <= 0.0 {
            return Err(RdError::InvalidConfig("symbol spacing must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ReelGeometry {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Per-reel motion parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Speed gained per millisecond while accelerating (px/ms²)
    pub acceleration: f64,
    /// Constant spin speed ceiling (px/ms)
    pub max_speed: f64,
    /// Instantaneous speed above which sprites swap to their blurred
    /// variants (px/ms)
    pub blur_threshold: f64,
    /// Stop tween duration (ms)
    pub stop_duration_ms: f64,
    /// Full wrap-heights added to the stop distance so the symbol swap is
    /// never visible. Must be at least 1 so every container changes lap.
    pub extra_wraps: u8,
    /// Deceleration curve of the stop tween
    pub easing: Easing,
}

impl MotionProfile {
    pub fn normal() -> Self {
        Self {
            acceleration: 0.02,
            max_speed: 4.5,
            blur_threshold: 2.0,
            stop_duration_ms: 650.0,
            extra_wraps: 2,
            easing: Easing::EaseOutCubic,
        }
    }

    pub fn turbo() -> Self {
        Self {
            acceleration: 0.05,
            max_speed: 7.0,
            blur_threshold: 2.0,
            stop_duration_ms: 320.0,
            extra_wraps: 1,
            easing: Easing::EaseOutQuad,
        }
    }

    pub fn validate(&self) -> RdResult<()> {
        if self.acceleration <= 0.0 || self.max_speed <= 0.0 {
            return Err(RdError::InvalidConfig(
                "acceleration and max_speed must be positive".into(),
            ));
        }
        if self.stop_duration_ms <= 0.0 {
            return Err(RdError::InvalidConfig("stop_duration_ms must be positive".into()));
        }
        if self.extra_wraps == 0 {
            return Err(RdError::InvalidConfig(
                "extra_wraps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::normal()
    }
}

/// Spin-level stagger timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Delay between adjacent reel starts (ms)
    pub start_stagger_ms: f64,
    /// Minimum spin time before the first reel may stop (ms)
    pub base_spin_ms: f64,
    /// Delay between adjacent reel stops (ms)
    pub stop_stagger_ms: f64,
}

impl SpinTiming {
    pub fn normal() -> Self {
        Self {
            start_stagger_ms: 120.0,
            base_spin_ms: 800.0,
            stop_stagger_ms: 300.0,
        }
    }

    pub fn turbo() -> Self {
        Self {
            start_stagger_ms: 40.0,
            base_spin_ms: 350.0,
            stop_stagger_ms: 100.0,
        }
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}
