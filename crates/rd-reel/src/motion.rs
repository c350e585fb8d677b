//! One reel's continuous scroll, blur, and smooth-stop landing
//!
//! The reel owns a circular ring of pooled containers spaced by
//! `symbol_spacing`. A container's rendered Y is derived from the scroll
//! offset with modular arithmetic, so the ring appears infinite. Stopping
//! tweens the offset to a snap-aligned point at least one full wrap away
//! and swaps symbols on lap changes, which guarantees the committed target
//! symbols are in place when motion ends without a visible pop.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rd_core::{Easing, MotionProfile, ReelGeometry};
use rd_logic::{SymbolCatalog, WeightedDraw};

use crate::pool::{ContainerId, ContainerPool};
use crate::state::{ReelState, ReelStateMachine};

/// Emitted by [`ReelMotion::tick`] when something orchestrator-visible
/// happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelEvent {
    /// The stop tween completed and the reel is at rest on its targets.
    Stopped { column: u8 },
}

/// Highlight scale applied by `highlight_symbol`
const HIGHLIGHT_SCALE: f64 = 1.25;

struct StopPlan {
    start_offset: f64,
    final_offset: f64,
    elapsed_ms: f64,
    duration_ms: f64,
    easing: Easing,
    /// Per-container lap at the last tick
    last_laps: Vec<i64>,
    /// Per-container lap when the tween lands
    final_laps: Vec<i64>,
    /// Per-container visible row at rest, None for buffer rows
    resting_rows: Vec<Option<u8>>,
    /// Committed symbol per visible row
    targets: Vec<String>,
}

/// Motion controller for a single reel column.
pub struct ReelMotion {
    column: u8,
    geometry: ReelGeometry,
    motion: MotionProfile,
    fsm: ReelStateMachine,
    pool: ContainerPool,
    ring: Vec<ContainerId>,
    filler: WeightedDraw,
    rng: StdRng,
    position_offset: f64,
    current_speed: f64,
    pending_start_ms: Option<f64>,
    stop: Option<StopPlan>,
    blurred: bool,
}

impl ReelMotion {
    pub fn new(
        column: u8,
        geometry: ReelGeometry,
        motion: MotionProfile,
        catalog: &SymbolCatalog,
        seed: u64,
    ) -> Self {
        let filler = WeightedDraw::from_catalog(catalog);
        let mut rng = StdRng::seed_from_u64(seed);

        let count = geometry.container_count();
        let spacing = geometry.symbol_spacing();
        let mid = (count as f64 - 1.0) / 2.0;

        let mut pool = ContainerPool::with_capacity(count);
        let mut ring = Vec::with_capacity(count);
        for i in 0..count {
            let id = pool.acquire();
            let container = pool.get_mut(id).expect("fresh handle is live");
            container.origin_y = (i as f64 - mid) * spacing;
            container.symbol = filler.draw(&mut rng).to_string();
            container.scale = 1.0;
            ring.push(id);
        }

        Self {
            column,
            geometry,
            motion,
            fsm: ReelStateMachine::new(),
            pool,
            ring,
            filler,
            rng,
            position_offset: 0.0,
            current_speed: 0.0,
            pending_start_ms: None,
            stop: None,
            blurred: false,
        }
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    pub fn state(&self) -> ReelState {
        self.fsm.state()
    }

    pub fn is_spinning(&self) -> bool {
        self.fsm.is_spinning()
    }

    pub fn is_stopping(&self) -> bool {
        self.fsm.is_stopping()
    }

    /// Current scroll offset (px). Spacing-aligned whenever at rest.
    pub fn position_offset(&self) -> f64 {
        self.position_offset
    }

    /// Begin spinning after `delay_ms` (stagger). No-op while already
    /// spinning or stopping.
    pub fn start(&mut self, delay_ms: f64) {
        if self.fsm.is_spinning() || self.fsm.is_stopping() {
            return;
        }
        self.reset_symbol_scale();
        if delay_ms > 0.0 {
            self.pending_start_ms = Some(delay_ms);
        } else {
            self.fsm.start_spin();
        }
    }

    /// Commit this reel to land on `targets` (one symbol per visible row,
    /// top to bottom) and begin the deceleration tween.
    pub fn stop_spin(&mut self, targets: &[String]) -> bool {
        if !self.fsm.is_spinning() {
            warn!("reel {}: stop_spin ignored in state {:?}", self.column, self.fsm.state());
            return false;
        }
        if targets.len() != self.geometry.rows as usize {
            warn!(
                "reel {}: stop_spin expected {} target symbols, got {}",
                self.column,
                self.geometry.rows,
                targets.len()
            );
            return false;
        }

        let spacing = self.geometry.symbol_spacing();
        let wrap = self.geometry.wrap_height();
        let current = self.position_offset;

        // Remaining distance to the next spacing-aligned snap point, plus
        // whole wraps so the symbol swap happens out of view.
        let remainder = current.rem_euclid(spacing);
        let to_snap = if remainder == 0.0 { 0.0 } else { spacing - remainder };
        let final_offset = current + to_snap + self.motion.extra_wraps as f64 * wrap;

        let last_laps: Vec<i64> = self
            .ring
            .iter()
            .map(|&id| self.lap_of(id, current))
            .collect();
        let final_laps: Vec<i64> = self
            .ring
            .iter()
            .map(|&id| self.lap_of(id, final_offset))
            .collect();
        let resting_rows: Vec<Option<u8>> = self
            .ring
            .iter()
            .map(|&id| self.resting_row(id, final_offset))
            .collect();

        self.fsm.start_stopping();
        self.stop = Some(StopPlan {
            start_offset: current,
            final_offset,
            elapsed_ms: 0.0,
            duration_ms: self.motion.stop_duration_ms,
            easing: self.motion.easing,
            last_laps,
            final_laps,
            resting_rows,
            targets: targets.to_vec(),
        });

        debug!(
            "reel {}: stopping from {:.1} to {:.1}",
            self.column, current, final_offset
        );
        true
    }

    /// Advance the simulation by `dt_ms`. Returns a [`ReelEvent`] when the
    /// reel finished stopping this tick.
    pub fn tick(&mut self, dt_ms: f64) -> Option<ReelEvent> {
        if dt_ms <= 0.0 {
            return None;
        }

        if let Some(remaining) = self.pending_start_ms {
            let remaining = remaining - dt_ms;
            if remaining <= 0.0 {
                self.pending_start_ms = None;
                self.fsm.start_spin();
            } else {
                self.pending_start_ms = Some(remaining);
                return None;
            }
        }

        let before = self.position_offset;
        let mut event = None;

        match self.fsm.state() {
            ReelState::Accelerating => {
                self.current_speed =
                    (self.current_speed + self.motion.acceleration * dt_ms).min(self.motion.max_speed);
                if self.current_speed >= self.motion.max_speed {
                    self.fsm.start_constant_spin();
                }
                self.position_offset += self.current_speed * dt_ms;
            }
            ReelState::ConstantSpin => {
                self.position_offset += self.current_speed * dt_ms;
            }
            ReelState::Stopping => {
                event = self.tick_stop(dt_ms);
            }
            ReelState::Idle | ReelState::Result => {}
        }

        // Blur is purely visual and reversible each tick
        let instantaneous = (self.position_offset - before).abs() / dt_ms;
        let blur = instantaneous > self.motion.blur_threshold;
        if blur != self.blurred {
            self.apply_blur(blur);
        }

        event
    }

    fn tick_stop(&mut self, dt_ms: f64) -> Option<ReelEvent> {
        let Some(mut plan) = self.stop.take() else {
            return None;
        };

        plan.elapsed_ms += dt_ms;
        let t = (plan.elapsed_ms / plan.duration_ms).min(1.0);
        let eased = plan.easing.apply(t);
        self.position_offset =
            plan.start_offset + (plan.final_offset - plan.start_offset) * eased;

        // Lap tracking: any container that wrapped gets a new symbol. The
        // lap that will be visible at rest receives the committed target,
        // everything else gets cosmetic filler.
        for i in 0..self.ring.len() {
            let id = self.ring[i];
            let lap = self.lap_of(id, self.position_offset);
            if lap == plan.last_laps[i] {
                continue;
            }
            plan.last_laps[i] = lap;

            let symbol = if lap == plan.final_laps[i] {
                match plan.resting_rows[i] {
                    Some(row) => plan.targets[row as usize].clone(),
                    None => self.filler.draw(&mut self.rng).to_string(),
                }
            } else {
                self.filler.draw(&mut self.rng).to_string()
            };

            match self.pool.get_mut(id) {
                Some(container) => container.symbol = symbol,
                None => warn!("reel {}: stale container during stop", self.column),
            }
        }

        if t >= 1.0 {
            self.position_offset = plan.final_offset;
            self.current_speed = 0.0;
            self.apply_blur(false);
            self.fsm.set_result();
            debug!("reel {}: stopped at {:.1}", self.column, self.position_offset);
            return Some(ReelEvent::Stopped { column: self.column });
        }

        self.stop = Some(plan);
        None
    }

    /// Immediately cancel any in-flight motion without a graceful landing.
    /// Used on pause or after a failed outcome fetch. Emits no event.
    pub fn force_stop(&mut self, reinit: bool) {
        self.pending_start_ms = None;
        self.stop = None;
        self.current_speed = 0.0;
        self.apply_blur(false);
        self.fsm.reset();

        if reinit {
            self.position_offset = 0.0;
            for &id in &self.ring {
                let symbol = self.filler.draw(&mut self.rng).to_string();
                match self.pool.get_mut(id) {
                    Some(container) => {
                        container.symbol = symbol;
                        container.scale = 1.0;
                    }
                    None => warn!("reel {}: stale container during reinit", self.column),
                }
            }
        }
    }

    /// Force the blurred/normal sprite variant on every container.
    pub fn set_blur(&mut self, enabled: bool) {
        self.apply_blur(enabled);
    }

    /// Pulse emphasis on the container currently resting at `row`.
    /// Matched by rendered-Y proximity since containers keep moving.
    pub fn highlight_symbol(&mut self, row: u8) {
        if row >= self.geometry.rows {
            warn!("reel {}: highlight row {} out of range", self.column, row);
            return;
        }
        match self.container_at_row(row) {
            Some(id) => match self.pool.get_mut(id) {
                Some(container) => container.scale = HIGHLIGHT_SCALE,
                None => warn!("reel {}: stale container for highlight", self.column),
            },
            None => warn!("reel {}: no container near row {}", self.column, row),
        }
    }

    /// Clear any lingering emphasis from the previous result.
    pub fn reset_symbol_scale(&mut self) {
        for &id in &self.ring {
            if let Some(container) = self.pool.get_mut(id) {
                container.scale = 1.0;
            }
        }
    }

    /// Symbol ids currently shown on the visible rows, top to bottom.
    pub fn visible_symbols(&self) -> Vec<String> {
        (0..self.geometry.rows)
            .map(|row| {
                self.container_at_row(row)
                    .and_then(|id| self.pool.get(id))
                    .map(|c| c.symbol.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Emphasis scale of the container at `row` (1.0 = none)
    pub fn symbol_scale(&self, row: u8) -> f64 {
        self.container_at_row(row)
            .and_then(|id| self.pool.get(id))
            .map(|c| c.scale)
            .unwrap_or(1.0)
    }

    /// Blurred sprite variant currently active
    pub fn is_blurred(&self) -> bool {
        self.blurred
    }

    fn apply_blur(&mut self, enabled: bool) {
        self.blurred = enabled;
        for &id in &self.ring {
            if let Some(container) = self.pool.get_mut(id) {
                container.blurred = enabled;
            }
        }
    }

    /// Rendered Y of a container at scroll `offset`: modular arithmetic
    /// over the wrap range, centered on the column midpoint.
    fn rendered_y_at(&self, id: ContainerId, offset: f64) -> Option<f64> {
        let wrap = self.geometry.wrap_height();
        let origin = self.pool.get(id)?.origin_y;
        Some((origin - offset + wrap / 2.0).rem_euclid(wrap) - wrap / 2.0)
    }

    /// Lap number of a container at scroll `offset`
    fn lap_of(&self, id: ContainerId, offset: f64) -> i64 {
        let wrap = self.geometry.wrap_height();
        let origin = self.pool.get(id).map(|c| c.origin_y).unwrap_or(0.0);
        ((origin - offset + wrap / 2.0) / wrap).floor() as i64
    }

    /// Visible row a container occupies at scroll `offset`, if any
    fn resting_row(&self, id: ContainerId, offset: f64) -> Option<u8> {
        let y = self.rendered_y_at(id, offset)?;
        let spacing = self.geometry.symbol_spacing();
        (0..self.geometry.rows).find(|&row| {
            (y - self.geometry.row_center_y(row)).abs() <= spacing / 2.0 + 1e-6
        })
    }

    /// Container nearest to `row`'s center at the current offset
    fn container_at_row(&self, row: u8) -> Option<ContainerId> {
        let center = self.geometry.row_center_y(row);
        let spacing = self.geometry.symbol_spacing();
        let mut best: Option<(ContainerId, f64)> = None;
        for &id in &self.ring {
            let Some(y) = self.rendered_y_at(id, self.position_offset) else {
                continue;
            };
            let distance = (y - center).abs();
            if distance <= spacing / 2.0 + 1e-6
                && best.map_or(true, |(_, d)| distance < d)
            {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }
}

impl std::fmt::Debug for ReelMotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReelMotion")
            .field("column", &self.column)
            .field("state", &self.fsm.state())
            .field("offset", &self.position_offset)
            .field("speed", &self.current_speed)
            .finish()
    }
}
