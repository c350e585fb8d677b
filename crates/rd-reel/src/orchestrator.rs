//! Multi-reel spin orchestration
//!
//! One spin: guard the button, start reels with a stagger, request the
//! outcome, poll until it resolves, commit one grid column to each reel as
//! its landing targets, stagger the stops, fan the per-reel stop events
//! back in, then report the finished result exactly once. An outcome
//! failure or a pause aborts the whole spin with a hard stop on every reel.

use log::{debug, error, info, warn};

use rd_core::{grid_is_rectangular, MotionProfile, RdError, RdResult, ReelGeometry, SpinTiming};
use rd_logic::{OutcomeRequest, SessionStats, SpinResult, SymbolCatalog};

use crate::motion::{ReelEvent, ReelMotion};
use crate::outcome::{OutcomePoll, OutcomeSource};
use crate::scheduler::{ScheduledAction, SpinScheduler};
use crate::state::ReelState;

/// Game-level collaborator the orchestrator reports into. Injected per
/// call so the host owns its own state.
pub trait GameFlow {
    /// Bet to place on the next spin
    fn current_bet(&self) -> f64;

    /// Active line count forwarded to the outcome authority
    fn active_lines(&self) -> u16 {
        20
    }

    /// While paused no spin starts and an in-flight spin aborts
    fn is_paused(&self) -> bool;

    /// Called exactly once per completed spin, after all reels stopped
    fn on_spin_complete(&mut self, result: &SpinResult);

    /// Called when a spin aborts (outcome failure or pause)
    fn on_spin_failed(&mut self, _error: &RdError) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpinPhase {
    Idle,
    /// Reels starting/spinning, outcome not yet resolved
    AwaitingOutcome,
    /// Targets committed, stops scheduled or in flight
    Stopping,
}

/// Re-check interval when a stop fires before its reel started spinning
const STOP_RETRY_MS: f64 = 32.0;

/// Drives N [`ReelMotion`]s through a complete spin.
pub struct SpinOrchestrator<S: OutcomeSource> {
    geometry: ReelGeometry,
    timing: SpinTiming,
    reels: Vec<ReelMotion>,
    scheduler: SpinScheduler,
    source: S,
    phase: SpinPhase,
    spin_elapsed_ms: f64,
    pending_result: Option<SpinResult>,
    last_result: Option<SpinResult>,
    stopped_count: usize,
    stats: SessionStats,
}

impl<S: OutcomeSource> SpinOrchestrator<S> {
    pub fn new(
        geometry: ReelGeometry,
        motion: MotionProfile,
        timing: SpinTiming,
        catalog: &SymbolCatalog,
        source: S,
        seed: u64,
    ) -> RdResult<Self> {
        geometry.validate()?;
        motion.validate()?;

        let reels = (0..geometry.reel_count)
            .map(|column| {
                // Distinct stream per reel so fillers differ between columns
                let reel_seed = seed.wrapping_add(0x9e37_79b9_7f4a_7c15u64.wrapping_mul(column as u64 + 1));
                ReelMotion::new(column, geometry, motion, catalog, reel_seed)
            })
            .collect();

        Ok(Self {
            geometry,
            timing,
            reels,
            scheduler: SpinScheduler::new(),
            source,
            phase: SpinPhase::Idle,
            spin_elapsed_ms: 0.0,
            pending_result: None,
            last_result: None,
            stopped_count: 0,
            stats: SessionStats::default(),
        })
    }

    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    pub fn is_spinning(&self) -> bool {
        self.phase != SpinPhase::Idle
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Result of the most recently completed spin
    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    /// Totals and win lines of the most recently completed spin. A zero
    /// result before the first spin completes.
    pub fn check_win(&self) -> SpinResult {
        self.last_result
            .clone()
            .unwrap_or_else(|| SpinResult::zero(Vec::new(), 0.0))
    }

    /// Whether the most recently completed spin paid anything
    pub fn has_win(&self) -> bool {
        self.last_result.as_ref().is_some_and(|r| r.is_win())
    }

    /// Visible grid assembled from the reels, `[column][row]`
    pub fn visible_grid(&self) -> Vec<Vec<String>> {
        self.reels.iter().map(|r| r.visible_symbols()).collect()
    }

    /// Kick off one spin. Returns `Ok(false)` when a spin is already in
    /// flight (the button is guarded, not an error), `Err` when the spin
    /// cannot start at all.
    pub fn spin(&mut self, flow: &dyn GameFlow) -> RdResult<bool> {
        if self.phase != SpinPhase::Idle {
            warn!("spin ignored: already in phase {:?}", self.phase);
            return Ok(false);
        }
        if flow.is_paused() {
            return Err(RdError::OutcomePaused);
        }

        let request = OutcomeRequest {
            bet: flow.current_bet(),
            lines: flow.active_lines(),
        };
        self.source.request(request)?;

        for (i, reel) in self.reels.iter().enumerate() {
            self.scheduler.schedule(
                i as f64 * self.timing.start_stagger_ms,
                ScheduledAction::StartReel {
                    column: reel.column(),
                },
            );
        }

        self.phase = SpinPhase::AwaitingOutcome;
        self.spin_elapsed_ms = 0.0;
        self.stopped_count = 0;
        info!("spin started: bet {:.2}, {} reels", request.bet, self.reels.len());
        Ok(true)
    }

    /// Advance everything by `dt_ms`. Call once per frame.
    pub fn tick(&mut self, dt_ms: f64, flow: &mut dyn GameFlow) {
        if dt_ms <= 0.0 {
            return;
        }

        if self.phase != SpinPhase::Idle && flow.is_paused() {
            self.abort(RdError::OutcomePaused, flow);
            return;
        }

        if self.phase != SpinPhase::Idle {
            self.spin_elapsed_ms += dt_ms;
        }

        for action in self.scheduler.tick(dt_ms) {
            if let Some(err) = self.handle_action(action) {
                self.abort(err, flow);
                return;
            }
        }

        if self.phase == SpinPhase::AwaitingOutcome {
            match self.source.poll() {
                OutcomePoll::Ready(result) => match self.validate_outcome(&result) {
                    Ok(()) => self.commit_outcome(result),
                    Err(err) => {
                        self.abort(err, flow);
                        return;
                    }
                },
                OutcomePoll::Pending => {}
                OutcomePoll::Failed(err) => {
                    self.abort(err, flow);
                    return;
                }
            }
        }

        for reel in &mut self.reels {
            if let Some(ReelEvent::Stopped { column }) = reel.tick(dt_ms) {
                debug!("reel {column} stopped");
                self.stopped_count += 1;
            }
        }

        if self.phase == SpinPhase::Stopping && self.stopped_count == self.reels.len() {
            self.finish(flow);
        }
    }

    /// Returns an error only for a failure that must abort the spin.
    fn handle_action(&mut self, action: ScheduledAction) -> Option<RdError> {
        match action {
            ScheduledAction::StartReel { column } => {
                if let Some(reel) = self.reels.get_mut(column as usize) {
                    reel.start(0.0);
                }
                None
            }
            ScheduledAction::StopReel { column } => {
                let Some(result) = self.pending_result.as_ref() else {
                    warn!("stop for reel {column} with no committed outcome");
                    return None;
                };
                let targets = result.grid[column as usize].clone();
                let reel = self.reels.get_mut(column as usize)?;

                if reel.is_spinning() {
                    if reel.stop_spin(&targets) {
                        None
                    } else {
                        // Committed targets were validated, so a refusal
                        // here is unrecoverable
                        Some(RdError::OutcomeRejected(format!(
                            "reel {column} refused its committed targets"
                        )))
                    }
                } else if reel.state() == ReelState::Idle {
                    // The stagger outran this reel's start; the queued
                    // start will flip it to spinning shortly
                    self.scheduler
                        .schedule(STOP_RETRY_MS, ScheduledAction::StopReel { column });
                    None
                } else {
                    // Already stopping or at rest
                    None
                }
            }
        }
    }

    /// Reject an outcome whose grid does not match the reel geometry
    /// before any reel indexes into it.
    fn validate_outcome(&self, result: &SpinResult) -> RdResult<()> {
        if !grid_is_rectangular(&result.grid)
            || result.grid.len() != self.reels.len()
            || result.grid[0].len() != self.geometry.rows as usize
        {
            return Err(RdError::OutcomeRejected(format!(
                "outcome grid is {}x{}, expected {}x{}",
                result.grid.len(),
                result.grid.first().map_or(0, |column| column.len()),
                self.reels.len(),
                self.geometry.rows
            )));
        }
        Ok(())
    }

    /// Outcome resolved: commit targets and schedule the staggered stops,
    /// honoring the minimum spin time.
    fn commit_outcome(&mut self, result: SpinResult) {
        let to_base = (self.timing.base_spin_ms - self.spin_elapsed_ms).max(0.0);
        for (i, reel) in self.reels.iter().enumerate() {
            self.scheduler.schedule(
                to_base + i as f64 * self.timing.stop_stagger_ms,
                ScheduledAction::StopReel {
                    column: reel.column(),
                },
            );
        }
        debug!(
            "outcome committed: total_win {:.2}, first stop in {:.0} ms",
            result.total_win, to_base
        );
        self.pending_result = Some(result);
        self.phase = SpinPhase::Stopping;
    }

    /// Hard stop of every reel: cancel all scheduled callbacks, force-stop
    /// the motion, and drop the in-flight spin without completing it.
    pub fn stop_all_reels(&mut self) {
        self.scheduler.cancel_all();
        for reel in &mut self.reels {
            reel.force_stop(false);
        }
        self.pending_result = None;
        self.stopped_count = 0;
        self.phase = SpinPhase::Idle;
    }

    /// Player-initiated quick stop: collapse the remaining stop stagger and
    /// land every reel now. Only effective once the outcome is committed;
    /// before that there is nothing to land on.
    pub fn quick_stop(&mut self) {
        if self.phase != SpinPhase::Stopping {
            return;
        }
        let Some(result) = self.pending_result.as_ref() else {
            return;
        };
        self.scheduler.cancel_all();
        for reel in &mut self.reels {
            // A reel whose start stagger had not fired yet must still pass
            // through the spinning state to land
            if reel.state() == ReelState::Idle {
                reel.start(0.0);
            }
            if reel.is_spinning() {
                let targets = result.grid[reel.column() as usize].clone();
                reel.stop_spin(&targets);
            }
        }
    }

    /// Hard reset of every reel to idle, dropping any in-flight spin.
    pub fn reset_all_reels(&mut self) {
        self.scheduler.cancel_all();
        for reel in &mut self.reels {
            reel.force_stop(true);
        }
        self.pending_result = None;
        self.stopped_count = 0;
        self.phase = SpinPhase::Idle;
    }

    /// Force the blurred/normal sprite variant everywhere.
    pub fn set_blur_all(&mut self, enabled: bool) {
        for reel in &mut self.reels {
            reel.set_blur(enabled);
        }
    }

    /// Emphasize every cell that is part of a win line.
    pub fn show_win_effects(&mut self, result: &SpinResult) {
        for line in &result.win_lines {
            for position in &line.positions {
                if let Some(reel) = self.reels.get_mut(position.column as usize) {
                    reel.highlight_symbol(position.row);
                }
            }
        }
    }

    fn finish(&mut self, flow: &mut dyn GameFlow) {
        let Some(result) = self.pending_result.take() else {
            error!("all reels stopped with no committed outcome");
            self.phase = SpinPhase::Idle;
            return;
        };

        if result.is_win() {
            info!(
                "spin won {:.2} on bet {:.2} ({} lines)",
                result.total_win,
                result.bet,
                result.win_lines.len()
            );
            self.show_win_effects(&result);
        } else {
            debug!("spin lost, bet {:.2}", result.bet);
        }

        self.stats.record(&result);
        self.phase = SpinPhase::Idle;
        self.stopped_count = 0;
        flow.on_spin_complete(&result);
        self.last_result = Some(result);
    }

    fn abort(&mut self, err: RdError, flow: &mut dyn GameFlow) {
        error!("spin aborted: {err}");
        self.scheduler.cancel_all();
        for reel in &mut self.reels {
            reel.force_stop(true);
        }
        self.pending_result = None;
        self.stopped_count = 0;
        self.phase = SpinPhase::Idle;
        flow.on_spin_failed(&err);
    }
}
