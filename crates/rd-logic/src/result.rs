//! Spin result types and the remote-outcome wire contract

use serde::{Deserialize, Serialize};

use rd_core::{Grid, Position};

/// A winning run on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLine {
    /// Paying symbol id. For an all-wild run this is the wild itself.
    pub symbol: String,
    /// Run length (>= 3)
    pub length: u8,
    /// Ordered cells of the run
    pub positions: Vec<Position>,
    /// bet × paytable[length]
    pub payout: f64,
}

/// Outcome of one spin. Owned by the orchestrator for the duration of the
/// spin and superseded by the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    /// Final grid, `[column][row]`
    pub grid: Grid,
    /// Bet used to size payouts
    pub bet: f64,
    /// Sum of all win-line payouts
    pub total_win: f64,
    /// Recorded win lines, deduplicated by position set
    pub win_lines: Vec<WinLine>,
}

impl SpinResult {
    /// Zero-value result for an invalid or absent spin
    pub fn zero(grid: Grid, bet: f64) -> Self {
        Self {
            grid,
            bet,
            total_win: 0.0,
            win_lines: Vec::new(),
        }
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0.0 {
            self.total_win / self.bet
        } else {
            0.0
        }
    }
}

/// Request sent to an outcome authority (local or remote).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutcomeRequest {
    /// Bet amount
    pub bet: f64,
    /// Active line count (informational for line-based authorities)
    pub lines: u16,
}

/// SpinResult-shaped payload returned by an outcome authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// Final grid, `[column][row]`
    pub symbol_grid: Grid,
    /// Total win already computed by the authority
    pub total_win: f64,
    /// Win lines already computed by the authority
    pub win_lines: Vec<WinLine>,
}

impl SpinOutcome {
    pub fn into_result(self, bet: f64) -> SpinResult {
        SpinResult {
            grid: self.symbol_grid,
            bet,
            total_win: self.total_win,
            win_lines: self.win_lines,
        }
    }
}
