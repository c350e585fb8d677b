//! Session statistics accumulator

use serde::{Deserialize, Serialize};

use crate::result::SpinResult;

/// Running totals for a play session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    pub wins: u64,
    pub losses: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Record one finished spin
    pub fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        self.total_bet += result.bet;
        self.total_win += result.total_win;

        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        let ratio = result.win_ratio();
        if ratio > self.max_win_ratio {
            self.max_win_ratio = ratio;
        }
    }

    /// Return-to-player percentage
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Percentage of spins that won something
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}
