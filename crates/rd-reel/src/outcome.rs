//! Outcome authority seam
//!
//! The orchestrator never computes outcomes itself; it asks an
//! [`OutcomeSource`] and polls until the result is ready. Locally that is a
//! weighted draw plus win evaluation resolving on the next poll. Against a
//! remote authority the same polls span real latency, and a transport
//! failure surfaces as [`OutcomePoll::Failed`] so the spin can abort.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rd_core::{RdError, RdResult, ReelGeometry};
use rd_logic::{
    evaluate, generate_grid, OutcomeRequest, SpinOutcome, SpinResult, SymbolCatalog, WeightedDraw,
};

/// Result of one [`OutcomeSource::poll`].
#[derive(Debug)]
pub enum OutcomePoll {
    /// Outcome resolved; the spin may commit targets.
    Ready(SpinResult),
    /// Still in flight; poll again next tick.
    Pending,
    /// The authority failed; the spin must abort.
    Failed(RdError),
}

/// Authority that resolves a spin request into a committed outcome.
pub trait OutcomeSource {
    /// Begin resolving `request`. Errors here are immediate rejections
    /// (bad bet, no session); transport failures surface later via `poll`.
    fn request(&mut self, request: OutcomeRequest) -> RdResult<()>;

    /// Poll the in-flight request, once per tick.
    fn poll(&mut self) -> OutcomePoll;
}

/// Client-side authority: weighted draw plus win evaluation, resolving on
/// the first poll after the request.
pub struct LocalOutcomeSource {
    catalog: SymbolCatalog,
    draw: WeightedDraw,
    rng: StdRng,
    reel_count: u8,
    rows: u8,
    in_flight: Option<SpinResult>,
}

impl LocalOutcomeSource {
    pub fn new(catalog: SymbolCatalog, geometry: &ReelGeometry, seed: u64) -> Self {
        let draw = WeightedDraw::from_catalog(&catalog);
        Self {
            catalog,
            draw,
            rng: StdRng::seed_from_u64(seed),
            reel_count: geometry.reel_count,
            rows: geometry.rows,
            in_flight: None,
        }
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }
}

impl OutcomeSource for LocalOutcomeSource {
    fn request(&mut self, request: OutcomeRequest) -> RdResult<()> {
        if !(request.bet > 0.0) {
            return Err(RdError::OutcomeRejected(format!(
                "bet must be positive, got {}",
                request.bet
            )));
        }
        let grid = generate_grid(&self.draw, &mut self.rng, self.reel_count, self.rows);
        let result = evaluate(&self.catalog, &grid, request.bet);
        debug!(
            "local outcome: total_win {:.2} on bet {:.2}",
            result.total_win, request.bet
        );
        self.in_flight = Some(result);
        Ok(())
    }

    fn poll(&mut self) -> OutcomePoll {
        match self.in_flight.take() {
            Some(result) => OutcomePoll::Ready(result),
            None => OutcomePoll::Pending,
        }
    }
}

/// Scripted authority for tests and demos: each step resolves after a fixed
/// number of polls, either to a [`SpinOutcome`] wire payload or to a
/// transport failure. Payloads go through the same `SpinOutcome → SpinResult`
/// conversion a real remote authority's response would.
#[derive(Debug, Default)]
pub struct ScriptedOutcomeSource {
    script: Vec<ScriptedStep>,
    polls_left: Option<u32>,
    request_bet: f64,
}

#[derive(Debug)]
struct ScriptedStep {
    latency_polls: u32,
    outcome: Result<SpinOutcome, String>,
}

impl ScriptedOutcomeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a wire payload that resolves after `latency_polls` polls.
    pub fn push_outcome(&mut self, latency_polls: u32, outcome: SpinOutcome) {
        self.script.insert(
            0,
            ScriptedStep {
                latency_polls,
                outcome: Ok(outcome),
            },
        );
    }

    /// Queue a transport failure that surfaces after `latency_polls` polls.
    pub fn push_failure(&mut self, latency_polls: u32, message: &str) {
        self.script.insert(
            0,
            ScriptedStep {
                latency_polls,
                outcome: Err(message.to_string()),
            },
        );
    }
}

impl OutcomeSource for ScriptedOutcomeSource {
    fn request(&mut self, request: OutcomeRequest) -> RdResult<()> {
        match self.script.last() {
            Some(step) => {
                self.polls_left = Some(step.latency_polls);
                self.request_bet = request.bet;
                Ok(())
            }
            None => Err(RdError::OutcomeRejected("script exhausted".into())),
        }
    }

    fn poll(&mut self) -> OutcomePoll {
        let Some(polls_left) = self.polls_left else {
            return OutcomePoll::Pending;
        };
        if polls_left > 0 {
            self.polls_left = Some(polls_left - 1);
            return OutcomePoll::Pending;
        }
        self.polls_left = None;
        match self.script.pop().map(|step| step.outcome) {
            Some(Ok(outcome)) => OutcomePoll::Ready(outcome.into_result(self.request_bet)),
            Some(Err(message)) => OutcomePoll::Failed(RdError::OutcomeTransport(message)),
            None => OutcomePoll::Failed(RdError::OutcomeTransport("script exhausted".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OutcomeRequest {
        OutcomeRequest { bet: 1.0, lines: 20 }
    }

    #[test]
    fn test_local_source_resolves_on_first_poll() {
        let geometry = ReelGeometry::standard_5x3();
        let mut source = LocalOutcomeSource::new(SymbolCatalog::standard(), &geometry, 7);

        source.request(request()).unwrap();
        match source.poll() {
            OutcomePoll::Ready(result) => {
                assert_eq!(result.grid.len(), 5);
                assert!(result.grid.iter().all(|column| column.len() == 3));
                assert_eq!(result.bet, 1.0);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
        // Consumed; nothing left in flight
        assert!(matches!(source.poll(), OutcomePoll::Pending));
    }

    #[test]
    fn test_local_source_rejects_bad_bet() {
        let geometry = ReelGeometry::standard_5x3();
        let mut source = LocalOutcomeSource::new(SymbolCatalog::standard(), &geometry, 7);
        assert!(source.request(OutcomeRequest { bet: 0.0, lines: 20 }).is_err());
    }

    #[test]
    fn test_local_source_is_deterministic_for_seed() {
        let geometry = ReelGeometry::standard_5x3();
        let mut a = LocalOutcomeSource::new(SymbolCatalog::standard(), &geometry, 99);
        let mut b = LocalOutcomeSource::new(SymbolCatalog::standard(), &geometry, 99);

        for _ in 0..10 {
            a.request(request()).unwrap();
            b.request(request()).unwrap();
            match (a.poll(), b.poll()) {
                (OutcomePoll::Ready(ra), OutcomePoll::Ready(rb)) => {
                    assert_eq!(ra.grid, rb.grid);
                    assert_eq!(ra.total_win, rb.total_win);
                }
                _ => panic!("both sources must resolve"),
            }
        }
    }

    #[test]
    fn test_scripted_source_latency_and_failure() {
        let mut source = ScriptedOutcomeSource::new();
        source.push_outcome(
            2,
            SpinOutcome {
                symbol_grid: vec![vec!["HP1".into()]],
                total_win: 0.0,
                win_lines: Vec::new(),
            },
        );
        source.push_failure(0, "timeout");

        source.request(request()).unwrap();
        assert!(matches!(source.poll(), OutcomePoll::Pending));
        assert!(matches!(source.poll(), OutcomePoll::Pending));
        match source.poll() {
            OutcomePoll::Ready(result) => {
                // Wire payload converted with the requested bet
                assert_eq!(result.bet, 1.0);
                assert_eq!(result.grid, vec![vec!["HP1".to_string()]]);
            }
            other => panic!("expected Ready, got {other:?}"),
        }

        source.request(request()).unwrap();
        match source.poll() {
            OutcomePoll::Failed(RdError::OutcomeTransport(message)) => {
                assert_eq!(message, "timeout")
            }
            other => panic!("expected transport failure, got {other:?}"),
        }

        // Script exhausted
        assert!(source.request(request()).is_err());
    }
}
