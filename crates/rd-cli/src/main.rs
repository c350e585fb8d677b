//! ReelDrive headless spin simulator
//!
//! Drives the full orchestrator through a fixed tick loop, one spin after
//! another, and prints the session statistics. Useful for eyeballing RTP
//! and hit rate of a catalog without any frontend.

use clap::Parser;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use rd_core::{MotionProfile, RdError, RdResult, ReelGeometry, SpinTiming};
use rd_logic::{SpinResult, SymbolCatalog};
use rd_reel::{GameFlow, LocalOutcomeSource, SpinOrchestrator};

/// Simulated frame duration (ms), ~60 fps
const TICK_MS: f64 = 16.0;

#[derive(Parser, Debug)]
#[command(name = "reeldrive", about = "ReelDrive headless spin simulator")]
struct Args {
    /// Number of spins to simulate
    #[arg(long, default_value_t = 100)]
    spins: u64,

    /// Bet per spin
    #[arg(long, default_value_t = 1.0)]
    bet: f64,

    /// RNG seed; omit for a random session
    #[arg(long)]
    seed: Option<u64>,

    /// Number of reels
    #[arg(long, default_value_t = 5)]
    reels: u8,

    /// Visible rows per reel
    #[arg(long, default_value_t = 3)]
    rows: u8,

    /// Turbo motion and timing
    #[arg(long)]
    turbo: bool,

    /// Print each spin's grid and win lines as JSON
    #[arg(long)]
    verbose: bool,
}

struct SimFlow {
    bet: f64,
    verbose: bool,
    completed: u64,
}

impl GameFlow for SimFlow {
    fn current_bet(&self) -> f64 {
        self.bet
    }

    fn is_paused(&self) -> bool {
        false
    }

    fn on_spin_complete(&mut self, result: &SpinResult) {
        self.completed += 1;
        if self.verbose {
            match serde_json::to_string(result) {
                Ok(json) => println!("{json}"),
                Err(e) => log::warn!("spin {} not serializable: {e}", self.completed),
            }
        } else if result.is_win() {
            println!(
                "spin {:>6}: win {:>8.2} ({}x)",
                self.completed,
                result.total_win,
                result.win_ratio()
            );
        }
    }

    fn on_spin_failed(&mut self, error: &RdError) {
        log::error!("spin failed: {error}");
    }
}

fn main() -> RdResult<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args
        .seed
        .unwrap_or_else(|| StdRng::from_entropy().gen::<u64>());
    info!("session seed {seed}");

    let mut geometry = ReelGeometry::standard_5x3();
    geometry.reel_count = args.reels;
    geometry.rows = args.rows;

    let (motion, timing) = if args.turbo {
        (MotionProfile::turbo(), SpinTiming::turbo())
    } else {
        (MotionProfile::normal(), SpinTiming::normal())
    };

    let catalog = SymbolCatalog::standard();
    let source = LocalOutcomeSource::new(catalog.clone(), &geometry, seed);
    let mut orchestrator =
        SpinOrchestrator::new(geometry, motion, timing, &catalog, source, seed)?;

    let mut flow = SimFlow {
        bet: args.bet,
        verbose: args.verbose,
        completed: 0,
    };

    for _ in 0..args.spins {
        orchestrator.spin(&flow)?;
        while orchestrator.is_spinning() {
            orchestrator.tick(TICK_MS, &mut flow);
        }
    }

    let stats = orchestrator.stats();
    println!();
    println!("spins      {:>12}", stats.total_spins);
    println!("total bet  {:>12.2}", stats.total_bet);
    println!("total win  {:>12.2}", stats.total_win);
    println!("RTP        {:>11.2}%", stats.rtp());
    println!("hit rate   {:>11.2}%", stats.hit_rate());
    println!("best win   {:>11.1}x", stats.max_win_ratio);

    Ok(())
}
