//! # rd-reel — Reel motion and spin orchestration
//!
//! Single-threaded, tick-driven simulation of N independent reels plus the
//! orchestrator that fans a spin out across them and fans the completion
//! signals back in.
//!
//! ## Architecture
//!
//! ```text
//! SpinOrchestrator::spin()
//!     │ outcome ◀── OutcomeSource (local SpinLogic or remote authority)
//!     │
//!     ├── ReelMotion[0] ── ReelStateMachine ── ContainerPool
//!     ├── ReelMotion[1] ── ...
//!     └── ReelMotion[N]
//!           │
//!           └─▶ ReelEvent::Stopped ──▶ fan-in ──▶ GameFlow::on_spin_complete
//! ```

pub mod motion;
pub mod orchestrator;
pub mod outcome;
pub mod pool;
pub mod scheduler;
pub mod state;

pub use motion::*;
pub use orchestrator::*;
pub use outcome::*;
pub use pool::*;
pub use scheduler::*;
pub use state::*;
