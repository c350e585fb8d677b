//! # rd-logic — Pure spin logic for ReelDrive
//!
//! No rendering, no timing: weighted symbol generation and win-line
//! evaluation over a finished grid.
//!
//! ## Architecture
//!
//! ```text
//! SymbolCatalog (weights, paytable, roles)
//!     │
//!     ├── WeightedDraw ── generate_grid ──▶ Grid
//!     │
//!     └── evaluate(Grid, bet) ──▶ SpinResult { total_win, win_lines }
//! ```

pub mod catalog;
pub mod draw;
pub mod result;
pub mod stats;
pub mod wins;

pub use catalog::*;
pub use draw::*;
pub use result::*;
pub use stats::*;
pub use wins::*;
