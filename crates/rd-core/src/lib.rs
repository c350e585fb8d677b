//! # rd-core — Shared types for the ReelDrive spin engine
//!
//! Leaf crate with no game logic: error type, grid positions, geometry and
//! timing configuration, and the easing curves used by the reel stop tween.

pub mod config;
pub mod easing;
pub mod error;
pub mod position;

pub use config::*;
pub use easing::*;
pub use error::*;
pub use position::*;
