//! Heat-pump retrofit analysis engine.
//!
//! Estimates a building's thermal resistance from its fuel delivery history,
//! simulates hour-by-hour dispatch of a cold-climate heat pump with
//! supplemental backup, and rolls the result up into annual cost and
//! emissions comparisons.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Heat-pump capacity and COP curve models.
pub mod curve;
pub mod error;
pub mod fuel;
pub mod io;
pub mod math;
pub mod pipeline;
/// Season predicate, resistance estimate, dispatch engine, and rollup.
pub mod sim;
pub mod weather;

pub use error::{Error, Result};
