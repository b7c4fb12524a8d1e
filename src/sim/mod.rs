/// Inclusive walk over the hours of an analysis window.
pub mod clock;
/// Hourly dispatch simulator.
pub mod engine;
/// Building thermal resistance from fuel history.
pub mod resistance;
pub mod rollup;
/// Heating season predicate.
pub mod season;
pub mod types;
