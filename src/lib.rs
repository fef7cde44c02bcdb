//! # Closure Temperature
//!
//! Mean closure temperature (Dodson, 1973) and peak temperature (Faak et al.,
//! 2014) of a mineral cooling through a diffusion process.

// Re-export the main types and functions
pub use calculator::{ClosureCalculator, TemperatureSolution};
pub use error::{ClosureError, ClosureResult};
pub use geometry::Geometry;
pub use params::{ClosureParams, CoolingRateUnit};
pub use root_finding::{
    bisect, bracket_from_guess, brent_root_find, Bisection, Brent, RootFinder, RootResult,
    SolverOptions,
};

// Module declarations
mod calculator;
pub mod constants;
mod error;
mod geometry;
mod params;
mod root_finding;
