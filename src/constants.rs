//! Physical constants used in closure and peak temperature calculations

/// Universal gas constant in J/(mol·K)
pub const GAS_CONSTANT: f64 = 8.314;

/// Seconds in a (365 day) year, used to turn °C/yr into °C/s
pub const SECONDS_PER_YEAR: f64 = 3600.0 * 24.0 * 365.0;

/// Conversion factor: micron to meters
pub const MICRON_TO_METERS: f64 = 1e-6;

/// Conversion factor: kJ to J
pub const KJ_TO_J: f64 = 1e3;

/// Offset between the Celsius and Kelvin scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Conversion factor: °C/Myr to °C/yr
pub const PER_MYR_TO_PER_YEAR: f64 = 1e-6;

/// Starting temperature (K) for the Dodson closure temperature solve
///
/// Mineral closure temperatures sit between a few hundred and ~1500 °C, so the
/// bracket search starts in the middle of that window.
pub const CLOSURE_INITIAL_GUESS_K: f64 = 1200.0;

/// Starting temperature (K) for the peak temperature solve (Faak et al. 2014)
pub const PEAK_INITIAL_GUESS_K: f64 = 300.0;

// Root finding defaults

/// Maximum number of root refinement iterations
pub const ROOT_FINDING_MAX_ITER: usize = 100;

/// Maximum number of bracket widening steps around the initial guess
pub const BRACKET_MAX_EXPANSIONS: usize = 60;

/// Absolute tolerance on the root location (K)
pub const ROOT_X_TOLERANCE: f64 = 1e-12;

/// Residual magnitude accepted as an exact root
pub const ROOT_F_TOLERANCE: f64 = 1e-10;

/// Geometric growth factor applied when widening a bracket
pub const BRACKET_GROWTH: f64 = 1.6;

/// Half-width factor of the first bracket: `[guess / f, guess * f]`
pub const BRACKET_INITIAL_FACTOR: f64 = 1.1;
