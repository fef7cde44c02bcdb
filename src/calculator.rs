//! Mean closure temperature (Dodson, 1973) and peak temperature (Faak et al.,
//! 2014) for a mineral cooling through a diffusion process.

use crate::constants::{
    CLOSURE_INITIAL_GUESS_K, GAS_CONSTANT, KELVIN_OFFSET, KJ_TO_J, MICRON_TO_METERS,
    PEAK_INITIAL_GUESS_K, SECONDS_PER_YEAR,
};
use crate::error::{ClosureError, ClosureResult};
use crate::geometry::Geometry;
use crate::root_finding::{Brent, RootFinder};
use serde::Serialize;

/// A solved temperature together with solver diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureSolution {
    pub kelvin: f64,
    pub celsius: f64,
    /// Residual of the governing equation at `kelvin`
    pub residual: f64,
    pub iterations: usize,
}

/// One immutable set of diffusion parameters.
///
/// * `activation_energy`: E, kJ/mol
/// * `pre_exponential_factor`: D0, m²/s
/// * `cooling_rate`: s, °C/yr
/// * `grain_radius`: a, micron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosureCalculator {
    activation_energy: f64,
    pre_exponential_factor: f64,
    cooling_rate: f64,
    grain_radius: f64,
    geometry: Geometry,
    a_factor: f64,
    m_factor: f64,
}

fn require_positive(name: &'static str, value: f64) -> ClosureResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ClosureError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

impl ClosureCalculator {
    /// Build a calculator from a geometry name (`sphere`, `cylinder`, `plane`,
    /// any case).
    pub fn new(
        activation_energy: f64,
        pre_exponential_factor: f64,
        cooling_rate: f64,
        grain_radius: f64,
        geometry: &str,
    ) -> ClosureResult<Self> {
        let geometry: Geometry = geometry.parse()?;
        Self::with_geometry(
            activation_energy,
            pre_exponential_factor,
            cooling_rate,
            grain_radius,
            geometry,
        )
    }

    pub fn with_geometry(
        activation_energy: f64,
        pre_exponential_factor: f64,
        cooling_rate: f64,
        grain_radius: f64,
        geometry: Geometry,
    ) -> ClosureResult<Self> {
        require_positive("activation_energy", activation_energy)?;
        require_positive("pre_exponential_factor", pre_exponential_factor)?;
        require_positive("grain_radius", grain_radius)?;
        // Negative rates are let through; they leave the residuals undefined and
        // surface as solver divergence.
        if !cooling_rate.is_finite() || cooling_rate == 0.0 {
            return Err(ClosureError::InvalidParameter {
                name: "cooling_rate",
                value: cooling_rate,
                reason: "must be finite and non-zero",
            });
        }

        Ok(Self {
            activation_energy,
            pre_exponential_factor,
            cooling_rate,
            grain_radius,
            geometry,
            a_factor: geometry.dodson_a(),
            m_factor: geometry.ganguly_m(),
        })
    }

    pub fn activation_energy(&self) -> f64 {
        self.activation_energy
    }

    pub fn pre_exponential_factor(&self) -> f64 {
        self.pre_exponential_factor
    }

    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    pub fn grain_radius(&self) -> f64 {
        self.grain_radius
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Dodson geometric factor A
    pub fn a_factor(&self) -> f64 {
        self.a_factor
    }

    /// Ganguly & Tirone geometric factor M
    pub fn m_factor(&self) -> f64 {
        self.m_factor
    }

    fn energy_j(&self) -> f64 {
        self.activation_energy * KJ_TO_J
    }

    fn rate_per_second(&self) -> f64 {
        self.cooling_rate / SECONDS_PER_YEAR
    }

    fn radius_m(&self) -> f64 {
        self.grain_radius * MICRON_TO_METERS
    }

    /// Arrhenius diffusivity D(T) = D0·exp(−E/(R·T)) in m²/s
    pub fn diffusivity(&self, temperature_k: f64) -> f64 {
        self.pre_exponential_factor * (-self.energy_j() / (GAS_CONSTANT * temperature_k)).exp()
    }

    /// Residual of Dodson's closure temperature equation at `temperature_k`.
    ///
    /// NaN when the logarithm argument is not positive.
    pub fn closure_residual(&self, temperature_k: f64) -> f64 {
        let energy = self.energy_j();
        let radius = self.radius_m();
        let log_arg = self.a_factor * GAS_CONSTANT * temperature_k.powi(2) * self.pre_exponential_factor
            / (energy * self.rate_per_second() * radius * radius);
        if log_arg <= 0.0 {
            return f64::NAN;
        }
        energy / (GAS_CONSTANT * temperature_k) - log_arg.ln()
    }

    /// Residual of Faak et al. (2014) Eq. 6 at `temperature_k`.
    ///
    /// NaN when the square root argument is negative.
    pub fn peak_residual(&self, temperature_k: f64) -> f64 {
        let radius = self.radius_m();
        let sqrt_arg = self.m_factor * radius * radius * self.energy_j() * self.rate_per_second()
            / (self.diffusivity(temperature_k) * GAS_CONSTANT);
        if sqrt_arg < 0.0 {
            return f64::NAN;
        }
        sqrt_arg.sqrt() - temperature_k
    }

    /// Mean closure temperature in °C
    pub fn mean_closure_temperature(&self) -> ClosureResult<f64> {
        self.solve_closure().map(|solution| solution.celsius)
    }

    /// Peak temperature T0 in °C
    pub fn peak_temperature(&self) -> ClosureResult<f64> {
        self.solve_peak().map(|solution| solution.celsius)
    }

    pub fn solve_closure(&self) -> ClosureResult<TemperatureSolution> {
        self.solve_closure_with(&Brent::default())
    }

    pub fn solve_peak(&self) -> ClosureResult<TemperatureSolution> {
        self.solve_peak_with(&Brent::default())
    }

    pub fn solve_closure_with(&self, solver: &impl RootFinder) -> ClosureResult<TemperatureSolution> {
        solve(solver, &|x| self.closure_residual(x), CLOSURE_INITIAL_GUESS_K)
    }

    pub fn solve_peak_with(&self, solver: &impl RootFinder) -> ClosureResult<TemperatureSolution> {
        solve(solver, &|x| self.peak_residual(x), PEAK_INITIAL_GUESS_K)
    }
}

fn solve(
    solver: &impl RootFinder,
    residual: &dyn Fn(f64) -> f64,
    guess_k: f64,
) -> ClosureResult<TemperatureSolution> {
    let result = solver.find_root(residual, guess_k)?;

    if !(result.root.is_finite() && result.root > 0.0 && result.residual.is_finite()) {
        return Err(ClosureError::divergence(
            solver.name(),
            format!(
                "converged to an unphysical temperature {} K (residual {})",
                result.root, result.residual
            ),
        ));
    }

    Ok(TemperatureSolution {
        kelvin: result.root,
        celsius: result.root - KELVIN_OFFSET,
        residual: result.residual,
        iterations: result.iterations,
    })
}
