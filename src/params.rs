use crate::calculator::ClosureCalculator;
use crate::constants::PER_MYR_TO_PER_YEAR;
use crate::error::ClosureResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unit the cooling rate is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingRateUnit {
    /// °C per year
    #[default]
    PerYear,
    /// °C per million years
    PerMyr,
}

impl CoolingRateUnit {
    pub fn to_per_year(self, rate: f64) -> f64 {
        match self {
            CoolingRateUnit::PerYear => rate,
            CoolingRateUnit::PerMyr => rate * PER_MYR_TO_PER_YEAR,
        }
    }
}

/// Serializable parameter set, e.g. read from a JSON file:
///
/// ```json
/// {
///   "activation_energy": 200.0,
///   "pre_exponential_factor": 1e-6,
///   "cooling_rate": 10.0,
///   "grain_radius": 100.0,
///   "geometry": "sphere"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureParams {
    /// kJ/mol
    pub activation_energy: f64,
    /// m²/s
    pub pre_exponential_factor: f64,
    /// °C per `cooling_rate_unit`
    pub cooling_rate: f64,
    /// micron
    pub grain_radius: f64,
    #[serde(default = "default_geometry")]
    pub geometry: String,
    #[serde(default)]
    pub cooling_rate_unit: CoolingRateUnit,
}

fn default_geometry() -> String {
    "sphere".to_string()
}

impl ClosureParams {
    pub fn from_json_str(json: &str) -> ClosureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ClosureResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Cooling rate converted to °C/yr
    pub fn cooling_rate_per_year(&self) -> f64 {
        self.cooling_rate_unit.to_per_year(self.cooling_rate)
    }

    /// Validate the parameters and build a calculator
    pub fn calculator(&self) -> ClosureResult<ClosureCalculator> {
        ClosureCalculator::new(
            self.activation_energy,
            self.pre_exponential_factor,
            self.cooling_rate_per_year(),
            self.grain_radius,
            &self.geometry,
        )
    }
}
