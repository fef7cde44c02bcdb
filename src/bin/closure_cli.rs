use clap::{Args, Parser, Subcommand, ValueEnum};
use closure_temperature::{
    Bisection, Brent, ClosureCalculator, ClosureParams, CoolingRateUnit, Geometry, RootFinder,
    TemperatureSolution,
};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "closure-t")]
#[command(version)]
#[command(about = "Mean closure temperature and peak temperature from diffusion kinetics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mean closure temperature (Dodson, 1973)
    Closure(SolveArgs),

    /// Peak temperature T0 (Faak et al., 2014, Eq. 6)
    Peak(SolveArgs),

    /// Both closure and peak temperature
    Solve(SolveArgs),

    /// List the diffusion geometries and their geometric factors
    Geometries,
}

#[derive(Args)]
struct SolveArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Root finding method
    #[arg(long, default_value = "brent")]
    method: Method,

    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    output: OutputFormat,
}

#[derive(Args)]
struct ParamArgs {
    /// JSON parameter file (replaces the individual parameter flags)
    #[arg(long, conflicts_with_all = ["activation_energy", "d0", "cooling_rate", "radius"])]
    params: Option<PathBuf>,

    /// Activation energy (kJ/mol)
    #[arg(short = 'e', long, required_unless_present = "params")]
    activation_energy: Option<f64>,

    /// Diffusivity pre-exponential factor (m²/s)
    #[arg(short = 'd', long, required_unless_present = "params")]
    d0: Option<f64>,

    /// Cooling rate (°C per --rate-unit)
    #[arg(short = 's', long, required_unless_present = "params", allow_hyphen_values = true)]
    cooling_rate: Option<f64>,

    /// Grain radius (micron)
    #[arg(short = 'a', long, required_unless_present = "params")]
    radius: Option<f64>,

    /// Diffusion geometry (sphere, cylinder, plane)
    #[arg(short = 'g', long, default_value = "sphere")]
    geometry: String,

    /// Cooling rate unit
    #[arg(long, default_value = "per-year")]
    rate_unit: RateUnit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Brent,
    Bisection,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RateUnit {
    PerYear,
    PerMyr,
}

impl From<RateUnit> for CoolingRateUnit {
    fn from(unit: RateUnit) -> Self {
        match unit {
            RateUnit::PerYear => CoolingRateUnit::PerYear,
            RateUnit::PerMyr => CoolingRateUnit::PerMyr,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    activation_energy: f64,
    pre_exponential_factor: f64,
    cooling_rate: f64,
    grain_radius: f64,
    geometry: Geometry,
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    closure: Option<TemperatureSolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peak: Option<TemperatureSolution>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<ClosureParams, Box<dyn Error>> {
        if let Some(path) = &self.params {
            return Ok(ClosureParams::from_json_file(path)?);
        }

        let missing = |flag: &str| format!("missing required argument --{flag}");
        Ok(ClosureParams {
            activation_energy: self.activation_energy.ok_or_else(|| missing("activation-energy"))?,
            pre_exponential_factor: self.d0.ok_or_else(|| missing("d0"))?,
            cooling_rate: self.cooling_rate.ok_or_else(|| missing("cooling-rate"))?,
            grain_radius: self.radius.ok_or_else(|| missing("radius"))?,
            geometry: self.geometry.clone(),
            cooling_rate_unit: self.rate_unit.into(),
        })
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = dispatch(cli.command) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Closure(args) => run(&args, true, false)?,
        Commands::Peak(args) => run(&args, false, true)?,
        Commands::Solve(args) => run(&args, true, true)?,
        Commands::Geometries => display_geometries(),
    }

    Ok(())
}

fn run(args: &SolveArgs, closure: bool, peak: bool) -> Result<(), Box<dyn Error>> {
    let calculator = args.params.resolve()?.calculator()?;

    let report = match args.method {
        Method::Brent => solve_report(&calculator, &Brent::default(), closure, peak)?,
        Method::Bisection => solve_report(&calculator, &Bisection::default(), closure, peak)?,
    };

    display_report(&report, args.output)
}

fn solve_report(
    calculator: &ClosureCalculator,
    solver: &impl RootFinder,
    closure: bool,
    peak: bool,
) -> Result<Report, Box<dyn Error>> {
    let closure = if closure {
        Some(calculator.solve_closure_with(solver)?)
    } else {
        None
    };
    let peak = if peak {
        Some(calculator.solve_peak_with(solver)?)
    } else {
        None
    };

    Ok(Report {
        activation_energy: calculator.activation_energy(),
        pre_exponential_factor: calculator.pre_exponential_factor(),
        cooling_rate: calculator.cooling_rate(),
        grain_radius: calculator.grain_radius(),
        geometry: calculator.geometry(),
        method: solver.name(),
        closure,
        peak,
    })
}

fn display_report(report: &Report, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }

        OutputFormat::Csv => {
            println!("quantity,celsius,kelvin,residual,iterations");
            let rows = [("closure", report.closure), ("peak", report.peak)];
            for (name, solution) in rows {
                if let Some(s) = solution {
                    println!(
                        "{},{:.4},{:.4},{:.3e},{}",
                        name, s.celsius, s.kelvin, s.residual, s.iterations
                    );
                }
            }
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║       CLOSURE TEMPERATURE RESULTS      ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ E:             {:>12.3} kJ/mol     ║", report.activation_energy);
            println!("║ D0:            {:>12.3e} m²/s       ║", report.pre_exponential_factor);
            println!("║ Cooling rate:  {:>12.4e} °C/yr      ║", report.cooling_rate);
            println!("║ Grain radius:  {:>12.3} µm         ║", report.grain_radius);
            println!("║ Geometry:      {:>12}            ║", report.geometry);
            println!("║ Method:        {:>12}            ║", report.method);
            println!("╠════════════════════════════════════════╣");
            if let Some(s) = report.closure {
                println!("║ Closure Tc:    {:>12.2} °C         ║", s.celsius);
            }
            if let Some(s) = report.peak {
                println!("║ Peak T0:       {:>12.2} °C         ║", s.celsius);
            }
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_geometries() {
    println!("geometry,A,M");
    for geometry in Geometry::ALL {
        println!("{},{},{}", geometry, geometry.dodson_a(), geometry.ganguly_m());
    }
}
