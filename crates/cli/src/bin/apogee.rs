use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use motor_design_calculator::config::{PerformanceRequest, load_performance_request};
use motor_design_calculator::export::performance::PerformanceReport;
use motor_design_calculator::export::write_json;
use motor_design_calculator::performance::solve_apogee;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Find the average thrust and motor class that reach a target apogee"
)]
struct Cli {
    /// Request file (TOML, YAML or JSON); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target apogee (m)
    #[arg(long)]
    target: Option<f64>,

    /// Burn time (s)
    #[arg(long)]
    burn_time: Option<f64>,

    /// Rocket mass without propellant (kg)
    #[arg(long)]
    empty_mass: Option<f64>,

    /// Propellant mass as a percentage of the empty mass
    #[arg(long)]
    propellant_percent: Option<f64>,

    /// Body diameter (cm)
    #[arg(long)]
    diameter: Option<f64>,

    /// Drag coefficient Cd
    #[arg(long)]
    cd: Option<f64>,

    /// Write the JSON report to this path (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> anyhow::Result<PerformanceRequest> {
        let mut request = match &self.config {
            Some(path) => load_performance_request(path)
                .with_context(|| format!("loading apogee request {}", path.display()))?,
            None => PerformanceRequest::default(),
        };
        let overrides = [
            (self.target, &mut request.target_apogee_m),
            (self.burn_time, &mut request.burn_time_s),
            (self.empty_mass, &mut request.empty_mass_kg),
            (self.propellant_percent, &mut request.propellant_mass_percent),
            (self.diameter, &mut request.diameter_cm),
            (self.cd, &mut request.drag_coefficient),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }
        Ok(request)
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let request = cli.request()?;

    let result = solve_apogee(&request.to_input()).context("solving for target apogee")?;

    if let Some(path) = &cli.json {
        write_json(path, &PerformanceReport::new(&result))
            .with_context(|| format!("writing JSON report {}", path.display()))?;
        if path.as_path() == Path::new("-") {
            return Ok(());
        }
    }

    println!(
        "Target apogee {:.1} m ({} after {} iterations)",
        request.target_apogee_m,
        if result.converged { "converged" } else { "not converged" },
        result.iterations
    );
    println!("  Motor class:       {}", result.motor_class);
    println!("  Average thrust:    {:.2} N", result.average_thrust_n);
    println!("  Total impulse:     {:.2} N·s", result.total_impulse_ns);
    println!("  Specific impulse:  {:.1} s", result.specific_impulse_s);
    println!("  Propellant mass:   {:.3} kg", result.propellant_mass_kg);
    println!("  Max acceleration:  {:.2} g", result.max_acceleration_g);
    println!(
        "  Burnout:           {:.1} m at {:.1} m/s (Mach {:.2})",
        result.burnout_altitude_m, result.burnout_velocity_m_s, result.mach_burnout
    );
    println!(
        "  Apogee:            {:.1} m after {:.1} s",
        result.peak_altitude_m, result.time_to_apogee_s
    );
    println!("  Drag number N:     {:.1}", result.drag_influence_number);
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}
