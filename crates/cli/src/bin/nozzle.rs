use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use motor_design_calculator::config::{
    NozzleRequest, load_nozzle_request, parse_contour_kind, parse_expansion_ratio,
};
use motor_design_calculator::export::nozzle::{
    NozzleReport, render_contour_png, write_contour_csv,
};
use motor_design_calculator::export::write_json;
use motor_design_calculator::nozzle::{ContourKind, ExpansionSource, design_nozzle};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Size a converging-diverging nozzle and sample its divergent wall"
)]
struct Cli {
    /// Request file (TOML, YAML or JSON); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target thrust F (N)
    #[arg(long)]
    thrust: Option<f64>,

    /// Chamber stagnation pressure p0 (Pa)
    #[arg(long)]
    chamber_pressure: Option<f64>,

    /// Exit pressure pe (Pa)
    #[arg(long)]
    exit_pressure: Option<f64>,

    /// Chamber stagnation temperature T0 (K)
    #[arg(long)]
    chamber_temperature: Option<f64>,

    /// Specific heat ratio k
    #[arg(long)]
    k: Option<f64>,

    /// Specific gas constant R (J/(kg·K))
    #[arg(long)]
    gas_constant: Option<f64>,

    /// Wall contour: conica | parabolica (aliases: cone, bell, rao)
    #[arg(long)]
    contour: Option<String>,

    /// Manual expansion ratio; blank or invalid values select the optimum
    #[arg(long)]
    expansion_ratio: Option<String>,

    /// Bell length relative to a 15° cone (percent)
    #[arg(long)]
    bell_length: Option<f64>,

    /// Write the JSON report to this path (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the contour samples as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Render the contour to a PNG
    #[arg(long)]
    plot: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> anyhow::Result<NozzleRequest> {
        let mut request = match &self.config {
            Some(path) => load_nozzle_request(path)
                .with_context(|| format!("loading nozzle request {}", path.display()))?,
            None => NozzleRequest::default(),
        };
        if let Some(v) = self.thrust {
            request.thrust_n = v;
        }
        if let Some(v) = self.chamber_pressure {
            request.chamber_pressure_pa = v;
        }
        if let Some(v) = self.exit_pressure {
            request.exit_pressure_pa = v;
        }
        if let Some(v) = self.chamber_temperature {
            request.chamber_temperature_k = v;
        }
        if let Some(v) = self.k {
            request.specific_heat_ratio = v;
        }
        if let Some(v) = self.gas_constant {
            request.gas_constant_j_kg_k = v;
        }
        if let Some(name) = &self.contour {
            request.contour = parse_contour_kind(name);
        }
        if let Some(text) = &self.expansion_ratio {
            request.expansion_ratio = parse_expansion_ratio(text);
        }
        if let Some(v) = self.bell_length {
            request.bell_length_percent = v;
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

    let result = design_nozzle(&request.to_input()).context("designing nozzle")?;
    let params = result.parameters();
    let report = NozzleReport::new(&result);

    if let Some(path) = &cli.csv {
        write_contour_csv(path, &report.geometry)
            .with_context(|| format!("writing contour CSV {}", path.display()))?;
    }
    if let Some(path) = &cli.plot {
        render_contour_png(path, &report.geometry, (1024, 480))
            .with_context(|| format!("rendering contour plot {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        write_json(path, &report)
            .with_context(|| format!("writing JSON report {}", path.display()))?;
        if path.as_path() == Path::new("-") {
            return Ok(());
        }
    }

    let contour = match result.contour_kind {
        ContourKind::Conical => "conical (15°)",
        ContourKind::Parabolic => "parabolic (Rao bell)",
    };
    let source = match result.exit.source {
        ExpansionSource::Manual => "manual",
        ExpansionSource::Optimal => "optimal",
    };
    println!("Nozzle design ({contour})");
    println!("  Exhaust velocity: {:.2} m/s", params.exhaust_velocity_m_s);
    println!("  Mass flow:        {:.4} kg/s", params.mass_flow_kg_s);
    println!("  Throat temp:      {:.2} K", params.throat_temperature_k);
    println!("  Throat velocity:  {:.2} m/s", params.throat_velocity_m_s);
    println!(
        "  Throat:           {:.3} mm radius, {:.4e} m² area",
        params.throat_radius_mm, params.throat_area_m2
    );
    println!(
        "  Exit:             {:.3} mm radius, {:.4e} m² area",
        params.exit_radius_mm, params.exit_area_m2
    );
    println!("  Expansion ratio:  {:.3} ({source})", params.expansion_ratio);
    println!("  Divergent length: {:.3} mm", params.length_mm);
    println!("  Contour samples:  {}", report.geometry.len());
    Ok(())
}
