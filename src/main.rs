use ballpit::logging::{self, LoggingArgs};
use ballpit::{bench_broad_phase, bench_solve};
use ballpit::{Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "ball_pit.yaml")]
    file_name: String,

    /// Override the scenario's step count
    #[arg(long)]
    steps: Option<usize>,

    /// Log diagnostics every this many steps
    #[arg(long, default_value_t = 100)]
    report_every: usize,

    /// Run the benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,

    #[command(flatten)]
    logging: LoggingArgs,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path).with_context(|| format!("failed to open {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::install(&args.logging)?;

    if args.bench {
        bench_broad_phase();
        bench_solve();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let Scenario {
        parameters,
        mut solver,
        mut stepper,
    } = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;

    let steps = args.steps.unwrap_or(parameters.steps);
    info!("running {} balls for {} steps of {}s", solver.ball_count(), steps, parameters.timestep);

    // Headless: feed the stepper exactly one timestep per "frame"
    for step in 1..=steps {
        stepper.advance(&mut solver, parameters.timestep)?;

        if args.report_every > 0 && step % args.report_every == 0 {
            let p = solver.total_momentum();
            info!(
                "step {step:6}: momentum = ({:+.4}, {:+.4}), energy = {:.5}, max overlap = {:.2e}",
                p.x,
                p.y,
                solver.kinetic_energy(),
                solver.max_penetration()
            );
        }
    }

    println!("id,x,y,radius");
    for (i, (x, r)) in solver.positions().iter().zip(solver.radii()).enumerate() {
        println!("{},{:.6},{:.6},{:.4}", i, x.x, x.y, r);
    }

    Ok(())
}
