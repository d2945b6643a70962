//! Build fully-initialized ball pit scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - numerical parameters (`Parameters`)
//! - the solver with every ball already added (`BallSolver`)
//! - a fixed-step driver matching the configured timestep (`FixedStepper`)

use log::debug;

use crate::configuration::config::{to_vec2, ConfigError, FillConfig, ScenarioConfig};
use crate::simulation::engine::World;
use crate::simulation::params::Parameters;
use crate::simulation::solver::BallSolver;
use crate::simulation::states::NVec2;
use crate::simulation::stepper::FixedStepper;

/// Catch-up limit handed to the stepper built for a scenario
pub const MAX_STEPS_PER_FRAME: usize = 8;

/// A fully-initialized simulation, ready to be stepped
pub struct Scenario {
    pub parameters: Parameters,
    pub solver: BallSolver,
    pub stepper: FixedStepper,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        // World (runtime) from WorldConfig
        let world = World::new(
            to_vec2("world.min", &cfg.world.min)?,
            to_vec2("world.max", &cfg.world.max)?,
            cfg.world.max_ball_radius,
        );

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            gravity: p_cfg.gravity,
            restitution: p_cfg.restitution,
            collision_iterations: p_cfg.collision_iterations,
            timestep: p_cfg.timestep,
            steps: p_cfg.steps,
        };

        let mut solver = BallSolver::new(world, parameters.clone())?;

        // Explicit balls first so their ids match their order in the file
        for (i, bc) in cfg.balls.iter().enumerate() {
            let x = to_vec2(&format!("balls[{i}].x"), &bc.x)?;
            let v = to_vec2(&format!("balls[{i}].v"), &bc.v)?;
            solver.add_ball(x, v, bc.m, bc.radius)?;
        }

        if let Some(fill) = &cfg.fill {
            add_fill(&mut solver, fill)?;
        }

        let stepper = FixedStepper::new(parameters.timestep, MAX_STEPS_PER_FRAME)?;

        debug!(
            "built scenario: {} balls, partition {:?} buckets of {:.3}",
            solver.ball_count(),
            solver.partition().dimensions(),
            solver.partition().cell_size()
        );

        Ok(Self {
            parameters,
            solver,
            stepper,
        })
    }
}

/// Lay a rows × cols lattice of balls upward from the pit floor.
///
/// Neighbouring centres are one diameter apart (plus a small gap); positions
/// are nudged by a deterministic sin-based jitter and clamped inside the
/// walls, so a lattice too large for the pit simply starts out overlapping.
fn add_fill(solver: &mut BallSolver, fill: &FillConfig) -> Result<(), ConfigError> {
    if fill.rows == 0 || fill.cols == 0 {
        return Err(ConfigError::EmptyFill);
    }
    let world = solver.world().clone();
    let r = fill.radius;
    let pitch = 2.0 * r * 1.05;

    for row in 0..fill.rows {
        for col in 0..fill.cols {
            let k = (row * fill.cols + col) as f64;
            let jitter = (k * 0.37).sin() * fill.jitter;

            let x = world.min_range.x + r + col as f64 * pitch + jitter;
            let y = world.min_range.y + r + row as f64 * pitch;
            let x = x.clamp(world.min_range.x + r, world.max_range.x - r);
            let y = y.clamp(world.min_range.y + r, world.max_range.y - r);

            solver.add_ball(NVec2::new(x, y), NVec2::zeros(), fill.mass, r)?;
        }
    }
    Ok(())
}
