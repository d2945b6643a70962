pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod logging;

pub use simulation::states::{Balls, NVec2};
pub use simulation::engine::World;
pub use simulation::params::{Parameters, MAX_COLLISION_ITERATIONS};
pub use simulation::error::SolverError;
pub use simulation::spatial_partition::SpatialPartition;
pub use simulation::solver::{BallSolver, SolveStats};
pub use simulation::stepper::FixedStepper;
pub use simulation::scenario::Scenario;

pub use configuration::config::{BallConfig, ConfigError, FillConfig, ParametersConfig, ScenarioConfig, WorldConfig};

pub use benchmark::benchmark::{bench_broad_phase, bench_solve};
