pub mod states;
pub mod params;
pub mod engine;
pub mod error;
pub mod spatial_partition;
pub mod collision;
pub mod integrator;
pub mod solver;
pub mod stepper;
pub mod scenario;
