//! Numerical and physical parameters for the solver
//!
//! `Parameters` holds runtime settings:
//! - gravity along +y and the global restitution coefficient,
//! - the cap on collision-resolution sweeps per `solve`,
//! - the fixed step size and headless run length used by drivers

/// Number of collision sweeps `solve` performs before giving up on convergence
pub const MAX_COLLISION_ITERATIONS: usize = 6;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub gravity: f64,              // acceleration along +y per second
    pub restitution: f64,          // 0 = fully inelastic, 1 = fully elastic
    pub collision_iterations: usize, // sweep cap for the contact loop
    pub timestep: f64,             // fixed step size fed to solve()
    pub steps: usize,              // headless run length
}

impl Parameters {
    /// Parameters with the given gravity and restitution, default stepping
    pub fn new(gravity: f64, restitution: f64) -> Self {
        Self {
            gravity,
            restitution,
            ..Self::default()
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            gravity: 0.0,
            restitution: 1.0,
            collision_iterations: MAX_COLLISION_ITERATIONS,
            timestep: 1.0 / 120.0,
            steps: 0,
        }
    }
}
