//! Contract violations reported by the solver.

use thiserror::Error;

use super::states::NVec2;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("ball index {index} out of range (ball count {count})")]
    InvalidIndex { index: usize, count: usize },

    #[error("ball needs positive finite mass and a radius within the world maximum (mass {mass}, radius {radius})")]
    InvalidBall { mass: f64, radius: f64 },

    #[error("position ({}, {}) lies outside the world bounds", .position.x, .position.y)]
    OutOfBounds { position: NVec2 },

    #[error("world bounds must be non-empty and max ball radius positive")]
    InvalidWorld,

    #[error("timestep must be finite and non-negative, got {0}")]
    InvalidTimestep(f64),
}
