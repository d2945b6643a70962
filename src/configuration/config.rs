//! Configuration types for loading ball pit scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`WorldConfig`]      – pit bounds and the largest allowed ball radius
//! - [`ParametersConfig`] – gravity, restitution and stepping
//! - [`BallConfig`]       – initial state for each explicitly placed ball
//! - [`FillConfig`]       – optional lattice of generated balls
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! world:
//!   min: [-1.0, -1.0]
//!   max: [ 1.0,  1.0]
//!   max_ball_radius: 0.1
//!
//! parameters:
//!   gravity: -9.8            # acceleration along +y
//!   restitution: 0.5         # 0 inelastic .. 1 elastic
//!   timestep: 0.01           # fixed step size
//!   collision_iterations: 6  # optional
//!   steps: 500               # headless run length
//!
//! balls:
//!   - x: [0.0, 0.0]
//!     v: [1.0, 0.0]
//!     m: 1.0
//!     radius: 0.1
//!
//! fill:
//!   rows: 4
//!   cols: 6
//!   radius: 0.05
//!   mass: 1.0
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::error::SolverError;
use crate::simulation::params::MAX_COLLISION_ITERATIONS;
use crate::simulation::states::NVec2;

/// Errors found while turning a config into runtime types
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must have exactly 2 components, got {len}")]
    BadVector { field: String, len: usize },

    #[error("fill lattice needs at least one row and one column")]
    EmptyFill,

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Pit bounds
#[derive(Deserialize, Debug, Clone)]
pub struct WorldConfig {
    pub min: Vec<f64>,        // lower-left corner `[x, y]`
    pub max: Vec<f64>,        // upper-right corner `[x, y]`
    pub max_ball_radius: f64, // sizes the spatial partition
}

/// Global physical and stepping parameters
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub gravity: f64,     // acceleration along +y per second
    pub restitution: f64, // global restitution coefficient
    pub timestep: f64,    // fixed step size
    #[serde(default = "default_collision_iterations")]
    pub collision_iterations: usize, // sweep cap, normally 6
    #[serde(default)]
    pub steps: usize,     // headless run length
}

/// Configuration for a single ball's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BallConfig {
    pub x: Vec<f64>, // initial centre `[x, y]`
    #[serde(default = "zero_vec")]
    pub v: Vec<f64>, // initial velocity `[vx, vy]`
    pub m: f64,      // mass
    pub radius: f64, // radius
}

/// A rows × cols lattice of identical balls filling the pit from the bottom
#[derive(Deserialize, Debug, Clone)]
pub struct FillConfig {
    pub rows: usize,
    pub cols: usize,
    pub radius: f64,
    pub mass: f64,
    #[serde(default)]
    pub jitter: f64, // deterministic sideways offset so stacks do not balance
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub balls: Vec<BallConfig>,
    #[serde(default)]
    pub fill: Option<FillConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}

fn default_collision_iterations() -> usize {
    MAX_COLLISION_ITERATIONS
}

fn zero_vec() -> Vec<f64> {
    vec![0.0, 0.0]
}

/// Convert a `[x, y]` list into an `NVec2`
pub fn to_vec2(field: &str, v: &[f64]) -> Result<NVec2, ConfigError> {
    match v {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(ConfigError::BadVector {
            field: field.to_string(),
            len: v.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
world:
  min: [-1.0, -1.0]
  max: [1.0, 1.0]
  max_ball_radius: 0.1
parameters:
  gravity: -9.8
  restitution: 0.5
  timestep: 0.01
balls:
  - x: [0.0, 0.5]
    m: 1.0
    radius: 0.1
"#;

    #[test]
    fn parses_with_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(cfg.parameters.collision_iterations, 6);
        assert_eq!(cfg.parameters.steps, 0);
        assert_eq!(cfg.balls.len(), 1);
        assert_eq!(cfg.balls[0].v, vec![0.0, 0.0]);
        assert!(cfg.fill.is_none());
    }

    #[test]
    fn vector_length_is_checked() {
        assert_eq!(to_vec2("x", &[1.0, 2.0]), Ok(NVec2::new(1.0, 2.0)));
        assert_eq!(
            to_vec2("x", &[1.0, 2.0, 3.0]),
            Err(ConfigError::BadVector {
                field: "x".to_string(),
                len: 3
            })
        );
    }

    #[test]
    fn missing_world_is_rejected() {
        assert!(ScenarioConfig::from_yaml_str("parameters: {gravity: 0, restitution: 1, timestep: 0.1}").is_err());
    }
}
