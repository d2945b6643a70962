//! Core state types for the ball pit.
//!
//! Balls are not individual objects: each ball is an index into parallel
//! attribute vectors (`Balls`), id = insertion order, never reused.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Structure-of-arrays storage for every ball in the pit
#[derive(Debug, Clone, Default)]
pub struct Balls {
    pub positions: Vec<NVec2>,  // world-space centres
    pub velocities: Vec<NVec2>, // world-space linear velocities
    pub masses: Vec<f64>,       // immutable after creation
    pub radii: Vec<f64>,        // immutable after creation
}

impl Balls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            velocities: Vec::with_capacity(n),
            masses: Vec::with_capacity(n),
            radii: Vec::with_capacity(n),
        }
    }

    /// Append one ball and return its id
    pub fn push(&mut self, position: NVec2, velocity: NVec2, mass: f64, radius: f64) -> usize {
        let id = self.positions.len();
        self.positions.push(position);
        self.velocities.push(velocity);
        self.masses.push(mass);
        self.radii.push(radius);
        debug_assert!(self.is_consistent());
        id
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All four attribute vectors describe the same number of balls
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        self.velocities.len() == n && self.masses.len() == n && self.radii.len() == n
    }

    /// Σ m·v over all balls
    pub fn total_momentum(&self) -> NVec2 {
        self.velocities
            .iter()
            .zip(self.masses.iter())
            .fold(NVec2::zeros(), |acc, (v, m)| acc + *m * v)
    }

    /// Σ ½·m·|v|² over all balls
    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .zip(self.masses.iter())
            .map(|(v, m)| 0.5 * m * v.norm_squared())
            .sum()
    }
}
