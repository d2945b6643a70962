//! World-level settings
//!
//! The axis-aligned bounds every ball is kept inside of, and the largest
//! radius a ball may have (which sizes the spatial partition)

use super::states::NVec2;

#[derive(Debug, Clone)]
pub struct World {
    pub min_range: NVec2,     // lower-left corner of the pit
    pub max_range: NVec2,     // upper-right corner of the pit
    pub max_ball_radius: f64, // largest radius add_ball will accept
}

impl World {
    pub fn new(min_range: NVec2, max_range: NVec2, max_ball_radius: f64) -> Self {
        Self {
            min_range,
            max_range,
            max_ball_radius,
        }
    }

    /// Largest separation at which two balls can still touch
    pub fn max_interaction_distance(&self) -> f64 {
        2.0 * self.max_ball_radius
    }

    /// Bounds are non-empty on both axes and the radius is usable
    pub fn is_valid(&self) -> bool {
        let extent = self.max_range - self.min_range;
        extent.x > 0.0
            && extent.y > 0.0
            && extent.iter().all(|e| e.is_finite())
            && self.max_ball_radius > 0.0
            && self.max_ball_radius.is_finite()
    }

    /// Whether `p` lies inside the closed bounds
    pub fn contains(&self, p: &NVec2) -> bool {
        p.x >= self.min_range.x
            && p.x <= self.max_range.x
            && p.y >= self.min_range.y
            && p.y <= self.max_range.y
    }
}
