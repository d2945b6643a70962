//! The ball solver: owns every ball and advances the pit by fixed steps.
//!
//! One call to [`BallSolver::solve`] runs, in order:
//! 1. a wall pass over every ball,
//! 2. up to `collision_iterations` sweeps of ball-ball contact resolution,
//! 3. the gravity kick,
//! 4. the position drift (re-registering every ball with the partition).
//!
//! The sweep cap bounds the cost of a step; dense piles may leave a step
//! still slightly overlapping, which the next step keeps working on.

use log::trace;

use super::collision::{detect_contact, resolve_normal_velocity, resolve_walls, separation_offsets};
use super::engine::World;
use super::error::SolverError;
use super::integrator::{apply_gravity, drift_positions};
use super::params::Parameters;
use super::spatial_partition::SpatialPartition;
use super::states::{Balls, NVec2};

/// What one `solve` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub sweeps: usize,   // collision sweeps run
    pub contacts: usize, // overlapping pairs resolved across all sweeps
    pub converged: bool, // last sweep found no overlap
}

#[derive(Debug, Clone)]
pub struct BallSolver {
    world: World,
    parameters: Parameters,
    balls: Balls,
    partition: SpatialPartition,
    scratch: Vec<usize>,
}

impl BallSolver {
    /// Empty pit over `world` with the given gravity / restitution settings
    pub fn new(world: World, parameters: Parameters) -> Result<Self, SolverError> {
        if !world.is_valid() {
            return Err(SolverError::InvalidWorld);
        }
        let partition = SpatialPartition::new(
            world.min_range,
            world.max_range,
            world.max_interaction_distance(),
        );

        Ok(Self {
            world,
            parameters,
            balls: Balls::new(),
            partition,
            scratch: Vec::new(),
        })
    }

    /// Append a ball and return its id (ids are handed out in insertion order).
    ///
    /// Mass and radius must be positive and finite, the radius no larger than
    /// the world's `max_ball_radius`, and the centre inside the world bounds.
    pub fn add_ball(&mut self, position: NVec2, velocity: NVec2, mass: f64, radius: f64) -> Result<usize, SolverError> {
        let valid = mass > 0.0
            && mass.is_finite()
            && radius > 0.0
            && radius <= self.world.max_ball_radius
            && velocity.iter().all(|c| c.is_finite());
        if !valid {
            return Err(SolverError::InvalidBall { mass, radius });
        }
        if !self.world.contains(&position) {
            return Err(SolverError::OutOfBounds { position });
        }

        let id = self.balls.push(position, velocity, mass, radius);
        self.partition.update(id, &position);
        Ok(id)
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn ball_position(&self, index: usize) -> Result<NVec2, SolverError> {
        self.check_index(index)?;
        Ok(self.balls.positions[index])
    }

    pub fn ball_radius(&self, index: usize) -> Result<f64, SolverError> {
        self.check_index(index)?;
        Ok(self.balls.radii[index])
    }

    pub fn ball_velocity(&self, index: usize) -> Result<NVec2, SolverError> {
        self.check_index(index)?;
        Ok(self.balls.velocities[index])
    }

    pub fn ball_mass(&self, index: usize) -> Result<f64, SolverError> {
        self.check_index(index)?;
        Ok(self.balls.masses[index])
    }

    /// Add `delta` straight onto the ball's velocity (an impulse already
    /// divided by mass by the caller).
    pub fn add_velocity_to_ball(&mut self, index: usize, delta: NVec2) -> Result<(), SolverError> {
        self.check_index(index)?;
        self.balls.velocities[index] += delta;
        Ok(())
    }

    /// Turn a drag gesture from `from` to `to` lasting `seconds` into a
    /// velocity change on `index`. Returns the applied delta.
    pub fn apply_drag(&mut self, index: usize, from: NVec2, to: NVec2, seconds: f64) -> Result<NVec2, SolverError> {
        if !(seconds > 0.0 && seconds.is_finite()) {
            return Err(SolverError::InvalidTimestep(seconds));
        }
        let delta = (to - from) / seconds;
        self.add_velocity_to_ball(index, delta)?;
        Ok(delta)
    }

    /// The ball whose disc contains `point`, closest centre first
    pub fn ball_at(&self, point: &NVec2) -> Option<usize> {
        self.partition
            .nearby(point)
            .into_iter()
            .map(|id| (id, (self.balls.positions[id] - point).norm_squared()))
            .filter(|&(id, d2)| d2 <= self.balls.radii[id] * self.balls.radii[id])
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Advance the whole pit by exactly `timestep` seconds.
    pub fn solve(&mut self, timestep: f64) -> Result<SolveStats, SolverError> {
        if !(timestep >= 0.0 && timestep.is_finite()) {
            return Err(SolverError::InvalidTimestep(timestep));
        }
        debug_assert!(self.balls.is_consistent());

        self.wall_pass();
        let stats = self.collision_pass();

        apply_gravity(&mut self.balls, self.parameters.gravity, timestep);

        let partition = &mut self.partition;
        drift_positions(&mut self.balls, timestep, |id, x| partition.update(id, x));

        Ok(stats)
    }

    fn wall_pass(&mut self) {
        let restitution = self.parameters.restitution;
        for i in 0..self.balls.len() {
            resolve_walls(
                &mut self.balls.positions[i],
                &mut self.balls.velocities[i],
                self.balls.radii[i],
                &self.world,
                restitution,
            );
        }
    }

    fn collision_pass(&mut self) -> SolveStats {
        let mut stats = SolveStats::default();
        let n = self.balls.len();

        for _ in 0..self.parameters.collision_iterations {
            let mut found = false;

            for i in 0..n {
                // take the buffer so the partition can be updated mid-sweep
                let mut nearby = std::mem::take(&mut self.scratch);
                self.partition.nearby_into(&self.balls.positions[i], &mut nearby);

                for &j in nearby.iter() {
                    if j == i {
                        continue;
                    }
                    if self.resolve_pair(i, j) {
                        found = true;
                        stats.contacts += 1;
                    }
                }

                self.scratch = nearby;
            }

            stats.sweeps += 1;
            if !found {
                stats.converged = true;
                break;
            }
        }

        if !stats.converged && n > 1 {
            trace!(
                "collision loop hit its cap of {} sweeps ({} contacts)",
                stats.sweeps,
                stats.contacts
            );
        }
        stats
    }

    /// Separate and bounce one pair; returns whether they overlapped
    fn resolve_pair(&mut self, a: usize, b: usize) -> bool {
        let balls = &mut self.balls;
        let Some(contact) = detect_contact(
            &balls.positions[a],
            balls.radii[a],
            &balls.positions[b],
            balls.radii[b],
        ) else {
            return false;
        };

        let (mass_a, mass_b) = (balls.masses[a], balls.masses[b]);
        let (offset_a, offset_b) = separation_offsets(&contact, mass_a, mass_b);
        balls.positions[a] += offset_a;
        balls.positions[b] += offset_b;

        // the push may have shoved either ball back through a wall
        let restitution = self.parameters.restitution;
        for id in [a, b] {
            resolve_walls(
                &mut balls.positions[id],
                &mut balls.velocities[id],
                balls.radii[id],
                &self.world,
                restitution,
            );
            self.partition.update(id, &balls.positions[id]);
        }

        let (vel_a, vel_b) = pair_mut(&mut balls.velocities, a, b);
        resolve_normal_velocity(&contact.normal, vel_a, mass_a, vel_b, mass_b, restitution);
        true
    }

    pub fn total_momentum(&self) -> NVec2 {
        self.balls.total_momentum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.balls.kinetic_energy()
    }

    /// Deepest overlap between any two balls (0 when none touch)
    pub fn max_penetration(&self) -> f64 {
        let mut deepest: f64 = 0.0;
        for i in 0..self.balls.len() {
            for j in self.partition.nearby(&self.balls.positions[i]) {
                if j <= i {
                    continue;
                }
                if let Some(c) = detect_contact(
                    &self.balls.positions[i],
                    self.balls.radii[i],
                    &self.balls.positions[j],
                    self.balls.radii[j],
                ) {
                    deepest = deepest.max(c.depth);
                }
            }
        }
        deepest
    }

    /// Every ball centre, indexed by id (for renderers)
    pub fn positions(&self) -> &[NVec2] {
        &self.balls.positions
    }

    /// Every ball radius, indexed by id (for renderers)
    pub fn radii(&self) -> &[f64] {
        &self.balls.radii
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn partition(&self) -> &SpatialPartition {
        &self.partition
    }

    fn check_index(&self, index: usize) -> Result<(), SolverError> {
        let count = self.balls.len();
        if index < count {
            Ok(())
        } else {
            Err(SolverError::InvalidIndex { index, count })
        }
    }
}

/// Two distinct mutable elements of one slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pit() -> BallSolver {
        let world = World::new(NVec2::new(-1.0, -1.0), NVec2::new(1.0, 1.0), 0.2);
        BallSolver::new(world, Parameters::default()).unwrap()
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut items = [1, 2, 3, 4];
        let (a, b) = pair_mut(&mut items, 3, 1);
        assert_eq!((*a, *b), (4, 2));
        *a = 40;
        *b = 20;
        assert_eq!(items, [1, 20, 3, 40]);
    }

    #[test]
    fn ball_at_picks_closest_containing_centre() {
        let mut solver = pit();
        let far = solver.add_ball(NVec2::new(0.0, 0.0), NVec2::zeros(), 1.0, 0.2).unwrap();
        let near = solver.add_ball(NVec2::new(0.15, 0.0), NVec2::zeros(), 1.0, 0.2).unwrap();

        assert_eq!(solver.ball_at(&NVec2::new(0.14, 0.0)), Some(near));
        assert_eq!(solver.ball_at(&NVec2::new(-0.1, 0.0)), Some(far));
        assert_eq!(solver.ball_at(&NVec2::new(-0.8, 0.8)), None);
    }

    #[test]
    fn separated_pit_converges_in_one_sweep() {
        let mut solver = pit();
        solver.add_ball(NVec2::new(-0.5, 0.0), NVec2::zeros(), 1.0, 0.1).unwrap();
        solver.add_ball(NVec2::new(0.5, 0.0), NVec2::zeros(), 1.0, 0.1).unwrap();

        let stats = solver.solve(1.0 / 120.0).unwrap();
        assert_eq!(stats, SolveStats { sweeps: 1, contacts: 0, converged: true });
    }
}
