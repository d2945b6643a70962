//! Fixed-timestep driver for frame-paced callers
//!
//! Frame time is banked in an accumulator and spent in whole `timestep`
//! chunks, so the solver always sees the same step size no matter how
//! irregular the frame rate is.

use log::warn;

use super::error::SolverError;
use super::solver::BallSolver;

#[derive(Debug, Clone)]
pub struct FixedStepper {
    timestep: f64,                // seconds per solve() call
    max_steps_per_advance: usize, // catch-up limit per frame
    accumulator: f64,             // banked, not yet simulated time
    steps_taken: u64,
}

impl FixedStepper {
    pub fn new(timestep: f64, max_steps_per_advance: usize) -> Result<Self, SolverError> {
        if !(timestep > 0.0 && timestep.is_finite()) {
            return Err(SolverError::InvalidTimestep(timestep));
        }
        Ok(Self {
            timestep,
            max_steps_per_advance: max_steps_per_advance.max(1),
            accumulator: 0.0,
            steps_taken: 0,
        })
    }

    /// Bank `frame_seconds` and run as many whole steps as it covers.
    ///
    /// At most `max_steps_per_advance` steps run; any time still banked past
    /// that is dropped so a slow frame cannot snowball. Returns steps run.
    pub fn advance(&mut self, solver: &mut BallSolver, frame_seconds: f64) -> Result<usize, SolverError> {
        if !(frame_seconds >= 0.0 && frame_seconds.is_finite()) {
            return Err(SolverError::InvalidTimestep(frame_seconds));
        }
        self.accumulator += frame_seconds;

        let mut steps = 0;
        while self.accumulator >= self.timestep && steps < self.max_steps_per_advance {
            solver.solve(self.timestep)?;
            self.accumulator -= self.timestep;
            steps += 1;
        }

        if self.accumulator >= self.timestep {
            let dropped = self.accumulator - self.accumulator % self.timestep;
            warn!(
                "stepper fell behind; dropping {:.4}s after {} steps",
                dropped, steps
            );
            self.accumulator -= dropped;
        }

        self.steps_taken += steps as u64;
        Ok(steps)
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.timestep
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::engine::World;
    use crate::simulation::params::Parameters;
    use crate::simulation::states::NVec2;

    fn empty_solver() -> BallSolver {
        let world = World::new(NVec2::new(-1.0, -1.0), NVec2::new(1.0, 1.0), 0.1);
        BallSolver::new(world, Parameters::new(-9.8, 0.5)).unwrap()
    }

    #[test]
    fn banks_partial_frames() {
        let mut solver = empty_solver();
        let mut stepper = FixedStepper::new(0.25, 8).unwrap();

        assert_eq!(stepper.advance(&mut solver, 0.1).unwrap(), 0);
        assert_eq!(stepper.advance(&mut solver, 0.2).unwrap(), 1);
        assert!((stepper.alpha() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn long_frame_runs_several_steps() {
        let mut solver = empty_solver();
        let mut stepper = FixedStepper::new(0.25, 8).unwrap();

        assert_eq!(stepper.advance(&mut solver, 1.0).unwrap(), 4);
        assert_eq!(stepper.steps_taken(), 4);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut solver = empty_solver();
        let mut stepper = FixedStepper::new(0.25, 2).unwrap();

        assert_eq!(stepper.advance(&mut solver, 2.1).unwrap(), 2);
        assert!(stepper.alpha() < 1.0);
    }

    #[test]
    fn rejects_bad_timestep() {
        assert!(FixedStepper::new(0.0, 4).is_err());
        assert!(FixedStepper::new(f64::NAN, 4).is_err());
    }
}
