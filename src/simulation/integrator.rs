//! Fixed-step time integration for the ball pit
//!
//! Semi-implicit (symplectic) Euler: velocities are kicked by gravity first,
//! then positions drift with the updated velocities.

use super::states::{Balls, NVec2};

/// Kick: v_n+1 = v_n + dt * (0, g)
pub fn apply_gravity(balls: &mut Balls, gravity: f64, dt: f64) {
    let kick = NVec2::new(0.0, gravity * dt);
    for v in balls.velocities.iter_mut() {
        *v += kick;
    }
}

/// Drift: x_n+1 = x_n + dt * v_n+1
///
/// `moved` is called with each ball's id and new position so the caller can
/// re-register it with the broad phase.
pub fn drift_positions<F>(balls: &mut Balls, dt: f64, mut moved: F)
where
    F: FnMut(usize, &NVec2),
{
    for (i, (x, v)) in balls
        .positions
        .iter_mut()
        .zip(balls.velocities.iter())
        .enumerate()
    {
        *x += dt * *v;
        moved(i, x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_then_drift_is_semi_implicit() {
        let mut balls = Balls::new();
        balls.push(NVec2::zeros(), NVec2::new(1.0, 0.0), 1.0, 0.1);

        apply_gravity(&mut balls, -10.0, 0.1);
        let mut seen = Vec::new();
        drift_positions(&mut balls, 0.1, |i, x| seen.push((i, *x)));

        // position uses the already-kicked velocity
        assert!((balls.positions[0] - NVec2::new(0.1, -0.1)).norm() < 1e-12);
        assert!((balls.velocities[0] - NVec2::new(1.0, -1.0)).norm() < 1e-12);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 0);
    }
}
