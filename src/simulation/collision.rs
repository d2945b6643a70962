//! Contact handling for circular balls.
//!
//! - **Walls**: the four half-planes of the world bounds. A ball whose surface
//!   crossed a wall is clamped back onto it and, if still moving into the
//!   wall, has that velocity component reflected and damped by restitution.
//! - **Ball pairs**: overlapping discs are pushed apart along their centre
//!   line, then their normal velocities are resolved with a 1D restitution
//!   model that conserves momentum. Tangential velocity is never touched.
//!
//! ```text
//!        A           B
//!      (   )  ->  (   )          normal n points from A to B
//!          |<-d->|               depth = rA + rB - |B - A|
//! ```

use super::engine::World;
use super::states::NVec2;

/// Clamp one ball back inside the world bounds.
///
/// Axes are handled independently in the order x-max, x-min, y-max, y-min, so
/// a ball wedged in a corner gets both axes fixed in one call. Returns whether
/// any wall was touched.
pub fn resolve_walls(
    position: &mut NVec2,
    velocity: &mut NVec2,
    radius: f64,
    world: &World,
    restitution: f64,
) -> bool {
    let mut hit = false;

    if position.x + radius > world.max_range.x {
        position.x = world.max_range.x - radius;
        if velocity.x > 0.0 {
            velocity.x *= -restitution;
        }
        hit = true;
    }
    if position.x - radius < world.min_range.x {
        position.x = world.min_range.x + radius;
        if velocity.x < 0.0 {
            velocity.x *= -restitution;
        }
        hit = true;
    }
    if position.y + radius > world.max_range.y {
        position.y = world.max_range.y - radius;
        if velocity.y > 0.0 {
            velocity.y *= -restitution;
        }
        hit = true;
    }
    if position.y - radius < world.min_range.y {
        position.y = world.min_range.y + radius;
        if velocity.y < 0.0 {
            velocity.y *= -restitution;
        }
        hit = true;
    }

    hit
}

/// Geometry of one overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: NVec2, // unit vector from A towards B
    pub depth: f64,    // rA + rB - distance
}

/// Narrow phase: exact disc-disc overlap test.
///
/// Uses squared distance against the squared radius sum, so no square root
/// is taken for pairs that do not touch. Coincident centres get the fixed
/// normal `(1, 0)` and a stand-in distance of `rA + rB - 1`.
pub fn detect_contact(pos_a: &NVec2, radius_a: f64, pos_b: &NVec2, radius_b: f64) -> Option<Contact> {
    let r = pos_b - pos_a;
    let dist2 = r.norm_squared();
    let reach = radius_a + radius_b;

    if dist2 >= reach * reach {
        return None;
    }

    let (normal, dist) = if dist2 == 0.0 {
        (NVec2::new(1.0, 0.0), reach - 1.0)
    } else {
        let dist = dist2.sqrt();
        (r / dist, dist)
    };

    Some(Contact {
        normal,
        depth: reach - dist,
    })
}

/// Positional correction for a contact, returned as `(offset_a, offset_b)`.
///
/// The penetration depth is split in inverse proportion to mass, so the
/// pair's centre of mass stays put and the heavier ball moves less.
pub fn separation_offsets(contact: &Contact, mass_a: f64, mass_b: f64) -> (NVec2, NVec2) {
    let total = mass_a + mass_b;
    let push = contact.normal * contact.depth;
    (-push * (mass_b / total), push * (mass_a / total))
}

/// Resolve the normal velocities of a contact in place.
///
/// With normal speeds `vA = velA·n`, `vB = velB·n`, masses `mA`, `mB` and
/// restitution `e`:
///
/// ```text
/// vA' = (e·mB·(vB − vA) + mA·vA + mB·vB) / (mA + mB)
/// vB' = (e·mA·(vA − vB) + mA·vA + mB·vB) / (mA + mB)
/// ```
///
/// Pairs already separating along `n` (`vA − vB < 0`) are left alone.
/// Returns whether velocities changed.
pub fn resolve_normal_velocity(
    normal: &NVec2,
    vel_a: &mut NVec2,
    mass_a: f64,
    vel_b: &mut NVec2,
    mass_b: f64,
    restitution: f64,
) -> bool {
    let va = vel_a.dot(normal);
    let vb = vel_b.dot(normal);

    if va - vb < 0.0 {
        return false;
    }

    let total = mass_a + mass_b;
    let momentum = mass_a * va + mass_b * vb;
    let va_new = (restitution * mass_b * (vb - va) + momentum) / total;
    let vb_new = (restitution * mass_a * (va - vb) + momentum) / total;

    *vel_a += *normal * (va_new - va);
    *vel_b += *normal * (vb_new - vb);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn box_world() -> World {
        World::new(NVec2::new(-1.0, -1.0), NVec2::new(1.0, 1.0), 0.1)
    }

    #[test]
    fn wall_clamps_and_reflects() {
        let world = box_world();
        let mut p = NVec2::new(0.95, 0.0);
        let mut v = NVec2::new(2.0, 0.5);

        assert!(resolve_walls(&mut p, &mut v, 0.1, &world, 0.5));
        assert!((p.x - 0.9).abs() < EPS);
        assert!((v.x + 1.0).abs() < EPS);
        assert_eq!(v.y, 0.5);
    }

    #[test]
    fn wall_keeps_velocity_already_leaving() {
        let world = box_world();
        let mut p = NVec2::new(-0.95, 0.0);
        let mut v = NVec2::new(3.0, 0.0);

        assert!(resolve_walls(&mut p, &mut v, 0.1, &world, 0.5));
        assert!((p.x + 0.9).abs() < EPS);
        assert_eq!(v.x, 3.0);
    }

    #[test]
    fn corner_fixes_both_axes() {
        let world = box_world();
        let mut p = NVec2::new(1.2, -1.3);
        let mut v = NVec2::new(1.0, -1.0);

        resolve_walls(&mut p, &mut v, 0.1, &world, 1.0);
        assert!((p - NVec2::new(0.9, -0.9)).norm() < EPS);
        assert!((v - NVec2::new(-1.0, 1.0)).norm() < EPS);
    }

    #[test]
    fn inside_ball_is_untouched() {
        let world = box_world();
        let mut p = NVec2::new(0.2, 0.3);
        let mut v = NVec2::new(1.0, 1.0);
        assert!(!resolve_walls(&mut p, &mut v, 0.1, &world, 1.0));
        assert_eq!(p, NVec2::new(0.2, 0.3));
    }

    #[test]
    fn touching_discs_do_not_collide() {
        let a = NVec2::new(0.0, 0.0);
        let b = NVec2::new(0.5, 0.0);
        assert!(detect_contact(&a, 0.25, &b, 0.25).is_none());
    }

    #[test]
    fn overlap_reports_normal_and_depth() {
        let a = NVec2::new(0.0, 0.0);
        let b = NVec2::new(0.0, 0.3);
        let c = detect_contact(&a, 0.2, &b, 0.2).expect("discs overlap");
        assert!((c.normal - NVec2::new(0.0, 1.0)).norm() < EPS);
        assert!((c.depth - 0.1).abs() < EPS);
    }

    #[test]
    fn coincident_centres_use_fixed_normal() {
        let a = NVec2::new(0.3, 0.3);
        let c = detect_contact(&a, 0.1, &a, 0.1).expect("coincident discs overlap");
        assert_eq!(c.normal, NVec2::new(1.0, 0.0));
        assert!((c.depth - 1.0).abs() < EPS);
    }

    #[test]
    fn heavier_ball_moves_less() {
        let c = Contact {
            normal: NVec2::new(1.0, 0.0),
            depth: 0.3,
        };
        let (oa, ob) = separation_offsets(&c, 2.0, 1.0);
        assert!((oa.x + 0.1).abs() < EPS);
        assert!((ob.x - 0.2).abs() < EPS);
        // centre of mass unchanged
        assert!((2.0 * oa.x + 1.0 * ob.x).abs() < EPS);
    }

    #[test]
    fn elastic_equal_masses_swap_normal_speeds() {
        let n = NVec2::new(1.0, 0.0);
        let mut va = NVec2::new(1.0, 0.25);
        let mut vb = NVec2::new(-1.0, 0.0);

        assert!(resolve_normal_velocity(&n, &mut va, 1.0, &mut vb, 1.0, 1.0));
        assert!((va - NVec2::new(-1.0, 0.25)).norm() < EPS);
        assert!((vb - NVec2::new(1.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn inelastic_pair_leaves_equal_normal_speeds() {
        let n = NVec2::new(1.0, 0.0);
        let mut va = NVec2::new(3.0, 0.0);
        let mut vb = NVec2::new(-1.0, 0.0);

        resolve_normal_velocity(&n, &mut va, 1.0, &mut vb, 3.0, 0.0);
        assert!((va.x - vb.x).abs() < EPS);
        assert!(va.x.abs() < EPS); // (1*3 + 3*-1) / 4
    }

    #[test]
    fn separating_pair_is_skipped() {
        let n = NVec2::new(1.0, 0.0);
        let mut va = NVec2::new(-1.0, 0.0);
        let mut vb = NVec2::new(1.0, 0.0);

        assert!(!resolve_normal_velocity(&n, &mut va, 1.0, &mut vb, 1.0, 1.0));
        assert_eq!(va, NVec2::new(-1.0, 0.0));
        assert_eq!(vb, NVec2::new(1.0, 0.0));
    }
}
