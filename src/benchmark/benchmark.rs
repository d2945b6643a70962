use std::time::Instant;

use crate::simulation::collision::detect_contact;
use crate::simulation::engine::World;
use crate::simulation::params::Parameters;
use crate::simulation::solver::BallSolver;
use crate::simulation::spatial_partition::SpatialPartition;
use crate::simulation::states::NVec2;

const RADIUS: f64 = 0.01;

/// Square pit whose side grows with `n` so density stays roughly constant
fn make_world(n: usize) -> World {
    let half = (n as f64).sqrt() * RADIUS * 2.0;
    World::new(NVec2::new(-half, -half), NVec2::new(half, half), RADIUS)
}

/// Deterministic scatter of `n` centres inside `world`, no rand needed
fn make_positions(n: usize, world: &World) -> Vec<NVec2> {
    let half = world.max_range.x - RADIUS;
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec2::new((i_f * 0.37).sin() * half, (i_f * 0.13).cos() * half)
        })
        .collect()
}

/// Helper to build a populated solver of size `n`
fn make_solver(n: usize) -> BallSolver {
    let world = make_world(n);
    let positions = make_positions(n, &world);
    let mut solver = BallSolver::new(world, Parameters::new(-9.8, 0.8)).expect("benchmark world is valid");
    for (i, x) in positions.into_iter().enumerate() {
        let i_f = i as f64;
        let v = NVec2::new((i_f * 0.07).sin(), (i_f * 0.11).cos());
        solver.add_ball(x, v, 1.0, RADIUS).expect("benchmark balls fit the world");
    }
    solver
}

/// Count overlapping pairs the slow way and through the partition
pub fn bench_broad_phase() {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let world = make_world(n);
        let positions = make_positions(n, &world);

        // Brute force: all pairs
        let t0 = Instant::now();
        let mut brute = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                if detect_contact(&positions[i], RADIUS, &positions[j], RADIUS).is_some() {
                    brute += 1;
                }
            }
        }
        let dt_brute = t0.elapsed().as_secs_f64();

        // Partition: build + 3x3 queries
        let t1 = Instant::now();
        let mut grid = SpatialPartition::new(world.min_range, world.max_range, world.max_interaction_distance());
        for (i, x) in positions.iter().enumerate() {
            grid.update(i, x);
        }
        let mut near = Vec::new();
        let mut gridded = 0usize;
        for (i, x) in positions.iter().enumerate() {
            grid.nearby_into(x, &mut near);
            for &j in near.iter().filter(|&&j| j > i) {
                if detect_contact(x, RADIUS, &positions[j], RADIUS).is_some() {
                    gridded += 1;
                }
            }
        }
        let dt_grid = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, brute = {:8.6} s, grid = {:8.6} s, pairs = {brute}/{gridded}",
            dt_brute, dt_grid
        );
    }
}

/// Time full solve() steps for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_solve() {
    println!("N,solve_ms");
    let steps = 10;

    for n in (500..=8000).step_by(500) {
        let mut solver = make_solver(n);

        // Warm-up one step
        let _ = solver.solve(1.0 / 120.0);

        let t0 = Instant::now();
        for _ in 0..steps {
            let _ = solver.solve(1.0 / 120.0);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
}
