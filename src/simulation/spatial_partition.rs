//! # Uniform-grid spatial partition (2D)
//!
//! Broad phase for the ball solver. The simulation bounds are cut into square
//! buckets whose side equals the largest distance at which two objects can
//! still interact. Each bucket holds an unordered list of object ids.
//!
//! ## Core Concepts
//!
//! - Because the bucket side is the maximum interaction distance, two objects
//!   that can touch are never more than one bucket apart on either axis.
//! - A neighbour query therefore only has to read the 3×3 block of buckets
//!   centred on the query point, which turns the all-pairs `O(N²)` search into
//!   near-linear work for evenly spread objects.
//! - The partition remembers which bucket every id currently lives in, so
//!   moving an object only touches the two buckets involved, and only when it
//!   actually crossed a bucket boundary.
//!
//! ```text
//!   +-----+-----+-----+
//!   |     |  b  |     |      query at `q` reads all nine buckets;
//!   +-----+-----+-----+      `a` and `b` are returned, `c` is not
//!   |  a  |  q  |     |
//!   +-----+-----+-----+-----+
//!   |     |     |     |  c  |
//!   +-----+-----+-----+-----+
//! ```
//!
//! The partition does not filter the query object out of its own results;
//! callers skip their own id.

use super::states::NVec2;

/// Bucket coordinates `(column, row)` inside the grid
pub type Cell = (usize, usize);

/// A uniform grid of id buckets covering `[min_range, max_range]`.
#[derive(Debug, Clone)]
pub struct SpatialPartition {
    min_range: NVec2,
    max_range: NVec2,
    cell_size: f64,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,  // index = row * cols + col
    homes: Vec<Option<Cell>>,  // id -> bucket it currently occupies
}

impl SpatialPartition {
    /// Build an empty partition over the rectangle spanned by `min_range` and
    /// `max_range`.
    ///
    /// `max_distance` is the largest separation at which two objects can still
    /// interact; it becomes the bucket side length. The grid gets
    /// `ceil(extent / max_distance)` buckets per axis (at least one).
    pub fn new(min_range: NVec2, max_range: NVec2, max_distance: f64) -> Self {
        let extent = max_range - min_range;
        let cols = axis_cells(extent.x, max_distance);
        let rows = axis_cells(extent.y, max_distance);

        Self {
            min_range,
            max_range,
            cell_size: max_distance,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
            homes: Vec::new(),
        }
    }

    /// Register `id` at `position`, or move it there if already registered.
    ///
    /// - Unregistered ids are inserted into the bucket covering `position`.
    /// - Registered ids that stayed inside their bucket are left untouched.
    /// - Registered ids that crossed a bucket boundary are removed from the
    ///   old bucket (linear in its size) and appended to the new one.
    ///
    /// Afterwards `id` appears in exactly one bucket, the one covering
    /// `position`. Positions outside the covered rectangle land in the nearest
    /// border bucket.
    pub fn update(&mut self, id: usize, position: &NVec2) {
        let cell = self.cell_of(position);

        if id >= self.homes.len() {
            self.homes.resize(id + 1, None);
        }

        match self.homes[id] {
            Some(old) if old == cell => {}
            Some(old) => {
                let old_idx = self.bucket_index(old);
                let bucket = &mut self.buckets[old_idx];
                if let Some(slot) = bucket.iter().position(|&other| other == id) {
                    // `remove` keeps the remaining ids in insertion order
                    bucket.remove(slot);
                }
                let new_idx = self.bucket_index(cell);
                self.buckets[new_idx].push(id);
            }
            None => {
                let new_idx = self.bucket_index(cell);
                self.buckets[new_idx].push(id);
            }
        }

        self.homes[id] = Some(cell);
    }

    /// Every id registered in the 3×3 block of buckets around `position`.
    ///
    /// Buckets are visited row by row (x varying fastest) and clamped to the
    /// grid at its edges; within a bucket ids come back in insertion order.
    /// The result may include the caller's own id.
    pub fn nearby(&self, position: &NVec2) -> Vec<usize> {
        let mut out = Vec::new();
        self.nearby_into(position, &mut out);
        out
    }

    /// Same as [`SpatialPartition::nearby`], but appends into a caller-owned
    /// buffer (cleared first) so per-step queries do not allocate.
    pub fn nearby_into(&self, position: &NVec2, out: &mut Vec<usize>) {
        out.clear();
        let (col, row) = self.cell_of(position);

        let row_lo = row.saturating_sub(1);
        let row_hi = (row + 1).min(self.rows - 1);
        let col_lo = col.saturating_sub(1);
        let col_hi = (col + 1).min(self.cols - 1);

        for r in row_lo..=row_hi {
            for c in col_lo..=col_hi {
                out.extend_from_slice(&self.buckets[r * self.cols + c]);
            }
        }
    }

    /// Bucket coordinates covering `position`, clamped onto the grid.
    pub fn cell_of(&self, position: &NVec2) -> Cell {
        let rel = (position - self.min_range) / self.cell_size;
        (
            clamp_axis(rel.x.floor(), self.cols),
            clamp_axis(rel.y.floor(), self.rows),
        )
    }

    /// Bucket the id was last registered in, if any
    pub fn bucket_of(&self, id: usize) -> Option<Cell> {
        self.homes.get(id).copied().flatten()
    }

    /// Ids currently stored in the bucket at `cell`
    pub fn bucket(&self, cell: Cell) -> &[usize] {
        &self.buckets[self.bucket_index(cell)]
    }

    /// Whether `position` lies inside the rectangle the grid was built for
    pub fn contains(&self, position: &NVec2) -> bool {
        position.x >= self.min_range.x
            && position.x <= self.max_range.x
            && position.y >= self.min_range.y
            && position.y <= self.max_range.y
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Grid dimensions as `(columns, rows)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Number of ids that have been registered at least once
    pub fn registered(&self) -> usize {
        self.homes.iter().filter(|h| h.is_some()).count()
    }

    fn bucket_index(&self, (col, row): Cell) -> usize {
        row * self.cols + col
    }
}

// helpers ===========================================================================

fn axis_cells(extent: f64, cell_size: f64) -> usize {
    let n = (extent / cell_size).ceil();
    if n.is_finite() && n >= 1.0 {
        n as usize
    } else {
        1
    }
}

/// Floor-ed cell coordinate clamped into `0..n`; NaN maps to 0
fn clamp_axis(v: f64, n: usize) -> usize {
    if v <= 0.0 || v.is_nan() {
        0
    } else {
        (v as usize).min(n - 1)
    }
}
