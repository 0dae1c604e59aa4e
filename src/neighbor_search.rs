//! Parallel hash-grid neighbor search.
//!
//! Particles are bucketed by position, sorted by bucket key with a
//! genuine stable sort, and queried by walking the 2^D neighboring
//! buckets of the query point. The nearby-bucket midpoint test is
//! applied per-axis with `(bucket + 0.5) * grid_spacing` consistently in
//! both 2-D and 3-D.

use crate::config::{EMPTY_BUCKET, MIN_GRID_RESOLUTION};
use crate::error::{SphError, SphResult};
use crate::geometry::{Dimension, Vector3};
use rayon::prelude::*;

type BucketCoord = (i32, i32, i32);

/// A uniform grid over space used to answer "which particles are within
/// `radius` of this point" queries in roughly constant time per query.
#[derive(Debug, Clone)]
pub struct PointHashGridSearcher {
    resolution: BucketCoord,
    grid_spacing: f32,
    dim: Dimension,
    points: Vec<Vector3>,
    sorted_indices: Vec<usize>,
    start_index: Vec<usize>,
    end_index: Vec<usize>,
}

impl PointHashGridSearcher {
    pub fn new(resolution: (i32, i32, i32), grid_spacing: f32, dim: Dimension) -> SphResult<Self> {
        let (rx, ry, rz) = resolution;
        let axes_ok = rx >= MIN_GRID_RESOLUTION
            && ry >= MIN_GRID_RESOLUTION
            && (dim == Dimension::Two || rz >= MIN_GRID_RESOLUTION);
        if !axes_ok {
            return Err(SphError::InvalidGridResolution(rx, ry, rz));
        }
        if grid_spacing <= 0.0 {
            return Err(SphError::NonPositiveGridSpacing(grid_spacing));
        }
        let resolution = if dim == Dimension::Two { (rx, ry, 1) } else { (rx, ry, rz) };
        Ok(Self {
            resolution,
            grid_spacing,
            dim,
            points: Vec::new(),
            sorted_indices: Vec::new(),
            start_index: Vec::new(),
            end_index: Vec::new(),
        })
    }

    pub fn grid_spacing(&self) -> f32 {
        self.grid_spacing
    }

    pub fn resolution(&self) -> (i32, i32, i32) {
        self.resolution
    }

    fn bucket_count(&self) -> usize {
        (self.resolution.0 as usize) * (self.resolution.1 as usize) * (self.resolution.2 as usize)
    }

    fn bucket_index(&self, position: Vector3) -> BucketCoord {
        let bx = (position.x / self.grid_spacing).floor() as i32;
        let by = (position.y / self.grid_spacing).floor() as i32;
        let bz = if self.dim == Dimension::Two {
            0
        } else {
            (position.z / self.grid_spacing).floor() as i32
        };
        (bx, by, bz)
    }

    fn key_from_bucket(&self, bucket: BucketCoord) -> usize {
        let wrap = |v: i32, r: i32| v.rem_euclid(r) as usize;
        let x = wrap(bucket.0, self.resolution.0);
        let y = wrap(bucket.1, self.resolution.1);
        let z = wrap(bucket.2, self.resolution.2);
        (z * self.resolution.1 as usize + y) * self.resolution.0 as usize + x
    }

    fn key_from_position(&self, position: Vector3) -> usize {
        self.key_from_bucket(self.bucket_index(position))
    }

    /// Rebuild the bucket tables from scratch. `positions` is copied
    /// (reordered by key) rather than referenced, so the searcher stays
    /// valid even if the caller's particle store is later mutated
    /// in-place.
    pub fn build(&mut self, positions: &[Vector3]) {
        let mut entries: Vec<(usize, usize)> = positions
            .par_iter()
            .enumerate()
            .map(|(i, p)| (self.key_from_position(*p), i))
            .collect();
        entries.par_sort_by_key(|&(key, _)| key);

        self.sorted_indices = entries.iter().map(|&(_, i)| i).collect();
        self.points = self.sorted_indices.iter().map(|&i| positions[i]).collect();
        let keys: Vec<usize> = entries.iter().map(|&(k, _)| k).collect();

        let bucket_count = self.bucket_count();
        self.start_index = vec![EMPTY_BUCKET; bucket_count];
        self.end_index = vec![EMPTY_BUCKET; bucket_count];
        for (pos, &key) in keys.iter().enumerate() {
            if pos == 0 || keys[pos - 1] != key {
                self.start_index[key] = pos;
            }
            self.end_index[key] = pos + 1;
        }
    }

    /// The `2^axes` bucket keys that could contain a point within one
    /// `grid_spacing` of `origin`: the origin's own bucket crossed with its
    /// neighbor along each axis, chosen by which side of the bucket's
    /// midpoint `origin` falls on.
    fn nearby_keys(&self, origin: Vector3) -> Vec<usize> {
        let origin_bucket = self.bucket_index(origin);
        let axes = self.dim.axes();

        let mut axis_dir = [0i32; 3];
        for (axis, dir) in axis_dir.iter_mut().enumerate().take(axes) {
            let coord = match axis {
                0 => origin_bucket.0,
                1 => origin_bucket.1,
                _ => origin_bucket.2,
            };
            let mid = (coord as f32 + 0.5) * self.grid_spacing;
            let value = match axis {
                0 => origin.x,
                1 => origin.y,
                _ => origin.z,
            };
            *dir = if value < mid { -1 } else { 1 };
        }

        let mut keys = Vec::with_capacity(1 << axes);
        for mask in 0..(1usize << axes) {
            let mut bucket = origin_bucket;
            for axis in 0..axes {
                if (mask >> axis) & 1 == 1 {
                    match axis {
                        0 => bucket.0 += axis_dir[0],
                        1 => bucket.1 += axis_dir[1],
                        _ => bucket.2 += axis_dir[2],
                    }
                }
            }
            keys.push(self.key_from_bucket(bucket));
        }
        keys
    }

    /// Invoke `callback(original_index, point)` for every indexed point
    /// within `radius` of `origin`. `original_index` refers back to the
    /// position given to [`build`](Self::build), not the internal sorted
    /// order.
    pub fn for_each_nearby_point(&self, origin: Vector3, radius: f32, mut callback: impl FnMut(usize, Vector3)) {
        let mut keys = self.nearby_keys(origin);
        keys.sort_unstable();
        keys.dedup();
        for key in keys {
            let start = self.start_index[key];
            if start == EMPTY_BUCKET {
                continue;
            }
            let end = self.end_index[key];
            for sorted_pos in start..end {
                let point = self.points[sorted_pos];
                if (point - origin).length() <= radius {
                    callback(self.sorted_indices[sorted_pos], point);
                }
            }
        }
    }

    /// Build a per-particle neighbor index list, excluding self, for every
    /// position in `positions` (which must be the same slice the searcher
    /// was last `build`-ed from). Run data-parallel over particle index.
    pub fn build_neighbor_lists(&self, positions: &[Vector3], radius: f32) -> Vec<Vec<usize>> {
        positions
            .par_iter()
            .enumerate()
            .map(|(i, &p)| {
                let mut neighbors = Vec::new();
                self.for_each_nearby_point(p, radius, |j, _| {
                    if j != i {
                        neighbors.push(j);
                    }
                });
                neighbors
            })
            .collect()
    }
}
