//! Uniform-grid broad phase over track segments.
//!
//! Built in full from the authoritative segment collection and rebuilt
//! wholesale whenever the track version moves; never patched incrementally.
//! Buckets hold copies of the segments, so a track mutation mid-frame can
//! never leave the index dangling.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::track::Segment;

/// Integer cell coordinate for a world coordinate
#[inline]
fn cell_index(n: f32, cell_size: f32) -> i32 {
    (n / cell_size).floor() as i32
}

/// Grid of world cells to the segments whose bounding boxes overlap them
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    grid: HashMap<(i32, i32), Vec<Segment>>,
}

impl SpatialHash {
    /// Build the grid, inserting each segment into every cell its bounding
    /// box overlaps. Long segments must land in every cell they cross, not
    /// just the cell under their midpoint.
    pub fn build(segments: &[Segment], cell_size: f32) -> Self {
        let mut grid: HashMap<(i32, i32), Vec<Segment>> = HashMap::new();

        for seg in segments {
            let min = seg.a.min(seg.b);
            let max = seg.a.max(seg.b);

            let ix0 = cell_index(min.x, cell_size);
            let ix1 = cell_index(max.x, cell_size);
            let iy0 = cell_index(min.y, cell_size);
            let iy1 = cell_index(max.y, cell_size);

            for iy in iy0..=iy1 {
                for ix in ix0..=ix1 {
                    grid.entry((ix, iy)).or_default().push(*seg);
                }
            }
        }

        Self { cell_size, grid }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Segments near `p`, covering a square of side `2 * radius`.
    ///
    /// A conservative superset: callers still do exact distance checks. No
    /// segment whose bounding box touches the range is ever missing.
    pub fn query(&self, p: Vec2, radius: f32) -> Vec<Segment> {
        self.collect(p - Vec2::splat(radius), p + Vec2::splat(radius))
    }

    /// Segments whose cells overlap the rectangle [min, max]
    pub fn query_rect(&self, min: Vec2, max: Vec2) -> Vec<Segment> {
        self.collect(min, max)
    }

    // Cells scan in row order and buckets keep insertion order, so query
    // results are deterministic. A segment spanning several cells in range
    // is deduplicated by id.
    fn collect(&self, min: Vec2, max: Vec2) -> Vec<Segment> {
        let ix0 = cell_index(min.x, self.cell_size);
        let ix1 = cell_index(max.x, self.cell_size);
        let iy0 = cell_index(min.y, self.cell_size);
        let iy1 = cell_index(max.y, self.cell_size);

        let mut seen: HashSet<u32> = HashSet::new();
        let mut out = Vec::new();

        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                if let Some(bucket) = self.grid.get(&(ix, iy)) {
                    for seg in bucket {
                        if seen.insert(seg.id) {
                            out.push(*seg);
                        }
                    }
                }
            }
        }

        out
    }
}
