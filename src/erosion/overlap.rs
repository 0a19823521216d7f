use std::collections::HashMap;

use crate::math::polygon_2d::dist_sq;
use crate::math::Point2;

/// Index pair `[low, high]` naming a hull edge (or chord) by its endpoints.
pub type Chord = [usize; 2];

/// The two chords bracketing an overlapped run of hull vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordPair {
    /// Edge leaving the run when walking forward around the hull.
    pub forward: Chord,
    /// Edge leaving the run when walking backward around the hull.
    pub backward: Chord,
}

/// Bracketing chords for every mutually overlapping `(i, j)` pair.
pub type ChordMap = HashMap<(usize, usize), ChordPair>;

/// Square boolean relation over hull vertex indices: `get(i, j)` means the
/// offsets of `i` and `j` interfere.
///
/// Kept symmetric and transitively closed; the diagonal is always clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapMatrix {
    dim: usize,
    cells: Vec<bool>,
}

impl OverlapMatrix {
    /// An empty relation over `dim` vertices.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![false; dim * dim],
        }
    }

    /// Builds a relation from explicit pairs, then closes it.
    #[must_use]
    pub fn from_pairs(dim: usize, pairs: &[(usize, usize)]) -> Self {
        let mut matrix = Self::new(dim);
        for &(i, j) in pairs {
            matrix.mark_pair(i, j);
        }
        matrix.close_transitively();
        matrix
    }

    /// Number of vertices the relation ranges over.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.dim + j]
    }

    fn set(&mut self, i: usize, j: usize) {
        self.cells[i * self.dim + j] = true;
    }

    /// Marks `i` and `j` as overlapping each other.
    fn mark_pair(&mut self, i: usize, j: usize) {
        if i != j {
            self.set(i, j);
            self.set(j, i);
        }
    }

    /// `true` when no vertex overlaps any other.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// `true` when vertex `i` overlaps at least one other vertex.
    #[must_use]
    pub fn has_overlap(&self, i: usize) -> bool {
        (0..self.dim).any(|j| self.get(i, j))
    }

    /// `true` when `i` and `j` overlap in both directions.
    #[must_use]
    pub fn is_mutual(&self, i: usize, j: usize) -> bool {
        self.get(i, j) && self.get(j, i)
    }

    /// `true` when every column holds at least one overlap, i.e. every offset
    /// vertex is subsumed by another vertex: the facet is fully occluded.
    #[must_use]
    pub fn all_overlapped(&self) -> bool {
        (0..self.dim).all(|j| (0..self.dim).any(|i| self.get(i, j)))
    }

    /// Joins overlapping runs: if `i ~ j` and `j ~ k` then `i ~ k`.
    fn close_transitively(&mut self) {
        let n = self.dim;
        for k in 0..n {
            for i in 0..n {
                if !self.get(i, k) {
                    continue;
                }
                for j in 0..n {
                    if j != i && self.get(k, j) {
                        self.set(i, j);
                    }
                }
            }
        }
    }

    /// For every mutually overlapping pair `(i, j)`, walks round the hull
    /// from `j` in both directions until the first vertex `i` does not
    /// overlap, and records the edge crossing out of the run on each side.
    ///
    /// Extending those two outer edges until they meet gives the point the
    /// overlapped run collapses to.
    #[must_use]
    pub fn line_points(&self) -> ChordMap {
        let n = self.dim;
        let mut chords = ChordMap::new();
        for i in 0..n {
            for j in 0..n {
                if !self.is_mutual(i, j) {
                    continue;
                }

                let mut k = 1;
                while k < n && self.get(i, (j + k) % n) {
                    k += 1;
                }
                let forward = sorted_chord((j + k) % n, (j + k - 1) % n);

                let mut k = 1;
                while k < n && self.get(i, (j + n - k) % n) {
                    k += 1;
                }
                let backward = sorted_chord((j + n - k) % n, (j + n - k + 1) % n);

                chords.insert((i, j), ChordPair { forward, backward });
            }
        }
        chords
    }
}

fn sorted_chord(a: usize, b: usize) -> Chord {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

/// Result of testing a hull against its offsets.
#[derive(Debug, Clone)]
pub struct Overlap {
    /// Closed overlap relation.
    pub matrix: OverlapMatrix,
    /// Erosion radius of each vertex: distance from the vertex to its offset.
    pub radii: Vec<f64>,
    /// Bracketing chords of each overlapping pair.
    pub chords: ChordMap,
}

/// Tests every offset point against every vertex's erosion disk.
///
/// Vertex `i`'s disk is centred on `hull[i]` with radius
/// `|hull[i] - offsets[i]|`. An offset `j` strictly inside it marks `i` and
/// `j` as overlapping (both ways, so both get recomputed); the relation is
/// then transitively closed.
#[must_use]
pub fn detect_overlap(hull: &[Point2], offsets: &[Point2]) -> Overlap {
    let n = hull.len().min(offsets.len());
    let mut matrix = OverlapMatrix::new(n);
    let mut radii = Vec::with_capacity(n);

    for i in 0..n {
        let sweep_sq = dist_sq(&hull[i], &offsets[i]);
        radii.push(sweep_sq.sqrt());
        for j in 0..n {
            if dist_sq(&hull[i], &offsets[j]) < sweep_sq {
                matrix.mark_pair(i, j);
            }
        }
    }
    matrix.close_transitively();

    let chords = matrix.line_points();
    Overlap {
        matrix,
        radii,
        chords,
    }
}
