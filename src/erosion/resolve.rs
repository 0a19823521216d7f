use tracing::debug;

use super::offset::offset_facet;
use super::overlap::{detect_overlap, Chord, ChordPair, Overlap};
use crate::math::intersect_2d::chord_intersection;
use crate::math::polygon_2d::{dist_sq, max_span_2d};
use crate::math::Point2;

/// Candidate points closer than this fraction of the facet span are the same
/// point.
const COINCIDENT_FRACTION: f64 = 1e-9;

/// State of the offset boundary after a resolution round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundVerdict {
    /// No offsets overlap: the boundary is established.
    Converged,
    /// Every offset is overlapped: the facet is fully occluded.
    Occluded,
    /// Fewer than 3 vertices remain.
    Collapsed,
    /// Some offsets still overlap; another round (with fusion) is needed.
    Unresolved,
}

/// A vertex set together with its offsets and their overlap relation.
#[derive(Debug, Clone)]
pub struct ResolutionRound {
    pub vertices: Vec<Point2>,
    pub offsets: Vec<Point2>,
    pub overlap: Overlap,
    pub verdict: RoundVerdict,
}

impl ResolutionRound {
    /// Offsets `vertices` by `radius` and classifies the result.
    #[must_use]
    pub fn evaluate(vertices: Vec<Point2>, radius: f64) -> Self {
        if vertices.len() < 3 {
            return Self {
                overlap: detect_overlap(&[], &[]),
                vertices,
                offsets: Vec::new(),
                verdict: RoundVerdict::Collapsed,
            };
        }
        let offsets = offset_facet(&vertices, radius);
        let overlap = detect_overlap(&vertices, &offsets);
        let verdict = if overlap.matrix.is_clear() {
            RoundVerdict::Converged
        } else if overlap.matrix.all_overlapped() {
            RoundVerdict::Occluded
        } else {
            RoundVerdict::Unresolved
        };
        Self {
            vertices,
            offsets,
            overlap,
            verdict,
        }
    }

    /// Collapses this round's overlapped runs and evaluates the reduced
    /// vertex set.
    #[must_use]
    pub fn next(&self, radius: f64) -> Self {
        Self::evaluate(collapse_overlaps(&self.vertices, &self.overlap), radius)
    }
}

/// Chords present in exactly one of the two pairs: those of `a` missing from
/// `b`, then those of `b` missing from `a`.
#[must_use]
pub fn symmetric_difference(a: &ChordPair, b: &ChordPair) -> Vec<Chord> {
    let a = [a.forward, a.backward];
    let b = [b.forward, b.backward];
    a.iter()
        .filter(|c| !b.contains(c))
        .chain(b.iter().filter(|c| !a.contains(c)))
        .copied()
        .collect()
}

/// Replaces every overlapped vertex by the point where the outer edges of its
/// overlapped run meet.
///
/// Vertices without overlaps are kept as they are. For an overlapped vertex
/// `i`, each mutual partner `j` gives the chords bracketing the run as seen
/// from `i` and from `j`; their symmetric difference leaves the two outer
/// edges, which are intersected. The last partner yielding exactly two
/// outer edges wins. Vertices with no such partner, or whose outer edges are
/// parallel, are dropped. Coincident candidates are merged, keeping hull
/// order.
#[must_use]
pub fn collapse_overlaps(vertices: &[Point2], overlap: &Overlap) -> Vec<Point2> {
    let n = vertices.len().min(overlap.matrix.dim());
    let matrix = &overlap.matrix;
    let mut candidates = Vec::with_capacity(n);

    for i in 0..n {
        if !matrix.has_overlap(i) {
            candidates.push(vertices[i]);
            continue;
        }

        let outer = (0..n)
            .filter(|&j| matrix.is_mutual(i, j))
            .filter_map(|j| {
                let from_i = overlap.chords.get(&(i, j))?;
                let from_j = overlap.chords.get(&(j, i))?;
                match symmetric_difference(from_i, from_j).as_slice() {
                    &[first, second] => Some((first, second)),
                    _ => None,
                }
            })
            .last();

        let Some((first, second)) = outer else {
            debug!(vertex = i, "no outer edges bracket the overlapped run");
            continue;
        };

        match chord_intersection(
            &vertices[first[0]],
            &vertices[first[1]],
            &vertices[second[0]],
            &vertices[second[1]],
        ) {
            Ok(point) => candidates.push(point),
            Err(e) => debug!(vertex = i, error = %e, "outer edges do not meet"),
        }
    }

    let coincident = (COINCIDENT_FRACTION * max_span_2d(vertices)).powi(2);
    let mut unique: Vec<Point2> = Vec::with_capacity(candidates.len());
    for point in candidates {
        if !unique.iter().any(|q| dist_sq(q, &point) <= coincident) {
            unique.push(point);
        }
    }
    unique
}
