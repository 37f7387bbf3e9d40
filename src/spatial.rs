//! Nearest-generator lookups
//!
//! With the `spatial-index` feature (default) queries go through a kiddo
//! KD-tree in O(log n); without it they fall back to a linear scan.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

use std::fmt;

use crate::Point;

/// Nearest-neighbour index over a diagram's generator points
///
/// The cell containing a position is the cell of its nearest generator, so
/// this doubles as a point-location structure for the diagram.
#[derive(Clone)]
pub struct SpatialIndex {
    len: usize,
    #[cfg(feature = "spatial-index")]
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    #[cfg(not(feature = "spatial-index"))]
    points: Vec<Point>,
}

impl SpatialIndex {
    /// Build the index from generator points
    ///
    /// # Example
    ///
    /// ```
    /// use bounded_voronoi::{Point, SpatialIndex};
    ///
    /// let index = SpatialIndex::new(&[Point::new(1.0, 1.0), Point::new(9.0, 9.0)]);
    /// assert_eq!(index.find_nearest(Point::new(2.0, 0.5)), Some(0));
    /// ```
    pub fn new(points: &[Point]) -> Self {
        #[cfg(feature = "spatial-index")]
        {
            let coords: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
            let tree = (!coords.is_empty()).then(|| ImmutableKdTree::new_from_slice(&coords));
            Self {
                len: points.len(),
                tree,
            }
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            Self {
                len: points.len(),
                points: points.to_vec(),
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the generator nearest to `position`
    pub fn find_nearest(&self, position: Point) -> Option<usize> {
        self.nearest(position).map(|(item, _)| item)
    }

    /// Squared distance from `position` to its nearest generator
    pub fn nearest_distance_squared(&self, position: Point) -> Option<f64> {
        self.nearest(position).map(|(_, distance)| distance)
    }

    #[cfg(feature = "spatial-index")]
    fn nearest(&self, position: Point) -> Option<(usize, f64)> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some((result.item, result.distance))
    }

    #[cfg(not(feature = "spatial-index"))]
    fn nearest(&self, position: Point) -> Option<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_squared(position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let centers = vec![
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, -1.0),
        ];

        let index = SpatialIndex::new(&centers);
        assert_eq!(index.len(), 4);

        assert_eq!(index.find_nearest(Point::new(0.9, 0.1)), Some(0));
        assert_eq!(index.find_nearest(Point::new(0.0, 0.95)), Some(1));
        assert_eq!(index.find_nearest(Point::new(-0.8, 0.0)), Some(2));
        assert_eq!(index.find_nearest(Point::new(0.1, -3.0)), Some(3));
    }

    #[test]
    fn test_nearest_distance() {
        let index = SpatialIndex::new(&[Point::new(10.0, 0.0), Point::new(0.0, 10.0)]);
        let distance = index.nearest_distance_squared(Point::new(10.0, 3.0)).unwrap();
        assert!((distance - 9.0).abs() < 1e-12);
        assert_eq!(index.find_nearest(Point::new(0.0, 10.0)), Some(1));
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.find_nearest(Point::ZERO), None);
    }
}
