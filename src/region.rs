//! Voronoi region polygons
//!
//! A [`Region`] is the finished, immutable polygon of one generator's cell.
//! Edge cells are assembled as an [`EdgeRegion`] first, which accepts boundary
//! cut points and drops vertices outside the domain, and are then frozen
//! into a `Region` with [`EdgeRegion::finish`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::sort::{angular_sort, SortOptions};
use crate::vector::Vector;
use crate::Point;

/// Centroid and unsigned area of a polygon via the shoelace formula
///
/// The point list is closed implicitly (last point connects to the first) and
/// is assumed to be ordered around the polygon, in either direction. When the
/// signed area is exactly zero (collinear points, or fewer than three) the
/// centroid falls back to the coordinate-wise mean and the area is zero.
///
/// Returns `None` for an empty point list.
pub fn shoelace(points: &[Point]) -> Option<(Point, f64)> {
    if points.is_empty() {
        return None;
    }

    let mut signed_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, p0) in points.iter().enumerate() {
        let p1 = points[(i + 1) % points.len()];
        let cross = p0.x * p1.y - p1.x * p0.y;
        signed_area += cross;
        cx += (p0.x + p1.x) * cross;
        cy += (p0.y + p1.y) * cross;
    }
    signed_area /= 2.0;

    if signed_area == 0.0 {
        let mean = points.iter().copied().sum::<Point>() / points.len() as f64;
        return Some((mean, 0.0));
    }

    let scale = 1.0 / (6.0 * signed_area);
    Some((Point::new(cx * scale, cy * scale), signed_area.abs()))
}

/// The finished polygon of a single Voronoi cell
///
/// Centroid and area are computed once when the region is created; a region
/// never changes afterwards. Regenerating a diagram creates new regions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: usize,
    origin: Point,
    points: Vec<Point>,
    is_edge: bool,
    centroid: Option<Point>,
    area: f64,
}

impl Region {
    /// A region that lies entirely inside the domain
    ///
    /// `points` must already be ordered around the polygon.
    pub fn interior(id: usize, origin: Point, points: Vec<Point>) -> Self {
        Self::build(id, origin, points, false)
    }

    /// A region that was clipped against the domain boundary
    pub fn edge(id: usize, origin: Point, points: Vec<Point>) -> Self {
        Self::build(id, origin, points, true)
    }

    fn build(id: usize, origin: Point, points: Vec<Point>, is_edge: bool) -> Self {
        let (centroid, area) = match shoelace(&points) {
            Some((centroid, area)) => (Some(centroid), area),
            None => (None, 0.0),
        };
        Self {
            id,
            origin,
            points,
            is_edge,
            centroid,
            area,
        }
    }

    /// Index of the generator this region belongs to
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The generator point
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Polygon vertices; the last vertex connects back to the first
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_edge(&self) -> bool {
        self.is_edge
    }

    /// Centre of mass of the polygon, `None` when the region has no points
    #[inline]
    pub fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    /// Unsigned polygon area (zero for empty or collinear regions)
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| p.distance(self.points[(i + 1) % self.points.len()]))
            .sum()
    }

    /// Whether `point` lies inside the (convex) polygon, boundary included
    pub fn contains(&self, point: Point) -> bool {
        if self.area == 0.0 {
            return false;
        }
        let tolerance = 1e-12 * self.area.max(1.0);
        let mut sign = 0.0f64;
        for (i, a) in self.points.iter().enumerate() {
            let b = self.points[(i + 1) % self.points.len()];
            let cross = (b - *a).perp_dot(point - *a);
            if cross.abs() <= tolerance {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// A point just outside the polygon, for ray-casting containment tests
    ///
    /// Takes the first boundary point and moves it one unit further away from
    /// the centroid. Assumes a convex polygon.
    ///
    /// # Errors
    ///
    /// - `Unsupported` for edge regions
    /// - `DegenerateGeometry` when there is no centroid or the first point is the centroid
    pub fn outside_point(&self) -> Result<Point> {
        if self.is_edge {
            return Err(VoronoiError::Unsupported(format!(
                "outside point of edge region {}",
                self.id
            )));
        }
        let (Some(centroid), Some(&edge_point)) = (self.centroid, self.points.first()) else {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "region {} has no boundary points",
                self.id
            )));
        };
        let unit = Vector::between(centroid, edge_point).normalise()?;
        Ok(edge_point + Point::new(unit.components()[0], unit.components()[1]))
    }
}

/// An edge cell while it is being clipped against the domain
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRegion {
    id: usize,
    origin: Point,
    points: Vec<Point>,
}

impl EdgeRegion {
    pub fn new(id: usize, origin: Point, points: Vec<Point>) -> Self {
        Self { id, origin, points }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Append a point on the region boundary
    ///
    /// The point list is not re-sorted; [`EdgeRegion::finish`] orders it.
    pub fn add_boundary_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Drop every point outside the closed rectangle `xbounds × ybounds`
    pub fn remove_outside_points(&mut self, xbounds: (f64, f64), ybounds: (f64, f64)) {
        let (x0, x1) = xbounds;
        let (y0, y1) = ybounds;
        self.points
            .retain(|p| x0 <= p.x && p.x <= x1 && y0 <= p.y && p.y <= y1);
    }

    /// Freeze into a [`Region`]
    ///
    /// Points closer than `tolerance` to an earlier point are merged, and the
    /// rest are ordered clockwise around their mean so the polygon closes.
    pub fn finish(self, tolerance: f64) -> Region {
        let mut unique: Vec<Point> = Vec::with_capacity(self.points.len());
        for point in self.points {
            if !unique.iter().any(|u| u.distance(point) <= tolerance) {
                unique.push(point);
            }
        }
        let order = angular_sort(&unique, &SortOptions::clockwise());
        let ordered = order.into_iter().map(|i| unique[i]).collect();
        Region::edge(self.id, self.origin, ordered)
    }
}
