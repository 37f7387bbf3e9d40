//! Clipping raw Voronoi regions against the domain
//!
//! Regions whose vertices all lie inside the domain are kept as they are.
//! Every other region is an edge region and is rebuilt from:
//!
//! 1. its finite vertices inside the domain,
//! 2. boundary cuts between neighbouring unbounded regions, found by walking
//!    the outer loop of hull generators and shooting an outward vector from
//!    the midpoint of each consecutive pair,
//! 3. crossings of finite ridges that leave the domain,
//! 4. the domain corners that fall inside its cell.

use tracing::debug;

use crate::config::ClipOptions;
use crate::domain::Domain;
use crate::error::{Result, VoronoiError};
use crate::region::{EdgeRegion, Region};
use crate::sort::{angular_sort, angular_sort_with_ids, mean_point, SortOptions};
use crate::spatial::SpatialIndex;
use crate::vector::Vector;
use crate::Point;

use super::tessellation::Tessellation;

/// Per-generator state while clipping
enum Pending {
    Interior(Region),
    Edge(EdgeRegion),
}

/// Shared inputs of one clipping pass
struct Clipper<'a> {
    points: &'a [Point],
    domain: &'a Domain,
    index: &'a SpatialIndex,
    reach: f64,
    tolerance: f64,
}

impl Clipper<'_> {
    /// Whether `position` lies in the domain and in the cells of all of `generators`
    fn belongs_to(&self, position: Point, generators: &[usize]) -> bool {
        if !self.domain.contains_with_tolerance(position, self.tolerance) {
            return false;
        }
        let Some(nearest) = self.index.nearest_distance_squared(position) else {
            return false;
        };
        let nearest = nearest.sqrt();
        generators
            .iter()
            .all(|&g| position.distance(self.points[g]) <= nearest + self.tolerance)
    }

    /// Boundary cut(s) for the consecutive outer-loop pair `(u, v)`
    ///
    /// Returns the accepted cut points, already clamped onto the domain.
    fn pair_cuts(&self, u: usize, v: usize) -> Result<Vec<Point>> {
        let unresolved = || VoronoiError::UnresolvedBoundaryIntersection { first: u, second: v };

        let uv = Vector::between(self.points[u], self.points[v]);
        let midpoint = uv.point_along(0.5);
        let outward = uv
            .cross(&Vector::new(vec![0.0, 0.0, -1.0]))?
            .truncated(2)
            .normalise()
            .map_err(|_| unresolved())?
            * self.reach;
        let outward = outward.anchored_at(midpoint)?;

        let mut forward: Option<(f64, Point)> = None;
        let mut backward: Option<(f64, Point)> = None;
        for (axis, value) in self.domain.boundaries() {
            let Ok((t, crossing)) = outward.boundary_crossing(axis, value) else {
                continue;
            };
            let distance = outward.distance_to_origin(crossing.to_array());
            if (-1e-12..=1.0).contains(&t) {
                if forward.map_or(true, |(best, _)| distance < best) {
                    forward = Some((distance, crossing));
                }
            } else if (-1.0..0.0).contains(&t) && backward.map_or(true, |(best, _)| distance < best) {
                backward = Some((distance, crossing));
            }
        }

        let Some((_, primary)) = forward else {
            return Err(unresolved());
        };

        let mut cuts = Vec::with_capacity(2);
        if self.belongs_to(primary, &[u, v]) {
            cuts.push(self.domain.clamp(primary));
        } else {
            debug!(first = u, second = v, cut = %primary, "Boundary cut rejected, closer generator exists");
        }
        if let Some((_, opposite)) = backward {
            if self.belongs_to(opposite, &[u, v]) {
                cuts.push(self.domain.clamp(opposite));
            }
        }
        Ok(cuts)
    }

    /// Boundary crossings of the finite ridge `a`-`b` between `generators`
    ///
    /// The line is taken from the generators' bisector rather than from the
    /// ridge ends, which can sit near infinity for almost collinear hull
    /// points. A crossing is kept when its projection onto the bisector falls
    /// between the projections of the two ends.
    fn ridge_cuts(&self, a: Point, b: Point, generators: [usize; 2]) -> Vec<Point> {
        let (p, q) = (self.points[generators[0]], self.points[generators[1]]);
        let midpoint = (p + q) * 0.5;
        let Some(direction) = (q - p).perp().try_normalize() else {
            return Vec::new();
        };
        let bisector = Vector::between(midpoint, midpoint + direction * self.reach);

        let (sa, sb) = ((a - midpoint).dot(direction), (b - midpoint).dot(direction));
        let span = (sa.min(sb) - self.tolerance)..=(sa.max(sb) + self.tolerance);
        self.domain
            .boundaries()
            .into_iter()
            .filter_map(|(axis, value)| bisector.boundary_crossing(axis, value).ok())
            .map(|(_, crossing)| crossing)
            .filter(|crossing| span.contains(&(*crossing - midpoint).dot(direction)))
            .filter(|crossing| self.belongs_to(*crossing, &generators))
            .map(|crossing| self.domain.clamp(crossing))
            .collect()
    }
}

/// Clip every region of `tessellation` to `domain`
///
/// The returned regions are indexed by generator: `regions[i].id() == i`.
///
/// # Errors
///
/// Returns `UnresolvedBoundaryIntersection` when an outer-loop pair has no
/// boundary crossing within reach
pub(crate) fn clip_regions(
    points: &[Point],
    tessellation: &Tessellation,
    domain: &Domain,
    options: &ClipOptions,
    index: &SpatialIndex,
) -> Result<Vec<Region>> {
    let clipper = Clipper {
        points,
        domain,
        index,
        reach: options.reach(domain),
        tolerance: options.absolute_tolerance(domain),
    };

    // Classify
    let mut pending: Vec<Pending> = (0..points.len())
        .map(|id| {
            let vertices = tessellation.finite_vertices(id);
            let outside = vertices.iter().any(|v| !domain.contains(*v));
            if outside || tessellation.is_unbounded(id) {
                Pending::Edge(EdgeRegion::new(id, points[id], vertices))
            } else {
                let order = angular_sort(&vertices, &SortOptions::clockwise());
                let ordered = order.into_iter().map(|i| vertices[i]).collect();
                Pending::Interior(Region::interior(id, points[id], ordered))
            }
        })
        .collect();

    let hull: Vec<usize> = (0..points.len()).filter(|&id| tessellation.is_unbounded(id)).collect();
    let edge_count = pending.iter().filter(|p| matches!(p, Pending::Edge(_))).count();
    debug!(
        regions = points.len(),
        edge = edge_count,
        unbounded = hull.len(),
        "Classified regions"
    );

    // Outer loop: unbounded regions clockwise around the generator centroid, closed
    if let Some(centre) = mean_point(points) {
        let origins: Vec<Point> = hull.iter().map(|&id| points[id]).collect();
        let (_, mut outer) = angular_sort_with_ids(&origins, &hull, &SortOptions::clockwise().around(centre));
        if let Some(&first) = outer.first() {
            outer.push(first);
        }

        for pair in outer.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            if u == v {
                continue;
            }
            for cut in clipper.pair_cuts(u, v)? {
                for id in [u, v] {
                    if let Pending::Edge(region) = &mut pending[id] {
                        region.add_boundary_point(cut);
                    }
                }
            }
        }
    }

    // Finite ridges leaving the domain
    for (generators, ends) in tessellation.ridge_points.iter().zip(&tessellation.ridge_vertices) {
        let (Some(a), Some(b)) = (ends[0].index(), ends[1].index()) else {
            continue;
        };
        let (a, b) = (tessellation.vertices[a], tessellation.vertices[b]);
        if domain.contains(a) && domain.contains(b) {
            continue;
        }
        for cut in clipper.ridge_cuts(a, b, *generators) {
            for &id in generators {
                if let Pending::Edge(region) = &mut pending[id] {
                    region.add_boundary_point(cut);
                }
            }
        }
    }

    // Corners belong to every edge region whose generator is nearest
    for corner in domain.corners() {
        let Some(nearest) = index.nearest_distance_squared(corner) else {
            continue;
        };
        let nearest = nearest.sqrt();
        for slot in pending.iter_mut() {
            if let Pending::Edge(region) = slot {
                if corner.distance(region.origin()) <= nearest + clipper.tolerance {
                    region.add_boundary_point(corner);
                }
            }
        }
    }

    let (xbounds, ybounds) = (domain.xbounds(), domain.ybounds());
    let regions = pending
        .into_iter()
        .map(|slot| match slot {
            Pending::Interior(region) => region,
            Pending::Edge(mut region) => {
                region.remove_outside_points(xbounds, ybounds);
                region.finish(clipper.tolerance)
            }
        })
        .collect();

    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::tessellation::RegionVertex;
    use approx::assert_relative_eq;

    fn open_corners(tessellation: &Tessellation, id: usize) -> usize {
        tessellation
            .region_of(id)
            .iter()
            .filter(|v| **v == RegionVertex::AtInfinity)
            .count()
    }

    fn clip(points: &[Point], domain: &Domain) -> Result<Vec<Region>> {
        let tessellation = Tessellation::compute(points)?;
        let index = SpatialIndex::new(points);
        clip_regions(points, &tessellation, domain, &ClipOptions::default(), &index)
    }

    #[test]
    fn test_four_quadrants() {
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        let points = vec![
            Point::new(2.5, 2.5),
            Point::new(7.5, 2.5),
            Point::new(7.5, 7.5),
            Point::new(2.5, 7.5),
        ];
        let regions = clip(&points, &domain).unwrap();

        assert_eq!(regions.len(), 4);
        for (id, region) in regions.iter().enumerate() {
            assert_eq!(region.id(), id);
            assert!(region.is_edge());
            assert_eq!(region.vertex_count(), 4);
            assert_relative_eq!(region.area(), 25.0, epsilon = 1e-9);
            let centroid = region.centroid().unwrap();
            assert_relative_eq!(centroid.x, points[id].x, epsilon = 1e-9);
            assert_relative_eq!(centroid.y, points[id].y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_interior_region_untouched() {
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        let points = vec![
            Point::new(5.0, 5.0),
            Point::new(3.0, 5.0),
            Point::new(7.0, 5.0),
            Point::new(5.0, 3.0),
            Point::new(5.0, 7.0),
        ];
        let regions = clip(&points, &domain).unwrap();

        let centre = &regions[0];
        assert!(!centre.is_edge());
        assert_relative_eq!(centre.area(), 4.0, epsilon = 1e-9);
        assert!(regions[1..].iter().all(Region::is_edge));

        let total: f64 = regions.iter().map(Region::area).sum();
        assert_relative_eq!(total, domain.area(), epsilon = 1e-6);
    }

    #[test]
    fn test_areas_cover_domain() {
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        let points: Vec<Point> = (0..25)
            .map(|i| {
                let i = i as f64;
                Point::new((i * 3.7 + 0.3) % 10.0, (i * 7.3 + 0.9) % 10.0)
            })
            .collect();
        let regions = clip(&points, &domain).unwrap();

        assert_eq!(regions.len(), points.len());
        assert!(regions.iter().all(|r| r.area() > 0.0));
        let total: f64 = regions.iter().map(Region::area).sum();
        assert_relative_eq!(total, domain.area(), epsilon = 1e-6);
        for region in &regions {
            assert!(region.points().iter().all(|p| domain.contains(*p)));
            assert!(region.contains(region.origin()));
        }
    }

    #[test]
    fn test_thin_triangle_far_vertex() {
        // Obtuse hull triangle: the circumcenter of the bottom edge lies far outside
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        let points = vec![
            Point::new(1.0, 5.0),
            Point::new(9.0, 5.0),
            Point::new(5.0, 5.5),
            Point::new(5.0, 9.0),
        ];
        let tessellation = Tessellation::compute(&points).unwrap();
        assert_eq!(open_corners(&tessellation, 2), 0);

        let regions = clip(&points, &domain).unwrap();
        let total: f64 = regions.iter().map(Region::area).sum();
        assert_relative_eq!(total, domain.area(), epsilon = 1e-6);
    }

    #[test]
    fn test_ridge_cut_from_far_vertex() {
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        let points = vec![Point::new(4.0, 4.0), Point::new(6.0, 4.0)];
        let index = SpatialIndex::new(&points);
        let options = ClipOptions::default();
        let clipper = Clipper {
            points: &points,
            domain: &domain,
            index: &index,
            reach: options.reach(&domain),
            tolerance: options.absolute_tolerance(&domain),
        };

        let cuts = clipper.ridge_cuts(Point::new(5.0, 5.0), Point::new(5.0, 1.2e16), [0, 1]);
        assert_eq!(cuts.len(), 1);
        assert_relative_eq!(cuts[0].x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(cuts[0].y, 10.0, epsilon = 1e-9);

        // Both ends inside the upper half: no crossing of y=0 is taken
        let cuts = clipper.ridge_cuts(Point::new(5.0, 5.0), Point::new(5.0, 8.0), [0, 1]);
        assert!(cuts.is_empty());
    }

    #[test]
    fn test_collinear_hull_generators() {
        // The right-hand triple sits on one line, putting a circumcenter near 1e16
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        let points = vec![
            Point::new(2.0, 2.0),
            Point::new(6.8, 9.0),
            Point::new(3.0, 8.0),
            Point::new(1.0, 5.0),
            Point::new(5.0, 4.0),
            Point::new(4.0, 1.0),
            Point::new(8.3, 5.1),
            Point::new(7.3, 7.7),
        ];
        let regions = clip(&points, &domain).unwrap();

        assert_eq!(regions.len(), points.len());
        let total: f64 = regions.iter().map(Region::area).sum();
        assert_relative_eq!(total, domain.area(), epsilon = 1e-6);
        for region in &regions {
            assert!(region.area() > 0.0);
            assert!(region.contains(region.origin()));
        }
    }

    #[test]
    fn test_unresolved_when_out_of_reach() {
        // Generators far outside a tiny domain: the outward vectors cannot reach it
        let domain = Domain::from_limits(1.0, 1.0).unwrap();
        let points = vec![
            Point::new(100.0, 100.0),
            Point::new(110.0, 100.0),
            Point::new(105.0, 110.0),
        ];
        let result = clip(&points, &domain);
        assert!(matches!(
            result,
            Err(VoronoiError::UnresolvedBoundaryIntersection { .. })
        ));
    }
}
