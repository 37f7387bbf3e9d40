//! Raw Voronoi tessellation via Delaunay triangulation
//!
//! The Voronoi diagram is the dual of the Delaunay triangulation: every
//! Delaunay triangle contributes its circumcenter as a Voronoi vertex, and
//! every Delaunay edge separates the regions of its two endpoints. This module
//! is a thin wrapper around spade's triangulation that exposes that dual in
//! index form and nothing more; clipping happens elsewhere.

use std::collections::HashMap;

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::error::{Result, VoronoiError};
use crate::Point;

/// One corner of a raw region or ridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionVertex {
    /// Index into [`Tessellation::vertices`]
    Finite(usize),
    /// The region is open in this direction
    AtInfinity,
}

impl RegionVertex {
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            RegionVertex::Finite(i) => Some(i),
            RegionVertex::AtInfinity => None,
        }
    }
}

/// Unclipped Voronoi tessellation of a point set
///
/// Read-only once computed. Region `point_region[i]` belongs to input point `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tessellation {
    /// Voronoi vertices (circumcenters of the Delaunay triangles)
    pub vertices: Vec<Point>,
    /// Region index of each input point
    pub point_region: Vec<usize>,
    /// Vertices bounding each region, ordered around it
    pub regions: Vec<Vec<RegionVertex>>,
    /// Pairs of input points whose regions share a ridge
    pub ridge_points: Vec<[usize; 2]>,
    /// The two ends of each ridge, parallel to `ridge_points`
    pub ridge_vertices: Vec<[RegionVertex; 2]>,
}

type FaceVertexMap = HashMap<FixedFaceHandle<InnerTag>, usize>;

impl Tessellation {
    /// Tessellate a set of generator points
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` for fewer than three points, non-finite
    /// coordinates, duplicate points, or a fully collinear point set.
    pub fn compute(points: &[Point]) -> Result<Self> {
        if points.len() < 3 {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "at least 3 generator points are required (got {})",
                points.len()
            )));
        }

        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        let mut handles: Vec<FixedVertexHandle> = Vec::with_capacity(points.len());
        let mut generator_of: HashMap<FixedVertexHandle, usize> = HashMap::with_capacity(points.len());

        for (i, p) in points.iter().enumerate() {
            let handle = triangulation.insert(Point2::new(p.x, p.y)).map_err(|e| {
                VoronoiError::DegenerateGeometry(format!("generator {} at {} rejected: {:?}", i, p, e))
            })?;
            if let Some(first) = generator_of.insert(handle, i) {
                return Err(VoronoiError::DegenerateGeometry(format!(
                    "generators {} and {} coincide at {}",
                    first, i, p
                )));
            }
            handles.push(handle);
        }

        if triangulation.num_inner_faces() == 0 {
            return Err(VoronoiError::DegenerateGeometry(
                "all generator points are collinear".to_string(),
            ));
        }

        let mut face_vertex: FaceVertexMap = HashMap::with_capacity(triangulation.num_inner_faces());
        let mut vertices = Vec::with_capacity(triangulation.num_inner_faces());
        for face in triangulation.inner_faces() {
            let center = face.circumcenter();
            face_vertex.insert(face.fix(), vertices.len());
            vertices.push(Point::new(center.x, center.y));
        }

        let regions: Vec<Vec<RegionVertex>> = handles
            .iter()
            .map(|&handle| {
                let mut region = Vec::new();
                for edge in triangulation.vertex(handle).out_edges() {
                    let corner = match edge.face().as_inner() {
                        Some(inner) => RegionVertex::Finite(face_vertex[&inner.fix()]),
                        None => RegionVertex::AtInfinity,
                    };
                    region.push(corner);
                }
                region
            })
            .collect();

        let mut ridge_points = Vec::with_capacity(triangulation.num_undirected_edges());
        let mut ridge_vertices = Vec::with_capacity(triangulation.num_undirected_edges());
        for edge in triangulation.undirected_edges() {
            let directed = edge.as_directed();
            ridge_points.push([
                generator_of[&directed.from().fix()],
                generator_of[&directed.to().fix()],
            ]);
            let left = match directed.face().as_inner() {
                Some(inner) => RegionVertex::Finite(face_vertex[&inner.fix()]),
                None => RegionVertex::AtInfinity,
            };
            let right = match directed.rev().face().as_inner() {
                Some(inner) => RegionVertex::Finite(face_vertex[&inner.fix()]),
                None => RegionVertex::AtInfinity,
            };
            ridge_vertices.push([left, right]);
        }

        Ok(Self {
            vertices,
            point_region: (0..points.len()).collect(),
            regions,
            ridge_points,
            ridge_vertices,
        })
    }

    /// Raw region of input point `point`
    #[inline]
    pub fn region_of(&self, point: usize) -> &[RegionVertex] {
        self.point_region
            .get(point)
            .and_then(|&r| self.regions.get(r))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the region of `point` is open towards infinity
    pub fn is_unbounded(&self, point: usize) -> bool {
        self.region_of(point).contains(&RegionVertex::AtInfinity)
    }

    /// Coordinates of the finite vertices of the region of `point`, in order
    pub fn finite_vertices(&self, point: usize) -> Vec<Point> {
        self.region_of(point)
            .iter()
            .filter_map(|v| v.index())
            .map(|i| self.vertices[i])
            .collect()
    }

    /// Input points whose regions share a ridge with the region of `point`
    pub fn neighbors(&self, point: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .ridge_points
            .iter()
            .filter_map(|&[a, b]| match (a == point, b == point) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .collect();
        neighbors.sort_unstable(); // Deterministic ordering
        neighbors
    }
}
