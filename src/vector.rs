//! Affine vector arithmetic
//!
//! A [`Vector`] is a direction anchored at an origin point. Every geometric
//! step of the clipping pipeline (midpoints, outward normals, boundary
//! crossings, angular ordering) is expressed through it.
//!
//! # Equality ignores position
//!
//! Two vectors compare equal when their direction components are equal, no
//! matter where they are anchored. [`Vector::is_parallel`] relies on this, so
//! `==` is **not** a test for "same arrow in the plane".

use std::fmt;
use std::ops::{Mul, Neg, Sub};

use glam::{DMat2, DVec2};

use crate::error::{Result, VoronoiError};
use crate::Point;

/// Unit for [`Vector::angle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

/// Coordinate axis of a 2D vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component index of this axis
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The perpendicular axis
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// A direction anchored at an origin point
///
/// The direction is fixed at construction; the origin can be moved with
/// [`Vector::set_origin`] to re-anchor the same direction somewhere else.
/// Origin and direction always have the same number of components.
#[derive(Debug, Clone)]
pub struct Vector {
    origin: Vec<f64>,
    components: Vec<f64>,
}

impl Vector {
    /// Create a vector anchored at the zero point of matching dimension
    pub fn new(components: impl Into<Vec<f64>>) -> Self {
        let components = components.into();
        Self {
            origin: vec![0.0; components.len()],
            components,
        }
    }

    /// Create a vector with an explicit origin
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if origin and direction differ in length
    pub fn with_origin(origin: impl Into<Vec<f64>>, components: impl Into<Vec<f64>>) -> Result<Self> {
        let origin = origin.into();
        let components = components.into();
        if origin.len() != components.len() {
            return Err(VoronoiError::DimensionMismatch {
                expected: components.len(),
                found: origin.len(),
            });
        }
        Ok(Self { origin, components })
    }

    /// Vector from point `p` to point `q`, anchored at `p`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the points differ in length
    pub fn from_points(p: impl AsRef<[f64]>, q: impl AsRef<[f64]>) -> Result<Self> {
        let (p, q) = (p.as_ref(), q.as_ref());
        if p.len() != q.len() {
            return Err(VoronoiError::DimensionMismatch {
                expected: p.len(),
                found: q.len(),
            });
        }
        Ok(Self {
            origin: p.to_vec(),
            components: p.iter().zip(q).map(|(a, b)| b - a).collect(),
        })
    }

    /// Vector between two 2D points, anchored at `p`
    pub fn between(p: Point, q: Point) -> Self {
        Self {
            origin: p.to_array().to_vec(),
            components: (q - p).to_array().to_vec(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    #[inline]
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Move the vector to a new basepoint without touching its direction
    pub fn set_origin(&mut self, origin: impl Into<Vec<f64>>) -> Result<()> {
        let origin = origin.into();
        if origin.len() != self.dimension() {
            return Err(VoronoiError::DimensionMismatch {
                expected: self.dimension(),
                found: origin.len(),
            });
        }
        self.origin = origin;
        Ok(())
    }

    /// Consuming form of [`Vector::set_origin`]
    pub fn anchored_at(mut self, origin: impl Into<Vec<f64>>) -> Result<Self> {
        self.set_origin(origin)?;
        Ok(self)
    }

    /// `origin + direction`
    pub fn endpoint(&self) -> Vec<f64> {
        self.point_along(1.0)
    }

    /// Euclidean norm of the direction
    pub fn magnitude(&self) -> f64 {
        self.components.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Unit vector in the same direction, keeping the origin
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` for a zero-length vector
    pub fn normalise(&self) -> Result<Self> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "cannot normalise {} (magnitude {})",
                self, magnitude
            )));
        }
        Ok(self.clone() * (1.0 / magnitude))
    }

    /// Dot product over the shared components
    pub fn dot(&self, other: &Vector) -> f64 {
        self.components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cross product, padding 2D inputs with a zero z component
    ///
    /// The result is always three dimensional and anchored at the zero point.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` for inputs with more than three components
    pub fn cross(&self, other: &Vector) -> Result<Self> {
        let a = padded3(&self.components)?;
        let b = padded3(&other.components)?;
        Ok(Self::new(vec![
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]))
    }

    /// `true` if `self` is a scalar multiple of `other`
    ///
    /// The scalar is the ratio of the first non-zero component of `other`,
    /// and the scaled vector is compared with exact float equality. Nearly
    /// parallel vectors, or parallel ones whose ratio does not round back
    /// exactly, test `false`. This is a known precision limitation.
    pub fn is_parallel(&self, other: &Vector) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }
        let Some(index) = other.components.iter().position(|c| *c != 0.0) else {
            return false;
        };
        let scalar = self.components[index] / other.components[index];
        other.clone() * scalar == *self
    }

    /// `true` if the dot product is exactly zero
    pub fn is_orthogonal(&self, other: &Vector) -> bool {
        self.dot(other) == 0.0
    }

    /// Unsigned angle between two vectors, in `[0, 180]` degrees or `[0, π]` radians
    ///
    /// Which side of `self` the other vector lies on is not recoverable from
    /// this value; see [`crate::sort`] for how the ambiguity is resolved.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if either vector has zero length
    pub fn angle(&self, other: &Vector, unit: AngleUnit) -> Result<f64> {
        let denominator = self.magnitude() * other.magnitude();
        if denominator == 0.0 {
            return Err(VoronoiError::DegenerateGeometry(
                "angle with a zero-length vector".to_string(),
            ));
        }
        // Rounding can push the cosine just past ±1.
        let cosine = (self.dot(other) / denominator).clamp(-1.0, 1.0);
        let radians = cosine.acos();
        Ok(match unit {
            AngleUnit::Degrees => radians.to_degrees(),
            AngleUnit::Radians => radians,
        })
    }

    /// Orthogonal projection of `self` onto `other`, anchored at their shared origin
    ///
    /// # Errors
    ///
    /// Returns `OriginMismatch` unless both vectors start at the same point,
    /// `DegenerateGeometry` when projecting onto a zero-length vector
    pub fn project(&self, other: &Vector) -> Result<Self> {
        if self.origin != other.origin {
            return Err(VoronoiError::OriginMismatch);
        }
        let magnitude_sq = other.dot(other);
        if magnitude_sq == 0.0 {
            return Err(VoronoiError::DegenerateGeometry(
                "projection onto a zero-length vector".to_string(),
            ));
        }
        Ok(other.clone() * (self.dot(other) / magnitude_sq))
    }

    /// Point at fraction `t` along the vector (`0` is the origin, `1` the endpoint)
    pub fn point_along(&self, t: f64) -> Vec<f64> {
        self.origin
            .iter()
            .zip(&self.components)
            .map(|(o, d)| o + d * t)
            .collect()
    }

    /// Where the line through this vector crosses the axis-aligned line `axis = value`
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the vector is not two dimensional
    /// - `DegenerateGeometry` if the vector runs parallel to the boundary
    pub fn intersect_boundary(&self, axis: Axis, value: f64) -> Result<Point> {
        self.boundary_crossing(axis, value).map(|(_, point)| point)
    }

    /// Like [`Vector::intersect_boundary`], also returning the line parameter
    /// `t` of the crossing (`origin + t * direction`)
    pub(crate) fn boundary_crossing(&self, axis: Axis, value: f64) -> Result<(f64, Point)> {
        let origin = to_point(&self.origin)?;
        let direction = to_point(&self.components)?;
        let (a, b) = (axis.index(), axis.other().index());

        if direction[a] == 0.0 {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "{} is parallel to boundary {}={}",
                self, axis, value
            )));
        }

        // Unknowns (t, w): the fixed axis reaches `value`, the free axis lands on `w`.
        let system = DMat2::from_cols(DVec2::new(direction[a], direction[b]), DVec2::new(0.0, -1.0));
        let determinant = system.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "singular system intersecting {} with boundary {}={}",
                self, axis, value
            )));
        }
        let solution = system.inverse() * DVec2::new(value - origin[a], -origin[b]);

        let point = match axis {
            Axis::X => Point::new(value, solution.y),
            Axis::Y => Point::new(solution.y, value),
        };
        Ok((solution.x, point))
    }

    /// Distance from the origin to `point`, zero-padding the shorter tuple
    pub fn distance_to_origin(&self, point: impl AsRef<[f64]>) -> f64 {
        let point = point.as_ref();
        let len = point.len().max(self.origin.len());
        (0..len)
            .map(|i| {
                let o = self.origin.get(i).copied().unwrap_or(0.0);
                let p = point.get(i).copied().unwrap_or(0.0);
                (o - p) * (o - p)
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Keep only the first `dims` components of origin and direction
    pub fn truncated(&self, dims: usize) -> Self {
        let dims = dims.min(self.dimension());
        Self {
            origin: self.origin[..dims].to_vec(),
            components: self.components[..dims].to_vec(),
        }
    }

    /// Line equation in the form `x = x0 + a*t`, one line per axis
    pub fn line_equation(&self) -> String {
        const NAMES: [&str; 3] = ["x", "y", "z"];
        self.origin
            .iter()
            .zip(&self.components)
            .enumerate()
            .map(|(i, (o, d))| {
                let name = NAMES.get(i).map(|n| n.to_string()).unwrap_or_else(|| format!("x{}", i));
                format!("{} = {} + {}*t", name, o, d)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Interpret a coordinate slice as a 2D point
///
/// # Errors
///
/// Returns `DimensionMismatch` unless the slice has exactly two components
pub fn to_point(coords: &[f64]) -> Result<Point> {
    match coords {
        [x, y] => Ok(Point::new(*x, *y)),
        _ => Err(VoronoiError::DimensionMismatch {
            expected: 2,
            found: coords.len(),
        }),
    }
}

fn padded3(components: &[f64]) -> Result<[f64; 3]> {
    if components.len() > 3 {
        return Err(VoronoiError::DimensionMismatch {
            expected: 3,
            found: components.len(),
        });
    }
    let mut out = [0.0; 3];
    out[..components.len()].copy_from_slice(components);
    Ok(out)
}

impl From<DVec2> for Vector {
    fn from(direction: DVec2) -> Self {
        Self::new(direction.to_array().to_vec())
    }
}

impl PartialEq for Vector {
    /// Direction-only equality; the origin is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        let components = self
            .components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a - b)
            .collect();
        Vector {
            origin: self.origin,
            components,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(mut self, scalar: f64) -> Vector {
        self.components.iter_mut().for_each(|c| *c *= scalar);
        self
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self * -1.0
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |values: &[f64]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "Vector({})", join(&self.components))?;
        if self.origin.iter().any(|o| *o != 0.0) {
            write!(f, " @ ({})", join(&self.origin))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_creation() {
        let vect = Vector::new(vec![0.0, 10.0]);
        assert_eq!(vect.components(), &[0.0, 10.0]);
        assert_eq!(vect.origin(), &[0.0, 0.0]);
    }

    #[test]
    fn test_from_points() {
        let vect = Vector::from_points([2.0, -7.0, 0.0], [1.0, -3.0, -5.0]).unwrap();
        assert_eq!(vect.components(), &[-1.0, 4.0, 5.0]);
        assert_eq!(vect.origin(), &[2.0, -7.0, 0.0]);
        assert_eq!(vect.endpoint(), vec![1.0, -3.0, -5.0]);
    }

    #[test]
    fn test_from_points_endpoint_roundtrip() {
        let pairs = [
            ([0.0, 0.0], [3.5, -1.25]),
            ([-4.0, 9.0], [-4.0, 9.0]),
            ([1e3, -2e-3], [-7.0, 0.5]),
        ];
        for (p, q) in pairs {
            let vect = Vector::from_points(p, q).unwrap();
            assert_eq!(vect.origin(), &p);
            let end = vect.endpoint();
            assert_relative_eq!(end[0], q[0], epsilon = 1e-12);
            assert_relative_eq!(end[1], q[1], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_from_points_dimension_mismatch() {
        let result = Vector::from_points([1.0, 2.0], [1.0, 2.0, 3.0]);
        assert_eq!(
            result.unwrap_err(),
            VoronoiError::DimensionMismatch { expected: 2, found: 3 }
        );
    }

    #[test]
    fn test_with_origin_dimension_mismatch() {
        assert!(Vector::with_origin(vec![0.0], vec![1.0, 2.0]).is_err());
        let mut vect = Vector::new(vec![1.0, 2.0]);
        assert!(vect.set_origin(vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_magnitude() {
        let vect = Vector::new(vec![3.0, -5.0, 10.0]);
        assert_eq!(vect.magnitude(), 134f64.sqrt());
    }

    #[test]
    fn test_normalise_magnitude() {
        for components in [vec![3.0, 4.0], vec![-0.001, 0.0], vec![1e6, -2e6, 5.0], vec![0.3, 0.3]] {
            let unit = Vector::new(components).normalise().unwrap();
            assert_relative_eq!(unit.magnitude(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normalise_zero_vector() {
        let result = Vector::new(vec![0.0, 0.0]).normalise();
        assert!(matches!(result, Err(VoronoiError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_subtraction_and_scaling() {
        let a = Vector::new(vec![1.0, 2.0, 0.0]);
        let b = Vector::new(vec![2.0, 5.0, 6.0]);
        assert_eq!((a - b).components(), &[-1.0, -3.0, -6.0]);

        let c = Vector::new(vec![2.0, 5.0, 6.0]) * 5.0;
        assert_eq!(c.components(), &[10.0, 25.0, 30.0]);
        assert_eq!((-c).components(), &[-10.0, -25.0, -30.0]);
    }

    #[test]
    fn test_parallel() {
        let a = Vector::new(vec![2.0, -4.0, 1.0]);
        let b = Vector::new(vec![-6.0, 12.0, -3.0]);
        let c = Vector::new(vec![7.0, -4.0, 1.0]);

        assert!(a.is_parallel(&b));
        assert!(b.is_parallel(&a));
        assert!(!a.is_parallel(&c));
        assert!(!a.is_parallel(&Vector::new(vec![0.0, 0.0, 0.0])));
    }

    #[test]
    fn test_parallel_uses_first_nonzero_component() {
        let a = Vector::new(vec![0.0, 3.0]);
        let b = Vector::new(vec![0.0, -1.5]);
        assert!(a.is_parallel(&b));
    }

    #[test]
    fn test_orthogonal() {
        let a = Vector::new(vec![1.0, 2.0]);
        assert!(a.is_orthogonal(&Vector::new(vec![-2.0, 1.0])));
        assert!(!a.is_orthogonal(&Vector::new(vec![1.0, 1.0])));
    }

    #[test]
    fn test_dot_product() {
        let a = Vector::new(vec![0.0, 3.0, -7.0]);
        let b = Vector::new(vec![2.0, 3.0, 1.0]);
        assert_eq!(a.dot(&b), 2.0);
    }

    #[test]
    fn test_angle() {
        let a = Vector::new(vec![3.0, -4.0, -1.0]);
        let b = Vector::new(vec![0.0, 5.0, 2.0]);
        let expected = (-22.0 / (26f64.sqrt() * 29f64.sqrt())).acos();
        assert_relative_eq!(a.angle(&b, AngleUnit::Radians).unwrap(), expected, epsilon = 1e-12);

        let up = Vector::new(vec![0.0, 1.0]);
        let right = Vector::new(vec![1.0, 0.0]);
        assert_relative_eq!(up.angle(&right, AngleUnit::Degrees).unwrap(), 90.0, epsilon = 1e-12);
        assert_relative_eq!(up.angle(&-up.clone(), AngleUnit::Degrees).unwrap(), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_zero_length() {
        let up = Vector::new(vec![0.0, 1.0]);
        assert!(up.angle(&Vector::new(vec![0.0, 0.0]), AngleUnit::Degrees).is_err());
    }

    #[test]
    fn test_cross() {
        let x = Vector::new(vec![1.0, 0.0]);
        let y = Vector::new(vec![0.0, 1.0]);
        assert_eq!(x.cross(&y).unwrap().components(), &[0.0, 0.0, 1.0]);

        // Rotating by crossing with -z turns a direction 90 degrees counter-clockwise
        let down_z = Vector::new(vec![0.0, 0.0, -1.0]);
        assert_eq!(x.cross(&down_z).unwrap().components(), &[0.0, 1.0, 0.0]);

        assert!(Vector::new(vec![1.0; 4]).cross(&x).is_err());
    }

    #[test]
    fn test_point_along() {
        let vect = Vector::from_points([0.0, 6.0], [0.0, 16.0]).unwrap();
        assert_eq!(vect.point_along(0.5), vec![0.0, 11.0]);
        assert_eq!(vect.point_along(0.0), vec![0.0, 6.0]);
        assert_eq!(vect.point_along(1.0), vec![0.0, 16.0]);
    }

    #[test]
    fn test_shift_origin() {
        let mut vect = Vector::new(vec![5.0, 5.0]);
        vect.set_origin(vec![2.0, 2.0]).unwrap();
        assert_eq!(vect.endpoint(), vec![7.0, 7.0]);
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = Vector::with_origin(vec![1.0, 1.0], vec![2.0, 3.0]).unwrap();
        let b = Vector::with_origin(vec![-8.0, 4.0], vec![2.0, 3.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_project() {
        let a = Vector::new(vec![3.0, 4.0]);
        let b = Vector::new(vec![1.0, 0.0]);
        let projected = a.project(&b).unwrap();
        assert_eq!(projected.components(), &[3.0, 0.0]);
        assert_eq!(projected.origin(), &[0.0, 0.0]);
    }

    #[test]
    fn test_project_requires_shared_origin() {
        let a = Vector::with_origin(vec![1.0, 0.0], vec![3.0, 4.0]).unwrap();
        let b = Vector::new(vec![1.0, 0.0]);
        assert_eq!(a.project(&b).unwrap_err(), VoronoiError::OriginMismatch);
    }

    #[test]
    fn test_intersect_boundary_parallel() {
        let vertical = Vector::with_origin(vec![2.0, 2.0], vec![0.0, 5.0]).unwrap();
        let result = vertical.intersect_boundary(Axis::X, 10.0);
        assert!(matches!(result, Err(VoronoiError::DegenerateGeometry(_))));

        let horizontal = Vector::with_origin(vec![2.0, 2.0], vec![-3.0, 0.0]).unwrap();
        assert!(horizontal.intersect_boundary(Axis::Y, 0.0).is_err());
    }

    #[test]
    fn test_intersect_boundary_lands_on_line() {
        let vect = Vector::with_origin(vec![8.45, 2.2], vec![5.931990380498499, -8.050558373533681]).unwrap();

        let on_y = vect.intersect_boundary(Axis::Y, 10.0).unwrap();
        assert_eq!(on_y.y, 10.0);
        let on_x = vect.intersect_boundary(Axis::X, 0.0).unwrap();
        assert_eq!(on_x.x, 0.0);

        // The crossing lies on the vector's own line
        let diagonal = Vector::with_origin(vec![1.0, 1.0], vec![1.0, 2.0]).unwrap();
        let hit = diagonal.intersect_boundary(Axis::X, 4.0).unwrap();
        assert_relative_eq!(hit.y, 7.0, epsilon = 1e-12);
        let (t, _) = diagonal.boundary_crossing(Axis::Y, 0.0).unwrap();
        assert_relative_eq!(t, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_boundary_requires_2d() {
        let vect = Vector::new(vec![1.0, 1.0, 1.0]);
        assert!(matches!(
            vect.intersect_boundary(Axis::X, 1.0),
            Err(VoronoiError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_distance_to_origin_pads() {
        let vect = Vector::with_origin(vec![8.45, 2.2], vec![1.0, 0.0]).unwrap();
        assert_relative_eq!(vect.distance_to_origin([8.45, 2.2, 1.0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(vect.distance_to_origin([11.45, 6.2]), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display_and_line_equation() {
        let vect = Vector::with_origin(vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        assert_eq!(vect.to_string(), "Vector(3, 4) @ (1, 2)");
        assert_eq!(Vector::new(vec![3.0, 4.0]).to_string(), "Vector(3, 4)");
        assert_eq!(vect.line_equation(), "x = 1 + 3*t\ny = 2 + 4*t");
    }
}
