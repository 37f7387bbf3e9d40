//! The rectangular domain a diagram is clipped to

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::vector::Axis;
use crate::Point;

/// Axis-aligned rectangle `[x0, x1] × [y0, y1]`
///
/// Containment tests treat the rectangle as closed: points on an edge are inside.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: Point,
    max: Point,
}

impl Domain {
    /// Create a domain from x and y bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a bound is not finite or a range is empty
    pub fn new(xbounds: (f64, f64), ybounds: (f64, f64)) -> Result<Self> {
        let (x0, x1) = xbounds;
        let (y0, y1) = ybounds;
        if ![x0, x1, y0, y1].iter().all(|v| v.is_finite()) {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "domain bounds must be finite (x: {:?}, y: {:?})",
                xbounds, ybounds
            )));
        }
        if x0 >= x1 || y0 >= y1 {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "domain bounds must be increasing ranges (x: {:?}, y: {:?})",
                xbounds, ybounds
            )));
        }
        Ok(Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        })
    }

    /// Domain `[0, xlim] × [0, ylim]`
    pub fn from_limits(xlim: f64, ylim: f64) -> Result<Self> {
        Self::new((0.0, xlim), (0.0, ylim))
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    #[inline]
    pub fn xbounds(&self) -> (f64, f64) {
        (self.min.x, self.max.x)
    }

    #[inline]
    pub fn ybounds(&self) -> (f64, f64) {
        (self.min.y, self.max.y)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Length of the rectangle's diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }

    #[inline]
    pub fn centre(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    /// Closed containment test
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.contains_with_tolerance(point, 0.0)
    }

    /// Containment test with every edge pushed outward by `tolerance`
    pub fn contains_with_tolerance(&self, point: Point, tolerance: f64) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }

    /// Nearest point inside the rectangle
    #[inline]
    pub fn clamp(&self, point: Point) -> Point {
        point.clamp(self.min, self.max)
    }

    /// Corners, clockwise from the top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min.x, self.max.y),
            self.max,
            Point::new(self.max.x, self.min.y),
            self.min,
        ]
    }

    /// The four boundary lines as `(axis, value)`: left, right, bottom, top
    pub fn boundaries(&self) -> [(Axis, f64); 4] {
        [
            (Axis::X, self.min.x),
            (Axis::X, self.max.x),
            (Axis::Y, self.min.y),
            (Axis::Y, self.max.y),
        ]
    }
}

impl Default for Domain {
    /// `[0, 10] × [0, 10]`
    fn default() -> Self {
        Self {
            min: Point::ZERO,
            max: Point::splat(10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_limits() {
        let domain = Domain::from_limits(10.0, 5.0).unwrap();
        assert_eq!(domain.xbounds(), (0.0, 10.0));
        assert_eq!(domain.ybounds(), (0.0, 5.0));
        assert_eq!(domain.area(), 50.0);
        assert_eq!(domain.centre(), Point::new(5.0, 2.5));
        assert_eq!(Domain::default(), Domain::from_limits(10.0, 10.0).unwrap());
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(Domain::from_limits(0.0, 10.0).is_err());
        assert!(Domain::from_limits(-1.0, 10.0).is_err());
        assert!(Domain::new((0.0, f64::INFINITY), (0.0, 1.0)).is_err());
        assert!(Domain::new((0.0, 1.0), (f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_closed_containment() {
        let domain = Domain::from_limits(10.0, 10.0).unwrap();
        assert!(domain.contains(Point::new(0.0, 10.0)));
        assert!(domain.contains(Point::new(5.0, 5.0)));
        assert!(!domain.contains(Point::new(10.000001, 5.0)));
        assert!(domain.contains_with_tolerance(Point::new(10.000001, 5.0), 1e-3));
        assert_eq!(domain.clamp(Point::new(-3.0, 12.0)), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_corners_and_boundaries() {
        let domain = Domain::new((1.0, 3.0), (2.0, 6.0)).unwrap();
        let corners = domain.corners();
        assert!(corners.iter().all(|c| domain.contains(*c)));
        assert_eq!(corners[3], Point::new(1.0, 2.0));
        assert_eq!(domain.boundaries()[1], (Axis::X, 3.0));
        assert_eq!(domain.boundaries()[3], (Axis::Y, 6.0));
    }
}
