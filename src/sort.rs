//! Angular ordering of points around a centre
//!
//! Angles are measured from a reference ray pointing straight up from the
//! centre. [`Vector::angle`] only yields the unsigned angle in `[0, 180]`,
//! so points left of the centre are reflected to `360 - angle`. Ascending
//! angle therefore walks clockwise: up, right, down, left.

use crate::vector::{AngleUnit, Vector};
use crate::Point;

/// Traversal direction for [`angular_sort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending angle from the up ray
    #[default]
    Clockwise,
    /// Descending angle from the up ray
    CounterClockwise,
}

/// Options for [`angular_sort`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    /// Fixed centre to sort around; the mean of the inputs when `None`
    pub centre: Option<Point>,
    pub direction: SortDirection,
}

impl SortOptions {
    pub fn clockwise() -> Self {
        Self::default()
    }

    pub fn counter_clockwise() -> Self {
        Self {
            direction: SortDirection::CounterClockwise,
            ..Self::default()
        }
    }

    pub fn around(mut self, centre: Point) -> Self {
        self.centre = Some(centre);
        self
    }
}

/// Mean of a set of points, `None` when empty
pub fn mean_point(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<Point>() / points.len() as f64)
}

/// Clockwise angle in degrees of `point` around `centre`, measured from straight up
///
/// A point coinciding with the centre has angle 0.
pub fn clockwise_angle(centre: Point, point: Point) -> f64 {
    let reference = Vector::between(centre, centre + Point::Y);
    let Ok(angle) = reference.angle(&Vector::between(centre, point), AngleUnit::Degrees) else {
        return 0.0;
    };
    if point.x < centre.x {
        360.0 - angle
    } else {
        angle
    }
}

/// Permutation that orders `points` by angle around the centre
///
/// The sort is stable: points with equal angles keep their input order.
pub fn angular_sort(points: &[Point], options: &SortOptions) -> Vec<usize> {
    let Some(centre) = options.centre.or_else(|| mean_point(points)) else {
        return Vec::new();
    };

    let angles: Vec<f64> = points.iter().map(|&p| clockwise_angle(centre, p)).collect();
    let mut order: Vec<usize> = (0..points.len()).collect();
    match options.direction {
        SortDirection::Clockwise => order.sort_by(|&a, &b| angles[a].total_cmp(&angles[b])),
        SortDirection::CounterClockwise => order.sort_by(|&a, &b| angles[b].total_cmp(&angles[a])),
    }
    order
}

/// Sort points together with caller-supplied ids
pub fn angular_sort_with_ids<T: Clone>(
    points: &[Point],
    ids: &[T],
    options: &SortOptions,
) -> (Vec<Point>, Vec<T>) {
    let order = angular_sort(points, options);
    let sorted_points = order.iter().map(|&i| points[i]).collect();
    let sorted_ids = order.iter().filter_map(|&i| ids.get(i).cloned()).collect();
    (sorted_points, sorted_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Point> {
        vec![
            Point::new(0.0, 10.0),
            Point::new(5.0, 12.0),
            Point::new(4.0, 6.0),
            Point::new(2.0, 8.0),
            Point::new(7.0, 7.0),
        ]
    }

    #[test]
    fn test_counter_clockwise_angles_non_increasing() {
        let points = sample();
        let centre = mean_point(&points).unwrap();
        let order = angular_sort(&points, &SortOptions::counter_clockwise());

        let angles: Vec<f64> = order.iter().map(|&i| clockwise_angle(centre, points[i])).collect();
        assert!(angles.windows(2).all(|w| w[0] >= w[1]), "angles: {:?}", angles);

        let mut seen = order.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_clockwise_angles_non_decreasing() {
        let points = sample();
        let centre = mean_point(&points).unwrap();
        let order = angular_sort(&points, &SortOptions::clockwise());
        let angles: Vec<f64> = order.iter().map(|&i| clockwise_angle(centre, points[i])).collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_compass_order() {
        let points = vec![
            Point::new(-1.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let options = SortOptions::clockwise().around(Point::ZERO);
        assert_eq!(angular_sort(&points, &options), vec![3, 2, 1, 0]);

        let options = SortOptions::counter_clockwise().around(Point::ZERO);
        assert_eq!(angular_sort(&points, &options), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ids_follow_points() {
        let points = sample();
        let ids = vec!["a", "b", "c", "d", "e"];
        let (sorted, sorted_ids) = angular_sort_with_ids(&points, &ids, &SortOptions::default());
        for (p, id) in sorted.iter().zip(&sorted_ids) {
            let original = ids.iter().position(|x| x == id).unwrap();
            assert_eq!(*p, points[original]);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let points = vec![Point::new(1.0, 0.0), Point::new(0.0, 1.0), Point::new(0.0, 3.0)];
        let options = SortOptions::clockwise().around(Point::ZERO);
        assert_eq!(angular_sort(&points, &options), vec![1, 2, 0]);
    }

    #[test]
    fn test_point_at_centre() {
        assert_eq!(clockwise_angle(Point::ONE, Point::ONE), 0.0);
        assert!(angular_sort(&[], &SortOptions::default()).is_empty());
    }
}
