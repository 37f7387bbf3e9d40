//! Seeded random generator points
//!
//! Coordinates are snapped to a grid of `10^-decimals` spacing anchored at the
//! domain's lower-left corner, so `decimals = 1` on a 10×10 domain draws from
//! `{0.0, 0.1, ..., 10.0}` on each axis. Points may land on the boundary.
//! Duplicates are redrawn so every generator is distinct.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::validate_decimals;
use crate::domain::Domain;
use crate::error::{Result, VoronoiError};
use crate::Point;

/// Number of grid steps along a span of `extent` at `decimals` places
fn steps(extent: f64, decimals: i32) -> u64 {
    // Saturating float-to-int cast; the tiny bias absorbs representation error like 0.3 * 10.
    (extent * 10f64.powi(decimals) + 1e-9).floor() as u64
}

/// Number of distinct grid positions inside `domain` at `decimals` places
pub(crate) fn grid_capacity(domain: &Domain, decimals: i32) -> u128 {
    let nx = steps(domain.width(), decimals) as u128 + 1;
    let ny = steps(domain.height(), decimals) as u128 + 1;
    nx.saturating_mul(ny)
}

/// Generate `count` distinct random points on the snapping grid of `domain`
///
/// # Arguments
///
/// * `domain` - Rectangle to sample from (boundary included)
/// * `count` - Number of points
/// * `decimals` - Decimal places (grid spacing `10^-decimals`)
/// * `seed` - Seed for the ChaCha8 generator
///
/// # Errors
///
/// Returns `InvalidConfiguration` if `decimals` is negative (or unreasonably
/// large), or if the grid has fewer than `count` positions
///
/// # Example
///
/// ```rust
/// use bounded_voronoi::{generation::random_grid_points, Domain};
///
/// let domain = Domain::from_limits(10.0, 10.0).unwrap();
/// let points = random_grid_points(&domain, 50, 1, 42).unwrap();
/// assert_eq!(points.len(), 50);
/// ```
pub fn random_grid_points(domain: &Domain, count: usize, decimals: i32, seed: u64) -> Result<Vec<Point>> {
    validate_decimals(decimals)?;

    let capacity = grid_capacity(domain, decimals);
    if count as u128 > capacity {
        return Err(VoronoiError::InvalidConfiguration(format!(
            "cannot place {} distinct points on a grid with {} positions",
            count, capacity
        )));
    }

    let multiplier = 10f64.powi(decimals);
    let nx = steps(domain.width(), decimals);
    let ny = steps(domain.height(), decimals);
    let origin = domain.min();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut taken: HashSet<(u64, u64)> = HashSet::with_capacity(count);
    let mut points = Vec::with_capacity(count);

    while points.len() < count {
        let cell = (rng.gen_range(0..=nx), rng.gen_range(0..=ny));
        if !taken.insert(cell) {
            continue;
        }
        let point = Point::new(
            origin.x + cell.0 as f64 / multiplier,
            origin.y + cell.1 as f64 / multiplier,
        );
        points.push(domain.clamp(point));
    }

    Ok(points)
}
