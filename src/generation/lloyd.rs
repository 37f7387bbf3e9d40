//! Lloyd's relaxation for a more uniform tessellation
//!
//! Each step moves every generator to the centroid of its clipped region and
//! regenerates the whole diagram from the moved generators. Regions without a
//! centroid (no points left after clipping) are dropped, so the number of
//! generators can shrink from one step to the next.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ClipOptions;
use crate::domain::Domain;
use crate::error::Result;
use crate::region::Region;
use crate::Point;

/// Options for Lloyd's relaxation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Stop once the largest generator displacement falls below this fraction
    /// of the domain diagonal. 0.0 disables early termination.
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.0,
        }
    }
}

/// What happened during one relaxation step
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationStep {
    /// 1-based iteration number within the current run
    pub iteration: usize,
    /// Number of regions before the step
    pub regions_before: usize,
    /// Number of regions (and generators) after regenerating
    pub regions_after: usize,
    /// Ids of the regions dropped because they had no centroid
    pub dropped: Vec<usize>,
    /// Largest distance a surviving generator moved
    pub max_displacement: f64,
}

impl RelaxationStep {
    #[inline]
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Move every generator to its region's centroid
///
/// Returns the new generator list (in region order, dropped regions removed),
/// the ids of the dropped regions and the largest displacement.
pub(crate) fn centroid_step(regions: &[Region]) -> (Vec<Point>, Vec<usize>, f64) {
    let mut moved = Vec::with_capacity(regions.len());
    let mut dropped = Vec::new();
    let mut max_displacement: f64 = 0.0;

    for region in regions {
        match region.centroid() {
            Some(centroid) => {
                max_displacement = max_displacement.max(region.origin().distance(centroid));
                moved.push(centroid);
            }
            None => {
                warn!(
                    region = region.id(),
                    origin = %region.origin(),
                    "Dropping region without a centroid"
                );
                dropped.push(region.id());
            }
        }
    }

    (moved, dropped, max_displacement)
}

/// Drive relaxation steps until `max_iterations` or convergence
///
/// `step` receives the 1-based iteration number and performs one full
/// regenerate cycle. Shared by [`lloyd_relaxation_with_options`] and
/// [`crate::BoundedVoronoi::relax_with_options`].
pub(crate) fn run<F>(options: LloydOptions, domain: &Domain, mut step: F) -> Result<Vec<RelaxationStep>>
where
    F: FnMut(usize) -> Result<RelaxationStep>,
{
    let convergence_threshold = options.convergence_threshold * domain.diagonal();
    let total_start = Instant::now();

    debug!(
        max_iterations = options.max_iterations,
        threshold = options.convergence_threshold,
        absolute_threshold = convergence_threshold,
        "Lloyd relaxation starting"
    );

    let mut steps = Vec::with_capacity(options.max_iterations);
    let mut converged = false;

    for iteration in 1..=options.max_iterations {
        let iter_start = Instant::now();
        let report = step(iteration)?;

        debug!(
            iteration,
            regions = report.regions_after,
            dropped = report.dropped_count(),
            max_displacement = report.max_displacement,
            elapsed = ?iter_start.elapsed(),
            "Lloyd iteration"
        );

        let max_displacement = report.max_displacement;
        steps.push(report);

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            debug!(
                iteration,
                max_displacement, convergence_threshold, "Lloyd relaxation converged"
            );
            break;
        }
    }

    info!(
        iterations = steps.len(),
        max_iterations = options.max_iterations,
        converged,
        dropped = steps.iter().map(RelaxationStep::dropped_count).sum::<usize>(),
        elapsed = ?total_start.elapsed(),
        "Lloyd relaxation finished"
    );

    Ok(steps)
}

/// Relax a point set inside `domain` for a fixed number of iterations
///
/// # Arguments
///
/// * `points` - Initial generators
/// * `domain` - Rectangle the diagram is clipped to
/// * `iterations` - Number of relaxation iterations (typically 3-5)
///
/// # Errors
///
/// Propagates any error from regenerating the diagram, e.g.
/// `DegenerateGeometry` when fewer than three generators survive
pub fn lloyd_relaxation(points: Vec<Point>, domain: &Domain, iterations: usize) -> Result<Vec<Point>> {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, domain, options)
}

/// Relax a point set with custom options
///
/// Returns only the relaxed generators; use
/// [`crate::BoundedVoronoi::relax_with_options`] to keep the diagram and
/// the per-step reports.
pub fn lloyd_relaxation_with_options(
    mut points: Vec<Point>,
    domain: &Domain,
    options: LloydOptions,
) -> Result<Vec<Point>> {
    let clip = ClipOptions::default();
    run(options, domain, |iteration| {
        let generated = super::generate(&points, domain, &clip)?;
        let (moved, dropped, max_displacement) = centroid_step(&generated.regions);
        let report = RelaxationStep {
            iteration,
            regions_before: generated.regions.len(),
            regions_after: moved.len(),
            dropped,
            max_displacement,
        };
        points = moved;
        Ok(report)
    })?;
    Ok(points)
}
