//! Core bounded Voronoi generation
//!
//! Tessellates generator points with a Delaunay triangulation, clips the
//! resulting regions to the domain and relaxes generators towards their
//! region centroids.

mod clipping;
mod lloyd;
pub mod points;
pub mod tessellation;

pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions, RelaxationStep};
pub use points::random_grid_points;
pub use tessellation::{RegionVertex, Tessellation};

pub(crate) use lloyd::{centroid_step, run as run_relaxation};

use crate::config::ClipOptions;
use crate::domain::Domain;
use crate::error::Result;
use crate::region::Region;
use crate::spatial::SpatialIndex;
use crate::Point;

/// Everything produced by one generation pass
#[derive(Debug, Clone)]
pub(crate) struct Generated {
    pub tessellation: Tessellation,
    pub regions: Vec<Region>,
    pub index: SpatialIndex,
}

/// Tessellate `points` and clip every region to `domain`
///
/// Regions come back indexed by generator.
pub(crate) fn generate(points: &[Point], domain: &Domain, clip: &ClipOptions) -> Result<Generated> {
    clip.validate()?;

    // Step 1: Raw tessellation (rejects degenerate input)
    let tessellation = Tessellation::compute(points)?;

    // Step 2: Nearest-generator index, used to validate boundary cuts
    let index = SpatialIndex::new(points);

    // Step 3: Classify and clip
    let regions = clipping::clip_regions(points, &tessellation, domain, clip, &index)?;

    Ok(Generated {
        tessellation,
        regions,
        index,
    })
}
