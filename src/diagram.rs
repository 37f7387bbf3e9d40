//! BoundedVoronoi main structure

use std::collections::HashSet;

use tracing::debug;

use crate::config::{ClipOptions, DiagramConfig};
use crate::domain::Domain;
use crate::error::Result;
use crate::generation::{
    centroid_step, generate, random_grid_points, run_relaxation, LloydOptions, RegionVertex,
    RelaxationStep, Tessellation,
};
use crate::region::Region;
use crate::spatial::SpatialIndex;
use crate::Point;

/// A Voronoi diagram clipped to a rectangular domain
///
/// Owns the generator points, the domain, one finished [`Region`] per
/// generator and the raw tessellation they were clipped from. The diagram is
/// regenerated wholesale on every relaxation step.
///
/// # Examples
///
/// ```
/// use bounded_voronoi::*;
///
/// let domain = Domain::from_limits(10.0, 10.0).unwrap();
/// let mut diagram = BoundedVoronoi::random(domain, 50, 1, 42).unwrap();
/// println!("Generated {} regions", diagram.region_count());
///
/// let step = diagram.relax().unwrap();
/// println!("Largest move: {}", step.max_displacement);
///
/// let total: f64 = diagram.regions().iter().map(Region::area).sum();
/// assert!((total - 100.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedVoronoi {
    /// Generator points, indexed like `regions`
    points: Vec<Point>,

    /// Rectangle every region is clipped to
    domain: Domain,

    /// Finished regions (indexed by generator)
    regions: Vec<Region>,

    /// Raw output of the last tessellation
    tessellation: Tessellation,

    /// Nearest-generator lookups for position-to-region queries
    index: SpatialIndex,

    clip: ClipOptions,

    /// Options used by [`BoundedVoronoi::relax_with_config`]
    lloyd: LloydOptions,
}

impl BoundedVoronoi {
    /// Build the diagram of `points` clipped to `domain`
    ///
    /// # Errors
    ///
    /// - `DegenerateGeometry` for fewer than three points, duplicates,
    ///   non-finite coordinates or an all-collinear point set
    /// - `UnresolvedBoundaryIntersection` if a boundary cut cannot be placed
    ///
    /// # Example
    ///
    /// ```
    /// use bounded_voronoi::*;
    ///
    /// let points = vec![
    ///     Point::new(2.5, 2.5),
    ///     Point::new(7.5, 2.5),
    ///     Point::new(7.5, 7.5),
    ///     Point::new(2.5, 7.5),
    /// ];
    /// let diagram = BoundedVoronoi::new(points, Domain::from_limits(10.0, 10.0).unwrap()).unwrap();
    /// assert_eq!(diagram.region_count(), 4);
    /// assert!((diagram.regions()[0].area() - 25.0).abs() < 1e-9);
    /// ```
    pub fn new(points: Vec<Point>, domain: Domain) -> Result<Self> {
        Self::with_options(points, domain, ClipOptions::default())
    }

    /// Build the diagram with custom clipping options
    pub fn with_options(points: Vec<Point>, domain: Domain, clip: ClipOptions) -> Result<Self> {
        Self::build(points, domain, clip, LloydOptions::default())
    }

    /// Build the diagram of `points` with the domain and options of `config`
    ///
    /// No relaxation is applied; call [`BoundedVoronoi::relax_with_config`]
    /// for that.
    pub fn with_config(points: Vec<Point>, config: &DiagramConfig) -> Result<Self> {
        Self::build(points, config.domain, config.clip, config.lloyd)
    }

    /// Build the diagram of `count` random generators
    ///
    /// Generators are snapped to a `10^-decimals` grid and drawn from a
    /// ChaCha8 generator seeded with `seed`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for negative decimals or when the grid cannot
    /// hold `count` distinct points, plus the errors of [`BoundedVoronoi::new`]
    pub fn random(domain: Domain, count: usize, decimals: i32, seed: u64) -> Result<Self> {
        let points = random_grid_points(&domain, count, decimals, seed)?;
        Self::new(points, domain)
    }

    /// Generate random generators from `config` and relax them
    ///
    /// Applies `config.lloyd` after the initial build, so the result is the
    /// relaxed diagram.
    ///
    /// # Example
    ///
    /// ```
    /// use bounded_voronoi::*;
    ///
    /// let config = DiagramConfigBuilder::new()
    ///     .seed(12345)
    ///     .point_count(40)
    ///     .unwrap()
    ///     .lloyd_iterations(3)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let diagram = BoundedVoronoi::from_config(&config).unwrap();
    /// assert!(diagram.region_count() <= 40);
    /// ```
    pub fn from_config(config: &DiagramConfig) -> Result<Self> {
        let points = random_grid_points(&config.domain, config.point_count, config.decimals, config.seed)?;
        let mut diagram = Self::with_config(points, config)?;
        if config.lloyd.max_iterations > 0 {
            diagram.relax_with_config()?;
        }
        Ok(diagram)
    }

    fn build(points: Vec<Point>, domain: Domain, clip: ClipOptions, lloyd: LloydOptions) -> Result<Self> {
        let generated = generate(&points, &domain, &clip)?;
        debug!(
            generators = points.len(),
            vertices = generated.tessellation.vertices.len(),
            edge_regions = generated.regions.iter().filter(|r| r.is_edge()).count(),
            "Diagram generated"
        );
        Ok(Self {
            points,
            domain,
            regions: generated.regions,
            tessellation: generated.tessellation,
            index: generated.index,
            clip,
            lloyd,
        })
    }

    /// Current generator points
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    #[inline]
    pub fn clip_options(&self) -> &ClipOptions {
        &self.clip
    }

    #[inline]
    pub fn lloyd_options(&self) -> &LloydOptions {
        &self.lloyd
    }

    /// Number of regions (equal to the number of generators)
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// All regions, indexed by generator
    ///
    /// # Example
    ///
    /// ```
    /// # use bounded_voronoi::*;
    /// # let diagram = BoundedVoronoi::random(Domain::default(), 20, 1, 7).unwrap();
    /// for region in diagram.regions() {
    ///     println!("{} at {}: area {:.3}", region.id(), region.origin(), region.area());
    /// }
    /// ```
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Get a region by generator index
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn region(&self, id: usize) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Centroids of all regions that have one, in region order
    pub fn centroids(&self) -> impl Iterator<Item = Point> + '_ {
        self.regions.iter().filter_map(Region::centroid)
    }

    /// Sum of all region areas
    ///
    /// Equals the domain area when every generator lies inside the domain.
    pub fn total_area(&self) -> f64 {
        self.regions.iter().map(Region::area).sum()
    }

    /// Raw Voronoi vertices of the last tessellation (unclipped)
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.tessellation.vertices
    }

    /// Generator pairs separated by a ridge
    #[inline]
    pub fn ridge_points(&self) -> &[[usize; 2]] {
        &self.tessellation.ridge_points
    }

    /// Ridge end vertices, parallel to [`BoundedVoronoi::ridge_points`]
    #[inline]
    pub fn ridge_vertices(&self) -> &[[RegionVertex; 2]] {
        &self.tessellation.ridge_vertices
    }

    #[inline]
    pub fn tessellation(&self) -> &Tessellation {
        &self.tessellation
    }

    /// Region containing `position`
    ///
    /// Uses the nearest-generator index. Returns `None` outside the domain.
    ///
    /// # Example
    ///
    /// ```
    /// # use bounded_voronoi::*;
    /// let diagram = BoundedVoronoi::random(Domain::default(), 30, 1, 42).unwrap();
    /// let origin = diagram.regions()[0].origin();
    /// assert_eq!(diagram.find_region_at(origin).map(Region::id), Some(0));
    /// assert!(diagram.find_region_at(Point::new(-1.0, 5.0)).is_none());
    /// ```
    pub fn find_region_at(&self, position: Point) -> Option<&Region> {
        if !self.domain.contains(position) {
            return None;
        }
        self.index.find_nearest(position).and_then(|id| self.regions.get(id))
    }

    /// Ids of the regions sharing a ridge with region `id`
    ///
    /// Neighbourhood comes from the unclipped tessellation, so two edge
    /// regions whose shared ridge lies outside the domain still count.
    pub fn neighbors(&self, id: usize) -> Vec<usize> {
        if id >= self.regions.len() {
            return Vec::new();
        }
        self.tessellation.neighbors(id)
    }

    /// Regions within `hops` ridge crossings of region `id` (BFS)
    ///
    /// Includes `id` itself; empty if `id` is invalid. Sorted by id.
    pub fn regions_within_hops(&self, id: usize, hops: usize) -> Vec<usize> {
        if id >= self.regions.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![id];
        visited.insert(id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &region in &current {
                for neighbor in self.tessellation.neighbors(region) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut found: Vec<usize> = visited.into_iter().collect();
        found.sort_unstable();
        found
    }

    /// Run one Lloyd relaxation step
    ///
    /// Every generator moves to its region's centroid and the diagram is
    /// regenerated. Regions without a centroid are dropped and listed in the
    /// report. On error the diagram is left unchanged.
    pub fn relax(&mut self) -> Result<RelaxationStep> {
        self.step(1)
    }

    /// Run exactly `iterations` relaxation steps
    pub fn relax_n(&mut self, iterations: usize) -> Result<Vec<RelaxationStep>> {
        self.relax_with_options(LloydOptions {
            max_iterations: iterations,
            convergence_threshold: 0.0,
        })
    }

    /// Relax until `options.max_iterations` or convergence
    ///
    /// # Example
    ///
    /// ```
    /// # use bounded_voronoi::*;
    /// let mut diagram = BoundedVoronoi::random(Domain::default(), 40, 2, 3).unwrap();
    /// let steps = diagram
    ///     .relax_with_options(LloydOptions {
    ///         max_iterations: 20,
    ///         convergence_threshold: 0.01,
    ///     })
    ///     .unwrap();
    /// assert!(!steps.is_empty() && steps.len() <= 20);
    /// ```
    pub fn relax_with_options(&mut self, options: LloydOptions) -> Result<Vec<RelaxationStep>> {
        let domain = self.domain;
        run_relaxation(options, &domain, |iteration| self.step(iteration))
    }

    /// Relax with the options the diagram was configured with
    pub fn relax_with_config(&mut self) -> Result<Vec<RelaxationStep>> {
        self.relax_with_options(self.lloyd)
    }

    fn step(&mut self, iteration: usize) -> Result<RelaxationStep> {
        let (moved, dropped, max_displacement) = centroid_step(&self.regions);
        let generated = generate(&moved, &self.domain, &self.clip)?;

        let report = RelaxationStep {
            iteration,
            regions_before: self.regions.len(),
            regions_after: generated.regions.len(),
            dropped,
            max_displacement,
        };

        self.points = moved;
        self.regions = generated.regions;
        self.tessellation = generated.tessellation;
        self.index = generated.index;

        Ok(report)
    }
}
