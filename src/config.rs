//! Diagram configuration and builder
//!
//! This module provides configuration types for deterministic, seeded diagram
//! generation and for tuning the boundary clipping step.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::{Result, VoronoiError};
use crate::generation::points::grid_capacity;
use crate::generation::LloydOptions;

/// Largest accepted number of decimal places for random generator snapping
pub const MAX_DECIMALS: i32 = 12;

/// Tuning knobs for clipping edge regions against the domain
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipOptions {
    /// Length of the outward boundary-search vector, as a multiple of the
    /// domain diagonal. Must be greater than 1 so the vector always reaches
    /// the boundary from any point inside the domain.
    pub outward_reach: f64,

    /// Geometric tolerance as a fraction of the domain diagonal
    ///
    /// Used when deciding whether a boundary cut belongs to a pair of regions
    /// and when merging nearly coincident polygon vertices.
    pub tolerance: f64,
}

impl ClipOptions {
    /// Validate the options
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `outward_reach <= 1` or `tolerance` is
    /// negative or not finite
    pub fn validate(&self) -> Result<()> {
        if !(self.outward_reach.is_finite() && self.outward_reach > 1.0) {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "outward reach must be a finite multiple > 1 of the domain diagonal (got {})",
                self.outward_reach
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "clip tolerance must be >= 0 (got {})",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Absolute length of the outward vector for `domain`
    #[inline]
    pub fn reach(&self, domain: &Domain) -> f64 {
        self.outward_reach * domain.diagonal()
    }

    /// Absolute tolerance for `domain`
    #[inline]
    pub fn absolute_tolerance(&self, domain: &Domain) -> f64 {
        self.tolerance * domain.diagonal()
    }
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            outward_reach: 2.0,
            tolerance: 1e-9,
        }
    }
}

/// Configuration for a seeded, randomly generated diagram
///
/// The same configuration always produces the same diagram.
///
/// # Example
///
/// ```rust
/// use bounded_voronoi::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .limits(10.0, 10.0)
///     .unwrap()
///     .point_count(50)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Random seed for generator placement
    pub seed: u64,

    /// Rectangle the diagram is clipped to
    pub domain: Domain,

    /// Number of random generator points
    pub point_count: usize,

    /// Decimal places generator coordinates are snapped to
    ///
    /// - 0: integer grid
    /// - 1: 0.1 grid spacing (default)
    pub decimals: i32,

    /// Lloyd relaxation applied after generation
    pub lloyd: LloydOptions,

    /// Boundary clipping options
    pub clip: ClipOptions,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            domain: Domain::default(),
            point_count: 50,
            decimals: 1,
            lloyd: LloydOptions::default(),
            clip: ClipOptions::default(),
        }
    }
}

/// Builder for creating a [`DiagramConfig`] with validation
///
/// # Example
///
/// ```rust
/// use bounded_voronoi::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(12345)
///     .point_count(30)
///     .unwrap()
///     .decimals(2)
///     .unwrap()
///     .lloyd_iterations(3)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.lloyd.max_iterations, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u64>,
    domain: Domain,
    point_count: usize,
    decimals: i32,
    lloyd: LloydOptions,
    clip: ClipOptions,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - domain: `[0, 10] × [0, 10]`
    /// - point_count: 50
    /// - decimals: 1
    /// - lloyd: 5 iterations, no early termination
    /// - clip: reach 2× the diagonal, tolerance 1e-9 of the diagonal
    pub fn new() -> Self {
        Self {
            seed: None,
            domain: Domain::default(),
            point_count: 50,
            decimals: 1,
            lloyd: LloydOptions::default(),
            clip: ClipOptions::default(),
        }
    }

    /// Set the random seed for generator placement
    ///
    /// The same seed with the same other parameters produces an identical
    /// diagram every time. Without a seed, one is drawn from entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the rectangular domain regions are clipped to
    ///
    /// See [`DiagramConfigBuilder::limits`] for a domain anchored at the origin.
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Use the domain `[0, xlim] × [0, ylim]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for non-positive or non-finite limits
    pub fn limits(mut self, xlim: f64, ylim: f64) -> Result<Self> {
        self.domain = Domain::from_limits(xlim, ylim)?;
        Ok(self)
    }

    /// Set the number of random generator points
    ///
    /// Generation fails if the count exceeds the distinct positions on the
    /// `10^-decimals` grid of the domain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `count < 3`
    pub fn point_count(mut self, count: usize) -> Result<Self> {
        if count < 3 {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "at least 3 generator points are required (got {})",
                count
            )));
        }
        self.point_count = count;
        Ok(self)
    }

    /// Set the decimal places random generators are rounded to
    ///
    /// With `0`, generators land on integer coordinates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `decimals` is negative or above [`MAX_DECIMALS`]
    pub fn decimals(mut self, decimals: i32) -> Result<Self> {
        validate_decimals(decimals)?;
        self.decimals = decimals;
        Ok(self)
    }

    /// Set the number of Lloyd relaxation iterations
    ///
    /// More iterations give more uniform regions. Use 0 to skip relaxation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if iterations > 100
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 100 {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "Lloyd iterations must be <= 100 (got {})",
                iterations
            )));
        }
        self.lloyd.max_iterations = iterations;
        Ok(self)
    }

    /// Convergence threshold as a fraction of the domain diagonal (0 disables it)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the threshold is negative
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd.convergence_threshold = threshold;
        Ok(self)
    }

    /// Set the length of outward boundary vectors, in domain diagonals
    ///
    /// Raise it when generators lie far outside the domain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` unless `reach > 1`
    pub fn outward_reach(mut self, reach: f64) -> Result<Self> {
        let clip = ClipOptions {
            outward_reach: reach,
            ..self.clip
        };
        clip.validate()?;
        self.clip = clip;
        Ok(self)
    }

    /// Set the clipping tolerance, in domain diagonals
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a negative tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Result<Self> {
        let clip = ClipOptions {
            tolerance,
            ..self.clip
        };
        clip.validate()?;
        self.clip = clip;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the snapping grid of the domain cannot
    /// hold `point_count` distinct points
    pub fn build(self) -> Result<DiagramConfig> {
        let capacity = grid_capacity(&self.domain, self.decimals);
        if (self.point_count as u128) > capacity {
            return Err(VoronoiError::InvalidConfiguration(format!(
                "{} points do not fit on a {}-decimal grid over {:?} ({} slots)",
                self.point_count, self.decimals, self.domain, capacity
            )));
        }

        Ok(DiagramConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            domain: self.domain,
            point_count: self.point_count,
            decimals: self.decimals,
            lloyd: self.lloyd,
            clip: self.clip,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_decimals(decimals: i32) -> Result<()> {
    if decimals < 0 {
        return Err(VoronoiError::InvalidConfiguration(format!(
            "decimal places must be >= 0 (got {})",
            decimals
        )));
    }
    if decimals > MAX_DECIMALS {
        return Err(VoronoiError::InvalidConfiguration(format!(
            "decimal places must be <= {} (got {})",
            MAX_DECIMALS, decimals
        )));
    }
    Ok(())
}
