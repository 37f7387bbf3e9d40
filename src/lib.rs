//! Bounded 2D Voronoi diagrams with Lloyd relaxation
//!
//! Builds the Voronoi tessellation of a set of generator points, clips every
//! region to a rectangular domain, and relaxes generators towards their region
//! centroids for a more uniform partition.
//!
//! # Quick Start
//!
//! ```rust
//! use bounded_voronoi::*;
//!
//! // 50 random generators on a 0.1 grid inside [0, 10] x [0, 10]
//! let domain = Domain::from_limits(10.0, 10.0).unwrap();
//! let mut diagram = BoundedVoronoi::random(domain, 50, 1, 42).unwrap();
//!
//! // Five Lloyd iterations
//! let steps = diagram.relax_n(5).unwrap();
//! println!("{} regions after relaxing", steps.last().unwrap().regions_after);
//!
//! // Closed polygons, ready for a renderer
//! for region in diagram.regions() {
//!     println!("{}: {} vertices, area {:.2}", region.id(), region.vertex_count(), region.area());
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) nearest-generator lookups using a KD-tree
//! - `serde`: Serialization support for configuration, domains and regions
//!
//! # Logging
//!
//! Generation and relaxation emit `tracing` events (`debug` per pass,
//! `info` per relaxation run, `warn` for dropped regions). Install a
//! subscriber to see them.

// Modules
pub mod error;
pub mod config;
pub mod domain;
pub mod vector;
pub mod sort;
pub mod region;
pub mod generation;
pub mod diagram;
pub mod spatial;

/// 2D point type used throughout the crate
pub type Point = glam::DVec2;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{ClipOptions, DiagramConfig, DiagramConfigBuilder, MAX_DECIMALS};
pub use domain::Domain;
pub use vector::{AngleUnit, Axis, Vector};
pub use sort::{angular_sort, angular_sort_with_ids, SortDirection, SortOptions};
pub use region::{shoelace, EdgeRegion, Region};
pub use generation::{LloydOptions, RegionVertex, RelaxationStep, Tessellation};
pub use diagram::BoundedVoronoi;
pub use spatial::SpatialIndex;
