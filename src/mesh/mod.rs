//! Element geometry consumed by the flux and limiter core.
//!
//! - [`ElementGeometry2D`]: inverse Jacobians, node coordinates and node
//!   volume weights for a flat set of local elements

mod geometry;

pub use geometry::ElementGeometry2D;
