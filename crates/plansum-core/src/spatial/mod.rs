//! Spatial types for physical coordinates, continuous indices and spacing.
//!
//! All types are thin wrappers over nalgebra so that arithmetic stays in
//! f64 regardless of the tensor backend used for interpolation.

pub mod point;
pub mod vector;
pub mod spacing;

pub use point::Point;
pub use vector::Vector;
pub use spacing::Spacing;

pub type Point3 = Point<3>;
pub type Vector3 = Vector<3>;
pub type Spacing3 = Spacing<3>;

/// A fractional position in a grid's own index space, ordered
/// (column, row, frame).
pub type ContinuousIndex = Point<3>;
