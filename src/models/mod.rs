//! Domain models for featuremap.
//!
//! # Pipeline Values
//!
//! - [`Feature`]: The parsed feature file, a three-level tree of
//!   feature → scenarios → steps. Every step carries its [`StepKind`].
//! - [`LayoutNode`]: One tree node with its page position, tier and style.
//! - [`Shape`] / [`Edge`]: Page-ready rectangles and connectors with explicit
//!   coordinates, grouped in a [`Geometry`].
//!
//! All of these are build-scoped: created fresh for one diagram and dropped
//! once the package has been written.

mod feature;
mod geometry;
mod layout;

pub use feature::*;
pub use geometry::*;
pub use layout::*;
