//! Turns Gherkin feature files into Visio (`.vsdx`) hierarchy diagrams.
//!
//! ```text
//! text ─parser─▶ Feature ─layout─▶ LayoutNode[] ─geometry─▶ Shape[] + Edge[]
//!      ─package─▶ Package ─container─▶ .vsdx on disk
//! ```
//!
//! Every stage is a pure function of its input except the final write, and
//! every value is scoped to a single build.

pub mod config;
pub mod container;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod models;
pub mod package;
pub mod parser;
mod pipeline;
pub mod tree_render;

pub use config::DiagramConfig;
pub use error::DiagramError;
pub use pipeline::*;
