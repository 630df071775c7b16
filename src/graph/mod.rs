//! The pure core: typed graph model, row-to-graph transformation, and
//! neighborhood computation. No I/O, no rendering.

pub mod builder;
pub mod highlight;
pub mod model;

pub use builder::{BuildOptions, ColorStrategy, build};
pub use highlight::{Selection, neighborhood};
pub use model::{Details, Edge, Node, SystemGraph, Trend};
