//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here while the pieces live in
//! private modules: topology trees, weight resolution, space allocation and
//! composition, and hit-testing.

mod core;
mod hit;
mod topology;
mod weights;

pub use self::core::{
    DIVIDER_CELLS, Frame, LayoutConfig, LayoutEngine, MIN_PANEL_WIDTH, STACK_BELOW_WIDTH,
    allocate, compose, should_stack_vertically,
};
pub use hit::region_at;
pub use topology::{Direction, Heading, Region, Split, SplitChild, Topology};
pub use weights::{WeightTable, resolve_weights};
