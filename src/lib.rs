//! Focus-driven accordion layouts for terminal panels.
//!
//! [`LayoutEngine`] turns a [`Topology`], a terminal area and the focused
//! [`Region`] into a [`Frame`] of non-overlapping rectangles, giving the
//! focused panel a larger share when accordion mode is on. [`PanelRuntime`]
//! hosts the engine in a crossterm event loop with keyboard and mouse focus.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod width;

pub use error::{LayoutError, Result};
pub use geometry::{Rect, Size};
pub use layout::{
    DIVIDER_CELLS, Direction, Frame, Heading, LayoutConfig, LayoutEngine, MIN_PANEL_WIDTH, Region,
    STACK_BELOW_WIDTH, Split, SplitChild, Topology, WeightTable, allocate, compose, region_at,
    resolve_weights, should_stack_vertically,
};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, RuntimeMetrics};
pub use registry::{PanelRegistry, PanelState};
pub use render::{AnsiRenderer, BoxRenderer, ChromeLines, PanelRenderer, PanelView, Theme};
pub use runtime::diagnostics::LifecycleLoggerPlugin;
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{
    Action, ChromeConfig, EventFlow, FocusCommand, FocusOutcome, FocusState, PanelMode,
    PanelPlugin, PanelRuntime, RuntimeConfig, RuntimeContext, RuntimeEvent,
};
pub use width::display_width;
