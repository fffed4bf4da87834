//! Panel registry orchestrator.

mod core;

pub use self::core::{PanelRegistry, PanelState};
