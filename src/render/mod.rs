//! Render module orchestrator.
//!
//! The layout engine hands each panel's size and focus to a
//! [`PanelRenderer`]; [`AnsiRenderer`] places the resulting blocks, the
//! dividers and the chrome on screen.

mod core;

pub use self::core::{AnsiRenderer, BoxRenderer, ChromeLines, PanelRenderer, PanelView, Theme};
