use thiserror::Error;

use crate::layout::{Region, Topology};

/// Unified result type for the accordion layout crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the layout engine and its runtime host.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The caller's focus state names a panel the active topology does not have.
    #[error("region `{region}` is not part of the {topology} topology")]
    RegionNotInTopology { region: Region, topology: Topology },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
