use std::collections::BTreeMap;

use crate::error::{LayoutError, Result};

use super::topology::{Region, Topology};

/// Per-render weight assignment for every node of a topology tree.
///
/// Regions absent from the table weigh 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightTable {
    weights: BTreeMap<Region, u32>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, region: Region, weight: u32) {
        self.weights.insert(region, weight.max(1));
    }

    pub fn weight(&self, region: Region) -> u32 {
        self.weights.get(&region).copied().unwrap_or(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Region, u32)> + '_ {
        self.weights.iter().map(|(region, weight)| (*region, *weight))
    }
}

/// Resolve the weight of every node in `topology` for the given focus.
///
/// Focus on a region the topology does not declare is a caller bug and
/// fails fast instead of silently falling back to default weights.
pub fn resolve_weights(
    topology: Topology,
    focus: Option<Region>,
    accordion: bool,
) -> Result<WeightTable> {
    if let Some(region) = focus {
        if !topology.contains(region) {
            return Err(LayoutError::RegionNotInTopology { region, topology });
        }
    }

    let focus = if accordion { focus } else { None };
    let mut table = WeightTable::new();

    match topology {
        Topology::DualPane | Topology::VerticalStack => {
            pair_weights(&mut table, focus);
        }
        Topology::ThreePanel => {
            pair_weights(&mut table, focus);
            let (top, bottom) = match focus {
                Some(Region::Bottom) => (1, 2),
                _ => (2, 1),
            };
            table.set(Region::Top, top);
            table.set(Region::Bottom, bottom);
        }
        Topology::FourPanel => {
            let (header, middle, footer) = match focus {
                Some(Region::Header) => (2, 1, 1),
                Some(Region::Footer) => (1, 1, 2),
                Some(Region::Left | Region::Right) => (1, 4, 1),
                _ => (1, 2, 1),
            };
            table.set(Region::Header, header);
            table.set(Region::Middle, middle);
            table.set(Region::Footer, footer);

            let (left, right) = match focus {
                Some(Region::Left) => (3, 1),
                Some(Region::Right) => (1, 3),
                _ => (1, 1),
            };
            table.set(Region::Left, left);
            table.set(Region::Right, right);
        }
    }

    Ok(table)
}

/// Left/right pair: the focused side doubles, otherwise both stay at 1.
fn pair_weights(table: &mut WeightTable, focus: Option<Region>) {
    let (left, right) = match focus {
        Some(Region::Left) => (2, 1),
        Some(Region::Right) => (1, 2),
        _ => (1, 1),
    };
    table.set(Region::Left, left);
    table.set(Region::Right, right);
}
