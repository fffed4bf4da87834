use std::collections::HashMap;

use crate::geometry::Rect;

use super::topology::Region;

/// Find the panel under a screen coordinate.
///
/// Panels of a composed frame are disjoint, so iteration order is irrelevant.
/// Coordinates outside every panel (dividers, chrome, or a frame that went
/// stale after a resize) yield `None`.
pub fn region_at(panels: &HashMap<Region, Rect>, x: u16, y: u16) -> Option<Region> {
    panels
        .iter()
        .find(|(_, rect)| rect.contains(x, y))
        .map(|(region, _)| *region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Topology, compose};

    #[test]
    fn click_left_of_split_hits_left() {
        let frame = compose(Topology::DualPane, 100, 30, Some(Region::Left), true).unwrap();
        assert_eq!(region_at(frame.panels(), 50, 10), Some(Region::Left));
        assert_eq!(region_at(frame.panels(), 70, 10), Some(Region::Right));
    }

    #[test]
    fn divider_and_outside_miss() {
        let frame = compose(Topology::DualPane, 100, 30, Some(Region::Left), true).unwrap();
        assert_eq!(region_at(frame.panels(), 66, 10), None);
        assert_eq!(region_at(frame.panels(), 100, 10), None);
        assert_eq!(region_at(frame.panels(), 10, 30), None);
    }

    #[test]
    fn empty_map_hits_nothing() {
        assert_eq!(region_at(&HashMap::new(), 0, 0), None);
    }

    #[test]
    fn every_cell_maps_to_its_panel() {
        let frame = compose(Topology::FourPanel, 90, 20, Some(Region::Footer), true).unwrap();
        for (region, rect) in frame.panels() {
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    assert_eq!(region_at(frame.panels(), x, y), Some(*region));
                }
            }
        }
    }
}
