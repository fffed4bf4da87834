//! Property-based tests for cell allocation and frame composition.

use accordion_room::{LayoutEngine, Rect, Region, Size, Topology, allocate, compose};
use proptest::prelude::*;

fn topology() -> impl Strategy<Value = Topology> {
    prop::sample::select(Topology::ALL.to_vec())
}

fn focus_for(topology: Topology, pick: usize) -> Region {
    let panels = topology.panels();
    panels[pick % panels.len()]
}

proptest! {
    // Spans plus dividers account for every cell
    #[test]
    fn allocation_conserves_cells(
        weights in prop::collection::vec(0u32..8, 1..6),
        extra in 0u16..400,
        min in 0u16..40,
        divider in 0u16..3,
    ) {
        let reserved = divider * (weights.len() as u16 - 1);
        let total = reserved + extra;
        let spans = allocate(total, &weights, min, divider);
        prop_assert_eq!(spans.len(), weights.len());
        let used: u32 = spans.iter().map(|s| u32::from(*s)).sum();
        prop_assert_eq!(used + u32::from(reserved), u32::from(total));
    }

    // Raising one weight never shrinks that sibling
    #[test]
    fn weight_increase_never_shrinks_span(
        weights in prop::collection::vec(1u32..8, 2..5),
        pick in 0usize..5,
        bump in 1u32..6,
        min in 0u16..30,
        slack in 0u16..200,
    ) {
        let idx = pick % weights.len();
        let total = min * weights.len() as u16 + (weights.len() as u16 - 1) + slack;
        let before = allocate(total, &weights, min, 1);

        let mut heavier = weights.clone();
        heavier[idx] += bump;
        let after = allocate(total, &heavier, min, 1);
        prop_assert!(after[idx] >= before[idx], "{:?} -> {:?}", before, after);
    }

    // Pairs keep the minimum whenever there is room for two minimums
    #[test]
    fn pair_respects_minimum_when_it_fits(
        left in 1u32..10,
        right in 1u32..10,
        min in 0u16..50,
        slack in 0u16..200,
    ) {
        let total = 2 * min + 1 + slack;
        let spans = allocate(total, &[left, right], min, 1);
        prop_assert!(spans[0] >= min && spans[1] >= min, "{:?}", spans);
    }

    // Mirror focus in dual pane differs by at most the rounding remainder
    #[test]
    fn dual_pane_focus_is_mirrored(width in 0u16..300, height in 1u16..60) {
        let left = compose(Topology::DualPane, width, height, Some(Region::Left), true).unwrap();
        let right = compose(Topology::DualPane, width, height, Some(Region::Right), true).unwrap();

        let left_focused = left.rect(Region::Left).unwrap().width;
        let right_focused = right.rect(Region::Right).unwrap().width;
        prop_assert!(left_focused.abs_diff(right_focused) <= 1);

        let available = width.saturating_sub(1);
        if available % 6 == 0 {
            prop_assert_eq!(left_focused, right_focused);
        }
    }

    // Accordion focus never takes area away from the focused panel
    #[test]
    fn accordion_grows_focused_panel(
        topology in topology(),
        pick in 0usize..4,
        width in 0u16..240,
        height in 0u16..80,
    ) {
        let focus = focus_for(topology, pick);
        let on = compose(topology, width, height, Some(focus), true).unwrap();
        let off = compose(topology, width, height, Some(focus), false).unwrap();
        prop_assert!(on.rect(focus).unwrap().area() >= off.rect(focus).unwrap().area());
    }

    // Same inputs, same frame
    #[test]
    fn compose_is_idempotent(
        topology in topology(),
        pick in 0usize..4,
        width in 0u16..240,
        height in 0u16..80,
        accordion in any::<bool>(),
    ) {
        let focus = Some(focus_for(topology, pick));
        let first = compose(topology, width, height, focus, accordion).unwrap();
        let second = compose(topology, width, height, focus, accordion).unwrap();
        prop_assert_eq!(first.panels(), second.panels());
        prop_assert_eq!(first.dividers(), second.dividers());
    }

    // Panels never overlap and, with dividers, tile the content area
    #[test]
    fn frame_tiles_area(
        topology in topology(),
        pick in 0usize..4,
        x in 0u16..20,
        y in 0u16..10,
        width in 1u16..240,
        height in 1u16..80,
        accordion in any::<bool>(),
    ) {
        let area = Rect::new(x, y, width, height);
        let focus = Some(focus_for(topology, pick));
        let frame = LayoutEngine::default()
            .compose_at(topology, area, focus, accordion)
            .unwrap();

        let mut rects: Vec<Rect> = frame.panels().values().copied().collect();
        rects.extend(frame.dividers().iter().copied());

        for (i, a) in rects.iter().enumerate() {
            prop_assert!(area.encloses(a), "{:?} outside {:?}", a, area);
            for b in &rects[i + 1..] {
                prop_assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
        let covered: u32 = rects.iter().map(Rect::area).sum();
        prop_assert_eq!(covered, area.area());
    }
}

#[test]
fn every_topology_yields_its_panels() {
    let engine = LayoutEngine::default();
    for topology in Topology::ALL {
        let frame = engine
            .compose(topology, Size::new(120, 40), Some(Region::Left), true)
            .unwrap();
        let mut found: Vec<_> = frame.panels().keys().copied().collect();
        found.sort();
        let mut expected = topology.panels().to_vec();
        expected.sort();
        assert_eq!(found, expected, "{topology}");
    }
}
