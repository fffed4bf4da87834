use std::collections::HashMap;

use crate::error::Result;
use crate::geometry::{Rect, Size};

use super::hit::region_at;
use super::topology::{Direction, Region, Split, SplitChild, Topology};
use super::weights::{WeightTable, resolve_weights};

/// Content widths below this stack the dual-pane layout vertically.
pub const STACK_BELOW_WIDTH: u16 = 80;
/// Comfortable minimum width of a panel in a horizontal split.
pub const MIN_PANEL_WIDTH: u16 = 30;
/// Cells reserved between siblings of a divided split.
pub const DIVIDER_CELLS: u16 = 1;

/// Tunables for [`LayoutEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Minimum span of each child of a horizontal (row) split.
    pub min_width: u16,
    /// Minimum span of each child of a vertical (column) split.
    pub min_height: u16,
    pub divider: u16,
    pub stack_below: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: MIN_PANEL_WIDTH,
            min_height: 0,
            divider: DIVIDER_CELLS,
            stack_below: STACK_BELOW_WIDTH,
        }
    }
}

/// Geometry of one render: where each panel and divider goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    topology: Topology,
    area: Rect,
    panels: HashMap<Region, Rect>,
    dividers: Vec<Rect>,
    weights: WeightTable,
}

impl Frame {
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The content area the frame was composed into.
    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn panels(&self) -> &HashMap<Region, Rect> {
        &self.panels
    }

    pub fn rect(&self, region: Region) -> Option<Rect> {
        self.panels.get(&region).copied()
    }

    pub fn dividers(&self) -> &[Rect] {
        &self.dividers
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn weight(&self, region: Region) -> u32 {
        self.weights.weight(region)
    }

    pub fn region_at(&self, x: u16, y: u16) -> Option<Region> {
        region_at(&self.panels, x, y)
    }
}

/// Topology-parameterised accordion layout engine.
///
/// Stateless between calls: every `compose` is a pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn should_stack_vertically(&self, width: u16) -> bool {
        width < self.config.stack_below
    }

    /// Swap a dual-pane request for the vertical stack on narrow areas.
    pub fn fit_topology(&self, preferred: Topology, width: u16) -> Topology {
        match preferred {
            Topology::DualPane if self.should_stack_vertically(width) => Topology::VerticalStack,
            other => other,
        }
    }

    /// Compose `topology` into an area anchored at the origin.
    pub fn compose(
        &self,
        topology: Topology,
        size: Size,
        focus: Option<Region>,
        accordion: bool,
    ) -> Result<Frame> {
        self.compose_at(topology, Rect::from_size(size), focus, accordion)
    }

    /// Compose `topology` into an absolute content rectangle.
    pub fn compose_at(
        &self,
        topology: Topology,
        area: Rect,
        focus: Option<Region>,
        accordion: bool,
    ) -> Result<Frame> {
        let weights = resolve_weights(topology, focus, accordion)?;
        let mut frame = Frame {
            topology,
            area,
            panels: HashMap::new(),
            dividers: Vec::new(),
            weights,
        };

        let tree = topology.tree();
        self.solve_split(&tree, area, &mut frame);
        Ok(frame)
    }

    fn solve_split(&self, split: &Split, rect: Rect, frame: &mut Frame) {
        let (start, end, axis_length, min) = match split.direction {
            Direction::Row => (rect.x, rect.right(), rect.width, self.config.min_width),
            Direction::Column => (rect.y, rect.bottom(), rect.height, self.config.min_height),
        };
        let divider = if split.divided { self.config.divider } else { 0 };

        let weights: Vec<u32> = split
            .children
            .iter()
            .map(|child| frame.weights.weight(child.id()))
            .collect();
        let spans = allocate(axis_length, &weights, min, divider);

        let mut cursor = start;
        let last = split.children.len().saturating_sub(1);
        for (idx, (child, span)) in split.children.iter().zip(spans).enumerate() {
            // Clamp to the far edge so degenerate areas never leak outside.
            let offset = cursor.min(end);
            let span = span.min(end - offset);
            let child_rect = along(split.direction, rect, offset, span);

            match child {
                SplitChild::Panel(region) => {
                    frame.panels.insert(*region, child_rect);
                }
                SplitChild::Group(_, nested) => self.solve_split(nested, child_rect, frame),
            }
            cursor = offset + span;

            if idx < last && divider > 0 {
                let offset = cursor.min(end);
                let span = divider.min(end - offset);
                if span > 0 {
                    frame.dividers.push(along(split.direction, rect, offset, span));
                }
                cursor = offset + span;
            }
        }
    }
}

fn along(direction: Direction, parent: Rect, offset: u16, span: u16) -> Rect {
    match direction {
        Direction::Row => Rect::new(offset, parent.y, span, parent.height),
        Direction::Column => Rect::new(parent.x, offset, parent.width, span),
    }
}

/// Compose with the default [`LayoutConfig`].
pub fn compose(
    topology: Topology,
    width: u16,
    height: u16,
    focus: Option<Region>,
    accordion: bool,
) -> Result<Frame> {
    LayoutEngine::default().compose(topology, Size::new(width, height), focus, accordion)
}

/// True when a content area of `width` cells is too narrow for side-by-side panels.
pub fn should_stack_vertically(width: u16) -> bool {
    width < STACK_BELOW_WIDTH
}

/// Split `total` cells between weighted siblings.
///
/// Dividers are reserved first. When what is left cannot give every sibling
/// `min_cells`, the space is split evenly instead. Otherwise each sibling
/// gets its floored proportional share and the rounding remainder goes to
/// the last one. With exactly two siblings a share below `min_cells` is
/// raised to it at the other sibling's expense. Spans plus dividers always
/// add up to `total` as long as `total` covers the dividers themselves.
pub fn allocate(total: u16, weights: &[u32], min_cells: u16, divider: u16) -> Vec<u16> {
    let count = weights.len();
    if count == 0 {
        return Vec::new();
    }

    let reserved = u32::from(divider) * (count as u32 - 1);
    let available = u32::from(total).saturating_sub(reserved);

    let spans = if available < u32::from(min_cells) * count as u32 {
        equal_split(available, count)
    } else {
        let mut spans = proportional_split(available, weights);
        if count == 2 {
            clamp_pair(&mut spans, u32::from(min_cells));
        }
        spans
    };

    spans
        .into_iter()
        .map(|span| span.min(u32::from(u16::MAX)) as u16)
        .collect()
}

fn equal_split(available: u32, count: usize) -> Vec<u32> {
    let share = available / count as u32;
    let mut spans = vec![share; count];
    if let Some(last) = spans.last_mut() {
        *last = available - share * (count as u32 - 1);
    }
    spans
}

fn proportional_split(available: u32, weights: &[u32]) -> Vec<u32> {
    let total_weight: u64 = weights.iter().map(|w| u64::from((*w).max(1))).sum();
    let mut spans: Vec<u32> = weights
        .iter()
        .map(|w| (u64::from(available) * u64::from((*w).max(1)) / total_weight) as u32)
        .collect();

    let used: u32 = spans.iter().sum();
    if let Some(last) = spans.last_mut() {
        *last += available - used;
    }
    spans
}

// Callers guarantee the pair holds at least `2 * min`.
fn clamp_pair(spans: &mut [u32], min: u32) {
    if spans[0] < min {
        spans[1] -= min - spans[0];
        spans[0] = min;
    } else if spans[1] < min {
        spans[0] -= min - spans[1];
        spans[1] = min;
    }
}
