use std::fmt;

/// Named rectangular subdivision of the content area.
///
/// `Top` and `Middle` name group rows (the ThreePanel top row and the
/// FourPanel middle row). They carry weights but are never focusable and
/// never appear in a composed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Left,
    Right,
    Bottom,
    Header,
    Footer,
    Top,
    Middle,
}

impl Region {
    pub fn name(&self) -> &'static str {
        match self {
            Region::Left => "left",
            Region::Right => "right",
            Region::Bottom => "bottom",
            Region::Header => "header",
            Region::Footer => "footer",
            Region::Top => "top",
            Region::Middle => "middle",
        }
    }

    /// Upper-case label used in titles and status lines.
    pub fn label(&self) -> String {
        self.name().to_ascii_uppercase()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis along which a split lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Children side by side, dividing the width.
    Row,
    /// Children stacked top to bottom, dividing the height.
    Column,
}

/// Directional focus movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
    Up,
    Down,
}

/// One split node of a topology tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub direction: Direction,
    /// Whether siblings are separated by divider cells.
    pub divided: bool,
    pub children: Vec<SplitChild>,
}

impl Split {
    fn new(direction: Direction, divided: bool, children: Vec<SplitChild>) -> Self {
        Self {
            direction,
            divided,
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitChild {
    Panel(Region),
    Group(Region, Split),
}

impl SplitChild {
    pub fn id(&self) -> Region {
        match self {
            SplitChild::Panel(region) | SplitChild::Group(region, _) => *region,
        }
    }
}

/// The fixed panel arrangements the engine knows how to compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// `left | right`
    DualPane,
    /// `left` above `right`, used when the content area is too narrow.
    VerticalStack,
    /// `left | right` on top, full-width `bottom` below.
    ThreePanel,
    /// `header`, then `left | right`, then `footer`.
    FourPanel,
}

const DUAL_PANELS: &[Region] = &[Region::Left, Region::Right];
const THREE_PANELS: &[Region] = &[Region::Left, Region::Right, Region::Bottom];
const FOUR_PANELS: &[Region] = &[Region::Header, Region::Left, Region::Right, Region::Footer];

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::DualPane,
        Topology::VerticalStack,
        Topology::ThreePanel,
        Topology::FourPanel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Topology::DualPane => "dual-pane",
            Topology::VerticalStack => "vertical-stack",
            Topology::ThreePanel => "three-panel",
            Topology::FourPanel => "four-panel",
        }
    }

    /// Build the split tree. The shape never changes for a given topology.
    pub fn tree(&self) -> Split {
        use SplitChild::{Group, Panel};

        match self {
            Topology::DualPane => Split::new(
                Direction::Row,
                true,
                vec![Panel(Region::Left), Panel(Region::Right)],
            ),
            Topology::VerticalStack => Split::new(
                Direction::Column,
                true,
                vec![Panel(Region::Left), Panel(Region::Right)],
            ),
            Topology::ThreePanel => Split::new(
                Direction::Column,
                true,
                vec![
                    Group(
                        Region::Top,
                        Split::new(
                            Direction::Row,
                            true,
                            vec![Panel(Region::Left), Panel(Region::Right)],
                        ),
                    ),
                    Panel(Region::Bottom),
                ],
            ),
            Topology::FourPanel => Split::new(
                Direction::Column,
                false,
                vec![
                    Panel(Region::Header),
                    Group(
                        Region::Middle,
                        Split::new(
                            Direction::Row,
                            true,
                            vec![Panel(Region::Left), Panel(Region::Right)],
                        ),
                    ),
                    Panel(Region::Footer),
                ],
            ),
        }
    }

    /// Focusable panels in Tab order.
    pub fn panels(&self) -> &'static [Region] {
        match self {
            Topology::DualPane | Topology::VerticalStack => DUAL_PANELS,
            Topology::ThreePanel => THREE_PANELS,
            Topology::FourPanel => FOUR_PANELS,
        }
    }

    pub fn contains(&self, region: Region) -> bool {
        self.panels().contains(&region)
    }

    /// Focus target when the current one is absent from this topology.
    pub fn default_focus(&self) -> Region {
        Region::Left
    }

    /// Panel bound to a numeric focus key (1-based).
    pub fn panel_for_slot(&self, slot: u8) -> Option<Region> {
        match (self, slot) {
            (_, 1) => Some(Region::Left),
            (_, 2) => Some(Region::Right),
            (Topology::ThreePanel, 3) => Some(Region::Bottom),
            (Topology::FourPanel, 3) => Some(Region::Footer),
            (Topology::FourPanel, 4) => Some(Region::Header),
            _ => None,
        }
    }

    /// Structurally adjacent panel in the given heading, if any.
    pub fn neighbor(&self, from: Region, heading: Heading) -> Option<Region> {
        use Heading as H;
        use Region as R;

        match (self, from, heading) {
            (Topology::DualPane, R::Left, H::Right) => Some(R::Right),
            (Topology::DualPane, R::Right, H::Left) => Some(R::Left),

            (Topology::VerticalStack, R::Left, H::Down) => Some(R::Right),
            (Topology::VerticalStack, R::Right, H::Up) => Some(R::Left),

            (Topology::ThreePanel, R::Left, H::Right) => Some(R::Right),
            (Topology::ThreePanel, R::Right, H::Left) => Some(R::Left),
            (Topology::ThreePanel, R::Left | R::Right, H::Down) => Some(R::Bottom),
            (Topology::ThreePanel, R::Bottom, H::Up) => Some(R::Left),

            (Topology::FourPanel, R::Header, H::Down) => Some(R::Left),
            (Topology::FourPanel, R::Left, H::Right) => Some(R::Right),
            (Topology::FourPanel, R::Right, H::Left) => Some(R::Left),
            (Topology::FourPanel, R::Left | R::Right, H::Up) => Some(R::Header),
            (Topology::FourPanel, R::Left | R::Right, H::Down) => Some(R::Footer),
            (Topology::FourPanel, R::Footer, H::Up) => Some(R::Left),

            _ => None,
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
