use crate::layout::{Frame, Heading, Region, Topology};

/// Requests that move focus or flip accordion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusCommand {
    /// Numeric focus key (1-based).
    Slot(u8),
    Jump(Region),
    Next,
    Previous,
    Move(Heading),
    Click { x: u16, y: u16 },
    ToggleAccordion,
}

/// Result of applying a [`FocusCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    Changed {
        from: Option<Region>,
        to: Region,
    },
    AccordionToggled(bool),
    Unchanged,
    /// The target is not part of the active topology; carries a status line.
    Rejected(String),
}

impl FocusOutcome {
    /// Status-bar text describing the outcome, if any.
    pub fn status(&self) -> Option<String> {
        match self {
            FocusOutcome::Changed { to, .. } => Some(format!("Focused {} panel", to.label())),
            FocusOutcome::AccordionToggled(true) => {
                Some("Accordion mode: ON (focused panel gets more space)".to_string())
            }
            FocusOutcome::AccordionToggled(false) => {
                Some("Accordion mode: OFF (panels at default size)".to_string())
            }
            FocusOutcome::Rejected(message) => Some(message.clone()),
            FocusOutcome::Unchanged => None,
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(
            self,
            FocusOutcome::Changed { .. } | FocusOutcome::AccordionToggled(_)
        )
    }
}

/// Which panel holds focus, and whether accordion weighting is on.
///
/// Owned by the event-processing step; the layout engine only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    focused: Option<Region>,
    accordion: bool,
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new(Some(Region::Left), true)
    }
}

impl FocusState {
    pub fn new(focused: Option<Region>, accordion: bool) -> Self {
        Self { focused, accordion }
    }

    pub fn focused(&self) -> Option<Region> {
        self.focused
    }

    pub fn accordion_enabled(&self) -> bool {
        self.accordion
    }

    pub fn is_focused(&self, region: Region) -> bool {
        self.focused == Some(region)
    }

    pub fn set_accordion(&mut self, enabled: bool) {
        self.accordion = enabled;
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// Move focus back inside `topology` after a topology switch.
    ///
    /// Returns true when focus had to move.
    pub fn retarget(&mut self, topology: Topology) -> bool {
        match self.focused {
            Some(region) if !topology.contains(region) => {
                self.focused = Some(topology.default_focus());
                true
            }
            _ => false,
        }
    }

    /// Apply one transition. `frame` is the most recently composed frame
    /// and is only consulted for clicks.
    pub fn apply(
        &mut self,
        topology: Topology,
        frame: Option<&Frame>,
        command: FocusCommand,
    ) -> FocusOutcome {
        match command {
            FocusCommand::ToggleAccordion => {
                self.accordion = !self.accordion;
                FocusOutcome::AccordionToggled(self.accordion)
            }
            FocusCommand::Slot(slot) => match topology.panel_for_slot(slot) {
                Some(region) => self.focus(region),
                None => FocusOutcome::Rejected(format!(
                    "Panel {slot} is not visible in the {topology} layout"
                )),
            },
            FocusCommand::Jump(region) => {
                if topology.contains(region) {
                    self.focus(region)
                } else {
                    FocusOutcome::Rejected(format!(
                        "{} panel is not visible in the {topology} layout",
                        region.label()
                    ))
                }
            }
            FocusCommand::Next => self.cycle(topology, true),
            FocusCommand::Previous => self.cycle(topology, false),
            FocusCommand::Move(heading) => match self.focused {
                Some(from) => match topology.neighbor(from, heading) {
                    Some(to) => self.focus(to),
                    None => FocusOutcome::Unchanged,
                },
                None => FocusOutcome::Unchanged,
            },
            FocusCommand::Click { x, y } => match frame.and_then(|f| f.region_at(x, y)) {
                Some(region) if topology.contains(region) => self.focus(region),
                _ => FocusOutcome::Unchanged,
            },
        }
    }

    fn focus(&mut self, region: Region) -> FocusOutcome {
        if self.focused == Some(region) {
            return FocusOutcome::Unchanged;
        }
        let from = self.focused.replace(region);
        FocusOutcome::Changed { from, to: region }
    }

    fn cycle(&mut self, topology: Topology, forward: bool) -> FocusOutcome {
        let order = topology.panels();
        let current = self
            .focused
            .and_then(|region| order.iter().position(|r| *r == region));

        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % order.len(),
            (Some(idx), false) => (idx + order.len() - 1) % order.len(),
            (None, true) => 0,
            (None, false) => order.len() - 1,
        };
        self.focus(order[next])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compose;

    #[test]
    fn default_focus_is_left_with_accordion() {
        let state = FocusState::default();
        assert_eq!(state.focused(), Some(Region::Left));
        assert!(state.accordion_enabled());
    }

    #[test]
    fn slot_outside_topology_is_rejected() {
        let mut state = FocusState::default();
        let outcome = state.apply(Topology::DualPane, None, FocusCommand::Slot(3));
        assert!(matches!(outcome, FocusOutcome::Rejected(_)));
        assert_eq!(state.focused(), Some(Region::Left));
        assert_eq!(
            outcome.status().unwrap(),
            "Panel 3 is not visible in the dual-pane layout"
        );
    }

    #[test]
    fn slot_jumps_in_four_panel() {
        let mut state = FocusState::default();
        let outcome = state.apply(Topology::FourPanel, None, FocusCommand::Slot(4));
        assert_eq!(
            outcome,
            FocusOutcome::Changed {
                from: Some(Region::Left),
                to: Region::Header
            }
        );
        assert_eq!(outcome.status().unwrap(), "Focused HEADER panel");
    }

    #[test]
    fn tab_cycles_and_wraps() {
        let mut state = FocusState::default();
        let t = Topology::ThreePanel;
        state.apply(t, None, FocusCommand::Next);
        assert_eq!(state.focused(), Some(Region::Right));
        state.apply(t, None, FocusCommand::Next);
        assert_eq!(state.focused(), Some(Region::Bottom));
        state.apply(t, None, FocusCommand::Next);
        assert_eq!(state.focused(), Some(Region::Left));
        state.apply(t, None, FocusCommand::Previous);
        assert_eq!(state.focused(), Some(Region::Bottom));
    }

    #[test]
    fn cycle_from_none_picks_ends() {
        let mut state = FocusState::new(None, true);
        state.apply(Topology::FourPanel, None, FocusCommand::Next);
        assert_eq!(state.focused(), Some(Region::Header));

        let mut state = FocusState::new(None, true);
        state.apply(Topology::FourPanel, None, FocusCommand::Previous);
        assert_eq!(state.focused(), Some(Region::Footer));
    }

    #[test]
    fn move_without_neighbor_is_noop() {
        let mut state = FocusState::default();
        let outcome = state.apply(Topology::DualPane, None, FocusCommand::Move(Heading::Left));
        assert_eq!(outcome, FocusOutcome::Unchanged);
        assert!(outcome.status().is_none());

        let outcome = state.apply(Topology::DualPane, None, FocusCommand::Move(Heading::Right));
        assert!(outcome.is_change());
        assert_eq!(state.focused(), Some(Region::Right));
    }

    #[test]
    fn click_focuses_panel_under_cursor() {
        let frame = compose(Topology::DualPane, 100, 30, Some(Region::Left), true).unwrap();
        let mut state = FocusState::default();

        let outcome = state.apply(
            Topology::DualPane,
            Some(&frame),
            FocusCommand::Click { x: 80, y: 5 },
        );
        assert!(outcome.is_change());
        assert_eq!(state.focused(), Some(Region::Right));

        let miss = state.apply(
            Topology::DualPane,
            Some(&frame),
            FocusCommand::Click { x: 66, y: 5 },
        );
        assert_eq!(miss, FocusOutcome::Unchanged);
    }

    #[test]
    fn toggle_accordion_flips_flag() {
        let mut state = FocusState::default();
        let outcome = state.apply(Topology::DualPane, None, FocusCommand::ToggleAccordion);
        assert_eq!(outcome, FocusOutcome::AccordionToggled(false));
        assert!(!state.accordion_enabled());
        assert_eq!(state.focused(), Some(Region::Left));
    }

    #[test]
    fn retarget_moves_foreign_focus_to_left() {
        let mut state = FocusState::new(Some(Region::Bottom), true);
        assert!(state.retarget(Topology::DualPane));
        assert_eq!(state.focused(), Some(Region::Left));
        assert!(!state.retarget(Topology::DualPane));

        let mut unfocused = FocusState::new(None, true);
        assert!(!unfocused.retarget(Topology::FourPanel));
        assert_eq!(unfocused.focused(), None);
    }
}
