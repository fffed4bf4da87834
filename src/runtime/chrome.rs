use crate::geometry::{Rect, Size};
use crate::layout::Topology;
use crate::render::ChromeLines;

use super::focus::FocusState;

const TITLE_ROWS: u16 = 3;
const STATUS_ROWS: u16 = 1;
const KEY_HINTS: &str = "Focus: 1-4, Tab or click | Move: arrows/hjkl | a=accordion, m=mode | q=quit";

/// Smallest terminal that still gets panels instead of the fallback view.
pub const MIN_TERMINAL: Size = Size::new(40, 10);

/// Title block and status bar reserved around the content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeConfig {
    pub title: String,
    pub show_title: bool,
    pub show_status: bool,
    pub min_size: Size,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            title: "Dynamic Panels".to_string(),
            show_title: true,
            show_status: true,
            min_size: MIN_TERMINAL,
        }
    }
}

/// Inputs needed to fill in the chrome text for one render.
#[derive(Debug, Clone, Copy)]
pub struct ChromeInfo<'a> {
    pub topology: Topology,
    pub focus: &'a FocusState,
    pub status: &'a str,
    pub mouse: Option<(u16, u16)>,
    pub width: u16,
}

impl ChromeConfig {
    pub fn title_rows(&self) -> u16 {
        if self.show_title { TITLE_ROWS } else { 0 }
    }

    pub fn status_rows(&self) -> u16 {
        if self.show_status { STATUS_ROWS } else { 0 }
    }

    pub fn fits(&self, size: Size) -> bool {
        size.width >= self.min_size.width && size.height >= self.min_size.height
    }

    /// What is left for panels once chrome rows are taken off the terminal.
    pub fn content_area(&self, size: Size) -> Rect {
        let top = self.title_rows().min(size.height);
        let height = size
            .height
            .saturating_sub(top)
            .saturating_sub(self.status_rows());
        Rect::new(0, top, size.width, height)
    }

    pub fn lines(&self, info: &ChromeInfo<'_>) -> ChromeLines {
        let mut lines = ChromeLines::default();

        if self.show_title {
            let accordion = if info.focus.accordion_enabled() {
                "[Accordion: ON]"
            } else {
                "[Accordion: OFF]"
            };
            lines.title = vec![
                format!("{}  {} {}", self.title, accordion, mode_badge(info.topology)),
                KEY_HINTS.to_string(),
                "─".repeat(info.width as usize),
            ];
        }

        if self.show_status {
            let focused = info
                .focus
                .focused()
                .map(|region| region.label())
                .unwrap_or_else(|| "NONE".to_string());
            let left = format!("Focused: {focused} | {}", info.status);
            let right = match info.mouse {
                Some((x, y)) => format!("Mouse: ({x},{y})"),
                None => String::new(),
            };
            let used = left.chars().count() + right.chars().count();
            let gap = (info.width as usize).saturating_sub(used).max(2);
            lines.status = Some(format!("{left}{}{right}", " ".repeat(gap)));
        }

        lines
    }
}

fn mode_badge(topology: Topology) -> &'static str {
    match topology {
        Topology::DualPane => "[2-Panel Mode]",
        Topology::VerticalStack => "[Vertical Stack]",
        Topology::ThreePanel => "[3-Panel Mode]",
        Topology::FourPanel => "[4-Panel Mode]",
    }
}
