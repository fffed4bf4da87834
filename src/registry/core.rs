use std::collections::{HashMap, HashSet};

use blake3::Hash;

use crate::geometry::Rect;
use crate::layout::{Frame, Region};

/// Last known state of one panel.
///
/// Content survives topology switches; `rect` is `None` while the panel is
/// not part of the active frame.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub rect: Option<Rect>,
    pub focused: bool,
    pub weight: u32,
    pub content: Vec<String>,
    digest: Option<Hash>,
    pub is_dirty: bool,
}

impl PanelState {
    fn update_content(&mut self, content: Vec<String>) -> bool {
        let digest = digest_lines(&content);
        if self.digest.map(|d| d != digest).unwrap_or(true) {
            self.content = content;
            self.digest = Some(digest);
            self.is_dirty = true;
            return true;
        }
        false
    }
}

fn digest_lines(lines: &[String]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for line in lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize()
}

/// Registry mapping panels to their last drawn geometry and content.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    entries: HashMap<Region, PanelState>,
    dirty: HashSet<Region>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a freshly composed frame, flagging panels whose geometry,
    /// focus or weight changed.
    pub fn sync_frame(&mut self, frame: &Frame, focused: Option<Region>) {
        for (region, rect) in frame.panels() {
            let is_focused = focused == Some(*region);
            let weight = frame.weight(*region);
            let state = self.entries.entry(*region).or_default();

            if state.rect != Some(*rect) || state.focused != is_focused || state.weight != weight {
                state.rect = Some(*rect);
                state.focused = is_focused;
                state.weight = weight;
                state.is_dirty = true;
                self.dirty.insert(*region);
            }
        }

        for (region, state) in self.entries.iter_mut() {
            if !frame.panels().contains_key(region) {
                state.rect = None;
                state.focused = false;
                self.dirty.remove(region);
            }
        }
    }

    /// Replace a panel's content. Unchanged content is ignored.
    pub fn set_content(&mut self, region: Region, content: Vec<String>) {
        let state = self.entries.entry(region).or_default();
        if state.update_content(content) && state.rect.is_some() {
            self.dirty.insert(region);
        }
    }

    /// Force every visible panel to be redrawn.
    pub fn mark_all_dirty(&mut self) {
        for (region, state) in self.entries.iter_mut() {
            if state.rect.is_some() {
                state.is_dirty = true;
                self.dirty.insert(*region);
            }
        }
    }

    pub fn take_dirty(&mut self) -> Vec<(Region, PanelState)> {
        let mut ids: Vec<_> = self.dirty.drain().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| {
                self.entries.get_mut(&id).and_then(|state| {
                    state.is_dirty = false;
                    state.rect.map(|_| (id, state.clone()))
                })
            })
            .collect()
    }

    pub fn content(&self, region: Region) -> &[String] {
        self.entries
            .get(&region)
            .map(|state| state.content.as_slice())
            .unwrap_or(&[])
    }

    pub fn rect_of(&self, region: Region) -> Option<Rect> {
        self.entries.get(&region).and_then(|state| state.rect)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}
