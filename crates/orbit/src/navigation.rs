use crate::config::MenuConfig;
use crate::item::{ItemList, MenuItem};
use crate::selection::Ring;

#[derive(Debug, Clone)]
pub struct NavStackEntry {
    /// The item whose submenu was entered.
    pub item: MenuItem,
    pub entry_angle: f64,
    /// The list that was active right before entering `item`.
    pub items: ItemList,
}

/// Entered submenu levels plus the hover and focus of the active one.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    root: ItemList,
    active: ItemList,
    entries: Vec<NavStackEntry>,
    hovered: Option<usize>,
    focused: Option<usize>,
}

impl NavigationStack {
    pub fn new(root: ItemList) -> Self {
        Self {
            active: root.clone(),
            root,
            entries: Vec::new(),
            hovered: None,
            focused: None,
        }
    }

    /// Swaps the root list and drops every entered level.
    pub fn set_root(&mut self, root: ItemList) {
        *self = Self::new(root);
    }

    pub fn root(&self) -> &ItemList {
        &self.root
    }

    pub fn active(&self) -> &ItemList {
        &self.active
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[NavStackEntry] {
        &self.entries
    }

    pub fn top(&self) -> Option<&NavStackEntry> {
        self.entries.last()
    }

    pub fn item(&self, index: usize) -> Option<&MenuItem> {
        self.active.get(index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn hovered_item(&self) -> Option<&MenuItem> {
        self.hovered.and_then(|i| self.active.get(i))
    }

    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|&i| i < self.active.len());
    }

    pub fn set_focused(&mut self, index: Option<usize>) {
        self.focused = index.filter(|&i| i < self.active.len());
    }

    pub fn push(&mut self, item: MenuItem, entry_angle: f64, children: ItemList) {
        let previous = std::mem::replace(&mut self.active, children);
        self.entries.push(NavStackEntry {
            item,
            entry_angle,
            items: previous,
        });
        self.clear_hover();
    }

    pub fn pop(&mut self) -> Option<NavStackEntry> {
        let entry = self.entries.pop()?;
        self.active = entry.items.clone();
        self.clear_hover();
        Some(entry)
    }

    /// Pops every level, returning the discarded entries innermost first.
    pub fn go_to_root(&mut self) -> Vec<NavStackEntry> {
        let mut popped = Vec::with_capacity(self.entries.len());
        while let Some(entry) = self.pop() {
            popped.push(entry);
        }
        popped
    }

    /// Back to the root list with nothing hovered or focused.
    pub fn reset(&mut self) {
        self.go_to_root();
        self.clear_hover();
    }

    /// Ring of the active level: each level sits right outside the previous one.
    pub fn ring(&self, config: &MenuConfig) -> Ring {
        ring_at_depth(self.depth(), config)
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.focused = None;
    }
}

pub fn ring_at_depth(depth: usize, config: &MenuConfig) -> Ring {
    let step = config.ring_step();
    let outer = config.radius + depth as f64 * step;
    let inner = match depth {
        0 => config.inner_radius,
        _ => config.radius + (depth - 1) as f64 * step,
    };
    Ring::new(inner, outer)
}
