use std::collections::HashMap;

use ratatui::layout::Rect;

/// Stable name of a mounted layout element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub &'static str);

/// Row holding search pane, divider and chat pane. Its width is 100%.
pub const SPLIT_ROW: NodeId = NodeId("workspace.split");
/// Column reserved for the divider between the panes.
pub const DIVIDER_WRAPPER: NodeId = NodeId("workspace.divider");
/// The grabbable part of the divider.
pub const DIVIDER_HANDLE: NodeId = NodeId("workspace.divider.handle");
pub const SEARCH_PANE: NodeId = NodeId("workspace.search");
pub const CHAT_PANE: NodeId = NodeId("workspace.chat");

#[derive(Debug, Clone, Copy)]
pub struct MountedNode {
    pub parent: Option<NodeId>,
    pub area: Rect,
}

/// Elements mounted by the most recent frame.
///
/// A fresh registry is built on every draw, so anything the view stopped
/// rendering (e.g. the divider after leaving split mode) disappears.
#[derive(Debug, Clone, Default)]
pub struct LayoutNodes {
    nodes: HashMap<NodeId, MountedNode>,
}

impl LayoutNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, id: NodeId, parent: Option<NodeId>, area: Rect) {
        self.nodes.insert(id, MountedNode { parent, area });
    }

    pub fn unmount(&mut self, id: NodeId) {
        self.nodes.remove(&id);
    }

    pub fn get(&self, id: NodeId) -> Option<&MountedNode> {
        self.nodes.get(&id)
    }

    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Width in columns, the unit the width model divides by.
    pub fn width(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|n| f64::from(n.area.width))
    }

    /// Whether terminal cell (`column`, `row`) falls inside the node.
    pub fn hit(&self, id: NodeId, column: u16, row: u16) -> bool {
        self.nodes.get(&id).is_some_and(|n| {
            let a = n.area;
            column >= a.x
                && column < a.x.saturating_add(a.width)
                && row >= a.y
                && row < a.y.saturating_add(a.height)
        })
    }
}

/// Find the element whose width is the 100% basis for a divider handle:
/// two levels up, handle → divider wrapper → split row.
///
/// Returns `None` when there is no handle, or when any link of the chain is
/// not mounted in `nodes`.
pub fn resolve_split_container(nodes: &LayoutNodes, handle: Option<NodeId>) -> Option<NodeId> {
    let handle = handle?;
    let wrapper = nodes.parent_of(handle)?;
    let row = nodes.parent_of(wrapper)?;
    nodes.is_mounted(row).then_some(row)
}
