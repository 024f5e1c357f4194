//! Resizable split between the search pane and the chat pane.
//!
//! The width model owns the left pane's share of the split row, the node
//! registry records what the last frame mounted, and the drag controller
//! turns mouse gestures on the divider into width updates.

pub mod drag;
pub mod nodes;
pub mod width;

pub use drag::{DragController, DragSession};
pub use nodes::{LayoutNodes, NodeId, resolve_split_container};
pub use width::{WidthBounds, WidthModel, next_left_width};

/// Which panes the workspace renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Split,
    Search,
    Chat,
}

impl Mode {
    /// Only the split view mounts a divider.
    pub fn shows_divider(self) -> bool {
        self == Mode::Split
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Split => "split",
            Mode::Search => "search only",
            Mode::Chat => "chat only",
        }
    }
}
