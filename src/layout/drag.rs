use tracing::debug;

use super::nodes::{LayoutNodes, NodeId, resolve_split_container};
use super::width::{WidthBounds, next_left_width};

/// What a gesture remembers from the moment the divider was pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_x: f64,
    pub start_percent: f64,
    pub handle: NodeId,
}

/// Divider gesture state: idle, or dragging with a live session.
///
/// While a session exists the event loop hands every mouse drag, move and
/// release to this controller no matter where the pointer is, and the view
/// shows the resize cursor. `end` is the only way out and drops both.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, x: f64, current_percent: f64, handle: NodeId) {
        debug!(start_x = x, start_percent = current_percent, "Divider drag started");
        self.session = Some(DragSession {
            start_x: x,
            start_percent: current_percent,
            handle,
        });
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Width for a pointer now at `x`, or `None` when idle or when the split
    /// row can't be resolved from the handle this frame.
    pub fn on_move(&self, x: f64, nodes: &LayoutNodes, bounds: &WidthBounds) -> Option<f64> {
        let session = self.session.as_ref()?;
        let container = resolve_split_container(nodes, Some(session.handle))?;
        Some(next_left_width(
            session.start_percent,
            x - session.start_x,
            nodes.width(container),
            bounds,
        ))
    }

    /// Finish the gesture. Returns whether a gesture was in progress.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.session.take().is_some();
        if was_dragging {
            debug!("Divider drag ended");
        }
        was_dragging
    }
}
