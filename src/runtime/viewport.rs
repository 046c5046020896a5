use std::cell::Cell;
use std::rc::Rc;

use crate::foundation::core::Viewport;

/// Shared handle to the current viewport size.
///
/// Clones observe the same value. A resize notification takes effect immediately: the next frame
/// reads the new size, with no debounce.
#[derive(Clone, Debug)]
pub struct ViewportWatcher {
    current: Rc<Cell<Viewport>>,
}

impl ViewportWatcher {
    /// Watcher starting at `initial`.
    pub fn new(initial: Viewport) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
        }
    }

    /// Size the next frame will use.
    pub fn current(&self) -> Viewport {
        self.current.get()
    }

    /// Host resize event. Returns `true` when the size actually changed.
    pub fn notify_resize(&self, viewport: Viewport) -> bool {
        let old = self.current.replace(viewport);
        if old != viewport {
            tracing::debug!(from = %old, to = %viewport, "viewport resized");
        }
        old != viewport
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/viewport.rs"]
mod tests;
