//! Overlays take over keyboard input while open.
//!
//! Only one overlay exists at a time: the modal.

pub mod modal;
pub mod render_utils;

pub use modal::{ConfirmAction, ModalKind, ModalOutcome, ModalState};
use ratatui::Frame;
use ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Modal(ModalState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Modal(modal) => modal.render(frame, area),
        }
    }
}

/// Convenience methods on the optional overlay slot.
pub trait OverlayExt {
    fn modal_mut(&mut self) -> Option<&mut ModalState>;
    fn is_busy_modal(&self) -> bool;
}

impl OverlayExt for Option<Overlay> {
    fn modal_mut(&mut self) -> Option<&mut ModalState> {
        match self {
            Some(Overlay::Modal(modal)) => Some(modal),
            None => None,
        }
    }

    fn is_busy_modal(&self) -> bool {
        matches!(self, Some(Overlay::Modal(modal)) if modal.busy)
    }
}
