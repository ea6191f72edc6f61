//! Scrollbar model mirroring the view window
//!
//! The scrollbar's range is `[0, max_offset]` and its value is the view
//! offset; a page is one viewport of samples. It is recomputed from the view
//! after every mutation, and a dragged scrollbar feeds back through
//! `InputEvent::ScrollbarMoved`.

use super::state::ViewState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollbarModel {
    /// Largest offset (0 when everything is visible)
    pub maximum: usize,
    /// Visible samples
    pub page_step: usize,
    /// One wheel line
    pub single_step: usize,
    /// Current offset
    pub value: usize,
}

impl ScrollbarModel {
    pub fn from_view(view: &ViewState, width: usize, step_fraction: f64) -> Self {
        let page_step = view.visible_samples(width);
        Self {
            maximum: view.max_offset(width),
            page_step,
            single_step: ((page_step as f64 * step_fraction) as usize).max(1),
            value: view.offset,
        }
    }

    /// Whether the whole buffer fits on screen
    pub fn is_idle(&self) -> bool {
        self.maximum == 0
    }
}
