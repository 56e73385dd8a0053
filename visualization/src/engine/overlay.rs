//! Screen-anchored text overlay contract
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

/// Label created through [`OverlayBackend::create_label`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHandle(pub u64);

/// 2D label layer drawn above the canvas, in pixel coordinates
pub trait OverlayBackend {
    fn create_label(&mut self, text: &str) -> LabelHandle;

    /// Positions the label's anchor at `(x, y)` pixels from the top-left
    fn set_label_position(&mut self, handle: LabelHandle, x: f32, y: f32);

    fn set_label_text(&mut self, handle: LabelHandle, text: &str);

    fn remove_label(&mut self, handle: LabelHandle);
}
