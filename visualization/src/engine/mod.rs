//! Rendering collaborators
//!
//! Traits for the 3D renderer and the 2D label overlay, the camera math both
//! the synchronizer and the headless backend share, and in-memory reference
//! implementations of the collaborators.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod backend;
pub mod camera;
pub mod headless;
pub mod overlay;

pub use self::backend::{
    BoxHandle, CameraHandle, CanvasHandle, Color, ListenerHandle, RenderBackend, RenderError,
    Resource, SceneHandle, Viewport,
};
pub use self::camera::{ndc_to_pixels, CameraConfig, PerspectiveCamera};
pub use self::headless::{
    BoxState, HeadlessOverlay, HeadlessRenderer, InitFailure, LabelState, OverlayJournal,
    RenderJournal,
};
pub use self::overlay::{LabelHandle, OverlayBackend};
