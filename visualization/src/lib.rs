//! SortScope visualization
//!
//! Renders sorting traces as a row of 3D bars with screen-space value
//! labels. Rendering, the label overlay and the pseudocode panel are
//! collaborators behind traits; the crate ships headless implementations of
//! all three so a full viewer session can run without a GPU.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod engine;
pub mod perspective;
pub mod shell;
pub mod view;

pub use crate::engine::{
    CameraConfig, Color, HeadlessOverlay, HeadlessRenderer, OverlayBackend, RenderBackend,
    RenderError, Viewport,
};
pub use crate::perspective::{run_viewer, ConfigError, ViewerCommand, ViewerConfig};
pub use crate::shell::{ShellError, ViewerStatus, VisualizationShell};
pub use crate::view::{CodeDisplay, CodePanel, Palette, SceneConfig, SceneSynchronizer};
