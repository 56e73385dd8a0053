//! Rendering collaborator contract
//!
//! The scene synchronizer never talks to a graphics API directly. It drives a
//! [`RenderBackend`], which owns the actual scene graph, camera and canvas and
//! hands out opaque handles for them. Concrete geometry, lighting and
//! materials are the backend's business; the synchronizer only decides box
//! sizes, positions and colors.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::camera::CameraConfig;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);
    };
}

handle!(
    /// Scene graph owned by the backend
    SceneHandle
);
handle!(
    /// Perspective camera
    CameraHandle
);
handle!(
    /// Renderer and the canvas it draws into
    CanvasHandle
);
handle!(
    /// Box mesh with its geometry and material
    BoxHandle
);
handle!(
    /// Viewport resize listener registration
    ListenerHandle
);

/// Backend resource released through [`RenderBackend::dispose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Box(BoxHandle),
    Camera(CameraHandle),
    Scene(SceneHandle),
    Renderer(CanvasHandle),
}

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a collapsed canvas
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// 24-bit RGB color, serialized as `"#rrggbb"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// Linear RGB components in `[0, 1]`
    pub fn to_rgb(self) -> [f32; 3] {
        let channel = |shift: u32| ((self.0 >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(format!("expected #rrggbb, got '{value}'"));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| format!("expected #rrggbb, got '{value}'"))
    }
}

/// Backend initialization failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("failed to create scene: {0}")]
    SceneCreation(String),

    #[error("failed to create renderer: {0}")]
    RendererCreation(String),
}

/// 3D rendering collaborator
///
/// Only scene and renderer creation may fail; every other call is assumed
/// to succeed. Handles stay valid until passed to [`dispose`](Self::dispose).
pub trait RenderBackend {
    fn create_scene(&mut self) -> Result<SceneHandle, RenderError>;

    fn create_camera(&mut self, aspect: f32, config: &CameraConfig) -> CameraHandle;

    fn create_renderer(&mut self, viewport: Viewport) -> Result<CanvasHandle, RenderError>;

    /// Adds a box of the given size to `scene`
    fn create_box(&mut self, scene: SceneHandle, size: Vec3, color: Color) -> BoxHandle;

    /// Rebuilds the box geometry at a new height
    fn set_box_geometry(&mut self, handle: BoxHandle, height: f32);

    /// Moves the box center
    fn set_box_position(&mut self, handle: BoxHandle, position: Vec3);

    fn set_box_color(&mut self, handle: BoxHandle, color: Color);

    fn set_camera_aspect(&mut self, camera: CameraHandle, aspect: f32);

    fn resize_renderer(&mut self, canvas: CanvasHandle, viewport: Viewport);

    /// Current canvas size in pixels
    fn canvas_size(&self, canvas: CanvasHandle) -> Viewport;

    /// Projects a world-space point to normalized device coordinates
    fn project(&self, point: Vec3, camera: CameraHandle) -> Vec3;

    /// Draws one frame
    fn render(&mut self, scene: SceneHandle, camera: CameraHandle, canvas: CanvasHandle);

    fn add_resize_listener(&mut self, canvas: CanvasHandle) -> ListenerHandle;

    fn remove_resize_listener(&mut self, listener: ListenerHandle);

    /// Releases a resource and everything the backend allocated for it
    fn dispose(&mut self, resource: Resource);
}
