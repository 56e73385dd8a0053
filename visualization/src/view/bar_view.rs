//! Bar scene synchronizer
//!
//! Keeps one box mesh and one screen label per array slot in step with the
//! current trace step. Slots are index-addressed and allocated once per
//! mount; when values move, the boxes stay put and only their height, color
//! and label text change.
//!
//! Frames and steps are independent: [`SceneSynchronizer::apply_step`] runs
//! whenever playback moves, [`SceneSynchronizer::render_frame`] runs on every
//! redraw and re-projects the labels so they track the bars through camera
//! and canvas changes.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use sortscope_core::algorithm::state::{Step, Value};

use crate::engine::backend::{
    BoxHandle, CameraHandle, CanvasHandle, Color, ListenerHandle, RenderBackend, RenderError,
    Resource, SceneHandle, Viewport,
};
use crate::engine::camera::{ndc_to_pixels, CameraConfig};
use crate::engine::overlay::{LabelHandle, OverlayBackend};

/// Bar colors per status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub default: Color,
    pub compare: Color,
    pub swap: Color,
    pub sorted: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: Color::from_hex(0x3b82f6),
            compare: Color::from_hex(0xfacc15),
            swap: Color::from_hex(0xef4444),
            sorted: Color::from_hex(0x22c55e),
        }
    }
}

impl Palette {
    pub fn color(&self, status: BarStatus) -> Color {
        match status {
            BarStatus::Default => self.default,
            BarStatus::Comparing => self.compare,
            BarStatus::Swapped => self.swap,
            BarStatus::Sorted => self.sorted,
        }
    }
}

/// Scene layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub bar_width: f32,
    pub bar_depth: f32,

    /// Distance between neighbouring bar centers
    pub spacing: f32,

    /// Height of the largest value in the current array
    pub max_bar_height: f32,

    /// Floor for tiny, zero and negative values
    pub min_bar_height: f32,

    /// Gap between the top of a bar and its label anchor
    pub label_margin: f32,

    pub camera: CameraConfig,
    pub palette: Palette,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bar_width: 0.8,
            bar_depth: 0.8,
            spacing: 1.0,
            max_bar_height: 5.0,
            min_bar_height: 0.05,
            label_margin: 0.3,
            camera: CameraConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl SceneConfig {
    /// Bar height for `value` when the largest value on screen is `max`
    pub fn bar_height(&self, value: Value, max: Value) -> f32 {
        if value <= 0 || max <= 0 {
            return self.min_bar_height;
        }
        (value as f32 / max as f32 * self.max_bar_height).max(self.min_bar_height)
    }

    /// Horizontal center of slot `index` in a row of `count` bars
    pub fn slot_x(&self, index: usize, count: usize) -> f32 {
        let center = (count.saturating_sub(1)) as f32 / 2.0;
        (index as f32 - center) * self.spacing
    }
}

/// Visual status of one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarStatus {
    Default,
    Comparing,
    Swapped,
    Sorted,
}

impl BarStatus {
    /// Sorted wins over comparing, which wins over swapped
    pub fn classify(step: &Step, index: usize) -> Self {
        if step.is_sorted_at(index) {
            BarStatus::Sorted
        } else if step.comparing.contains(&index) {
            BarStatus::Comparing
        } else if step.swapped.contains(&index) {
            BarStatus::Swapped
        } else {
            BarStatus::Default
        }
    }
}

/// Handles and last applied state of one array slot
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub bar: BoxHandle,
    pub label: LabelHandle,
    pub height: f32,
    pub status: BarStatus,
    pub value: Value,
}

/// Owns the bar scene for one mounted instance
///
/// Created by [`mount`](Self::mount), released by [`teardown`](Self::teardown)
/// or on drop, whichever comes first.
#[derive(Debug)]
pub struct SceneSynchronizer<R: RenderBackend, O: OverlayBackend> {
    renderer: R,
    overlay: O,
    config: SceneConfig,
    scene: SceneHandle,
    camera: CameraHandle,
    canvas: CanvasHandle,
    listener: ListenerHandle,
    objects: Vec<SceneObject>,
    mounted: bool,
}

impl<R: RenderBackend, O: OverlayBackend> SceneSynchronizer<R, O> {
    /// Builds the scene, camera, renderer and one bar per slot of `initial`.
    ///
    /// A failed scene or renderer creation releases whatever was already
    /// created and returns the error.
    pub fn mount(
        mut renderer: R,
        mut overlay: O,
        config: SceneConfig,
        initial: &Step,
        viewport: Viewport,
    ) -> Result<Self, RenderError> {
        let scene = renderer.create_scene()?;
        let canvas = match renderer.create_renderer(viewport) {
            Ok(canvas) => canvas,
            Err(err) => {
                renderer.dispose(Resource::Scene(scene));
                return Err(err);
            }
        };
        let camera = renderer.create_camera(viewport.aspect(), &config.camera);
        let listener = renderer.add_resize_listener(canvas);

        let count = initial.len();
        let max = initial.max_value().unwrap_or(0);
        let objects = initial
            .array
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let height = config.bar_height(value, max);
                let status = BarStatus::classify(initial, index);
                let size = Vec3::new(config.bar_width, height, config.bar_depth);
                let bar = renderer.create_box(scene, size, config.palette.color(status));
                renderer.set_box_position(
                    bar,
                    Vec3::new(config.slot_x(index, count), height / 2.0, 0.0),
                );
                let label = overlay.create_label(&value.to_string());
                SceneObject {
                    bar,
                    label,
                    height,
                    status,
                    value,
                }
            })
            .collect();

        let mut synchronizer = Self {
            renderer,
            overlay,
            config,
            scene,
            camera,
            canvas,
            listener,
            objects,
            mounted: true,
        };
        synchronizer.project_labels();

        info!(
            "Scene mounted with {} bars at {}x{}",
            count, viewport.width, viewport.height
        );
        Ok(synchronizer)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Current canvas size as reported by the renderer
    pub fn viewport(&self) -> Viewport {
        self.renderer.canvas_size(self.canvas)
    }

    /// Brings every bar and label in line with `step`.
    ///
    /// Geometry is rebuilt only for bars whose height changed; colors and
    /// label text only where status or value changed.
    pub fn apply_step(&mut self, step: &Step) {
        if !self.mounted {
            warn!("Step applied to a torn-down scene");
            return;
        }
        if step.len() != self.objects.len() {
            warn!(
                "Step has {} values but the scene has {} bars",
                step.len(),
                self.objects.len()
            );
            return;
        }

        let count = self.objects.len();
        let max = step.max_value().unwrap_or(0);
        let mut rebuilt = 0;

        for (index, object) in self.objects.iter_mut().enumerate() {
            let value = step.array[index];
            let height = self.config.bar_height(value, max);
            if (height - object.height).abs() > f32::EPSILON {
                self.renderer.set_box_geometry(object.bar, height);
                self.renderer.set_box_position(
                    object.bar,
                    Vec3::new(self.config.slot_x(index, count), height / 2.0, 0.0),
                );
                object.height = height;
                rebuilt += 1;
            }

            let status = BarStatus::classify(step, index);
            if status != object.status {
                self.renderer
                    .set_box_color(object.bar, self.config.palette.color(status));
                object.status = status;
            }

            if value != object.value {
                self.overlay.set_label_text(object.label, &value.to_string());
                object.value = value;
            }
        }

        debug!("Applied step: {} of {} bars rebuilt", rebuilt, count);
    }

    /// Re-projects labels and draws one frame.
    ///
    /// Returns `false` without drawing once the scene is torn down.
    pub fn render_frame(&mut self) -> bool {
        if !self.mounted {
            warn!("Frame requested after teardown");
            return false;
        }
        self.project_labels();
        self.renderer.render(self.scene, self.camera, self.canvas);
        trace!("Frame rendered");
        true
    }

    /// Follows a canvas size change
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.mounted {
            return;
        }
        self.renderer.resize_renderer(self.canvas, viewport);
        self.renderer.set_camera_aspect(self.camera, viewport.aspect());
        self.project_labels();
        debug!("Scene resized to {}x{}", viewport.width, viewport.height);
    }

    /// Moves every label to the projected top-center of its bar
    pub fn project_labels(&mut self) {
        let viewport = self.renderer.canvas_size(self.canvas);
        let count = self.objects.len();
        for (index, object) in self.objects.iter().enumerate() {
            let anchor = Vec3::new(
                self.config.slot_x(index, count),
                object.height + self.config.label_margin,
                0.0,
            );
            let ndc = self.renderer.project(anchor, self.camera);
            let pixels = ndc_to_pixels(ndc, viewport);
            self.overlay.set_label_position(object.label, pixels.x, pixels.y);
        }
    }

    /// Releases every resource of this scene; later calls do nothing.
    ///
    /// Frames and the resize listener go first so no callback can touch a
    /// disposed resource.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.renderer.remove_resize_listener(self.listener);

        let released = self.objects.len();
        for object in self.objects.drain(..) {
            self.overlay.remove_label(object.label);
            self.renderer.dispose(Resource::Box(object.bar));
        }

        self.renderer.dispose(Resource::Camera(self.camera));
        self.renderer.dispose(Resource::Scene(self.scene));
        self.renderer.dispose(Resource::Renderer(self.canvas));
        info!("Scene torn down, {} bars released", released);
    }
}

impl<R: RenderBackend, O: OverlayBackend> Drop for SceneSynchronizer<R, O> {
    fn drop(&mut self) {
        self.teardown();
    }
}
