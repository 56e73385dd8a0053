//! Headless reference backends
//!
//! In-memory implementations of the rendering and overlay collaborators. They
//! keep the full resource tables a GPU backend would (boxes, cameras,
//! canvases, listeners, labels), perform real perspective projection, and
//! count every call in a journal. Clones share state, so a caller can keep a
//! handle for inspection while the synchronizer owns another.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use glam::Vec3;
use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;

use crate::engine::backend::{
    BoxHandle, CameraHandle, CanvasHandle, Color, ListenerHandle, RenderBackend, RenderError,
    Resource, SceneHandle, Viewport,
};
use crate::engine::camera::{CameraConfig, PerspectiveCamera};
use crate::engine::overlay::{LabelHandle, OverlayBackend};

/// Call counters for [`HeadlessRenderer`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderJournal {
    pub boxes_created: usize,
    pub boxes_disposed: usize,
    pub geometry_updates: usize,
    pub color_updates: usize,
    pub frames_rendered: usize,
    pub renderers_created: usize,
    pub renderers_disposed: usize,
    pub cameras_disposed: usize,
    pub scenes_disposed: usize,
    pub listeners_added: usize,
    pub listeners_removed: usize,
    /// Calls that referenced an unknown or already released resource
    pub invalid_calls: usize,
}

/// Live state of one box mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxState {
    pub size: Vec3,
    pub position: Vec3,
    pub color: Color,
}

/// Which initialization call should fail next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFailure {
    Scene,
    Renderer,
}

#[derive(Debug, Default)]
struct RenderState {
    next_id: u64,
    scenes: HashSet<u64>,
    cameras: HashMap<u64, PerspectiveCamera>,
    canvases: HashMap<u64, Viewport>,
    boxes: BTreeMap<u64, BoxState>,
    listeners: HashSet<u64>,
    fail_next: Option<InitFailure>,
    journal: RenderJournal,
}

impl RenderState {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn invalid(&mut self, what: &str, id: u64) {
        warn!("Headless renderer: {} {} is not live", what, id);
        self.journal.invalid_calls += 1;
    }
}

/// Headless [`RenderBackend`]
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    state: Arc<Mutex<RenderState>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next scene or renderer creation fail
    pub fn fail_next(&self, failure: InitFailure) {
        self.state.lock().fail_next = Some(failure);
    }

    pub fn journal(&self) -> RenderJournal {
        self.state.lock().journal
    }

    /// Live boxes in creation order
    pub fn boxes(&self) -> Vec<(BoxHandle, BoxState)> {
        self.state
            .lock()
            .boxes
            .iter()
            .map(|(&id, &state)| (BoxHandle(id), state))
            .collect()
    }

    pub fn box_state(&self, handle: BoxHandle) -> Option<BoxState> {
        self.state.lock().boxes.get(&handle.0).copied()
    }

    /// Whether any scene, camera, canvas, box or listener is still allocated
    pub fn has_live_resources(&self) -> bool {
        let state = self.state.lock();
        !(state.scenes.is_empty()
            && state.cameras.is_empty()
            && state.canvases.is_empty()
            && state.boxes.is_empty()
            && state.listeners.is_empty())
    }
}

impl RenderBackend for HeadlessRenderer {
    fn create_scene(&mut self) -> Result<SceneHandle, RenderError> {
        let mut state = self.state.lock();
        if state.fail_next == Some(InitFailure::Scene) {
            state.fail_next = None;
            return Err(RenderError::SceneCreation("injected failure".into()));
        }
        let id = state.allocate();
        state.scenes.insert(id);
        Ok(SceneHandle(id))
    }

    fn create_camera(&mut self, aspect: f32, config: &CameraConfig) -> CameraHandle {
        let mut state = self.state.lock();
        let id = state.allocate();
        state.cameras.insert(id, PerspectiveCamera::new(config.clone(), aspect));
        CameraHandle(id)
    }

    fn create_renderer(&mut self, viewport: Viewport) -> Result<CanvasHandle, RenderError> {
        let mut state = self.state.lock();
        if state.fail_next == Some(InitFailure::Renderer) {
            state.fail_next = None;
            return Err(RenderError::RendererCreation("injected failure".into()));
        }
        let id = state.allocate();
        state.canvases.insert(id, viewport);
        state.journal.renderers_created += 1;
        debug!("Headless renderer {} created at {}x{}", id, viewport.width, viewport.height);
        Ok(CanvasHandle(id))
    }

    fn create_box(&mut self, scene: SceneHandle, size: Vec3, color: Color) -> BoxHandle {
        let mut state = self.state.lock();
        if !state.scenes.contains(&scene.0) {
            state.invalid("scene", scene.0);
        }
        let id = state.allocate();
        state.boxes.insert(
            id,
            BoxState {
                size,
                position: Vec3::ZERO,
                color,
            },
        );
        state.journal.boxes_created += 1;
        BoxHandle(id)
    }

    fn set_box_geometry(&mut self, handle: BoxHandle, height: f32) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.boxes.get_mut(&handle.0) {
            Some(mesh) => {
                mesh.size.y = height;
                state.journal.geometry_updates += 1;
            }
            None => state.invalid("box", handle.0),
        }
    }

    fn set_box_position(&mut self, handle: BoxHandle, position: Vec3) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.boxes.get_mut(&handle.0) {
            Some(mesh) => mesh.position = position,
            None => state.invalid("box", handle.0),
        }
    }

    fn set_box_color(&mut self, handle: BoxHandle, color: Color) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.boxes.get_mut(&handle.0) {
            Some(mesh) => {
                mesh.color = color;
                state.journal.color_updates += 1;
            }
            None => state.invalid("box", handle.0),
        }
    }

    fn set_camera_aspect(&mut self, camera: CameraHandle, aspect: f32) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.cameras.get_mut(&camera.0) {
            Some(perspective) => perspective.set_aspect(aspect),
            None => state.invalid("camera", camera.0),
        }
    }

    fn resize_renderer(&mut self, canvas: CanvasHandle, viewport: Viewport) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.canvases.get_mut(&canvas.0) {
            Some(size) => *size = viewport,
            None => state.invalid("canvas", canvas.0),
        }
    }

    fn canvas_size(&self, canvas: CanvasHandle) -> Viewport {
        self.state
            .lock()
            .canvases
            .get(&canvas.0)
            .copied()
            .unwrap_or(Viewport::new(0, 0))
    }

    fn project(&self, point: Vec3, camera: CameraHandle) -> Vec3 {
        self.state
            .lock()
            .cameras
            .get(&camera.0)
            .map(|perspective| perspective.project(point))
            .unwrap_or(Vec3::ZERO)
    }

    fn render(&mut self, scene: SceneHandle, camera: CameraHandle, canvas: CanvasHandle) {
        let mut state = self.state.lock();
        let live = state.scenes.contains(&scene.0)
            && state.cameras.contains_key(&camera.0)
            && state.canvases.contains_key(&canvas.0);
        if live {
            state.journal.frames_rendered += 1;
        } else {
            state.invalid("frame target", canvas.0);
        }
    }

    fn add_resize_listener(&mut self, canvas: CanvasHandle) -> ListenerHandle {
        let mut state = self.state.lock();
        if !state.canvases.contains_key(&canvas.0) {
            state.invalid("canvas", canvas.0);
        }
        let id = state.allocate();
        state.listeners.insert(id);
        state.journal.listeners_added += 1;
        ListenerHandle(id)
    }

    fn remove_resize_listener(&mut self, listener: ListenerHandle) {
        let mut state = self.state.lock();
        if state.listeners.remove(&listener.0) {
            state.journal.listeners_removed += 1;
        } else {
            state.invalid("listener", listener.0);
        }
    }

    fn dispose(&mut self, resource: Resource) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let (released, counter, id) = match resource {
            Resource::Box(handle) => (
                state.boxes.remove(&handle.0).is_some(),
                &mut state.journal.boxes_disposed,
                handle.0,
            ),
            Resource::Camera(handle) => (
                state.cameras.remove(&handle.0).is_some(),
                &mut state.journal.cameras_disposed,
                handle.0,
            ),
            Resource::Scene(handle) => (
                state.scenes.remove(&handle.0),
                &mut state.journal.scenes_disposed,
                handle.0,
            ),
            Resource::Renderer(handle) => (
                state.canvases.remove(&handle.0).is_some(),
                &mut state.journal.renderers_disposed,
                handle.0,
            ),
        };
        if released {
            *counter += 1;
        } else {
            state.invalid("disposed resource", id);
        }
    }
}

/// Call counters for [`HeadlessOverlay`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverlayJournal {
    pub labels_created: usize,
    pub labels_removed: usize,
    pub text_updates: usize,
    pub position_updates: usize,
    pub invalid_calls: usize,
}

/// Live state of one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelState {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default)]
struct OverlayState {
    next_id: u64,
    labels: BTreeMap<u64, LabelState>,
    journal: OverlayJournal,
}

/// Headless [`OverlayBackend`]
#[derive(Debug, Clone, Default)]
pub struct HeadlessOverlay {
    state: Arc<Mutex<OverlayState>>,
}

impl HeadlessOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> OverlayJournal {
        self.state.lock().journal
    }

    /// Live labels in creation order
    pub fn labels(&self) -> Vec<(LabelHandle, LabelState)> {
        self.state
            .lock()
            .labels
            .iter()
            .map(|(&id, label)| (LabelHandle(id), label.clone()))
            .collect()
    }

    pub fn label(&self, handle: LabelHandle) -> Option<LabelState> {
        self.state.lock().labels.get(&handle.0).cloned()
    }
}

impl OverlayBackend for HeadlessOverlay {
    fn create_label(&mut self, text: &str) -> LabelHandle {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.labels.insert(
            id,
            LabelState {
                text: text.to_string(),
                x: 0.0,
                y: 0.0,
            },
        );
        state.journal.labels_created += 1;
        LabelHandle(id)
    }

    fn set_label_position(&mut self, handle: LabelHandle, x: f32, y: f32) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.labels.get_mut(&handle.0) {
            Some(label) => {
                label.x = x;
                label.y = y;
                state.journal.position_updates += 1;
            }
            None => state.journal.invalid_calls += 1,
        }
    }

    fn set_label_text(&mut self, handle: LabelHandle, text: &str) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.labels.get_mut(&handle.0) {
            Some(label) => {
                label.text = text.to_string();
                state.journal.text_updates += 1;
            }
            None => state.journal.invalid_calls += 1,
        }
    }

    fn remove_label(&mut self, handle: LabelHandle) {
        let mut state = self.state.lock();
        if state.labels.remove(&handle.0).is_some() {
            state.journal.labels_removed += 1;
        } else {
            warn!("Headless overlay: label {} is not live", handle.0);
            state.journal.invalid_calls += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_failure_fires_once() {
        let mut renderer = HeadlessRenderer::new();
        renderer.fail_next(InitFailure::Renderer);
        assert!(renderer.create_renderer(Viewport::default()).is_err());
        assert!(renderer.create_renderer(Viewport::default()).is_ok());
    }

    #[test]
    fn test_double_dispose_is_counted() {
        let mut renderer = HeadlessRenderer::new();
        let scene = renderer.create_scene().unwrap();
        let mesh = renderer.create_box(scene, Vec3::ONE, Color::from_hex(0));

        renderer.dispose(Resource::Box(mesh));
        renderer.dispose(Resource::Box(mesh));
        let journal = renderer.journal();
        assert_eq!(journal.boxes_disposed, 1);
        assert_eq!(journal.invalid_calls, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let renderer = HeadlessRenderer::new();
        let mut owner = renderer.clone();
        owner.create_scene().unwrap();
        assert!(renderer.has_live_resources());
    }

    #[test]
    fn test_overlay_tracks_labels() {
        let mut overlay = HeadlessOverlay::new();
        let label = overlay.create_label("5");
        overlay.set_label_position(label, 10.0, 20.0);
        overlay.set_label_text(label, "6");

        let state = overlay.label(label).unwrap();
        assert_eq!(state.text, "6");
        assert_eq!((state.x, state.y), (10.0, 20.0));

        overlay.remove_label(label);
        overlay.remove_label(label);
        assert_eq!(overlay.journal().labels_removed, 1);
        assert_eq!(overlay.journal().invalid_calls, 1);
    }
}
