//! Visualization shell
//!
//! Composes trace generation, playback and the bar scene for one selected
//! algorithm. The shell owns at most one mounted instance (a playback
//! controller plus its scene); switching the algorithm or the input array
//! tears that instance down completely before the next one is built.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use sortscope_core::algorithm::state::{CodeLines, Step, Value};
use sortscope_core::algorithm::SortAlgorithm;
use sortscope_core::execution::history::{Trace, TraceCache};
use sortscope_core::input::{parse_values, InputError};
use sortscope_core::temporal::playback::{
    PlaybackConfig, PlaybackController, PlaybackPhase, PlaybackState,
};

use crate::engine::backend::{RenderBackend, RenderError, Viewport};
use crate::engine::overlay::OverlayBackend;
use crate::view::bar_view::{SceneConfig, SceneSynchronizer};
use crate::view::code_view::CodeDisplay;

/// Shell operation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("render backend error: {0}")]
    Render(#[from] RenderError),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),
}

/// Snapshot of what the shell is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerStatus {
    pub algorithm: SortAlgorithm,
    pub mounted: bool,
    pub phase: PlaybackPhase,
    pub current_index: Option<usize>,
    pub step_count: usize,
}

#[derive(Debug)]
struct Instance<R: RenderBackend, O: OverlayBackend> {
    playback: PlaybackController,
    scene: SceneSynchronizer<R, O>,
}

/// Algorithm selector driving one playback/scene instance at a time
///
/// Backends are cloned into every instance, so they are expected to be
/// cheap handles onto a shared device.
#[derive(Debug)]
pub struct VisualizationShell<R, O, C>
where
    R: RenderBackend + Clone,
    O: OverlayBackend + Clone,
    C: CodeDisplay,
{
    renderer: R,
    overlay: O,
    code: C,
    playback_config: PlaybackConfig,
    scene_config: SceneConfig,
    algorithm: SortAlgorithm,
    input: Arc<[Value]>,
    cache: TraceCache,
    trace: Arc<Trace>,
    viewport: Viewport,
    instance: Option<Instance<R, O>>,
}

impl<R, O, C> VisualizationShell<R, O, C>
where
    R: RenderBackend + Clone,
    O: OverlayBackend + Clone,
    C: CodeDisplay,
{
    pub fn new(
        renderer: R,
        overlay: O,
        code: C,
        playback_config: PlaybackConfig,
        scene_config: SceneConfig,
        input: Arc<[Value]>,
    ) -> Self {
        let algorithm = SortAlgorithm::default();
        let mut cache = TraceCache::new();
        let trace = cache.get_or_generate(algorithm, &input);
        Self {
            renderer,
            overlay,
            code,
            playback_config,
            scene_config,
            algorithm,
            input,
            cache,
            trace,
            viewport: Viewport::default(),
            instance: None,
        }
    }

    /// Builds the playback controller and scene for the current trace
    pub fn mount(&mut self, viewport: Viewport) -> Result<(), ShellError> {
        self.viewport = viewport;
        if let Some(instance) = self.instance.as_mut() {
            instance.scene.resize(viewport);
            return Ok(());
        }

        let scene = SceneSynchronizer::mount(
            self.renderer.clone(),
            self.overlay.clone(),
            self.scene_config.clone(),
            self.trace.initial(),
            viewport,
        )
        .map_err(|err| {
            error!("Failed to mount {} visualization: {}", self.algorithm, err);
            err
        })?;

        let playback = PlaybackController::new(Arc::clone(&self.trace), &self.playback_config);
        self.code.show_listing(self.algorithm, self.algorithm.pseudocode());
        self.code.highlight(&CodeLines::none());
        self.instance = Some(Instance { playback, scene });

        info!(
            "Mounted {} over {} values ({} steps)",
            self.algorithm,
            self.input.len(),
            self.trace.len()
        );
        Ok(())
    }

    /// Tears down the current instance, cancelling playback first
    pub fn unmount(&mut self) {
        if let Some(mut instance) = self.instance.take() {
            instance.playback.pause();
            instance.scene.teardown();
            info!("Unmounted {} visualization", self.algorithm);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    /// Switches algorithm, rebuilding the instance when mounted
    pub fn select_algorithm(&mut self, algorithm: SortAlgorithm) -> Result<(), ShellError> {
        if algorithm == self.algorithm {
            return Ok(());
        }
        info!("Switching from {} to {}", self.algorithm, algorithm);
        self.algorithm = algorithm;
        self.rebuild()
    }

    /// Replaces the input array.
    ///
    /// Arrays are immutable once set, so only a different `Arc` counts as a
    /// change.
    pub fn set_input(&mut self, input: Arc<[Value]>) -> Result<(), ShellError> {
        if Arc::ptr_eq(&self.input, &input) {
            return Ok(());
        }
        debug!("Input replaced with {} values", input.len());
        self.input = input;
        self.rebuild()
    }

    /// Parses comma-separated text into a new input array.
    ///
    /// On a parse error the current array stays in place.
    pub fn set_input_text(&mut self, text: &str) -> Result<(), ShellError> {
        let values = parse_values(text)?;
        self.set_input(Arc::from(values))
    }

    fn rebuild(&mut self) -> Result<(), ShellError> {
        let was_mounted = self.is_mounted();
        self.unmount();
        self.trace = self.cache.get_or_generate(self.algorithm, &self.input);
        if was_mounted {
            self.mount(self.viewport)?;
        }
        Ok(())
    }

    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }

    pub fn start_at(&mut self, now: Instant) -> bool {
        self.transport(|playback| playback.start_at(now))
    }

    pub fn pause(&mut self) -> bool {
        self.transport(PlaybackController::pause)
    }

    pub fn step_forward(&mut self) -> bool {
        self.transport(PlaybackController::step_forward)
    }

    pub fn step_back(&mut self) -> bool {
        self.transport(PlaybackController::step_back)
    }

    pub fn reset(&mut self) -> bool {
        self.transport(PlaybackController::reset)
    }

    /// Fires the autoplay timer when due
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        self.transport(|playback| playback.poll_timer(now))
    }

    fn transport(&mut self, operation: impl FnOnce(&mut PlaybackController) -> bool) -> bool {
        let changed = match self.instance.as_mut() {
            Some(instance) => operation(&mut instance.playback),
            None => return false,
        };
        if changed {
            self.sync_step();
        }
        changed
    }

    /// Pushes the current step into the scene and the code panel
    fn sync_step(&mut self) {
        let Some(instance) = self.instance.as_mut() else {
            return;
        };
        let step = instance
            .playback
            .current_step()
            .unwrap_or_else(|| instance.playback.trace().initial());
        instance.scene.apply_step(step);

        let lines = match instance.playback.current_index() {
            Some(_) => step.highlighted_lines.clone(),
            None => CodeLines::none(),
        };
        self.code.highlight(&lines);
        debug!(
            "Showing step {:?} of {}",
            instance.playback.current_index(),
            self.trace.len()
        );
    }

    /// Deadline of the armed autoplay timer
    pub fn deadline(&self) -> Option<Instant> {
        self.instance
            .as_ref()
            .and_then(|instance| instance.playback.deadline())
    }

    pub fn render_frame(&mut self) -> bool {
        match self.instance.as_mut() {
            Some(instance) => instance.scene.render_frame(),
            None => false,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(instance) = self.instance.as_mut() {
            instance.scene.resize(viewport);
        }
    }

    pub fn status(&self) -> ViewerStatus {
        let state = self.playback_state();
        ViewerStatus {
            algorithm: self.algorithm,
            mounted: self.is_mounted(),
            phase: self
                .instance
                .as_ref()
                .map_or(PlaybackPhase::Idle, |instance| instance.playback.phase()),
            current_index: state.current_index,
            step_count: self.trace.len(),
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.instance
            .as_ref()
            .map(|instance| instance.playback.state())
            .unwrap_or_default()
    }

    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    pub fn input(&self) -> &Arc<[Value]> {
        &self.input
    }

    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    /// Step on screen, `None` before start or when unmounted
    pub fn current_step(&self) -> Option<&Step> {
        self.instance
            .as_ref()
            .and_then(|instance| instance.playback.current_step())
    }

    pub fn scene(&self) -> Option<&SceneSynchronizer<R, O>> {
        self.instance.as_ref().map(|instance| &instance.scene)
    }

    pub fn code(&self) -> &C {
        &self.code
    }

    /// Traces generated over the shell's lifetime
    pub fn traces_generated(&self) -> usize {
        self.cache.generated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::headless::{HeadlessOverlay, HeadlessRenderer, InitFailure};
    use crate::view::bar_view::BarStatus;
    use crate::view::code_view::CodePanel;

    type Shell = VisualizationShell<HeadlessRenderer, HeadlessOverlay, CodePanel>;

    struct Fixture {
        shell: Shell,
        renderer: HeadlessRenderer,
        overlay: HeadlessOverlay,
        code: CodePanel,
    }

    fn fixture(values: &[Value]) -> Fixture {
        let renderer = HeadlessRenderer::new();
        let overlay = HeadlessOverlay::new();
        let code = CodePanel::new();
        let shell = VisualizationShell::new(
            renderer.clone(),
            overlay.clone(),
            code.clone(),
            PlaybackConfig::default(),
            SceneConfig::default(),
            Arc::from(values.to_vec()),
        );
        Fixture {
            shell,
            renderer,
            overlay,
            code,
        }
    }

    fn mounted(values: &[Value]) -> Fixture {
        let mut fixture = fixture(values);
        fixture.shell.mount(Viewport::new(800, 600)).unwrap();
        fixture
    }

    #[test]
    fn test_mount_shows_listing_without_highlight() {
        let f = mounted(&[5, 1, 8, 4]);
        assert!(f.shell.is_mounted());
        assert_eq!(f.code.algorithm(), Some(SortAlgorithm::Bubble));
        assert!(f.code.highlighted().is_empty());
        assert_eq!(f.shell.status().phase, PlaybackPhase::Idle);
        assert_eq!(f.overlay.labels().len(), 4);
    }

    #[test]
    fn test_transport_applies_step_to_scene_and_code() {
        let mut f = mounted(&[5, 1, 8, 4, 2, 7, 3, 6]);
        assert!(f.shell.step_forward());
        let first = f.shell.current_step().unwrap().clone();
        assert_eq!(f.code.highlighted(), first.highlighted_lines);

        while f.shell.current_step().map_or(true, |s| s.comparing.is_empty()) {
            assert!(f.shell.step_forward());
        }
        let scene = f.shell.scene().unwrap();
        assert_eq!(scene.objects()[0].status, BarStatus::Comparing);
        assert_eq!(scene.objects()[1].status, BarStatus::Comparing);

        assert!(f.shell.reset());
        assert!(f.code.highlighted().is_empty());
        let scene = f.shell.scene().unwrap();
        assert!(scene
            .objects()
            .iter()
            .all(|object| object.status == BarStatus::Default));
    }

    #[test]
    fn test_transport_is_noop_when_unmounted() {
        let mut f = fixture(&[2, 1]);
        assert!(!f.shell.start());
        assert!(!f.shell.step_forward());
        assert!(!f.shell.render_frame());
        assert_eq!(f.shell.deadline(), None);
        assert_eq!(f.shell.playback_state(), PlaybackState::default());
    }

    #[test]
    fn test_algorithm_switch_tears_down_previous_instance() {
        let mut f = mounted(&[3, 1, 2]);
        f.shell.step_forward();
        f.shell.select_algorithm(SortAlgorithm::Merge).unwrap();

        let journal = f.renderer.journal();
        assert_eq!(journal.boxes_disposed, 3);
        assert_eq!(journal.renderers_disposed, 1);
        assert_eq!(journal.renderers_created, 2);
        assert_eq!(journal.boxes_created, 6);
        assert_eq!(f.overlay.journal().labels_removed, 3);
        assert_eq!(f.overlay.labels().len(), 3);

        assert_eq!(f.shell.algorithm(), SortAlgorithm::Merge);
        assert_eq!(f.shell.trace().algorithm(), SortAlgorithm::Merge);
        assert_eq!(f.shell.playback_state().current_index, None);
        assert_eq!(f.code.algorithm(), Some(SortAlgorithm::Merge));
    }

    #[test]
    fn test_trace_regenerated_only_on_identity_change() {
        let mut f = mounted(&[3, 1, 2]);
        assert_eq!(f.shell.traces_generated(), 1);

        let same = Arc::clone(f.shell.input());
        f.shell.set_input(same).unwrap();
        assert_eq!(f.shell.traces_generated(), 1);
        assert_eq!(f.renderer.journal().renderers_created, 1);

        f.shell.set_input(Arc::from(vec![3, 1, 2])).unwrap();
        assert_eq!(f.shell.traces_generated(), 2);

        f.shell.select_algorithm(SortAlgorithm::Bubble).unwrap();
        assert_eq!(f.shell.traces_generated(), 2);
    }

    #[test]
    fn test_input_text_keeps_previous_array_on_error() {
        let mut f = mounted(&[3, 1, 2]);
        let before = Arc::clone(f.shell.input());

        let err = f.shell.set_input_text("4, x, 2").unwrap_err();
        assert!(matches!(err, ShellError::Input(InputError::InvalidNumber { .. })));
        assert!(Arc::ptr_eq(f.shell.input(), &before));
        assert_eq!(f.overlay.labels().len(), 3);

        f.shell.set_input_text("9, 7, 5, 3, 1").unwrap();
        assert_eq!(&f.shell.input()[..], &[9, 7, 5, 3, 1]);
        assert_eq!(f.overlay.labels().len(), 5);
    }

    #[test]
    fn test_mount_failure_leaves_shell_unmounted() {
        let mut f = fixture(&[1, 2]);
        f.renderer.fail_next(InitFailure::Scene);
        let err = f.shell.mount(Viewport::default()).unwrap_err();
        assert!(matches!(err, ShellError::Render(RenderError::SceneCreation(_))));
        assert!(!f.shell.is_mounted());
        assert!(!f.renderer.has_live_resources());

        f.shell.mount(Viewport::default()).unwrap();
        assert!(f.shell.is_mounted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_through_shell() {
        let mut f = mounted(&[2, 1]);
        let now = Instant::now();
        assert!(f.shell.start_at(now));
        let deadline = f.shell.deadline().unwrap();

        assert!(!f.shell.poll_timer(now));
        assert!(f.shell.poll_timer(deadline));
        assert_eq!(f.shell.playback_state().current_index, Some(1));

        f.shell.pause();
        assert_eq!(f.shell.deadline(), None);
        let later = deadline + PlaybackConfig::default().step_delay();
        assert!(!f.shell.poll_timer(later));
        assert_eq!(f.shell.playback_state().current_index, Some(1));
    }

    #[test]
    fn test_remount_resizes_live_scene() {
        let mut f = mounted(&[3, 1, 2]);
        f.shell.mount(Viewport::new(1600, 900)).unwrap();

        let scene = f.shell.scene().unwrap();
        assert_eq!(scene.viewport(), Viewport::new(1600, 900));
        assert_eq!(f.renderer.journal().renderers_created, 1);
        assert_eq!(f.renderer.journal().boxes_created, 3);
    }

    #[test]
    fn test_unmount_releases_everything() {
        let mut f = mounted(&[4, 2, 6]);
        f.shell.start();
        f.shell.unmount();
        f.shell.unmount();
        assert!(!f.renderer.has_live_resources());
        assert!(f.overlay.labels().is_empty());
        assert_eq!(f.renderer.journal().invalid_calls, 0);
        assert_eq!(f.shell.status().phase, PlaybackPhase::Idle);
    }
}
