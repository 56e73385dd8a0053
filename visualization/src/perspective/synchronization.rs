//! Viewer synchronization loop
//!
//! Joins the three sources that drive a mounted shell on a single task:
//! viewer commands, the playback deadline and the redraw interval. Each
//! iteration handles exactly one of them, so a step's effects are always
//! applied to the scene before the next frame projects its labels.
//!
//! Branch priority is fixed: commands, then the playback timer, then frames.
//! A `Pause` that arrives together with an expired deadline therefore wins,
//! and the tick is discarded with the deadline.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};

use sortscope_core::algorithm::state::Value;
use sortscope_core::algorithm::SortAlgorithm;
use sortscope_core::temporal::playback::PlaybackConfig;

use crate::engine::backend::{RenderBackend, Viewport};
use crate::engine::overlay::OverlayBackend;
use crate::shell::{ShellError, ViewerStatus, VisualizationShell};
use crate::view::bar_view::SceneConfig;
use crate::view::code_view::CodeDisplay;

/// Configuration for a viewer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub playback: PlaybackConfig,
    pub scene: SceneConfig,

    /// Redraw interval (milliseconds)
    pub frame_interval_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            scene: SceneConfig::default(),
            frame_interval_ms: 16, // ~60 Hz
        }
    }
}

impl ViewerConfig {
    /// Parses a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed viewer configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Requests accepted by [`run_viewer`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    Start,
    Pause,
    StepForward,
    StepBack,
    Reset,
    Resize(Viewport),
    SelectAlgorithm(SortAlgorithm),
    SetInput(Arc<[Value]>),
    SetInputText(String),
    Shutdown,
}

/// Drives `shell` until [`ViewerCommand::Shutdown`] or until every command
/// sender is dropped, then unmounts it and hands it back.
///
/// The latest [`ViewerStatus`] is published on `status` after every event.
pub async fn run_viewer<R, O, C>(
    mut shell: VisualizationShell<R, O, C>,
    mut commands: mpsc::UnboundedReceiver<ViewerCommand>,
    status: watch::Sender<ViewerStatus>,
    frame_interval: Duration,
) -> VisualizationShell<R, O, C>
where
    R: RenderBackend + Clone,
    O: OverlayBackend + Clone,
    C: CodeDisplay,
{
    let mut frames = time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    status.send_replace(shell.status());
    info!("Viewer loop started for {}", shell.algorithm());

    loop {
        let deadline = shell.deadline();
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(ViewerCommand::Shutdown) | None => break,
                Some(command) => {
                    debug!("Viewer command: {:?}", command);
                    if let Err(err) = apply_command(&mut shell, command) {
                        warn!("Viewer command rejected: {}", err);
                    }
                }
            },

            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                shell.poll_timer(Instant::now());
            }

            _ = frames.tick(), if shell.is_mounted() => {
                shell.render_frame();
            }
        }

        let next = shell.status();
        status.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    shell.unmount();
    status.send_replace(shell.status());
    info!("Viewer loop stopped");
    shell
}

fn apply_command<R, O, C>(
    shell: &mut VisualizationShell<R, O, C>,
    command: ViewerCommand,
) -> Result<(), ShellError>
where
    R: RenderBackend + Clone,
    O: OverlayBackend + Clone,
    C: CodeDisplay,
{
    match command {
        ViewerCommand::Start => {
            shell.start();
        }
        ViewerCommand::Pause => {
            shell.pause();
        }
        ViewerCommand::StepForward => {
            shell.step_forward();
        }
        ViewerCommand::StepBack => {
            shell.step_back();
        }
        ViewerCommand::Reset => {
            shell.reset();
        }
        ViewerCommand::Resize(viewport) => shell.resize(viewport),
        ViewerCommand::SelectAlgorithm(algorithm) => shell.select_algorithm(algorithm)?,
        ViewerCommand::SetInput(values) => shell.set_input(values)?,
        ViewerCommand::SetInputText(text) => shell.set_input_text(&text)?,
        ViewerCommand::Shutdown => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::{ndc_to_pixels, PerspectiveCamera};
    use crate::engine::headless::{HeadlessOverlay, HeadlessRenderer};
    use crate::view::code_view::CodePanel;
    use glam::Vec3;
    use sortscope_core::temporal::playback::PlaybackPhase;
    use tokio::task::JoinHandle;

    type Shell = VisualizationShell<HeadlessRenderer, HeadlessOverlay, CodePanel>;

    struct Viewer {
        commands: mpsc::UnboundedSender<ViewerCommand>,
        status: watch::Receiver<ViewerStatus>,
        task: JoinHandle<Shell>,
        renderer: HeadlessRenderer,
        overlay: HeadlessOverlay,
    }

    fn spawn_viewer(values: &[Value]) -> Viewer {
        let config = ViewerConfig::default();
        let renderer = HeadlessRenderer::new();
        let overlay = HeadlessOverlay::new();
        let mut shell = VisualizationShell::new(
            renderer.clone(),
            overlay.clone(),
            CodePanel::new(),
            config.playback.clone(),
            config.scene.clone(),
            Arc::from(values.to_vec()),
        );
        shell.mount(Viewport::new(800, 600)).unwrap();

        let (commands, receiver) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(shell.status());
        let task = tokio::spawn(run_viewer(
            shell,
            receiver,
            status_tx,
            config.frame_interval(),
        ));
        Viewer {
            commands,
            status,
            task,
            renderer,
            overlay,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_runs_to_finish() {
        let mut viewer = spawn_viewer(&[5, 1, 8, 4, 2, 7, 3, 6]);
        viewer.commands.send(ViewerCommand::Start).unwrap();

        let finished = viewer
            .status
            .wait_for(|status| status.phase == PlaybackPhase::Finished)
            .await
            .unwrap()
            .clone();
        assert_eq!(finished.current_index, Some(finished.step_count - 1));
        assert!(viewer.renderer.journal().frames_rendered > 0);

        viewer.commands.send(ViewerCommand::Shutdown).unwrap();
        let shell = viewer.task.await.unwrap();
        assert!(!shell.is_mounted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_pending_tick() {
        let mut viewer = spawn_viewer(&[3, 2, 1]);
        viewer.commands.send(ViewerCommand::Start).unwrap();
        viewer.commands.send(ViewerCommand::Pause).unwrap();

        time::sleep(PlaybackConfig::default().step_delay() * 5).await;
        let status = *viewer.status.borrow_and_update();
        assert_eq!(status.current_index, Some(0));
        assert_eq!(status.phase, PlaybackPhase::Ready);

        drop(viewer.commands);
        viewer.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_releases_scene_and_stops_frames() {
        let viewer = spawn_viewer(&[4, 1, 3]);
        time::sleep(Duration::from_millis(100)).await;
        assert!(viewer.renderer.journal().frames_rendered > 0);

        viewer.commands.send(ViewerCommand::Shutdown).unwrap();
        viewer.task.await.unwrap();
        let frames = viewer.renderer.journal().frames_rendered;

        time::sleep(Duration::from_millis(100)).await;
        let journal = viewer.renderer.journal();
        assert_eq!(journal.frames_rendered, frames);
        assert_eq!(journal.invalid_calls, 0);
        assert!(!viewer.renderer.has_live_resources());
        assert!(viewer.overlay.labels().is_empty());
        assert!(!viewer.status.borrow().mounted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_frame_projects_labels_at_new_heights() {
        let values = [4, 1];
        let viewer = spawn_viewer(&values);
        let trace = SortAlgorithm::Bubble.generate(Arc::from(values.to_vec()));
        let moved = trace
            .steps()
            .iter()
            .position(|step| step.array != values)
            .unwrap();
        for _ in 0..=moved {
            viewer.commands.send(ViewerCommand::StepForward).unwrap();
        }
        time::sleep(ViewerConfig::default().frame_interval() * 2).await;

        let config = SceneConfig::default();
        let viewport = Viewport::new(800, 600);
        let camera = PerspectiveCamera::new(config.camera.clone(), viewport.aspect());
        let step = &trace.steps()[moved];
        let max = step.max_value().unwrap();
        for (index, (_, label)) in viewer.overlay.labels().into_iter().enumerate() {
            let height = config.bar_height(step.array[index], max);
            let anchor = Vec3::new(
                config.slot_x(index, values.len()),
                height + config.label_margin,
                0.0,
            );
            let expected = ndc_to_pixels(camera.project(anchor), viewport);
            assert_eq!(label.text, step.array[index].to_string());
            assert!((label.x - expected.x).abs() < 1e-3);
            assert!((label.y - expected.y).abs() < 1e-3);
        }

        viewer.commands.send(ViewerCommand::Shutdown).unwrap();
        viewer.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_command_keeps_loop_alive() {
        let mut viewer = spawn_viewer(&[2, 1]);
        viewer
            .commands
            .send(ViewerCommand::SetInputText("2, ,1".into()))
            .unwrap();
        viewer
            .commands
            .send(ViewerCommand::SelectAlgorithm(SortAlgorithm::Insertion))
            .unwrap();

        let status = viewer
            .status
            .wait_for(|status| status.algorithm == SortAlgorithm::Insertion)
            .await
            .unwrap()
            .clone();
        assert!(status.mounted);
        assert_eq!(viewer.overlay.labels().len(), 2);

        viewer.commands.send(ViewerCommand::Shutdown).unwrap();
        let shell = viewer.task.await.unwrap();
        assert_eq!(&shell.input()[..], &[2, 1]);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            ViewerConfig::from_json_str(r#"{"playback": {"step_delay_ms": 250}, "frame_interval_ms": 0}"#)
                .unwrap();
        assert_eq!(config.playback.step_delay(), Duration::from_millis(250));
        assert_eq!(config.scene, SceneConfig::default());
        assert_eq!(config.frame_interval(), Duration::from_millis(1));

        assert!(matches!(
            ViewerConfig::from_json_str("{\"frame_interval_ms\": \"fast\"}"),
            Err(ConfigError::Json(_))
        ));
    }
}
