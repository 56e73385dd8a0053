//! Perspective camera math
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::engine::backend::Viewport;

/// Camera placement and lens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, 14.0),
            target: Vec3::new(0.0, 2.5, 0.0),
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    config: CameraConfig,
    aspect: f32,
}

impl PerspectiveCamera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        Self { config, aspect }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::perspective_rh(
            self.config.fov_y_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        );
        let view = Mat4::look_at_rh(self.config.position, self.config.target, Vec3::Y);
        projection * view
    }

    /// World-space point to normalized device coordinates
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }
}

/// Maps NDC (`[-1, 1]`, y up) to pixel coordinates (origin top-left, y down)
pub fn ndc_to_pixels(ndc: Vec3, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width as f32,
        (1.0 - ndc.y) * 0.5 * viewport.height as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_center() {
        let config = CameraConfig::default();
        let camera = PerspectiveCamera::new(config.clone(), 4.0 / 3.0);
        let ndc = camera.project(config.target);

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);

        let pixels = ndc_to_pixels(ndc, Viewport::new(800, 600));
        assert!((pixels.x - 400.0).abs() < 1e-3);
        assert!((pixels.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_higher_points_land_higher_on_screen() {
        let camera = PerspectiveCamera::new(CameraConfig::default(), 1.0);
        let viewport = Viewport::new(500, 500);
        let low = ndc_to_pixels(camera.project(Vec3::new(0.0, 1.0, 0.0)), viewport);
        let high = ndc_to_pixels(camera.project(Vec3::new(0.0, 4.0, 0.0)), viewport);
        assert!(high.y < low.y);
    }

    #[test]
    fn test_aspect_changes_horizontal_spread() {
        let point = Vec3::new(3.0, 2.5, 0.0);
        let narrow = PerspectiveCamera::new(CameraConfig::default(), 1.0).project(point);
        let wide = PerspectiveCamera::new(CameraConfig::default(), 2.0).project(point);
        assert!(wide.x < narrow.x);
    }
}
