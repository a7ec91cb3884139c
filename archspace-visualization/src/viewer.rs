//! Free-running frame loop reading published scene frames

use crate::camera::Camera;
use archspace_core::{CameraSettings, FrameSlot, SceneFrame};
use std::sync::Arc;
use tracing::debug;

/// Frames between two progress lines in the log
const LOG_EVERY: u64 = 60;

/// Render-side loop: turns the camera and picks up the latest frame
///
/// The loop only reads from the [`FrameSlot`]; all view state changes go
/// through the session that publishes into it.
#[derive(Debug)]
pub struct FrameLoop {
    slot: FrameSlot,
    auto_rotate: bool,
    auto_rotate_speed: f32,
    frame_count: u64,
    last_generation: Option<u64>,
}

impl FrameLoop {
    pub fn new(slot: FrameSlot, settings: &CameraSettings) -> Self {
        Self {
            slot,
            auto_rotate: settings.auto_rotate,
            auto_rotate_speed: settings.auto_rotate_speed,
            frame_count: 0,
            last_generation: None,
        }
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Advance one frame of `dt` seconds and return the frame to draw
    pub fn tick(&mut self, camera: &mut Camera, dt: f32) -> Arc<SceneFrame> {
        if self.auto_rotate {
            camera.auto_rotate(self.auto_rotate_speed, dt);
        }

        let frame = self.slot.latest();
        if self.last_generation != Some(frame.generation) {
            debug!(generation = frame.generation, "picked up new scene frame");
            self.last_generation = Some(frame.generation);
        }

        if self.frame_count % LOG_EVERY == 0 {
            debug!(
                frame = self.frame_count,
                visible = frame.visible_points().count(),
                clusters = frame.clusters.len(),
                "rendering"
            );
        }
        self.frame_count += 1;
        frame
    }

    /// Run `frames` ticks at a fixed step and return the last frame drawn
    pub fn run(&mut self, camera: &mut Camera, frames: u64, dt: f32) -> Arc<SceneFrame> {
        let mut frame = self.slot.latest();
        for _ in 0..frames {
            frame = self.tick(camera, dt);
        }
        frame
    }
}
