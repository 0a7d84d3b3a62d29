//! Camera rig — fixed surgery framing, the roaming intro pan, and follow.
//!
//! The intro eases from a fixed aerial point toward a target that trails the
//! live party position; once its duration elapses it is discarded for good
//! and exponential follow takes over from wherever the camera is.

use crate::math::{ease_out_cubic, Vec2, Vec3};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntro {
    pub started_at: f32,
    pub duration: f32,
    pub start: Vec3,
}

impl CameraIntro {
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    Fixed,
    Intro(CameraIntro),
    Follow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub pose: CameraPose,
    pub mode: CameraMode,
    offset: Vec3,
    smoothing: f32,
    smoothing_vertical: f32,
}

impl CameraRig {
    pub fn fixed(position: Vec3, look_at: Vec3, tuning: &Tuning) -> Self {
        Self {
            pose: CameraPose { position, look_at },
            mode: CameraMode::Fixed,
            offset: tuning.follow_offset,
            smoothing: tuning.follow_smoothing,
            smoothing_vertical: tuning.follow_smoothing_vertical,
        }
    }

    pub fn begin_intro(&mut self, now: f32, duration: f32, start: Vec3, party: Vec2) {
        self.pose = CameraPose {
            position: start,
            look_at: party.with_y(0.0),
        };
        self.mode = CameraMode::Intro(CameraIntro {
            started_at: now,
            duration,
            start,
        });
    }

    pub fn intro(&self) -> Option<&CameraIntro> {
        match &self.mode {
            CameraMode::Intro(intro) => Some(intro),
            _ => None,
        }
    }

    pub fn follow_target(&self, party: Vec2) -> Vec3 {
        party.with_y(0.0) + self.offset
    }

    pub fn update(&mut self, now: f32, party: Vec2) {
        let target = self.follow_target(party);
        match self.mode {
            CameraMode::Fixed => return,
            CameraMode::Intro(intro) => {
                let t = intro.progress(now);
                if t >= 1.0 {
                    self.pose.position = target;
                    self.mode = CameraMode::Follow;
                } else {
                    self.pose.position = intro.start.lerp(target, ease_out_cubic(t));
                }
            }
            CameraMode::Follow => {
                let p = &mut self.pose.position;
                p.x += (target.x - p.x) * self.smoothing;
                p.z += (target.z - p.z) * self.smoothing;
                p.y += (target.y - p.y) * self.smoothing_vertical;
            }
        }
        self.pose.look_at = party.with_y(0.0);
    }
}
