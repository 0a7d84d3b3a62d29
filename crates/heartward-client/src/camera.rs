//! Camera for the visit.
//!
//! The logic rig owns the pose; this module only spawns the camera and
//! copies the pose onto its transform every frame.

use bevy::prelude::*;
use heartward_logic::camera::CameraPose;

use crate::rendering::world;
use crate::state::{ActiveVignette, VignetteCamera, VignetteOwned};

/// Renders above the lobby camera while the visit runs.
pub const VIGNETTE_CAMERA_ORDER: isize = 1;

fn pose_transform(pose: &CameraPose) -> Transform {
    Transform::from_translation(world(pose.position)).looking_at(world(pose.look_at), Vec3::Y)
}

pub fn spawn_vignette_camera(commands: &mut Commands, pose: &CameraPose) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Camera {
                order: VIGNETTE_CAMERA_ORDER,
                ..default()
            },
            pose_transform(pose),
            VignetteCamera,
            VignetteOwned,
        ))
        .id()
}

pub fn apply_camera_rig(
    vignette: Res<ActiveVignette>,
    mut camera_query: Query<&mut Transform, With<VignetteCamera>>,
) {
    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };
    *transform = pose_transform(&vignette.scene.camera().pose);
}
