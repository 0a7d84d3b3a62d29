//! Input handling for the visit.
//!
//! Keyboard feeds held keys, the bottom-left touch joystick feeds a
//! deflection, and clicks or short taps go to the scene as a world ray
//! (surgery) or a screen-space tap (roaming).

use std::sync::atomic::Ordering;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use heartward_logic::math as wm;
use heartward_logic::movement::HeldKeys;
use heartward_logic::phase::Phase;

use crate::state::{ActiveVignette, JoystickState, PromptButton, TouchCapability, VignetteCamera};

/// Joystick base centre, in pixels from the bottom-left corner.
pub const JOYSTICK_MARGIN: f32 = 90.0;
pub const JOYSTICK_RADIUS: f32 = 60.0;
/// Touches that travel further than this are drags, not taps.
const TAP_SLOP: f32 = 12.0;

pub fn joystick_center(window: &Window) -> Vec2 {
    Vec2::new(JOYSTICK_MARGIN, window.height() - JOYSTICK_MARGIN)
}

pub fn keyboard_intent(keyboard: Res<ButtonInput<KeyCode>>, mut vignette: ResMut<ActiveVignette>) {
    let keys = HeldKeys {
        up: keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]),
        down: keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]),
        left: keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
    };
    vignette.scene.input_mut().set_keys(keys);
}

pub fn touch_joystick(
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    capability: Res<TouchCapability>,
    mut joystick: ResMut<JoystickState>,
    mut vignette: ResMut<ActiveVignette>,
) {
    if touches.iter().next().is_some() || touches.iter_just_released().next().is_some() {
        capability.0.store(true, Ordering::Relaxed);
    }

    let Ok(window) = windows.get_single() else {
        return;
    };

    if !vignette.scene.ui().panel.shows_joystick() {
        if joystick.finger.take().is_some() {
            joystick.deflection = Vec2::ZERO;
            vignette.scene.input_mut().release_joystick();
        }
        return;
    }

    let center = joystick_center(window);
    if joystick.finger.is_none() {
        if let Some(touch) = touches
            .iter_just_pressed()
            .find(|t| t.position().distance(center) <= JOYSTICK_RADIUS * 1.5)
        {
            joystick.finger = Some(touch.id());
        }
    }

    let Some(finger) = joystick.finger else {
        return;
    };
    match touches.get_pressed(finger) {
        Some(touch) => {
            // screen y grows downward, which is +z in the ward
            let deflection = ((touch.position() - center) / JOYSTICK_RADIUS).clamp_length_max(1.0);
            joystick.deflection = deflection;
            vignette
                .scene
                .input_mut()
                .set_joystick(wm::Vec2::new(deflection.x, deflection.y));
        }
        None => {
            joystick.finger = None;
            joystick.deflection = Vec2::ZERO;
            vignette.scene.input_mut().release_joystick();
        }
    }
}

pub fn pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<VignetteCamera>>,
    buttons: Query<&Interaction, With<PromptButton>>,
    joystick: Res<JoystickState>,
    mut vignette: ResMut<ActiveVignette>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let mut presses: Vec<Vec2> = Vec::new();
    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            presses.push(cursor);
        }
    }
    for touch in touches.iter_just_released() {
        let steering = joystick.finger == Some(touch.id())
            || touch.start_position().distance(joystick_center(window)) <= JOYSTICK_RADIUS * 1.5;
        if !steering && touch.distance().length() < TAP_SLOP {
            presses.push(touch.position());
        }
    }
    if presses.is_empty() {
        return;
    }

    // Presses on the prompt buttons belong to the buttons
    if buttons.iter().any(|i| *i != Interaction::None) {
        return;
    }

    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let scene = &mut vignette.scene;
    for cursor in presses {
        match scene.phase() {
            Phase::Surgery => {
                let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
                    continue;
                };
                let origin = wm::Vec3::new(ray.origin.x, ray.origin.y, ray.origin.z);
                let direction = wm::Vec3::new(ray.direction.x, ray.direction.y, ray.direction.z);
                if let Some(id) = scene.pointer_ray(&wm::Ray::new(origin, direction)) {
                    debug!("pointer hit {}", id);
                }
            }
            Phase::Roaming => {
                let size = window.size();
                let ndc = wm::Vec2::new(
                    cursor.x / size.x * 2.0 - 1.0,
                    1.0 - cursor.y / size.y * 2.0,
                );
                scene.tap(ndc);
            }
        }
    }
}

/// Escape abandons the visit without the farewell.
pub fn abort_on_escape(keyboard: Res<ButtonInput<KeyCode>>, mut vignette: ResMut<ActiveVignette>) {
    if keyboard.just_pressed(KeyCode::Escape) && vignette.scene.is_alive() {
        info!("visit abandoned from the keyboard");
        vignette.scene.teardown();
    }
}
