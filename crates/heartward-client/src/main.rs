//! Heartward client - the ward vignette on Bevy.
//!
//! A lobby stands in for the host page. Starting a visit builds the ward,
//! hands the scene logic a host, and syncs logic state onto the scene graph
//! every frame until the scene tears itself down.

use bevy::prelude::*;
use heartward_logic::constants::palette;

mod builders;
mod camera;
mod input;
mod launch;
mod rendering;
mod state;
mod ui;

use builders::color;
use state::{ActiveVignette, ClientOptions, JoystickState, LaunchVignette, TouchCapability};

fn main() {
    let options = ClientOptions::from_args();
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Heartward".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(color(palette::BACKGROUND)))
        .insert_resource(options)
        .init_resource::<TouchCapability>()
        .init_resource::<JoystickState>()
        .add_event::<LaunchVignette>()
        .add_systems(Startup, ui::setup_lobby)
        .add_systems(
            Update,
            (
                input::keyboard_intent,
                input::touch_joystick,
                input::pointer_input,
                ui::prompt_buttons,
                input::abort_on_escape,
                launch::tick_scene,
                rendering::sync_actors,
                rendering::sync_markers,
                rendering::sync_particles,
                rendering::sync_lighting,
                camera::apply_camera_rig,
                ui::render_panel,
                launch::watch_exit,
            )
                .chain()
                .run_if(resource_exists::<ActiveVignette>)
                .before(ui::lobby_input),
        )
        .add_systems(
            Update,
            (ui::lobby_input, launch::launch_vignette, ui::show_lobby).chain(),
        )
        .run();
}
