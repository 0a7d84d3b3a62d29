//! State management for the Heartward client.
//!
//! Contains resource types, events and Bevy components used throughout the
//! client.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use heartward_logic::interaction::TargetId;
use heartward_logic::particles::ParticleId;
use heartward_logic::scene::{Scene, SceneHost};

use crate::builders::{DachshundParts, DoctorParts, MarkerParts, PatientParts};

// ============================================================================
// EVENTS
// ============================================================================

/// Ask the client to start a visit. Ignored while one is running.
#[derive(Event, Debug, Clone, Copy)]
pub struct LaunchVignette;

// ============================================================================
// RESOURCES
// ============================================================================

#[derive(Resource, Debug, Clone, Default)]
pub struct ClientOptions {
    pub tuning_path: Option<PathBuf>,
    /// Treat the device as touch-capable regardless of what has been seen.
    pub force_touch: bool,
    /// Launch straight into the ward instead of waiting in the lobby.
    pub autostart: bool,
}

impl ClientOptions {
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut options = Self::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--tuning" | "-t" if i + 1 < args.len() => {
                    options.tuning_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                "--touch" => {
                    options.force_touch = true;
                    i += 1;
                }
                "--autostart" => {
                    options.autostart = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        options
    }
}

/// Set once any touch input reaches the window.
#[derive(Resource, Clone, Default)]
pub struct TouchCapability(pub Arc<AtomicBool>);

/// Set when the running visit fails to launch for lack of a renderer.
#[derive(Resource, Debug, Default)]
pub struct VignetteDisabled;

/// The visit currently on screen.
#[derive(Resource)]
pub struct ActiveVignette {
    pub scene: Scene,
    /// Flipped by the scene's return callback.
    pub returned: Arc<AtomicBool>,
}

/// Entities built for the current visit, addressed by name.
#[derive(Resource)]
pub struct VignetteRig {
    pub patient: PatientParts,
    pub doctor: DoctorParts,
    pub dachshund: DachshundParts,
    pub markers: HashMap<TargetId, MarkerParts>,
    pub particles: HashMap<ParticleId, ParticleVisual>,
    pub particle_mesh: Handle<Mesh>,
}

pub struct ParticleVisual {
    pub entity: Entity,
    pub material: Handle<StandardMaterial>,
}

/// Virtual joystick drag state.
#[derive(Resource, Debug, Default)]
pub struct JoystickState {
    /// Touch id currently steering.
    pub finger: Option<u64>,
    /// Knob offset from the base centre, in unit-radius terms.
    pub deflection: Vec2,
}

// ============================================================================
// HOST
// ============================================================================

/// The client's side of the scene's callbacks.
pub struct ClientHost {
    pub touch: TouchCapability,
    pub force_touch: bool,
    pub returned: Arc<AtomicBool>,
}

impl SceneHost for ClientHost {
    fn touch_capable(&self) -> bool {
        self.force_touch || self.touch.0.load(Ordering::Relaxed)
    }

    fn return_from_scene(&mut self) {
        self.returned.store(true, Ordering::Relaxed);
    }
}

// ============================================================================
// BEVY COMPONENTS
// ============================================================================

/// Despawned (recursively) when the visit ends.
#[derive(Component)]
pub struct VignetteOwned;

#[derive(Component)]
pub struct VignetteCamera;

/// 2D camera behind the lobby; outlives every visit.
#[derive(Component)]
pub struct LobbyCamera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightRole {
    Key,
    Table,
}

#[derive(Component)]
pub struct SceneLight(pub LightRole);

#[derive(Component)]
pub struct LobbyUi;

#[derive(Component)]
pub struct LobbyText;

#[derive(Component)]
pub struct PanelText;

#[derive(Component)]
pub struct MessageText;

#[derive(Component)]
pub struct PromptRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Continue,
    Leave,
}

#[derive(Component)]
pub struct PromptButton(pub PromptChoice);

#[derive(Component)]
pub struct JoystickBase;

#[derive(Component)]
pub struct JoystickKnob;
