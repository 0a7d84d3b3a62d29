//! Launching, ticking and tearing down a visit.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;
use heartward_logic::scene::{Scene, SceneError};
use heartward_logic::tuning::{validate_tuning, Tuning};

use crate::builders::{
    build_dachshund, build_doctor, build_patient, build_ward, Kit,
};
use crate::camera::spawn_vignette_camera;
use crate::rendering::{AMBIENT_BRIGHTNESS, KEY_ILLUMINANCE, TABLE_INTENSITY};
use crate::state::{
    ActiveVignette, ClientHost, ClientOptions, JoystickState, LaunchVignette, LightRole,
    SceneLight, TouchCapability, VignetteDisabled, VignetteOwned, VignetteRig,
};
use crate::ui::spawn_vignette_ui;

/// Radius of the shared particle sphere; particles scale it per frame.
const PARTICLE_RADIUS: f32 = 0.06;

#[derive(Debug)]
pub enum LaunchError {
    /// Mesh or material stores are missing (headless or no GPU).
    RendererUnavailable,
    Scene(SceneError),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::RendererUnavailable => write!(f, "renderer unavailable"),
            LaunchError::Scene(e) => write!(f, "scene refused to launch: {}", e),
        }
    }
}

impl std::error::Error for LaunchError {}

impl From<SceneError> for LaunchError {
    fn from(e: SceneError) -> Self {
        LaunchError::Scene(e)
    }
}

/// Tuning from `path`, or the defaults when it is absent or unusable.
pub fn load_tuning(path: Option<&Path>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            warn!("could not read {}: {}; using default tuning", path.display(), e);
            return Tuning::default();
        }
    };
    let tuning = match Tuning::from_json_str(&json) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}: {}; using default tuning", path.display(), e);
            return Tuning::default();
        }
    };
    let errors = validate_tuning(&tuning);
    if errors.is_empty() {
        info!("tuning loaded from {}", path.display());
        return tuning;
    }
    for e in &errors {
        warn!("{}: {}", path.display(), e);
    }
    warn!("using default tuning");
    Tuning::default()
}

#[allow(clippy::too_many_arguments)]
pub fn launch_vignette(
    mut commands: Commands,
    mut events: EventReader<LaunchVignette>,
    options: Res<ClientOptions>,
    touch: Res<TouchCapability>,
    active: Option<Res<ActiveVignette>>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    materials: Option<ResMut<Assets<StandardMaterial>>>,
    ambient: Option<ResMut<AmbientLight>>,
) {
    if events.read().count() == 0 || active.is_some() {
        return;
    }
    let (Some(mut meshes), Some(mut materials), Some(mut ambient)) = (meshes, materials, ambient)
    else {
        warn!("{}; the ward stays closed", LaunchError::RendererUnavailable);
        commands.insert_resource(VignetteDisabled);
        return;
    };

    let tuning = load_tuning(options.tuning_path.as_deref());
    let returned = Arc::new(AtomicBool::new(false));
    let host = ClientHost {
        touch: TouchCapability(touch.0.clone()),
        force_touch: options.force_touch,
        returned: returned.clone(),
    };
    let scene = match Scene::launch(tuning, Box::new(host)) {
        Ok(scene) => scene,
        Err(e) => {
            error!("{}", LaunchError::from(e));
            return;
        }
    };

    let mut kit = Kit {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
    };
    let ward = build_ward(&mut kit);
    let patient = build_patient(&mut kit);
    let doctor = build_doctor(&mut kit);
    let dachshund = build_dachshund(&mut kit);
    let particle_mesh = meshes.add(Mesh::from(Sphere::new(PARTICLE_RADIUS)));

    // ── Lights, parented to the ward ──
    let profile = scene.lighting();
    ambient.color = Color::WHITE;
    ambient.brightness = AMBIENT_BRIGHTNESS * profile.ambient;
    let key = commands
        .spawn((
            DirectionalLight {
                illuminance: KEY_ILLUMINANCE * profile.key,
                shadows_enabled: true,
                ..default()
            },
            Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
            SceneLight(LightRole::Key),
        ))
        .id();
    let table = commands
        .spawn((
            PointLight {
                intensity: TABLE_INTENSITY * profile.table,
                range: 12.0,
                ..default()
            },
            Transform::from_xyz(0.0, 3.2, 0.4),
            SceneLight(LightRole::Table),
        ))
        .id();
    commands.entity(ward.root).add_children(&[key, table]);

    let camera = spawn_vignette_camera(&mut commands, &scene.camera().pose);
    spawn_vignette_ui(&mut commands, camera);

    commands.insert_resource(VignetteRig {
        patient,
        doctor,
        dachshund,
        markers: HashMap::new(),
        particles: HashMap::new(),
        particle_mesh,
    });
    commands.insert_resource(ActiveVignette { scene, returned });
    info!("visit started");
}

pub fn tick_scene(time: Res<Time>, mut vignette: ResMut<ActiveVignette>) {
    vignette.scene.update(time.delta_secs());
}

/// Clears every vignette-owned entity once the scene is done.
pub fn watch_exit(
    mut commands: Commands,
    vignette: Res<ActiveVignette>,
    owned: Query<Entity, With<VignetteOwned>>,
    mut joystick: ResMut<JoystickState>,
    mut ambient: ResMut<AmbientLight>,
) {
    let returned = vignette.returned.load(Ordering::Relaxed);
    if vignette.scene.is_alive() && !returned {
        return;
    }

    for entity in &owned {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<ActiveVignette>();
    commands.remove_resource::<VignetteRig>();
    *joystick = JoystickState::default();
    *ambient = AmbientLight::default();

    if returned {
        info!("visit over, back in the lobby");
    } else {
        info!("visit abandoned, back in the lobby");
    }
}
