//! Syncs scene state onto the spawned hierarchy each frame.
//!
//! Actors and lights are spawned once at launch and only moved or recoloured
//! here. Markers and particles come and go with the scene: each is keyed by
//! its logic id and spawned or despawned when the id appears or vanishes.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use heartward_logic::constants::palette;
use heartward_logic::effects::{EffectKind, ARM_RAISE_ANGLE};
use heartward_logic::interaction::{MarkerShape, MarkerStyle, TargetId};
use heartward_logic::math as wm;
use heartward_logic::movement::ActorPose;
use heartward_logic::phase::Phase;

use crate::builders::{build_roam_marker, build_surgery_marker, color, Kit, PATIENT_LEFT_ARM_AT};
use crate::state::{
    ActiveVignette, LightRole, ParticleVisual, SceneLight, VignetteOwned, VignetteRig,
};

pub const AMBIENT_BRIGHTNESS: f32 = 400.0;
pub const KEY_ILLUMINANCE: f32 = 3_000.0;
pub const TABLE_INTENSITY: f32 = 400_000.0;

const EYE_GLOW_SCALE: f32 = 1.4;
const SPARKLE_SCALE: f32 = 1.8;
const PULSE_RATE: f32 = 12.0;

pub fn world(v: wm::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn pose_transform(pose: &ActorPose) -> Transform {
    Transform::from_translation(world(pose.position))
        .with_rotation(Quat::from_rotation_y(pose.yaw) * Quat::from_rotation_x(pose.tilt))
}

fn set_base_color(materials: &mut Assets<StandardMaterial>, handle: &Handle<StandardMaterial>, c: Color) {
    if materials.get(handle).is_some_and(|m| m.base_color != c) {
        if let Some(m) = materials.get_mut(handle) {
            m.base_color = c;
        }
    }
}

/// Tinted colour while `kind` runs, the resting colour otherwise.
fn effect_color(active: bool, kind: EffectKind, rest: u32) -> Color {
    match kind.tint() {
        Some(tint) if active => color(tint),
        _ => color(rest),
    }
}

// ============================================================================
// ACTORS
// ============================================================================

pub fn sync_actors(
    vignette: Res<ActiveVignette>,
    rig: Res<VignetteRig>,
    mut transforms: Query<&mut Transform>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let scene = &vignette.scene;
    let party = scene.party();
    let now = scene.clock();
    let effects = scene.effects();

    if let Ok(mut tf) = transforms.get_mut(rig.patient.root) {
        *tf = pose_transform(&party.patient);
    }
    if let Ok(mut tf) = transforms.get_mut(rig.doctor.root) {
        *tf = pose_transform(&party.doctor);
    }
    // doctor peers down at the table during surgery
    if let Ok(mut tf) = transforms.get_mut(rig.doctor.head) {
        let nod = if scene.phase() == Phase::Surgery { 0.3 } else { 0.0 };
        tf.rotation = Quat::from_rotation_x(nod);
    }

    let dog = scene.companion_pose();
    if let Ok(mut tf) = transforms.get_mut(rig.dachshund.root) {
        *tf = pose_transform(&dog);
    }
    if let Ok(mut tf) = transforms.get_mut(rig.dachshund.tail) {
        tf.rotation = Quat::from_rotation_y(scene.ambient().tail_wag);
    }
    if let Ok(mut tf) = transforms.get_mut(rig.dachshund.head) {
        tf.rotation = Quat::from_rotation_x((now * 4.0).sin() * 0.1);
    }

    // ── Timed effects on the patient ──
    let pulsing = effects.is_active(EffectKind::BodyPulse);
    let sparkling = effects.is_active(EffectKind::AntennaSparkle);
    let glowing = effects.is_active(EffectKind::EyeGlow);
    let raised = effects.is_active(EffectKind::ArmRaise);

    if let Ok(mut tf) = transforms.get_mut(rig.patient.body) {
        let s = if pulsing {
            1.0 + (now * PULSE_RATE).sin().abs() * 0.06
        } else {
            1.0
        };
        tf.scale = Vec3::splat(s);
    }
    if let Ok(mut tf) = transforms.get_mut(rig.patient.left_arm) {
        let [x, y, z] = PATIENT_LEFT_ARM_AT;
        let angle = if raised { ARM_RAISE_ANGLE } else { 0.0 };
        *tf = Transform::from_xyz(x, y, z).with_rotation(Quat::from_rotation_z(angle));
    }
    for eye in [rig.patient.left_eye, rig.patient.right_eye] {
        if let Ok(mut tf) = transforms.get_mut(eye) {
            tf.scale = Vec3::splat(if glowing { EYE_GLOW_SCALE } else { 1.0 });
        }
    }
    if let Ok(mut tf) = transforms.get_mut(rig.patient.antenna_ball) {
        tf.scale = Vec3::splat(if sparkling { SPARKLE_SCALE } else { 1.0 });
    }

    set_base_color(
        &mut materials,
        &rig.patient.body_material,
        effect_color(pulsing, EffectKind::BodyPulse, palette::PATIENT_BODY),
    );
    set_base_color(
        &mut materials,
        &rig.patient.antenna_material,
        effect_color(sparkling, EffectKind::AntennaSparkle, palette::PATIENT_ANTENNA),
    );
    set_base_color(
        &mut materials,
        &rig.patient.eye_material,
        effect_color(glowing, EffectKind::EyeGlow, palette::PATIENT_EYE),
    );
}

// ============================================================================
// MARKERS
// ============================================================================

pub fn sync_markers(
    mut commands: Commands,
    vignette: Res<ActiveVignette>,
    mut rig: ResMut<VignetteRig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut transforms: Query<&mut Transform>,
) {
    let scene = &vignette.scene;
    let now = scene.clock();
    let ambient = scene.ambient();

    let wanted: HashMap<TargetId, (MarkerStyle, Vec3)> = scene
        .targets()
        .iter()
        .filter_map(|t| t.marker.map(|m| (t.id, (m, world(t.position.at(now))))))
        .collect();

    // Completed or replaced targets lose their marker
    rig.markers.retain(|id, parts| {
        if wanted.contains_key(id) {
            true
        } else {
            commands.entity(parts.root).despawn_recursive();
            false
        }
    });

    for (&id, &(style, at)) in &wanted {
        if let Some(parts) = rig.markers.get(id) {
            if let Ok(mut tf) = transforms.get_mut(parts.root) {
                tf.translation = at;
            }
            match style.shape {
                MarkerShape::GlowOrb => {
                    if let Ok(mut tf) = transforms.get_mut(parts.indicator) {
                        tf.scale = Vec3::splat(ambient.glow_scale());
                    }
                    if let Some(m) = materials.get_mut(&parts.material) {
                        m.base_color = color(style.color).with_alpha(ambient.glow_opacity());
                    }
                }
                MarkerShape::FloorBeacon => {
                    if let Ok(mut tf) = transforms.get_mut(parts.indicator) {
                        tf.rotation = Quat::from_rotation_y(ambient.marker_spin);
                    }
                }
            }
            continue;
        }

        let mut kit = Kit {
            commands: &mut commands,
            meshes: &mut meshes,
            materials: &mut materials,
        };
        let parts = match style.shape {
            MarkerShape::GlowOrb => {
                build_surgery_marker(&mut kit, scene.tuning().surgery_spot_radius)
            }
            MarkerShape::FloorBeacon => build_roam_marker(&mut kit, style.color),
        };
        commands
            .entity(parts.root)
            .insert(Transform::from_translation(at));
        rig.markers.insert(id, parts);
    }
}

// ============================================================================
// PARTICLES
// ============================================================================

pub fn sync_particles(
    mut commands: Commands,
    vignette: Res<ActiveVignette>,
    mut rig: ResMut<VignetteRig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut transforms: Query<&mut Transform>,
) {
    let rig = &mut *rig;
    let live = vignette.scene.particles().live();
    let ids: HashSet<_> = live.iter().map(|p| p.id).collect();

    rig.particles.retain(|id, visual| {
        if ids.contains(id) {
            true
        } else {
            commands.entity(visual.entity).despawn();
            false
        }
    });

    for p in live {
        let at = world(p.position);
        if let Some(visual) = rig.particles.get(&p.id) {
            if let Ok(mut tf) = transforms.get_mut(visual.entity) {
                tf.translation = at;
                tf.scale = Vec3::splat(p.scale());
            }
            if let Some(m) = materials.get_mut(&visual.material) {
                m.base_color = m.base_color.with_alpha(p.opacity());
            }
            continue;
        }

        let material = materials.add(StandardMaterial {
            base_color: color(p.color).with_alpha(p.opacity()),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        let entity = commands
            .spawn((
                Mesh3d(rig.particle_mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(at),
                VignetteOwned,
            ))
            .id();
        rig.particles.insert(p.id, ParticleVisual { entity, material });
    }
}

// ============================================================================
// LIGHTING
// ============================================================================

pub fn sync_lighting(
    vignette: Res<ActiveVignette>,
    mut ambient: ResMut<AmbientLight>,
    mut lights: Query<(
        &SceneLight,
        Option<&mut DirectionalLight>,
        Option<&mut PointLight>,
    )>,
) {
    let profile = vignette.scene.lighting();

    let brightness = AMBIENT_BRIGHTNESS * profile.ambient;
    if ambient.brightness != brightness {
        ambient.brightness = brightness;
    }

    for (role, directional, point) in &mut lights {
        match (role.0, directional, point) {
            (LightRole::Key, Some(mut light), _) => {
                let illuminance = KEY_ILLUMINANCE * profile.key;
                if light.illuminance != illuminance {
                    light.illuminance = illuminance;
                }
            }
            (LightRole::Table, _, Some(mut light)) => {
                let intensity = TABLE_INTENSITY * profile.table;
                if light.intensity != intensity {
                    light.intensity = intensity;
                }
            }
            _ => {}
        }
    }
}
