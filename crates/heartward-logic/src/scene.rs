//! The ward vignette as one owned object.
//!
//! A `Scene` is created by [`Scene::launch`] and lives until
//! [`Scene::teardown`]. It owns the phase, party pose, targets, particles,
//! timed effects, pending timers, camera rig and UI state; the host only
//! feeds it input and a frame delta and reads back what to draw.
//!
//! Frame order inside [`Scene::update`]:
//! 1. advance the scene clock and fire due timers
//! 2. expire timed effects and messages
//! 3. ambient animation (marker spin, glow pulse, dog wander)
//! 4. particles
//! 5. movement, camera and proximity interaction (roaming only)

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::CameraRig;
use crate::constants::{
    palette, surgery_spot_world, SurgeryOrgan, DACHSHUND_WANDER, EXIT_SPOT_ID, ROAM_STAGING,
    SURGERY_CAMERA_LOOK_AT, SURGERY_CAMERA_POSITION, WARD_REGIONS,
};
use crate::effects::{EffectKind, EffectTrack, Scheduler, TimerEvent};
use crate::interaction::{TargetId, TargetKind, TargetPosition, TargetRegistry};
use crate::math::{ease_out_quad, Ray, Vec2, Vec3};
use crate::movement::{ActorPose, IntentSources, PartyPose};
use crate::particles::ParticleSystem;
use crate::phase::{LightingProfile, Phase};
use crate::tuning::{validate_tuning, Tuning, TuningError};
use crate::ui::{InputModality, Panel, UiState};
use crate::walkable::FloorMask;

const BODY_PULSE_SECS: f32 = 1.5;
const SPARKLE_SECS: f32 = 1.5;
const ARM_RAISE_SECS: f32 = 2.0;
const EYE_GLOW_SECS: f32 = 2.0;
const SPARK_COUNT: u32 = 8;
/// Antenna tip in the patient's standing frame.
const ANTENNA_TIP: Vec3 = Vec3::new(0.0, 2.4, 0.0);
/// Bursts rise from about waist height above a marker.
const BURST_LIFT: f32 = 0.8;

/// Surroundings the scene talks back to.
pub trait SceneHost: Send + Sync {
    /// Asked once, on entering roaming.
    fn touch_capable(&self) -> bool;
    /// Called once, after the confirmed exit has torn the scene down.
    fn return_from_scene(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    InvalidTuning(Vec<TuningError>),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidTuning(errors) => {
                write!(f, "invalid tuning ({} problems)", errors.len())?;
                for e in errors {
                    write!(f, "; {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// Decorative per-frame animation state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ambient {
    /// Roaming indicator rotation about y, radians.
    pub marker_spin: f32,
    /// Surgery orb pulse in [-1, 1].
    pub glow_pulse: f32,
    /// Dachshund tail angle, radians.
    pub tail_wag: f32,
}

impl Ambient {
    pub fn glow_opacity(&self) -> f32 {
        0.4 + self.glow_pulse * 0.3
    }

    pub fn glow_scale(&self) -> f32 {
        1.0 + self.glow_pulse * 0.15
    }
}

pub struct Scene {
    tuning: Tuning,
    host: Box<dyn SceneHost>,
    rng: StdRng,
    clock: f32,
    alive: bool,
    phase: Phase,
    lighting: LightingProfile,
    floor: FloorMask,
    targets: TargetRegistry,
    party: PartyPose,
    camera: CameraRig,
    particles: ParticleSystem,
    effects: EffectTrack,
    timers: Scheduler,
    input: IntentSources,
    ui: UiState,
    ambient: Ambient,
    modality: Option<InputModality>,
    exit_prompt_armed: bool,
    hearts_poured: bool,
    leaving: bool,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("clock", &self.clock)
            .field("alive", &self.alive)
            .field("phase", &self.phase)
            .field("party", &self.party.position)
            .field("targets_done", &self.targets.completed_count())
            .field("particles", &self.particles.len())
            .finish()
    }
}

impl Scene {
    /// Validate tuning and start a fresh visit in the surgery phase.
    pub fn launch(tuning: Tuning, host: Box<dyn SceneHost>) -> Result<Self, SceneError> {
        let errors = validate_tuning(&tuning);
        if !errors.is_empty() {
            return Err(SceneError::InvalidTuning(errors));
        }
        let rng = match tuning.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let targets = TargetRegistry::surgery(&tuning);
        let camera = CameraRig::fixed(SURGERY_CAMERA_POSITION, SURGERY_CAMERA_LOOK_AT, &tuning);
        let ui = UiState {
            panel: Panel::SurgeryHint {
                done: 0,
                total: targets.len(),
            },
            message: None,
        };
        log::info!("ward scene launched: {} surgery spots", targets.len());
        Ok(Self {
            tuning,
            host,
            rng,
            clock: 0.0,
            alive: true,
            phase: Phase::Surgery,
            lighting: Phase::Surgery.lighting(),
            floor: FloorMask::new(WARD_REGIONS),
            targets,
            party: PartyPose::on_table(),
            camera,
            particles: ParticleSystem::new(),
            effects: EffectTrack::default(),
            timers: Scheduler::default(),
            input: IntentSources::default(),
            ui,
            ambient: Ambient::default(),
            modality: None,
            exit_prompt_armed: true,
            hearts_poured: false,
            leaving: false,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn lighting(&self) -> LightingProfile {
        self.lighting
    }

    pub fn floor(&self) -> &FloorMask {
        &self.floor
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn party(&self) -> &PartyPose {
        &self.party
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn effects(&self) -> &EffectTrack {
        &self.effects
    }

    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ambient(&self) -> Ambient {
        self.ambient
    }

    pub fn modality(&self) -> Option<InputModality> {
        self.modality
    }

    pub fn hearts_poured(&self) -> bool {
        self.hearts_poured
    }

    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    /// Input devices write here; the scene samples once per frame.
    pub fn input_mut(&mut self) -> &mut IntentSources {
        &mut self.input
    }

    /// Where the wandering dachshund is right now.
    pub fn companion_pose(&self) -> ActorPose {
        let path = TargetPosition::from_anchor(DACHSHUND_WANDER);
        let here = path.at(self.clock);
        let ahead = path.at(self.clock + 0.05);
        let heading = ahead - here;
        ActorPose {
            position: Vec3::new(here.x, 0.0, here.z),
            yaw: heading.x.atan2(heading.z),
            tilt: 0.0,
        }
    }

    // ── Frame ───────────────────────────────────────────────────────────

    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.clock += dt;

        for event in self.timers.take_due(self.clock) {
            self.fire_timer(event);
            if !self.alive {
                return;
            }
        }

        if let Some(sit) = self.effects.get(EffectKind::SitUp) {
            let progress = ease_out_quad(sit.progress(self.clock));
            self.party.sit_up(progress);
        }
        for ended in self.effects.expire(self.clock) {
            if ended == EffectKind::SitUp && self.phase == Phase::Surgery {
                self.party.sit_up(1.0);
            }
        }
        self.ui.expire(self.clock);

        self.ambient.marker_spin += dt * 1.2;
        self.ambient.glow_pulse = (self.clock * 3.0).sin();
        self.ambient.tail_wag = (self.clock * 12.0).sin() * 0.5;

        self.particles.advance(dt);

        if self.phase == Phase::Roaming {
            self.update_roaming(dt);
        }
    }

    fn update_roaming(&mut self, dt: f32) {
        let intent = self.input.sample(dt);
        let frozen = self.leaving || self.ui.panel == Panel::ExitPrompt;
        let intent = if frozen { Vec2::ZERO } else { intent };
        let step = self.tuning.move_speed * dt;
        self.party.walk(&self.floor, intent, step, self.clock);
        self.camera.update(self.clock, self.party.position);

        if self.leaving {
            return;
        }

        let party = self.party.position;
        for id in self
            .targets
            .within(party, self.tuning.proximity_radius, self.clock)
        {
            if id == EXIT_SPOT_ID {
                if self.exit_prompt_armed && self.ui.panel != Panel::ExitPrompt {
                    self.exit_prompt_armed = false;
                    self.ui.panel = Panel::ExitPrompt;
                    log::debug!("exit prompt opened");
                }
            } else {
                self.complete_roam_target(id);
            }
        }

        if let Some(exit) = self.targets.get(EXIT_SPOT_ID) {
            let exit_pos = exit.position.at(self.clock);
            let distance = exit_pos.floor().distance(party);
            if !exit.is_completed() && distance >= self.tuning.proximity_radius {
                self.exit_prompt_armed = true;
            }
            if !self.hearts_poured && distance < self.tuning.heart_pour_radius {
                self.hearts_poured = true;
                let at = exit_pos + Vec3::new(0.0, 1.0, 0.0);
                let count = self.tuning.heart_burst_count;
                self.particles
                    .spawn_burst(&mut self.rng, at, palette::HEART, count);
                log::debug!("hearts poured at exit");
            }
        }
    }

    // ── Surgery ─────────────────────────────────────────────────────────

    /// Pointer click/tap already unprojected into a world ray.
    /// Returns the surgery spot that was repaired, if any.
    pub fn pointer_ray(&mut self, ray: &Ray) -> Option<TargetId> {
        if !self.alive || self.phase != Phase::Surgery {
            return None;
        }
        let id = self.targets.pick(ray, self.clock)?;
        self.complete_surgery_target(id);
        Some(id)
    }

    fn complete_surgery_target(&mut self, id: TargetId) {
        let Some(target) = self.targets.complete(id) else {
            return;
        };
        let (kind, message, label) = (target.kind, target.message, target.label);
        let now = self.clock;

        match kind {
            TargetKind::Surgery(SurgeryOrgan::Heart) => {
                self.effects.start(EffectKind::BodyPulse, now, BODY_PULSE_SECS)
            }
            TargetKind::Surgery(SurgeryOrgan::Brain) => {
                self.effects
                    .start(EffectKind::AntennaSparkle, now, SPARKLE_SECS);
                self.particles.spawn_burst(
                    &mut self.rng,
                    surgery_spot_world(ANTENNA_TIP),
                    palette::SPARKLE_YELLOW,
                    SPARK_COUNT,
                );
            }
            TargetKind::Surgery(SurgeryOrgan::Arm) => {
                self.effects.start(EffectKind::ArmRaise, now, ARM_RAISE_SECS)
            }
            TargetKind::Surgery(SurgeryOrgan::Eyes) => {
                self.effects.start(EffectKind::EyeGlow, now, EYE_GLOW_SECS)
            }
            TargetKind::Roam | TargetKind::Exit => {}
        }

        self.ui
            .show_message(message, now, self.tuning.message_secs);
        let done = self.targets.completed_count();
        let total = self.targets.len();
        log::debug!("{label} repaired ({done}/{total})");

        if self.targets.all_completed() {
            self.ui.panel = Panel::SurgeryComplete;
            self.effects
                .start(EffectKind::SitUp, now, self.tuning.sit_up_secs);
            self.timers
                .schedule(TimerEvent::BeginRoaming, now + self.tuning.roam_delay_secs);
        } else {
            self.ui.panel = Panel::SurgeryHint { done, total };
        }
    }

    // ── Roaming ─────────────────────────────────────────────────────────

    fn enter_roaming(&mut self) {
        if self.phase == Phase::Roaming {
            return;
        }
        self.phase = Phase::Roaming;
        self.lighting = Phase::Roaming.lighting();
        self.targets = TargetRegistry::roaming();
        self.effects.clear();
        self.input.clear();
        self.party = PartyPose::staged(ROAM_STAGING);
        self.camera.begin_intro(
            self.clock,
            self.tuning.intro_secs,
            self.tuning.intro_start,
            self.party.position,
        );
        let modality = if self.host.touch_capable() {
            InputModality::Touch
        } else {
            InputModality::Keyboard
        };
        self.modality = Some(modality);
        self.ui.panel = Panel::RoamingHint(modality);
        self.exit_prompt_armed = true;
        self.hearts_poured = false;
        log::info!(
            "phase transition: surgery -> roaming ({} markers, {:?} input)",
            self.targets.len(),
            modality
        );
    }

    fn complete_roam_target(&mut self, id: TargetId) {
        let now = self.clock;
        let Some(target) = self.targets.complete(id) else {
            return;
        };
        let at = target.position.at(now) + Vec3::new(0.0, BURST_LIFT, 0.0);
        let (color, message, label) = (target.color, target.message, target.label);
        self.particles
            .spawn_burst(&mut self.rng, at, color, self.tuning.burst_count);
        self.ui.show_message(message, now, self.tuning.message_secs);
        log::debug!("{label} visited");
    }

    /// "Keep exploring": dismiss the exit prompt, leave the exit pending.
    pub fn choose_continue(&mut self) {
        if !self.alive || self.ui.panel != Panel::ExitPrompt {
            return;
        }
        let modality = self.modality.unwrap_or(InputModality::Keyboard);
        self.ui.panel = Panel::RoamingHint(modality);
    }

    /// "Leave": complete the exit and schedule teardown.
    pub fn choose_leave(&mut self) {
        if !self.alive || self.ui.panel != Panel::ExitPrompt {
            return;
        }
        let now = self.clock;
        let Some(exit) = self.targets.complete(EXIT_SPOT_ID) else {
            return;
        };
        let at = exit.position.at(now) + Vec3::new(0.0, BURST_LIFT, 0.0);
        let (color, message) = (exit.color, exit.message);
        self.particles
            .spawn_burst(&mut self.rng, at, color, self.tuning.burst_count);
        self.ui.panel = Panel::Farewell(message);
        self.ui.message = None;
        self.leaving = true;
        self.input.clear();
        self.timers
            .schedule(TimerEvent::ExitScene, now + self.tuning.exit_delay_secs);
        log::info!("exit confirmed; leaving in {}s", self.tuning.exit_delay_secs);
    }

    /// A tap on the canvas during roaming, in normalized device coordinates
    /// (`x` right, `z` carrying screen-up). Pushes the party that way for a
    /// moment.
    pub fn tap(&mut self, ndc: Vec2) {
        if !self.alive || self.phase != Phase::Roaming {
            return;
        }
        // screen up walks away from the camera
        let direction = Vec2::new(ndc.x, -ndc.z);
        self.input.tap(direction, self.tuning.tap_impulse_secs);
    }

    // ── Timers & lifecycle ──────────────────────────────────────────────

    fn fire_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::BeginRoaming => {
                if self.phase == Phase::Surgery && self.targets.all_completed() {
                    self.enter_roaming();
                }
            }
            TimerEvent::ExitScene => {
                if self.leaving {
                    self.teardown();
                    self.host.return_from_scene();
                }
            }
        }
    }

    /// Stop everything. Idempotent; later calls into the scene are no-ops.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.timers.cancel_all();
        self.effects.clear();
        self.particles.clear();
        self.targets.clear();
        self.input.clear();
        self.ui.clear();
        log::info!("ward scene torn down at t={:.2}s", self.clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Probe {
        touch: bool,
        returns: Arc<AtomicUsize>,
        asked: Arc<AtomicBool>,
    }

    impl SceneHost for Probe {
        fn touch_capable(&self) -> bool {
            self.asked.store(true, Ordering::SeqCst);
            self.touch
        }
        fn return_from_scene(&mut self) {
            self.returns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tuning() -> Tuning {
        Tuning {
            seed: Some(7),
            ..Tuning::default()
        }
    }

    fn scene() -> Scene {
        Scene::launch(tuning(), Box::new(Probe::default())).unwrap()
    }

    /// Side-on ray, from the target's own side of the body so no other
    /// spot is crossed first.
    fn ray_to(scene: &Scene, id: &str) -> Ray {
        let target = scene.targets().get(id).unwrap().position.at(scene.clock());
        let side = if target.x < 0.0 { -5.0 } else { 5.0 };
        let origin = target + Vec3::new(side, 0.0, 0.0);
        Ray::new(origin, target - origin)
    }

    #[test]
    fn launches_in_surgery() {
        let s = scene();
        assert!(s.is_alive());
        assert_eq!(s.phase(), Phase::Surgery);
        assert_eq!(s.lighting(), LightingProfile::SURGICAL);
        assert_eq!(s.ui().panel, Panel::SurgeryHint { done: 0, total: 4 });
    }

    #[test]
    fn invalid_tuning_refuses_launch() {
        let bad = Tuning {
            move_speed: -1.0,
            ..Tuning::default()
        };
        let err = Scene::launch(bad, Box::new(Probe::default())).unwrap_err();
        assert!(matches!(err, SceneError::InvalidTuning(ref v) if v.len() == 1));
    }

    #[test]
    fn heart_click_pulses_body_then_reverts() {
        let mut s = scene();
        let ray = ray_to(&s, "heart");
        assert_eq!(s.pointer_ray(&ray), Some("heart"));
        assert!(s.effects().is_active(EffectKind::BodyPulse));
        assert!(s.ui().message.is_some());
        for _ in 0..100 {
            s.update(1.0 / 60.0);
        }
        assert!(!s.effects().is_active(EffectKind::BodyPulse));
    }

    /// Straight down onto a spot; nothing else lies along the ray.
    fn ray_from_above(scene: &Scene, id: &str) -> Ray {
        let target = scene.targets().get(id).unwrap().position.at(scene.clock());
        Ray::new(target + Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn repeat_click_is_noop() {
        let mut s = scene();
        let ray = ray_from_above(&s, "arm");
        assert_eq!(s.pointer_ray(&ray), Some("arm"));
        assert_eq!(s.pointer_ray(&ray), None);
        assert_eq!(s.targets().completed_count(), 1);
        assert_eq!(s.ui().panel, Panel::SurgeryHint { done: 1, total: 4 });
    }

    #[test]
    fn completed_spot_lets_rays_through_to_pending_ones() {
        let mut s = scene();
        let side = ray_to(&s, "arm");
        assert_eq!(s.pointer_ray(&side), Some("arm"));
        // the same side ray grazes the heart once the arm is gone
        assert_eq!(s.pointer_ray(&side), Some("heart"));
        assert!(s.targets().get("arm").unwrap().is_completed());
        assert_eq!(s.targets().completed_count(), 2);
    }

    #[test]
    fn brain_click_sparks() {
        let mut s = scene();
        let ray = ray_to(&s, "brain");
        s.pointer_ray(&ray);
        assert_eq!(s.particles().len(), SPARK_COUNT as usize);
    }

    #[test]
    fn tap_ignored_during_surgery() {
        let mut s = scene();
        s.tap(Vec2::new(0.5, 0.5));
        s.update(0.1);
        assert_eq!(s.party().position, Vec2::ZERO);
    }

    #[test]
    fn sit_up_finishes_upright() {
        let mut s = scene();
        for id in ["heart", "brain", "arm", "eyes"] {
            let ray = ray_to(&s, id);
            s.pointer_ray(&ray);
        }
        assert_eq!(s.ui().panel, Panel::SurgeryComplete);
        for _ in 0..60 {
            s.update(1.0 / 60.0);
        }
        assert_eq!(s.party().patient.tilt, 0.0);
        assert_eq!(s.phase(), Phase::Surgery);
    }

    #[test]
    fn teardown_is_idempotent_and_silences_scene() {
        let returns = Arc::new(AtomicUsize::new(0));
        let host = Probe {
            returns: returns.clone(),
            ..Probe::default()
        };
        let mut s = Scene::launch(tuning(), Box::new(host)).unwrap();
        let ray = ray_to(&s, "brain");
        s.teardown();
        s.teardown();
        assert!(!s.is_alive());
        assert_eq!(s.pointer_ray(&ray), None);
        let clock = s.clock();
        s.update(1.0);
        assert_eq!(s.clock(), clock);
        assert_eq!(returns.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn companion_stays_on_floor() {
        let mut s = scene();
        for _ in 0..300 {
            s.update(0.1);
            let dog = s.companion_pose();
            assert!(s.floor().is_walkable(dog.position.x, dog.position.z));
        }
    }
}
