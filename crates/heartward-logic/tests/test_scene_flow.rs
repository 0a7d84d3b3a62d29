//! Integration tests for a full ward visit.
//!
//! Exercises: launch → surgery clicks → sit-up → roaming → proximity
//! interactions → exit prompt → teardown and return.
//!
//! All tests are pure logic — no window, no renderer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use heartward_logic::camera::CameraMode;
use heartward_logic::constants::{palette, EXIT_SPOT_ID, ROAM_STAGING};
use heartward_logic::effects::TimerEvent;
use heartward_logic::math::{Ray, Vec2, Vec3};
use heartward_logic::movement::HeldKeys;
use heartward_logic::particles::MAX_LIFE;
use heartward_logic::phase::{LightingProfile, Phase};
use heartward_logic::scene::{Scene, SceneHost};
use heartward_logic::tuning::Tuning;
use heartward_logic::ui::{InputModality, Panel};

const DT: f32 = 1.0 / 60.0;

// ── Helpers ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct TestHost {
    touch: bool,
    returns: Arc<AtomicUsize>,
    asked_touch: Arc<AtomicBool>,
}

impl SceneHost for TestHost {
    fn touch_capable(&self) -> bool {
        self.asked_touch.store(true, Ordering::SeqCst);
        self.touch
    }

    fn return_from_scene(&mut self) {
        self.returns.fetch_add(1, Ordering::SeqCst);
    }
}

fn tuning() -> Tuning {
    Tuning {
        seed: Some(42),
        ..Tuning::default()
    }
}

fn launch(host: &TestHost) -> Scene {
    Scene::launch(tuning(), Box::new(host.clone())).expect("default tuning is valid")
}

fn run(scene: &mut Scene, secs: f32) {
    let frames = (secs / DT).ceil() as usize;
    for _ in 0..frames {
        scene.update(DT);
    }
}

/// Side-on ray at a surgery spot, from the spot's own side of the body.
fn ray_at(scene: &Scene, id: &str) -> Ray {
    let target = scene
        .targets()
        .get(id)
        .expect("known spot")
        .position
        .at(scene.clock());
    let side = if target.x < 0.0 { -5.0 } else { 5.0 };
    let origin = target + Vec3::new(side, 0.0, 0.0);
    Ray::new(origin, target - origin)
}

fn repair(scene: &mut Scene, ids: &[&str]) {
    for id in ids {
        let ray = ray_at(scene, id);
        assert_eq!(scene.pointer_ray(&ray), Some(*id));
    }
}

fn enter_roaming(scene: &mut Scene) {
    repair(scene, &["heart", "brain", "arm", "eyes"]);
    run(scene, tuning().roam_delay_secs + 0.1);
    assert_eq!(scene.phase(), Phase::Roaming);
}

/// Steer with the joystick until `goal` is reached, the exit prompt opens,
/// or the frame budget runs out.
fn walk_to(scene: &mut Scene, goal: Vec2) {
    for _ in 0..1200 {
        let here = scene.party().position;
        if here.distance(goal) < 0.1 || scene.ui().panel == Panel::ExitPrompt {
            break;
        }
        scene
            .input_mut()
            .set_joystick((goal - here).normalize_or_zero());
        scene.update(DT);
    }
    scene.input_mut().release_joystick();
}

fn walk_path(scene: &mut Scene, path: &[Vec2]) {
    for &p in path {
        walk_to(scene, p);
    }
}

/// Staging → corridor → lounge → door.
fn walk_to_exit(scene: &mut Scene) {
    walk_path(
        scene,
        &[
            Vec2::new(0.0, 6.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 14.0),
            Vec2::new(0.0, 19.0),
        ],
    );
}

fn heart_particles(scene: &Scene) -> usize {
    scene
        .particles()
        .live()
        .iter()
        .filter(|p| p.color == palette::HEART)
        .count()
}

// ── Surgery phase ──────────────────────────────────────────────────────

#[test]
fn surgery_counter_tracks_repairs() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    repair(&mut scene, &["heart", "arm"]);
    assert_eq!(scene.ui().panel, Panel::SurgeryHint { done: 2, total: 4 });
    assert!(scene.ui().message.is_some());
}

#[test]
fn transition_waits_for_every_spot() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    repair(&mut scene, &["heart", "brain", "arm"]);
    run(&mut scene, 10.0);
    assert_eq!(scene.phase(), Phase::Surgery);
    assert!(!scene.timers().is_scheduled(TimerEvent::BeginRoaming));
}

#[test]
fn transition_waits_for_the_delay() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    repair(&mut scene, &["heart", "brain", "arm", "eyes"]);
    assert_eq!(scene.ui().panel, Panel::SurgeryComplete);

    run(&mut scene, 2.9);
    assert_eq!(scene.phase(), Phase::Surgery);
    assert!(!host.asked_touch.load(Ordering::SeqCst));

    run(&mut scene, 0.2);
    assert_eq!(scene.phase(), Phase::Roaming);
}

#[test]
fn roaming_entry_resets_the_scene() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    assert_eq!(scene.lighting(), LightingProfile::BRIGHT);
    assert!(matches!(scene.camera().mode, CameraMode::Intro(_)));
    assert_eq!(scene.party().position, ROAM_STAGING);
    assert_eq!(scene.targets().len(), 5);
    assert_eq!(scene.targets().completed_count(), 0);
    assert!(host.asked_touch.load(Ordering::SeqCst));
    assert_eq!(
        scene.ui().panel,
        Panel::RoamingHint(InputModality::Keyboard)
    );

    run(&mut scene, tuning().intro_secs + 0.1);
    assert_eq!(scene.camera().mode, CameraMode::Follow);
}

#[test]
fn touch_host_gets_joystick_hint() {
    let host = TestHost {
        touch: true,
        ..TestHost::default()
    };
    let mut scene = launch(&host);
    enter_roaming(&mut scene);
    assert_eq!(scene.modality(), Some(InputModality::Touch));
    assert!(scene.ui().panel.shows_joystick());
}

#[test]
fn clicks_ignored_while_roaming() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);
    let ray = Ray::new(Vec3::new(5.0, 1.1, -0.4), Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(scene.pointer_ray(&ray), None);
}

// ── Movement ───────────────────────────────────────────────────────────

#[test]
fn party_never_leaves_the_floor() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    let mut rng = StdRng::seed_from_u64(9);
    for frame in 0..4000 {
        if frame % 20 == 0 {
            scene.input_mut().set_keys(HeldKeys {
                up: rng.gen_bool(0.4),
                down: rng.gen_bool(0.4),
                left: rng.gen_bool(0.4),
                right: rng.gen_bool(0.4),
            });
            scene.input_mut().set_joystick(Vec2::new(
                rng.gen_range(-1.5..1.5),
                rng.gen_range(-1.5..1.5),
            ));
        }
        if frame % 37 == 0 {
            scene.tap(Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)));
        }
        if scene.ui().panel == Panel::ExitPrompt {
            scene.choose_continue();
        }
        scene.update(DT);
        let p = scene.party().position;
        assert!(
            scene.floor().contains(p),
            "frame {frame}: party left the floor at ({}, {})",
            p.x,
            p.z
        );
    }
}

#[test]
fn diagonal_into_wall_slides() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    scene.input_mut().set_keys(HeldKeys {
        left: true,
        ..HeldKeys::default()
    });
    run(&mut scene, 2.0);
    assert!(scene.party().position.x < -6.8);

    scene.input_mut().set_keys(HeldKeys {
        left: true,
        up: true,
        ..HeldKeys::default()
    });
    // a frame or two may still fit a full diagonal step before the wall
    run(&mut scene, 0.1);
    let at_wall = scene.party().position;
    run(&mut scene, 0.5);
    let slid = scene.party().position;
    assert_eq!(slid.x, at_wall.x);
    assert!(slid.z < at_wall.z - 1.0);
}

#[test]
fn tap_pushes_briefly() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    let start = scene.party().position;
    // tap toward the top of the screen
    scene.tap(Vec2::new(0.0, 1.0));
    run(&mut scene, 1.0);
    let end = scene.party().position;
    assert!(end.z < start.z);
    let pushed = start.distance(end);
    let max = tuning().move_speed * (tuning().tap_impulse_secs + 2.0 * DT);
    assert!(pushed <= max, "pushed {pushed} > {max}");
}

// ── Roaming interactions ───────────────────────────────────────────────

#[test]
fn roaming_spot_fires_once() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    walk_to(&mut scene, Vec2::new(-5.0, -4.0));
    assert!(scene.targets().get("vending").unwrap().is_completed());
    assert!(scene.targets().get("vending").unwrap().marker.is_none());
    assert!(scene.ui().message.is_some());
    assert_eq!(scene.particles().len(), tuning().burst_count as usize);

    // walk off, let everything settle, come back
    walk_to(&mut scene, Vec2::new(-2.0, 0.0));
    run(&mut scene, tuning().message_secs + 0.1);
    walk_to(&mut scene, Vec2::new(-5.0, -4.0));
    assert!(scene.ui().message.is_none());
    assert!(scene.particles().is_empty());
    assert_eq!(scene.targets().completed_count(), 1);
}

#[test]
fn burst_particles_drain() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    walk_to(&mut scene, Vec2::new(5.0, -4.0));
    assert!(!scene.particles().is_empty());
    run(&mut scene, MAX_LIFE + 2.0 * DT);
    assert!(scene.particles().is_empty());
}

#[test]
fn wandering_dachshund_can_be_caught() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);
    walk_path(&mut scene, &[Vec2::new(0.0, 10.0), Vec2::new(0.0, 13.0)]);

    for _ in 0..1200 {
        if scene.targets().get("dachshund").unwrap().is_completed() {
            break;
        }
        let dog = scene.companion_pose().position;
        let here = scene.party().position;
        scene
            .input_mut()
            .set_joystick((Vec2::new(dog.x, dog.z) - here).normalize_or_zero());
        scene.update(DT);
    }
    assert!(scene.targets().get("dachshund").unwrap().is_completed());
}

// ── Exit ───────────────────────────────────────────────────────────────

#[test]
fn hearts_pour_once_near_exit() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    walk_to_exit(&mut scene);
    assert!(scene.hearts_poured());
    assert_eq!(heart_particles(&scene), tuning().heart_burst_count as usize);

    scene.choose_continue();
    walk_to(&mut scene, Vec2::new(0.0, 14.0));
    run(&mut scene, MAX_LIFE + 0.1);
    assert_eq!(heart_particles(&scene), 0);

    walk_to(&mut scene, Vec2::new(0.0, 19.0));
    assert_eq!(heart_particles(&scene), 0);
}

#[test]
fn continue_keeps_exit_pending_and_rearms() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);

    walk_to_exit(&mut scene);
    assert_eq!(scene.ui().panel, Panel::ExitPrompt);

    // prompt freezes movement
    let frozen_at = scene.party().position;
    scene.input_mut().set_joystick(Vec2::new(1.0, 0.0));
    run(&mut scene, 0.5);
    scene.input_mut().release_joystick();
    assert_eq!(scene.party().position, frozen_at);

    scene.choose_continue();
    assert_eq!(
        scene.ui().panel,
        Panel::RoamingHint(InputModality::Keyboard)
    );
    assert!(!scene.targets().get(EXIT_SPOT_ID).unwrap().is_completed());

    // still standing in range: no immediate re-prompt
    run(&mut scene, 0.5);
    assert_ne!(scene.ui().panel, Panel::ExitPrompt);

    walk_to(&mut scene, Vec2::new(0.0, 14.0));
    walk_to(&mut scene, Vec2::new(0.0, 19.0));
    assert_eq!(scene.ui().panel, Panel::ExitPrompt);
    assert_eq!(host.returns.load(Ordering::SeqCst), 0);
}

#[test]
fn leave_returns_once_after_delay() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);
    walk_to_exit(&mut scene);

    scene.choose_leave();
    assert!(scene.is_leaving());
    assert!(matches!(scene.ui().panel, Panel::Farewell(_)));
    assert!(scene.targets().get(EXIT_SPOT_ID).unwrap().is_completed());
    assert!(scene.timers().is_scheduled(TimerEvent::ExitScene));

    let parked = scene.party().position;
    scene.input_mut().set_joystick(Vec2::new(0.0, -1.0));
    run(&mut scene, tuning().exit_delay_secs - 0.1);
    assert!(scene.is_alive());
    assert_eq!(scene.party().position, parked);
    assert_eq!(host.returns.load(Ordering::SeqCst), 0);

    run(&mut scene, 0.2);
    assert!(!scene.is_alive());
    assert_eq!(host.returns.load(Ordering::SeqCst), 1);

    run(&mut scene, 5.0);
    scene.choose_leave();
    assert_eq!(host.returns.load(Ordering::SeqCst), 1);
}

// ── Lifecycle ──────────────────────────────────────────────────────────

#[test]
fn teardown_cancels_pending_roaming() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    repair(&mut scene, &["heart", "brain", "arm", "eyes"]);
    assert!(scene.timers().is_scheduled(TimerEvent::BeginRoaming));

    scene.teardown();
    assert!(scene.timers().is_empty());
    assert!(scene.particles().is_empty());
    assert!(scene.targets().is_empty());

    run(&mut scene, 5.0);
    assert_eq!(scene.phase(), Phase::Surgery);
    assert!(!host.asked_touch.load(Ordering::SeqCst));
    assert_eq!(host.returns.load(Ordering::SeqCst), 0);
}

#[test]
fn teardown_cancels_pending_exit() {
    let host = TestHost::default();
    let mut scene = launch(&host);
    enter_roaming(&mut scene);
    walk_to_exit(&mut scene);
    scene.choose_leave();

    scene.teardown();
    run(&mut scene, 10.0);
    assert_eq!(host.returns.load(Ordering::SeqCst), 0);
}

#[test]
fn seeded_bursts_repeat() {
    let a_host = TestHost::default();
    let b_host = TestHost::default();
    let mut a = launch(&a_host);
    let mut b = launch(&b_host);
    for scene in [&mut a, &mut b] {
        let ray = ray_at(scene, "brain");
        scene.pointer_ray(&ray);
        run(scene, 0.5);
    }
    let pa: Vec<_> = a.particles().live().iter().map(|p| p.position).collect();
    let pb: Vec<_> = b.particles().live().iter().map(|p| p.position).collect();
    assert_eq!(pa, pb);
}
