//! Heartward Headless Play-through Harness
//!
//! Drives complete ward visits through the pure scene logic and checks the
//! tuning data the client ships with. Runs entirely in-process: no window,
//! no GPU, no input devices.
//!
//! Usage:
//!   cargo run -p heartward-simtest
//!   cargo run -p heartward-simtest -- --verbose
//!   cargo run -p heartward-simtest -- --soak 50

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use heartward_logic::constants::{
    surgery_spot_world, ROAM_SPOTS, ROAM_STAGING, SURGERY_CAMERA_POSITION, SURGERY_SPOTS,
    WARD_REGIONS,
};
use heartward_logic::interaction::TargetPosition;
use heartward_logic::math::{Ray, Vec2, Vec3};
use heartward_logic::movement::HeldKeys;
use heartward_logic::phase::Phase;
use heartward_logic::scene::{Scene, SceneHost};
use heartward_logic::tuning::{validate_tuning, Tuning};
use heartward_logic::ui::Panel;
use heartward_logic::walkable::FloorMask;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Tuning (same JSON the client loads) ─────────────────────────────────
const TUNING_JSON: &str = include_str!("../../../data/tuning.json");

const DT: f32 = 1.0 / 60.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Clone, Default)]
struct SimHost {
    returns: Arc<AtomicUsize>,
}

impl SceneHost for SimHost {
    fn touch_capable(&self) -> bool {
        false
    }

    fn return_from_scene(&mut self) {
        self.returns.fetch_add(1, Ordering::SeqCst);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let soak_runs = args
        .iter()
        .position(|a| a == "--soak")
        .and_then(|i| args.get(i + 1))
        .and_then(|n| n.parse().ok())
        .unwrap_or(10);
    println!("=== Heartward Play-through Harness ===\n");

    let mut results = Vec::new();

    // 1. Tuning data
    let tuning = match load_tuning(&mut results) {
        Some(t) => t,
        None => {
            report(&results, verbose);
            return;
        }
    };

    // 2. Ward layout
    results.extend(validate_layout(verbose));

    // 3. Surgery phase from the fixed camera
    results.extend(validate_surgery(&tuning, verbose));

    // 4. Full scripted tour
    results.extend(validate_tour(&tuning, verbose));

    // 5. Random input soak
    results.extend(validate_soak(&tuning, soak_runs, verbose));

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Driving helpers ─────────────────────────────────────────────────────

fn launch(tuning: &Tuning, host: &SimHost) -> Option<Scene> {
    Scene::launch(tuning.clone(), Box::new(host.clone())).ok()
}

fn run(scene: &mut Scene, secs: f32) {
    let frames = (secs / DT).ceil() as usize;
    for _ in 0..frames {
        scene.update(DT);
    }
}

/// Aim from the surgery camera; if a nearer spot is in the way the click
/// lands on that one instead, just like a real player.
fn camera_ray(target: Vec3) -> Ray {
    Ray::new(SURGERY_CAMERA_POSITION, target - SURGERY_CAMERA_POSITION)
}

/// Click every pending spot until none remain. Returns clicks used.
fn clear_surgery(scene: &mut Scene) -> usize {
    let mut clicks = 0;
    while clicks < 16 {
        let next = scene
            .targets()
            .pending()
            .next()
            .map(|t| t.position.at(scene.clock()));
        let Some(target) = next else { break };
        scene.pointer_ray(&camera_ray(target));
        clicks += 1;
    }
    clicks
}

/// Joystick steering toward a floor point. Returns frames spent.
fn steer_to(scene: &mut Scene, goal: Vec2) -> usize {
    let mut frames = 0;
    while frames < 1500 {
        let here = scene.party().position;
        if here.distance(goal) < 0.1 || scene.ui().panel == Panel::ExitPrompt {
            break;
        }
        scene
            .input_mut()
            .set_joystick((goal - here).normalize_or_zero());
        scene.update(DT);
        frames += 1;
    }
    scene.input_mut().release_joystick();
    frames
}

// ── 1. Tuning ───────────────────────────────────────────────────────────

fn load_tuning(results: &mut Vec<TestResult>) -> Option<Tuning> {
    println!("--- Tuning ---");
    let tuning = match Tuning::from_json_str(TUNING_JSON) {
        Ok(t) => t,
        Err(e) => {
            results.push(TestResult {
                name: "tuning_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            return None;
        }
    };

    let errors = validate_tuning(&tuning);
    results.push(TestResult {
        name: "tuning_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "all tunables in range".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    // Every field spelled out, so the file documents the full surface
    let missing: Vec<String> = match (
        serde_json::to_value(Tuning::default()),
        serde_json::from_str::<serde_json::Value>(TUNING_JSON),
    ) {
        (Ok(serde_json::Value::Object(all)), Ok(serde_json::Value::Object(file))) => all
            .keys()
            .filter(|k| !file.contains_key(*k))
            .cloned()
            .collect(),
        _ => vec!["<not an object>".into()],
    };
    results.push(TestResult {
        name: "tuning_file_complete".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            "every tunable present".into()
        } else {
            format!("missing: {}", missing.join(", "))
        },
    });

    Some(tuning)
}

// ── 2. Layout ───────────────────────────────────────────────────────────

fn validate_layout(verbose: bool) -> Vec<TestResult> {
    println!("--- Ward Layout ---");
    let mut results = Vec::new();
    let floor = FloorMask::new(WARD_REGIONS);

    results.push(TestResult {
        name: "staging_walkable".into(),
        passed: floor.contains(ROAM_STAGING),
        detail: format!("staging at ({}, {})", ROAM_STAGING.x, ROAM_STAGING.z),
    });

    // Sample a whole wander loop for moving targets
    let mut unreachable = Vec::new();
    for spot in &ROAM_SPOTS {
        let position = TargetPosition::from_anchor(spot.anchor);
        let samples = if position.is_dynamic() { 400 } else { 1 };
        let ok = (0..samples).all(|i| {
            let p = position.at(i as f32 * 0.05).floor();
            floor.contains(p)
        });
        if !ok {
            unreachable.push(spot.id);
        }
    }
    results.push(TestResult {
        name: "roam_spots_on_floor".into(),
        passed: unreachable.is_empty(),
        detail: if unreachable.is_empty() {
            format!("{} spots on walkable floor", ROAM_SPOTS.len())
        } else {
            format!("off floor: {:?}", unreachable)
        },
    });

    // Rooms join up: a straight walk down the centre line never leaves the floor
    let gap = (0..=260)
        .map(|i| Vec2::new(0.0, -6.0 + i as f32 * 0.1))
        .find(|p| !floor.contains(*p));
    results.push(TestResult {
        name: "rooms_connected".into(),
        passed: gap.is_none(),
        detail: match gap {
            None => "theatre → corridor → lounge continuous".into(),
            Some(p) => format!("gap at z={:.1}", p.z),
        },
    });

    let low = SURGERY_SPOTS
        .iter()
        .map(|s| surgery_spot_world(s.offset))
        .filter(|p| p.y <= 0.0)
        .count();
    results.push(TestResult {
        name: "surgery_spots_above_floor".into(),
        passed: low == 0,
        detail: format!("{} spots", SURGERY_SPOTS.len()),
    });

    if verbose {
        for (i, r) in floor.regions().iter().enumerate() {
            println!(
                "  region {}: {:.1} x {:.1} at ({:.1}, {:.1})",
                i,
                r.width(),
                r.depth(),
                r.center().x,
                r.center().z
            );
        }
    }

    results
}

// ── 3. Surgery ──────────────────────────────────────────────────────────

fn validate_surgery(tuning: &Tuning, _verbose: bool) -> Vec<TestResult> {
    println!("--- Surgery ---");
    let mut results = Vec::new();
    let host = SimHost::default();
    let Some(mut scene) = launch(tuning, &host) else {
        results.push(TestResult {
            name: "surgery_launch".into(),
            passed: false,
            detail: "scene refused tuning".into(),
        });
        return results;
    };

    let clicks = clear_surgery(&mut scene);
    results.push(TestResult {
        name: "surgery_clickable_from_camera".into(),
        passed: scene.targets().all_completed(),
        detail: format!(
            "{}/{} repaired in {} clicks",
            scene.targets().completed_count(),
            scene.targets().len(),
            clicks
        ),
    });

    run(&mut scene, tuning.roam_delay_secs * 0.9);
    let early = scene.phase();
    run(&mut scene, tuning.roam_delay_secs * 0.2);
    results.push(TestResult {
        name: "surgery_transition_timing".into(),
        passed: early == Phase::Surgery && scene.phase() == Phase::Roaming,
        detail: format!("{} then {}", early.name(), scene.phase().name()),
    });

    results
}

// ── 4. Scripted tour ────────────────────────────────────────────────────

fn validate_tour(tuning: &Tuning, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Tour ---");
    let mut results = Vec::new();
    let host = SimHost::default();
    let Some(mut scene) = launch(tuning, &host) else {
        results.push(TestResult {
            name: "tour_launch".into(),
            passed: false,
            detail: "scene refused tuning".into(),
        });
        return results;
    };
    clear_surgery(&mut scene);
    run(&mut scene, tuning.roam_delay_secs + 0.1);

    let theatre = [
        Vec2::new(-5.0, -4.0),
        Vec2::new(5.0, -4.0),
        Vec2::new(-4.0, 3.0),
        Vec2::new(0.0, 6.0),
        Vec2::new(0.0, 10.0),
        Vec2::new(0.0, 13.0),
    ];
    let mut frames = 0;
    for p in theatre {
        frames += steer_to(&mut scene, p);
    }

    // chase the dachshund
    while frames < 20_000 {
        if scene
            .targets()
            .get("dachshund")
            .is_some_and(|t| t.is_completed())
        {
            break;
        }
        let dog = scene.companion_pose().position;
        let here = scene.party().position;
        scene
            .input_mut()
            .set_joystick((Vec2::new(dog.x, dog.z) - here).normalize_or_zero());
        scene.update(DT);
        frames += 1;
    }
    scene.input_mut().release_joystick();

    let visited = scene.targets().completed_count();
    results.push(TestResult {
        name: "tour_visits_every_spot".into(),
        passed: visited == scene.targets().len() - 1,
        detail: format!("{} spots visited in {:.1}s", visited, frames as f32 * DT),
    });

    frames += steer_to(&mut scene, Vec2::new(0.0, 19.0));
    let prompted = scene.ui().panel == Panel::ExitPrompt;
    results.push(TestResult {
        name: "tour_exit_prompt".into(),
        passed: prompted && scene.hearts_poured(),
        detail: format!("prompt={} hearts={}", prompted, scene.hearts_poured()),
    });

    scene.choose_leave();
    run(&mut scene, tuning.exit_delay_secs + 0.1);
    let returns = host.returns.load(Ordering::SeqCst);
    results.push(TestResult {
        name: "tour_returns_once".into(),
        passed: !scene.is_alive() && returns == 1,
        detail: format!("alive={} returns={}", scene.is_alive(), returns),
    });

    if verbose {
        println!("  tour finished at t={:.1}s", scene.clock());
    }
    results
}

// ── 5. Soak ─────────────────────────────────────────────────────────────

fn validate_soak(tuning: &Tuning, runs: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Soak ({} runs) ---", runs);
    let mut results = Vec::new();
    let mut escapes = 0;
    let mut returns_total = 0;

    for seed in 0..runs {
        let host = SimHost::default();
        let tuning = Tuning {
            seed: Some(seed),
            ..tuning.clone()
        };
        let Some(mut scene) = launch(&tuning, &host) else {
            continue;
        };
        clear_surgery(&mut scene);
        run(&mut scene, tuning.roam_delay_secs + 0.1);

        let mut rng = StdRng::seed_from_u64(seed);
        for frame in 0..3600 {
            if !scene.is_alive() {
                break;
            }
            if frame % 15 == 0 {
                scene.input_mut().set_keys(HeldKeys {
                    up: rng.gen_bool(0.5),
                    down: rng.gen_bool(0.3),
                    left: rng.gen_bool(0.4),
                    right: rng.gen_bool(0.4),
                });
            }
            if frame % 40 == 0 {
                scene.tap(Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)));
            }
            if scene.ui().panel == Panel::ExitPrompt {
                if rng.gen_bool(0.5) {
                    scene.choose_leave();
                } else {
                    scene.choose_continue();
                }
            }
            scene.update(DT);
            if scene.is_alive() && !scene.floor().contains(scene.party().position) {
                escapes += 1;
            }
        }
        let returns = host.returns.load(Ordering::SeqCst);
        returns_total += returns;
        if verbose {
            println!(
                "  seed {}: {} visited, returns={}",
                seed,
                scene.targets().completed_count(),
                returns
            );
        }
        if returns > 1 {
            escapes += 1;
        }
    }

    results.push(TestResult {
        name: "soak_stays_on_floor".into(),
        passed: escapes == 0,
        detail: format!(
            "{} runs, {} violations, {} exits taken",
            runs, escapes, returns_total
        ),
    });
    results
}
