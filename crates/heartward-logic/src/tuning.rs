//! Scene tunables — speeds, thresholds, delays, smoothing.
//!
//! Loaded from JSON (any subset of fields; the rest keep their defaults)
//! and validated before a scene is launched.
//!
//! ```
//! use heartward_logic::tuning::{validate_tuning, Tuning};
//!
//! let tuning = Tuning::from_json_str(r#"{ "move_speed": 6.0, "seed": 7 }"#).unwrap();
//! assert_eq!(tuning.move_speed, 6.0);
//! assert!(validate_tuning(&tuning).is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Party walking speed, world units per second.
    pub move_speed: f32,
    /// How long a single tap keeps pushing the party, seconds.
    pub tap_impulse_secs: f32,
    /// Roaming trigger distance from a target.
    pub proximity_radius: f32,
    /// Looser distance around the exit that pours hearts once.
    pub heart_pour_radius: f32,
    /// Pointer hit radius of a surgery spot.
    pub surgery_spot_radius: f32,
    /// Delay between the last surgery repair and roaming.
    pub roam_delay_secs: f32,
    /// Delay between confirming "leave" and teardown.
    pub exit_delay_secs: f32,
    /// Lifetime of a transient message.
    pub message_secs: f32,
    /// Patient sit-up animation length.
    pub sit_up_secs: f32,
    /// Camera intro pan length at roaming entry.
    pub intro_secs: f32,
    /// Per-frame follow smoothing on x and z.
    pub follow_smoothing: f32,
    /// Per-frame follow smoothing on y.
    pub follow_smoothing_vertical: f32,
    /// Follow camera offset from the party (behind and above).
    pub follow_offset: Vec3,
    /// Aerial start of the intro pan.
    pub intro_start: Vec3,
    /// Particles per interaction burst.
    pub burst_count: u32,
    /// Particles in the heart pour near the exit.
    pub heart_burst_count: u32,
    /// Fixed RNG seed for reproducible particle bursts.
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 4.8,
            tap_impulse_secs: 0.35,
            proximity_radius: 1.5,
            heart_pour_radius: 3.5,
            surgery_spot_radius: 0.22,
            roam_delay_secs: 3.0,
            exit_delay_secs: 4.0,
            message_secs: 4.0,
            sit_up_secs: 0.8,
            intro_secs: 2.5,
            follow_smoothing: 0.12,
            follow_smoothing_vertical: 0.05,
            follow_offset: Vec3::new(0.0, 7.0, 8.0),
            intro_start: Vec3::new(0.0, 16.0, 20.0),
            burst_count: 10,
            heart_burst_count: 12,
            seed: None,
        }
    }
}

impl Tuning {
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON could not be parsed into a `Tuning`.
    Parse(String),
    /// A duration, speed or radius that must be positive is not.
    NotPositive { field: &'static str, value: f32 },
    /// Smoothing factors must lie in (0, 1].
    SmoothingOutOfRange { field: &'static str, value: f32 },
    /// The heart pour ring must be wider than the trigger radius.
    HeartRadiusTooSmall { heart: f32, proximity: f32 },
    /// Bursts must spawn between 1 and 64 particles.
    BurstOutOfRange { field: &'static str, value: u32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "tuning JSON parse error: {msg}"),
            TuningError::NotPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            TuningError::SmoothingOutOfRange { field, value } => {
                write!(f, "{field} must be in (0, 1] (got {value})")
            }
            TuningError::HeartRadiusTooSmall { heart, proximity } => write!(
                f,
                "heart_pour_radius {heart} must exceed proximity_radius {proximity}"
            ),
            TuningError::BurstOutOfRange { field, value } => {
                write!(f, "{field} must be between 1 and 64 (got {value})")
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Validate tunables, returning every problem found.
pub fn validate_tuning(t: &Tuning) -> Vec<TuningError> {
    let mut errors = Vec::new();

    let positives = [
        ("move_speed", t.move_speed),
        ("tap_impulse_secs", t.tap_impulse_secs),
        ("proximity_radius", t.proximity_radius),
        ("heart_pour_radius", t.heart_pour_radius),
        ("surgery_spot_radius", t.surgery_spot_radius),
        ("roam_delay_secs", t.roam_delay_secs),
        ("exit_delay_secs", t.exit_delay_secs),
        ("message_secs", t.message_secs),
        ("sit_up_secs", t.sit_up_secs),
        ("intro_secs", t.intro_secs),
    ];
    for (field, value) in positives {
        // NaN fails this too
        if !(value > 0.0) {
            errors.push(TuningError::NotPositive { field, value });
        }
    }

    for (field, value) in [
        ("follow_smoothing", t.follow_smoothing),
        ("follow_smoothing_vertical", t.follow_smoothing_vertical),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            errors.push(TuningError::SmoothingOutOfRange { field, value });
        }
    }

    if t.heart_pour_radius <= t.proximity_radius {
        errors.push(TuningError::HeartRadiusTooSmall {
            heart: t.heart_pour_radius,
            proximity: t.proximity_radius,
        });
    }

    for (field, value) in [
        ("burst_count", t.burst_count),
        ("heart_burst_count", t.heart_burst_count),
    ] {
        if !(1..=64).contains(&value) {
            errors.push(TuningError::BurstOutOfRange { field, value });
        }
    }

    errors
}
