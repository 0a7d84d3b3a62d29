//! Party movement — intent sampling, wall-sliding, actor poses.
//!
//! Algorithm: "full move, then slide"
//! 1. Sum every input source into one intent vector for the frame
//! 2. Normalize and scale by speed × dt to get the candidate displacement
//! 3. Accept the full displacement if the destination is walkable
//! 4. Otherwise try X-only, then Z-only (wall slide)
//! 5. Otherwise stay put this frame

use std::f32::consts::FRAC_PI_2;

use crate::constants::{DOCTOR_OFFSET, PATIENT_TABLE_POSITION, TABLE_HEIGHT};
use crate::math::{Vec2, Vec3};
use crate::walkable::FloorMask;

const BOB_RATE: f32 = 10.0;
const BOB_HEIGHT: f32 = 0.1;
/// Phase lag of the doctor's bob behind the patient's, radians.
const DOCTOR_BOB_LAG: f32 = 1.0;

/// Doctor's stand during surgery, beside the table.
const DOCTOR_SURGERY_SPOT: Vec3 = Vec3::new(1.5, 0.0, 1.0);

/// Held direction keys (WASD and arrows collapse onto these).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// "Up" walks away from the camera (toward -z).
    pub fn vector(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.up {
            v.z -= 1.0;
        }
        if self.down {
            v.z += 1.0;
        }
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        v
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TapImpulse {
    direction: Vec2,
    remaining: f32,
}

/// Every movement input device, unified behind one intent vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentSources {
    keys: HeldKeys,
    joystick: Vec2,
    tap: Option<TapImpulse>,
}

impl IntentSources {
    pub fn set_keys(&mut self, keys: HeldKeys) {
        self.keys = keys;
    }

    /// Joystick deflection; anything past the rim counts as full deflection.
    pub fn set_joystick(&mut self, deflection: Vec2) {
        self.joystick = deflection.clamp_length_one();
    }

    pub fn release_joystick(&mut self) {
        self.joystick = Vec2::ZERO;
    }

    /// A one-shot push in `direction` lasting `duration` seconds. A new tap
    /// replaces any impulse still in flight.
    pub fn tap(&mut self, direction: Vec2, duration: f32) {
        let direction = direction.normalize_or_zero();
        if direction.is_zero() || duration <= 0.0 {
            return;
        }
        self.tap = Some(TapImpulse {
            direction,
            remaining: duration,
        });
    }

    /// Current intent for this frame. Consumes `dt` of any tap impulse.
    pub fn sample(&mut self, dt: f32) -> Vec2 {
        let mut intent = self.keys.vector() + self.joystick;
        if let Some(tap) = self.tap.as_mut() {
            intent += tap.direction;
            tap.remaining -= dt;
            if tap.remaining <= 0.0 {
                self.tap = None;
            }
        }
        intent
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Full displacement accepted.
    Moved(Vec2),
    /// Diagonal blocked; one axis accepted.
    Slid(Vec2),
    /// Nothing walkable; position unchanged.
    Blocked(Vec2),
    /// No intent this frame.
    Idle(Vec2),
}

impl MoveOutcome {
    pub fn position(&self) -> Vec2 {
        match *self {
            MoveOutcome::Moved(p)
            | MoveOutcome::Slid(p)
            | MoveOutcome::Blocked(p)
            | MoveOutcome::Idle(p) => p,
        }
    }

    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved(_) | MoveOutcome::Slid(_))
    }
}

/// Resolve a displacement against the floor mask, sliding along walls.
pub fn resolve_move(mask: &FloorMask, from: Vec2, delta: Vec2) -> MoveOutcome {
    if delta.is_zero() {
        return MoveOutcome::Idle(from);
    }
    let full = from + delta;
    if mask.contains(full) {
        return MoveOutcome::Moved(full);
    }
    // X first, then Z.
    let x_only = Vec2::new(from.x + delta.x, from.z);
    if delta.x != 0.0 && mask.contains(x_only) {
        return MoveOutcome::Slid(x_only);
    }
    let z_only = Vec2::new(from.x, from.z + delta.z);
    if delta.z != 0.0 && mask.contains(z_only) {
        return MoveOutcome::Slid(z_only);
    }
    MoveOutcome::Blocked(from)
}

/// Placement of one figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    pub position: Vec3,
    /// Rotation about y.
    pub yaw: f32,
    /// Rotation about x; -π/2 is lying on the back.
    pub tilt: f32,
}

impl ActorPose {
    pub fn standing(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            tilt: 0.0,
        }
    }
}

/// The patient and doctor move as a rigid pair around one party position.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyPose {
    pub position: Vec2,
    pub facing: f32,
    pub moving: bool,
    pub patient: ActorPose,
    pub doctor: ActorPose,
}

impl PartyPose {
    /// Patient lying on the operating table, doctor beside it.
    pub fn on_table() -> Self {
        Self {
            position: Vec2::ZERO,
            facing: 0.0,
            moving: false,
            patient: ActorPose {
                position: PATIENT_TABLE_POSITION,
                yaw: 0.0,
                tilt: -FRAC_PI_2,
            },
            doctor: ActorPose::standing(DOCTOR_SURGERY_SPOT),
        }
    }

    /// Both figures upright at a shared floor position.
    pub fn staged(at: Vec2) -> Self {
        let mut pose = Self {
            position: at,
            facing: 0.0,
            moving: false,
            patient: ActorPose::standing(at.with_y(0.0)),
            doctor: ActorPose::standing((at + DOCTOR_OFFSET).with_y(0.0)),
        };
        pose.place_actors(0.0);
        pose
    }

    /// Sit the patient up from the table; `progress` is already eased.
    pub fn sit_up(&mut self, progress: f32) {
        let p = progress.clamp(0.0, 1.0);
        self.patient.tilt = -FRAC_PI_2 * (1.0 - p);
        self.patient.position.y = TABLE_HEIGHT * (1.0 - p);
    }

    /// Advance one frame of walking. `step` is speed × dt.
    pub fn walk(&mut self, mask: &FloorMask, intent: Vec2, step: f32, time: f32) -> MoveOutcome {
        let dir = intent.normalize_or_zero();
        let outcome = resolve_move(mask, self.position, dir * step);
        self.position = outcome.position();
        self.moving = outcome.moved();
        if !dir.is_zero() {
            self.facing = dir.x.atan2(dir.z);
        }
        self.place_actors(time);
        outcome
    }

    fn place_actors(&mut self, time: f32) {
        let (patient_bob, doctor_bob) = if self.moving {
            (
                (time * BOB_RATE).sin().abs() * BOB_HEIGHT,
                (time * BOB_RATE + DOCTOR_BOB_LAG).sin().abs() * BOB_HEIGHT,
            )
        } else {
            (0.0, 0.0)
        };
        self.patient = ActorPose {
            position: self.position.with_y(patient_bob),
            yaw: self.facing,
            tilt: 0.0,
        };
        self.doctor = ActorPose {
            position: (self.position + DOCTOR_OFFSET).with_y(doctor_bob),
            yaw: self.facing,
            tilt: 0.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walkable::WalkableRegion;

    fn square() -> FloorMask {
        FloorMask::new(vec![WalkableRegion::new(-5.0, 5.0, -5.0, 5.0)])
    }

    // --- Intent sampling ---

    #[test]
    fn keys_sum_to_diagonal() {
        let mut src = IntentSources::default();
        src.set_keys(HeldKeys {
            up: true,
            right: true,
            ..HeldKeys::default()
        });
        assert_eq!(src.sample(0.016), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut src = IntentSources::default();
        src.set_keys(HeldKeys {
            left: true,
            right: true,
            ..HeldKeys::default()
        });
        assert!(src.sample(0.016).is_zero());
    }

    #[test]
    fn joystick_clamped_to_unit() {
        let mut src = IntentSources::default();
        src.set_joystick(Vec2::new(3.0, 4.0));
        let v = src.sample(0.016);
        assert!((v.length() - 1.0).abs() < 1e-6);
        src.release_joystick();
        assert!(src.sample(0.016).is_zero());
    }

    #[test]
    fn tap_is_one_shot() {
        let mut src = IntentSources::default();
        src.tap(Vec2::new(0.0, 2.0), 0.05);
        assert_eq!(src.sample(0.03), Vec2::new(0.0, 1.0));
        assert_eq!(src.sample(0.03), Vec2::new(0.0, 1.0));
        assert!(src.sample(0.03).is_zero());
    }

    #[test]
    fn zero_tap_ignored() {
        let mut src = IntentSources::default();
        src.tap(Vec2::ZERO, 1.0);
        assert!(src.sample(0.1).is_zero());
    }

    // --- Wall sliding ---

    #[test]
    fn free_move_inside() {
        let res = resolve_move(&square(), Vec2::ZERO, Vec2::new(1.0, 0.5));
        assert_eq!(res, MoveOutcome::Moved(Vec2::new(1.0, 0.5)));
    }

    #[test]
    fn diagonal_into_east_wall_slides_on_z() {
        let res = resolve_move(&square(), Vec2::new(4.9, 0.0), Vec2::new(0.5, 0.5));
        assert_eq!(res, MoveOutcome::Slid(Vec2::new(4.9, 0.5)));
    }

    #[test]
    fn diagonal_into_north_wall_slides_on_x() {
        let res = resolve_move(&square(), Vec2::new(0.0, -4.9), Vec2::new(0.5, -0.5));
        assert_eq!(res, MoveOutcome::Slid(Vec2::new(0.5, -4.9)));
    }

    #[test]
    fn corner_blocks_both_axes() {
        let res = resolve_move(&square(), Vec2::new(4.9, 4.9), Vec2::new(0.5, 0.5));
        assert_eq!(res, MoveOutcome::Blocked(Vec2::new(4.9, 4.9)));
    }

    #[test]
    fn straight_into_wall_is_blocked() {
        let res = resolve_move(&square(), Vec2::new(4.9, 0.0), Vec2::new(0.5, 0.0));
        assert_eq!(res, MoveOutcome::Blocked(Vec2::new(4.9, 0.0)));
    }

    #[test]
    fn x_wins_when_both_axes_free() {
        // L-shaped floor: both single-axis moves land on floor, the diagonal doesn't.
        let mask = FloorMask::new(vec![
            WalkableRegion::new(0.0, 2.0, 0.0, 1.0),
            WalkableRegion::new(0.0, 1.0, 0.0, 2.0),
        ]);
        let res = resolve_move(&mask, Vec2::new(0.9, 0.9), Vec2::new(0.5, 0.5));
        assert_eq!(res, MoveOutcome::Slid(Vec2::new(1.4, 0.9)));
    }

    // --- Party pose ---

    #[test]
    fn walk_normalizes_diagonal_speed() {
        let mut party = PartyPose::staged(Vec2::ZERO);
        party.walk(&square(), Vec2::new(1.0, 1.0), 1.0, 0.0);
        assert!((party.position.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn walk_faces_intent() {
        let mut party = PartyPose::staged(Vec2::ZERO);
        party.walk(&square(), Vec2::new(1.0, 0.0), 0.1, 0.0);
        assert!((party.facing - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(party.patient.yaw, party.doctor.yaw);
    }

    #[test]
    fn doctor_keeps_offset() {
        let mut party = PartyPose::staged(Vec2::ZERO);
        party.walk(&square(), Vec2::new(0.0, 1.0), 0.5, 0.3);
        let dx = party.doctor.position.x - party.patient.position.x;
        let dz = party.doctor.position.z - party.patient.position.z;
        assert!((dx - DOCTOR_OFFSET.x).abs() < 1e-5);
        assert!((dz - DOCTOR_OFFSET.z).abs() < 1e-5);
    }

    #[test]
    fn bob_only_while_moving() {
        let mut party = PartyPose::staged(Vec2::ZERO);
        party.walk(&square(), Vec2::new(0.0, 1.0), 0.1, 0.2);
        assert!(party.moving);
        assert!(party.patient.position.y > 0.0);
        party.walk(&square(), Vec2::ZERO, 0.1, 0.3);
        assert!(!party.moving);
        assert_eq!(party.patient.position.y, 0.0);
        assert_eq!(party.doctor.position.y, 0.0);
    }

    #[test]
    fn sit_up_goes_from_lying_to_floor() {
        let mut party = PartyPose::on_table();
        assert!((party.patient.tilt + FRAC_PI_2).abs() < 1e-6);
        party.sit_up(1.0);
        assert_eq!(party.patient.tilt, 0.0);
        assert_eq!(party.patient.position.y, 0.0);
    }
}
