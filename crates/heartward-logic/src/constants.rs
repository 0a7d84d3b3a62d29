//! Scene content — palette, ward layout, and the interaction target tables.
//!
//! Colours are `0xRRGGBB` so the client can convert them to whatever its
//! renderer expects.

use crate::math::{Vec2, Vec3};
use crate::walkable::WalkableRegion;

pub mod palette {
    pub const BACKGROUND: u32 = 0x111118;
    pub const FLOOR: u32 = 0x2a2a3a;
    pub const WALL: u32 = 0x1e1e2e;
    pub const TABLE: u32 = 0x444466;
    pub const PATIENT_BODY: u32 = 0x8899aa;
    pub const PATIENT_EYE: u32 = 0x44aaff;
    pub const PATIENT_ANTENNA: u32 = 0xff6644;
    pub const DOCTOR_COAT: u32 = 0xeeeeee;
    pub const DOCTOR_SKIN: u32 = 0xe8b89d;
    pub const DOCTOR_CROSS: u32 = 0xff3333;
    pub const DOCTOR_TROUSERS: u32 = 0x333344;
    pub const DOG_COAT: u32 = 0x8b4a22;
    pub const DOG_EAR: u32 = 0x5a2e14;
    pub const LIGHT_GLOW: u32 = 0xffffcc;
    pub const GLOW_SPOT: u32 = 0x00ffaa;
    pub const VENDING: u32 = 0x33aa66;
    pub const WINDOW: u32 = 0x4488cc;
    pub const DESK: u32 = 0xcc8844;
    pub const DOG_MARKER: u32 = 0xffaa33;
    pub const DOOR: u32 = 0x66cc44;
    pub const HEART: u32 = 0xff4477;

    // Timed effect colours
    pub const PULSE_RED: u32 = 0xff4466;
    pub const SPARKLE_YELLOW: u32 = 0xffff00;
    pub const EYE_GLOW: u32 = 0xffffff;
}

/// Patient's resting height on the operating table.
pub const TABLE_HEIGHT: f32 = 0.8;

/// Patient root while lying on the table: feet toward the camera, head
/// toward -z, body centred over the table top.
pub const PATIENT_TABLE_POSITION: Vec3 = Vec3::new(0.0, TABLE_HEIGHT, 0.8);

/// Where the party is staged when roaming begins.
pub const ROAM_STAGING: Vec2 = Vec2::new(0.0, 2.0);

/// Doctor's offset from the patient within the party.
pub const DOCTOR_OFFSET: Vec2 = Vec2::new(0.8, 0.0);

/// Fixed surgery-phase camera framing of the operating table.
pub const SURGERY_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 6.0, 8.0);
pub const SURGERY_CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Operating theatre, connecting corridor, lounge.
pub const WARD_REGIONS: [WalkableRegion; 3] = [
    WalkableRegion::new(-7.0, 7.0, -6.0, 7.0),
    WalkableRegion::new(-1.2, 1.2, 7.0, 12.0),
    WalkableRegion::new(-6.0, 6.0, 12.0, 20.0),
];

/// What a surgery spot does to the patient when repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurgeryOrgan {
    Heart,
    Brain,
    Arm,
    Eyes,
}

pub struct SurgerySpot {
    pub id: &'static str,
    pub organ: SurgeryOrgan,
    pub label: &'static str,
    /// Offset in the patient's standing frame (y up the body, z out of the chest).
    pub offset: Vec3,
    pub message: &'static str,
}

pub const SURGERY_SPOTS: [SurgerySpot; 4] = [
    SurgerySpot {
        id: "heart",
        organ: SurgeryOrgan::Heart,
        label: "Heart (chest)",
        offset: Vec3::new(0.0, 1.2, 0.35),
        message: "Love module installed. Warning: capacity infinite. Side effect: wanting to be near you always.",
    },
    SurgerySpot {
        id: "brain",
        organ: SurgeryOrgan::Brain,
        label: "Brain (head)",
        offset: Vec3::new(0.0, 2.1, 0.3),
        message: "Uploading: every trip, every late dinner, every inside joke. Storage: full.",
    },
    SurgerySpot {
        id: "arm",
        organ: SurgeryOrgan::Arm,
        label: "Arm (left)",
        offset: Vec3::new(-0.7, 1.0, 0.3),
        message: "Hug pressure calibrated to: never letting go.",
    },
    SurgerySpot {
        id: "eyes",
        organ: SurgeryOrgan::Eyes,
        label: "Eyes (face)",
        offset: Vec3::new(0.0, 1.9, 0.5),
        message: "Visual target locked: only you. Scan complete — you're glowing. Literally.",
    },
];

/// World position of a surgery spot while the patient lies on the table.
///
/// Lying rotates the body -90° about x: local y runs toward -z, local z
/// points up.
pub fn surgery_spot_world(offset: Vec3) -> Vec3 {
    let root = PATIENT_TABLE_POSITION;
    Vec3::new(root.x + offset.x, root.y + offset.z, root.z - offset.y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoamAnchor {
    Fixed(Vec2),
    /// Elliptical wander: center, radii, angular speed (rad/s).
    Wander {
        center: Vec2,
        radii: Vec2,
        speed: f32,
    },
}

pub struct RoamSpot {
    pub id: &'static str,
    pub label: &'static str,
    pub anchor: RoamAnchor,
    pub color: u32,
    pub message: &'static str,
    pub is_exit: bool,
}

pub const EXIT_SPOT_ID: &str = "door";

/// The dachshund's loop around the lounge.
pub const DACHSHUND_WANDER: RoamAnchor = RoamAnchor::Wander {
    center: Vec2::new(3.0, 16.0),
    radii: Vec2::new(2.0, 1.5),
    speed: 0.5,
};

pub const ROAM_SPOTS: [RoamSpot; 5] = [
    RoamSpot {
        id: "vending",
        label: "Vending Machine",
        anchor: RoamAnchor::Fixed(Vec2::new(-5.0, -4.0)),
        color: palette::VENDING,
        message: "It dispensed a spicy tuna roll. Of course it did. Everything reminds me of you.",
        is_exit: false,
    },
    RoamSpot {
        id: "window",
        label: "Window",
        anchor: RoamAnchor::Fixed(Vec2::new(5.0, -4.0)),
        color: palette::WINDOW,
        message: "Remember paragliding over the lakes? Every adventure is better with you next to me.",
        is_exit: false,
    },
    RoamSpot {
        id: "desk",
        label: "Nurses' Station",
        anchor: RoamAnchor::Fixed(Vec2::new(-4.0, 3.0)),
        color: palette::DESK,
        message: "Patient chart reads: 'Prognosis — happily ever after.'",
        is_exit: false,
    },
    RoamSpot {
        id: "dachshund",
        label: "Dachshund",
        anchor: DACHSHUND_WANDER,
        color: palette::DOG_MARKER,
        message: "Secondary directive complete: dachshund acquired. He has already claimed the couch.",
        is_exit: false,
    },
    RoamSpot {
        id: EXIT_SPOT_ID,
        label: "Exit",
        anchor: RoamAnchor::Fixed(Vec2::new(0.0, 19.0)),
        color: palette::DOOR,
        message: "Happy Valentine's Day.",
        is_exit: true,
    },
];

pub const SURGERY_COMPLETE_TEXT: &str =
    "System fully operational. Primary directive: love you. Secondary directive: get a dachshund.";

pub const SURGERY_HINT_TEXT: &str = "Click the glowing spots on the patient to repair him";

pub const KEYBOARD_HINT_TEXT: &str =
    "WASD or arrow keys to move. Walk to the glowing spots to interact.";

pub const TOUCH_HINT_TEXT: &str =
    "Drag the joystick or tap to walk. Walk to the glowing spots to interact.";

pub const EXIT_PROMPT_TEXT: &str = "Ready to leave the hospital?";
