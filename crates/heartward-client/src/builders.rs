//! Geometry builders — actors, markers and the ward itself.
//!
//! Every builder spawns a fresh hierarchy at the local origin and hands back
//! a struct of the entities and materials that get mutated later, so nothing
//! is ever looked up by name. Each call allocates its own materials; two
//! patients never share a tint.
//!
//! Static decor is data: the wall and prop tables below are plain primitive
//! specs, turned into meshes by [`build_ward`].

use bevy::prelude::*;
use heartward_logic::constants::{palette, WARD_REGIONS};

use crate::state::VignetteOwned;

pub fn color(hex: u32) -> Color {
    Color::srgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Block(f32, f32, f32),
    Ball(f32),
    Rod { radius: f32, height: f32 },
}

impl Shape {
    fn mesh(self) -> Mesh {
        match self {
            Shape::Block(x, y, z) => Mesh::from(Cuboid::new(x, y, z)),
            Shape::Ball(r) => Mesh::from(Sphere::new(r)),
            Shape::Rod { radius, height } => Mesh::from(Cylinder::new(radius, height)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Finish {
    Matte,
    /// Unlit, reads as self-illuminated.
    Glow,
    /// Unlit and alpha-blended.
    Clear(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub shape: Shape,
    pub at: [f32; 3],
    pub color: u32,
    pub finish: Finish,
}

const fn matte(shape: Shape, at: [f32; 3], color: u32) -> Part {
    Part {
        shape,
        at,
        color,
        finish: Finish::Matte,
    }
}

const fn glow(shape: Shape, at: [f32; 3], color: u32) -> Part {
    Part {
        shape,
        at,
        color,
        finish: Finish::Glow,
    }
}

/// Asset stores and command buffer the builders spawn through.
pub struct Kit<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
}

impl Kit<'_, '_, '_> {
    pub fn material(&mut self, hex: u32, finish: Finish) -> Handle<StandardMaterial> {
        let material = match finish {
            Finish::Matte => StandardMaterial {
                base_color: color(hex),
                perceptual_roughness: 0.9,
                ..default()
            },
            Finish::Glow => StandardMaterial {
                base_color: color(hex),
                unlit: true,
                ..default()
            },
            Finish::Clear(alpha) => StandardMaterial {
                base_color: color(hex).with_alpha(alpha),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            },
        };
        self.materials.add(material)
    }

    /// Empty, visible group owned by the visit.
    pub fn root(&mut self) -> Entity {
        self.commands
            .spawn((Transform::default(), Visibility::default(), VignetteOwned))
            .id()
    }

    pub fn attach(
        &mut self,
        parent: Entity,
        shape: Shape,
        at: [f32; 3],
        material: &Handle<StandardMaterial>,
    ) -> Entity {
        let mesh = self.meshes.add(shape.mesh());
        let id = self
            .commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(at[0], at[1], at[2]),
            ))
            .id();
        self.commands.entity(parent).add_child(id);
        id
    }

    pub fn attach_part(&mut self, parent: Entity, part: &Part) -> Entity {
        let material = self.material(part.color, part.finish);
        self.attach(parent, part.shape, part.at, &material)
    }
}

// ============================================================================
// ACTORS
// ============================================================================

/// Feet at the origin, facing +z.
pub struct PatientParts {
    pub root: Entity,
    pub body: Entity,
    pub left_arm: Entity,
    pub left_eye: Entity,
    pub right_eye: Entity,
    pub antenna_ball: Entity,
    /// Shared by torso, head and limbs.
    pub body_material: Handle<StandardMaterial>,
    /// Shared by both eyes.
    pub eye_material: Handle<StandardMaterial>,
    pub antenna_material: Handle<StandardMaterial>,
}

pub const PATIENT_LEFT_ARM_AT: [f32; 3] = [-0.6, 0.95, 0.0];

pub fn build_patient(kit: &mut Kit) -> PatientParts {
    let body_material = kit.material(palette::PATIENT_BODY, Finish::Matte);
    let eye_material = kit.material(palette::PATIENT_EYE, Finish::Glow);
    let antenna_material = kit.material(palette::PATIENT_ANTENNA, Finish::Glow);
    let root = kit.root();

    let body = kit.attach(root, Shape::Block(0.8, 1.0, 0.5), [0.0, 1.1, 0.0], &body_material);
    kit.attach(root, Shape::Block(0.5, 0.5, 0.45), [0.0, 1.85, 0.0], &body_material);
    let left_eye = kit.attach(
        root,
        Shape::Block(0.1, 0.08, 0.05),
        [-0.12, 1.9, 0.23],
        &eye_material,
    );
    let right_eye = kit.attach(
        root,
        Shape::Block(0.1, 0.08, 0.05),
        [0.12, 1.9, 0.23],
        &eye_material,
    );
    kit.attach_part(
        root,
        &matte(
            Shape::Rod {
                radius: 0.03,
                height: 0.3,
            },
            [0.0, 2.25, 0.0],
            palette::PATIENT_ANTENNA,
        ),
    );
    let antenna_ball = kit.attach(root, Shape::Ball(0.06), [0.0, 2.4, 0.0], &antenna_material);
    let left_arm = kit.attach(
        root,
        Shape::Block(0.2, 0.7, 0.2),
        PATIENT_LEFT_ARM_AT,
        &body_material,
    );
    kit.attach(root, Shape::Block(0.2, 0.7, 0.2), [0.6, 0.95, 0.0], &body_material);
    kit.attach(root, Shape::Block(0.25, 0.6, 0.25), [-0.2, 0.3, 0.0], &body_material);
    kit.attach(root, Shape::Block(0.25, 0.6, 0.25), [0.2, 0.3, 0.0], &body_material);

    PatientParts {
        root,
        body,
        left_arm,
        left_eye,
        right_eye,
        antenna_ball,
        body_material,
        eye_material,
        antenna_material,
    }
}

pub struct DoctorParts {
    pub root: Entity,
    pub head: Entity,
}

const DOCTOR_DETAIL: [Part; 8] = [
    glow(
        Shape::Block(0.25, 0.06, 0.01),
        [0.0, 1.25, 0.21],
        palette::DOCTOR_CROSS,
    ),
    glow(
        Shape::Block(0.06, 0.25, 0.01),
        [0.0, 1.25, 0.21],
        palette::DOCTOR_CROSS,
    ),
    glow(Shape::Block(0.06, 0.06, 0.02), [-0.1, 1.9, 0.18], 0x333333),
    glow(Shape::Block(0.06, 0.06, 0.02), [0.1, 1.9, 0.18], 0x333333),
    matte(
        Shape::Block(0.18, 0.65, 0.18),
        [-0.52, 0.85, 0.0],
        palette::DOCTOR_COAT,
    ),
    matte(
        Shape::Block(0.18, 0.65, 0.18),
        [0.52, 0.85, 0.0],
        palette::DOCTOR_COAT,
    ),
    matte(
        Shape::Block(0.2, 0.5, 0.2),
        [-0.15, 0.25, 0.0],
        palette::DOCTOR_TROUSERS,
    ),
    matte(
        Shape::Block(0.2, 0.5, 0.2),
        [0.15, 0.25, 0.0],
        palette::DOCTOR_TROUSERS,
    ),
];

pub fn build_doctor(kit: &mut Kit) -> DoctorParts {
    let root = kit.root();
    kit.attach_part(
        root,
        &matte(
            Shape::Block(0.7, 1.1, 0.4),
            [0.0, 1.05, 0.0],
            palette::DOCTOR_COAT,
        ),
    );
    let head = kit.attach_part(
        root,
        &matte(
            Shape::Block(0.4, 0.45, 0.35),
            [0.0, 1.85, 0.0],
            palette::DOCTOR_SKIN,
        ),
    );
    for part in &DOCTOR_DETAIL {
        kit.attach_part(root, part);
    }
    DoctorParts { root, head }
}

pub struct DachshundParts {
    pub root: Entity,
    pub head: Entity,
    pub tail: Entity,
}

const DACHSHUND_DETAIL: [Part; 8] = [
    matte(Shape::Block(0.16, 0.14, 0.2), [0.0, 0.45, 0.82], palette::DOG_COAT),
    glow(Shape::Ball(0.04), [0.0, 0.47, 0.93], 0x111111),
    matte(Shape::Block(0.06, 0.2, 0.14), [-0.17, 0.46, 0.56], palette::DOG_EAR),
    matte(Shape::Block(0.06, 0.2, 0.14), [0.17, 0.46, 0.56], palette::DOG_EAR),
    matte(Shape::Block(0.08, 0.2, 0.08), [-0.1, 0.1, 0.35], palette::DOG_COAT),
    matte(Shape::Block(0.08, 0.2, 0.08), [0.1, 0.1, 0.35], palette::DOG_COAT),
    matte(Shape::Block(0.08, 0.2, 0.08), [-0.1, 0.1, -0.35], palette::DOG_COAT),
    matte(Shape::Block(0.08, 0.2, 0.08), [0.1, 0.1, -0.35], palette::DOG_COAT),
];

/// Long and low, facing +z.
pub fn build_dachshund(kit: &mut Kit) -> DachshundParts {
    let coat = kit.material(palette::DOG_COAT, Finish::Matte);
    let root = kit.root();
    kit.attach(root, Shape::Block(0.32, 0.3, 1.0), [0.0, 0.35, 0.0], &coat);
    let head = kit.attach(root, Shape::Block(0.3, 0.28, 0.3), [0.0, 0.5, 0.6], &coat);
    let tail = kit.attach(root, Shape::Block(0.05, 0.05, 0.35), [0.0, 0.42, -0.65], &coat);
    for part in &DACHSHUND_DETAIL {
        kit.attach_part(root, part);
    }
    DachshundParts { root, head, tail }
}

// ============================================================================
// MARKERS
// ============================================================================

/// A target's visual marker. `indicator` spins or pulses; `material` fades.
pub struct MarkerParts {
    pub root: Entity,
    pub indicator: Entity,
    pub material: Handle<StandardMaterial>,
}

pub const ROAM_INDICATOR_HEIGHT: f32 = 0.8;

/// Translucent orb over a surgery spot, drawn at the spot's hit radius.
pub fn build_surgery_marker(kit: &mut Kit, radius: f32) -> MarkerParts {
    let material = kit.material(palette::GLOW_SPOT, Finish::Clear(0.4));
    let root = kit.root();
    let indicator = kit.attach(root, Shape::Ball(radius), [0.0; 3], &material);
    MarkerParts {
        root,
        indicator,
        material,
    }
}

/// Floor ring plus a floating cube in the spot's colour.
pub fn build_roam_marker(kit: &mut Kit, spot_color: u32) -> MarkerParts {
    let material = kit.material(palette::GLOW_SPOT, Finish::Clear(0.5));
    let root = kit.root();
    kit.attach(
        root,
        Shape::Rod {
            radius: 0.4,
            height: 0.1,
        },
        [0.0; 3],
        &material,
    );
    let indicator = kit.attach_part(
        root,
        &matte(
            Shape::Block(0.3, 0.3, 0.3),
            [0.0, ROAM_INDICATOR_HEIGHT, 0.0],
            spot_color,
        ),
    );
    MarkerParts {
        root,
        indicator,
        material,
    }
}

// ============================================================================
// WARD
// ============================================================================

const WALL_HEIGHT: f32 = 3.0;
const WALL_THICKNESS: f32 = 0.2;
/// Floor slabs run under the walls.
const FLOOR_MARGIN: f32 = 1.2;

/// (centre x, centre z, length along x, length along z)
const WALLS: [(f32, f32, f32, f32); 12] = [
    // theatre
    (0.0, -6.6, 15.4, WALL_THICKNESS),
    (-7.6, 0.5, WALL_THICKNESS, 14.4),
    (7.6, 0.5, WALL_THICKNESS, 14.4),
    (-4.6, 7.6, 6.0, WALL_THICKNESS),
    (4.6, 7.6, 6.0, WALL_THICKNESS),
    // corridor
    (-1.6, 9.5, WALL_THICKNESS, 3.8),
    (1.6, 9.5, WALL_THICKNESS, 3.8),
    // lounge
    (-4.1, 11.4, 5.0, WALL_THICKNESS),
    (4.1, 11.4, 5.0, WALL_THICKNESS),
    (-6.6, 16.0, WALL_THICKNESS, 9.4),
    (6.6, 16.0, WALL_THICKNESS, 9.4),
    (0.0, 20.6, 13.4, WALL_THICKNESS),
];

const PROPS: [Part; 15] = [
    // operating table
    matte(Shape::Block(1.2, 0.15, 2.6), [0.0, 0.725, -0.4], palette::TABLE),
    matte(Shape::Block(0.1, 0.75, 0.1), [-0.5, 0.375, -1.5], palette::TABLE),
    matte(Shape::Block(0.1, 0.75, 0.1), [0.5, 0.375, -1.5], palette::TABLE),
    matte(Shape::Block(0.1, 0.75, 0.1), [-0.5, 0.375, 0.7], palette::TABLE),
    matte(Shape::Block(0.1, 0.75, 0.1), [0.5, 0.375, 0.7], palette::TABLE),
    // overhead fixture
    glow(
        Shape::Rod {
            radius: 0.5,
            height: 0.15,
        },
        [0.0, 2.9, -0.4],
        palette::LIGHT_GLOW,
    ),
    // monitor
    matte(Shape::Block(0.6, 0.5, 0.1), [-1.8, 1.5, -0.9], 0x222244),
    glow(Shape::Block(0.5, 0.35, 0.02), [-1.8, 1.5, -0.84], 0x33ff66),
    // vending machine
    matte(Shape::Block(1.0, 2.0, 0.8), [-5.0, 1.0, -5.9], palette::VENDING),
    // window
    glow(Shape::Block(2.0, 1.4, 0.05), [5.0, 1.8, -6.47], palette::WINDOW),
    // nurses' station
    matte(Shape::Block(0.8, 1.0, 2.0), [-6.9, 0.5, 3.0], palette::DESK),
    // lounge sofa
    matte(Shape::Block(2.4, 0.45, 0.9), [-3.5, 0.225, 19.8], 0x884466),
    matte(Shape::Block(2.4, 0.6, 0.2), [-3.5, 0.75, 20.35], 0x884466),
    // exit door
    glow(Shape::Block(1.4, 2.2, 0.1), [0.0, 1.1, 20.45], palette::DOOR),
    matte(Shape::Block(1.7, 0.15, 0.15), [0.0, 2.28, 20.45], palette::WALL),
];

/// Root of the static ward geometry.
pub struct WardParts {
    pub root: Entity,
}

pub fn build_ward(kit: &mut Kit) -> WardParts {
    let root = kit.root();
    let floor_material = kit.material(palette::FLOOR, Finish::Matte);
    for region in &WARD_REGIONS {
        let c = region.center();
        kit.attach(
            root,
            Shape::Block(
                region.width() + FLOOR_MARGIN,
                0.1,
                region.depth() + FLOOR_MARGIN,
            ),
            [c.x, -0.05, c.z],
            &floor_material,
        );
    }

    let wall_material = kit.material(palette::WALL, Finish::Matte);
    for (x, z, sx, sz) in WALLS {
        kit.attach(
            root,
            Shape::Block(sx, WALL_HEIGHT, sz),
            [x, WALL_HEIGHT / 2.0, z],
            &wall_material,
        );
    }

    for part in &PROPS {
        kit.attach_part(root, part);
    }

    WardParts { root }
}
