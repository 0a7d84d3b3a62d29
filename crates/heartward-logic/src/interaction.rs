//! Interaction targets — pointer-pickable surgery spots and proximity
//! markers for roaming.
//!
//! Every target carries a one-shot `completed` flag. Completing a target a
//! second time is a no-op; completion also drops the target's visual marker.

use crate::constants::{
    palette, surgery_spot_world, RoamAnchor, SurgeryOrgan, ROAM_SPOTS, SURGERY_SPOTS,
};
use crate::math::{Ray, Vec2, Vec3};
use crate::tuning::Tuning;

pub type TargetId = &'static str;

/// Height of a roaming marker's floating indicator above the floor.
const ROAM_MARKER_HEIGHT: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetPosition {
    Fixed(Vec3),
    /// Elliptical wander evaluated at scene time.
    Wander {
        center: Vec2,
        radii: Vec2,
        speed: f32,
    },
}

impl TargetPosition {
    pub fn at(&self, time: f32) -> Vec3 {
        match *self {
            TargetPosition::Fixed(p) => p,
            TargetPosition::Wander {
                center,
                radii,
                speed,
            } => {
                let a = time * speed;
                // figure-of-eight-ish loop: z runs at double rate
                Vec3::new(
                    center.x + radii.x * a.cos(),
                    ROAM_MARKER_HEIGHT,
                    center.z + radii.z * (2.0 * a).sin(),
                )
            }
        }
    }

    /// Floor anchor of a roaming spot, lifted to marker height.
    pub fn from_anchor(anchor: RoamAnchor) -> Self {
        match anchor {
            RoamAnchor::Fixed(p) => TargetPosition::Fixed(p.with_y(ROAM_MARKER_HEIGHT)),
            RoamAnchor::Wander {
                center,
                radii,
                speed,
            } => TargetPosition::Wander {
                center,
                radii,
                speed,
            },
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, TargetPosition::Wander { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Surgery(SurgeryOrgan),
    Roam,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Pulsing translucent sphere on the patient.
    GlowOrb,
    /// Floor ring with a spinning indicator cube.
    FloorBeacon,
}

/// The visual marker a target owns until it is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionTarget {
    pub id: TargetId,
    pub label: &'static str,
    pub kind: TargetKind,
    pub position: TargetPosition,
    pub message: &'static str,
    /// Pointer hit radius (surgery spots only).
    pub radius: f32,
    pub color: u32,
    pub marker: Option<MarkerStyle>,
    completed: bool,
}

impl InteractionTarget {
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_exit(&self) -> bool {
        self.kind == TargetKind::Exit
    }

    /// Mark completed and drop the marker. False if it already was.
    fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.marker = None;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetRegistry {
    targets: Vec<InteractionTarget>,
}

impl TargetRegistry {
    pub fn surgery(tuning: &Tuning) -> Self {
        let targets = SURGERY_SPOTS
            .iter()
            .map(|spot| InteractionTarget {
                id: spot.id,
                label: spot.label,
                kind: TargetKind::Surgery(spot.organ),
                position: TargetPosition::Fixed(surgery_spot_world(spot.offset)),
                message: spot.message,
                radius: tuning.surgery_spot_radius,
                color: palette::GLOW_SPOT,
                marker: Some(MarkerStyle {
                    shape: MarkerShape::GlowOrb,
                    color: palette::GLOW_SPOT,
                }),
                completed: false,
            })
            .collect();
        Self { targets }
    }

    pub fn roaming() -> Self {
        let targets = ROAM_SPOTS
            .iter()
            .map(|spot| InteractionTarget {
                id: spot.id,
                label: spot.label,
                kind: if spot.is_exit {
                    TargetKind::Exit
                } else {
                    TargetKind::Roam
                },
                position: TargetPosition::from_anchor(spot.anchor),
                message: spot.message,
                radius: 0.0,
                color: spot.color,
                marker: Some(MarkerStyle {
                    shape: MarkerShape::FloorBeacon,
                    color: spot.color,
                }),
                completed: false,
            })
            .collect();
        Self { targets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionTarget> {
        self.targets.iter()
    }

    pub fn get(&self, id: &str) -> Option<&InteractionTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &InteractionTarget> {
        self.targets.iter().filter(|t| !t.completed)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(|t| t.completed)
    }

    /// Nearest pending target whose hit sphere the ray crosses.
    pub fn pick(&self, ray: &Ray, time: f32) -> Option<TargetId> {
        self.pending()
            .filter_map(|t| {
                ray.intersect_sphere(t.position.at(time), t.radius)
                    .map(|d| (t.id, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Pending targets whose floor distance to `party` is under `radius`.
    pub fn within(&self, party: Vec2, radius: f32, time: f32) -> Vec<TargetId> {
        self.pending()
            .filter(|t| t.position.at(time).floor().distance(party) < radius)
            .map(|t| t.id)
            .collect()
    }

    /// Complete a target. `None` if unknown or already completed.
    pub fn complete(&mut self, id: &str) -> Option<&InteractionTarget> {
        let target = self.targets.iter_mut().find(|t| t.id == id)?;
        if target.complete() {
            Some(target)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surgery() -> TargetRegistry {
        TargetRegistry::surgery(&Tuning::default())
    }

    fn ray_at(target: Vec3) -> Ray {
        let origin = Vec3::new(0.0, 6.0, 8.0);
        Ray::new(origin, target - origin)
    }

    #[test]
    fn surgery_has_four_pending() {
        let reg = surgery();
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.pending().count(), 4);
        assert!(!reg.all_completed());
    }

    #[test]
    fn pick_hits_aimed_spot() {
        let reg = surgery();
        let heart = reg.get("heart").unwrap().position.at(0.0);
        assert_eq!(reg.pick(&ray_at(heart), 0.0), Some("heart"));
    }

    #[test]
    fn pick_ignores_completed() {
        let mut reg = surgery();
        let heart = reg.get("heart").unwrap().position.at(0.0);
        reg.complete("heart");
        assert_ne!(reg.pick(&ray_at(heart), 0.0), Some("heart"));
    }

    #[test]
    fn pick_misses_empty_space() {
        let reg = surgery();
        let ray = ray_at(Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(reg.pick(&ray, 0.0), None);
    }

    #[test]
    fn complete_is_one_shot_and_drops_marker() {
        let mut reg = surgery();
        assert!(reg.complete("brain").is_some());
        assert!(reg.complete("brain").is_none());
        assert!(reg.get("brain").unwrap().marker.is_none());
        assert_eq!(reg.completed_count(), 1);
    }

    #[test]
    fn complete_unknown_is_none() {
        let mut reg = surgery();
        assert!(reg.complete("spleen").is_none());
    }

    #[test]
    fn targets_carry_their_labels() {
        assert_eq!(surgery().get("arm").unwrap().label, "Arm (left)");
        let reg = TargetRegistry::roaming();
        assert_eq!(reg.get("door").unwrap().label, "Exit");
    }

    #[test]
    fn roaming_has_single_exit() {
        let reg = TargetRegistry::roaming();
        assert_eq!(reg.iter().filter(|t| t.is_exit()).count(), 1);
    }

    #[test]
    fn within_uses_floor_distance() {
        let reg = TargetRegistry::roaming();
        let near_vending = Vec2::new(-5.0, -3.0);
        assert_eq!(reg.within(near_vending, 1.5, 0.0), vec!["vending"]);
        assert!(reg.within(Vec2::new(0.0, 0.0), 1.5, 0.0).is_empty());
    }

    #[test]
    fn wandering_target_moves() {
        let reg = TargetRegistry::roaming();
        let dog = reg.get("dachshund").unwrap();
        assert!(dog.position.is_dynamic());
        let a = dog.position.at(0.0);
        let b = dog.position.at(2.0);
        assert!((a - b).length() > 0.1);
        let here = dog.position.at(5.0).floor();
        assert!(reg.within(here, 0.5, 5.0).contains(&"dachshund"));
    }
}
