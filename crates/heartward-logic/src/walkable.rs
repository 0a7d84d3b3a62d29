//! Walkable floor mask — a union of axis-aligned rectangles.
//!
//! This is a coarse room/corridor mask, not per-object collision. It is the
//! only authority on whether the party may stand at a point.

use crate::math::Vec2;

/// Closed rectangle on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableRegion {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WalkableRegion {
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloorMask {
    regions: Vec<WalkableRegion>,
}

impl FloorMask {
    pub fn new(regions: impl Into<Vec<WalkableRegion>>) -> Self {
        Self {
            regions: regions.into(),
        }
    }

    pub fn regions(&self) -> &[WalkableRegion] {
        &self.regions
    }

    pub fn is_walkable(&self, x: f32, z: f32) -> bool {
        self.regions.iter().any(|r| r.contains(x, z))
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.is_walkable(p.x, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{RoamAnchor, ROAM_SPOTS, ROAM_STAGING, WARD_REGIONS};

    fn ward() -> FloorMask {
        FloorMask::new(WARD_REGIONS)
    }

    #[test]
    fn bounds_are_closed() {
        let r = WalkableRegion::new(0.0, 2.0, 0.0, 2.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(2.0, 2.0));
        assert!(!r.contains(2.001, 1.0));
        assert!(!r.contains(1.0, -0.001));
    }

    #[test]
    fn union_of_regions() {
        let mask = ward();
        assert!(mask.is_walkable(0.0, 0.0)); // theatre
        assert!(mask.is_walkable(0.0, 9.5)); // corridor
        assert!(mask.is_walkable(-5.0, 15.0)); // lounge
        assert!(!mask.is_walkable(-5.0, 9.5)); // beside the corridor
        assert!(!mask.is_walkable(0.0, 25.0));
    }

    #[test]
    fn mask_keeps_its_regions() {
        assert_eq!(ward().regions(), &WARD_REGIONS[..]);
    }

    #[test]
    fn empty_mask_walks_nowhere() {
        let mask = FloorMask::default();
        assert!(!mask.is_walkable(0.0, 0.0));
    }

    #[test]
    fn staging_and_targets_are_reachable() {
        let mask = ward();
        assert!(mask.contains(ROAM_STAGING));
        for spot in &ROAM_SPOTS {
            match spot.anchor {
                RoamAnchor::Fixed(p) => assert!(mask.contains(p), "{} unreachable", spot.id),
                RoamAnchor::Wander { center, radii, .. } => {
                    for (dx, dz) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
                        let p = Vec2::new(center.x + dx * radii.x, center.z + dz * radii.z);
                        assert!(mask.contains(p), "{} wanders off the floor", spot.id);
                    }
                }
            }
        }
    }
}
