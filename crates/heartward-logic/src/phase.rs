//! Scene phases and the lighting preset each one selects.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Initial: click the glowing spots on the patient.
    Surgery,
    /// Free roam through the ward.
    Roaming,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Surgery => "surgery",
            Phase::Roaming => "roaming",
        }
    }

    pub fn lighting(&self) -> LightingProfile {
        match self {
            Phase::Surgery => LightingProfile::SURGICAL,
            Phase::Roaming => LightingProfile::BRIGHT,
        }
    }
}

/// Relative intensities of the scene's three lights (1.0 = renderer's
/// nominal brightness for that light).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingProfile {
    pub ambient: f32,
    pub key: f32,
    /// Spotlight over the operating table.
    pub table: f32,
}

impl LightingProfile {
    /// Dim room, strong table light.
    pub const SURGICAL: LightingProfile = LightingProfile {
        ambient: 0.6,
        key: 0.8,
        table: 1.2,
    };

    /// Bright, explorable.
    pub const BRIGHT: LightingProfile = LightingProfile {
        ambient: 1.1,
        key: 1.3,
        table: 0.4,
    };
}
