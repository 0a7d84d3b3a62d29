//! Pure scene logic for the Heartward ward vignette.
//!
//! Everything here is independent of the renderer. A [`scene::Scene`] takes
//! input and a frame delta and exposes plain data (poses, targets,
//! particles, lighting, UI panel) for any engine to draw, which keeps the
//! whole play-through unit-testable and scriptable headless.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`camera`] | Fixed surgery framing, roaming intro pan, smoothed follow |
//! | [`constants`] | Palette, ward layout, surgery and roaming target tables |
//! | [`effects`] | Timed animation effects and the one-shot timer queue |
//! | [`interaction`] | One-shot targets, ray picking, proximity queries |
//! | [`math`] | Floor/world vectors, rays, easing |
//! | [`movement`] | Intent sources, wall-sliding, party and actor poses |
//! | [`particles`] | Short-lived burst particles |
//! | [`phase`] | Surgery/roaming phases and their lighting presets |
//! | [`scene`] | The owned scene object, frame update and lifecycle |
//! | [`tuning`] | JSON-loadable tunables and their validation |
//! | [`ui`] | Panel and transient message state |
//! | [`walkable`] | Rectangular floor regions and the walkability test |

pub mod camera;
pub mod constants;
pub mod effects;
pub mod interaction;
pub mod math;
pub mod movement;
pub mod particles;
pub mod phase;
pub mod scene;
pub mod tuning;
pub mod ui;
pub mod walkable;
