//! Timed animation tasks and one-shot timers, both on the scene clock.
//!
//! Nothing here is fire-and-forget: effects carry an explicit end time that
//! is checked every frame, and timers sit in a queue the scene owns, so a
//! teardown cancels all of them at once.

use crate::constants::palette;

/// Left-arm raise angle about z, radians.
pub const ARM_RAISE_ANGLE: f32 = -0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Patient body flushes red.
    BodyPulse,
    /// Antenna tip turns yellow.
    AntennaSparkle,
    /// Left arm lifts.
    ArmRaise,
    /// Eyes glow white.
    EyeGlow,
    /// Patient sits up off the table.
    SitUp,
}

impl EffectKind {
    /// Colour the affected part shows while the effect runs.
    pub fn tint(&self) -> Option<u32> {
        match self {
            EffectKind::BodyPulse => Some(palette::PULSE_RED),
            EffectKind::AntennaSparkle => Some(palette::SPARKLE_YELLOW),
            EffectKind::EyeGlow => Some(palette::EYE_GLOW),
            EffectKind::ArmRaise | EffectKind::SitUp => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEffect {
    pub kind: EffectKind,
    pub started_at: f32,
    pub ends_at: f32,
}

impl TimedEffect {
    pub fn progress(&self, now: f32) -> f32 {
        let span = self.ends_at - self.started_at;
        if span <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectTrack {
    active: Vec<TimedEffect>,
}

impl EffectTrack {
    /// Start (or restart) an effect.
    pub fn start(&mut self, kind: EffectKind, now: f32, duration: f32) {
        self.active.retain(|e| e.kind != kind);
        self.active.push(TimedEffect {
            kind,
            started_at: now,
            ends_at: now + duration,
        });
    }

    /// Drop every effect whose end time has passed; returns what ended.
    pub fn expire(&mut self, now: f32) -> Vec<EffectKind> {
        let mut ended = Vec::new();
        self.active.retain(|e| {
            if now >= e.ends_at {
                ended.push(e.kind);
                false
            } else {
                true
            }
        });
        ended
    }

    pub fn get(&self, kind: EffectKind) -> Option<&TimedEffect> {
        self.active.iter().find(|e| e.kind == kind)
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEffect> {
        self.active.iter()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    BeginRoaming,
    ExitScene,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTimer {
    pub event: TimerEvent,
    pub due: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduler {
    pending: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn schedule(&mut self, event: TimerEvent, due: f32) {
        self.pending.push(PendingTimer { event, due });
    }

    /// Remove and return every timer due by `now`, earliest first.
    pub fn take_due(&mut self, now: f32) -> Vec<TimerEvent> {
        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|t| t.event).collect()
    }

    pub fn is_scheduled(&self, event: TimerEvent) -> bool {
        self.pending.iter().any(|t| t.event == event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_expires_on_schedule() {
        let mut track = EffectTrack::default();
        track.start(EffectKind::BodyPulse, 1.0, 1.5);
        assert!(track.expire(2.4).is_empty());
        assert!(track.is_active(EffectKind::BodyPulse));
        assert_eq!(track.expire(2.5), vec![EffectKind::BodyPulse]);
        assert!(!track.is_active(EffectKind::BodyPulse));
    }

    #[test]
    fn restart_replaces_same_kind() {
        let mut track = EffectTrack::default();
        track.start(EffectKind::EyeGlow, 0.0, 2.0);
        track.start(EffectKind::EyeGlow, 1.0, 2.0);
        assert_eq!(track.iter().count(), 1);
        assert_eq!(track.get(EffectKind::EyeGlow).unwrap().ends_at, 3.0);
    }

    #[test]
    fn progress_clamps() {
        let e = TimedEffect {
            kind: EffectKind::SitUp,
            started_at: 1.0,
            ends_at: 2.0,
        };
        assert_eq!(e.progress(0.0), 0.0);
        assert_eq!(e.progress(1.5), 0.5);
        assert_eq!(e.progress(5.0), 1.0);
    }

    #[test]
    fn timers_fire_in_due_order_once() {
        let mut s = Scheduler::default();
        s.schedule(TimerEvent::ExitScene, 5.0);
        s.schedule(TimerEvent::BeginRoaming, 3.0);
        assert!(s.take_due(2.9).is_empty());
        assert_eq!(
            s.take_due(6.0),
            vec![TimerEvent::BeginRoaming, TimerEvent::ExitScene]
        );
        assert!(s.take_due(10.0).is_empty());
    }

    #[test]
    fn cancel_all_drops_pending() {
        let mut s = Scheduler::default();
        s.schedule(TimerEvent::ExitScene, 1.0);
        s.cancel_all();
        assert!(s.is_empty());
        assert!(s.take_due(2.0).is_empty());
    }

    #[test]
    fn tints_match_palette() {
        assert_eq!(EffectKind::BodyPulse.tint(), Some(palette::PULSE_RED));
        assert_eq!(EffectKind::ArmRaise.tint(), None);
    }
}
