//! Reveal phases and the only transitions between them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RevealPhase {
    /// Nothing disclosed yet; waiting for a tap (or a card's auto-flip).
    #[default]
    Idle,
    /// Animation running, message still hidden.
    Revealing,
    /// Message on screen, animation finishing.
    Revealed,
    /// Message static and permanent.
    Locked,
}

impl RevealPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealPhase::Idle => "idle",
            RevealPhase::Revealing => "revealing",
            RevealPhase::Revealed => "revealed",
            RevealPhase::Locked => "locked",
        }
    }

    pub fn message_visible(&self) -> bool {
        matches!(self, RevealPhase::Revealed | RevealPhase::Locked)
    }

    fn step(&self) -> u8 {
        match self {
            RevealPhase::Idle => 0,
            RevealPhase::Revealing => 1,
            RevealPhase::Revealed => 2,
            RevealPhase::Locked => 3,
        }
    }

    /// True once this phase is `target` or later in the same play-through.
    /// Idle is only reached by being Idle, since Replay jumps back to it.
    pub fn has_reached(&self, target: RevealPhase) -> bool {
        match target {
            RevealPhase::Idle => *self == RevealPhase::Idle,
            _ => self.step() >= target.step(),
        }
    }
}

impl fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealEvent {
    Trigger,
    AnimationMidpoint,
    AnimationComplete,
    Replay,
}

#[derive(Debug, Clone, Default)]
pub struct RevealMachine {
    phase: RevealPhase,
}

impl RevealMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Apply an event. Returns the new phase, or `None` when the event does
    /// not apply to the current phase and was ignored.
    pub fn apply(&mut self, event: RevealEvent) -> Option<RevealPhase> {
        use RevealEvent::*;
        use RevealPhase::*;

        let next = match (self.phase, event) {
            (Idle, Trigger) => Revealing,
            (Revealing, AnimationMidpoint) => Revealed,
            (Revealed, AnimationComplete) => Locked,
            (Locked, Replay) => Idle,
            (phase, event) => {
                tracing::debug!("Ignoring {:?} while {}", event, phase);
                return None;
            }
        };
        self.phase = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_reached_counts_later_phases() {
        assert!(RevealPhase::Locked.has_reached(RevealPhase::Revealed));
        assert!(RevealPhase::Revealed.has_reached(RevealPhase::Revealed));
        assert!(!RevealPhase::Revealing.has_reached(RevealPhase::Revealed));
        assert!(RevealPhase::Idle.has_reached(RevealPhase::Idle));
        assert!(!RevealPhase::Locked.has_reached(RevealPhase::Idle));
    }

    #[test]
    fn test_happy_path() {
        let mut machine = RevealMachine::new();
        assert_eq!(machine.apply(RevealEvent::Trigger), Some(RevealPhase::Revealing));
        assert!(!machine.phase().message_visible());
        assert_eq!(machine.apply(RevealEvent::AnimationMidpoint), Some(RevealPhase::Revealed));
        assert!(machine.phase().message_visible());
        assert_eq!(machine.apply(RevealEvent::AnimationComplete), Some(RevealPhase::Locked));
        assert_eq!(machine.apply(RevealEvent::Replay), Some(RevealPhase::Idle));
    }

    #[test]
    fn test_out_of_order_events_ignored() {
        let mut machine = RevealMachine::new();
        assert_eq!(machine.apply(RevealEvent::AnimationComplete), None);
        assert_eq!(machine.apply(RevealEvent::Replay), None);
        machine.apply(RevealEvent::Trigger);
        assert_eq!(machine.apply(RevealEvent::Trigger), None);
        assert_eq!(machine.apply(RevealEvent::AnimationComplete), None);
        assert_eq!(machine.phase(), RevealPhase::Revealing);
    }
}
