use std::time::Duration;
use stilllift_core::{AnimationSpeed, PresentationMetadata, RevealType};

/// Share of the animation after which the message is shown.
const MIDPOINT_PERCENT: u32 = 60;

/// Declared durations for one reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    /// Trigger to lock.
    pub duration: Duration,
    /// Set for reveals that start themselves after this delay.
    pub auto_trigger: Option<Duration>,
}

impl RevealTiming {
    pub fn for_reveal(reveal: RevealType, speed: AnimationSpeed) -> Self {
        let auto_trigger = match reveal {
            RevealType::PlayingCard => Some(card_flip_delay(speed)),
            _ => None,
        };
        Self {
            duration: animation_duration(reveal, speed),
            auto_trigger,
        }
    }

    pub fn for_metadata(meta: &PresentationMetadata) -> Self {
        Self::for_reveal(meta.reveal_type, meta.animation_speed)
    }

    /// Trigger to message-visible.
    pub fn midpoint(&self) -> Duration {
        self.duration * MIDPOINT_PERCENT / 100
    }
}

pub fn animation_duration(reveal: RevealType, speed: AnimationSpeed) -> Duration {
    use AnimationSpeed::*;

    let ms = match reveal {
        RevealType::TreasureChest => match speed {
            Instant => 200,
            Quick => 600,
            Gentle => 1000,
            Rich => 1500,
        },
        RevealType::BalloonPop => match speed {
            Instant => 400,
            Quick => 800,
            Gentle => 1200,
            Rich => 1800,
        },
        RevealType::Envelope => match speed {
            Instant => 400,
            Quick => 800,
            Gentle => 1200,
            Rich => 1600,
        },
        RevealType::Bandage => match speed {
            Instant => 100,
            Quick => 300,
            Gentle => 800,
            Rich => 1200,
        },
        RevealType::PlayingCard => match speed {
            Instant => 300,
            Quick => 800,
            Gentle => 1200,
            Rich => 1600,
        },
    };
    Duration::from_millis(ms)
}

fn card_flip_delay(speed: AnimationSpeed) -> Duration {
    match speed {
        AnimationSpeed::Instant => Duration::from_millis(500),
        _ => Duration::from_millis(1200),
    }
}
