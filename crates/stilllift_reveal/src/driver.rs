//! One background task per reveal that owns the machine and its timer.
//!
//! There is exactly one pending deadline at any time, so a repeated tap or a
//! late timer can never stack a second animation on top of the first.

use crate::machine::{RevealEvent, RevealMachine, RevealPhase};
use crate::timing::RevealTiming;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, Copy)]
enum Command {
    Trigger,
    Replay,
}

pub struct RevealDriver {
    timing: RevealTiming,
    command_tx: mpsc::Sender<Command>,
    phase_rx: watch::Receiver<RevealPhase>,
    task: JoinHandle<()>,
}

impl RevealDriver {
    /// Start driving a fresh reveal. Must be called inside a tokio runtime.
    pub fn spawn(timing: RevealTiming) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (phase_tx, phase_rx) = watch::channel(RevealPhase::Idle);
        let task = tokio::spawn(run(timing, command_rx, phase_tx));
        Self {
            timing,
            command_tx,
            phase_rx,
            task,
        }
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    /// The user tapped the reveal element.
    pub fn trigger(&self) {
        self.send(Command::Trigger);
    }

    /// Reset a locked reveal so it can play again.
    pub fn replay(&self) {
        self.send(Command::Replay);
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.command_tx.try_send(command) {
            tracing::debug!("Dropped reveal command {:?}: {}", command, e);
        }
    }

    pub fn phase(&self) -> RevealPhase {
        *self.phase_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealPhase> {
        self.phase_rx.clone()
    }

    /// Wait until the reveal reaches `phase`, returning at once if it has
    /// already moved past it. Returns false if the driver stopped first.
    pub async fn wait_for(&self, phase: RevealPhase) -> bool {
        let mut rx = self.phase_rx.clone();
        let reached = rx.wait_for(|p| p.has_reached(phase)).await.is_ok();
        reached
    }
}

impl Drop for RevealDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    timing: RevealTiming,
    mut commands: mpsc::Receiver<Command>,
    phase_tx: watch::Sender<RevealPhase>,
) {
    let mut machine = RevealMachine::new();
    let mut started = Instant::now();
    let mut deadline = idle_deadline(&timing, Instant::now());

    loop {
        let event = match deadline {
            Some((at, event)) => tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => to_event(command),
                    None => break,
                },
                _ = sleep_until(at) => event,
            },
            None => match commands.recv().await {
                Some(command) => to_event(command),
                None => break,
            },
        };

        let Some(phase) = machine.apply(event) else {
            continue;
        };

        let now = Instant::now();
        deadline = match phase {
            RevealPhase::Idle => idle_deadline(&timing, now),
            RevealPhase::Revealing => {
                started = now;
                Some((started + timing.midpoint(), RevealEvent::AnimationMidpoint))
            }
            RevealPhase::Revealed => Some((started + timing.duration, RevealEvent::AnimationComplete)),
            RevealPhase::Locked => None,
        };

        tracing::debug!("Reveal {} after {:?}", phase, now - started);
        if phase_tx.send(phase).is_err() {
            break;
        }
    }
}

fn idle_deadline(timing: &RevealTiming, now: Instant) -> Option<(Instant, RevealEvent)> {
    timing
        .auto_trigger
        .map(|delay| (now + delay, RevealEvent::Trigger))
}

fn to_event(command: Command) -> RevealEvent {
    match command {
        Command::Trigger => RevealEvent::Trigger,
        Command::Replay => RevealEvent::Replay,
    }
}
