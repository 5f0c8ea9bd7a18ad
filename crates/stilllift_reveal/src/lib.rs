//! # StillLift reveal
//!
//! The message is disclosed through a short animation. Its progress is an
//! explicit state machine (`Idle → Revealing → Revealed → Locked`) advanced
//! by a single timer task, so the renderer only ever reacts to published
//! phases and never schedules anything itself.

mod driver;
mod machine;
mod timing;

pub use driver::RevealDriver;
pub use machine::{RevealEvent, RevealMachine, RevealPhase};
pub use timing::{animation_duration, RevealTiming};
