//! Fishing engine: polling primitives and the cast/catch state machine

pub mod clock;
pub mod machine;
pub mod poll;

pub use clock::{Clock, ManualClock, SystemClock};
pub use machine::{FishingState, FishingStateMachine, SessionStats, TickOutcome};
pub use poll::{await_color_count, await_color_found, poll_until};
