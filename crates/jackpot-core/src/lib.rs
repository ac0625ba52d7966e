//! Spin gate, spin engine and reel orchestration for journal-jackpot
//!
//! This crate is the heart of the slot machine, containing:
//! - Daily eligibility (one valid spin per local calendar day)
//! - The spin engine (draw, optimistic history update, durable write)
//! - The single history writer task
//! - Reel state machines (Idle -> Cycling -> Settling -> Settled) on a timer queue
//! - Aggregation of reel settles into one "all reels stopped" event

mod coordinator;
mod engine;
mod events;
mod gate;
mod history;
mod machine;
mod reel;
mod timers;
mod words;
mod writer;

pub use coordinator::*;
pub use engine::*;
pub use events::*;
pub use gate::*;
pub use history::*;
pub use machine::*;
pub use reel::*;
pub use timers::*;
pub use words::*;
pub use writer::*;
