//! pigeonhole_sim — chained-hash pigeonhole demonstrator.
//!
//! - Generate N random tokens, hash each into one of M buckets (chaining).
//! - Two deterministic phases: insertion (collision tracking), then
//!   resolution (drain every chain recorded at phase start).
//! - A tick-driven animation state machine forwards one step event per tick
//!   to a read-only renderer; the core has no notion of wall-clock time.

mod anim;
mod engine;
mod error;
mod hash;
mod report;
mod table;
mod token;

pub use anim::{AnimState, AnimationController, Renderer};
pub use engine::{
    run_insertion_phase, run_resolution_phase, Engine, FirstCollision, InsertionPhase,
    ResolutionPhase, ResolutionStart, RunStats, StepEvent,
};
pub use error::SimError;
pub use hash::HashStrategy;
pub use report::render as render_report;
pub use table::BucketTable;
pub use token::{generate_hex_tokens, generate_tokens, Token};
