//! Background Tasks Module
//!
//! # Tasks
//! - Sweep: bounded removal of expired cache entries on a fixed tick
//! - Warm-up: permit-bounded bulk prefetch of user profiles

mod sweeper;
mod warmup;

pub use sweeper::{spawn_sweep_task, SweepHandle};
pub use warmup::{warm_profiles, WarmupReport};
