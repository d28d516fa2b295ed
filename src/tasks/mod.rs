//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: Removes expired entries that are written but never read again

mod sweep;

pub use sweep::spawn_sweep_task;
