//! Impure primitives: wall-clock time and blueprint id allocation
//!
//! The state machine only touches time and randomness through these traits,
//! so tests can substitute deterministic sources.

use crate::types::BlueprintId;
use chrono::{DateTime, Utc};

/// Source of timestamps
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Source of blueprint ids
pub trait IdGenerator: Send + Sync {
    /// A fresh id, distinct from every previous one
    fn next_id(&self) -> BlueprintId;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> BlueprintId {
        BlueprintId::new()
    }
}
