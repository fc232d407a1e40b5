//! Testing utilities for the Resonance workspace
//!
//! Deterministic time and id sources, template builders, and shortcuts for
//! getting a project into a locked state.

#![allow(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use resonance_project::{
    BlueprintId, Clock, IdGenerator, OutcomeLog, PlatformContext, ProductionConfig, Project,
    ProjectCommand, ProjectStateMachine,
};
use resonance_timeline::{
    plan, CutSpeed, Pacing, PacingStart, Phase1Plan, Platform, SegmentTemplate, SegmentType,
    SoundDensity, StructureTemplate, TargetDuration, TimelineRequest,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(epoch())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Ids 1, 2, 3, ... as UUIDs
#[derive(Debug, Default)]
pub struct SequentialIds {
    issued: AtomicU64,
}

impl SequentialIds {
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> BlueprintId {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        BlueprintId(Uuid::from_u128(u128::from(n)))
    }
}

/// The `n`th id handed out by [`SequentialIds`]
pub fn sequential_id(n: u64) -> BlueprintId {
    BlueprintId(Uuid::from_u128(u128::from(n)))
}

/// 2026-01-01T00:00:00Z
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// Machine with a fixed clock and sequential ids
pub fn deterministic_machine(config: ProductionConfig) -> ProjectStateMachine {
    ProjectStateMachine::with_sources(
        config,
        Arc::new(FixedClock::default()),
        Arc::new(SequentialIds::default()),
    )
}

pub fn segment(segment_type: SegmentType, percentage: u32) -> SegmentTemplate {
    SegmentTemplate::new(segment_type, percentage, CutSpeed::Constant, SoundDensity::Med)
}

/// Template with the given segments and neutral pacing
pub fn template(id: &str, segments: Vec<SegmentTemplate>) -> StructureTemplate {
    StructureTemplate {
        id: id.to_string(),
        name: id.to_uppercase(),
        description: format!("test template {id}"),
        pacing: Pacing {
            start: PacingStart::Constant,
            peak_position_max: 1.0,
            silence_required: false,
        },
        segments,
    }
}

/// Template from `(type, percent)` pairs
pub fn template_of(id: &str, parts: &[(SegmentType, u32)]) -> StructureTemplate {
    template(
        id,
        parts.iter().map(|&(t, p)| segment(t, p)).collect(),
    )
}

pub fn phase1_plan(seconds: i64, structure_id: &str, platform: Platform) -> Phase1Plan {
    plan(&TimelineRequest::new(
        TargetDuration::new(seconds).unwrap(),
        structure_id,
        platform,
    ))
}

/// Lock command for a freshly planned timeline
pub fn lock_command(seconds: i64, structure_id: &str, platform: Platform) -> ProjectCommand {
    let plan = phase1_plan(seconds, structure_id, platform);
    ProjectCommand::LockBlueprint {
        phase1: plan.to_phase1_data(),
        platform_context: PlatformContext::for_plan(&plan),
    }
}

/// New project with a locked blueprint
pub fn locked_project(
    machine: &ProjectStateMachine,
    seconds: i64,
    structure_id: &str,
    platform: Platform,
) -> Project {
    machine.apply(
        &machine.new_project(),
        lock_command(seconds, structure_id, platform),
    )
}

pub fn sample_outcome() -> OutcomeLog {
    OutcomeLog {
        posted: true,
        platform: Platform::TikTok.to_string(),
        retention_3s: 71,
        user_confidence: 4,
        drop_off_timestamp: Some("0:12".to_string()),
        logged_at: epoch(),
    }
}
