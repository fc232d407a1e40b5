//! Integer partitioning engine
//!
//! Converts percentage templates into whole-second segments using the
//! Largest Remainder Method. All arithmetic is integer: a segment's exact
//! share is `pct * total / 100`, so the fractional part is carried as
//! hundredths and no floating-point drift can reach the output.
//!
//! Do not replace the apportionment with per-segment rounding; rounded
//! shares do not sum to the requested total.

use crate::types::{CalculatedSegment, Platform, SegmentType, StructureTemplate};

/// Longest HOOK allowed on short-form platforms, in seconds
pub const SHORT_FORM_HOOK_CAP: u32 = 3;

/// Result of distributing whole seconds before any platform adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apportionment {
    /// Floor of each segment's exact share, in template order
    pub floors: Vec<u32>,
    /// Remainder of each exact share, in hundredths of a second
    pub remainders: Vec<u32>,
    /// `total - sum(floors)`; always smaller than the segment count
    pub deficit: u32,
    /// Whether each segment received one of the deficit seconds
    pub bumped: Vec<bool>,
}

impl Apportionment {
    /// Final per-segment seconds
    #[must_use]
    pub fn seconds(&self) -> Vec<u32> {
        self.floors
            .iter()
            .zip(&self.bumped)
            .map(|(floor, bumped)| floor + u32::from(*bumped))
            .collect()
    }

    /// Number of segments that received an extra second
    #[must_use]
    pub fn bump_count(&self) -> usize {
        self.bumped.iter().filter(|b| **b).count()
    }
}

/// Distribute `total_seconds` over the template's percentages
///
/// Segments are ranked by remainder, largest first, with a stable sort so
/// that equal remainders favour the segment appearing earlier in the
/// template. The first `deficit` segments in that ranking get one second.
#[must_use]
pub fn apportion(total_seconds: u32, template: &StructureTemplate) -> Apportionment {
    let (floors, remainders): (Vec<u32>, Vec<u32>) = template
        .segments
        .iter()
        .map(|s| {
            let scaled = u64::from(s.base_percentage) * u64::from(total_seconds);
            // Bounded by total_seconds for percentages <= 100.
            #[allow(clippy::cast_possible_truncation)]
            let floor = (scaled / 100) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let remainder = (scaled % 100) as u32;
            (floor, remainder)
        })
        .unzip();

    let floor_sum: u32 = floors.iter().sum();
    let deficit = total_seconds.saturating_sub(floor_sum);

    let mut ranking: Vec<usize> = (0..floors.len()).collect();
    ranking.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));

    let mut bumped = vec![false; floors.len()];
    for &index in ranking.iter().take(deficit as usize) {
        bumped[index] = true;
    }

    tracing::trace!(
        structure = %template.id,
        total_seconds,
        deficit,
        "apportioned deficit by largest remainder"
    );

    Apportionment {
        floors,
        remainders,
        deficit,
        bumped,
    }
}

/// Partition `total_seconds` across a structure template
///
/// The caller guarantees `total_seconds` has been normalised to the
/// supported range. On short-form platforms a HOOK longer than
/// [`SHORT_FORM_HOOK_CAP`] is clamped and the surplus moved to the BUILD
/// segment, or to the segment right after the HOOK when the template has no
/// BUILD. A HOOK in last position is left alone. The sum of durations
/// always equals `total_seconds` for templates summing to 100.
#[must_use]
pub fn partition(
    total_seconds: u32,
    template: &StructureTemplate,
    platform: Option<Platform>,
) -> Vec<CalculatedSegment> {
    let mut seconds = apportion(total_seconds, template).seconds();

    if platform.is_some_and(Platform::is_short_form) {
        clamp_hook(&mut seconds, template);
    }

    let mut cursor = 0;
    template
        .segments
        .iter()
        .zip(seconds)
        .map(|(segment, duration)| {
            let calculated = CalculatedSegment::from_template(segment, cursor, duration);
            cursor = calculated.end_time;
            calculated
        })
        .collect()
}

fn clamp_hook(seconds: &mut [u32], template: &StructureTemplate) {
    let Some(hook) = template.position_of(SegmentType::Hook) else {
        return;
    };
    if seconds[hook] <= SHORT_FORM_HOOK_CAP {
        return;
    }

    let receiver = template
        .position_of(SegmentType::Build)
        .or_else(|| (hook + 1 < seconds.len()).then_some(hook + 1));

    let Some(receiver) = receiver else {
        tracing::debug!(
            structure = %template.id,
            "hook is the final segment, skipping short-form clamp"
        );
        return;
    };

    let surplus = seconds[hook] - SHORT_FORM_HOOK_CAP;
    seconds[hook] = SHORT_FORM_HOOK_CAP;
    seconds[receiver] += surplus;

    tracing::debug!(
        structure = %template.id,
        surplus,
        receiver = %template.segments[receiver].segment_type,
        "clamped hook for short-form platform"
    );
}

/// Sum of segment durations
#[must_use]
pub fn timeline_sum(segments: &[CalculatedSegment]) -> u32 {
    segments.iter().map(|s| s.duration).sum()
}

/// Whether the segments add up to `expected_total`
#[must_use]
pub fn validate_timeline_sum(segments: &[CalculatedSegment], expected_total: u32) -> bool {
    timeline_sum(segments) == expected_total
}
