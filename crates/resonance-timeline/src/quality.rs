//! Quality score analyzer
//!
//! Grades a calculated timeline against retention heuristics. Starts at 100
//! and applies independent deductions, one feedback line each.

use crate::types::{CalculatedSegment, Platform, QualityReport};

/// Longest opening segment tolerated on short-form platforms, in seconds
pub const HOOK_LIMIT_SECONDS: u32 = 3;
/// Deduction for a slow opening on short-form platforms
pub const HOOK_PENALTY: i32 = 20;
/// Average segment length below which pacing is too choppy, in seconds
pub const CHOPPY_AVERAGE_SECONDS: f64 = 2.0;
/// Average segment length above which pacing is too slow, in seconds
pub const SLOW_AVERAGE_SECONDS: f64 = 15.0;
/// Deduction for choppy or slow pacing
pub const PACING_PENALTY: i32 = 15;
/// Deduction when no segment reaches HIGH or MAX density
pub const FLAT_ENERGY_PENALTY: i32 = 10;

/// Score a timeline for the given platform
///
/// Pure: identical inputs always produce identical reports. Feedback order
/// follows check order (hook, pacing, contrast).
#[must_use]
pub fn calculate_quality(timeline: &[CalculatedSegment], platform: Platform) -> QualityReport {
    let mut score: i32 = 100;
    let mut feedback = Vec::new();

    if platform.is_short_form() {
        if let Some(opening) = timeline.first() {
            // The opening seconds act as the hook whatever the segment is called.
            if opening.duration > HOOK_LIMIT_SECONDS {
                score -= HOOK_PENALTY;
                feedback.push(format!(
                    "Hook is {}s. Aim for <{HOOK_LIMIT_SECONDS}s for retention on {platform}.",
                    opening.duration
                ));
            }
        }
    }

    if !timeline.is_empty() {
        let total: u32 = timeline.iter().map(|s| s.duration).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(total) / timeline.len() as f64;

        if average < CHOPPY_AVERAGE_SECONDS {
            score -= PACING_PENALTY;
            feedback.push(format!(
                "Pacing is too choppy (Avg: {average:.1}s). Consolidate segments."
            ));
        } else if average > SLOW_AVERAGE_SECONDS {
            score -= PACING_PENALTY;
            feedback.push(format!("Pacing is too slow (Avg: {average:.1}s). Add more cuts."));
        }
    }

    if !timeline.iter().any(|s| s.sound_density.is_high_energy()) {
        score -= FLAT_ENERGY_PENALTY;
        feedback.push("Energy is too flat. Add a Peak or Surge segment for contrast.".to_string());
    }

    // Clamped for rule sets whose deductions exceed 100.
    let total_score = u8::try_from(score.clamp(0, 100)).unwrap_or(0);

    tracing::debug!(%platform, total_score, deductions = feedback.len(), "timeline scored");

    QualityReport {
        total_score,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_by_id;
    use crate::dialogue::apply_dialogue_constraints;
    use crate::partition::partition;

    #[test]
    fn clamped_surge_on_tiktok_is_perfect() {
        let timeline = partition(60, get_by_id("surge").unwrap(), Some(Platform::TikTok));
        let report = calculate_quality(&timeline, Platform::TikTok);
        assert_eq!(report.total_score, 100);
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn long_hook_on_short_form_is_penalised() {
        // Unclamped timeline scored against a short-form platform.
        let timeline = partition(60, get_by_id("surge").unwrap(), None);
        let report = calculate_quality(&timeline, Platform::Instagram);
        assert_eq!(report.total_score, 80);
        assert_eq!(
            report.feedback,
            ["Hook is 9s. Aim for <3s for retention on Instagram."]
        );
    }

    #[test]
    fn slow_and_flat_breathe() {
        let timeline = partition(180, get_by_id("breathe").unwrap(), Some(Platform::YouTube));
        let report = calculate_quality(&timeline, Platform::YouTube);
        assert_eq!(report.total_score, 75);
        assert_eq!(
            report.feedback,
            [
                "Pacing is too slow (Avg: 90.0s). Add more cuts.",
                "Energy is too flat. Add a Peak or Surge segment for contrast.",
            ]
        );
    }

    #[test]
    fn choppy_wave() {
        let timeline = partition(10, get_by_id("wave").unwrap(), Some(Platform::LinkedIn));
        let report = calculate_quality(&timeline, Platform::LinkedIn);
        assert_eq!(report.total_score, 85);
        assert_eq!(report.feedback, ["Pacing is too choppy (Avg: 1.7s). Consolidate segments."]);
    }

    #[test]
    fn dialogue_flattens_energy() {
        let quiet = apply_dialogue_constraints(get_by_id("climb").unwrap());
        let timeline = partition(60, &quiet, Some(Platform::YouTube));
        let report = calculate_quality(&timeline, Platform::YouTube);
        assert_eq!(report.total_score, 75);
        assert_eq!(report.feedback.len(), 2);
    }

    #[test]
    fn all_deductions_stack() {
        let quiet = apply_dialogue_constraints(get_by_id("breathe").unwrap());
        let timeline = partition(180, &quiet, None);
        let report = calculate_quality(&timeline, Platform::TikTok);
        assert_eq!(report.total_score, 55);
        assert_eq!(report.feedback.len(), 3);
    }

    #[test]
    fn empty_timeline_only_reports_flat_energy() {
        let report = calculate_quality(&[], Platform::TikTok);
        assert_eq!(report.total_score, 90);
        assert_eq!(report.feedback.len(), 1);
    }

    #[test]
    fn pure_function() {
        let timeline = partition(45, get_by_id("drop").unwrap(), Some(Platform::TikTok));
        assert_eq!(
            calculate_quality(&timeline, Platform::TikTok),
            calculate_quality(&timeline, Platform::TikTok)
        );
    }
}
