//! Rules engine
//!
//! Stateless checks for known incompatibilities between duration, structure
//! and platform. Every check runs; any number may fire together.

use crate::types::{Conflict, ConflictCode, Platform, Severity};

/// Longest video YouTube Shorts keeps in the Shorts feed, in seconds
pub const SHORTS_MAX_SECONDS: u32 = 60;

/// Shortest duration that fits the multi-peak Wave structure, in seconds
pub const WAVE_MIN_SECONDS: u32 = 20;

/// Evaluate a configuration
///
/// Structure ids are compared case-insensitively.
#[must_use]
pub fn validate_configuration(duration: u32, structure_id: &str, platform: Platform) -> Vec<Conflict> {
    let structure_id = structure_id.to_lowercase();
    let mut conflicts = Vec::new();

    if platform == Platform::TikTok && structure_id == "breathe" {
        conflicts.push(Conflict {
            code: ConflictCode::BoredomProtocol,
            severity: Severity::Warning,
            message: "Breathe structure is high-risk on TikTok due to low retention".to_string(),
            fix: "Consider \"Pulse\" or \"Surge\" for better retention.".to_string(),
        });
    }

    if platform == Platform::YouTubeShorts && duration > SHORTS_MAX_SECONDS {
        conflicts.push(Conflict {
            code: ConflictCode::ShortsLimit,
            severity: Severity::Block,
            message: format!("YouTube Shorts cannot exceed {SHORTS_MAX_SECONDS} seconds"),
            fix: format!(
                "Reduce duration to {SHORTS_MAX_SECONDS}s or less, or switch platform to standard YouTube."
            ),
        });
    }

    if structure_id == "wave" && duration < WAVE_MIN_SECONDS {
        conflicts.push(Conflict {
            code: ConflictCode::WaveCompression,
            severity: Severity::Block,
            message: "Duration too short for complex Wave structure".to_string(),
            fix: format!("Increase duration to at least {WAVE_MIN_SECONDS}s or switch to \"Surge\"."),
        });
    }

    if !conflicts.is_empty() {
        tracing::debug!(
            duration,
            structure = %structure_id,
            %platform,
            count = conflicts.len(),
            "configuration conflicts detected"
        );
    }

    conflicts
}

/// Whether any conflict is of BLOCK severity
#[must_use]
pub fn has_blocking(conflicts: &[Conflict]) -> bool {
    conflicts.iter().any(Conflict::is_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(conflicts: &[Conflict]) -> Vec<(ConflictCode, Severity)> {
        conflicts.iter().map(|c| (c.code, c.severity)).collect()
    }

    #[test]
    fn boredom_protocol_on_tiktok() {
        let conflicts = validate_configuration(10, "breathe", Platform::TikTok);
        assert_eq!(codes(&conflicts), [(ConflictCode::BoredomProtocol, Severity::Warning)]);
        assert!(!has_blocking(&conflicts));
    }

    #[test]
    fn shorts_limit_blocks() {
        let conflicts = validate_configuration(61, "surge", Platform::YouTubeShorts);
        assert_eq!(codes(&conflicts), [(ConflictCode::ShortsLimit, Severity::Block)]);
        assert!(has_blocking(&conflicts));
        assert!(validate_configuration(60, "surge", Platform::YouTubeShorts).is_empty());
    }

    #[test]
    fn wave_compression_blocks() {
        let conflicts = validate_configuration(15, "wave", Platform::TikTok);
        assert_eq!(codes(&conflicts), [(ConflictCode::WaveCompression, Severity::Block)]);
        assert!(validate_configuration(20, "wave", Platform::TikTok).is_empty());
    }

    #[test]
    fn clean_configuration() {
        assert!(validate_configuration(60, "surge", Platform::LinkedIn).is_empty());
    }

    #[test]
    fn structure_id_is_case_insensitive() {
        let conflicts = validate_configuration(10, "BREATHE", Platform::TikTok);
        assert_eq!(conflicts.len(), 1);
        let conflicts = validate_configuration(10, "Wave", Platform::LinkedIn);
        assert_eq!(codes(&conflicts), [(ConflictCode::WaveCompression, Severity::Block)]);
    }

    #[test]
    fn each_rule_needs_all_of_its_conditions() {
        assert!(validate_configuration(90, "wave", Platform::YouTube).is_empty());
        assert!(validate_configuration(10, "breathe", Platform::Instagram).is_empty());
        assert!(validate_configuration(120, "surge", Platform::YouTube).is_empty());
        let conflicts = validate_configuration(90, "wave", Platform::YouTubeShorts);
        assert_eq!(codes(&conflicts), [(ConflictCode::ShortsLimit, Severity::Block)]);
    }
}
