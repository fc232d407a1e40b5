//! Fixed-width text rendering of a timeline

use crate::partition::timeline_sum;
use crate::types::CalculatedSegment;
use std::fmt::Write;

const RULE: &str = "+-----+----------+-------+-------------+----------+---------+";

/// Render a timeline as an aligned table
#[must_use]
pub fn render_timeline(segments: &[CalculatedSegment]) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str("|   # | Type     |   Dur | Time range  | Speed    | Density |\n");
    out.push_str(RULE);
    out.push('\n');

    for (i, seg) in segments.iter().enumerate() {
        let range = format!("{:>3}s-{:>3}s", seg.start_time, seg.end_time);
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "| {:>3} | {:<8} | {:>4}s | {:<11} | {:<8} | {:<7} |",
            i + 1,
            seg.segment_type.as_str(),
            seg.duration,
            range,
            seg.cut_speed_guidance.as_str(),
            seg.sound_density.as_str(),
        );
    }

    out.push_str(RULE);
    out.push('\n');
    let _ = writeln!(out, "  TOTAL: {}s", timeline_sum(segments));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_by_id;
    use crate::partition::partition;
    use crate::types::Platform;

    #[test]
    fn renders_every_segment_and_total() {
        let timeline = partition(60, get_by_id("surge").unwrap(), Some(Platform::TikTok));
        let text = render_timeline(&timeline);

        assert!(text.contains("| HOOK     |    3s |   0s-  3s   | FAST     | MED     |"));
        assert!(text.contains("| BUILD    |   27s |   3s- 30s   | ACCEL    | HIGH    |"));
        assert!(text.ends_with("  TOTAL: 60s\n"));
        assert_eq!(text.lines().count(), 4 + timeline.len() + 1);
    }
}
