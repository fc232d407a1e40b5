//! Structure modifiers for speech-heavy content

use crate::types::{CutSpeed, SoundDensity, StructureTemplate};

/// Cap sound density and cut speed so dialogue stays intelligible
///
/// MAX/HIGH density drops to MED and FAST cuts slow to MODERATE. Returns a
/// new template; the argument is never modified. Applying twice is the same
/// as applying once.
#[must_use]
pub fn apply_dialogue_constraints(template: &StructureTemplate) -> StructureTemplate {
    let mut modified = template.clone();
    for segment in &mut modified.segments {
        if segment.sound_density.is_high_energy() {
            segment.sound_density = SoundDensity::Med;
        }
        if segment.cut_speed_guidance == CutSpeed::Fast {
            segment.cut_speed_guidance = CutSpeed::Moderate;
        }
    }
    modified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, get_by_id};

    #[test]
    fn surge_under_dialogue() {
        let surge = get_by_id("surge").unwrap();
        let modified = apply_dialogue_constraints(surge);

        let densities: Vec<_> = modified.segments.iter().map(|s| s.sound_density).collect();
        assert_eq!(
            densities,
            [
                SoundDensity::Med,
                SoundDensity::Med,
                SoundDensity::Med,
                SoundDensity::Med,
                SoundDensity::Low
            ]
        );
        let cuts: Vec<_> = modified.segments.iter().map(|s| s.cut_speed_guidance).collect();
        assert_eq!(
            cuts,
            [
                CutSpeed::Moderate,
                CutSpeed::Accel,
                CutSpeed::Moderate,
                CutSpeed::Moderate,
                CutSpeed::Decel
            ]
        );
    }

    #[test]
    fn leaves_catalog_untouched() {
        let before = get_by_id("drop").unwrap().clone();
        let _ = apply_dialogue_constraints(get_by_id("drop").unwrap());
        assert_eq!(get_by_id("drop").unwrap(), &before);
    }

    #[test]
    fn idempotent_over_catalog() {
        for template in catalog().all() {
            let once = apply_dialogue_constraints(template);
            let twice = apply_dialogue_constraints(&once);
            assert_eq!(once, twice, "{}", template.id);
            assert_eq!(once.id, template.id);
            assert_eq!(once.percentage_total(), 100);
        }
    }
}
