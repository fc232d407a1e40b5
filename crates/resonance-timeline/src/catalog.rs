//! Structure catalog
//!
//! The seven built-in emotional structures, validated once and frozen for the
//! life of the process. Lookups are case-insensitive (keys are upper-cased).

use crate::error::CatalogError;
use crate::types::{
    CutSpeed, Pacing, PacingStart, SegmentTemplate, SegmentType, SoundDensity, StructureTemplate,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Structure used when a lookup misses
pub const DEFAULT_STRUCTURE_ID: &str = "surge";

/// Number of built-in structures
pub const STRUCTURE_COUNT: usize = 7;

static CATALOG: Lazy<StructureCatalog> = Lazy::new(|| {
    StructureCatalog::from_templates(builtin_templates())
        .unwrap_or_else(|e| panic!("built-in structure catalog is invalid: {e}"))
});

/// Immutable table of structure templates keyed by upper-cased id
#[derive(Debug, Clone)]
pub struct StructureCatalog {
    templates: IndexMap<String, StructureTemplate>,
}

impl StructureCatalog {
    /// Build a catalog, rejecting templates that break the sum-to-100 rule
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found, in template order.
    pub fn from_templates(
        templates: impl IntoIterator<Item = StructureTemplate>,
    ) -> Result<Self, CatalogError> {
        let mut map = IndexMap::new();
        for template in templates {
            validate_template(&template)?;
            let key = template.id.to_uppercase();
            if map.contains_key(&key) {
                return Err(CatalogError::DuplicateId(template.id));
            }
            map.insert(key, template);
        }
        Ok(Self { templates: map })
    }

    /// Case-insensitive lookup
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&StructureTemplate> {
        self.templates.get(&id.to_uppercase())
    }

    /// Whether the id resolves
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(&id.to_uppercase())
    }

    /// Templates in declaration order
    pub fn all(&self) -> impl Iterator<Item = &StructureTemplate> {
        self.templates.values()
    }

    /// Lower-case ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.values().map(|t| t.id.as_str())
    }

    /// Number of templates
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when the catalog holds no templates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Process-wide built-in catalog
///
/// # Panics
///
/// On first access, if a built-in template fails validation.
pub fn catalog() -> &'static StructureCatalog {
    &CATALOG
}

/// Case-insensitive lookup in the built-in catalog
#[must_use]
pub fn get_by_id(id: &str) -> Option<&'static StructureTemplate> {
    catalog().get_by_id(id)
}

/// Check a template's segment percentages
///
/// # Errors
///
/// [`CatalogError::Empty`] for a template without segments,
/// [`CatalogError::PercentageSum`] when percentages do not total 100.
pub fn validate_template(template: &StructureTemplate) -> Result<(), CatalogError> {
    if template.segments.is_empty() {
        return Err(CatalogError::Empty(template.id.clone()));
    }
    let total = template.percentage_total();
    if total != 100 {
        return Err(CatalogError::PercentageSum {
            id: template.id.clone(),
            total,
        });
    }
    Ok(())
}

fn seg(
    segment_type: SegmentType,
    base_percentage: u32,
    cut: CutSpeed,
    density: SoundDensity,
) -> SegmentTemplate {
    SegmentTemplate::new(segment_type, base_percentage, cut, density)
}

fn structure(
    id: &str,
    name: &str,
    description: &str,
    pacing: Pacing,
    segments: Vec<SegmentTemplate>,
) -> StructureTemplate {
    StructureTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        pacing,
        segments,
    }
}

#[allow(clippy::too_many_lines)]
fn builtin_templates() -> Vec<StructureTemplate> {
    use CutSpeed::{Accel, Constant, Decel, Fast, Slow};
    use SegmentType::{Break, Build, Hook, Peak, Resolve, Sustain};
    use SoundDensity::{High, Low, Max, Med, Silence};

    vec![
        structure(
            "surge",
            "Surge",
            "Fast rise → Early peak → Quick release. Best for high-energy retention.",
            Pacing {
                start: PacingStart::Fast,
                peak_position_max: 0.6,
                silence_required: true,
            },
            vec![
                seg(Hook, 15, Fast, Med),
                seg(Build, 35, Accel, High),
                seg(Peak, 10, Fast, Max),
                seg(Sustain, 25, Fast, High),
                seg(Resolve, 15, Decel, Low),
            ],
        ),
        structure(
            "climb",
            "Climb",
            "Slow start → Steady rise → Late payoff. Best for narrative authority.",
            Pacing {
                start: PacingStart::Slow,
                peak_position_max: 0.9,
                silence_required: false,
            },
            vec![
                seg(Hook, 20, Slow, Low),
                seg(Build, 65, Accel, Med),
                seg(Peak, 15, Fast, Max),
            ],
        ),
        structure(
            "pulse",
            "Pulse",
            "Constant rhythm, no extreme peaks. Hypnotic and cool.",
            Pacing {
                start: PacingStart::Constant,
                peak_position_max: 1.0,
                silence_required: false,
            },
            vec![
                seg(Sustain, 25, Constant, Med),
                seg(Sustain, 25, Constant, Med),
                seg(Sustain, 25, Constant, Med),
                seg(Sustain, 25, Constant, Med),
            ],
        ),
        structure(
            "drop",
            "Drop",
            "Normal energy → Silence → Impact. Binary structure.",
            Pacing {
                start: PacingStart::Constant,
                peak_position_max: 0.6,
                silence_required: true,
            },
            vec![
                seg(Build, 50, Constant, Med),
                seg(Break, 5, Slow, Silence),
                seg(Peak, 45, Fast, Max),
            ],
        ),
        structure(
            "breathe",
            "Breathe",
            "Minimal energy, long holds. Antithesis of retention hacking.",
            Pacing {
                start: PacingStart::Slow,
                peak_position_max: 0.0,
                silence_required: false,
            },
            vec![seg(Sustain, 50, Slow, Low), seg(Resolve, 50, Slow, Silence)],
        ),
        structure(
            "wave",
            "Wave",
            "Multiple rises and falls. Only valid for longer durations.",
            Pacing {
                start: PacingStart::Fast,
                peak_position_max: 0.8,
                silence_required: false,
            },
            vec![
                seg(Hook, 15, Fast, Med),
                seg(Peak, 10, Fast, High),
                seg(Resolve, 20, Slow, Low),
                seg(Build, 30, Accel, Med),
                seg(Peak, 10, Fast, Max),
                seg(Resolve, 15, Decel, Low),
            ],
        ),
        structure(
            "resolve",
            "Resolve",
            "Early tension → Calm authority. Inverted Surge.",
            Pacing {
                start: PacingStart::Fast,
                peak_position_max: 0.2,
                silence_required: true,
            },
            vec![
                seg(Peak, 20, Fast, Max),
                seg(Sustain, 30, Decel, Med),
                seg(Resolve, 50, Slow, Silence),
            ],
        ),
    ]
}
