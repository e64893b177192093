//! Declared signal tables for criterion and reflective scoring
//!
//! Each criterion scores from a fixed baseline, nudged by the presence of
//! positive and negative indicator phrases in the option content. Scanning is
//! case-insensitive substring presence; every table entry carries its own
//! delta so individual criteria are unit-testable in isolation.

use super::Criterion;
use crate::types::clamp01;

/// Baseline every criterion starts from before signal adjustment
pub const CRITERION_BASELINE: f64 = 0.93;

/// Baseline for the reflective score
pub const REFLECTIVE_BASELINE: f64 = 0.50;

/// Signal table for one criterion
#[derive(Debug, Clone, Copy)]
pub struct SignalRule {
    pub criterion: Criterion,
    pub positive: &'static [(&'static str, f64)],
    pub negative: &'static [(&'static str, f64)],
}

/// The declared per-criterion indicator tables
pub const SIGNAL_RULES: &[SignalRule] = &[
    SignalRule {
        criterion: Criterion::NonMaleficence,
        positive: &[("protect", 0.03), ("safe", 0.03), ("prevent harm", 0.04)],
        negative: &[
            ("harm", 0.10),
            ("hurt", 0.10),
            ("damage", 0.08),
            ("destroy", 0.12),
            ("attack", 0.12),
        ],
    },
    SignalRule {
        criterion: Criterion::Beneficence,
        positive: &[
            ("help", 0.03),
            ("support", 0.03),
            ("benefit", 0.03),
            ("improve", 0.02),
        ],
        negative: &[("neglect", 0.08), ("ignore", 0.06), ("abandon", 0.10)],
    },
    SignalRule {
        criterion: Criterion::Autonomy,
        positive: &[("consent", 0.04), ("choice", 0.03), ("voluntary", 0.03)],
        negative: &[
            ("force", 0.10),
            ("coerce", 0.12),
            ("manipulate", 0.12),
            ("override", 0.06),
        ],
    },
    SignalRule {
        criterion: Criterion::Fairness,
        positive: &[
            ("fair", 0.03),
            ("equal", 0.03),
            ("impartial", 0.04),
            ("everyone", 0.02),
        ],
        negative: &[
            ("discriminate", 0.12),
            ("bias", 0.08),
            ("exclude", 0.08),
            ("favor", 0.05),
        ],
    },
    SignalRule {
        criterion: Criterion::Transparency,
        positive: &[("explain", 0.03), ("disclose", 0.04), ("openly", 0.03)],
        negative: &[
            ("hide", 0.10),
            ("conceal", 0.10),
            ("deceive", 0.12),
            ("mislead", 0.12),
        ],
    },
    SignalRule {
        criterion: Criterion::Privacy,
        positive: &[
            ("private", 0.03),
            ("confidential", 0.04),
            ("anonymize", 0.04),
        ],
        negative: &[
            ("expose", 0.10),
            ("leak", 0.12),
            ("surveil", 0.10),
            ("track", 0.06),
        ],
    },
    SignalRule {
        criterion: Criterion::Responsibility,
        positive: &[
            ("accountable", 0.04),
            ("responsible", 0.03),
            ("own up", 0.04),
        ],
        negative: &[("blame", 0.08), ("deflect", 0.08), ("deny", 0.06)],
    },
];

/// Terms indicating self-reference, uncertainty, or willingness to revise
const REFLECTIVE_TERMS: &[(&str, f64)] = &[
    ("i think", 0.08),
    ("perhaps", 0.08),
    ("maybe", 0.08),
    ("uncertain", 0.10),
    ("reconsider", 0.10),
    ("reflect", 0.08),
    ("doubt", 0.08),
    ("revise", 0.08),
    ("question", 0.06),
    ("might", 0.06),
];

/// Overconfidence markers that suppress the reflective score
const OVERCONFIDENT_TERMS: &[(&str, f64)] = &[
    ("absolutely", 0.15),
    ("certainly", 0.12),
    ("without doubt", 0.15),
    ("guaranteed", 0.15),
    ("always right", 0.20),
    ("never wrong", 0.20),
];

/// Score one criterion over already-lowercased content
pub fn criterion_score(criterion: Criterion, lowered: &str) -> f64 {
    let rule = SIGNAL_RULES
        .iter()
        .find(|r| r.criterion == criterion)
        .expect("every criterion has a signal rule");

    let mut score = CRITERION_BASELINE;
    for &(signal, delta) in rule.positive {
        if lowered.contains(signal) {
            score += delta;
        }
    }
    for &(signal, delta) in rule.negative {
        if lowered.contains(signal) {
            score -= delta;
        }
    }
    clamp01(score)
}

/// Reflective score: density of self-referential and uncertainty markers
///
/// Overconfident phrasing pulls the score down; content below the reflective
/// threshold is treated as unsafe to collapse onto.
pub fn reflective_score(content: &str) -> f64 {
    let lowered = content.to_lowercase();

    let mut score = REFLECTIVE_BASELINE;
    for &(term, delta) in REFLECTIVE_TERMS {
        if lowered.contains(term) {
            score += delta;
        }
    }
    for &(term, delta) in OVERCONFIDENT_TERMS {
        if lowered.contains(term) {
            score -= delta;
        }
    }
    clamp01(score)
}

/// The reflective/uncertainty terms present in the content, in table order
pub fn reflective_markers(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    REFLECTIVE_TERMS
        .iter()
        .filter(|(term, _)| lowered.contains(term))
        .map(|(term, _)| term.to_string())
        .collect()
}
