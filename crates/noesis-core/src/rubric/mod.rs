//! Scoring rubric - seven weighted criteria with contextual adjustment
//!
//! The rubric is data, not scattered logic: criterion signal tables live in
//! [`signals`], and the contextual weight adjustments below are a declared
//! table of (dimension, sense, threshold, deltas). Everything here is
//! deterministic arithmetic; identical inputs always produce bit-identical
//! breakdowns.

pub mod signals;

use crate::profile::ContextualProfile;
use crate::types::clamp01;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven fixed evaluation criteria, in scoring order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    NonMaleficence,
    Beneficence,
    Autonomy,
    Fairness,
    Transparency,
    Privacy,
    Responsibility,
}

impl Criterion {
    /// All criteria in their fixed scoring order
    pub const ALL: [Criterion; 7] = [
        Criterion::NonMaleficence,
        Criterion::Beneficence,
        Criterion::Autonomy,
        Criterion::Fairness,
        Criterion::Transparency,
        Criterion::Privacy,
        Criterion::Responsibility,
    ];

    /// Base weight before contextual adjustment (weights sum to 1.0)
    pub fn base_weight(self) -> f64 {
        match self {
            Criterion::NonMaleficence => 0.25,
            Criterion::Beneficence => 0.15,
            Criterion::Autonomy => 0.15,
            Criterion::Fairness => 0.15,
            Criterion::Transparency => 0.10,
            Criterion::Privacy => 0.10,
            Criterion::Responsibility => 0.10,
        }
    }

    /// Position in the fixed scoring order
    pub fn index(self) -> usize {
        Criterion::ALL
            .iter()
            .position(|&c| c == self)
            .expect("criterion is a member of ALL")
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Criterion::NonMaleficence => "non-maleficence",
            Criterion::Beneficence => "beneficence",
            Criterion::Autonomy => "autonomy",
            Criterion::Fairness => "fairness",
            Criterion::Transparency => "transparency",
            Criterion::Privacy => "privacy",
            Criterion::Responsibility => "responsibility",
        };
        write!(f, "{}", name)
    }
}

/// Which side of the threshold a dimension must fall on to fire a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Above,
    Below,
}

/// A contextual weight-adjustment rule
///
/// Fires when the named profile dimension crosses `threshold` in the given
/// `sense`; each tweak adds its delta to the criterion's weight. Adjusted
/// weights are clamped to be non-negative and deliberately not renormalized.
#[derive(Debug, Clone, Copy)]
pub struct WeightRule {
    pub dimension: &'static str,
    pub sense: Sense,
    pub threshold: f64,
    pub tweaks: &'static [(Criterion, f64)],
}

/// The declared contextual adjustment table
pub const WEIGHT_RULES: &[WeightRule] = &[
    WeightRule {
        dimension: "group-orientation",
        sense: Sense::Above,
        threshold: 0.7,
        tweaks: &[(Criterion::Fairness, 0.05), (Criterion::Autonomy, -0.05)],
    },
    WeightRule {
        dimension: "risk-tolerance",
        sense: Sense::Below,
        threshold: 0.3,
        tweaks: &[
            (Criterion::NonMaleficence, 0.05),
            (Criterion::Beneficence, -0.03),
        ],
    },
    WeightRule {
        dimension: "hierarchy-distance",
        sense: Sense::Above,
        threshold: 0.6,
        tweaks: &[
            (Criterion::Responsibility, 0.04),
            (Criterion::Transparency, -0.02),
        ],
    },
    WeightRule {
        dimension: "uncertainty-avoidance",
        sense: Sense::Above,
        threshold: 0.7,
        tweaks: &[(Criterion::Transparency, 0.03), (Criterion::Privacy, 0.02)],
    },
];

/// Per-criterion weights after applying every matching rule
///
/// Indexed by `Criterion::index()`. Weights never go negative; the sum may
/// drift from 1.0, which is why the composite is clamped after weighting.
pub fn adjusted_weights(profile: &ContextualProfile) -> [f64; 7] {
    let mut weights = [0.0; 7];
    for criterion in Criterion::ALL {
        weights[criterion.index()] = criterion.base_weight();
    }

    for rule in WEIGHT_RULES {
        let Some(value) = profile.dimension(rule.dimension) else {
            continue;
        };
        let fires = match rule.sense {
            Sense::Above => value > rule.threshold,
            Sense::Below => value < rule.threshold,
        };
        if !fires {
            continue;
        }
        for &(criterion, delta) in rule.tweaks {
            let slot = &mut weights[criterion.index()];
            *slot = (*slot + delta).max(0.0);
        }
    }

    weights
}

/// Score and adjusted weight for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub score: f64,
    pub weight: f64,
}

/// Full result of a rubric evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBreakdown {
    /// Per-criterion scores in the fixed scoring order
    pub scores: Vec<CriterionScore>,

    /// Weighted composite, clamped to [0, 1]
    pub composite: f64,
}

impl EvaluationBreakdown {
    /// Compute the breakdown for pre-scanned content
    pub fn compute(content: &str, profile: &ContextualProfile) -> Self {
        let lowered = content.to_lowercase();
        let weights = adjusted_weights(profile);

        let scores: Vec<CriterionScore> = Criterion::ALL
            .iter()
            .map(|&criterion| CriterionScore {
                criterion,
                score: signals::criterion_score(criterion, &lowered),
                weight: weights[criterion.index()],
            })
            .collect();

        let composite = clamp01(scores.iter().map(|s| s.score * s.weight).sum());

        Self { scores, composite }
    }

    /// Lookup a single criterion's entry
    pub fn get(&self, criterion: Criterion) -> Option<&CriterionScore> {
        self.scores.iter().find(|s| s.criterion == criterion)
    }
}
