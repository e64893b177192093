//! Candidates and collapsed states
//!
//! A `Candidate` pairs an option with the register snapshot it was generated
//! from; it lives from generation to collapse and is discarded afterwards
//! except for the single winner, which is embedded in the resulting `State`.
//! A `State` is the public snapshot handed to the caller after every collapse
//! or correction; the engine keeps no history of past states.

use crate::evaluator::ActionOption;
use crate::register::Register;
use crate::types::Timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scored, not-yet-committed response path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The option this path would commit to
    pub option: ActionOption,

    /// Independent snapshot of the register at generation time
    ///
    /// Never an alias: normalization mutates in place and must not corrupt a
    /// sibling candidate's copy.
    pub register: Register,

    /// Composite alignment score from the rubric
    pub alignment: f64,

    /// Secondary reflective score
    pub reflective: f64,

    /// Probability weight; always 1/max_allowed over the candidate set
    pub probability: f64,

    /// When this candidate was generated
    pub created_at: Timestamp,
}

impl Candidate {
    /// Combined selection score used by the collapser
    pub fn combined_score(&self) -> f64 {
        0.6 * self.alignment + 0.4 * self.reflective
    }
}

/// Record of one applied correction
///
/// Carries the pre-correction register so the adjustment stays reversible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Blake3 hex digest of the correction payload
    pub payload_hash: String,

    /// Register before this correction was applied
    pub previous_register: Register,

    /// Composite alignment of the corrected state
    pub alignment: f64,

    /// When the correction was applied
    pub timestamp: Timestamp,
}

/// Reflective metadata attached to every state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectiveMeta {
    /// Self-reference score of the committed content
    pub self_reference: f64,

    /// Uncertainty markers found in the committed content
    pub uncertainty_markers: Vec<String>,

    /// Corrections applied since the last reset, oldest first
    pub corrections: Vec<CorrectionRecord>,
}

impl ReflectiveMeta {
    /// Metadata for a state with no reflective signal
    pub fn empty() -> Self {
        Self {
            self_reference: 0.0,
            uncertainty_markers: Vec::new(),
            corrections: Vec::new(),
        }
    }
}

/// Public snapshot produced by every collapse or correction
///
/// Ownership transfers to the caller; the engine retains only its own
/// register and counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Unique identifier
    pub id: Uuid,

    /// Copy of the committed register
    pub register: Register,

    /// Reflective metadata
    pub reflective: ReflectiveMeta,

    /// Composite alignment score of this state
    pub alignment: f64,

    /// Dispersion at commit time
    pub dispersion: f64,

    /// Surviving candidate set; singleton after a normal collapse, empty
    /// after an emergency collapse or a correction
    pub candidates: Vec<Candidate>,

    /// Whether this state came from the emergency path
    pub emergency: bool,

    /// When this state was produced
    pub timestamp: Timestamp,
}

impl State {
    /// Build a state stamped with the current time
    pub(crate) fn new(
        register: Register,
        reflective: ReflectiveMeta,
        alignment: f64,
        dispersion: f64,
        candidates: Vec<Candidate>,
        emergency: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            register,
            reflective,
            alignment,
            dispersion,
            candidates,
            emergency,
            timestamp: Utc::now(),
        }
    }

    /// Number of corrections this state carries
    pub fn correction_depth(&self) -> u32 {
        self.reflective.corrections.len() as u32
    }
}
