//! Evaluator - composite scoring plus the bounded decision history
//!
//! Scores one option at a time against the rubric, adjusted by the contextual
//! profile. Every evaluation appends a `DecisionRecord` to an in-memory FIFO
//! history and publishes `decision-logged` and `evaluation-completed` events.

use crate::events::{CoreEvent, EventBus};
use crate::profile::ContextualProfile;
use crate::rubric::{signals, EvaluationBreakdown};
use crate::types::Timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;
use uuid::Uuid;

/// An opaque option under evaluation
///
/// `content` is the only field the rubric inspects; `metadata` is carried
/// through untouched for the caller's benefit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOption {
    /// Caller-assigned identifier
    pub id: String,

    /// Free-form content scanned by the signal tables
    pub content: String,

    /// Opaque payload, never interpreted by the core
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ActionOption {
    /// Create an option with empty metadata
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Append-only log entry for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Unique identifier
    pub id: Uuid,

    /// The evaluated option's identifier
    pub option_id: String,

    /// Region label of the profile in effect
    pub region: String,

    /// Full per-criterion breakdown
    pub breakdown: EvaluationBreakdown,

    /// When this evaluation happened
    pub timestamp: Timestamp,
}

/// Deterministic rubric evaluator with FIFO-bounded history
#[derive(Debug)]
pub struct Evaluator {
    history: VecDeque<DecisionRecord>,
    capacity: usize,
}

impl Evaluator {
    /// Create an evaluator retaining at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Evaluate one option against the rubric under the given profile
    ///
    /// Deterministic for identical `(option, profile)` pairs: the breakdown
    /// is bit-identical across calls. Appends a `DecisionRecord` (evicting
    /// the oldest past capacity) and publishes the evaluation events.
    pub fn evaluate(
        &mut self,
        option: &ActionOption,
        profile: &ContextualProfile,
        bus: &mut EventBus,
    ) -> EvaluationBreakdown {
        let started = Instant::now();
        let breakdown = EvaluationBreakdown::compute(&option.content, profile);

        let record = DecisionRecord {
            id: Uuid::new_v4(),
            option_id: option.id.clone(),
            region: profile.region().to_string(),
            breakdown: breakdown.clone(),
            timestamp: Utc::now(),
        };

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(record.clone());

        bus.publish(CoreEvent::DecisionLogged { record });
        bus.publish(CoreEvent::EvaluationCompleted {
            composite: breakdown.composite,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });

        breakdown
    }

    /// Reflective score for an option's content
    pub fn reflective_score(&self, option: &ActionOption) -> f64 {
        signals::reflective_score(&option.content)
    }

    /// Retained decision records, oldest first
    pub fn history(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.history.iter()
    }

    /// Number of retained records
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop all retained records
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> ContextualProfile {
        ContextualProfile::neutral()
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let mut evaluator = Evaluator::new(10);
        let mut bus = EventBus::new();
        let option = ActionOption::new("a", "help and support everyone fairly");
        let profile = neutral();

        let first = evaluator.evaluate(&option, &profile, &mut bus);
        let second = evaluator.evaluate(&option, &profile, &mut bus);

        assert_eq!(first, second);
        assert_eq!(first.composite.to_bits(), second.composite.to_bits());
    }

    #[test]
    fn test_evaluate_appends_history() {
        let mut evaluator = Evaluator::new(10);
        let mut bus = EventBus::new();

        evaluator.evaluate(&ActionOption::new("a", "proceed"), &neutral(), &mut bus);
        evaluator.evaluate(&ActionOption::new("b", "proceed"), &neutral(), &mut bus);

        assert_eq!(evaluator.history_len(), 2);
        let ids: Vec<&str> = evaluator.history().map(|r| r.option_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_history_evicts_fifo() {
        let mut evaluator = Evaluator::new(2);
        let mut bus = EventBus::new();

        for id in ["a", "b", "c"] {
            evaluator.evaluate(&ActionOption::new(id, "proceed"), &neutral(), &mut bus);
        }

        assert_eq!(evaluator.history_len(), 2);
        let ids: Vec<&str> = evaluator.history().map(|r| r.option_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_evaluate_emits_events_in_order() {
        let mut evaluator = Evaluator::new(10);
        let mut bus = EventBus::new();
        let rx = bus.subscribe();

        evaluator.evaluate(&ActionOption::new("a", "proceed"), &neutral(), &mut bus);

        assert_eq!(rx.try_recv().unwrap().name(), "decision-logged");
        assert_eq!(rx.try_recv().unwrap().name(), "evaluation-completed");
    }

    #[test]
    fn test_record_carries_region() {
        let mut evaluator = Evaluator::new(10);
        let mut bus = EventBus::new();
        let profile = ContextualProfile::new(Vec::new(), 1.0, "BR");

        evaluator.evaluate(&ActionOption::new("a", "proceed"), &profile, &mut bus);

        assert_eq!(evaluator.history().next().unwrap().region, "BR");
    }
}
