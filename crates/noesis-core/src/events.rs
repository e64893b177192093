//! Core events and the observer bus
//!
//! Every externally observable transition is published as a `CoreEvent`.
//! Delivery order is deterministic: subscribers receive events in the order
//! they subscribed, and events arrive in the order they were published, so
//! event sequences are directly assertable in tests.

use crate::engine::candidate::State;
use crate::evaluator::DecisionRecord;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Events emitted by the decision core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoreEvent {
    /// The register was committed to a new state
    StateChanged { state: Box<State> },

    /// Candidate generation finished
    CandidatesCreated { count: usize },

    /// A collapse selected a candidate normally
    CollapseApplied { state: Box<State> },

    /// A collapse fell back to the safe emergency register
    CollapseEmergency { state: Box<State> },

    /// A rubric evaluation finished
    EvaluationCompleted { composite: f64, elapsed_ms: u64 },

    /// A decision record was appended to the history
    DecisionLogged { record: DecisionRecord },

    /// A correction was applied
    TemporalCorrection { depth: u32, score: f64 },

    /// Normalization hit the all-zero register
    ///
    /// Non-fatal by design: the register is left unchanged and callers
    /// observe the degenerate case here instead of through an error.
    RegisterDegenerate { phase: String },
}

impl CoreEvent {
    /// Short stable name, useful for logging and sequence assertions
    pub fn name(&self) -> &'static str {
        match self {
            CoreEvent::StateChanged { .. } => "state-changed",
            CoreEvent::CandidatesCreated { .. } => "candidates-created",
            CoreEvent::CollapseApplied { .. } => "collapse-applied",
            CoreEvent::CollapseEmergency { .. } => "collapse-emergency",
            CoreEvent::EvaluationCompleted { .. } => "evaluation-completed",
            CoreEvent::DecisionLogged { .. } => "decision-logged",
            CoreEvent::TemporalCorrection { .. } => "temporal-correction",
            CoreEvent::RegisterDegenerate { .. } => "register-degenerate",
        }
    }
}

/// Fan-out bus with registration-order delivery
///
/// Subscribers get an `mpsc::Receiver`; `publish` clones the event to every
/// live subscriber in the order they registered. Subscribers that dropped
/// their receiver are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<CoreEvent>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Receiver<CoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Publish an event to every live subscriber, in registration order
    pub fn publish(&mut self, event: CoreEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Number of currently registered subscribers
    ///
    /// Disconnected subscribers still count until the next publish prunes
    /// them.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let rx_a = bus.subscribe();
        let rx_b = bus.subscribe();

        bus.publish(CoreEvent::CandidatesCreated { count: 2 });

        assert!(matches!(
            rx_a.try_recv().unwrap(),
            CoreEvent::CandidatesCreated { count: 2 }
        ));
        assert!(matches!(
            rx_b.try_recv().unwrap(),
            CoreEvent::CandidatesCreated { count: 2 }
        ));
    }

    #[test]
    fn test_events_arrive_in_publish_order() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();

        bus.publish(CoreEvent::CandidatesCreated { count: 1 });
        bus.publish(CoreEvent::EvaluationCompleted {
            composite: 0.93,
            elapsed_ms: 1,
        });

        assert_eq!(rx.try_recv().unwrap().name(), "candidates-created");
        assert_eq!(rx.try_recv().unwrap().name(), "evaluation-completed");
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut bus = EventBus::new();
        let rx = bus.subscribe();
        drop(rx);

        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(CoreEvent::CandidatesCreated { count: 0 });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = CoreEvent::TemporalCorrection {
            depth: 3,
            score: 0.94,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TemporalCorrection");
        assert_eq!(json["data"]["depth"], 3);
    }
}
