//! Noesis Core - deterministic decision evaluation over a cognitive register
//!
//! Noesis maintains a normalized state vector (the register), generates a
//! bounded set of candidate response paths scored against a seven-criterion
//! weighted rubric, and collapses the set to a single committed path under
//! declared safety thresholds.
//!
//! # Architecture
//!
//! The core is built from five collaborating pieces:
//!
//! 1. **Register** (`register`): fixed-length unit-norm state vector with an
//!    entropy-like dispersion metric
//! 2. **Rubric** (`rubric`): declared signal tables and contextual weight
//!    adjustment - data, not scattered logic
//! 3. **Evaluator** (`evaluator`): deterministic composite scoring with a
//!    FIFO-bounded decision history
//! 4. **Decision Engine** (`engine`): candidate generation and collapse, with
//!    an emergency fallback that never fails
//! 5. **Corrector** (`corrector`): bounded-depth, reversible adjustment of a
//!    previously collapsed state
//!
//! The contextual profile that tunes rubric weights comes from outside; this
//! crate consumes profiles, it never derives them.
//!
//! # Quick Start
//!
//! ```
//! use noesis_core::{ActionOption, ContextualProfile, DecisionEngine};
//!
//! let mut engine = DecisionEngine::with_defaults().unwrap();
//! let events = engine.subscribe();
//!
//! let profile = ContextualProfile::new(
//!     vec![("group-orientation".to_string(), 0.8)],
//!     0.9,
//!     "JP",
//! );
//!
//! let options = vec![
//!     ActionOption::new("assist", "help and support everyone fairly"),
//!     ActionOption::new("coerce", "force them to comply, harm if needed"),
//! ];
//!
//! let kept = engine.create_candidates(&profile, &options);
//! assert_eq!(kept, 1);
//!
//! let state = engine.collapse();
//! assert!(state.alignment >= 0.91);
//!
//! // Every transition was published to subscribers in order.
//! assert!(events.try_iter().count() > 0);
//! ```
//!
//! # Design Principles
//!
//! 1. **Determinism**: identical inputs produce bit-identical scores
//! 2. **Safety over surfacing**: collapse failures resolve through the
//!    emergency fallback, never through an error
//! 3. **Data over logic**: signal tables and weight rules are declared
//!    constants, unit-testable in isolation
//! 4. **Single owner**: all mutable state has exactly one logical owner, so
//!    no locking discipline is needed

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod corrector;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod profile;
pub mod register;
pub mod rubric;
pub mod types;

// Re-export commonly used types for convenience
pub use config::CoreConfig;
pub use corrector::Corrector;
pub use engine::candidate::{Candidate, CorrectionRecord, ReflectiveMeta, State};
pub use engine::DecisionEngine;
pub use error::{ConfigError, CorrectionError, NoesisError, Result};
pub use evaluator::{ActionOption, DecisionRecord, Evaluator};
pub use events::{CoreEvent, EventBus};
pub use profile::ContextualProfile;
pub use register::Register;
pub use rubric::{Criterion, EvaluationBreakdown};
pub use types::{Phase, ResourcePressure, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
