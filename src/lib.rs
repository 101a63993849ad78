//! # FlowMedix - Flowchart Normalization and Decision Simulation
//!
//! **FlowMedix** is the content core of a study platform. Authors paste JSON describing
//! flowcharts or branching decision scenarios; students walk those scenarios step by step.
//! This crate holds the two pieces of that system with real rules behind them:
//!
//! * the flowchart **normalizer**, which accepts every historical flowchart JSON shape and
//!   coerces it into one canonical [`FlowchartContent`](flowchart::FlowchartContent), and
//! * the **decision simulator**, a pure reducer that gates which steps a student may open
//!   and commits progress only when a correct answer is acknowledged.
//!
//! Around them sit the authoring [`Draft`](authoring::Draft), the student
//! [`StudySession`](viewer::StudySession), and the [`ContentStore`](store::ContentStore)
//! seam to the persistence backend.
//!
//! ## Core Workflow
//!
//! 1.  **Author**: an editor holds raw JSON in a `Draft`, which re-parses on every edit.
//! 2.  **Preview**: the draft is normalized (flowcharts) or decoded (decision flows).
//! 3.  **Publish**: the canonical JSON is written to the store.
//! 4.  **Study**: a `StudySession` loads the flow and feeds student input through the reducer;
//!     only a completion flag is written back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowmedix::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut store = MemoryStore::new();
//!     let normalizer = Normalizer::default();
//!
//!     // 1. Author and publish a decision flow.
//!     let mut draft = Draft::new(
//!         "triage",
//!         ContentKind::DecisionFlow,
//!         r#"{ "title": "Triage", "steps": [
//!             { "id": 1, "title": "Airway", "question": "Is the airway clear?",
//!               "options": [ { "id": "yes", "label": "Yes", "outcome": "Good", "next": 2 },
//!                            { "id": "no", "label": "No", "outcome": "Open it first", "status": "error" } ] },
//!             { "id": 2, "title": "Breathing", "question": "Breathing normally?",
//!               "options": [ { "id": "yes", "label": "Yes", "outcome": "Done" } ] }
//!         ] }"#,
//!     );
//!     draft.publish(&mut store, &normalizer)?;
//!
//!     // 2. A student opens it and answers the first question.
//!     let mut session = StudySession::open(&store, "triage")?;
//!     session.dispatch(SimulatorEvent::SelectStep(StepId::Number(1)));
//!     session.dispatch(SimulatorEvent::ChooseOption("yes".to_string()));
//!     session.dispatch(SimulatorEvent::AcknowledgeSuccess);
//!
//!     assert_eq!(session.state().unlocked(), &[StepId::Number(1), StepId::Number(2)]);
//!     session.record_completion(&mut store)?;
//!     Ok(())
//! }
//! ```

pub mod authoring;
pub mod config;
pub mod decision;
pub mod diagnostics;
pub mod error;
pub mod flowchart;
pub mod prelude;
pub mod store;
pub mod viewer;
