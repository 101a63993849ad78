//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the flowmedix crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowmedix::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/flowchart.json")?;
//! let content = Normalizer::default().normalize_str(&text);
//! let laid_out = apply_grid_fallback(&content);
//! println!("{} nodes, {} edges", laid_out.nodes.len(), laid_out.edges.len());
//! # Ok(())
//! # }
//! ```

// Flowchart normalization
pub use crate::flowchart::{
    FlowEdge, FlowNode, FlowchartContent, GridLayout, NodeData, NodeKind, NormalizedContent,
    Normalizer, Position, ShapeDecoder, Viewport, apply_grid_fallback,
};

// Decision simulation
pub use crate::decision::{
    DecisionFlowData, DecisionOption, DecisionSimulator, DecisionStep, Feedback, MapFormatter,
    OptionStatus, SimulatorEvent, SimulatorState, StepBadge, StepId, StepStatus, View, reduce,
};

// Authoring, viewing and persistence
pub use crate::authoring::{ContentKind, Draft, DraftStatus, Preview};
pub use crate::config::Config;
pub use crate::diagnostics::{Diagnostic, check_decision_flow, check_flowchart};
pub use crate::store::{ContentStore, MemoryStore};
pub use crate::viewer::{StudySession, load_flowchart};

// Error types
pub use crate::error::{AuthoringError, ConfigError, ContentError, StoreError, ViewerError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
