use crate::decision::{DecisionFlowData, StepId};
use crate::flowchart::FlowchartContent;
use ahash::AHashSet;
use itertools::Itertools;
use std::fmt;

/// A non-fatal problem found in authored content.
///
/// None of these stop content from loading; they point at places where the renderer or the
/// simulator will quietly do less than the author probably meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    DuplicateNodeId(String),
    DanglingEdge {
        edge_id: String,
        missing_node_id: String,
    },
    DuplicateStepId(StepId),
    /// The option unlocks a step that does not exist, so progression stalls there.
    DanglingNext {
        step_id: StepId,
        option_id: String,
        missing_step_id: StepId,
    },
    StepWithoutOptions(StepId),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateNodeId(id) => write!(f, "Node id '{}' is used more than once", id),
            Diagnostic::DanglingEdge {
                edge_id,
                missing_node_id,
            } => write!(
                f,
                "Edge '{}' references node '{}', which does not exist",
                edge_id, missing_node_id
            ),
            Diagnostic::DuplicateStepId(id) => write!(f, "Step id '{}' is used more than once", id),
            Diagnostic::DanglingNext {
                step_id,
                option_id,
                missing_step_id,
            } => write!(
                f,
                "Option '{}' of step '{}' leads to step '{}', which does not exist",
                option_id, step_id, missing_step_id
            ),
            Diagnostic::StepWithoutOptions(id) => write!(f, "Step '{}' has no options", id),
        }
    }
}

pub fn check_flowchart(content: &FlowchartContent) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = content
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .duplicates()
        .map(|id| Diagnostic::DuplicateNodeId(id.to_string()))
        .collect();

    let known: AHashSet<&str> = content.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &content.edges {
        for endpoint in [&edge.source, &edge.target].into_iter().dedup() {
            if !known.contains(endpoint.as_str()) {
                diagnostics.push(Diagnostic::DanglingEdge {
                    edge_id: edge.id.clone(),
                    missing_node_id: endpoint.clone(),
                });
            }
        }
    }
    diagnostics
}

pub fn check_decision_flow(flow: &DecisionFlowData) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = flow
        .steps
        .iter()
        .map(|s| &s.id)
        .duplicates()
        .map(|id| Diagnostic::DuplicateStepId(id.clone()))
        .collect();

    let known: AHashSet<&StepId> = flow.steps.iter().map(|s| &s.id).collect();
    for step in &flow.steps {
        if step.options.is_empty() {
            diagnostics.push(Diagnostic::StepWithoutOptions(step.id.clone()));
        }
        for option in &step.options {
            if let Some(next) = option.next.as_ref().filter(|next| !known.contains(next)) {
                diagnostics.push(Diagnostic::DanglingNext {
                    step_id: step.id.clone(),
                    option_id: option.id.clone(),
                    missing_step_id: next.clone(),
                });
            }
        }
    }
    diagnostics
}
