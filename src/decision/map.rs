use super::definition::{DecisionFlowData, StepId};
use super::simulator::{SimulatorState, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Locked,
    /// The most recently unlocked step.
    Current,
    /// Unlocked earlier; the student has moved past it.
    Completed,
}

/// One entry of the map view.
#[derive(Debug, Clone, PartialEq)]
pub struct StepBadge {
    pub step_id: StepId,
    pub title: String,
    pub status: StepStatus,
}

/// Badges for every step, in presentation order.
pub fn step_badges(flow: &DecisionFlowData, state: &SimulatorState) -> Vec<StepBadge> {
    let current = state.current_step();
    flow.steps
        .iter()
        .map(|step| {
            let status = if current == Some(&step.id) {
                StepStatus::Current
            } else if state.is_unlocked(&step.id) {
                StepStatus::Completed
            } else {
                StepStatus::Locked
            };
            StepBadge {
                step_id: step.id.clone(),
                title: step.title.clone(),
                status,
            }
        })
        .collect()
}

/// Renders the simulator's map and decision views as plain text.
pub struct MapFormatter;

impl MapFormatter {
    pub fn format_map(flow: &DecisionFlowData, state: &SimulatorState) -> String {
        let mut out = String::new();
        if !flow.title.is_empty() {
            out.push_str(&format!("{}\n", flow.title));
        }
        if let Some(summary) = &flow.summary {
            out.push_str(&format!("{}\n", summary));
        }
        if !state.is_ready() {
            out.push_str("(no steps to show)\n");
            return out;
        }

        for badge in step_badges(flow, state) {
            out.push_str(&format!(
                "  {} {}. {}\n",
                Self::status_marker(badge.status),
                badge.step_id,
                Self::title_or_placeholder(&badge)
            ));
        }
        out
    }

    pub fn format_decision(flow: &DecisionFlowData, state: &SimulatorState) -> String {
        let Some(step) = state
            .selected_step()
            .filter(|_| state.view() == View::Decision)
            .and_then(|id| flow.step(id))
        else {
            return String::new();
        };

        let mut out = format!("{}\n{}\n", step.title, step.question);
        for option in &step.options {
            out.push_str(&format!("  ({}) {}\n", option.id, option.label));
        }
        if let Some(feedback) = state.pending() {
            let tag = if feedback.is_error() { "!" } else { "+" };
            out.push_str(&format!("{} {}\n", tag, feedback.message()));
        }
        out
    }

    fn status_marker(status: StepStatus) -> &'static str {
        match status {
            StepStatus::Locked => "[ ]",
            StepStatus::Current => "[>]",
            StepStatus::Completed => "[x]",
        }
    }

    fn title_or_placeholder(badge: &StepBadge) -> String {
        if badge.title.is_empty() {
            format!("Step {}", badge.step_id)
        } else {
            badge.title.clone()
        }
    }
}
