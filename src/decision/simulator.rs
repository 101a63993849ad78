use super::definition::{DecisionFlowData, DecisionOption, DecisionStep, OptionStatus, StepId};
use super::map::{StepBadge, step_badges};
use tracing::debug;

/// Confirmation shown for a correct option that carries no feedback text of its own.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Correct! Continue to the next step.";

/// Which screen of the simulator is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Overview of all steps with their locked/current/completed badges.
    #[default]
    Map,
    /// A single step's question and options.
    Decision,
}

/// Feedback produced by choosing an option, waiting for the student to act on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Success {
        message: String,
        next: Option<StepId>,
    },
    Error {
        message: String,
        next: Option<StepId>,
    },
}

impl Feedback {
    fn for_option(option: &DecisionOption) -> Self {
        match option.status {
            OptionStatus::Error => Feedback::Error {
                message: option
                    .feedback
                    .clone()
                    .unwrap_or_else(|| option.outcome.clone()),
                next: option.next.clone(),
            },
            OptionStatus::Success => Feedback::Success {
                message: option
                    .feedback
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                next: option.next.clone(),
            },
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Feedback::Success { message, .. } | Feedback::Error { message, .. } => message,
        }
    }

    pub fn next(&self) -> Option<&StepId> {
        match self {
            Feedback::Success { next, .. } | Feedback::Error { next, .. } => next.as_ref(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Feedback::Error { .. })
    }
}

/// Student input driving the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorEvent {
    SelectStep(StepId),
    /// Picks an option of the selected step by its id.
    ChooseOption(String),
    /// Commits a pending success outcome ("next step").
    AcknowledgeSuccess,
    /// Closes a pending error alert, advancing to the option's `next` step when it has one.
    DismissError,
    BackToMap,
}

/// Ephemeral per-session progress. Only [`reduce`] changes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatorState {
    selected_step: Option<StepId>,
    unlocked: Vec<StepId>,
    view: View,
    pending: Option<Feedback>,
    finished: bool,
}

impl SimulatorState {
    /// Starts on the map with only the first step unlocked.
    pub fn new(flow: &DecisionFlowData) -> Self {
        Self {
            unlocked: flow.first_step().map(|s| s.id.clone()).into_iter().collect(),
            ..Self::default()
        }
    }

    /// `false` for a flow without steps; such a session accepts no input.
    pub fn is_ready(&self) -> bool {
        !self.unlocked.is_empty()
    }

    pub fn selected_step(&self) -> Option<&StepId> {
        self.selected_step.as_ref()
    }

    /// Unlocked steps in the order they were unlocked.
    pub fn unlocked(&self) -> &[StepId] {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: &StepId) -> bool {
        self.unlocked.contains(id)
    }

    /// The most recently unlocked step, highlighted on the map.
    pub fn current_step(&self) -> Option<&StepId> {
        self.unlocked.last()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn pending(&self) -> Option<&Feedback> {
        self.pending.as_ref()
    }

    /// Set once a success outcome without a `next` step has been acknowledged.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn advance_to(&mut self, next: StepId) {
        if !self.unlocked.contains(&next) {
            self.unlocked.push(next.clone());
        }
        self.selected_step = Some(next);
        self.view = View::Map;
    }
}

/// Applies one event to the session state.
///
/// Events that are not valid in the current state are ignored and the state is returned
/// unchanged. `unlocked` only ever grows, and only acknowledgements grow it.
pub fn reduce(
    flow: &DecisionFlowData,
    mut state: SimulatorState,
    event: SimulatorEvent,
) -> SimulatorState {
    if !state.is_ready() {
        debug!(?event, "Ignoring event for a flow without steps");
        return state;
    }

    match event {
        SimulatorEvent::SelectStep(id) => {
            // A dangling `next` id may be unlocked without naming a real step; it stays unreachable.
            if !state.is_unlocked(&id) || flow.step(&id).is_none() {
                debug!(step = %id, "Ignoring selection of a locked step");
                return state;
            }
            state.selected_step = Some(id);
            state.pending = None;
            state.view = View::Decision;
        }
        SimulatorEvent::ChooseOption(option_id) => {
            if state.view != View::Decision {
                debug!(option = %option_id, "Ignoring option choice outside the decision view");
                return state;
            }
            let option = state
                .selected_step
                .as_ref()
                .and_then(|id| flow.step(id))
                .and_then(|step| step.option(&option_id));
            match option {
                Some(option) => state.pending = Some(Feedback::for_option(option)),
                None => debug!(option = %option_id, "Ignoring unknown option"),
            }
        }
        SimulatorEvent::AcknowledgeSuccess => match state.pending.take() {
            Some(Feedback::Success {
                next: Some(next), ..
            }) => state.advance_to(next),
            Some(Feedback::Success { next: None, .. }) => {
                state.finished = true;
                state.view = View::Map;
            }
            other => {
                debug!("Ignoring acknowledgement without a pending success");
                state.pending = other;
            }
        },
        SimulatorEvent::DismissError => match state.pending.take() {
            Some(Feedback::Error {
                next: Some(next), ..
            }) => state.advance_to(next),
            // No progression target: the same step is presented again.
            Some(Feedback::Error { next: None, .. }) => {}
            other => {
                debug!("Ignoring dismissal without a pending error");
                state.pending = other;
            }
        },
        SimulatorEvent::BackToMap => {
            if state.view != View::Decision {
                return state;
            }
            state.pending = None;
            state.view = View::Map;
        }
    }

    state
}

/// Owns a flow together with its session state and feeds events through [`reduce`].
#[derive(Debug, Clone)]
pub struct DecisionSimulator {
    flow: DecisionFlowData,
    state: SimulatorState,
}

impl DecisionSimulator {
    pub fn new(flow: DecisionFlowData) -> Self {
        let state = SimulatorState::new(&flow);
        Self { flow, state }
    }

    pub fn flow(&self) -> &DecisionFlowData {
        &self.flow
    }

    pub fn state(&self) -> &SimulatorState {
        &self.state
    }

    pub fn dispatch(&mut self, event: SimulatorEvent) -> &SimulatorState {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(&self.flow, state, event);
        &self.state
    }

    /// The step open in the decision view, if any.
    pub fn active_step(&self) -> Option<&DecisionStep> {
        if self.state.view != View::Decision {
            return None;
        }
        self.state.selected_step().and_then(|id| self.flow.step(id))
    }

    pub fn badges(&self) -> Vec<StepBadge> {
        step_badges(&self.flow, &self.state)
    }

    pub fn select_step(&mut self, id: impl Into<StepId>) -> &SimulatorState {
        self.dispatch(SimulatorEvent::SelectStep(id.into()))
    }

    pub fn choose_option(&mut self, option_id: &str) -> &SimulatorState {
        self.dispatch(SimulatorEvent::ChooseOption(option_id.to_string()))
    }

    pub fn acknowledge_success(&mut self) -> &SimulatorState {
        self.dispatch(SimulatorEvent::AcknowledgeSuccess)
    }

    pub fn dismiss_error(&mut self) -> &SimulatorState {
        self.dispatch(SimulatorEvent::DismissError)
    }

    pub fn back_to_map(&mut self) -> &SimulatorState {
        self.dispatch(SimulatorEvent::BackToMap)
    }
}
