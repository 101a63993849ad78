use crate::decision::{DecisionFlowData, DecisionSimulator, SimulatorEvent, SimulatorState, StepBadge};
use crate::error::{StoreError, ViewerError};
use crate::flowchart::{FlowchartContent, Normalizer};
use crate::store::ContentStore;
use tracing::{debug, info};

/// A student's walk through one published decision flow.
///
/// All interaction stays local; only the derived completion flag is written back.
#[derive(Debug, Clone)]
pub struct StudySession {
    module_key: String,
    simulator: DecisionSimulator,
}

impl StudySession {
    pub fn open<S: ContentStore + ?Sized>(
        store: &S,
        module_key: &str,
    ) -> Result<Self, ViewerError> {
        let value = store
            .load(module_key)?
            .ok_or_else(|| ViewerError::NotFound(module_key.to_string()))?;
        let flow = DecisionFlowData::from_value(value).map_err(|source| ViewerError::Content {
            key: module_key.to_string(),
            source,
        })?;
        debug!(module = module_key, steps = flow.steps.len(), "Opened study session");
        Ok(Self::from_flow(module_key, flow))
    }

    pub fn from_flow(module_key: impl Into<String>, flow: DecisionFlowData) -> Self {
        Self {
            module_key: module_key.into(),
            simulator: DecisionSimulator::new(flow),
        }
    }

    pub fn module_key(&self) -> &str {
        &self.module_key
    }

    pub fn simulator(&self) -> &DecisionSimulator {
        &self.simulator
    }

    pub fn state(&self) -> &SimulatorState {
        self.simulator.state()
    }

    pub fn badges(&self) -> Vec<StepBadge> {
        self.simulator.badges()
    }

    pub fn dispatch(&mut self, event: SimulatorEvent) -> &SimulatorState {
        self.simulator.dispatch(event)
    }

    /// Persists whether the student reached the end of the flow.
    ///
    /// A module already marked complete stays complete, so recording from a fresh session
    /// never clears earlier progress. On failure the session state is left as it was; the
    /// caller may retry.
    pub fn record_completion<S: ContentStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<bool, StoreError> {
        let completed = self.state().is_finished() || store.is_completed(&self.module_key)?;
        store.set_completed(&self.module_key, completed)?;
        info!(module = %self.module_key, completed, "Recorded module completion");
        Ok(completed)
    }
}

/// Loads a published flowchart for display. A module that was never published shows as empty.
pub fn load_flowchart<S: ContentStore + ?Sized>(
    store: &S,
    key: &str,
    normalizer: &Normalizer,
) -> Result<FlowchartContent, StoreError> {
    Ok(store
        .load(key)?
        .map(|value| normalizer.normalize(&value))
        .unwrap_or_default())
}
