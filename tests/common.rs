//! Common test utilities for building flowchart and decision-flow fixtures.
use flowmedix::prelude::{ContentStore, DecisionFlowData, MemoryStore, StepId, StoreError};
use serde_json::{Value, json};

/// A canonical two-node flowchart with one edge and a custom viewport.
#[allow(dead_code)]
pub fn canonical_flowchart_json() -> Value {
    json!({
        "nodes": [
            {
                "id": "start",
                "type": "start",
                "position": { "x": 0.0, "y": 0.0 },
                "data": { "label": "Patient arrives", "icon": "door" }
            },
            {
                "id": "assess",
                "type": "decision",
                "position": { "x": 0.0, "y": 150.0 },
                "data": { "label": "Assess airway", "description": "Look, listen, feel", "color": "#ffaa00" }
            }
        ],
        "edges": [
            { "id": "e1", "source": "start", "target": "assess", "label": "then", "animated": true }
        ],
        "viewport": { "x": 10.0, "y": -20.0, "zoom": 0.75 }
    })
}

/// The simplified authoring shape with three steps.
#[allow(dead_code)]
pub fn steps_json() -> Value {
    json!({
        "steps": [
            { "id": "intake", "title": "Intake", "description": "Register the patient" },
            { "title": "Triage" },
            { "id": 7 }
        ]
    })
}

/// A → B on success, B → C on success, C terminal.
///
/// Step A also has an error option that jumps straight to C, and step B has an error
/// option with no target.
#[allow(dead_code)]
pub fn linear_flow() -> DecisionFlowData {
    DecisionFlowData::from_value(json!({
        "title": "Chest pain",
        "summary": "Work through the first minutes",
        "steps": [
            {
                "id": "A",
                "title": "First contact",
                "question": "What do you do first?",
                "options": [
                    { "id": "ecg", "label": "Get an ECG", "outcome": "Right call", "next": "B" },
                    {
                        "id": "wait",
                        "label": "Wait and see",
                        "outcome": "Delays care",
                        "feedback": "Waiting risks missing an infarct",
                        "status": "error",
                        "next": "C"
                    }
                ]
            },
            {
                "id": "B",
                "title": "ECG review",
                "question": "ST elevation present. Next?",
                "options": [
                    { "id": "cath", "label": "Activate cath lab", "outcome": "Good", "feedback": "Door-to-balloon clock started", "next": "C" },
                    { "id": "home", "label": "Send home", "outcome": "Unsafe discharge", "status": "error" }
                ]
            },
            {
                "id": "C",
                "title": "Handover",
                "question": "Who do you hand over to?",
                "options": [
                    { "id": "cardio", "label": "Cardiology", "outcome": "Done", "isCorrect": true }
                ]
            }
        ]
    }))
    .expect("fixture flow should decode")
}

/// The numeric-id scenario: step 0 branches to 1 on success and to 2 on error.
#[allow(dead_code)]
pub fn branching_flow() -> DecisionFlowData {
    DecisionFlowData::from_value(json!({
        "title": "Branching",
        "steps": [
            {
                "id": 0,
                "title": "Start",
                "question": "Proceed?",
                "options": [
                    { "id": "yes", "label": "Yes", "outcome": "ok", "status": "success", "next": 1 },
                    { "id": "no", "label": "No", "outcome": "not ok", "status": "error", "next": 2 }
                ]
            },
            { "id": 1, "title": "Yes path", "question": "?", "options": [] },
            { "id": 2, "title": "No path", "question": "?", "options": [] }
        ]
    }))
    .expect("fixture flow should decode")
}

#[allow(dead_code)]
pub fn id(value: &str) -> StepId {
    StepId::from(value)
}

/// A store whose writes always fail, standing in for a backend that rejects the request.
#[allow(dead_code)]
pub struct RejectingStore {
    pub inner: MemoryStore,
}

impl ContentStore for RejectingStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner.load(key)
    }

    fn save(&mut self, key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Rejected {
            key: key.to_string(),
            message: "permission denied for table modules".to_string(),
        })
    }

    fn set_completed(&mut self, module: &str, _completed: bool) -> Result<(), StoreError> {
        Err(StoreError::Rejected {
            key: module.to_string(),
            message: "permission denied for table progress".to_string(),
        })
    }

    fn is_completed(&self, module: &str) -> Result<bool, StoreError> {
        self.inner.is_completed(module)
    }
}
