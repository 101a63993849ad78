use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical flowchart shape every accepted input is normalized into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowchartContent {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl FlowchartContent {
    /// An empty graph renders as the "no content" state rather than an error.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Serializes the content back into the JSON shape stored and rendered by the platform.
    pub fn to_json(&self) -> serde_json::Value {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// A single box in the flowchart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub data: NodeData,
}

/// The four node kinds the renderer knows how to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    #[default]
    Action,
    Decision,
    Risk,
}

impl NodeKind {
    /// Maps a raw `type` string onto a known kind. Unknown names fall back to `Action`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "start" => NodeKind::Start,
            "action" => NodeKind::Action,
            "decision" => NodeKind::Decision,
            "risk" => NodeKind::Risk,
            _ => NodeKind::Action,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Action => "action",
            NodeKind::Decision => "decision",
            NodeKind::Risk => "risk",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A directed connection between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
}

impl FlowEdge {
    pub(crate) fn default_id(source: &str, target: &str) -> String {
        format!("e-{}-{}", source, target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}
