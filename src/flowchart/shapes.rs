use super::definition::{FlowEdge, FlowNode, FlowchartContent, NodeData, NodeKind, Position, Viewport};
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, warn};

/// Horizontal column used when synthesizing nodes from a `steps` list.
pub const STEP_COLUMN_X: f64 = 250.0;
/// Vertical distance between two synthesized step nodes.
pub const STEP_ROW_SPACING: f64 = 150.0;

/// Keys under which older authoring tools wrapped the flowchart payload.
pub const DEFAULT_LEGACY_KEYS: &[&str] = &["raw_content", "rawContent"];

/// Defines the contract for recognizing one JSON shape and extracting a flowchart from it.
///
/// Decoders are tried in order by the [`Normalizer`](super::Normalizer); the first one whose
/// `matches` returns `true` wins. `extract` must never fail: malformed elements are skipped
/// or defaulted instead.
pub trait ShapeDecoder: Send + Sync {
    fn name(&self) -> &str;
    fn matches(&self, value: &Value) -> bool;
    fn extract(&self, value: &Value) -> FlowchartContent;
}

/// The value already is a `{ nodes, edges?, viewport? }` graph.
pub struct CanonicalShape;

impl ShapeDecoder for CanonicalShape {
    fn name(&self) -> &str {
        "canonical"
    }

    fn matches(&self, value: &Value) -> bool {
        has_node_array(value)
    }

    fn extract(&self, value: &Value) -> FlowchartContent {
        decode_graph(value)
    }
}

/// The graph is wrapped in an object under one of a fixed set of keys.
pub struct WrappedShape {
    name: String,
    keys: Vec<String>,
}

impl WrappedShape {
    /// `{ content: { nodes, ... } }`
    pub fn content() -> Self {
        Self {
            name: "nested-content".to_string(),
            keys: vec!["content".to_string()],
        }
    }

    /// `{ <legacy key>: { nodes, ... } }`
    pub fn legacy<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "legacy-wrapper".to_string(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    fn inner<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.keys
            .iter()
            .filter_map(|key| value.get(key))
            .find(|inner| has_node_array(inner))
    }
}

impl ShapeDecoder for WrappedShape {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, value: &Value) -> bool {
        self.inner(value).is_some()
    }

    fn extract(&self, value: &Value) -> FlowchartContent {
        self.inner(value).map(decode_graph).unwrap_or_default()
    }
}

/// The simplified authoring shape: `{ steps: [{ id?, title?, description?, position? }] }`.
///
/// Each step becomes an `action` node stacked vertically, chained to the next one by an
/// animated edge.
pub struct StepsShape;

impl ShapeDecoder for StepsShape {
    fn name(&self) -> &str {
        "steps"
    }

    fn matches(&self, value: &Value) -> bool {
        value.get("steps").is_some_and(Value::is_array)
    }

    fn extract(&self, value: &Value) -> FlowchartContent {
        let steps = value
            .get("steps")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let nodes: Vec<FlowNode> = steps
            .iter()
            .enumerate()
            .map(|(index, step)| FlowNode {
                id: id_from(step.get("id")).unwrap_or_else(|| format!("step-{}", index)),
                kind: NodeKind::Action,
                position: Some(position_from(step.get("position")).unwrap_or(Position {
                    x: STEP_COLUMN_X,
                    y: index as f64 * STEP_ROW_SPACING,
                })),
                data: NodeData {
                    label: string_from(step.get("title"))
                        .unwrap_or_else(|| format!("Step {}", index + 1)),
                    description: string_from(step.get("description")),
                    icon: None,
                    color: None,
                },
            })
            .collect();

        let edges = nodes
            .iter()
            .tuple_windows()
            .map(|(from, to)| FlowEdge {
                id: FlowEdge::default_id(&from.id, &to.id),
                source: from.id.clone(),
                target: to.id.clone(),
                label: None,
                animated: Some(true),
            })
            .collect();

        FlowchartContent {
            nodes,
            edges,
            viewport: Viewport::default(),
        }
    }
}

fn has_node_array(value: &Value) -> bool {
    value.get("nodes").is_some_and(Value::is_array)
}

/// Reads a `{ nodes, edges?, viewport? }` object leniently.
pub(crate) fn decode_graph(value: &Value) -> FlowchartContent {
    let nodes = value
        .get("nodes")
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| decode_node(index, node))
                .collect()
        })
        .unwrap_or_default();

    let edges = value
        .get("edges")
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                .enumerate()
                .filter_map(|(index, edge)| decode_edge(index, edge))
                .collect()
        })
        .unwrap_or_default();

    FlowchartContent {
        nodes,
        edges,
        viewport: viewport_from(value.get("viewport")),
    }
}

fn decode_node(index: usize, node: &Value) -> Option<FlowNode> {
    if !node.is_object() {
        warn!(index, "Skipping flowchart node that is not an object");
        return None;
    }

    let id = id_from(node.get("id")).unwrap_or_else(|| format!("node-{}", index));

    let kind = match node.get("type").and_then(Value::as_str) {
        Some(name) => {
            let kind = NodeKind::from_name(name);
            if kind.as_str() != name {
                debug!(node_id = %id, type_name = name, "Unknown node type, falling back to action");
            }
            kind
        }
        None => NodeKind::Action,
    };

    let data = node.get("data");
    let field = |key: &str| string_from(data.and_then(|d| d.get(key)));
    let label = field("label")
        .or_else(|| string_from(node.get("label")))
        .unwrap_or_else(|| id.clone());

    Some(FlowNode {
        kind,
        position: position_from(node.get("position")),
        data: NodeData {
            label,
            description: field("description"),
            icon: field("icon"),
            color: field("color"),
        },
        id,
    })
}

fn decode_edge(index: usize, edge: &Value) -> Option<FlowEdge> {
    let (Some(source), Some(target)) = (id_from(edge.get("source")), id_from(edge.get("target")))
    else {
        warn!(index, "Dropping flowchart edge without a usable source and target");
        return None;
    };

    Some(FlowEdge {
        id: id_from(edge.get("id")).unwrap_or_else(|| FlowEdge::default_id(&source, &target)),
        label: string_from(edge.get("label")),
        animated: edge.get("animated").and_then(Value::as_bool),
        source,
        target,
    })
}

/// Ids are accepted as strings or numbers; numbers keep their JSON spelling.
fn id_from(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_from(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn position_from(value: Option<&Value>) -> Option<Position> {
    let value = value?;
    Some(Position {
        x: value.get("x")?.as_f64()?,
        y: value.get("y")?.as_f64()?,
    })
}

fn viewport_from(value: Option<&Value>) -> Viewport {
    let default = Viewport::default();
    let Some(value) = value.filter(|v| v.is_object()) else {
        return default;
    };
    let number = |key: &str| value.get(key).and_then(Value::as_f64);

    Viewport {
        x: number("x").unwrap_or(default.x),
        y: number("y").unwrap_or(default.y),
        zoom: number("zoom").filter(|z| *z > 0.0).unwrap_or(default.zoom),
    }
}
