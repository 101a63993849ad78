//! Tests for the flowchart normalizer and the grid-layout fallback.
mod common;
use common::*;
use flowmedix::prelude::*;
use serde_json::{Value, json};

fn empty_content() -> FlowchartContent {
    FlowchartContent {
        nodes: vec![],
        edges: vec![],
        viewport: Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        },
    }
}

#[test]
fn test_canonical_shape_passes_through() {
    let normalized = Normalizer::default().decode(&canonical_flowchart_json());

    assert_eq!(normalized.shape.as_deref(), Some("canonical"));
    let content = normalized.content;
    assert_eq!(content.nodes.len(), 2);
    assert_eq!(content.edges.len(), 1);
    assert_eq!(content.nodes[0].kind, NodeKind::Start);
    assert_eq!(content.nodes[1].kind, NodeKind::Decision);
    assert_eq!(
        content.nodes[1].data.description.as_deref(),
        Some("Look, listen, feel")
    );
    assert_eq!(content.edges[0].animated, Some(true));
    assert_eq!(
        content.viewport,
        Viewport {
            x: 10.0,
            y: -20.0,
            zoom: 0.75
        }
    );
}

#[test]
fn test_canonical_input_is_idempotent() {
    let normalizer = Normalizer::default();
    let input = canonical_flowchart_json();

    let once = normalizer.normalize(&input);
    let twice = normalizer.normalize(&once.to_json());
    assert_eq!(once, twice);

    // The canonical input itself deserializes to the same value.
    let direct: FlowchartContent =
        serde_json::from_value(input).expect("canonical fixture should deserialize");
    assert_eq!(once, direct);
}

#[test]
fn test_canonical_defaults_for_missing_edges_and_viewport() {
    let content = Normalizer::default().normalize(&json!({
        "nodes": [ { "id": "only", "data": { "label": "Alone" } } ]
    }));

    assert_eq!(content.nodes.len(), 1);
    assert!(content.edges.is_empty());
    assert_eq!(content.viewport, Viewport::default());
    assert_eq!(content.nodes[0].position, None);
}

#[test]
fn test_nested_content_shape() {
    let input = json!({ "title": "Module 3", "content": canonical_flowchart_json() });
    let normalized = Normalizer::default().decode(&input);

    assert_eq!(normalized.shape.as_deref(), Some("nested-content"));
    assert_eq!(normalized.content.nodes.len(), 2);
    assert_eq!(normalized.content.viewport.zoom, 0.75);
}

#[test]
fn test_legacy_wrapper_shape() {
    let normalizer = Normalizer::default();

    for key in ["raw_content", "rawContent"] {
        let mut input = serde_json::Map::new();
        input.insert(key.to_string(), canonical_flowchart_json());
        let normalized = normalizer.decode(&Value::Object(input));

        assert_eq!(normalized.shape.as_deref(), Some("legacy-wrapper"), "key {}", key);
        assert_eq!(normalized.content.nodes.len(), 2);
        assert_eq!(normalized.content.edges.len(), 1);
    }
}

#[test]
fn test_steps_shape_synthesizes_vertical_chain() {
    let normalized = Normalizer::default().decode(&steps_json());
    assert_eq!(normalized.shape.as_deref(), Some("steps"));

    let content = normalized.content;
    let ids: Vec<&str> = content.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["intake", "step-1", "7"]);

    let labels: Vec<&str> = content.nodes.iter().map(|n| n.data.label.as_str()).collect();
    assert_eq!(labels, vec!["Intake", "Triage", "Step 3"]);

    assert_eq!(
        content.nodes[0].data.description.as_deref(),
        Some("Register the patient")
    );
    assert!(content.nodes.iter().all(|n| n.kind == NodeKind::Action));

    let positions: Vec<Position> = content.nodes.iter().filter_map(|n| n.position).collect();
    assert_eq!(
        positions,
        vec![
            Position { x: 250.0, y: 0.0 },
            Position { x: 250.0, y: 150.0 },
            Position { x: 250.0, y: 300.0 },
        ]
    );

    assert_eq!(content.edges.len(), 2);
    assert_eq!(content.edges[0].source, "intake");
    assert_eq!(content.edges[0].target, "step-1");
    assert_eq!(content.edges[1].source, "step-1");
    assert_eq!(content.edges[1].target, "7");
    assert!(content.edges.iter().all(|e| e.animated == Some(true)));
    assert_eq!(content.viewport, Viewport::default());
}

#[test]
fn test_steps_shape_keeps_explicit_positions() {
    let content = Normalizer::default().normalize(&json!({
        "steps": [ { "title": "Placed", "position": { "x": 5, "y": 6 } }, { "title": "Auto" } ]
    }));

    assert_eq!(content.nodes[0].position, Some(Position { x: 5.0, y: 6.0 }));
    assert_eq!(
        content.nodes[1].position,
        Some(Position { x: 250.0, y: 150.0 })
    );
}

#[test]
fn test_single_step_has_no_edges() {
    let content = Normalizer::default().normalize(&json!({ "steps": [ { "title": "Only" } ] }));
    assert_eq!(content.nodes.len(), 1);
    assert!(content.edges.is_empty());
}

#[test]
fn test_shape_precedence() {
    let normalizer = Normalizer::default();

    // Top-level nodes win over everything else.
    let both = json!({
        "nodes": [ { "id": "n", "data": { "label": "N" } } ],
        "content": canonical_flowchart_json(),
        "steps": [ {}, {}, {} ]
    });
    let normalized = normalizer.decode(&both);
    assert_eq!(normalized.shape.as_deref(), Some("canonical"));
    assert_eq!(normalized.content.nodes.len(), 1);

    // A `content` object without a node array does not match; `steps` does.
    let fallthrough = json!({ "content": { "title": "draft" }, "steps": [ {}, {} ] });
    let normalized = normalizer.decode(&fallthrough);
    assert_eq!(normalized.shape.as_deref(), Some("steps"));
    assert_eq!(normalized.content.nodes.len(), 2);

    // `content` wins over a legacy wrapper.
    let wrapped = json!({
        "content": { "nodes": [ { "id": "c" } ] },
        "raw_content": canonical_flowchart_json()
    });
    let normalized = normalizer.decode(&wrapped);
    assert_eq!(normalized.shape.as_deref(), Some("nested-content"));
    assert_eq!(normalized.content.nodes[0].id, "c");
}

#[test]
fn test_malformed_input_yields_exact_empty_graph() {
    let normalizer = Normalizer::default();

    for value in [
        Value::Null,
        json!({}),
        json!([1, 2, 3]),
        json!("just a string"),
        json!({ "nodes": "not an array" }),
        json!({ "content": { "nodes": {} } }),
        json!({ "steps": {} }),
    ] {
        let normalized = normalizer.decode(&value);
        assert_eq!(normalized.content, empty_content(), "input {}", value);
        assert_eq!(normalized.shape, None);
    }

    for text in ["", "{ not json", "null", "{}"] {
        assert_eq!(normalizer.normalize_str(text), empty_content(), "text {:?}", text);
    }
    assert!(normalizer.normalize_str("{ not json").is_empty());
}

#[test]
fn test_normalize_str_parses_json_text() {
    let text = canonical_flowchart_json().to_string();
    let content = Normalizer::default().normalize_str(&text);
    assert_eq!(content.nodes.len(), 2);
}

#[test]
fn test_unknown_node_types_fall_back_to_action() {
    let content = Normalizer::default().normalize(&json!({
        "nodes": [
            { "id": "a", "type": "bogus", "data": { "label": "A" } },
            { "id": "b", "data": { "label": "B" } },
            { "id": "c", "type": "risk", "data": { "label": "C" } },
            { "id": "d", "type": 42, "data": { "label": "D" } },
            { "id": "e", "type": "Start", "data": { "label": "E" } }
        ]
    }));

    let kinds: Vec<NodeKind> = content.nodes.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Action,
            NodeKind::Action,
            NodeKind::Risk,
            NodeKind::Action,
            NodeKind::Action
        ]
    );
}

#[test]
fn test_lenient_node_and_edge_decoding() {
    let content = Normalizer::default().normalize(&json!({
        "nodes": [
            { "id": 5, "data": { "label": "Numeric" } },
            "garbage",
            { "data": { "label": "No id" } },
            { "id": "nolabel" },
            { "id": "badpos", "position": "top", "data": { "label": "Bad position" } }
        ],
        "edges": [
            { "source": "5", "target": "nolabel" },
            { "id": "broken", "source": "5" },
            { "id": "x", "source": 5, "target": "badpos", "animated": "yes" }
        ],
        "viewport": { "x": 3, "zoom": 0 }
    }));

    let ids: Vec<&str> = content.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["5", "node-2", "nolabel", "badpos"]);
    assert_eq!(content.nodes[2].data.label, "nolabel");
    assert_eq!(content.nodes[3].position, None);

    assert_eq!(content.edges.len(), 2);
    assert_eq!(content.edges[0].id, "e-5-nolabel");
    assert_eq!(content.edges[1].source, "5");
    assert_eq!(content.edges[1].animated, None);

    assert_eq!(
        content.viewport,
        Viewport {
            x: 3.0,
            y: 0.0,
            zoom: 1.0
        }
    );
}

#[test]
fn test_grid_fallback_places_unpositioned_nodes() {
    let content = Normalizer::default().normalize(&json!({
        "nodes": [
            { "id": "a" }, { "id": "b" }, { "id": "c" }, { "id": "d" }, { "id": "e" }
        ]
    }));
    let laid_out = apply_grid_fallback(&content);

    let positions: Vec<Position> = laid_out.nodes.iter().filter_map(|n| n.position).collect();
    assert_eq!(
        positions,
        vec![
            Position { x: 0.0, y: 0.0 },
            Position { x: 250.0, y: 0.0 },
            Position { x: 500.0, y: 0.0 },
            Position { x: 0.0, y: 150.0 },
            Position { x: 250.0, y: 150.0 },
        ]
    );
    // The input is untouched.
    assert!(content.nodes.iter().all(|n| n.position.is_none()));
}

#[test]
fn test_grid_fallback_keeps_explicit_positions() {
    let content = Normalizer::default().normalize(&json!({
        "nodes": [
            { "id": "a" },
            { "id": "b", "position": { "x": 999, "y": 999 } },
            { "id": "c" }
        ]
    }));
    let laid_out = GridLayout {
        columns: 2,
        cell_width: 100.0,
        cell_height: 80.0,
    }
    .apply(&content);

    assert_eq!(laid_out.nodes[0].position, Some(Position { x: 0.0, y: 0.0 }));
    assert_eq!(laid_out.nodes[1].position, Some(Position { x: 999.0, y: 999.0 }));
    assert_eq!(laid_out.nodes[2].position, Some(Position { x: 0.0, y: 80.0 }));
}

struct GraphKeyShape;

impl ShapeDecoder for GraphKeyShape {
    fn name(&self) -> &str {
        "graph-key"
    }

    fn matches(&self, value: &Value) -> bool {
        value.get("graph").is_some_and(Value::is_array)
    }

    fn extract(&self, value: &Value) -> FlowchartContent {
        let nodes = value["graph"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|label| FlowNode {
                        id: label.to_lowercase(),
                        kind: NodeKind::Action,
                        position: None,
                        data: NodeData {
                            label: label.to_string(),
                            ..NodeData::default()
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();
        FlowchartContent {
            nodes,
            ..FlowchartContent::default()
        }
    }
}

#[test]
fn test_builder_custom_decoder_and_legacy_keys() {
    let normalizer = Normalizer::builder()
        .with_legacy_keys(["flow"])
        .with_decoder(Box::new(GraphKeyShape))
        .build();

    assert_eq!(
        normalizer.shapes(),
        vec!["canonical", "nested-content", "legacy-wrapper", "steps", "graph-key"]
    );

    let custom = normalizer.decode(&json!({ "graph": ["Start", "End"] }));
    assert_eq!(custom.shape.as_deref(), Some("graph-key"));
    assert_eq!(custom.content.nodes.len(), 2);

    let legacy = normalizer.decode(&json!({ "flow": canonical_flowchart_json() }));
    assert_eq!(legacy.shape.as_deref(), Some("legacy-wrapper"));

    let old_key = normalizer.decode(&json!({ "raw_content": canonical_flowchart_json() }));
    assert_eq!(old_key.shape, None);
}

#[test]
fn test_normalizer_from_config() {
    let config = Config::from_yaml(
        "layout:\n  columns: 4\nlegacy_keys: [legacy_flow]\n",
    )
    .expect("config should parse");

    assert_eq!(config.layout.columns, 4);
    assert_eq!(config.layout.cell_width, 250.0);
    assert_eq!(config.store_path, None);

    let normalizer = Normalizer::from_config(&config);
    let content = normalizer.normalize(&json!({ "legacy_flow": canonical_flowchart_json() }));
    assert_eq!(content.nodes.len(), 2);
}

#[test]
fn test_invalid_config_is_reported() {
    let result = Config::from_yaml("layout: [1, 2");
    assert!(matches!(result, Err(ConfigError::Parse { .. })));

    let dir = tempfile::tempdir().expect("temp dir");
    let missing = Config::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "legacy_keys: {").expect("write config");
    match Config::from_file(&path) {
        Err(ConfigError::Parse { path: reported, .. }) => {
            assert_eq!(reported, path.display().to_string())
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}
