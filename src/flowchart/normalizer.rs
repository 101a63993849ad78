use super::definition::FlowchartContent;
use super::shapes::{CanonicalShape, DEFAULT_LEGACY_KEYS, ShapeDecoder, StepsShape, WrappedShape};
use crate::config::Config;
use serde_json::Value;
use tracing::debug;

/// The outcome of a normalization run.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedContent {
    pub content: FlowchartContent,
    /// Name of the decoder that recognized the input, `None` when nothing matched.
    pub shape: Option<String>,
}

/// Coerces the several historical flowchart JSON shapes into one [`FlowchartContent`].
///
/// Decoders are tried in registration order and the first match wins:
///
/// 1. `canonical`: `{ nodes, edges?, viewport? }`
/// 2. `nested-content`: `{ content: { nodes, ... } }`
/// 3. `legacy-wrapper`: `{ raw_content: { nodes, ... } }` (keys configurable)
/// 4. `steps`: `{ steps: [...] }`, synthesized into a vertical chain
/// 5. any decoders added with [`NormalizerBuilder::with_decoder`]
///
/// When nothing matches the result is an empty graph. Normalization never fails.
pub struct Normalizer {
    decoders: Vec<Box<dyn ShapeDecoder>>,
}

pub struct NormalizerBuilder {
    legacy_keys: Vec<String>,
    extra: Vec<Box<dyn ShapeDecoder>>,
}

impl Default for NormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizerBuilder {
    pub fn new() -> Self {
        Self {
            legacy_keys: DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect(),
            extra: Vec::new(),
        }
    }

    pub fn with_legacy_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legacy_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_decoder(mut self, decoder: Box<dyn ShapeDecoder>) -> Self {
        self.extra.push(decoder);
        self
    }

    pub fn build(self) -> Normalizer {
        let mut decoders: Vec<Box<dyn ShapeDecoder>> = vec![
            Box::new(CanonicalShape),
            Box::new(WrappedShape::content()),
            Box::new(WrappedShape::legacy(self.legacy_keys)),
            Box::new(StepsShape),
        ];
        decoders.extend(self.extra);
        Normalizer { decoders }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        NormalizerBuilder::new().build()
    }
}

impl Normalizer {
    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::new()
    }

    pub fn from_config(config: &Config) -> Self {
        NormalizerBuilder::new()
            .with_legacy_keys(config.legacy_keys.iter().cloned())
            .build()
    }

    /// Names of the registered decoders, in the order they are tried.
    pub fn shapes(&self) -> Vec<&str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }

    pub fn decode(&self, value: &Value) -> NormalizedContent {
        match self.decoders.iter().find(|d| d.matches(value)) {
            Some(decoder) => {
                let content = decoder.extract(value);
                debug!(
                    shape = decoder.name(),
                    nodes = content.nodes.len(),
                    edges = content.edges.len(),
                    "Normalized flowchart content"
                );
                NormalizedContent {
                    content,
                    shape: Some(decoder.name().to_string()),
                }
            }
            None => {
                debug!("No flowchart shape matched, using an empty graph");
                NormalizedContent {
                    content: FlowchartContent::default(),
                    shape: None,
                }
            }
        }
    }

    /// Parses `text` as JSON first. Unparseable text yields an empty graph.
    pub fn decode_str(&self, text: &str) -> NormalizedContent {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => self.decode(&value),
            Err(e) => {
                debug!(error = %e, "Flowchart text is not valid JSON, using an empty graph");
                NormalizedContent {
                    content: FlowchartContent::default(),
                    shape: None,
                }
            }
        }
    }

    pub fn normalize(&self, value: &Value) -> FlowchartContent {
        self.decode(value).content
    }

    pub fn normalize_str(&self, text: &str) -> FlowchartContent {
        self.decode_str(text).content
    }
}
