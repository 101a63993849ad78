//! The editing side of the platform: a JSON draft that can be previewed and published.
//!
//! A [`Draft`] re-parses its text on every edit. While the text is not valid JSON both
//! preview and publish are refused, and a failed publish leaves the text untouched so the
//! author can simply retry.

use crate::decision::DecisionFlowData;
use crate::error::{AuthoringError, ContentError, StoreError};
use crate::flowchart::{FlowchartContent, Normalizer};
use crate::store::ContentStore;
use serde_json::Value;
use tracing::{info, warn};

/// What kind of content a draft holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Flowchart,
    DecisionFlow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftStatus {
    Valid,
    InvalidJson(String),
}

/// The rendered preview of a valid draft.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Flowchart(FlowchartContent),
    Decision(DecisionFlowData),
}

impl Preview {
    /// `true` when the preview should show the "no content" state.
    pub fn is_empty(&self) -> bool {
        match self {
            Preview::Flowchart(content) => content.is_empty(),
            Preview::Decision(flow) => flow.steps.is_empty(),
        }
    }

    /// The canonical JSON that publishing this preview would persist.
    pub fn to_json(&self) -> Value {
        match self {
            Preview::Flowchart(content) => content.to_json(),
            Preview::Decision(flow) => flow.to_json(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Draft {
    key: String,
    kind: ContentKind,
    text: String,
    parsed: Result<Value, ContentError>,
    last_error: Option<StoreError>,
}

impl Draft {
    pub fn new(key: impl Into<String>, kind: ContentKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            key: key.into(),
            kind,
            parsed: parse(&text),
            text,
            last_error: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.parsed = parse(&self.text);
    }

    pub fn status(&self) -> DraftStatus {
        match &self.parsed {
            Ok(_) => DraftStatus::Valid,
            Err(e) => DraftStatus::InvalidJson(e.to_string()),
        }
    }

    pub fn can_publish(&self) -> bool {
        self.parsed.is_ok()
    }

    /// The store error from the most recent failed publish, cleared by a successful one.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn preview(&self, normalizer: &Normalizer) -> Result<Preview, ContentError> {
        let value = self.parsed.as_ref().map_err(|e| e.clone())?;
        match self.kind {
            ContentKind::Flowchart => Ok(Preview::Flowchart(normalizer.normalize(value))),
            ContentKind::DecisionFlow => {
                DecisionFlowData::from_value(value.clone()).map(Preview::Decision)
            }
        }
    }

    /// Writes the canonical form of the draft to `store` under the draft's key.
    pub fn publish<S: ContentStore + ?Sized>(
        &mut self,
        store: &mut S,
        normalizer: &Normalizer,
    ) -> Result<(), AuthoringError> {
        if let Err(e) = &self.parsed {
            return Err(AuthoringError::InvalidJson {
                key: self.key.clone(),
                message: e.to_string(),
            });
        }

        let canonical = self.preview(normalizer)?.to_json();
        match store.save(&self.key, canonical) {
            Ok(()) => {
                info!(key = %self.key, kind = ?self.kind, "Published content");
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Publishing failed, draft kept");
                self.last_error = Some(e.clone());
                Err(e.into())
            }
        }
    }
}

fn parse(text: &str) -> Result<Value, ContentError> {
    serde_json::from_str(text).map_err(|e| ContentError::JsonParse(e.to_string()))
}
