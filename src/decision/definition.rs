use crate::error::ContentError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::error::Category;
use std::fmt;

/// Identifier of a decision step. Authors write either numbers or strings.
///
/// Comparison is strict: `StepId::Number(1)` and `StepId::Text("1")` are different steps.
/// Whole floats such as `1.0` decode as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum StepId {
    Number(i64),
    Text(String),
}

impl StepId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
                .map(StepId::Number),
            Value::String(s) => Some(StepId::Text(s.clone())),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for StepId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StepId::from_value(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid step id: {}", value)))
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Number(n) => write!(f, "{}", n),
            StepId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StepId {
    fn from(value: i64) -> Self {
        StepId::Number(value)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        StepId::Text(value.to_string())
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        StepId::Text(value)
    }
}

/// Whether picking an option is a correct move.
///
/// Only the string `"error"` marks a wrong move; anything else, including a missing,
/// `null` or unknown status, decodes as `Success`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionStatus {
    #[default]
    Success,
    Error,
}

impl<'de> Deserialize<'de> for OptionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if s == "error" => OptionStatus::Error,
            _ => OptionStatus::Success,
        })
    }
}

/// Text fields tolerate `null` and non-string scalars.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A `next` that is not a usable id is treated as absent.
fn lenient_next<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<StepId>, D::Error> {
    Ok(StepId::from_value(&Value::deserialize(deserializer)?))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub outcome: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_next",
        skip_serializing_if = "Option::is_none"
    )]
    pub next: Option<StepId>,
    #[serde(default)]
    pub status: OptionStatus,
    #[serde(
        default,
        rename = "isCorrect",
        alias = "is_correct",
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionStep {
    pub id: StepId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<DecisionOption>,
}

/// A `null` option list reads as no options.
fn lenient_options<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<DecisionOption>, D::Error> {
    Ok(Option::<Vec<DecisionOption>>::deserialize(deserializer)?.unwrap_or_default())
}

impl DecisionStep {
    pub fn option(&self, option_id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// A complete branching scenario, held immutably for one simulator session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionFlowData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(default)]
    pub steps: Vec<DecisionStep>,
}

impl DecisionFlowData {
    /// Parses authored JSON text. Syntax errors and shape errors are reported separately.
    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        serde_json::from_str(text).map_err(|e| match e.classify() {
            Category::Data => ContentError::decode("decision flow", e),
            Category::Syntax | Category::Eof | Category::Io => {
                ContentError::JsonParse(e.to_string())
            }
        })
    }

    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        serde_json::from_value(value).map_err(|e| ContentError::decode("decision flow", e))
    }

    /// The canonical JSON form, with every option status spelled out.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn step(&self, id: &StepId) -> Option<&DecisionStep> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn first_step(&self) -> Option<&DecisionStep> {
        self.steps.first()
    }
}
