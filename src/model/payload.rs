use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// An opaque, JSON-encoded payload authored in the admin editor.
///
/// On a human-readable wire the data service may send either a JSON string that
/// itself contains JSON, or the JSON object inline. Both are normalised to the
/// encoded string form. Binary formats always carry the plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encodes an inline JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self(s.clone()),
            other => Self(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the payload as a JSON object. Anything else yields `None`.
    fn object(&self) -> Option<serde_json::Map<String, Value>> {
        match serde_json::from_str::<Value>(&self.0) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

impl Serialize for EncodedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EncodedPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let value = Value::deserialize(deserializer)?;
            Ok(Self::from_json(&value))
        } else {
            String::deserialize(deserializer).map(Self)
        }
    }
}

impl From<&str> for EncodedPayload {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Value> for EncodedPayload {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

/// The routing instruction carried by an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerRoute {
    /// Continue with the named question.
    NextQuestion(String),
    /// Terminate the flow in the named result bucket.
    ResultBucket(String),
    /// No usable routing; the flow advances sequentially.
    Unrouted,
}

/// A decoded `answerValue`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerPayload {
    pub route: AnswerRoute,
    pub points: Option<f64>,
}

impl AnswerPayload {
    /// Decodes an answer payload. Never fails: anything that is not a JSON object with a
    /// non-empty `resultBucketKey` or `nextQuestionId` decodes to `AnswerRoute::Unrouted`.
    /// Ids are taken verbatim, like the ids in `Condition`.
    /// A bucket key wins over a next-question id when both are present.
    pub fn decode(payload: &EncodedPayload) -> Self {
        let Some(map) = payload.object() else {
            return Self {
                route: AnswerRoute::Unrouted,
                points: None,
            };
        };

        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let route = if let Some(key) = text("resultBucketKey") {
            AnswerRoute::ResultBucket(key)
        } else if let Some(id) = text("nextQuestionId") {
            AnswerRoute::NextQuestion(id)
        } else {
            AnswerRoute::Unrouted
        };

        let points = map.get("points").and_then(Value::as_f64);

        Self { route, points }
    }
}

/// A decoded `conditionalLogic`: show the question only if `question_id` was
/// answered with `answer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub question_id: String,
    pub answer_id: String,
}

impl Condition {
    /// Returns `None` for anything that does not carry both identifiers.
    pub fn decode(payload: &EncodedPayload) -> Option<Self> {
        let map = payload.object()?;
        let field = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(Self {
            question_id: field("questionId")?,
            answer_id: field("answerId")?,
        })
    }
}
