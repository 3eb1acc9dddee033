use super::definition::{Answer, AssessmentConfig, Question, ResultBucket};
use crate::error::{BundleError, GraphError};
use crate::graph::QuestionGraph;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;

/// The complete, fetched definition of one assessment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssessmentBundle {
    pub config: AssessmentConfig,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub buckets: Vec<ResultBucket>,
}

impl AssessmentBundle {
    /// Builds the runnable graph for this bundle.
    pub fn to_graph(&self) -> Result<QuestionGraph, GraphError> {
        let mut builder = QuestionGraph::builder(self.questions.clone(), self.answers.clone())
            .with_buckets(self.buckets.clone());
        if let Some(entry) = &self.config.entry_question_id {
            builder = builder.with_entry_question(entry);
        }
        builder.build()
    }

    /// Parses a bundle from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Saves the bundle to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), BundleError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| BundleError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a bundle from a file, picking JSON or bincode by extension.
    pub fn from_file(path: &str) -> Result<Self, BundleError> {
        let io_error = |source| BundleError::Io {
            path: path.to_string(),
            source,
        };
        if path.ends_with(".json") {
            let content = fs::read_to_string(path).map_err(io_error)?;
            Self::from_json(&content)
        } else {
            let bytes = fs::read(path).map_err(io_error)?;
            Self::from_bytes(&bytes)
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BundleError> {
        encode_to_vec(self, standard()).map_err(|e| BundleError::Encode(e.to_string()))
    }

    /// Deserializes a bundle from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BundleError> {
        decode_from_slice(bytes, standard())
            .map(|(bundle, _)| bundle)
            .map_err(|e| BundleError::Decode(e.to_string()))
    }
}
