use crate::model::GateBehavior;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of an assessment run.
///
/// `email-capture` (PRE_GATED only) → `questions` → `post-email-capture`
/// (POST_GATED only) → `complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    EmailCapture,
    Questions,
    PostEmailCapture,
    Complete,
}

impl Phase {
    /// The phase a fresh run starts in.
    pub fn initial(gate: GateBehavior) -> Self {
        match gate {
            GateBehavior::PreGated => Phase::EmailCapture,
            GateBehavior::Ungated | GateBehavior::PostGated => Phase::Questions,
        }
    }

    pub fn is_lead_capture(&self) -> bool {
        matches!(self, Phase::EmailCapture | Phase::PostEmailCapture)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::EmailCapture => "email-capture",
            Phase::Questions => "questions",
            Phase::PostEmailCapture => "post-email-capture",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}
