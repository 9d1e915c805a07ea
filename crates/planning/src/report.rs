//! Uniform stage result envelope.
//!
//! Every pipeline stage answers with a `StageReport`: a success flag, a human
//! readable message and the stage payload when it succeeded. Failed stages
//! carry the error kind so hosts can branch without parsing messages.

use serde::{Deserialize, Serialize};

use crate::error::PlanningError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> StageReport<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(err: &PlanningError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            data: None,
            error: Some(err.kind().to_string()),
        }
    }

    /// Drop the payload, keeping only the outcome.
    pub fn outcome(&self, stage: &str) -> StageOutcome {
        StageOutcome {
            stage: stage.to_string(),
            success: self.success,
            message: self.message.clone(),
        }
    }
}

/// Payload-free record of one stage run, used for pipeline summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: String,
    pub success: bool,
    pub message: String,
}
