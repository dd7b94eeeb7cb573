// src/extract/report.rs

use serde::{Deserialize, Serialize};

/// The extractor child's sole output, parsed from one line of JSON.
///
/// Either `{"tasks": ["default", "watch", ...]}` or
/// `{"error": {"message": "..."}}`. An empty `tasks` list is a successful
/// report: the gulpfile loaded fine and registered nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractorReport {
    Tasks { tasks: Vec<String> },
    Failure { error: ExtractorError },
}

/// Diagnostic payload of a failed extraction. The message is logged, never
/// parsed; the provider only cares that extraction failed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorError {
    pub message: String,
}

impl ExtractorReport {
    pub fn tasks<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tasks {
            tasks: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: ExtractorError {
                message: message.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}
