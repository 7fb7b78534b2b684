//! Per-file and per-pass reporting types.

use serde::Serialize;

/// Why a file produced no new points.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unchanged,
    TooLarge,
}

/// Result of pushing one file through the pipeline, consumed by the
/// calling process for reporting.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FileOutcome {
    pub indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

impl FileOutcome {
    pub fn indexed(chunks: usize) -> Self {
        Self {
            indexed: true,
            chunks: Some(chunks),
            reason: None,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            indexed: false,
            chunks: None,
            reason: Some(SkipReason::Unchanged),
        }
    }

    pub fn too_large() -> Self {
        Self {
            indexed: false,
            chunks: None,
            reason: Some(SkipReason::TooLarge),
        }
    }
}

/// Aggregate counters for one full pass.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct PassSummary {
    pub indexed: usize,
    pub unchanged: usize,
    pub too_large: usize,
    pub failed: usize,
    pub purged_paths: usize,
}

impl PassSummary {
    pub(crate) fn record(&mut self, outcome: &FileOutcome) {
        if outcome.indexed {
            self.indexed += 1;
        } else {
            match outcome.reason {
                Some(SkipReason::Unchanged) => self.unchanged += 1,
                Some(SkipReason::TooLarge) => self.too_large += 1,
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_to_the_reported_shape() {
        let json = serde_json::to_value(FileOutcome::indexed(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "indexed": true, "chunks": 3 }));

        let json = serde_json::to_value(FileOutcome::unchanged()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "indexed": false, "reason": "unchanged" })
        );

        let json = serde_json::to_value(FileOutcome::too_large()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "indexed": false, "reason": "too_large" })
        );
    }
}
