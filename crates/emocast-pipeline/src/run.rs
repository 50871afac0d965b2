// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-invocation stage state machine.
//!
//! `Validated -> Prompted -> Completed -> Persisted -> Mapped`, or `Failed`
//! from `Validated`/`Prompted`. A write failure skips `Persisted` and goes
//! straight to `Mapped`.

use std::time::Instant;

use emocast_core::{EmocastError, TokenUsage};
use strum::Display;
use tracing::{debug, info, warn};

/// The four pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Clean,
    Emotion,
    Keyphrase,
    Campaign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StageState {
    Validated,
    Prompted,
    Completed,
    Persisted,
    Mapped,
    Failed,
}

/// Tracks one invocation of a stage.
#[derive(Debug)]
pub struct StageRun {
    stage: Stage,
    state: StageState,
    started: Instant,
    duration_ms: u64,
}

impl StageRun {
    /// Starts a run whose input already passed validation.
    pub fn validated(stage: Stage) -> Self {
        debug!(%stage, "validated");
        Self {
            stage,
            state: StageState::Validated,
            started: Instant::now(),
            duration_ms: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Milliseconds from start to `Completed`.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn prompted(&mut self) {
        self.state = StageState::Prompted;
        debug!(stage = %self.stage, "prompted");
    }

    pub fn completed(&mut self, usage: &TokenUsage) {
        self.duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.state = StageState::Completed;
        debug!(
            stage = %self.stage,
            duration_ms = self.duration_ms,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "completed"
        );
    }

    /// Records the outcome of the ledger write. Write failures are logged
    /// and otherwise ignored.
    pub fn persisted(&mut self, record_id: &str, outcome: Result<(), EmocastError>) {
        match outcome {
            Ok(()) => {
                self.state = StageState::Persisted;
                info!(stage = %self.stage, record_id, duration_ms = self.duration_ms, "record persisted");
            }
            Err(e) => {
                warn!(
                    stage = %self.stage,
                    record_id,
                    error = %e,
                    "ledger write failed, returning unpersisted result"
                );
            }
        }
    }

    pub fn mapped(&mut self, record_id: &str) {
        self.state = StageState::Mapped;
        debug!(stage = %self.stage, record_id, "mapped");
    }

    /// Moves to `Failed` and returns the caller-facing error.
    ///
    /// Upstream and decoding failures become a generic `ComputeFailed`;
    /// their detail stays in the log.
    pub fn fail(&mut self, err: EmocastError) -> EmocastError {
        self.state = StageState::Failed;
        warn!(stage = %self.stage, error = %err, "stage failed");
        match err {
            EmocastError::UpstreamCallFailed { .. } | EmocastError::Malformed { .. } => {
                EmocastError::compute(format!("{} stage produced no usable result", self.stage))
            }
            other => other,
        }
    }
}

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as an ISO 8601 UTC timestamp with milliseconds.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut run = StageRun::validated(Stage::Emotion);
        assert_eq!(run.state(), StageState::Validated);
        run.prompted();
        run.completed(&TokenUsage::default());
        assert_eq!(run.state(), StageState::Completed);
        run.persisted("e-1", Ok(()));
        assert_eq!(run.state(), StageState::Persisted);
        run.mapped("e-1");
        assert_eq!(run.state(), StageState::Mapped);
    }

    #[test]
    fn write_failure_skips_persisted() {
        let mut run = StageRun::validated(Stage::Keyphrase);
        run.prompted();
        run.completed(&TokenUsage::default());
        run.persisted("k-1", Err(EmocastError::Internal("disk full".into())));
        assert_eq!(run.state(), StageState::Completed);
    }

    #[test]
    fn upstream_failure_becomes_compute_failed() {
        let mut run = StageRun::validated(Stage::Clean);
        run.prompted();
        let err = run.fail(EmocastError::UpstreamCallFailed {
            message: "connection reset".into(),
        });
        assert_eq!(run.state(), StageState::Failed);
        assert!(matches!(err, EmocastError::ComputeFailed { .. }));
        assert!(!err.to_string().contains("connection reset"));
    }

    #[test]
    fn dependency_failure_is_preserved() {
        let mut run = StageRun::validated(Stage::Campaign);
        let err = run.fail(EmocastError::dependency("brand", "b-9"));
        assert!(matches!(err, EmocastError::DependencyNotFound { .. }));
    }

    #[test]
    fn timestamps_are_utc_millis() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-03-01T00:00:00.000Z".len());
    }
}
