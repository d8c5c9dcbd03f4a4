//! The "current analysis" register of an interactive session.
//!
//! A single slot, not a queue: every submission overwrites it, and when two
//! runs overlap the one that finishes last wins. Only [`Session::submit`]
//! and [`Session::reset`] write to it.

use crate::error::GENERIC_FAILURE_MESSAGE;
use crate::orchestrator::{AnalysisOutcome, Pipeline};
use futures::FutureExt;
use log::{error, info};
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the presentation layer shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    /// A run is in flight
    pub loading: bool,
    /// Message of the last failed run
    pub error: Option<String>,
    /// HTTP status matching `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_status: Option<u16>,
    /// Outcome of the last successful run
    pub result: Option<AnalysisOutcome>,
}

/// Shared handle to the session slot
#[derive(Clone, Default)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the pipeline for `input` and records the outcome in the slot
    ///
    /// Blank input is ignored. The returned state is the slot as this run
    /// left it.
    pub async fn submit(&self, pipeline: &Pipeline, input: &str) -> SessionState {
        if input.trim().is_empty() {
            return self.snapshot().await;
        }

        {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.error = None;
            state.error_status = None;
            state.result = None;
        }

        let outcome = AssertUnwindSafe(pipeline.run(input)).catch_unwind().await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match outcome {
            Ok(Ok(result)) => {
                info!("Stored analysis for {}/{}", result.metadata.owner, result.metadata.name);
                state.result = Some(result);
                state.error = None;
                state.error_status = None;
            }
            Ok(Err(e)) => {
                error!("Analysis failed: {}", e);
                state.result = None;
                state.error = Some(e.user_message());
                state.error_status = Some(e.status_code());
            }
            Err(panic) => {
                error!("Analysis panicked");
                state.result = None;
                state.error = Some(panic_message(panic.as_ref()));
                state.error_status = Some(500);
            }
        }
        state.clone()
    }

    /// Clears the slot so a new repository can be entered ("start over")
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.error = None;
        state.error_status = None;
        state.result = None;
    }

    /// Copy of the slot for display
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}
