//! Simulated remote endpoint
//!
//! Stands in for a network boundary: each call sleeps for a randomized
//! latency and then answers either `200` with a small status payload or
//! `503` with no data. There is no retry and no backoff.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use ulid::Ulid;

pub const STATUS_OK: u16 = 200;
pub const STATUS_UNAVAILABLE: u16 = 503;

pub const OFFLINE_MESSAGE: &str = "BioReactor Offline";
pub const NOMINAL_MESSAGE: &str = "Data stream nominal";

/// Endpoints the explorer calls
pub const SEARCH_PATH: &str = "/search";
pub const STATUS_PATH: &str = "/status";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote call failed with status {status}: {message}")]
pub struct RemoteError {
    pub status: u16,
    pub message: String,
}

impl RemoteError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self { status: STATUS_UNAVAILABLE, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteResponse {
    pub status: u16,
    pub data: Value,
    /// Correlates this response with its log lines
    pub request_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedStep {
    pub latency: Duration,
    pub outcome: StepOutcome,
}

impl ScriptedStep {
    #[must_use]
    pub fn success(latency: Duration) -> Self {
        Self { latency, outcome: StepOutcome::Success }
    }

    #[must_use]
    pub fn failure(latency: Duration) -> Self {
        Self { latency, outcome: StepOutcome::Failure }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteBehavior {
    /// Uniform latency in `[latency_min, latency_max]`, independent failures.
    Random { latency_min: Duration, latency_max: Duration, failure_rate: f64, seed: Option<u64> },
    /// Steps are consumed in call order; the last one repeats once exhausted.
    Scripted(Vec<ScriptedStep>),
}

impl RemoteBehavior {
    /// Zero latency, never fails.
    #[must_use]
    pub fn instant() -> Self {
        Self::Scripted(vec![ScriptedStep::success(Duration::ZERO)])
    }
}

pub struct SimulatedRemote {
    behavior: RemoteBehavior,
    rng: Mutex<StdRng>,
    calls: AtomicU64,
    records_processed: usize,
}

impl SimulatedRemote {
    /// `records_processed` is echoed in every success payload.
    #[must_use]
    pub fn new(behavior: RemoteBehavior, records_processed: usize) -> Self {
        let rng = match &behavior {
            RemoteBehavior::Random { seed: Some(seed), .. } => StdRng::seed_from_u64(*seed),
            _ => StdRng::from_entropy(),
        };
        Self { behavior, rng: Mutex::new(rng), calls: AtomicU64::new(0), records_processed }
    }

    /// Number of calls started so far.
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub async fn call(&self, path: &str, payload: &Value) -> Result<RemoteResponse, RemoteError> {
        let index = self.calls.fetch_add(1, Ordering::Relaxed);
        let request_id = Ulid::new().to_string();
        let (latency, outcome) = self.plan(index);

        tracing::debug!(
            request_id = %request_id,
            path,
            payload = %payload,
            latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            "simulated remote call started"
        );

        tokio::time::sleep(latency).await;

        match outcome {
            StepOutcome::Success => {
                tracing::debug!(request_id = %request_id, path, "simulated remote call succeeded");
                Ok(RemoteResponse {
                    status: STATUS_OK,
                    data: json!({
                        "message": NOMINAL_MESSAGE,
                        "records_processed": self.records_processed,
                        "endpoint": path,
                    }),
                    request_id,
                })
            }
            StepOutcome::Failure => {
                tracing::warn!(
                    request_id = %request_id,
                    path,
                    status = STATUS_UNAVAILABLE,
                    "simulated remote call failed"
                );
                Err(RemoteError::unavailable(OFFLINE_MESSAGE))
            }
        }
    }

    fn plan(&self, index: u64) -> (Duration, StepOutcome) {
        match &self.behavior {
            RemoteBehavior::Random { latency_min, latency_max, failure_rate, .. } => {
                let mut rng = self.rng.lock();
                let latency = if latency_min < latency_max {
                    rng.gen_range(*latency_min..=*latency_max)
                } else {
                    *latency_min
                };
                let outcome = if rng.gen::<f64>() < *failure_rate {
                    StepOutcome::Failure
                } else {
                    StepOutcome::Success
                };
                (latency, outcome)
            }
            RemoteBehavior::Scripted(steps) => {
                let position = usize::try_from(index).unwrap_or(usize::MAX);
                steps
                    .get(position)
                    .or_else(|| steps.last())
                    .map_or((Duration::ZERO, StepOutcome::Success), |step| {
                        (step.latency, step.outcome)
                    })
            }
        }
    }
}
