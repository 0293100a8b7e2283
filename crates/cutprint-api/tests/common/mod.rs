//! Shared in-memory doubles for API integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cutprint_api::{ApiError, ApiRequest, ApiResponse, ApiTransport, PhotoApi, RetryPolicy, Sleeper};

/// Transport replaying scripted outcomes and recording every request.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Result<ApiResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl ApiTransport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().expect("lock").push(request.clone());
        self.outcomes
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("script exhausted".to_string())))
    }
}

/// Sleeper that records requested delays instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays_ms(&self) -> Vec<u128> {
        self.delays.lock().expect("lock").iter().map(Duration::as_millis).collect()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.lock().expect("lock").push(duration);
    }
}

pub fn ok(status: u16, body: &str) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse {
        status,
        body: body.to_string(),
    })
}

pub fn policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay_ms: 100,
        max_delay_ms: 1_000,
        jitter_ms: 0,
    }
}

pub fn client(
    outcomes: Vec<Result<ApiResponse, ApiError>>,
    max_retries: u32,
) -> (PhotoApi, Arc<ScriptedTransport>, Arc<RecordingSleeper>) {
    let transport = ScriptedTransport::new(outcomes);
    let sleeper = Arc::new(RecordingSleeper::default());
    let api = PhotoApi::new("https://api.cutprint.test/", policy(max_retries), transport.clone())
        .expect("https base")
        .with_token("secret-token")
        .with_sleeper(sleeper.clone());
    (api, transport, sleeper)
}
