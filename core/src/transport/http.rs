//! The production `EvaluationClient`: blocking `reqwest` calls with a
//! bounded retry/backoff policy (§4.8, §6.1). HTTP 400 and 404 are
//! terminal — they indicate a decision bug or a dead session, not a
//! transient fault, and are never retried.

use super::{EndResponse, EvaluationClient, PlayRoundRequest, PlayRoundResponse, SessionId, StartResponse, TransportError};
use std::thread::sleep;
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 100;
const BACKOFF_FACTOR: u64 = 2;

pub struct HttpEvaluationClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpEvaluationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::blocking::Client::new(), base_url: base_url.into() }
    }

    fn with_retry<T>(&self, mut attempt: impl FnMut() -> Result<T, TransportError>) -> Result<T, TransportError> {
        let mut attempt_no = 0u32;
        loop {
            attempt_no += 1;
            match attempt() {
                Ok(value) => return Ok(value),
                Err(e @ TransportError::ValidationRejected(_)) => return Err(e),
                Err(e @ TransportError::SessionLost) => return Err(e),
                Err(e) => {
                    if attempt_no >= MAX_ATTEMPTS {
                        return Err(e);
                    }
                    tracing::warn!(attempt = attempt_no, error = %e, "transport attempt failed, retrying");
                    sleep(Duration::from_millis(backoff_ms(attempt_no)));
                }
            }
        }
    }

}

fn backoff_ms(attempt_no: u32) -> u64 {
    let base = BASE_BACKOFF_MS * BACKOFF_FACTOR.pow(attempt_no - 1);
    let jitter = jitter_fraction(attempt_no);
    (base as f64 * (1.0 + jitter)) as u64
}

/// A deterministic ±20% jitter keyed on the attempt's parity, avoiding a
/// `rand` dependency pulled in purely to perturb a sleep duration.
fn jitter_fraction(attempt_no: u32) -> f64 {
    if attempt_no % 2 == 0 {
        0.2
    } else {
        -0.2
    }
}

fn classify_status(status: u16, body: &str) -> TransportError {
    match status {
        400 => TransportError::ValidationRejected(body.to_string()),
        404 => TransportError::SessionLost,
        500..=599 => TransportError::ServerError(status),
        _ => TransportError::Protocol(format!("unexpected status {status}: {body}")),
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

impl EvaluationClient for HttpEvaluationClient {
    fn start_session(&self, api_key: &str) -> Result<SessionId, TransportError> {
        self.with_retry(|| {
            let resp = self
                .client
                .post(format!("{}/session/start", self.base_url))
                .header("API-KEY", api_key)
                .send()
                .map_err(map_reqwest_error)?;
            let status = resp.status().as_u16();
            if !resp.status().is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(classify_status(status, &body));
            }
            let parsed: StartResponse = resp.json().map_err(|e| TransportError::Protocol(e.to_string()))?;
            Ok(SessionId(parsed.session_id))
        })
    }

    fn play_round(&self, session: &SessionId, api_key: &str, request: PlayRoundRequest) -> Result<PlayRoundResponse, TransportError> {
        self.with_retry(|| {
            let resp = self
                .client
                .post(format!("{}/play/round", self.base_url))
                .header("API-KEY", api_key)
                .header("SESSION-ID", session.0.as_str())
                .json(&request)
                .send()
                .map_err(map_reqwest_error)?;
            let status = resp.status().as_u16();
            if !resp.status().is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(classify_status(status, &body));
            }
            resp.json().map_err(|e| TransportError::Protocol(e.to_string()))
        })
    }

    fn end_session(&self, session: &SessionId, api_key: &str) -> Result<EndResponse, TransportError> {
        self.with_retry(|| {
            let resp = self
                .client
                .post(format!("{}/session/end", self.base_url))
                .header("API-KEY", api_key)
                .header("SESSION-ID", session.0.as_str())
                .send()
                .map_err(map_reqwest_error)?;
            let status = resp.status().as_u16();
            if !resp.status().is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(classify_status(status, &body));
            }
            resp.json().map_err(|e| TransportError::Protocol(e.to_string()))
        })
    }
}
