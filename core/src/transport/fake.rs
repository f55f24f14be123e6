//! An in-memory `EvaluationClient` for tests: plays back a scripted
//! sequence of round responses and records every request it receives,
//! so orchestrator tests can assert on what was submitted without a
//! network.

use super::{EndResponse, EvaluationClient, PlayRoundRequest, PlayRoundResponse, SessionId, TransportError};
use std::cell::RefCell;
use std::collections::VecDeque;

pub struct FakeEvaluationClient {
    session_id: String,
    responses: RefCell<VecDeque<PlayRoundResponse>>,
    end_response: EndResponse,
    pub submitted: RefCell<Vec<PlayRoundRequest>>,
}

impl FakeEvaluationClient {
    pub fn new(session_id: impl Into<String>, responses: Vec<PlayRoundResponse>, end_response: EndResponse) -> Self {
        Self { session_id: session_id.into(), responses: RefCell::new(responses.into()), end_response, submitted: RefCell::new(Vec::new()) }
    }
}

impl EvaluationClient for FakeEvaluationClient {
    fn start_session(&self, _api_key: &str) -> Result<SessionId, TransportError> {
        Ok(SessionId(self.session_id.clone()))
    }

    fn play_round(&self, _session: &SessionId, _api_key: &str, request: PlayRoundRequest) -> Result<PlayRoundResponse, TransportError> {
        self.submitted.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().ok_or_else(|| TransportError::Protocol("fake script exhausted".to_string()))
    }

    fn end_session(&self, _session: &SessionId, _api_key: &str) -> Result<EndResponse, TransportError> {
        Ok(self.end_response.clone())
    }
}
