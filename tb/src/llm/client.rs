//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// No conversation state is kept between calls, so anything the model needs
/// (task history included) travels inside the request every time.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Scripted client for tests and offline runs
pub mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use tracing::debug;

    /// One scripted reply
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// Answer with a call to the requested tool carrying this input
        Tool(serde_json::Value),
        /// Answer with plain text
        Text(String),
        /// Fail with an API error carrying this message
        Fail(String),
        /// Never answer
        Hang,
    }

    /// Mock LLM client keyed by the forced tool name
    ///
    /// Replies queued with [`MockLlmClient::push`] are consumed in order; once a
    /// queue is empty the sticky reply from [`MockLlmClient::always`] is used.
    /// Requests with no script fail, which lets tests exercise fallbacks.
    #[derive(Default)]
    pub struct MockLlmClient {
        queued: Mutex<HashMap<String, VecDeque<MockReply>>>,
        sticky: Mutex<HashMap<String, MockReply>>,
        requests: Mutex<Vec<CompletionRequest>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a one-shot reply for a tool
        pub fn push(self, tool: &str, reply: MockReply) -> Self {
            if let Ok(mut queued) = self.queued.lock() {
                queued.entry(tool.to_string()).or_default().push_back(reply);
            }
            self
        }

        /// Reply the same way to every call for a tool
        pub fn always(self, tool: &str, reply: MockReply) -> Self {
            if let Ok(mut sticky) = self.sticky.lock() {
                sticky.insert(tool.to_string(), reply);
            }
            self
        }

        /// Total number of `complete` calls
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Number of calls that forced the given tool
        pub fn calls_for(&self, tool: &str) -> usize {
            self.requests
                .lock()
                .map(|r| r.iter().filter(|req| req.forced_tool() == Some(tool)).count())
                .unwrap_or(0)
        }

        /// All requests received so far
        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        fn next_reply(&self, tool: &str) -> Option<MockReply> {
            let queued = self
                .queued
                .lock()
                .ok()
                .and_then(|mut q| q.get_mut(tool).and_then(|replies| replies.pop_front()));
            queued.or_else(|| self.sticky.lock().ok().and_then(|s| s.get(tool).cloned()))
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            let tool = request
                .forced_tool()
                .or_else(|| request.tools.first().map(|t| t.name.as_str()))
                .unwrap_or_default()
                .to_string();
            debug!(%idx, %tool, "MockLlmClient::complete: called");

            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }

            match self.next_reply(&tool) {
                Some(MockReply::Tool(input)) => Ok(CompletionResponse::tool(tool, input)),
                Some(MockReply::Text(text)) => Ok(CompletionResponse::text(text)),
                Some(MockReply::Fail(message)) => Err(LlmError::ApiError { status: 500, message }),
                Some(MockReply::Hang) => std::future::pending().await,
                None => {
                    debug!(%tool, "MockLlmClient::complete: no scripted reply");
                    Err(LlmError::NoReply { tool })
                }
            }
        }
    }

}
