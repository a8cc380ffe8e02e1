// Mock collaborators for tests
//
// MockAdminApi records every call, answers from canned responses per path,
// and can hold calls on a path until the test releases them, which is how
// tests force out-of-order completion.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::actions::CriticalPrompt;
use crate::api::{BaseAdminApi, MutationRequest};
use crate::error::{ApiError, ApiResult};
use crate::prompt::BaseOperatorPrompt;

/// Build a paginated envelope around `items`.
pub fn page_of(items: Vec<Value>, page: u32, pages: u32) -> Value {
    let total = items.len() as u64 * pages as u64;
    json!({
        "page": page,
        "limit": items.len().max(1),
        "total": total,
        "pages": pages,
        "items": items,
    })
}

// =============================================================================
// Mock Admin API
// =============================================================================

/// A call captured by [`MockAdminApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get {
        path: String,
        params: Vec<(String, String)>,
    },
    Mutate(MutationRequest),
}

#[derive(Default)]
struct MockState {
    responses: HashMap<String, ApiResult<Value>>,
    calls: Vec<RecordedCall>,
    held: HashSet<String>,
    parked: VecDeque<(String, Arc<Notify>)>,
}

pub struct MockAdminApi {
    state: Arc<Mutex<MockState>>,
}

impl MockAdminApi {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn with_response(self, path: &str, value: Value) -> Self {
        self.set_response(path, value);
        self
    }

    /// Answer every later call on `path` with `value`.
    pub fn set_response(&self, path: &str, value: Value) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(path.to_string(), Ok(value));
    }

    /// Fail every later call on `path` with `error`.
    pub fn fail(&self, path: &str, error: ApiError) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(path.to_string(), Err(error));
    }

    /// Park calls on `path` until [`release`](Self::release) is called.
    pub fn hold(&self, path: &str) {
        self.state.lock().unwrap().held.insert(path.to_string());
    }

    /// Stop parking new calls on `path`. Already-parked calls stay parked.
    pub fn open(&self, path: &str) {
        self.state.lock().unwrap().held.remove(path);
    }

    /// Let the oldest parked call on `path` continue.
    pub fn release(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        let position = state.parked.iter().position(|(p, _)| p == path);
        if let Some(index) = position {
            if let Some((_, notify)) = state.parked.remove(index) {
                notify.notify_one();
            }
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of `GET`s issued on `path`.
    pub fn get_count(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Get { path: p, .. } if p == path))
            .count()
    }

    /// Query parameters of the last `GET` on `path`.
    pub fn last_get(&self, path: &str) -> Option<Vec<(String, String)>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            RecordedCall::Get { path: p, params } if p == path => Some(params),
            _ => None,
        })
    }

    pub fn mutations(&self) -> Vec<MutationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::Mutate(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Yield until at least `count` `GET`s on `path` have been recorded.
    pub async fn wait_for_gets(&self, path: &str, count: usize) {
        for _ in 0..1000 {
            if self.get_count(path) >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("timed out waiting for {} GET(s) on {}", count, path);
    }

    /// Yield until at least `count` mutations have been recorded.
    pub async fn wait_for_mutations(&self, count: usize) {
        for _ in 0..1000 {
            if self.mutations().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("timed out waiting for {} mutation(s)", count);
    }

    async fn respond(&self, path: &str, call: RecordedCall, default: ApiResult<Value>) -> ApiResult<Value> {
        let parked = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            if state.held.contains(path) {
                let notify = Arc::new(Notify::new());
                state.parked.push_back((path.to_string(), notify.clone()));
                Some(notify)
            } else {
                None
            }
        };

        if let Some(notify) = parked {
            notify.notified().await;
        }

        let state = self.state.lock().unwrap();
        state.responses.get(path).cloned().unwrap_or(default)
    }
}

impl Default for MockAdminApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAdminApi for MockAdminApi {
    async fn get(&self, path: &str, params: &[(String, String)]) -> ApiResult<Value> {
        let call = RecordedCall::Get {
            path: path.to_string(),
            params: params.to_vec(),
        };
        let missing = Err(ApiError::Api {
            status: 404,
            message: format!("No mock response for {}", path),
        });
        self.respond(path, call, missing).await
    }

    async fn mutate(&self, request: &MutationRequest) -> ApiResult<Value> {
        let call = RecordedCall::Mutate(request.clone());
        self.respond(&request.path, call, Ok(json!({ "ok": true })))
            .await
    }
}

// =============================================================================
// Scripted Operator Prompt
// =============================================================================

/// Operator prompt answering from a queue. An empty queue declines.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<CriticalPrompt>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Confirm and type `reason`.
    pub fn answer(self, reason: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Some(reason.to_string()));
        self
    }

    /// Decline the confirmation.
    pub fn decline(self) -> Self {
        self.answers.lock().unwrap().push_back(None);
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<CriticalPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseOperatorPrompt for ScriptedPrompt {
    fn confirm_critical(&self, prompt: &CriticalPrompt) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answers.lock().unwrap().pop_front().flatten()
    }
}
