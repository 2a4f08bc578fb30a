//! In-memory providers for service and route tests.
//!
//! Responses are keyed by a short call signature such as `profile:user123`
//! or `messages:c2`. Every call is recorded so tests can assert exactly
//! which upstream requests were made.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use outreach_core::accounts::{RawAccount, RawAccountPage};
use outreach_core::reshape::list_items;

use super::{
    ActivityKind, CompletionRequest, LanguageModel, MessagingProvider, ProviderError, WebSearch,
};

#[derive(Default)]
pub struct FakeMessaging {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl FakeMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, response: Value) -> Self {
        self.responses.insert(key.to_string(), response);
        self
    }

    pub fn failing(mut self, key: &str, status: u16) -> Self {
        self.failures.insert(key.to_string(), status);
        self
    }

    /// One connected LinkedIn account with id `acct1`.
    pub fn with_linkedin_account(self) -> Self {
        self.with(
            "accounts",
            json!({"items": [{"type": "LINKEDIN", "id": "acct1", "name": "Owner", "sources": [{"status": "OK"}]}]}),
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn respond(&self, key: String) -> Result<Value, ProviderError> {
        self.calls.lock().expect("calls lock").push(key.clone());
        if let Some(status) = self.failures.get(&key) {
            return Err(ProviderError::Status {
                provider: "messaging",
                status: *status,
                body: String::new(),
            });
        }
        self.responses
            .get(&key)
            .cloned()
            .ok_or(ProviderError::Status {
                provider: "messaging",
                status: 404,
                body: String::new(),
            })
    }
}

#[async_trait]
impl MessagingProvider for FakeMessaging {
    async fn list_accounts(&self) -> Result<Vec<RawAccount>, ProviderError> {
        let page: RawAccountPage = serde_json::from_value(self.respond("accounts".to_string())?)
            .map_err(|err| ProviderError::Decode {
                provider: "messaging",
                detail: err.to_string(),
            })?;
        Ok(page.items)
    }

    async fn search_people(
        &self,
        account_id: &str,
        keywords: &str,
    ) -> Result<Value, ProviderError> {
        self.respond(format!("search:{account_id}:{keywords}"))
    }

    async fn get_profile(&self, _account_id: &str, user_id: &str) -> Result<Value, ProviderError> {
        self.respond(format!("profile:{user_id}"))
    }

    async fn list_activity(
        &self,
        _account_id: &str,
        user_id: &str,
        kind: ActivityKind,
        _limit: u32,
    ) -> Result<Vec<Value>, ProviderError> {
        let page = self.respond(format!("{}:{user_id}", kind.path_segment()))?;
        Ok(list_items(&page))
    }

    async fn get_post(&self, _account_id: &str, post_id: &str) -> Result<Value, ProviderError> {
        self.respond(format!("post:{post_id}"))
    }

    async fn list_chats_with(
        &self,
        _account_id: &str,
        attendee_id: &str,
    ) -> Result<Vec<Value>, ProviderError> {
        let page = self.respond(format!("chats:{attendee_id}"))?;
        Ok(list_items(&page))
    }

    async fn list_chat_messages(
        &self,
        _account_id: &str,
        chat_id: &str,
        _limit: u32,
    ) -> Result<Vec<Value>, ProviderError> {
        let page = self.respond(format!("messages:{chat_id}"))?;
        Ok(list_items(&page))
    }

    async fn send_message(
        &self,
        _account_id: Option<&str>,
        chat_id: &str,
        text: &str,
    ) -> Result<Value, ProviderError> {
        self.respond(format!("send:{chat_id}:{text}"))
    }
}

/// Search fake answering the first rule whose pattern occurs in the query.
/// Unmatched queries return a payload without items.
#[derive(Default)]
pub struct FakeSearch {
    rules: Vec<(String, Result<Value, u16>)>,
    queries: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(mut self, pattern: &str, payload: Value) -> Self {
        self.rules.push((pattern.to_string(), Ok(payload)));
        self
    }

    pub fn failing(mut self, pattern: &str, status: u16) -> Self {
        self.rules.push((pattern.to_string(), Err(status)));
        self
    }

    pub fn queries(&self) -> Vec<(String, Option<String>)> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(
        &self,
        query: &str,
        date_restrict: Option<&str>,
    ) -> Result<Value, ProviderError> {
        self.queries
            .lock()
            .expect("queries lock")
            .push((query.to_string(), date_restrict.map(str::to_string)));
        match self.rules.iter().find(|(pattern, _)| query.contains(pattern.as_str())) {
            Some((_, Ok(payload))) => Ok(payload.clone()),
            Some((_, Err(status))) => Err(ProviderError::Status {
                provider: "search",
                status: *status,
                body: String::new(),
            }),
            None => Ok(json!({"searchInformation": {"totalResults": "0"}})),
        }
    }
}

/// Model fake answering the first rule whose pattern occurs in the user
/// prompt. Unmatched prompts fail.
#[derive(Default)]
pub struct FakeModel {
    rules: Vec<(String, Option<String>)>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(mut self, pattern: &str, reply: &str) -> Self {
        self.rules.push((pattern.to_string(), Some(reply.to_string())));
        self
    }

    pub fn failing(mut self, pattern: &str) -> Self {
        self.rules.push((pattern.to_string(), None));
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        match self
            .rules
            .iter()
            .find(|(pattern, _)| request.user.contains(pattern.as_str()))
        {
            Some((_, Some(reply))) => Ok(reply.clone()),
            _ => Err(ProviderError::EmptyCompletion {
                provider: "language_model",
            }),
        }
    }
}
