use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::Mutex;

use crate::providers::base::{ConverseClient, ConverseRequest};

/// A mock client that returns pre-configured responses for testing
pub struct MockClient {
    responses: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<ConverseRequest>>>,
}

impl MockClient {
    /// Create a new mock client with a sequence of responses
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<ConverseRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ConverseClient for MockClient {
    async fn converse(&self, request: &ConverseRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return an empty assistant turn if no more pre-configured responses
            Ok(json!({
                "output": { "message": { "role": "assistant", "content": [{ "text": "" }] } },
                "usage": {}
            }))
        } else {
            Ok(responses.remove(0))
        }
    }
}
