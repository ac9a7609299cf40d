//! Shared test helpers: a scripted model client that answers by tool name

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contentforge::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use contentforge::{ContentPipeline, PromptLoader};
use serde_json::Value;

/// Replies to each request with the next queued answer for the tool it declares
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<HashMap<String, VecDeque<Result<Value, LlmError>>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, tool: &str, input: Value) -> Self {
        self.push(tool, Ok(input));
        self
    }

    pub fn fail(self, tool: &str, error: LlmError) -> Self {
        self.push(tool, Err(error));
        self
    }

    fn push(&self, tool: &str, reply: Result<Value, LlmError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(tool.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Prompts sent for one tool, in call order
    pub fn prompts_for(&self, tool: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.tools.iter().any(|t| t.name == tool))
            .map(|r| r.messages[0].content.clone())
            .collect()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let tool = request
            .tools
            .first()
            .map(|t| t.name.clone())
            .ok_or_else(|| LlmError::InvalidResponse("request declared no tool".to_string()))?;
        self.requests.lock().unwrap().push(request);

        let reply = self.replies.lock().unwrap().get_mut(&tool).and_then(|q| q.pop_front());
        match reply {
            Some(Ok(input)) => Ok(CompletionResponse::tool_call(&tool, input)),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::InvalidResponse(format!("no scripted reply for {}", tool))),
        }
    }
}

pub fn pipeline(client: &Arc<ScriptedClient>) -> ContentPipeline {
    ContentPipeline::new(client.clone(), PromptLoader::embedded_only())
}

/// Replies for a full happy-path run of "The Future of AI"
pub fn future_of_ai() -> ScriptedClient {
    ScriptedClient::new()
        .reply(
            "submit_ideas",
            serde_json::json!({ "ideas": [
                "How AI will reshape healthcare",
                "AI and the future of work",
                "Ethics of autonomous systems"
            ]}),
        )
        .reply(
            "submit_outline",
            serde_json::json!({ "outline": "# How AI will reshape healthcare\n\n- Introduction\n- Diagnostics\n- Drug discovery\n- Conclusion" }),
        )
        .reply(
            "submit_sections",
            serde_json::json!({ "sections": [
                { "title": "Introduction", "draft": "AI is arriving in clinics." },
                { "title": "Diagnostics", "draft": "Models read scans in seconds." },
                { "title": "Drug discovery", "draft": "Search spaces shrink." },
                { "title": "Conclusion", "draft": "Care gets faster." }
            ]}),
        )
        .reply(
            "submit_posts",
            serde_json::json!({ "posts": [
                { "platform": "Twitter", "post": "AI is reshaping healthcare #AI #Health" },
                { "platform": "LinkedIn", "post": "How AI changes diagnostics and drug discovery." },
                { "platform": "Facebook", "post": "Faster care is coming." }
            ]}),
        )
}
