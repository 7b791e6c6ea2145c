//! Web search agent

use std::sync::Arc;

use crate::agent::{AgentExecutor, AgentPrompt, SearchTool, Tool};
use crate::error::Result;
use crate::providers::{LlmProvider, SearchProvider};
use crate::timing::timed;
use crate::types::{AgentResponse, ChatModel};

/// ReAct agent whose only tool is web search
pub struct SearchAgent {
    executor: AgentExecutor,
}

impl SearchAgent {
    /// Create a new agent
    pub fn new(llm: Arc<dyn LlmProvider>, search: Arc<dyn SearchProvider>, max_iterations: usize) -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(SearchTool::new(search))];
        Self {
            executor: AgentExecutor::new(llm, tools, AgentPrompt::search(), max_iterations),
        }
    }

    /// Answer `question` using web search
    pub async fn run(
        &self,
        question: &str,
        temperature: Option<f32>,
        model: ChatModel,
    ) -> Result<(AgentResponse, f64)> {
        let (result, elapsed) = timed("search_agent", self.executor.run(question, model, temperature)).await;
        Ok((result?, elapsed))
    }
}
