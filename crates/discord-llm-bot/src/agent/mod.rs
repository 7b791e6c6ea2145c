//! Zero-shot ReAct agent
//!
//! The model alternates between choosing a tool and reading its
//! observation until it gives a final answer or runs out of iterations.

pub mod parser;
pub mod prompt;
pub mod tools;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{ChatMessage, ChatRequest, LlmProvider};
use crate::types::{AgentResponse, AgentStep, ChatModel};

pub use parser::{parse_output, AgentDecision};
pub use prompt::AgentPrompt;
pub use tools::{ListTablesTool, QueryCheckerTool, QuerySqlTool, SchemaSqlTool, SearchTool};

/// Output when the iteration budget runs out
pub const STOPPED_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";

/// Generation stops before the model writes its own observation
const STOP_SEQUENCES: [&str; 2] = ["\nObservation:", "\n\tObservation:"];

/// A capability the agent can call by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses in `Action:`
    fn name(&self) -> &str;

    /// One-line description shown in the prompt
    fn description(&self) -> &str;

    /// Run the tool and return the observation
    async fn run(&self, input: &str) -> Result<String>;
}

/// Drives the ReAct loop over a set of tools
pub struct AgentExecutor {
    llm: Arc<dyn LlmProvider>,
    tools: Vec<Arc<dyn Tool>>,
    prompt: AgentPrompt,
    max_iterations: usize,
}

impl AgentExecutor {
    /// Create a new executor
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        tools: Vec<Arc<dyn Tool>>,
        prompt: AgentPrompt,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            prompt,
            max_iterations,
        }
    }

    /// Run the agent on `input`
    ///
    /// Unparseable model output is an error; an unknown tool name is
    /// reported back to the model as an observation.
    pub async fn run(&self, input: &str, model: ChatModel, temperature: Option<f32>) -> Result<AgentResponse> {
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 0..self.max_iterations {
            let prompt = self.prompt.render(&self.tools, input, &scratchpad(&steps));
            if iteration == 0 {
                tracing::debug!("Agent prompt: {}", prompt);
            }

            let request = ChatRequest::new(model, vec![ChatMessage::user(prompt)], temperature)
                .with_stop(STOP_SEQUENCES);
            let output = self.llm.chat(&request).await?;

            match parse_output(&output)? {
                AgentDecision::Finish { output, .. } => {
                    tracing::info!("Agent finished after {} steps", steps.len());
                    return Ok(AgentResponse {
                        input: input.to_string(),
                        output,
                        intermediate_steps: steps,
                    });
                }
                AgentDecision::Action { tool, input: tool_input, log } => {
                    let observation = match self.tools.iter().find(|t| t.name() == tool) {
                        Some(t) => t.run(&tool_input).await?,
                        None => format!("{} is not a valid tool, try another one.", tool),
                    };
                    tracing::info!("Agent step {}: {}({})", iteration + 1, tool, tool_input);

                    steps.push(AgentStep {
                        tool,
                        tool_input,
                        log,
                        observation,
                    });
                }
            }
        }

        tracing::warn!("Agent stopped after {} iterations", self.max_iterations);
        Ok(AgentResponse {
            input: input.to_string(),
            output: STOPPED_OUTPUT.to_string(),
            intermediate_steps: steps,
        })
    }
}

/// Previous steps as the model sees them
fn scratchpad(steps: &[AgentStep]) -> String {
    let mut thoughts = String::new();
    for step in steps {
        thoughts.push_str(&step.log);
        thoughts.push_str("\nObservation: ");
        thoughts.push_str(&step.observation);
        thoughts.push_str("\nThought: ");
    }
    thoughts
}
