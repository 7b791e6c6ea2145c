//! Parsing of ReAct model output into an action or a final answer

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

const FINAL_ANSWER: &str = "Final Answer:";

fn action_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:(.*?)\nAction\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .expect("valid regex")
    })
}

/// Next move decided by the model
#[derive(Debug, Clone, PartialEq)]
pub enum AgentDecision {
    /// Call `tool` with `input`
    Action { tool: String, input: String, log: String },
    /// Stop with this answer
    Finish { output: String, log: String },
}

/// Parse one model completion
pub fn parse_output(text: &str) -> Result<AgentDecision> {
    if let Some(pos) = text.rfind(FINAL_ANSWER) {
        return Ok(AgentDecision::Finish {
            output: text[pos + FINAL_ANSWER.len()..].trim().to_string(),
            log: text.to_string(),
        });
    }

    let caps = action_pattern()
        .captures(text)
        .ok_or_else(|| Error::OutputParse(text.to_string()))?;

    let tool = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    let input = caps
        .get(2)
        .map(|m| m.as_str().trim_matches(' ').trim_matches('"'))
        .unwrap_or_default();

    Ok(AgentDecision::Action {
        tool: tool.to_string(),
        input: input.to_string(),
        log: text.to_string(),
    })
}
