//! Zero-shot ReAct prompt templates

use super::Tool;
use std::sync::Arc;

const SEARCH_PREFIX: &str =
    "Please answer the following questions as best you can. You have access to the following tools:";

const SEARCH_FORMAT_INSTRUCTIONS: &str = r#"Please use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question"#;

const SEARCH_SUFFIX: &str = r#"Please begin!

Question: {input}
Thought: {agent_scratchpad}"#;

const SQL_PREFIX: &str = r#"You are an agent designed to interact with a SQL database.
Given an input question, create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer.
Unless the user specifies a specific number of examples they wish to obtain, always limit your query to at most {top_k} results.
You can order the results by a relevant column to return the most interesting examples in the database.
Never query for all the columns from a specific table, only ask for the few relevant columns given the question.
You have access to tools for interacting with the database.
Only use the below tools. Only use the information returned by the below tools to construct your final answer.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.

DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.

If the question does not seem related to the database, just return "I don't know" as the answer.
"#;

const SQL_FORMAT_INSTRUCTIONS: &str = r#"Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question"#;

const SQL_SUFFIX: &str = r#"Begin!

Question: {input}
Thought: I should look at the tables in the database to see what I can query.
{agent_scratchpad}"#;

/// Prefix, format instructions and suffix of a zero-shot agent prompt
#[derive(Debug, Clone)]
pub struct AgentPrompt {
    prefix: String,
    format_instructions: String,
    suffix: String,
}

impl AgentPrompt {
    /// Create a prompt from its three parts
    ///
    /// `format_instructions` may reference `{tool_names}`; `suffix` must
    /// reference `{input}` and `{agent_scratchpad}`.
    pub fn new(prefix: impl Into<String>, format_instructions: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            format_instructions: format_instructions.into(),
            suffix: suffix.into(),
        }
    }

    /// Prompt of the web search agent
    pub fn search() -> Self {
        Self::new(SEARCH_PREFIX, SEARCH_FORMAT_INSTRUCTIONS, SEARCH_SUFFIX)
    }

    /// Prompt of the SQL agent
    pub fn sql(dialect: &str, top_k: usize) -> Self {
        let prefix = SQL_PREFIX
            .replace("{dialect}", dialect)
            .replace("{top_k}", &top_k.to_string());
        Self::new(prefix, SQL_FORMAT_INSTRUCTIONS, SQL_SUFFIX)
    }

    /// Render the full prompt for one model call
    pub fn render(&self, tools: &[Arc<dyn Tool>], input: &str, scratchpad: &str) -> String {
        let tool_strings = tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = tools.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ");

        let format_instructions = self.format_instructions.replace("{tool_names}", &tool_names);
        let suffix = self
            .suffix
            .replace("{input}", input)
            .replace("{agent_scratchpad}", scratchpad);

        [self.prefix.as_str(), &tool_strings, &format_instructions, &suffix].join("\n\n")
    }
}
