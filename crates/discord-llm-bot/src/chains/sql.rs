//! Natural-language questions over the books database

use std::sync::Arc;

use crate::agent::{
    AgentExecutor, AgentPrompt, ListTablesTool, QueryCheckerTool, QuerySqlTool, SchemaSqlTool, Tool,
};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{ChatMessage, ChatRequest, LlmProvider};
use crate::storage::BooksDatabase;
use crate::timing::timed;
use crate::types::{AgentResponse, ChainResponse, ChatModel};

const SQL_RESULT_STOP: &str = "\nSQLResult:";

/// Two-call text-to-SQL chain: write the query, then answer from its result
pub struct SqlChain {
    db: BooksDatabase,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl SqlChain {
    /// Create a new chain
    pub fn new(db: BooksDatabase, llm: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self { db, llm, top_k }
    }

    /// Answer `question`; database errors propagate
    pub async fn run(
        &self,
        question: &str,
        temperature: Option<f32>,
        model: ChatModel,
    ) -> Result<(ChainResponse, f64)> {
        let (result, elapsed) = timed("sql_chain", self.answer(question, temperature, model)).await;
        Ok((result?, elapsed))
    }

    async fn answer(&self, question: &str, temperature: Option<f32>, model: ChatModel) -> Result<ChainResponse> {
        let table_info = self.db.table_info(None)?;
        let mut prompt = PromptBuilder::build_sql_prompt(self.db.dialect(), &table_info, self.top_k, question);

        let request = ChatRequest::new(model, vec![ChatMessage::user(prompt.clone())], temperature)
            .with_stop([SQL_RESULT_STOP]);
        let sql = clean_sql(&self.llm.chat(&request).await?);
        if sql.is_empty() {
            return Err(Error::OutputParse("empty SQL query".to_string()));
        }

        let result = self.db.run(&sql)?;
        tracing::info!("SQL result: {}", result);

        prompt.push_str(&format!(" {}\nSQLResult: {}\nAnswer:", sql, result));
        let request = ChatRequest::new(model, vec![ChatMessage::user(prompt)], temperature)
            .with_stop([SQL_RESULT_STOP]);
        let answer = self.llm.chat(&request).await?.trim().to_string();

        Ok(ChainResponse {
            query: question.to_string(),
            result: answer,
            intermediate_steps: vec![sql, result],
        })
    }
}

/// Strip whitespace, quotes and code fences around a generated query
fn clean_sql(output: &str) -> String {
    output
        .trim()
        .trim_start_matches("```sql")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}

/// ReAct agent with database tools
pub struct SqlAgent {
    db: BooksDatabase,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
    max_iterations: usize,
}

impl SqlAgent {
    /// Create a new agent
    pub fn new(db: BooksDatabase, llm: Arc<dyn LlmProvider>, top_k: usize, max_iterations: usize) -> Self {
        Self {
            db,
            llm,
            top_k,
            max_iterations,
        }
    }

    /// Answer `question` by letting the model explore the database
    pub async fn run(
        &self,
        question: &str,
        temperature: Option<f32>,
        model: ChatModel,
    ) -> Result<(AgentResponse, f64)> {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(QuerySqlTool::new(self.db.clone())),
            Arc::new(SchemaSqlTool::new(self.db.clone())),
            Arc::new(ListTablesTool::new(self.db.clone())),
            Arc::new(QueryCheckerTool::new(
                Arc::clone(&self.llm),
                self.db.dialect(),
                model,
                temperature,
            )),
        ];
        let executor = AgentExecutor::new(
            Arc::clone(&self.llm),
            tools,
            AgentPrompt::sql(self.db.dialect(), self.top_k),
            self.max_iterations,
        );

        let (result, elapsed) = timed("sql_agent", executor.run(question, model, temperature)).await;
        Ok((result?, elapsed))
    }
}
