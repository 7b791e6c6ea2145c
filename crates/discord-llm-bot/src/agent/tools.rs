//! Tools available to the search and SQL agents

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{ChatMessage, ChatRequest, LlmProvider, SearchProvider};
use crate::storage::BooksDatabase;
use crate::types::ChatModel;

use super::Tool;

/// Web search
pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl SearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "Search"
    }

    fn description(&self) -> &str {
        "Useful for when you need to answer questions about current events"
    }

    async fn run(&self, input: &str) -> Result<String> {
        self.provider.search(input).await
    }
}

/// Executes a query; database errors become the observation
pub struct QuerySqlTool {
    db: BooksDatabase,
}

impl QuerySqlTool {
    pub fn new(db: BooksDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for QuerySqlTool {
    fn name(&self) -> &str {
        "query_sql_db"
    }

    fn description(&self) -> &str {
        "Input to this tool is a detailed and correct SQL query, output is a result from the database. \
         If the query is not correct, an error message will be returned. \
         If an error is returned, rewrite the query, check the query, and try again."
    }

    async fn run(&self, input: &str) -> Result<String> {
        Ok(self.db.run(input).unwrap_or_else(|e| format!("Error: {}", e)))
    }
}

/// Schema and sample rows of the named tables
pub struct SchemaSqlTool {
    db: BooksDatabase,
}

impl SchemaSqlTool {
    pub fn new(db: BooksDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for SchemaSqlTool {
    fn name(&self) -> &str {
        "schema_sql_db"
    }

    fn description(&self) -> &str {
        "Input to this tool is a comma-separated list of tables, output is the schema and sample rows for those tables. \
         Be sure that the tables actually exist by calling list_tables_sql_db first! \
         Example Input: 'table1, table2, table3'"
    }

    async fn run(&self, input: &str) -> Result<String> {
        let tables: Vec<String> = input
            .split(',')
            .map(|t| t.trim().trim_matches('\'').to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(self
            .db
            .table_info(Some(&tables))
            .unwrap_or_else(|e| format!("Error: {}", e)))
    }
}

/// Comma separated table names
pub struct ListTablesTool {
    db: BooksDatabase,
}

impl ListTablesTool {
    pub fn new(db: BooksDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListTablesTool {
    fn name(&self) -> &str {
        "list_tables_sql_db"
    }

    fn description(&self) -> &str {
        "Input is an empty string, output is a comma separated list of tables in the database."
    }

    async fn run(&self, _input: &str) -> Result<String> {
        Ok(self.db.table_names()?.join(", "))
    }
}

/// Asks the model to double check a query before it is run
pub struct QueryCheckerTool {
    llm: Arc<dyn LlmProvider>,
    dialect: &'static str,
    model: ChatModel,
    temperature: Option<f32>,
}

impl QueryCheckerTool {
    pub fn new(llm: Arc<dyn LlmProvider>, dialect: &'static str, model: ChatModel, temperature: Option<f32>) -> Self {
        Self {
            llm,
            dialect,
            model,
            temperature,
        }
    }
}

#[async_trait]
impl Tool for QueryCheckerTool {
    fn name(&self) -> &str {
        "query_checker_sql_db"
    }

    fn description(&self) -> &str {
        "Use this tool to double check if your query is correct before executing it. \
         Always use this tool before executing a query with query_sql_db!"
    }

    async fn run(&self, input: &str) -> Result<String> {
        let prompt = PromptBuilder::build_query_checker_prompt(self.dialect, input);
        let request = ChatRequest::new(self.model, vec![ChatMessage::user(prompt)], self.temperature);
        self.llm.chat(&request).await
    }
}
