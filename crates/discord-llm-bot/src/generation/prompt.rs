//! Prompt templates for the QA, summarization and SQL pipelines

use crate::providers::ChatMessage;
use crate::types::Document;

/// What a summarization call should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStyle {
    /// Bullet point summary
    Bullets,
    /// Explanation for a five-year-old
    Eli5,
}

/// Prompt builder for every pipeline
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved documents as `Content:`/`Source:` blocks
    pub fn build_context(documents: &[Document]) -> String {
        documents
            .iter()
            .map(|doc| {
                format!(
                    "Content: {}\nSource: {}",
                    doc.content,
                    doc.source().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the single "stuff" prompt for question answering with sources
    pub fn build_qa_prompt(question: &str, documents: &[Document]) -> String {
        format!(
            r#"Given the following extracted parts of a long document and a question, create a final answer with references ("SOURCES").
If you don't know the answer, just say that you don't know. Don't try to make up an answer.
Only use the extracted parts below to answer.
ALWAYS return a "SOURCES" part in your answer, on its own line, in the form "SOURCES: <source>, <source>".

QUESTION: {question}
=========
{context}
=========
FINAL ANSWER:"#,
            question = question,
            context = Self::build_context(documents),
        )
    }

    /// Build the system/human message pair for summarizing `text`
    pub fn build_summary_messages(style: SummaryStyle, text: &str) -> Vec<ChatMessage> {
        let (system, human) = match style {
            SummaryStyle::Bullets => (
                "You are a teacher who summarizes documents into easily digestible bullet points.",
                format!(
                    "Summarize the following text in bullet points:\n\n{}\n\nConcise summary in bullet points:",
                    text
                ),
            ),
            SummaryStyle::Eli5 => (
                "You are a teacher who explains documents to a five-year old.",
                format!(
                    "Explain the following text to a five-year old:\n\n{}\n\nConcise explanation:",
                    text
                ),
            ),
        };

        vec![ChatMessage::system(system), ChatMessage::user(human)]
    }

    /// Build the text-to-SQL prompt; the model continues after `SQLQuery:`
    pub fn build_sql_prompt(dialect: &str, table_info: &str, top_k: usize, question: &str) -> String {
        format!(
            r#"Given an input question, first create a syntactically correct {dialect} query to run, then look at the results of the query and return the answer. Unless the user specifies in the question a specific number of examples to obtain, always limit your query to at most {top_k} results using the LIMIT clause. You can order the results by a relevant column to return the most interesting examples in the database.

Never query for all the columns from a specific table, only ask for the few relevant columns given the question.

Pay attention to use only the column names that you can see in the schema description. Be careful to not query for columns that do not exist.

Use the following format:

Question: "Question here"
SQLQuery: "SQL Query to run"
SQLResult: "Result of the SQLQuery"
Answer: "Final answer here"

Only use the tables listed below.

{table_info}

Question: {question}
SQLQuery:"#,
        )
    }

    /// Ask the model to double check a query
    pub fn build_query_checker_prompt(dialect: &str, query: &str) -> String {
        format!(
            r#"{query}
Double check the {dialect} query above for common mistakes, including:
- Using NOT IN with NULL values
- Using UNION when UNION ALL should have been used
- Using BETWEEN for exclusive ranges
- Data type mismatch in predicates
- Properly quoting identifiers
- Using the correct number of arguments for functions
- Casting to the correct data type
- Using the proper columns for joins

If there are any of the above mistakes, rewrite the query. If there are no mistakes, just reproduce the original query."#,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Role;

    #[test]
    fn test_qa_prompt_stuffs_documents_in_order() {
        let docs = vec![
            Document::with_source("Paris is the capital of France.", "http://a.test"),
            Document::with_source("France is in Europe.", "http://b.test"),
        ];
        let prompt = PromptBuilder::build_qa_prompt("What is the capital of France?", &docs);

        let first = prompt.find("Content: Paris").unwrap();
        let second = prompt.find("Content: France is in Europe.").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Source: http://a.test"));
        assert!(prompt.contains("QUESTION: What is the capital of France?"));
        assert!(prompt.contains("SOURCES"));
    }

    #[test]
    fn test_summary_messages() {
        let messages = PromptBuilder::build_summary_messages(SummaryStyle::Eli5, "Rust is fast.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("five-year old"));
        assert!(messages[1].content.contains("Rust is fast."));
    }

    #[test]
    fn test_sql_prompt_ends_with_query_marker() {
        let prompt = PromptBuilder::build_sql_prompt("sqlite", "CREATE TABLE books (id INTEGER)", 5, "How many books?");
        assert!(prompt.contains("correct sqlite query"));
        assert!(prompt.contains("at most 5 results"));
        assert!(prompt.ends_with("Question: How many books?\nSQLQuery:"));
    }
}
