//! Markdown formatting of pipeline results for chat messages
//!
//! Formatting never truncates; message size limits are applied by
//! [`paginate`] and [`truncate`] on the sending side.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::types::{AgentResponse, ChainResponse, ChatModel, RetrievalResult};

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<?([a-zA-Z][a-zA-Z0-9+.\-]*://[^\s<>]+)>?").expect("valid regex")
    })
}

/// Wrap bare URLs in angle brackets so the chat client shows no preview
///
/// URLs that are already wrapped are left as they are, so applying this
/// twice gives the same text as applying it once.
pub fn wrap_urls(text: &str) -> String {
    url_pattern().replace_all(text, "<$1>").into_owned()
}

/// Format a QA result into the answer block followed by one block per source
pub fn format_qa(result: &RetrievalResult) -> Result<Vec<String>> {
    let mut blocks = Vec::with_capacity(1 + result.source_documents.len());

    blocks.push(format!(
        "Question: {}\n\nAnswer: {}\nSources: {}",
        result.question,
        result.answer,
        wrap_urls(&result.sources)
    ));

    for (rank, doc) in result.source_documents.iter().enumerate() {
        let source = doc.source().ok_or_else(|| {
            Error::missing_field("source", format!("metadata of source document {}", rank))
        })?;
        blocks.push(format!(
            "Source: {}\n\nURL: {}",
            wrap_urls(&doc.content),
            wrap_urls(source)
        ));
    }

    Ok(blocks)
}

/// Format an agent run as input, thought/observation pairs and output
pub fn format_agent(response: &AgentResponse) -> String {
    let mut out = format!("**Input:** {}\n\n", response.input);

    for step in &response.intermediate_steps {
        out.push_str(&format!("**Thought:** {}\n", step.log));
        out.push_str(&format!("**Observation:** _{}_\n\n", step.observation));
    }

    out.push_str(&format!("\n**Output:** {}", response.output));
    out
}

/// Format a chain run as input, numbered steps and output
pub fn format_chain(response: &ChainResponse) -> String {
    let mut out = format!("**Input:** {}\n\n", response.query);

    for (i, step) in response.intermediate_steps.iter().enumerate() {
        out.push_str(&format!("**Step {}:** {}\n\n", i, step));
    }

    out.push_str(&format!("\n**Output:** {}", response.result));
    out
}

/// Drop blank and whitespace-only lines
pub fn remove_empty_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run footer appended to every command result
pub fn footer(temperature: Option<f32>, model: ChatModel, elapsed_secs: f64) -> String {
    let temperature = temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| "default".to_string());
    format!(
        "\n\n `Temp: {}, Model: {}, Time: {:.2}s`",
        temperature, model, elapsed_secs
    )
}

/// First `limit` characters of `text`
pub fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Split `text` into messages: `first_limit` characters, then `rest_limit` each
///
/// Limits count characters, so a multi-byte character is never split.
/// Empty text yields one empty message.
pub fn paginate(text: &str, first_limit: usize, rest_limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let first_end = first_limit.min(chars.len());
    let mut pages = vec![chars[..first_end].iter().collect::<String>()];

    if rest_limit > 0 {
        pages.extend(
            chars[first_end..]
                .chunks(rest_limit)
                .map(|chunk| chunk.iter().collect::<String>()),
        );
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentStep, Document};

    fn paris() -> RetrievalResult {
        RetrievalResult {
            question: "What is the capital of France?".to_string(),
            answer: "Paris".to_string(),
            sources: "http://a.test".to_string(),
            source_documents: vec![
                Document::with_source("Paris is the capital of France.", "http://a.test"),
                Document::with_source("France is in Europe.", "http://b.test"),
            ],
        }
    }

    #[test]
    fn test_format_qa_blocks() {
        let blocks = format_qa(&paris()).unwrap();

        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("Answer: Paris"));
        assert!(blocks[0].contains("<http://a.test>"));
        let q = blocks[0].find("Question:").unwrap();
        let a = blocks[0].find("Answer:").unwrap();
        let s = blocks[0].find("Sources:").unwrap();
        assert!(q < a && a < s);

        assert_eq!(
            blocks[1],
            "Source: Paris is the capital of France.\n\nURL: <http://a.test>"
        );
        assert_eq!(blocks[2], "Source: France is in Europe.\n\nURL: <http://b.test>");
    }

    #[test]
    fn test_format_qa_without_documents() {
        let mut result = paris();
        result.source_documents.clear();
        result.sources.clear();

        let blocks = format_qa(&result).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].ends_with("Sources: "));
    }

    #[test]
    fn test_format_qa_missing_source() {
        let mut result = paris();
        result.source_documents.push(Document::new("orphan"));

        let err = format_qa(&result).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "source"));
    }

    #[test]
    fn test_wrap_urls() {
        assert_eq!(
            wrap_urls("see https://eugeneyan.com/writing/llm-patterns/ and ftp://x.test/a"),
            "see <https://eugeneyan.com/writing/llm-patterns/> and <ftp://x.test/a>"
        );
        assert_eq!(wrap_urls("no links here"), "no links here");
    }

    #[test]
    fn test_wrap_urls_twice_does_not_nest() {
        let once = wrap_urls("a http://a.test b");
        let twice = wrap_urls(&once);
        assert_eq!(once, "a <http://a.test> b");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_format_agent() {
        let response = AgentResponse {
            input: "Who won?".to_string(),
            output: "Spain".to_string(),
            intermediate_steps: vec![AgentStep {
                tool: "Search".to_string(),
                tool_input: "world cup winner".to_string(),
                log: "I should search.\nAction: Search\nAction Input: world cup winner".to_string(),
                observation: "Spain won.".to_string(),
            }],
        };
        let text = format_agent(&response);

        assert!(text.starts_with("**Input:** Who won?\n\n**Thought:** I should search."));
        assert!(text.contains("**Observation:** _Spain won._\n\n"));
        assert!(text.ends_with("\n**Output:** Spain"));
    }

    #[test]
    fn test_format_chain() {
        let response = ChainResponse {
            query: "How many books?".to_string(),
            result: "There are 3 books.".to_string(),
            intermediate_steps: vec!["SELECT COUNT(*) FROM books".to_string(), "[(3,)]".to_string()],
        };
        let text = format_chain(&response);

        assert!(text.contains("**Step 0:** SELECT COUNT(*) FROM books\n\n"));
        assert!(text.contains("**Step 1:** [(3,)]"));
        assert!(text.ends_with("**Output:** There are 3 books."));
    }

    #[test]
    fn test_remove_empty_lines() {
        assert_eq!(remove_empty_lines("- a\n\n   \n- b\n"), "- a\n- b");
    }

    #[test]
    fn test_footer() {
        assert_eq!(
            footer(None, ChatModel::Gpt35Turbo, 1.234),
            "\n\n `Temp: default, Model: gpt-3.5-turbo, Time: 1.23s`"
        );
        assert!(footer(Some(0.7), ChatModel::Gpt4, 2.0).contains("Temp: 0.7, Model: gpt-4"));
    }

    #[test]
    fn test_paginate() {
        let text = "a".repeat(25);
        let pages = paginate(&text, 10, 7);
        assert_eq!(pages.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![10, 7, 7, 1]);
        assert_eq!(pages.concat(), text);

        assert_eq!(paginate("", 10, 7), vec![String::new()]);
        assert_eq!(paginate("short", 10, 7), vec!["short".to_string()]);
    }

    #[test]
    fn test_paginate_counts_characters() {
        let text = "é".repeat(5);
        let pages = paginate(&text, 2, 2);
        assert_eq!(pages, vec!["éé", "éé", "é"]);
        assert_eq!(truncate(&text, 3), "ééé");
    }
}
