//! Summarization, web search and SQL pipelines

mod search;
mod sql;
mod summarize;

pub use search::SearchAgent;
pub use sql::{SqlAgent, SqlChain};
pub use summarize::SummarizeChain;
