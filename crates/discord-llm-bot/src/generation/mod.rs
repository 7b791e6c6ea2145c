//! Prompt construction, model output parsing and result formatting

pub mod format;
pub mod prompt;
pub mod sources;

pub use format::{format_agent, format_chain, format_qa, paginate, remove_empty_lines, truncate, wrap_urls};
pub use prompt::{PromptBuilder, SummaryStyle};
pub use sources::split_answer;
