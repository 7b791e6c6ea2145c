//! discord-llm-bot: chat commands backed by LLM pipelines
//!
//! The bot summarizes web pages, answers questions with web search, queries
//! a books database through SQL chains and agents, and answers questions
//! over two vector indexes with their sources. Commands are served over
//! HTTP or run once from the command line.

pub mod agent;
pub mod chains;
pub mod commands;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod timing;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::BotConfig;
pub use error::{Error, Result};
