//! Bot commands: registration, validation and dispatch
//!
//! Every command is registered as `{prefix}{name}`. Long-running commands
//! defer first, then send their output in size-bounded messages. Failures
//! are logged and reported to the caller as a single error message.

mod options;
mod responder;
mod services;

pub use options::{CommandOptions, ResolvedOptions, MAX_TEMPERATURE, MIN_TEMPERATURE};
pub use responder::{CollectingResponder, ConsoleResponder, Responder};
pub use services::Services;

use serde::Serialize;

use crate::config::{BotConfig, DiscordConfig};
use crate::error::{Error, Result};
use crate::generation::format::footer;
use crate::generation::{format_agent, format_chain, format_qa, paginate, truncate, SummaryStyle};
use crate::types::{ChatModel, IndexSelector};

use services::require;

/// Reply of the `table` command
pub const TABLE_DESCRIPTION: &str = "The books table has the following columns: id, title, author, language, average rating, ratings count, and text reviews count.";

/// Every command the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Hello,
    Summarize,
    Eli5,
    Search,
    Table,
    Sql,
    SqlAgent,
    AskEy,
    Board,
}

impl CommandKind {
    pub const ALL: [CommandKind; 9] = [
        CommandKind::Hello,
        CommandKind::Summarize,
        CommandKind::Eli5,
        CommandKind::Search,
        CommandKind::Table,
        CommandKind::Sql,
        CommandKind::SqlAgent,
        CommandKind::AskEy,
        CommandKind::Board,
    ];

    /// Unprefixed command name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Summarize => "summarize",
            Self::Eli5 => "eli5",
            Self::Search => "search",
            Self::Table => "table",
            Self::Sql => "sql",
            Self::SqlAgent => "sql-agent",
            Self::AskEy => "ask-ey",
            Self::Board => "board",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Hello => "Says hello without hitting any APIs. Used for health checks.",
            Self::Summarize => "Summarizes a URL in bullet points",
            Self::Eli5 => "Explains a URL to a five-year old",
            Self::Search => "Searches the internet for a query",
            Self::Table => "Describes the books table.",
            Self::Sql => "Queries a database",
            Self::SqlAgent => "Queries a database with an agent",
            Self::AskEy => "Asks eugeneyan.com a question",
            Self::Board => "Asks board of advisors a question",
        }
    }

    /// Name of the required text option, if the command takes one
    pub fn text_option(&self) -> Option<&'static str> {
        match self {
            Self::Hello | Self::Table => None,
            Self::Summarize | Self::Eli5 => Some("url"),
            Self::Search | Self::Sql | Self::SqlAgent => Some("query"),
            Self::AskEy | Self::Board => Some("question"),
        }
    }

    /// Whether the command accepts `show_source`
    pub fn takes_show_source(&self) -> bool {
        matches!(self, Self::AskEy | Self::Board)
    }

    /// Look up an unprefixed name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Description of a registered command
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: &'static str,
    pub options: Vec<&'static str>,
}

/// Validates and runs commands against the configured services
pub struct CommandRouter {
    prefix: String,
    limits: DiscordConfig,
    default_model: ChatModel,
    services: Services,
}

impl CommandRouter {
    /// Create a new router
    pub fn new(config: &BotConfig, services: Services) -> Self {
        Self {
            prefix: config.discord.command_prefix.clone(),
            limits: config.discord.clone(),
            default_model: config.llm.default_model,
            services,
        }
    }

    /// Registered commands
    pub fn commands(&self) -> Vec<CommandInfo> {
        CommandKind::ALL
            .iter()
            .map(|kind| {
                let mut options: Vec<&'static str> = kind.text_option().into_iter().collect();
                if kind.text_option().is_some() {
                    options.extend(["temperature", "model"]);
                }
                if kind.takes_show_source() {
                    options.push("show_source");
                }
                CommandInfo {
                    name: format!("{}{}", self.prefix, kind.name()),
                    description: kind.description(),
                    options,
                }
            })
            .collect()
    }

    /// Resolve a registered (prefixed) name
    pub fn lookup(&self, name: &str) -> Result<CommandKind> {
        name.strip_prefix(self.prefix.as_str())
            .and_then(CommandKind::from_name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))
    }

    /// Validate and run a command
    ///
    /// Unknown commands and invalid options are returned as errors. Failures
    /// while running are reported through `responder` instead.
    pub async fn dispatch(&self, name: &str, options: CommandOptions, responder: &dyn Responder) -> Result<()> {
        let kind = self.lookup(name)?;
        let options = options.resolve(kind, self.default_model)?;
        tracing::info!(
            "{}: {}, Temp: {:?}, Model: {}, Show source: {}",
            name,
            options.text,
            options.temperature,
            options.model,
            options.show_source
        );

        if let Err(e) = self.execute(kind, &options, responder).await {
            tracing::error!("Command {} failed: {}", name, e);
            responder.send(&format!("Error: {}. Please try again.", e)).await?;
        }
        Ok(())
    }

    async fn execute(&self, kind: CommandKind, opts: &ResolvedOptions, responder: &dyn Responder) -> Result<()> {
        match kind {
            CommandKind::Hello => {
                let author = opts.author.as_deref().unwrap_or("there");
                responder.send(&format!("Hello {}! How are you?", author)).await
            }
            CommandKind::Table => responder.send(TABLE_DESCRIPTION).await,
            CommandKind::Summarize | CommandKind::Eli5 => {
                let chain = require(&self.services.summarize, "summarization")?;
                responder.defer().await?;

                let (style, heading) = if kind == CommandKind::Summarize {
                    (SummaryStyle::Bullets, "summary")
                } else {
                    (SummaryStyle::Eli5, "explanation")
                };
                let (text, secs) = chain.run(&opts.text, style, opts.temperature, opts.model).await?;
                let body = format!(
                    "Here is the {} of {}:\n\n{}{}",
                    heading,
                    opts.text,
                    text,
                    footer(opts.temperature, opts.model, secs)
                );
                self.send_paginated(responder, &body).await
            }
            CommandKind::Search => {
                let agent = require(&self.services.search, "search")?;
                responder.defer().await?;

                let (response, secs) = agent.run(&opts.text, opts.temperature, opts.model).await?;
                let body = format_agent(&response) + &footer(opts.temperature, opts.model, secs);
                self.send_paginated(responder, &body).await
            }
            CommandKind::Sql => {
                let chain = require(&self.services.sql_chain, "sql")?;
                responder.defer().await?;

                let (response, secs) = chain.run(&opts.text, opts.temperature, opts.model).await?;
                let body = format_chain(&response) + &footer(opts.temperature, opts.model, secs);
                self.send_paginated(responder, &body).await
            }
            CommandKind::SqlAgent => {
                let agent = require(&self.services.sql_agent, "sql-agent")?;
                responder.defer().await?;

                let (response, secs) = agent.run(&opts.text, opts.temperature, opts.model).await?;
                let body = format_agent(&response) + &footer(opts.temperature, opts.model, secs);
                self.send_paginated(responder, &body).await
            }
            CommandKind::AskEy | CommandKind::Board => {
                let qa = require(&self.services.qa, "question answering")?;
                responder.defer().await?;

                let selector = if kind == CommandKind::AskEy {
                    IndexSelector::Ey
                } else {
                    IndexSelector::Board
                };
                let (result, secs) = qa.answer(&opts.text, opts.temperature, opts.model, selector).await?;
                let blocks = format_qa(&result)?;

                let mut blocks = blocks.into_iter();
                let answer = blocks.next().unwrap_or_default() + &footer(opts.temperature, opts.model, secs);
                self.send_paginated(responder, &answer).await?;

                if opts.show_source {
                    for block in blocks {
                        responder.send(&truncate(&block, self.limits.max_message_length)).await?;
                    }
                }
                Ok(())
            }
        }
    }

    async fn send_paginated(&self, responder: &dyn Responder, text: &str) -> Result<()> {
        for page in paginate(
            text,
            self.limits.max_initial_message_length,
            self.limits.max_message_length,
        ) {
            responder.send(&page).await?;
        }
        Ok(())
    }
}
