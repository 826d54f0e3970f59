//! db-chat - conversational assistant over a MySQL employee database
//!
//! Each line typed by the user is routed to exactly one handler:
//! - diagnostics (slow query log, index listing, host/server metrics), answered
//!   without the LLM
//! - general questions, answered by the local LLM
//! - data requests, turned into SQL by the LLM, executed, explained and planned
//!
//! Components:
//! - `llm`: intent routing, prompt, model client, SQL extraction
//! - `query`: rule-based explanation, plan inspection, statement guard
//! - `store`: MySQL collaborator
//! - `diagnostics`: slow log, indexes, metrics
//! - `session`: the read-evaluate-print loop
//!
//! # Example
//!
//! ```rust,ignore
//! use db_chat::{Config, InteractiveSession, ReadlineSource};
//!
//! let config = Config::load(None)?;
//! let mut session = InteractiveSession::from_config(&config);
//! let mut input = ReadlineSource::new(config.session.history_path())?;
//! session.run(&mut input).await?;
//! ```

pub mod config;
pub mod diagnostics;
pub mod display;
pub mod llm;
pub mod otel;
pub mod predicate;
pub mod query;
pub mod session;
pub mod spelling;
pub mod store;
pub mod types;

pub use config::Config;
pub use llm::{classify, extract, Intent};
pub use query::QueryExplainer;
pub use session::{InteractiveSession, LineSource, ReadlineSource, ScriptedInput, TurnOutcome};
pub use types::{ChatError, Result, ResultSet, Utterance};
