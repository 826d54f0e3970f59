//! db-chat CLI
//!
//! Interactive assistant for the employee database.

use clap::Parser;
use colored::Colorize;
use db_chat::config::LlmBackendKind;
use db_chat::otel::init_tracing;
use db_chat::{Config, InteractiveSession, ReadlineSource};
use std::path::PathBuf;

/// db-chat - ask the employee database in plain language
#[derive(Parser)]
#[command(name = "dbchat")]
#[command(about = "Chat with a MySQL employee database through a local LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.dbchat/config.yaml)
    #[arg(long, env = "DBCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// MySQL host
    #[arg(long, env = "DBCHAT_HOST")]
    host: Option<String>,

    /// MySQL port
    #[arg(long, env = "DBCHAT_PORT")]
    port: Option<u16>,

    /// MySQL user
    #[arg(long, env = "DBCHAT_USER")]
    user: Option<String>,

    /// MySQL password
    #[arg(long, env = "DBCHAT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Schema to query
    #[arg(long, env = "DBCHAT_DATABASE")]
    database: Option<String>,

    /// Model name passed to the LLM backend
    #[arg(long, env = "DBCHAT_MODEL")]
    model: Option<String>,

    /// Use the Ollama HTTP API instead of spawning the CLI
    #[arg(long)]
    ollama_http: bool,

    /// Give up on the model after this many seconds
    #[arg(long)]
    llm_timeout: Option<u64>,

    /// Refuse statements that modify data or schema
    #[arg(long)]
    read_only: bool,

    /// Send requests to the model exactly as typed
    #[arg(long)]
    no_spell_check: bool,

    /// Log filter directive (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.store.host = host.clone();
        }
        if let Some(port) = self.port {
            config.store.port = port;
        }
        if let Some(user) = &self.user {
            config.store.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.store.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.store.database = database.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if self.ollama_http {
            config.llm.backend = LlmBackendKind::OllamaHttp;
        }
        if self.llm_timeout.is_some() {
            config.llm.timeout_secs = self.llm_timeout;
        }
        if self.read_only {
            config.session.read_only = true;
        }
        if self.no_spell_check {
            config.session.spell_check = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_json)?;

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    if cli.print_config {
        let mut shown = config.clone();
        if !shown.store.password.is_empty() {
            shown.store.password = "********".to_string();
        }
        print!("{}", serde_yaml::to_string(&shown)?);
        return Ok(());
    }

    println!(
        "{}",
        "🤖 Welcome to DB Chat! Ask about your data, or type 'exit' to quit."
            .cyan()
            .bold()
    );
    println!(
        "  Database: {}@{}:{}/{}",
        config.store.user, config.store.host, config.store.port, config.store.database
    );
    println!("  Model: {} ({:?})", config.llm.model, config.llm.backend);
    if config.session.read_only {
        println!("  Mode: read-only");
    }
    println!();

    let mut session = InteractiveSession::from_config(&config);
    let mut input = ReadlineSource::new(config.session.history_path())?;
    let turns = session.run(&mut input).await?;

    println!("{}", "👋 Goodbye!".cyan());
    tracing::info!(turns, "session ended");
    Ok(())
}
