//! Interactive read-evaluate-print loop.
//!
//! One utterance is fully resolved (routing, model call, statement execution,
//! rendering) before the next line is read. Every failure inside a turn is
//! rendered and turned into [`TurnOutcome::Failed`]; only `exit`/`quit` or end
//! of input stops the loop.

use crate::config::Config;
use crate::diagnostics::{collect_metrics, list_indexes, read_slow_log};
use crate::display::{Renderer, TerminalRenderer, Tone};
use crate::llm::{classify, extract, CandidateStatement, Intent, LlmClient, SqlPrompt};
use crate::otel::turn_span;
use crate::query::{
    classify_statement, statement_count, Explanation, PlanInspector, QueryExplainer, StatementKind,
};
use crate::spelling::{PassThrough, SpellCorrector, VocabularyCorrector};
use crate::store::{MySqlStore, Store};
use crate::types::{ChatError, Result, ResultSet, Utterance};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{debug, info, warn, Instrument, Span};

/// Prompt shown before each utterance.
pub const PROMPT: &str = "Ask 🤖: ";

/// Source of input lines.
pub trait LineSource {
    /// Next line, or `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Line editor on the terminal with optional persisted history.
pub struct ReadlineSource {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl ReadlineSource {
    pub fn new(history: Option<PathBuf>) -> Result<Self> {
        let mut editor = DefaultEditor::new().map_err(|e| ChatError::InputError(e.to_string()))?;
        if let Some(path) = &history {
            // first run has no history file yet
            let _ = editor.load_history(path);
        }
        Ok(Self { editor, history })
    }
}

impl LineSource for ReadlineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(ChatError::InputError(e.to_string())),
            }
        }
    }
}

impl Drop for ReadlineSource {
    fn drop(&mut self) {
        if let Some(path) = &self.history {
            if let Err(e) = self.editor.save_history(path) {
                warn!(error = %e, path = %path.display(), "failed to save history");
            }
        }
    }
}

/// Fixed list of lines, for scripted sessions and tests.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Everything the data-query path produced.
#[derive(Debug)]
pub struct DataQueryReport {
    /// Request after spell correction
    pub corrected: String,
    pub statement: CandidateStatement,
    pub kind: StatementKind,
    pub result: ResultSet,
    /// `None` when the statement returned no rows
    pub explanation: Option<Explanation>,
    /// `None` when the statement returned no rows
    pub plan: Option<Result<ResultSet>>,
}

/// Result of one turn.
#[derive(Debug)]
pub enum TurnOutcome {
    Exit,
    /// Blank line
    Skipped,
    Diagnostics(Intent),
    GeneralAnswer(String),
    DataQuery(Box<DataQueryReport>),
    Failed(ChatError),
}

/// Handles available to a single turn.
pub struct SessionContext<'a> {
    pub store: &'a dyn Store,
    pub renderer: &'a mut dyn Renderer,
}

/// Stateless parts of the pipeline, shared by every turn.
struct TurnPipeline {
    llm: LlmClient,
    speller: Box<dyn SpellCorrector>,
    prompt: SqlPrompt,
    explainer: QueryExplainer,
    planner: PlanInspector,
    slow_log_path: PathBuf,
    read_only: bool,
}

/// The interactive assistant.
pub struct InteractiveSession {
    pipeline: TurnPipeline,
    store: Box<dyn Store>,
    renderer: Box<dyn Renderer>,
}

impl InteractiveSession {
    /// Assemble a session from explicit collaborators.
    pub fn new(
        config: &Config,
        store: Box<dyn Store>,
        llm: LlmClient,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let speller: Box<dyn SpellCorrector> = if config.session.spell_check {
            Box::new(VocabularyCorrector::for_schema(&config.schema))
        } else {
            Box::new(PassThrough)
        };

        Self {
            pipeline: TurnPipeline {
                llm,
                speller,
                prompt: SqlPrompt::new(&config.schema),
                explainer: QueryExplainer::new(&config.schema.table),
                planner: PlanInspector::new(&config.diagnostics.plan_keyword),
                slow_log_path: config.diagnostics.slow_log_path(),
                read_only: config.session.read_only,
            },
            store,
            renderer,
        }
    }

    /// MySQL store, configured LLM backend and terminal output.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Box::new(MySqlStore::new(config.store.clone())),
            LlmClient::from_config(&config.llm),
            Box::new(TerminalRenderer),
        )
    }

    /// Replace the spell corrector.
    pub fn with_spell_corrector(mut self, speller: Box<dyn SpellCorrector>) -> Self {
        self.pipeline.speller = speller;
        self
    }

    /// Read and handle lines until exit or end of input.
    ///
    /// # Returns
    ///
    /// Number of turns handled (blank lines and the exit command excluded)
    ///
    /// # Errors
    ///
    /// Only input errors; turn failures are rendered and the loop continues
    pub async fn run(&mut self, input: &mut dyn LineSource) -> Result<usize> {
        let mut turns = 0;
        while let Some(line) = input.read_line(PROMPT)? {
            match self.handle_turn(&line).await {
                TurnOutcome::Exit => break,
                TurnOutcome::Skipped => {}
                outcome => {
                    if let TurnOutcome::Failed(e) = &outcome {
                        debug!(error = %e, recoverable = e.is_recoverable(), "turn failed");
                    }
                    turns += 1;
                }
            }
        }
        Ok(turns)
    }

    /// Route and resolve one line of input.
    pub async fn handle_turn(&mut self, line: &str) -> TurnOutcome {
        let utterance = Utterance::new(line);
        if utterance.is_exit() {
            return TurnOutcome::Exit;
        }
        if utterance.is_blank() {
            return TurnOutcome::Skipped;
        }

        let mut ctx = SessionContext {
            store: self.store.as_ref(),
            renderer: self.renderer.as_mut(),
        };
        let pipeline = &self.pipeline;
        pipeline
            .handle(&mut ctx, &utterance)
            .instrument(turn_span())
            .await
    }
}

impl TurnPipeline {
    async fn handle(&self, ctx: &mut SessionContext<'_>, utterance: &Utterance) -> TurnOutcome {
        let intent = classify(utterance.normalized());
        Span::current().record("intent", intent.as_str());
        info!(intent = %intent, "routed utterance");

        match intent {
            Intent::SlowQueryDiagnostics => {
                self.show_slow_log(ctx).await;
                TurnOutcome::Diagnostics(intent)
            }
            Intent::IndexDiagnostics => {
                show_indexes(ctx).await;
                TurnOutcome::Diagnostics(intent)
            }
            Intent::PerformanceDiagnostics => {
                show_metrics(ctx).await;
                TurnOutcome::Diagnostics(intent)
            }
            Intent::GeneralKnowledge => self.answer(ctx, utterance).await,
            Intent::DataQuery => match self.data_query(ctx, utterance).await {
                Ok(report) => TurnOutcome::DataQuery(Box::new(report)),
                Err(e) => {
                    ctx.renderer.text(Tone::Error, &format!("❌ Error running query: {}", e));
                    TurnOutcome::Failed(e)
                }
            },
        }
    }

    async fn show_slow_log(&self, ctx: &mut SessionContext<'_>) {
        match read_slow_log(&self.slow_log_path).await {
            Ok(log) => ctx.renderer.panel(&log.title(), &log.contents, Tone::Error),
            Err(e) => {
                warn!(error = %e, "slow query log unavailable");
                ctx.renderer.text(Tone::Warning, &format!("⚠️ {}", e));
            }
        }
    }

    async fn answer(&self, ctx: &mut SessionContext<'_>, utterance: &Utterance) -> TurnOutcome {
        ctx.renderer.text(Tone::Suggestion, "💬 General Knowledge Answer:");
        match self.llm.ask(utterance.normalized()).await {
            Ok(answer) => {
                ctx.renderer.text(Tone::Success, &answer);
                TurnOutcome::GeneralAnswer(answer)
            }
            Err(e) => {
                ctx.renderer.text(Tone::Error, &format!("❌ {}", e));
                TurnOutcome::Failed(e)
            }
        }
    }

    async fn data_query(
        &self,
        ctx: &mut SessionContext<'_>,
        utterance: &Utterance,
    ) -> Result<DataQueryReport> {
        let corrected = self.speller.correct(utterance.normalized());
        ctx.renderer.text(Tone::Heading, &format!("📝 Did you mean: {}", corrected));

        let raw = self.llm.ask(&self.prompt.render(&corrected)).await?;
        let statement = extract(&raw);
        if statement.is_ambiguous() {
            warn!(output = %raw, "no SQL found in model output, executing raw text");
        }

        let kind = classify_statement(&statement.sql);
        debug!(sql = %statement.sql, source = %statement.source, kind = %kind, "candidate statement");

        ctx.renderer.text(Tone::Heading, "🧠 Generated SQL:");
        ctx.renderer.text(Tone::Plain, &statement.sql);

        // the store would run every statement of a batch
        if let Some(count) = statement_count(&statement.sql).filter(|&n| n > 1) {
            return Err(ChatError::query(format!(
                "refusing to run {} statements from one reply",
                count
            )));
        }

        if self.read_only && !kind.is_read_only() {
            return Err(ChatError::RejectedStatement(format!(
                "read-only session refuses {} statements",
                kind
            )));
        }

        let result = ctx.store.query(&statement.sql).await?;

        if result.is_empty() {
            ctx.renderer.text(Tone::Warning, "📭 No results found.");
            return Ok(DataQueryReport {
                corrected,
                statement,
                kind,
                result,
                explanation: None,
                plan: None,
            });
        }

        ctx.renderer.table("📄 Query Result", &result);

        let explanation = self.explainer.explain(&statement.sql);
        ctx.renderer.text(Tone::Heading, "📘 Result Insight:");
        ctx.renderer.text(Tone::Plain, &explanation.summary);
        ctx.renderer.text(Tone::Suggestion, "🤖 AI Suggestion:");
        ctx.renderer.text(Tone::Plain, explanation.advice.describe());
        if let Some(ddl) = &explanation.suggestion {
            ctx.renderer.text(Tone::Plain, ddl);
        }

        ctx.renderer.text(Tone::Heading, "🧪 Query Performance Plan (EXPLAIN):");
        let plan = self.planner.get_plan(ctx.store, &statement.sql).await;
        match &plan {
            Ok(rows) => ctx.renderer.table("🧪 EXPLAIN Analysis", rows),
            Err(e) => ctx
                .renderer
                .text(Tone::Error, &format!("❌ Failed to run EXPLAIN: {}", e)),
        }

        Ok(DataQueryReport {
            corrected,
            statement,
            kind,
            result,
            explanation: Some(explanation),
            plan: Some(plan),
        })
    }
}

async fn show_indexes(ctx: &mut SessionContext<'_>) {
    match list_indexes(ctx.store).await {
        Ok(indexes) => ctx.renderer.table("🔍 Indexes Found", &indexes),
        Err(e) => ctx
            .renderer
            .text(Tone::Error, &format!("❌ Error checking indexes: {}", e)),
    }
}

async fn show_metrics(ctx: &mut SessionContext<'_>) {
    let snapshot = collect_metrics(ctx.store).await;
    ctx.renderer.panel("📊 SYSTEM PERFORMANCE", "", Tone::Success);
    ctx.renderer.text(Tone::Plain, &format!("🖥️  CPU Usage: {:.1}%", snapshot.host.cpu_percent));
    ctx.renderer.text(
        Tone::Plain,
        &format!("🧠 Memory Usage: {:.1}%", snapshot.host.memory_percent),
    );
    match snapshot.questions {
        Ok(count) => ctx
            .renderer
            .text(Tone::Plain, &format!("📈 MySQL Questions Count: {}", count)),
        Err(e) => ctx
            .renderer
            .text(Tone::Error, &format!("❌ Error getting performance metrics: {}", e)),
    }
}
