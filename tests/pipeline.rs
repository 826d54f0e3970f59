//! End-to-end turns through the public API with in-memory collaborators.

use async_trait::async_trait;
use db_chat::display::{Renderer, Tone};
use db_chat::llm::{ExtractionSource, LlmBackend, LlmClient, TimeoutPolicy};
use db_chat::query::{Advice, Insight};
use db_chat::store::Store;
use db_chat::types::Value;
use db_chat::{
    classify, extract, ChatError, Config, Intent, InteractiveSession, QueryExplainer, Result,
    ResultSet, ScriptedInput, TurnOutcome,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted answers and records every prompt.
struct ScriptedLlm {
    answers: Mutex<VecDeque<String>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl LlmBackend for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ChatError::llm("no scripted answer left"))
    }
}

/// Accepts `SELECT`/`EXPLAIN`, rejects everything else like a server would.
struct EmployeeStore {
    executed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Store for EmployeeStore {
    fn namespace(&self) -> &str {
        "company_db"
    }

    async fn query(&self, sql: &str) -> Result<ResultSet> {
        self.executed.lock().unwrap().push(sql.to_string());
        let upper = sql.trim_start().to_uppercase();
        if upper.starts_with("EXPLAIN") {
            ResultSet::new(
                vec!["select_type".into(), "table".into(), "type".into()],
                vec![vec!["SIMPLE".into(), "employees".into(), "ALL".into()]],
            )
        } else if upper.starts_with("SELECT") {
            ResultSet::new(
                vec!["first_name".into(), "hire_date".into()],
                vec![
                    vec![Value::from("Grace"), Value::from("2024-02-01")],
                    vec![Value::from("Alan"), Value::Null],
                ],
            )
        } else {
            Err(ChatError::query(format!(
                "You have an error in your SQL syntax near '{}'",
                sql
            )))
        }
    }
}

#[derive(Clone, Default)]
struct Transcript(Arc<Mutex<Vec<String>>>);

impl Transcript {
    fn contains(&self, needle: &str) -> bool {
        self.0.lock().unwrap().iter().any(|l| l.contains(needle))
    }
}

impl Renderer for Transcript {
    fn table(&mut self, title: &str, result: &ResultSet) {
        self.0
            .lock()
            .unwrap()
            .push(format!("[{}] {} rows", title, result.len()));
    }

    fn panel(&mut self, title: &str, body: &str, _tone: Tone) {
        self.0.lock().unwrap().push(format!("[{}] {}", title, body));
    }

    fn text(&mut self, _tone: Tone, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

struct World {
    session: InteractiveSession,
    prompts: Arc<Mutex<Vec<String>>>,
    executed: Arc<Mutex<Vec<String>>>,
    transcript: Transcript,
}

fn world(answers: &[&str]) -> World {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let executed = Arc::new(Mutex::new(Vec::new()));
    let transcript = Transcript::default();

    let llm = LlmClient::new(
        Box::new(ScriptedLlm {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            prompts: prompts.clone(),
        }),
        TimeoutPolicy::Unbounded,
    );
    let session = InteractiveSession::new(
        &Config::default(),
        Box::new(EmployeeStore {
            executed: executed.clone(),
        }),
        llm,
        Box::new(transcript.clone()),
    );

    World {
        session,
        prompts,
        executed,
        transcript,
    }
}

#[test]
fn test_routing_priority() {
    assert_eq!(classify("slow query and index"), Intent::SlowQueryDiagnostics);
    assert_eq!(classify("  Index   "), Intent::IndexDiagnostics);
    assert_eq!(classify("system performance"), Intent::PerformanceDiagnostics);
    assert_eq!(classify(""), Intent::GeneralKnowledge);
    assert_eq!(classify("update the payroll"), Intent::GeneralKnowledge);
    assert_eq!(classify("SELECT everything FROM employees"), Intent::DataQuery);
}

#[test]
fn test_extraction_properties() {
    let fenced = extract("```sql\nSELECT 1;\n```\nYou could also SELECT 2;");
    assert_eq!(fenced.sql, "SELECT 1;");
    assert_eq!(fenced.source, ExtractionSource::FencedBlock);

    assert_eq!(
        extract("Here you go: SELECT * FROM employees; thanks").sql,
        "SELECT * FROM employees;"
    );
    assert_eq!(extract("SELECT * FROM employees").sql, "SELECT * FROM employees");

    let raw = extract("  I cannot help with that.  ");
    assert_eq!(raw.sql, "I cannot help with that.");
    assert!(raw.is_ambiguous());
}

#[test]
fn test_insight_and_advice_are_independent() {
    let e = QueryExplainer::default().explain("SELECT * FROM employees ORDER BY salary DESC LIMIT 5");
    assert_eq!(e.insight, Insight::HighestSalary);
    assert_eq!(e.advice, Advice::IndexSalary);
    assert_eq!(
        e.suggestion.as_deref(),
        Some("ALTER TABLE employees ADD INDEX idx_salary (salary);")
    );
}

#[tokio::test]
async fn test_most_recently_hired_scenario() {
    let mut w = world(&[
        "Sure!\n```sql\nSELECT first_name, hire_date FROM employees ORDER BY hire_date DESC LIMIT 5;\n```",
    ]);

    let report = match w.session.handle_turn("show me employees hired most recently").await {
        TurnOutcome::DataQuery(report) => report,
        other => panic!("expected a data query, got {:?}", other),
    };

    assert!(report.statement.sql.contains("ORDER BY hire_date DESC"));
    let explanation = report.explanation.as_ref().expect("rows were returned");
    assert_eq!(explanation.insight, Insight::MostRecentlyHired);
    assert_eq!(explanation.advice, Advice::IndexHireDate);
    assert!(matches!(report.plan, Some(Ok(ref plan)) if plan.len() == 1));

    let prompts = w.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("show me employees hired most recently"));
    assert!(prompts[0].contains("hire_date"));

    assert!(w.transcript.contains("This shows most recently hired employees."));
    assert!(w.transcript.contains("ALTER TABLE employees ADD INDEX idx_hire_date (hire_date);"));
}

#[tokio::test]
async fn test_index_diagnostics_skip_llm() {
    let mut w = world(&[]);

    let outcome = w.session.handle_turn("check index usage").await;
    assert!(matches!(outcome, TurnOutcome::Diagnostics(Intent::IndexDiagnostics)));
    assert!(w.prompts.lock().unwrap().is_empty());
    assert!(w.executed.lock().unwrap()[0].contains("company_db"));
}

#[tokio::test]
async fn test_malformed_statement_does_not_end_session() {
    let mut w = world(&[
        "DELETE FROM FROM employees",
        "SELECT first_name FROM employees WHERE department_id = 3;",
    ]);
    let mut input = ScriptedInput::new([
        "remove employee records",
        "employees in department 3",
        "quit",
    ]);

    let turns = w.session.run(&mut input).await.unwrap();

    assert_eq!(turns, 2);
    assert!(w.transcript.contains("Error running query"));
    assert!(w.transcript.contains("Filtered result based on specified condition."));
    assert!(w.transcript.contains("Indexing department_id can help with filtering."));
}

#[tokio::test]
async fn test_end_of_input_ends_session() {
    let mut w = world(&["Paris."]);
    let mut input = ScriptedInput::new(["what is the capital of france"]);

    assert_eq!(w.session.run(&mut input).await.unwrap(), 1);
    assert!(w.transcript.contains("Paris."));
}
