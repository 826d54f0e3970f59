//! Session configuration.
//!
//! Loaded from `~/.dbchat/config.yaml` when present; every field has a default
//! so an empty or missing file gives a working local setup.

use crate::types::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub llm: LlmConfig,
    pub schema: SchemaConfig,
    pub diagnostics: DiagnosticsConfig,
    pub session: SessionConfig,
}

/// MySQL connection descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Schema used for data queries and index introspection
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "company_db".to_string(),
        }
    }
}

/// How the model is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmBackendKind {
    /// Spawn `<command> run <model> <prompt>`
    #[default]
    Process,
    /// POST to `<endpoint>/api/generate`
    OllamaHttp,
}

/// LLM collaborator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: LlmBackendKind,
    pub command: String,
    pub model: String,
    pub endpoint: String,
    /// No value means wait for the model indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackendKind::Process,
            command: "ollama".to_string(),
            model: "llama3".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            timeout_secs: None,
        }
    }
}

/// Table described to the model and named in index suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub table: String,
    pub columns: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            table: "employees".to_string(),
            columns: [
                "emp_id",
                "first_name",
                "last_name",
                "email",
                "hire_date",
                "job_title",
                "phone",
                "salary",
                "department_id",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// May start with `~`
    pub slow_log_path: String,
    /// Keyword prefixed to a statement to get its plan
    pub plan_keyword: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            slow_log_path: "/var/log/mysql/mysql-slow.log".to_string(),
            plan_keyword: "EXPLAIN".to_string(),
        }
    }
}

impl DiagnosticsConfig {
    /// Slow log path with `~` expanded.
    pub fn slow_log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.slow_log_path).to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Refuse anything but plain queries
    pub read_only: bool,
    pub spell_check: bool,
    pub history_file: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            spell_check: true,
            history_file: None,
        }
    }
}

impl SessionConfig {
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).to_string()))
    }
}

impl Config {
    /// Get default config directory (~/.dbchat/).
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| ChatError::ConfigError("HOME not set".to_string()))?;
        Ok(PathBuf::from(home).join(".dbchat"))
    }

    /// Get default config file path (~/.dbchat/config.yaml).
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Ok(p) => (p, false),
                Err(_) => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                return Err(ChatError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content)
            .map_err(|e| ChatError::ConfigError(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_local_setup() {
        let config = Config::default();
        assert_eq!(config.store.host, "localhost");
        assert_eq!(config.store.database, "company_db");
        assert_eq!(config.llm.backend, LlmBackendKind::Process);
        assert_eq!(config.llm.timeout_secs, None);
        assert_eq!(config.schema.table, "employees");
        assert_eq!(config.schema.columns.len(), 9);
        assert!(config.session.spell_check);
        assert!(!config.session.read_only);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "store:\n  database: hr\nllm:\n  backend: ollama_http\n  timeout_secs: 45\n",
        )
        .unwrap();
        assert_eq!(config.store.database, "hr");
        assert_eq!(config.store.port, 3306);
        assert_eq!(config.llm.backend, LlmBackendKind::OllamaHttp);
        assert_eq!(config.llm.timeout_secs, Some(45));
        assert_eq!(config.llm.model, "llama3");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "session:\n  read_only: true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.session.read_only);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/dbchat.yaml"))).unwrap_err();
        assert!(matches!(err, ChatError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "store: [not, a, map]").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ChatError::ConfigError(_)));
    }

    #[test]
    fn test_tilde_expansion() {
        let diagnostics = DiagnosticsConfig {
            slow_log_path: "/tmp/slow.log".to_string(),
            ..Default::default()
        };
        assert_eq!(diagnostics.slow_log_path(), PathBuf::from("/tmp/slow.log"));

        let session = SessionConfig {
            history_file: Some("~/.dbchat_history".to_string()),
            ..Default::default()
        };
        assert!(!session.history_path().unwrap().to_string_lossy().starts_with('~'));
    }
}
