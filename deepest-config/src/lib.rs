//! Loader for `deepest` configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `DEEPEST__`-prefixed
//! environment variables applied on top (`DEEPEST__HTTP__TIMEOUT_SECS=30`).
//! `${VAR}` placeholders inside string values are expanded after merging.
//! Every field has a default, so an empty configuration is valid.
use config::{Config, ConfigError, Environment, File};
use deepest_common::OutputFormat;
use deepest_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeepestConfig {
    pub http: HttpSettings,
    pub log: LogSettings,
    pub output: OutputFormat,
}

/// Page fetcher knobs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
    pub stderr: bool,
    pub file: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "warn".into(),
            format: LogFormat::Text,
            stderr: true,
            file: false,
            dir: None,
        }
    }
}

impl LogSettings {
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_file: self.file,
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

/// Expand `${VAR}` placeholders until the string stops changing, giving up
/// after `MAXIMUM_ENV_EXPANSION_DEPTH` rounds so cycles terminate.
fn expand_env_str(raw: &str) -> String {
    let mut cur = raw.to_string();
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let Ok(expanded) = shellexpand::env(&cur) else {
            break;
        };
        if expanded == cur {
            break;
        }
        cur = expanded.into_owned();
    }
    cur
}

/// Apply [`expand_env_str`] to every string leaf of the merged settings.
fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => *s = expand_env_str(s),
        Value::Array(items) => items.iter_mut().for_each(expand_env_in_value),
        Value::Object(fields) => fields.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct DeepestConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for DeepestConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepestConfigLoader {
    /// Start with defaults plus `DEEPEST__` env overrides.
    ///
    /// ```
    /// use deepest_config::DeepestConfigLoader;
    ///
    /// let config = DeepestConfigLoader::new()
    ///     .with_yaml_str("http:\n  timeout_secs: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.http.timeout_secs, 3);
    /// assert_eq!(config.http.connect_timeout_secs, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix("DEEPEST")
                .separator("__")
                .try_parsing(true),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use deepest_common::OutputFormat;
    /// use deepest_config::DeepestConfigLoader;
    ///
    /// unsafe { std::env::set_var("DEEPEST_DOC_AGENT", "docs-bot"); }
    ///
    /// let config = DeepestConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// output: json
    /// http:
    ///   user_agent: "${DEEPEST_DOC_AGENT}/1.0"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.output, OutputFormat::Json);
    /// assert_eq!(config.http.user_agent.as_deref(), Some("docs-bot/1.0"));
    ///
    /// unsafe { std::env::remove_var("DEEPEST_DOC_AGENT"); }
    /// ```
    pub fn load(self) -> Result<DeepestConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
