//! Loader for driftnet configuration with YAML + environment overlays.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Precedence, lowest first: built-in defaults, the
//! YAML file, then `DRIFTNET__SECTION__FIELD` environment variables. String
//! values may reference `${VAR}` placeholders, which are expanded after the
//! sources are merged.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriftnetConfig {
    pub browser: BrowserConfig,
    pub timeline: TimelineConfig,
    pub output: OutputConfig,
}

/// WebDriver endpoint and browser window settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".into(),
        }
    }
}

/// Where the timeline lives and how its markup is located.
///
/// Selector lists are ordered by priority: the most specific markup first,
/// the most generic fallback last.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub base_url: String,
    pub container_selectors: Vec<String>,
    pub text_selectors: Vec<String>,
    pub timestamp_selector: String,
    pub timestamp_attribute: String,
    /// Page-source fragments that mean the account does not exist.
    pub missing_markers: Vec<String>,
    pub load_timeout_secs: u64,
    pub selector_timeout_secs: u64,
    pub settle_interval_ms: u64,
    pub max_stall_iterations: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://x.com".into(),
            container_selectors: vec![
                r#"[data-testid="tweet"]"#.into(),
                "article".into(),
                r#"[data-testid="tweetText"]"#.into(),
                ".css-1dbjc4n".into(),
            ],
            text_selectors: vec![
                r#"[data-testid="tweetText"]"#.into(),
                ".css-901oao".into(),
                "div.css-1dbjc4n span".into(),
            ],
            timestamp_selector: "time".into(),
            timestamp_attribute: "datetime".into(),
            missing_markers: vec![
                "This account doesn't exist".into(),
                "Hmm...this page doesn't exist".into(),
            ],
            load_timeout_secs: 20,
            selector_timeout_secs: 20,
            settle_interval_ms: 3000,
            max_stall_iterations: 15,
        }
    }
}

/// Where artifacts (and diagnostic page dumps) are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `~` is expanded. When unset, the user's Desktop is used.
    pub directory: Option<String>,
}

impl OutputConfig {
    /// Resolve the output directory: explicit setting, then Desktop, then
    /// home, then the working directory.
    pub fn resolved_directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return PathBuf::from(shellexpand::tilde(dir).into_owned());
        }
        dirs::desktop_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct DriftnetConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for DriftnetConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftnetConfigLoader {
    /// Start with no files; only `DRIFTNET__` env overrides on top of defaults.
    ///
    /// ```
    /// use driftnet_config::DriftnetConfigLoader;
    ///
    /// let config = DriftnetConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.timeline.max_stall_iterations, 15);
    /// assert_eq!(config.timeline.container_selectors[1], "article");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use driftnet_config::DriftnetConfigLoader;
    ///
    /// let cfg = DriftnetConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// timeline:
    ///   settle_interval_ms: 500
    ///   container_selectors: ["div.post"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.timeline.settle_interval_ms, 500);
    /// assert_eq!(cfg.timeline.container_selectors, vec!["div.post"]);
    /// assert_eq!(cfg.timeline.timestamp_selector, "time");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Environment variables are added last so they win over every file.
    pub fn load(self) -> Result<DriftnetConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("DRIFTNET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
