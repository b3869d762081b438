//! The configuration resolver (spec.md §4.2) plus JSONC file loading
//! (spec.md §6 "Configuration file", SPEC_FULL.md §2).
//!
//! Grounded on the teacher's `config/mod.rs` (`Config::rule_configurations`,
//! `get_rules_by_plugin_prefixed_name`, entry ordering and override
//! semantics) and `config/config_file.rs`
//! (`find_filename_in_ancestor_directory`, loading a config relative to
//! the current directory). The teacher loads YAML via `serde_yaml`; this
//! engine's file is JSONC, so the loader strips `//`/`/* */` comments and
//! trailing commas before handing the text to `serde_json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::warn;

use crate::diagnostic::Severity;
use crate::error::LintError;
use crate::registry::RuleRegistry;
use crate::rule::RuleOptions;

/// The resolved `{severity, options}` pair for one rule on one file
/// (spec.md §4.2 "Permissive rule-config parsing").
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub severity: Severity,
    pub options: RuleOptions,
}

impl RuleConfig {
    pub fn new(severity: Severity, options: RuleOptions) -> Self {
        Self { severity, options }
    }

    fn default_enabled() -> Self {
        Self::new(Severity::Error, RuleOptions::Null)
    }
}

/// Severity mapping: the three strings, plus numeric `0/1/2` equivalents
/// (spec.md §4.2). Anything else maps to `error` with a warning logged.
fn severity_from_value(value: &serde_json::Value) -> Option<Severity> {
    match value {
        serde_json::Value::String(s) => match s.as_str() {
            "off" => Some(Severity::Off),
            "warn" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            other => {
                warn!(severity = other, "unknown severity string, treating as error");
                Some(Severity::Error)
            }
        },
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(0) => Some(Severity::Off),
            Some(1) => Some(Severity::Warn),
            Some(2) => Some(Severity::Error),
            _ => {
                warn!(severity = %n, "unknown numeric severity, treating as error");
                Some(Severity::Error)
            }
        },
        _ => None,
    }
}

/// Parses one entry of a config's `rules` map per the permissive grammar
/// in spec.md §4.2. Returns `None` for malformed input ("entry skipped").
pub fn parse_rule_config_value(value: &serde_json::Value) -> Option<RuleConfig> {
    match value {
        serde_json::Value::String(_) | serde_json::Value::Number(_) => {
            severity_from_value(value).map(|severity| RuleConfig::new(severity, RuleOptions::Null))
        }
        serde_json::Value::Array(items) => {
            let severity = severity_from_value(items.first()?)?;
            let options = items.get(1).cloned().unwrap_or(RuleOptions::Null);
            Some(RuleConfig::new(severity, options))
        }
        serde_json::Value::Object(map) => {
            let level = map.get("level").or_else(|| map.get("severity"))?;
            let severity = severity_from_value(level)?;
            let options = map.get("options").cloned().unwrap_or(RuleOptions::Null);
            Some(RuleConfig::new(severity, options))
        }
        _ => None,
    }
}

/// One configuration entry: optional file/ignore filters, plugin names
/// to enable by default, and explicit per-rule overrides (spec.md §4.2).
///
/// `rules` is a `serde_json::Map` (not a `HashMap`) so that, with the
/// `preserve_order` feature enabled on `serde_json`, iterating it walks
/// the keys in document order rather than hash order — required for the
/// "rule-enabled insertion order" determinism spec.md §4.4/§8 demands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigEntry {
    #[serde(default)]
    pub files: Option<Vec<String>>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub rules: serde_json::Map<String, serde_json::Value>,
}

/// An insertion-ordered `ruleName -> RuleConfig` map (spec.md §4.4
/// "rule-enabled insertion order... stable across runs with equal
/// input"). A plain `HashMap` cannot provide that guarantee since its
/// iteration order is randomized per process.
#[derive(Debug, Clone, Default)]
pub struct EnabledRules {
    order: Vec<String>,
    configs: HashMap<String, RuleConfig>,
}

impl EnabledRules {
    fn insert_or_replace(&mut self, name: &str, config: RuleConfig) {
        if !self.configs.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.configs.insert(name.to_string(), config);
    }

    fn remove(&mut self, name: &str) {
        if self.configs.remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RuleConfig> {
        self.configs.get(name)
    }

    /// Enabled rules in enablement order, each paired with its position
    /// (the `rule_order` used to break diagnostic-sort ties).
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &RuleConfig)> {
        self.order
            .iter()
            .enumerate()
            .map(move |(i, name)| (i, name.as_str(), &self.configs[name]))
    }
}

fn compile_globset(patterns: &[String]) -> Result<GlobSet, LintError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| LintError::GlobCompile {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| LintError::GlobCompile {
        pattern: patterns.join(","),
        source,
    })
}

/// Forward-slash-normalized relative path, for cross-platform matching
/// (spec.md §4.2 step 1).
fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// An ordered list of configuration entries (spec.md §4.2). The JSONC
/// document's top level is the entry array itself (spec.md §6).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: Vec<ConfigEntry>,
}

impl Configuration {
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Resolves the rule map enabled for one file (spec.md §4.2 steps 1-4).
    #[tracing::instrument(skip(self, registry), fields(path = %path.display()))]
    pub fn resolve_for_file(
        &self,
        registry: &RuleRegistry,
        path: &Path,
    ) -> Result<EnabledRules, LintError> {
        let normalized = normalize_path(path);
        let raw = path.to_string_lossy().into_owned();
        let mut enabled = EnabledRules::default();

        for entry in &self.entries {
            if !entry.ignores.is_empty() {
                let globset = compile_globset(&entry.ignores)?;
                if globset.is_match(&normalized) || globset.is_match(&raw) {
                    continue;
                }
            }

            for plugin_name in &entry.plugins {
                for rule in registry.rules_for_plugin(plugin_name) {
                    enabled.insert_or_replace(&rule.meta().name.clone(), RuleConfig::default_enabled());
                }
            }

            for (name, value) in entry.rules.iter() {
                match parse_rule_config_value(value) {
                    Some(config) if config.severity == Severity::Off => {
                        enabled.remove(name);
                    }
                    Some(config) => {
                        enabled.insert_or_replace(name, config);
                    }
                    None => {
                        warn!(rule = name.as_str(), "malformed rule config entry, skipping");
                    }
                }
            }
        }

        Ok(enabled)
    }

    /// The shape emitted by an `init` command (spec.md §6 "a default
    /// template is emitted by an init command"), exposed here as a
    /// library value since the CLI itself is out of scope.
    pub fn default_template() -> Self {
        Self::new(vec![ConfigEntry {
            files: None,
            ignores: vec!["**/node_modules/**".to_string(), "**/dist/**".to_string()],
            plugins: Vec::new(),
            rules: serde_json::Map::new(),
        }])
    }
}

/// Strips `//` line comments, `/* */` block comments, and trailing
/// commas before arrays/objects close, so a JSONC document is valid
/// JSON (spec.md §6 "A JSON-with-comments document").
pub fn strip_jsonc_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut in_string = false;

    while let Some((_, ch)) = chars.next() {
        if in_string {
            out.push(ch);
            if ch == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = '\0';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    strip_trailing_commas(&out)
}

fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if ch == ',' {
            let mut lookahead = chars.clone();
            let mut only_whitespace = true;
            let mut closes = false;
            while let Some((_, c)) = lookahead.next() {
                if c.is_whitespace() {
                    continue;
                }
                closes = c == '}' || c == ']';
                only_whitespace = false;
                break;
            }
            if only_whitespace || closes {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

pub fn parse_jsonc(text: &str, path: &Path) -> Result<Configuration, LintError> {
    let stripped = strip_jsonc_comments(text);
    serde_json::from_str(&stripped).map_err(|source| LintError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Walks upward from `start` looking for `filename`, mirroring the
/// teacher's `find_filename_in_ancestor_directory`.
pub fn find_config_file(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut dir = if start.is_dir() {
        Some(start.to_path_buf())
    } else {
        start.parent().map(Path::to_path_buf)
    };

    while let Some(current) = dir {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent().map(Path::to_path_buf);
    }

    None
}

#[tracing::instrument]
pub fn load_config_file(start: &Path) -> Result<Configuration, LintError> {
    let path = find_config_file(start, "rslint.jsonc")
        .ok_or_else(|| LintError::ConfigNotFound(start.to_path_buf()))?;
    let text = std::fs::read_to_string(&path).map_err(LintError::FixtureIo)?;
    parse_jsonc(&text, &path)
}
