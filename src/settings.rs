//! Engine configuration.
//!
//! Settings come from an optional YAML file, then environment overrides.
//! Every field has a default so an empty file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub security_scan: bool,
    pub performance_analysis: bool,
    /// Longest accepted input, in characters.
    pub max_code_length: usize,
    pub max_requests_per_minute: usize,
    /// File extensions (without the dot) accepted for analysis.
    pub allowed_extensions: Vec<String>,
    pub hosted: HostedSettings,
    pub local_model: LocalModelSettings,
}

/// Hosted chat-completion backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostedSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

/// Local text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalModelSettings {
    pub endpoint: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "py", "js", "java", "cpp", "c", "ts", "jsx", "tsx", "php", "rb", "go", "rs", "swift",
];

impl Default for Settings {
    fn default() -> Self {
        Self {
            security_scan: true,
            performance_analysis: true,
            max_code_length: 100_000,
            max_requests_per_minute: 30,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            hosted: HostedSettings::default(),
            local_model: LocalModelSettings::default(),
        }
    }
}

impl Default for HostedSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for LocalModelSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "t5-base".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl Settings {
    /// Parse settings from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty document deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Settings file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(p) => Self::parse_file(p)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unparseable numbers are ignored and the current value is kept.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENABLE_SECURITY_SCAN") {
            self.security_scan = parse_flag(&v);
        }
        if let Some(v) = lookup("ENABLE_PERFORMANCE_ANALYSIS") {
            self.performance_analysis = parse_flag(&v);
        }
        if let Some(v) = lookup("MAX_CODE_LENGTH") {
            parse_number("MAX_CODE_LENGTH", &v, &mut self.max_code_length);
        }
        if let Some(v) = lookup("MAX_REQUESTS_PER_MINUTE") {
            parse_number("MAX_REQUESTS_PER_MINUTE", &v, &mut self.max_requests_per_minute);
        }
        if let Some(v) = lookup("OPENAI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.hosted.api_key = Some(v);
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.hosted.base_url = v;
        }
        if let Some(v) = lookup("HOSTED_MODEL") {
            self.hosted.model = v;
        }
        if let Some(v) = lookup("LOCAL_MODEL_URL").filter(|v| !v.trim().is_empty()) {
            self.local_model.endpoint = Some(v);
        }
        if let Some(v) = lookup("DEFAULT_MODEL") {
            self.local_model.model = v;
        }
    }

    /// Returns whether a file extension (without the dot) is accepted.
    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_number(key: &str, value: &str, slot: &mut usize) {
    match value.trim().parse() {
        Ok(n) => *slot = n,
        Err(_) => tracing::warn!(key, value, "ignoring non-numeric override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.security_scan);
        assert!(s.performance_analysis);
        assert_eq!(s.max_code_length, 100_000);
        assert_eq!(s.max_requests_per_minute, 30);
        assert_eq!(s.hosted.model, "gpt-3.5-turbo");
        assert_eq!(s.local_model.model, "t5-base");
        assert!(s.hosted.api_key.is_none());
        assert!(s.local_model.endpoint.is_none());
        assert!(s.is_extension_allowed("py"));
        assert!(s.is_extension_allowed("RS"));
        assert!(!s.is_extension_allowed("exe"));
    }

    #[test]
    fn test_flags_true_only_for_true() {
        let mut s = Settings::default();
        s.apply_env(lookup(&[
            ("ENABLE_SECURITY_SCAN", "TRUE"),
            ("ENABLE_PERFORMANCE_ANALYSIS", "yes"),
        ]));
        assert!(s.security_scan);
        assert!(!s.performance_analysis);
    }

    #[test]
    fn test_env_overrides() {
        let mut s = Settings::default();
        s.apply_env(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LOCAL_MODEL_URL", "http://127.0.0.1:9/generate"),
            ("DEFAULT_MODEL", "codet5"),
            ("MAX_REQUESTS_PER_MINUTE", "5"),
            ("MAX_CODE_LENGTH", "not-a-number"),
        ]));
        assert_eq!(s.hosted.api_key.as_deref(), Some("sk-test"));
        assert_eq!(s.local_model.endpoint.as_deref(), Some("http://127.0.0.1:9/generate"));
        assert_eq!(s.local_model.model, "codet5");
        assert_eq!(s.max_requests_per_minute, 5);
        assert_eq!(s.max_code_length, 100_000);
    }

    #[test]
    fn test_blank_api_key_leaves_hosted_unconfigured() {
        let mut s = Settings::default();
        s.apply_env(lookup(&[("OPENAI_API_KEY", "  ")]));
        assert!(s.hosted.api_key.is_none());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "performance_analysis: false\nhosted:\n  model: gpt-4o-mini\nallowed_extensions: [py]"
        )
        .unwrap();

        let s = Settings::parse_file(file.path()).unwrap();
        assert!(s.security_scan);
        assert!(!s.performance_analysis);
        assert_eq!(s.hosted.model, "gpt-4o-mini");
        assert_eq!(s.hosted.timeout_ms, 30_000);
        assert_eq!(s.allowed_extensions, vec!["py"]);
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(Settings::parse_file(file.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_missing_and_invalid_files() {
        assert!(matches!(
            Settings::parse_file("/nonexistent/codescribe.yaml"),
            Err(SettingsError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "security_scan: [not, a, bool]").unwrap();
        assert!(matches!(
            Settings::parse_file(file.path()),
            Err(SettingsError::Parse { .. })
        ));
    }
}
