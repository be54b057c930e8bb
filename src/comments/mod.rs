//! Comment synthesis.
//!
//! Python and JavaScript are annotated locally from template tables. Every
//! other language goes through the strategy chain:
//!
//! ```text
//! hosted chat completion -> local generation endpoint -> generic fallback
//! ```
//!
//! Strategies that are unconfigured are simply absent from the chain; a
//! strategy that fails declines and the next one is tried. The generic
//! fallback cannot fail.

mod hosted;
mod local;
mod strategy;
mod templates;

pub use hosted::HostedStrategy;
pub use local::LocalModelStrategy;
pub use strategy::{CommentStrategy, StrategyError};
pub use templates::{TemplateTable, JAVASCRIPT_TEMPLATES, PYTHON_TEMPLATES};

use std::panic::{self, AssertUnwindSafe};

use crate::language::SourceLanguage;
use crate::settings::Settings;

/// Header line prefixed to source the chain could not annotate.
pub const FALLBACK_HEADER: &str = "# Generated comments for code";

/// Prefix the generic header to the unmodified source.
pub fn fallback_comments(source: &str) -> String {
    format!("{}\n{}", FALLBACK_HEADER, source)
}

/// Ordered chain of generation strategies.
#[derive(Default)]
pub struct CommentSynthesizer {
    strategies: Vec<Box<dyn CommentStrategy>>,
}

impl CommentSynthesizer {
    pub fn new(strategies: Vec<Box<dyn CommentStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the chain from whichever backends are configured.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut strategies: Vec<Box<dyn CommentStrategy>> = Vec::new();
        if let Some(hosted) = HostedStrategy::from_settings(&settings.hosted) {
            strategies.push(Box::new(hosted));
        }
        if let Some(local) = LocalModelStrategy::from_settings(&settings.local_model) {
            strategies.push(Box::new(local));
        }
        tracing::debug!(
            strategies = ?strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "comment strategy chain configured"
        );
        Self { strategies }
    }

    /// Names of the configured strategies, in chain order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Produce commented source. Never fails.
    pub fn synthesize(&self, source: &str, language: SourceLanguage) -> String {
        match language {
            SourceLanguage::Python => PYTHON_TEMPLATES.annotate(source),
            SourceLanguage::JavaScript => JAVASCRIPT_TEMPLATES.annotate(source),
            SourceLanguage::Java
            | SourceLanguage::Cpp
            | SourceLanguage::C
            | SourceLanguage::TypeScript
            | SourceLanguage::Php
            | SourceLanguage::Ruby
            | SourceLanguage::Go
            | SourceLanguage::Rust
            | SourceLanguage::Swift
            | SourceLanguage::Unknown => self.run_chain(source, language),
        }
    }

    fn run_chain(&self, source: &str, language: SourceLanguage) -> String {
        for strategy in &self.strategies {
            let attempt =
                panic::catch_unwind(AssertUnwindSafe(|| strategy.try_generate(source, language)));
            match attempt {
                Ok(Some(text)) => {
                    tracing::debug!(strategy = strategy.name(), %language, "comments generated");
                    return text;
                }
                Ok(None) => {}
                Err(_) => {
                    tracing::warn!(strategy = strategy.name(), "comment strategy panicked, falling through");
                }
            }
        }
        fallback_comments(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed(Option<&'static str>, Arc<AtomicUsize>);

    impl CommentStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn try_generate(&self, _source: &str, _language: SourceLanguage) -> Option<String> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.map(String::from)
        }
    }

    #[test]
    fn test_python_uses_templates() {
        let synth = CommentSynthesizer::default();
        assert_eq!(
            synth.synthesize("import os", SourceLanguage::Python),
            "# Import os module\nimport os"
        );
    }

    #[test]
    fn test_javascript_uses_templates() {
        let synth = CommentSynthesizer::default();
        assert_eq!(
            synth.synthesize("let n = 1;", SourceLanguage::JavaScript),
            "// Declare variable n\nlet n = 1;"
        );
    }

    #[test]
    fn test_empty_chain_falls_back() {
        let synth = CommentSynthesizer::default();
        assert_eq!(
            synth.synthesize("fn main() {}", SourceLanguage::Rust),
            "# Generated comments for code\nfn main() {}"
        );
        assert_eq!(
            synth.synthesize("", SourceLanguage::Unknown),
            "# Generated comments for code\n"
        );
    }

    #[test]
    fn test_chain_falls_through_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let synth = CommentSynthesizer::new(vec![
            Box::new(Fixed(None, calls.clone())),
            Box::new(Fixed(Some("second"), calls.clone())),
            Box::new(Fixed(Some("third"), calls.clone())),
        ]);
        assert_eq!(synth.synthesize("int x;", SourceLanguage::C), "second");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    struct Panicking;

    impl CommentStrategy for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn try_generate(&self, _source: &str, _language: SourceLanguage) -> Option<String> {
            panic!("backend blew up");
        }
    }

    #[test]
    fn test_panicking_strategy_falls_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let synth = CommentSynthesizer::new(vec![
            Box::new(Panicking),
            Box::new(Fixed(Some("recovered"), calls.clone())),
        ]);
        assert_eq!(synth.synthesize("int x;", SourceLanguage::C), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let only_panics = CommentSynthesizer::new(vec![Box::new(Panicking)]);
        assert_eq!(
            only_panics.synthesize("int x;", SourceLanguage::C),
            "# Generated comments for code\nint x;"
        );
    }

    #[test]
    fn test_template_languages_skip_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let synth = CommentSynthesizer::new(vec![Box::new(Fixed(Some("x"), calls.clone()))]);
        synth.synthesize("x = 1", SourceLanguage::Python);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_settings_only_configured_backends() {
        let mut settings = Settings::default();
        assert!(CommentSynthesizer::from_settings(&settings).strategy_names().is_empty());

        settings.hosted.api_key = Some("k".to_string());
        settings.local_model.endpoint = Some("http://127.0.0.1:9".to_string());
        assert_eq!(
            CommentSynthesizer::from_settings(&settings).strategy_names(),
            vec!["hosted", "local-model"]
        );
    }
}
