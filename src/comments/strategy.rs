//! Pluggable comment-generation backends.

use once_cell::sync::OnceCell;
use std::future::Future;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime};

use crate::language::SourceLanguage;

/// Errors a generation backend can hit. Never surfaced past the chain.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("backend returned no text")]
    EmptyResponse,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl StrategyError {
    pub(crate) fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StrategyError::Timeout
        } else {
            StrategyError::Network(e)
        }
    }
}

/// A backend that may produce commented source.
///
/// `None` means the strategy declined or failed; the chain moves on.
pub trait CommentStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn try_generate(&self, source: &str, language: SourceLanguage) -> Option<String>;
}

/// HTTP client plus the runtime that drives it.
pub(crate) struct Transport {
    pub http: reqwest::Client,
    // Only `None` while dropping.
    runtime: Option<Runtime>,
}

impl Transport {
    fn build() -> Result<Self, StrategyError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("codescribe/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let runtime = Runtime::new()
            .map_err(|e| StrategyError::Unavailable(format!("runtime: {}", e)))?;
        Ok(Self {
            http,
            runtime: Some(runtime),
        })
    }

    /// Drive a request to completion from synchronous code.
    ///
    /// A runtime cannot be entered from a thread that is already inside one,
    /// so callers on an async worker get the request run on a scoped thread.
    pub fn run<F, T>(&self, fut: F) -> Result<T, StrategyError>
    where
        F: Future<Output = Result<T, StrategyError>> + Send,
        T: Send,
    {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| StrategyError::Unavailable("runtime shut down".to_string()))?;

        if Handle::try_current().is_err() {
            return runtime.block_on(fut);
        }

        tracing::debug!("inside an async runtime, running request on a scoped thread");
        std::thread::scope(|scope| {
            scope.spawn(|| runtime.block_on(fut)).join().unwrap_or_else(|_| {
                Err(StrategyError::Unavailable(
                    "request thread panicked".to_string(),
                ))
            })
        })
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        // A blocking shutdown panics when the owner is dropped on an async worker.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Lazily built transport, constructed at most once.
///
/// A transport that fails to build stays absent for the life of the handle.
#[derive(Default)]
pub(crate) struct TransportHandle {
    cell: OnceCell<Option<Transport>>,
}

impl TransportHandle {
    pub fn get(&self, owner: &'static str) -> Option<&Transport> {
        self.cell
            .get_or_init(|| match Transport::build() {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(strategy = owner, error = %e, "transport unavailable");
                    None
                }
            })
            .as_ref()
    }
}

/// Run a backend call and fold its failure into `None`.
pub(crate) fn settle(name: &'static str, result: Result<String, StrategyError>) -> Option<String> {
    match result {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(strategy = name, error = %e, "comment strategy failed, falling through");
            None
        }
    }
}
