//! Error module for the Makani Suggest server.
//!
//! Each concern owns a focused error enum (configuration, store, transport,
//! write path). [`MakaniError`] ties them together for startup and CLI code,
//! and the reporter types route failures that must not be swallowed into the
//! tracing pipeline.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_error::SpanTrace;

pub mod config;
pub mod store;
pub mod transport;
pub mod write;

pub use config::ConfigError;
pub use store::{StoreError, StoreResult};
pub use transport::{TransportError, TransportResult};
pub use write::WriteError;

/// Result type alias used throughout the Makani Suggest server.
pub type MakaniResult<T> = Result<T, MakaniError>;

/// Core error enum for the Makani Suggest server.
#[derive(Error, Debug)]
pub enum MakaniError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised by the durable word store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Errors related to the line transports (TCP, stdio).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The index could not be loaded from the store at startup.
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[source] StoreError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// Rendered description of the error that occurred.
    pub error: String,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,

    /// Span trace captured where the context was built.
    pub trace: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<E, S>(error: &E, component: S) -> Self
    where
        E: std::error::Error + ?Sized,
        S: Into<String>,
    {
        Self {
            error: error.to_string(),
            component: component.into(),
            details: None,
            trace: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches the current span trace.
    ///
    /// The trace is empty unless the subscriber has a
    /// `tracing_error::ErrorLayer` installed.
    pub fn with_span_trace(mut self) -> Self {
        let trace = SpanTrace::capture().to_string();
        if !trace.is_empty() {
            self.trace = Some(trace);
        }
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// Reporter that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            trace = context.trace.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

static ERROR_REPORTER: OnceCell<Arc<dyn ErrorReporter>> = OnceCell::new();

/// Installs the global error reporter. Later calls are ignored.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
    if ERROR_REPORTER.set(reporter).is_err() {
        tracing::debug!("Error reporter already installed, keeping the existing one");
    }
}

/// Report an error through the global reporter.
///
/// Falls back to the tracing reporter when none has been installed.
pub fn report_error(context: ErrorContext) {
    match ERROR_REPORTER.get() {
        Some(reporter) => reporter.report(context),
        None => TracingErrorReporter.report(context),
    }
}
