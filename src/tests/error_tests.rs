//! Tests for the error module.
//!
//! This module contains tests for error handling and error types.

use crate::error::{
    report_error, set_error_reporter, ErrorContext, ErrorReporter, MakaniError, StoreError,
    TracingErrorReporter, TransportError, WriteError,
};
use crate::word::WordError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Test that error context can be created and displayed properly.
#[test]
fn test_error_context_display() {
    let error = MakaniError::Custom("test error".to_string());
    let context = ErrorContext::new(&error, "test_component").with_details("additional details");

    let display_string = format!("{context}");
    assert!(display_string.contains("test error"));
    assert!(display_string.contains("test_component"));
    assert!(display_string.contains("additional details"));
}

/// Test that nested errors keep their source message.
#[test]
fn test_nested_errors() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let makani_error = MakaniError::Store(StoreError::Io(io_error));
    assert!(format!("{makani_error}").contains("file not found"));

    let bootstrap = MakaniError::Bootstrap(StoreError::Unavailable("offline".to_string()));
    assert!(std::error::Error::source(&bootstrap).is_some());
    assert!(bootstrap.to_string().contains("offline"));

    let transport: MakaniError = TransportError::MessageTooLarge { size: 10, limit: 5 }.into();
    assert!(transport.to_string().contains("exceeds limit of 5 bytes"));
}

/// Test how word validation failures surface on the write path.
#[test]
fn test_write_error_classification() {
    let empty = WriteError::from(WordError::Empty);
    assert!(empty.is_client_error());
    assert_eq!(empty.to_string(), "Please enter text");

    let long = WriteError::from(WordError::TooLong { length: 70, max_length: 64 });
    assert_eq!(long.kind(), "WordTooLong");

    let store = WriteError::from(StoreError::Unavailable("down".to_string()));
    assert!(!store.is_client_error());
    assert_eq!(store.kind(), "StoreFailure");
}

/// Mock error reporter for testing.
#[derive(Debug, Default)]
struct CountingReporter {
    reported: AtomicUsize,
}

impl ErrorReporter for CountingReporter {
    fn report(&self, _context: ErrorContext) {
        self.reported.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test that the global error reporter receives reports.
///
/// The reporter is process-wide and can only be installed once, so this is
/// the only test that installs one.
#[test]
fn test_global_error_reporter() {
    let reporter = Arc::new(CountingReporter::default());
    set_error_reporter(reporter.clone());

    let error = MakaniError::Custom("test error".to_string());
    let before = reporter.reported.load(Ordering::SeqCst);
    report_error(ErrorContext::new(&error, "test_component"));

    // Other tests may report concurrently through the same reporter
    assert!(reporter.reported.load(Ordering::SeqCst) > before);
}

/// Test that the default tracing error reporter can be used directly.
#[test]
fn test_tracing_error_reporter() {
    let error = MakaniError::Custom("test error".to_string());
    let context = ErrorContext::new(&error, "test_component").with_span_trace();

    // Just make sure this doesn't panic
    TracingErrorReporter.report(context);
}
