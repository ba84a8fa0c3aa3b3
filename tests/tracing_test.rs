//! Tests for the log events emitted while mapping.

mod common;

use common::valid_config;
use std::sync::{Arc, Mutex};
use tagpath::{ErrorMapper, RawFailure};
use tracing_subscriber::fmt::MakeWriter;

/// Shared buffer that `tracing_subscriber::fmt` writes formatted events into.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

fn capturing_subscriber() -> (tracing::subscriber::DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (guard, logs)
}

#[test]
fn test_mapping_error_logs_overridden_tag() {
    let (_guard, logs) = capturing_subscriber();

    let result = ErrorMapper::new().map_with_tag(
        [RawFailure::new("Server.Missing", "required")],
        &valid_config(),
        Some("yaml"),
    );
    assert!(result.is_err());

    let contents = logs.contents();
    let line = contents
        .lines()
        .find(|line| line.contains("ERROR"))
        .expect("mapping error is logged");
    assert!(line.contains("yaml"), "{line}");
    assert!(!line.contains("json"), "{line}");
    assert!(line.contains("Server.Missing"), "{line}");
}

#[test]
fn test_mapping_error_logs_mapper_tag_without_override() {
    let (_guard, logs) = capturing_subscriber();

    let result = ErrorMapper::new()
        .with_tag("form")
        .map([RawFailure::new("Server.Missing", "required")], &valid_config());
    assert!(result.is_err());

    let contents = logs.contents();
    let line = contents
        .lines()
        .find(|line| line.contains("ERROR"))
        .expect("mapping error is logged");
    assert!(line.contains("form"), "{line}");
}

#[test]
fn test_dropped_failure_logged_at_debug() {
    let (_guard, logs) = capturing_subscriber();

    struct Secret {
        value: String,
    }
    tagpath::reflect_struct!(Secret {
        value as "Value": r#"json:"-""#,
    });

    let mapped = ErrorMapper::new()
        .map(
            [RawFailure::new("Value", "required")],
            &Secret {
                value: String::new(),
            },
        )
        .unwrap();
    assert!(mapped.is_empty());

    let contents = logs.contents();
    assert!(contents.contains("DEBUG"), "{contents}");
    assert!(contents.contains("dropping failure without a public field path"));
    assert!(!contents.contains("ERROR"));
}
