use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Error,
}

/// Receives the structured diagnostics a handler emits during one invocation.
pub trait DiagnosticSink {
    fn emit(&self, level: DiagnosticLevel, event: &str, details: Value);

    fn info(&self, event: &str, details: Value) {
        self.emit(DiagnosticLevel::Info, event, details);
    }

    fn error(&self, event: &str, details: Value) {
        self.emit(DiagnosticLevel::Error, event, details);
    }
}

/// Writes one JSON object per diagnostic to stderr.
#[derive(Debug, Clone)]
pub struct StderrDiagnosticSink {
    component: &'static str,
}

impl StderrDiagnosticSink {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl DiagnosticSink for StderrDiagnosticSink {
    fn emit(&self, level: DiagnosticLevel, event: &str, details: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339();
        eprintln!(
            "{}",
            diagnostic_line(self.component, level, event, &timestamp, details)
        );
    }
}

pub fn diagnostic_line(
    component: &str,
    level: DiagnosticLevel,
    event: &str,
    timestamp: &str,
    details: Value,
) -> Value {
    match level {
        DiagnosticLevel::Info => json!({
            "component": component,
            "event": event,
            "timestamp": timestamp,
            "details": details,
        }),
        DiagnosticLevel::Error => json!({
            "component": component,
            "level": "error",
            "event": event,
            "timestamp": timestamp,
            "details": details,
        }),
    }
}
