//! Structured JSON event logger.
//!
//! One log line = one event, synchronous, deterministic key ordering.
//! Internal auth detail (e.g. whether a rejected token was expired or
//! unknown) goes here and only here; the wire stays uniform.

use std::io::{self, Write};

use serde_json::{Map, Value};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// Synchronous JSON-line logger
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields.
    ///
    /// Warnings and errors go to stderr, everything else to stdout.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity >= Severity::Warn {
            Self::write_line(severity, event, fields, &mut io::stderr());
        } else {
            Self::write_line(severity, event, fields, &mut io::stdout());
        }
    }

    fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], out: &mut W) {
        // serde_json's Map is a BTreeMap: keys serialize in sorted order,
        // so identical events always produce identical lines
        let mut map = Map::new();
        map.insert("event".to_string(), Value::String(event.to_string()));
        map.insert(
            "severity".to_string(),
            Value::String(severity.as_str().to_string()),
        );
        for (key, value) in fields {
            map.insert((*key).to_string(), Value::String((*value).to_string()));
        }

        if let Ok(line) = serde_json::to_string(&Value::Object(map)) {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
    }

    pub fn debug(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Debug, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}
