//! Error taxonomy and accumulating compile log.
//!
//! `spirq::error::Error` hand-rolls a small `Error` enum with a manual
//! `Display`/`std::error::Error` impl; `spirq-core` re-exports `anyhow`
//! under `pub mod error` instead. This crate keeps the hand-rolled shape (a
//! closed enum naming each failure category, since a caller needs to match
//! on them) but derives the boilerplate with `thiserror` rather than
//! `anyhow`, since callers here need to distinguish "fatal" from "warning"
//! per category, which a single opaque `anyhow::Error` can't express.

use std::fmt;

/// One of the four failure categories a compile can end in.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("ir error: {0}")]
    Ir(String),
    #[error("backend compile error: {0}")]
    BackendCompile(String),
    #[error("device error (hresult 0x{hresult:08x}): {message}")]
    Device { hresult: u32, message: String },
    #[error("environment error: {0}")]
    Environment(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// The accumulating log every stage of the pipeline appends to. Compilation
/// proceeds as long as safe, so callers see every issue in one pass rather
/// than stopping at the first error.
#[derive(Clone, Debug, Default)]
pub struct CompileLog {
    diagnostics: Vec<Diagnostic>,
    failed: bool,
}

impl CompileLog {
    pub fn new() -> CompileLog {
        CompileLog::default()
    }

    /// Appends a fatal entry and marks the log failed.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message,
        });
        self.failed = true;
    }

    /// Appends a non-fatal entry. Does not flip the failed flag.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    /// Records a [`CompileError`]; categories `Ir`, `BackendCompile` and
    /// `Environment` are always fatal. `Device` errors are fatal unless the
    /// caller has already decided to downgrade them (use [`CompileLog::warn`]
    /// for those instead).
    pub fn record(&mut self, err: &CompileError) {
        self.error(err.to_string());
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for CompileLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.diagnostics {
            writeln!(f, "{}", d)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_fail_the_log() {
        let mut log = CompileLog::new();
        log.warn("sampler state pool exhausted");
        assert!(!log.is_failed());
    }

    #[test]
    fn errors_fail_the_log_and_render() {
        let mut log = CompileLog::new();
        log.error("unknown render target `foo`");
        assert!(log.is_failed());
        assert_eq!(log.to_string(), "error: unknown render target `foo`\n");
    }
}
