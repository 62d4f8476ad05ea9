//! Per-call tracing of context operations.
//!
//! The context reports each operation it performs to a [`DiagnosticsSink`]
//! handed over at construction. The default [`TracingSink`] forwards to
//! `tracing` only when verbose mode is on, so the detailed trace costs
//! nothing by default.

use std::fmt;

use tracing::debug;

/// Receives a trace line for every context operation.
pub trait DiagnosticsSink {
    /// Whether [`trace`](Self::trace) does anything. Callers skip building
    /// expensive details when this is false.
    fn enabled(&self) -> bool;

    fn trace(&self, operation: &'static str, details: fmt::Arguments<'_>);
}

/// Forwards traces to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    pub verbose: bool,
}

impl TracingSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl DiagnosticsSink for TracingSink {
    fn enabled(&self) -> bool {
        self.verbose
    }

    fn trace(&self, operation: &'static str, details: fmt::Arguments<'_>) {
        if self.verbose {
            debug!(target: "glcontext::trace", operation, "{details}");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_is_off_by_default() {
        assert!(!TracingSink::default().enabled());
        assert!(TracingSink::new(true).enabled());
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = recording::RecordingSink::default();
        sink.trace("create", format_args!("major {}", 1));
        sink.trace("swap_buffers", format_args!(""));
        assert_eq!(sink.operations(), vec!["create", "swap_buffers"]);
        assert_eq!(sink.lines()[0], "major 1");
    }
}
