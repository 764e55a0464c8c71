//! Warning sink for soft text failures

/// Receives warnings from text resolution
pub trait TextLogger: Send + Sync {
    /// Record a warning with key/value context
    fn warning(&self, message: &str, context: &[(&str, &str)]);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TextLogger for TracingLogger {
    fn warning(&self, message: &str, context: &[(&str, &str)]) {
        let context = context
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::warn!(context = %context, "{message}");
    }
}

/// Drops every warning
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl TextLogger for NoopLogger {
    fn warning(&self, _message: &str, _context: &[(&str, &str)]) {}
}
