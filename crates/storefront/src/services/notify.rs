//! User-facing notification sink.
//!
//! Toast rendering belongs to the UI layer; the engine only emits
//! fire-and-forget messages through this trait and never reads a result
//! back.

/// Sink for user-facing success/failure/warning messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Notifier that forwards messages to the `tracing` pipeline.
///
/// The default sink for headless callers (CLI, tests without a recording
/// notifier). A UI embedding supplies its own implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "bazario::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "bazario::notify", "{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "bazario::notify", "{message}");
    }
}
