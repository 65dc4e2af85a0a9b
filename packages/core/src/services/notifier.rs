//! Operator Notification Seam
//!
//! The reconciler surfaces user-facing outcomes (rejected moves, save
//! results) through this trait rather than owning any UI. The default
//! implementation routes messages to `tracing`; an embedding application
//! substitutes its own toast/banner mechanism.

/// External notifier collaborator
pub trait Notifier: Send + Sync {
    /// A user action was rejected (invalid move, malformed path)
    fn alert(&self, message: &str);

    /// An operation completed successfully
    fn success(&self, message: &str);

    /// An operation failed and may be retried
    fn error(&self, message: &str);
}

/// Notifier that routes messages to `tracing`
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(target: "pagetree::notify", "{message}");
    }

    fn success(&self, message: &str) {
        tracing::info!(target: "pagetree::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "pagetree::notify", "{message}");
    }
}
