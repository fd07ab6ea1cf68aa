//! Core logging abstraction: the [`Log`] trait.

/// Tracing target for stage headers.
pub const STAGE_TARGET: &str = "dotlink::stage";
/// Tracing target for dry-run previews.
pub const DRY_RUN_TARGET: &str = "dotlink::dry_run";
/// Tracing target for per-entry success lines.
pub const SUCCESS_TARGET: &str = "dotlink::success";

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`, and
/// [`MemoryLog`](super::memory::MemoryLog) keeps messages in memory. The link
/// engine only ever sees `&dyn Log`, so it can run under either.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a completed change or a confirmed no-op.
    fn success(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
