use thiserror::Error;

/// Errors surfaced by audit log storage backends.
///
/// The in-memory store never produces one; a durable backend reports its
/// failures through the same type so the service layer stays unchanged.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit store failure: {0}")]
    Store(String),
}
