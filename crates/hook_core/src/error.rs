use thiserror::Error;

/// Terminal failure of one direct upload attempt.
///
/// Cancellation is deliberately not a variant: an aborted transfer reports
/// nothing further, it does not degrade into a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("destination rejected upload with HTTP status {0}")]
    Status(u16),
    #[error("upload transport failure: {0}")]
    Transport(String),
}
