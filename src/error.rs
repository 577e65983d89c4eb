//! Unified error type.

use crate::store::StoreError;

/// Infrastructure failures: binding the listener, reaching the store at
/// startup.
///
/// Request-level failures (400, 404, 500 …) never surface here; handlers turn
/// them into HTTP [`Response`](crate::Response) values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}
