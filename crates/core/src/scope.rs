//! Per-request deadline.
//!
//! Every service operation runs inside its own timeout scope. When the deadline passes the
//! in-flight store future is dropped and the request fails with [`HmsError::Timeout`].

use crate::{HmsError, HmsResult};
use std::future::Future;
use std::time::Duration;

pub async fn within<T>(
    timeout: Duration,
    operation: impl Future<Output = HmsResult<T>>,
) -> HmsResult<T> {
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("operation exceeded request timeout of {:?}", timeout);
            Err(HmsError::Timeout(timeout))
        }
    }
}
