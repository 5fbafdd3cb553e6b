use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::error::{Result, StylistError};


/// Runs one call to an external service under a deadline. Both a service
/// error and an elapsed deadline come back as `ExternalService`, so callers
/// have a single branch to fall back on.
pub async fn with_timeout<T, E, F>(service: &str, timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            debug!("{} call failed: {}", service, e);
            Err(StylistError::external(service, e))
        }
        Err(_) => {
            debug!("{} call timed out after {:?}", service, timeout);
            Err(StylistError::external(
                service,
                format!("timed out after {}ms", timeout.as_millis()),
            ))
        }
    }
}
