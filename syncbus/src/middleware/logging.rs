//! Logging middleware for request observation.

use crate::{
    middleware::Middleware,
    request::Request,
    response::Responder,
};
use syncbus_core::{BoxError, ClientHandle, Payload};

/// A layer that logs every request it sees and always proceeds.
///
/// Register it first (unfiltered) to observe all traffic through a bucket.
pub struct LoggingMiddleware;

impl<P: Payload, C: ClientHandle> Middleware<P, C> for LoggingMiddleware {
    async fn handle(
        &self,
        request: &Request<P, C>,
        _response: &Responder<P>,
    ) -> Result<(), BoxError> {
        tracing::debug!(
            bucket = request.bucket().name(),
            action = request.action(),
            client = ?request.client(),
            "processing sync request"
        );
        Ok(())
    }
}
