//! Client interceptor that tags every call with a request ID.

use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Stamps outgoing calls with `x-request-id` unless the caller set one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdInterceptor;

impl RequestIdInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Interceptor for RequestIdInterceptor {
    fn call(&mut self, mut req: Request<()>) -> Result<Request<()>, Status> {
        if let Some(existing) = req.metadata().get(REQUEST_ID_HEADER) {
            tracing::debug!(request_id = ?existing, "Reusing caller request id");
            return Ok(req);
        }

        let request_id = Uuid::new_v4().to_string();
        let value: MetadataValue<Ascii> = request_id
            .parse()
            .map_err(|_| Status::internal("request id is not a valid header value"))?;
        req.metadata_mut().insert(REQUEST_ID_HEADER, value);
        tracing::debug!(%request_id, "Attached request id");

        Ok(req)
    }
}
