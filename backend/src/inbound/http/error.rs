//! Domain errors as HTTP responses.
//!
//! Every failure leaves the API as the JSON `Error` body with the trace id
//! echoed in a header. Internal errors are logged in full and redacted to a
//! fixed message on the wire.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() != ErrorCode::InternalError {
            return builder.json(self);
        }

        error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        let redacted = match self.trace_id() {
            Some(id) => Error::internal(REDACTED_MESSAGE).with_trace_id(id.to_owned()),
            None => Error::internal(REDACTED_MESSAGE),
        };
        builder.json(redacted)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}

fn reject_json_payload(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "request body rejected");
    let message = match err {
        JsonPayloadError::ContentType => "Request body must be application/json",
        _ => "Request body must be valid JSON",
    };
    Error::invalid_request(message).into()
}

/// JSON extractor configuration answering malformed bodies with the
/// standard 400 error body instead of Actix's plain-text default.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(reject_json_payload)
}
