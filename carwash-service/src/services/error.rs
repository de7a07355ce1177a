use mongodb::error::{ErrorKind, WriteFailure};
use service_core::error::AppError;
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    /// A referenced customer or actor does not exist.
    #[error("{0}")]
    Reference(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Storage(#[from] mongodb::error::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

impl From<mongodb::bson::ser::Error> for ServiceError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ServiceError::Internal(anyhow::Error::new(err))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::Reference(msg) => AppError::UnprocessableEntity(anyhow::anyhow!(msg)),
            ServiceError::Conflict(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            ServiceError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            ServiceError::Unauthorized(msg) => AppError::Unauthorized(anyhow::anyhow!(msg)),
            ServiceError::Storage(e) if is_transient(&e) => {
                AppError::ServiceUnavailable(anyhow::Error::new(e))
            }
            ServiceError::Storage(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}

/// Unique index violation, from either a plain write or a command such as
/// `findAndModify`.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_err)) => {
            write_err.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(ref command_err) => command_err.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Name of the unique index a duplicate key error was raised on, as reported
/// by the server (`E11000 duplicate key error collection: db.c index: <name> dup key: ...`).
pub fn duplicate_key_index(err: &mongodb::error::Error) -> Option<String> {
    let message = match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_err))
            if write_err.code == DUPLICATE_KEY_CODE =>
        {
            &write_err.message
        }
        ErrorKind::Command(ref command_err) if command_err.code == DUPLICATE_KEY_CODE => {
            &command_err.message
        }
        _ => return None,
    };
    index_in_message(message).map(str::to_string)
}

fn index_in_message(message: &str) -> Option<&str> {
    message
        .split("index: ")
        .nth(1)?
        .split_whitespace()
        .next()
}

/// Failures where the store could not be reached at all; callers may retry.
pub fn is_transient(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. }
    )
}

/// Map a duplicate key error to a conflict with the given message, leaving
/// every other storage error as is.
pub fn conflict_on_duplicate(err: mongodb::error::Error, message: &str) -> ServiceError {
    if is_duplicate_key(&err) {
        ServiceError::Conflict(message.to_string())
    } else {
        ServiceError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn domain_errors_map_to_http_status() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (ServiceError::Reference("missing".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::not_found("gone"), StatusCode::NOT_FOUND),
            (ServiceError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn io_failures_are_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = mongodb::error::Error::from(io);
        assert!(is_transient(&err));
        assert!(!is_duplicate_key(&err));
        assert_eq!(duplicate_key_index(&err), None);
        assert_eq!(
            AppError::from(ServiceError::Storage(err)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn index_name_is_read_from_the_server_message() {
        let message = "E11000 duplicate key error collection: carwash_db.customers \
                       index: customer_code_unique dup key: { customer_code: \"CUST-1-ABCDEF\" }";
        assert_eq!(index_in_message(message), Some("customer_code_unique"));
        assert_eq!(index_in_message("E11000 duplicate key error"), None);
    }
}
