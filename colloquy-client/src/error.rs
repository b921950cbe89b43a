//! Internal error helpers for mapping HTTP/reqwest errors to [`ClientError`].

use std::time::Duration;

use colloquy_types::ClientError;

/// Map a non-success HTTP status to a [`ClientError`].
///
/// The chat backend reports validation failures in-band with a 200 body,
/// so anything arriving here is transport-level: 5xx is treated as
/// retryable unavailability, everything else as a terminal rejection.
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ClientError {
    if status.is_server_error() {
        ClientError::ServiceUnavailable(body.to_string())
    } else {
        ClientError::Http {
            status: status.as_u16(),
            body: body.to_string(),
        }
    }
}

/// Map a [`reqwest::Error`] to a [`ClientError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        // Generic 30-second duration; the configured timeout is not
        // recoverable from the error itself.
        ClientError::Timeout(Duration::from_secs(30))
    } else {
        ClientError::Network(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_map_to_service_unavailable() {
        let err = map_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(matches!(err, ClientError::ServiceUnavailable(body) if body == "oops"));
    }

    #[test]
    fn client_errors_map_to_http() {
        let err = map_http_status(reqwest::StatusCode::METHOD_NOT_ALLOWED, "no");
        assert!(matches!(
            err,
            ClientError::Http { status: 405, body } if body == "no"
        ));
    }
}
