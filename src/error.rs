// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error and Result implementations.

use std::fmt;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;

/// Kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed request.
    ///
    /// Maps to HTTP 400.
    BadRequest,

    /// Authentication failure.
    ///
    /// Maps to HTTP 401.
    Unauthorized,

    /// Access denied.
    ///
    /// Maps to HTTP 403.
    Forbidden,

    /// Requested resource was not found.
    ///
    /// Maps to HTTP 404.
    NotFound,

    /// Conflict in the request.
    ///
    /// Maps to HTTP 409.
    Conflict,

    /// Resource is gone.
    ///
    /// Maps to HTTP 410.
    Gone,

    /// Precondition failed.
    ///
    /// Maps to HTTP 412.
    PreconditionFailed,

    /// Quota or size limit exceeded.
    ///
    /// Maps to HTTP 413 without a `Retry-After` header.
    OverLimit,

    /// Rate limit exceeded.
    ///
    /// Maps to HTTP 429 and to HTTP 413 with a `Retry-After` header.
    RateLimitExceeded,

    /// Unsupported content type.
    ///
    /// Maps to HTTP 415.
    InvalidContentType,

    /// Semantically invalid request.
    ///
    /// Maps to HTTP 422.
    UnprocessableEntity,

    /// Internal server error.
    ///
    /// Maps to HTTP 500 and any 5xx code not listed otherwise.
    ServerFault,

    /// Operation is not implemented by the server.
    ///
    /// Maps to HTTP 501.
    NotImplemented,

    /// An error status code with no dedicated kind.
    UnexpectedResponseCode,

    /// A success status code that the caller did not expect.
    InvalidHttpSuccessCode,

    /// Response received from the server is malformed.
    InvalidResponse,

    /// Protocol-level error reported by underlying HTTP library.
    ProtocolError,

    /// Operation has reached the specified time out.
    TimedOut,

    /// A server went to the `ERROR` state while being built.
    BuildError,

    /// A server went to the `ERROR` state while being deleted.
    DeleteError,

    /// Requested service endpoint was not found.
    EndpointNotFound,

    /// Configuration is invalid or missing.
    InvalidConfig,

    /// Invalid value passed to one of paremeters.
    InvalidInput,

    /// Credentials are invalid or cannot be provided.
    InvalidCredentials,

    /// Request returned more items than expected.
    TooManyItems,
}

/// Error from an OpenStack call or from the test machinery.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    status: Option<StatusCode>,
    message: Option<String>,
}

/// Result of an OpenStack call.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create a new error of the provided kind.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            status: None,
            message: Some(message.into()),
        }
    }

    /// Create with providing all details.
    pub fn new_with_details(
        kind: ErrorKind,
        status: Option<StatusCode>,
        message: Option<String>,
    ) -> Error {
        Error {
            kind,
            status,
            message,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code (if any).
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Error message (if any).
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Helper - error of kind EndpointNotFound.
    pub(crate) fn new_endpoint_not_found<D: fmt::Display>(service_type: D) -> Error {
        Error::new(
            ErrorKind::EndpointNotFound,
            format!("Endpoint for service {} was not found", service_type),
        )
    }
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Object not found",
            ErrorKind::Conflict => "Conflict with state of target resource",
            ErrorKind::Gone => "The requested resource is no longer available",
            ErrorKind::PreconditionFailed => "Precondition failed",
            ErrorKind::OverLimit => "Request entity is too large",
            ErrorKind::RateLimitExceeded => "Rate limit exceeded",
            ErrorKind::InvalidContentType => "Invalid content type provided",
            ErrorKind::UnprocessableEntity => "Unprocessable entity",
            ErrorKind::ServerFault => "Got server fault",
            ErrorKind::NotImplemented => "Got NotImplemented error",
            ErrorKind::UnexpectedResponseCode => "Unexpected response code received",
            ErrorKind::InvalidHttpSuccessCode => "The success code is different than the expected one",
            ErrorKind::InvalidResponse => "Received invalid response",
            ErrorKind::ProtocolError => "Error when accessing the server",
            ErrorKind::TimedOut => "Request timed out",
            ErrorKind::BuildError => "Server failed to build and is in ERROR status",
            ErrorKind::DeleteError => "Server failed to delete and is in ERROR status",
            ErrorKind::EndpointNotFound => "Requested endpoint was not found",
            ErrorKind::InvalidConfig => "Invalid configuration",
            ErrorKind::InvalidInput => "Input value(s) are invalid or missing",
            ErrorKind::InvalidCredentials => "Invalid or unavailable credentials",
            ErrorKind::TooManyItems => "Request returned too many items",
        }
    }

    /// Kind corresponding to an HTTP error status.
    ///
    /// Returns `None` for success and informational codes.
    pub fn from_status(status: StatusCode, headers: &HeaderMap) -> Option<ErrorKind> {
        if status.as_u16() < 400 {
            return None;
        }

        Some(match status.as_u16() {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            410 => ErrorKind::Gone,
            412 => ErrorKind::PreconditionFailed,
            413 if headers.contains_key(RETRY_AFTER) => ErrorKind::RateLimitExceeded,
            413 => ErrorKind::OverLimit,
            415 => ErrorKind::InvalidContentType,
            422 => ErrorKind::UnprocessableEntity,
            429 => ErrorKind::RateLimitExceeded,
            501 => ErrorKind::NotImplemented,
            c if c >= 500 => ErrorKind::ServerFault,
            _ => ErrorKind::UnexpectedResponseCode,
        })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status.as_u16())?;
        }

        if let Some(ref msg) = self.message {
            write!(f, ": {}", msg)
        } else {
            Ok(())
        }
    }
}

impl ::std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Error {
        let kind = if value.is_timeout() {
            ErrorKind::TimedOut
        } else if value.is_decode() {
            ErrorKind::InvalidResponse
        } else {
            ErrorKind::ProtocolError
        };

        Error::new_with_details(kind, value.status(), Some(value.to_string()))
    }
}

impl From<osauth::Error> for Error {
    fn from(value: osauth::Error) -> Error {
        let kind = match value.kind() {
            osauth::ErrorKind::AuthenticationFailed => ErrorKind::Unauthorized,
            osauth::ErrorKind::AccessDenied => ErrorKind::Forbidden,
            osauth::ErrorKind::ResourceNotFound => ErrorKind::NotFound,
            osauth::ErrorKind::Conflict => ErrorKind::Conflict,
            osauth::ErrorKind::EndpointNotFound => ErrorKind::EndpointNotFound,
            osauth::ErrorKind::InvalidConfig => ErrorKind::InvalidConfig,
            osauth::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            osauth::ErrorKind::OperationTimedOut => ErrorKind::TimedOut,
            osauth::ErrorKind::TooManyItems => ErrorKind::TooManyItems,
            osauth::ErrorKind::ProtocolError => ErrorKind::ProtocolError,
            _ => ErrorKind::InvalidResponse,
        };

        Error::new(kind, value.to_string())
    }
}

impl From<Error> for osauth::Error {
    fn from(value: Error) -> osauth::Error {
        let kind = match value.kind {
            ErrorKind::Unauthorized | ErrorKind::InvalidCredentials => {
                osauth::ErrorKind::AuthenticationFailed
            }
            ErrorKind::Forbidden => osauth::ErrorKind::AccessDenied,
            ErrorKind::NotFound => osauth::ErrorKind::ResourceNotFound,
            ErrorKind::Conflict => osauth::ErrorKind::Conflict,
            ErrorKind::EndpointNotFound => osauth::ErrorKind::EndpointNotFound,
            ErrorKind::InvalidConfig => osauth::ErrorKind::InvalidConfig,
            ErrorKind::InvalidInput => osauth::ErrorKind::InvalidInput,
            ErrorKind::TimedOut => osauth::ErrorKind::OperationTimedOut,
            ErrorKind::TooManyItems => osauth::ErrorKind::TooManyItems,
            ErrorKind::ProtocolError => osauth::ErrorKind::ProtocolError,
            _ => osauth::ErrorKind::InvalidResponse,
        };

        osauth::Error::new(kind, value.message.unwrap_or_else(|| value.kind.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Error {
        Error::new(ErrorKind::InvalidResponse, value.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Error {
        Error::new(ErrorKind::InvalidConfig, value.to_string())
    }
}

impl From<::std::io::Error> for Error {
    fn from(value: ::std::io::Error) -> Error {
        Error::new(ErrorKind::InvalidConfig, value.to_string())
    }
}

/// Check that the status is one of the expected success codes.
///
/// Error statuses are reported as `UnexpectedResponseCode`, unlisted success
/// statuses as `InvalidHttpSuccessCode`.
pub fn expected_success(expected: &[u16], status: StatusCode) -> Result<()> {
    let code = status.as_u16();
    if code >= 400 {
        return Err(Error::new_with_details(
            ErrorKind::UnexpectedResponseCode,
            Some(status),
            Some(format!(
                "Expected one of {:?} but received an error code {}",
                expected, code
            )),
        ));
    }

    if expected.contains(&code) {
        Ok(())
    } else {
        Err(Error::new_with_details(
            ErrorKind::InvalidHttpSuccessCode,
            Some(status),
            Some(format!("Expected one of {:?}, got {}", expected, code)),
        ))
    }
}

/// Convert an error response into an `Error`.
///
/// Success statuses pass through.
pub fn check_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    match ErrorKind::from_status(status, headers) {
        Some(kind) => Err(Error::new_with_details(
            kind,
            Some(status),
            Some(extract_message(body)),
        )),
        None => Ok(()),
    }
}

/// Extract a human-readable message from an error body.
///
/// Nova wraps errors as `{"badRequest": {"message": ...}}`, Keystone as
/// `{"error": {"message": ...}}`; anything else is returned verbatim.
fn extract_message(body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) {
        if let Some(msg) = map.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }

        if let Some(msg) = map
            .values()
            .filter_map(|v| v.get("message"))
            .find_map(|v| v.as_str())
        {
            return msg.to_string();
        }
    }

    String::from_utf8_lossy(body).trim().to_string()
}

#[cfg(test)]
pub mod test {
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
    use reqwest::StatusCode;

    use super::{check_response, expected_success, ErrorKind};

    fn kind_of(code: u16, headers: &HeaderMap) -> ErrorKind {
        let status = StatusCode::from_u16(code).unwrap();
        check_response(status, headers, b"").unwrap_err().kind()
    }

    #[test]
    fn test_check_response_mapping() {
        let hdrs = HeaderMap::new();
        assert_eq!(kind_of(400, &hdrs), ErrorKind::BadRequest);
        assert_eq!(kind_of(401, &hdrs), ErrorKind::Unauthorized);
        assert_eq!(kind_of(403, &hdrs), ErrorKind::Forbidden);
        assert_eq!(kind_of(404, &hdrs), ErrorKind::NotFound);
        assert_eq!(kind_of(405, &hdrs), ErrorKind::UnexpectedResponseCode);
        assert_eq!(kind_of(409, &hdrs), ErrorKind::Conflict);
        assert_eq!(kind_of(410, &hdrs), ErrorKind::Gone);
        assert_eq!(kind_of(412, &hdrs), ErrorKind::PreconditionFailed);
        assert_eq!(kind_of(413, &hdrs), ErrorKind::OverLimit);
        assert_eq!(kind_of(415, &hdrs), ErrorKind::InvalidContentType);
        assert_eq!(kind_of(422, &hdrs), ErrorKind::UnprocessableEntity);
        assert_eq!(kind_of(429, &hdrs), ErrorKind::RateLimitExceeded);
        assert_eq!(kind_of(500, &hdrs), ErrorKind::ServerFault);
        assert_eq!(kind_of(501, &hdrs), ErrorKind::NotImplemented);
        assert_eq!(kind_of(503, &hdrs), ErrorKind::ServerFault);
    }

    #[test]
    fn test_check_response_rate_limit() {
        let mut hdrs = HeaderMap::new();
        let _ = hdrs.insert(RETRY_AFTER, HeaderValue::from_static("10"));
        assert_eq!(kind_of(413, &hdrs), ErrorKind::RateLimitExceeded);
    }

    #[test]
    fn test_check_response_success() {
        let hdrs = HeaderMap::new();
        for code in &[200u16, 201, 202, 204, 300] {
            check_response(StatusCode::from_u16(*code).unwrap(), &hdrs, b"").unwrap();
        }
    }

    #[test]
    fn test_check_response_messages() {
        let hdrs = HeaderMap::new();
        let nova = br#"{"badRequest": {"message": "Invalid flavorRef", "code": 400}}"#;
        let err = check_response(StatusCode::BAD_REQUEST, &hdrs, nova).unwrap_err();
        assert_eq!(err.message(), Some("Invalid flavorRef"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

        let keystone = br#"{"error": {"message": "Could not find project", "code": 404,
                             "title": "Not Found"}}"#;
        let err = check_response(StatusCode::NOT_FOUND, &hdrs, keystone).unwrap_err();
        assert_eq!(err.message(), Some("Could not find project"));

        let plain = b"  something broke \n";
        let err = check_response(StatusCode::BAD_GATEWAY, &hdrs, plain).unwrap_err();
        assert_eq!(err.message(), Some("something broke"));
        assert_eq!(err.kind(), ErrorKind::ServerFault);
    }

    #[test]
    fn test_expected_success() {
        expected_success(&[200], StatusCode::OK).unwrap();
        expected_success(&[200, 201], StatusCode::CREATED).unwrap();

        let err = expected_success(&[200], StatusCode::ACCEPTED).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHttpSuccessCode);

        let err = expected_success(&[204], StatusCode::NOT_FOUND).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedResponseCode);
    }

    #[test]
    fn test_osauth_error_conversion() {
        let err = super::Error::new(ErrorKind::Unauthorized, "bad password");
        let converted: osauth::Error = err.into();
        assert_eq!(converted.kind(), osauth::ErrorKind::AuthenticationFailed);

        let back = super::Error::from(converted);
        assert_eq!(back.kind(), ErrorKind::Unauthorized);
        assert!(back.message().unwrap().contains("bad password"));

        let err = osauth::Error::new(
            osauth::ErrorKind::EndpointNotFound,
            "No compute endpoint".to_string(),
        );
        assert_eq!(super::Error::from(err).kind(), ErrorKind::EndpointNotFound);

        let err: osauth::Error = super::Error::new(ErrorKind::Gone, "gone").into();
        assert_eq!(err.kind(), osauth::ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_error_display() {
        let err = super::Error::new_with_details(
            ErrorKind::Conflict,
            Some(StatusCode::CONFLICT),
            Some("Aggregate exists".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Conflict with state of target resource (HTTP 409): Aggregate exists"
        );
    }
}
