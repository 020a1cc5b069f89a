//! Client-level error types shared by the auth, transport, and submission layers.
//!
//! The admission gate itself has no error surface: [`RateLimiter::acquire`] only waits.
//!
//! [`RateLimiter::acquire`]: crate::limiter::RateLimiter::acquire

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The certificate exchange was refused or produced no token.
	#[error("Authentication failed: {reason}.")]
	Auth {
		/// Upstream- or client-supplied reason string.
		reason: String,
	},
	/// The document API refused the submitted document.
	#[error("Document API rejected the request with status {status}: {message}.")]
	Rejected {
		/// HTTP status code returned by the document API.
		status: u16,
		/// Upstream error code, when supplied.
		code: Option<String>,
		/// Upstream error message or description.
		message: String,
	},
}

/// Configuration and validation failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint URL could not be derived from the base URL.
	#[error("Endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative endpoint path.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Rate limit parameters are invalid.
	#[error(transparent)]
	RateLimit(#[from] crate::limiter::RateLimitError),
	/// Client configuration failed validation.
	#[error(transparent)]
	Api(#[from] crate::config::ApiConfigError),
	/// Product group identifier failed validation.
	#[error(transparent)]
	ProductGroup(#[from] crate::document::ProductGroupError),
	/// Configuration document could not be parsed or failed validation.
	#[error("Configuration document is invalid.")]
	Parse(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// Outbound payload could not be encoded as JSON.
	#[error("Request payload could not be serialized.")]
	Serialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Upstream returned an unexpected but non-fatal response.
	#[error("Document API returned an unexpected response: {message}.")]
	Upstream {
		/// Client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Upstream responded with malformed JSON that could not be parsed.
	#[error("Document API returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the document API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the document API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::limiter::RateLimitError;

	#[test]
	fn rate_limit_error_converts_into_config_error() {
		let err: Error = ConfigError::from(RateLimitError::ZeroRequests).into();

		assert!(matches!(err, Error::Config(ConfigError::RateLimit(RateLimitError::ZeroRequests))));
		assert!(err.to_string().contains("at least one request"));
	}

	#[test]
	fn rejected_error_renders_status_and_message() {
		let err = Error::Rejected {
			status: 400,
			code: Some("VALIDATION".into()),
			message: "signature mismatch".into(),
		};

		assert_eq!(
			err.to_string(),
			"Document API rejected the request with status 400: signature mismatch."
		);
	}

	#[test]
	fn transport_error_exposes_source() {
		let io = std::io::Error::other("connection reset");
		let err: Error = TransportError::network(io).into();
		let source = StdError::source(&err).expect("Transparent variant should forward source.");

		assert_eq!(source.to_string(), "connection reset");
	}
}
