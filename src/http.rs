//! Transport primitives for document API calls.
//!
//! [`ApiHttpClient`] is a thin wrapper around [`ReqwestClient`] that sends a request, captures
//! the status and `Retry-After` hint as [`ResponseMetadata`], and buffers the body so callers
//! can decode JSON with path-aware errors. Every failure is mapped into the crate [`Error`]
//! taxonomy here so the auth and submission layers never see reqwest types.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	RequestBuilder,
	header::{HeaderMap, RETRY_AFTER},
};
use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
};

/// `content-type` sent with every JSON body.
pub const APPLICATION_JSON: &str = "application/json;charset=UTF-8";

/// Metadata captured from the most recent HTTP response.
///
/// Additional metadata fields may be added in future releases, so downstream code
/// should construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the document API, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Buffered HTTP response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// Status and retry hints.
	pub metadata: ResponseMetadata,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// HTTP status code.
	pub fn status(&self) -> u16 {
		self.metadata.status.unwrap_or_default()
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status())
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransientError::ResponseParse { source, status: self.metadata.status }.into()
		})
	}

	/// Builds a transient error carrying this response's metadata.
	pub fn unexpected(&self, message: impl Into<String>) -> Error {
		TransientError::Upstream {
			message: message.into(),
			status: self.metadata.status,
			retry_after: self.metadata.retry_after,
		}
		.into()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ApiHttpClient(pub ReqwestClient);
impl ApiHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Sends `request` and buffers the response.
	pub async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
		let response = request.send().await.map_err(map_reqwest_error)?;
		let status = response.status().as_u16();
		let retry_after = parse_retry_after(response.headers());
		let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

		Ok(ApiResponse { metadata: ResponseMetadata { status: Some(status), retry_after }, body })
	}
}
impl AsRef<ReqwestClient> for ApiHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ApiHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Joins a relative endpoint path onto the API base URL.
pub(crate) fn endpoint(base: &Url, path: &'static str) -> Result<Url> {
	let mut base = base.clone();

	// A base without a trailing slash would otherwise drop its last path segment.
	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	base.join(path).map_err(|source| ConfigError::InvalidEndpoint { path, source }.into())
}

fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::Upstream {
			message: "Request timed out while calling the document API".into(),
			status: err.status().map(|code| code.as_u16()),
			retry_after: None,
		}
		.into();
	}

	TransportError::from(err).into()
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Duration::try_from(delta).ok();
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn endpoint_keeps_base_path() {
		let base = Url::parse("https://api.example.com/api/v3").expect("Base URL should parse.");
		let url = endpoint(&base, "lk/documents/create").expect("Endpoint should join.");

		assert_eq!(url.as_str(), "https://api.example.com/api/v3/lk/documents/create");

		let root = Url::parse("https://api.example.com").expect("Root URL should parse.");

		assert_eq!(
			endpoint(&root, "auth/cert/key").expect("Endpoint should join.").as_str(),
			"https://api.example.com/auth/cert/key"
		);
	}

	#[test]
	fn retry_after_accepts_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Mon, 01 Jan 2001 00:00:00 +0000"));

		assert_eq!(parse_retry_after(&headers), None, "Past dates carry no hint.");
	}

	#[derive(Debug, Deserialize)]
	struct Probe {
		#[allow(dead_code)]
		value: String,
	}

	#[test]
	fn json_errors_report_the_failing_path() {
		let response = ApiResponse {
			metadata: ResponseMetadata { status: Some(200), retry_after: None },
			body: br#"{"value":42}"#.to_vec(),
		};
		let err = response.json::<Probe>().expect_err("Numeric value should fail to decode.");

		match err {
			Error::Transient(TransientError::ResponseParse { source, status }) => {
				assert_eq!(source.path().to_string(), "value");
				assert_eq!(status, Some(200));
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
