//! Client configuration: API location, rate limit, and token reuse.
//!
//! [`ApiConfig`] is assembled with [`ApiConfigBuilder`] or deserialized from JSON; both paths
//! run the same validation.

// self
use crate::{_prelude::*, error::ConfigError, limiter::RateLimit};

const DEFAULT_TOKEN_TTL_MS: u64 = 10 * 60 * 60 * 1_000;

/// Errors raised while validating an [`ApiConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ApiConfigError {
	/// No rate limit was configured.
	#[error("A rate limit is required.")]
	MissingRateLimit,
	/// The base URL cannot carry relative endpoint paths.
	#[error("Base URL cannot be used as a base: {url}.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Only HTTP(S) endpoints are supported.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Offending URL.
		url: String,
	},
	/// Tokens must be reusable for a positive duration.
	#[error("Token TTL must be longer than zero.")]
	ZeroTokenTtl,
}

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ApiConfigBuilder", into = "ApiConfigBuilder")]
pub struct ApiConfig {
	/// Root of the document API; endpoint paths are joined onto it.
	pub base_url: Url,
	/// Admission ceiling shared by every submission made through the client.
	pub rate_limit: RateLimit,
	/// How long an issued bearer token is reused.
	pub token_ttl: Duration,
	/// Optional per-request timeout applied to the default HTTP client.
	pub request_timeout: Option<Duration>,
}
impl ApiConfig {
	/// Starts a builder for the API rooted at `base_url`.
	pub fn builder(base_url: Url) -> ApiConfigBuilder {
		ApiConfigBuilder::new(base_url)
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_json(raw: &str) -> Result<Self> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse(source).into())
	}
}

/// Builder for [`ApiConfig`] values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfigBuilder {
	/// Root of the document API.
	pub base_url: Url,
	/// Admission ceiling.
	#[serde(default)]
	pub rate_limit: Option<RateLimit>,
	/// Token reuse window in milliseconds.
	#[serde(default = "default_token_ttl_ms")]
	pub token_ttl_ms: u64,
	/// Per-request timeout in milliseconds.
	#[serde(default)]
	pub request_timeout_ms: Option<u64>,
}
impl ApiConfigBuilder {
	/// Creates a builder with the default token TTL and no rate limit yet.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			rate_limit: None,
			token_ttl_ms: DEFAULT_TOKEN_TTL_MS,
			request_timeout_ms: None,
		}
	}

	/// Sets the admission ceiling.
	pub fn rate_limit(mut self, limit: RateLimit) -> Self {
		self.rate_limit = Some(limit);

		self
	}

	/// Overrides the token reuse window.
	pub fn token_ttl(mut self, ttl: Duration) -> Self {
		self.token_ttl_ms = millis(ttl);

		self
	}

	/// Applies a per-request timeout to the default HTTP client.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout_ms = Some(millis(timeout));

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<ApiConfig, ApiConfigError> {
		let rate_limit = self.rate_limit.ok_or(ApiConfigError::MissingRateLimit)?;

		if self.base_url.cannot_be_a_base() {
			return Err(ApiConfigError::InvalidBaseUrl { url: self.base_url.to_string() });
		}
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(ApiConfigError::UnsupportedScheme { url: self.base_url.to_string() });
		}
		if self.token_ttl_ms == 0 {
			return Err(ApiConfigError::ZeroTokenTtl);
		}

		Ok(ApiConfig {
			base_url: self.base_url,
			rate_limit,
			token_ttl: Duration::from_millis(self.token_ttl_ms),
			request_timeout: self.request_timeout_ms.map(Duration::from_millis),
		})
	}
}
impl TryFrom<ApiConfigBuilder> for ApiConfig {
	type Error = ApiConfigError;

	fn try_from(builder: ApiConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}
impl From<ApiConfig> for ApiConfigBuilder {
	fn from(config: ApiConfig) -> Self {
		Self {
			base_url: config.base_url,
			rate_limit: Some(config.rate_limit),
			token_ttl_ms: millis(config.token_ttl),
			request_timeout_ms: config.request_timeout.map(millis),
		}
	}
}

fn default_token_ttl_ms() -> u64 {
	DEFAULT_TOKEN_TTL_MS
}

fn millis(duration: Duration) -> u64 {
	u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
