//! Turnkey client wiring the certificate auth flow, the reqwest submitter, and a rate limiter.

// self
use crate::{
	_prelude::*,
	auth::CertAuthProvider,
	config::ApiConfig,
	error::ConfigError,
	http::ApiHttpClient,
	limiter::RateLimiter,
	submit::{ReqwestSubmitter, ThrottledSubmitter},
};

/// Submitter stack used by [`DocumentClient`].
pub type DocumentClientSubmitter = ThrottledSubmitter<ReqwestSubmitter<CertAuthProvider>>;

/// Rate-limited document API client.
///
/// Every [`DocumentClient::create_document`] call first waits for a permit from the shared
/// [`RateLimiter`], then obtains (or reuses) a bearer token and posts the document.
#[derive(Debug)]
pub struct DocumentClient {
	submitter: DocumentClientSubmitter,
	auth: Arc<CertAuthProvider>,
}
impl DocumentClient {
	/// Builds a client with its own reqwest transport and a dedicated limiter.
	pub fn new(config: ApiConfig) -> Result<Self> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.request_timeout {
			builder = builder.timeout(timeout);
		}

		let http_client = ApiHttpClient::with_client(builder.build().map_err(ConfigError::from)?);

		Ok(Self::with_http_client(config, http_client))
	}

	/// Builds a client around a caller-provided transport and a dedicated limiter.
	pub fn with_http_client(config: ApiConfig, http_client: ApiHttpClient) -> Self {
		let limiter = Arc::new(RateLimiter::new(config.rate_limit));

		Self::with_limiter(config, http_client, limiter)
	}

	/// Builds a client that shares `limiter` with other clients in the process.
	pub fn with_limiter(
		config: ApiConfig,
		http_client: ApiHttpClient,
		limiter: Arc<RateLimiter>,
	) -> Self {
		let auth = Arc::new(
			CertAuthProvider::new(http_client.clone(), config.base_url.clone())
				.with_token_ttl(config.token_ttl),
		);
		let submitter = ThrottledSubmitter::new(
			ReqwestSubmitter::new(http_client, config.base_url, auth.clone()),
			limiter,
		);

		Self { submitter, auth }
	}

	/// Waits for admission and registers `document`, returning its upstream identifier.
	pub async fn create_document<D>(
		&self,
		document: &D,
		signature: impl Into<crate::document::Signature>,
		product_group: impl AsRef<str>,
	) -> Result<String>
	where
		D: ?Sized + Serialize,
	{
		self.submitter.create_document(document, signature, product_group).await
	}

	/// The limiter gating this client.
	pub fn limiter(&self) -> &Arc<RateLimiter> {
		self.submitter.limiter()
	}

	/// The certificate auth provider; use it to drop a revoked token.
	pub fn auth(&self) -> &Arc<CertAuthProvider> {
		&self.auth
	}
}
