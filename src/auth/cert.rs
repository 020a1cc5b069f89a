//! Certificate challenge flow that trades a signed challenge for a bearer token.
//!
//! The provider fetches the challenge from `auth/cert/key`, posts it back to `auth/cert`, and
//! caches the issued token for a fixed TTL. Concurrent callers share one in-flight exchange:
//! the cache slot is an async mutex held across the network round trip, so the second caller
//! simply finds the fresh token once the first one is done.

// crates.io
use reqwest::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	auth::{AuthFuture, AuthProvider, BearerToken},
	document::TokenResponse,
	http::{self, APPLICATION_JSON, ApiHttpClient},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Relative path of the challenge endpoint.
pub const CHALLENGE_PATH: &str = "auth/cert/key";
/// Relative path of the token exchange endpoint.
pub const TOKEN_PATH: &str = "auth/cert";

/// Bearer tokens stay valid for ten hours upstream.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Reqwest-backed [`AuthProvider`] implementing the certificate challenge flow.
pub struct CertAuthProvider {
	http_client: ApiHttpClient,
	base_url: Url,
	token_ttl: Duration,
	cached: AsyncMutex<Option<BearerToken>>,
}
impl CertAuthProvider {
	/// Creates a provider for the API rooted at `base_url`.
	pub fn new(http_client: ApiHttpClient, base_url: Url) -> Self {
		Self { http_client, base_url, token_ttl: DEFAULT_TOKEN_TTL, cached: AsyncMutex::new(None) }
	}

	/// Overrides how long an issued token is reused (defaults to ten hours).
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		self.token_ttl = ttl;

		self
	}

	/// Drops the cached token so the next call performs a fresh exchange.
	pub async fn invalidate(&self) {
		self.cached.lock().await.take();
	}

	async fn cached_or_exchange(&self) -> Result<BearerToken> {
		let mut cached = self.cached.lock().await;

		if let Some(token) =
			cached.as_ref().filter(|token| token.is_fresh_at(OffsetDateTime::now_utc()))
		{
			return Ok(token.clone());
		}

		let token = self.exchange().await?;

		*cached = Some(token.clone());

		Ok(token)
	}

	async fn exchange(&self) -> Result<BearerToken> {
		const KIND: OpKind = OpKind::Auth;

		let span = OpSpan::new(KIND, "cert_exchange");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let challenge = self.fetch_challenge().await?;
				let request = self
					.http_client
					.post(http::endpoint(&self.base_url, TOKEN_PATH)?)
					.header(CONTENT_TYPE, APPLICATION_JSON)
					.body(challenge);
				let response = self.http_client.send(request).await?;

				if !response.is_success() {
					let reason = response
						.json::<TokenResponse>()
						.map(|reply| reply.envelope.message_or("token exchange was refused"))
						.unwrap_or_else(|_| "token exchange was refused".into());

					return Err(Error::Auth {
						reason: format!("{reason} (status {})", response.status()),
					});
				}

				let reply = response.json::<TokenResponse>()?;

				match reply.token.filter(|token| !token.is_empty()) {
					Some(token) => Ok(BearerToken::issued_now(token, self.token_ttl)),
					None => Err(Error::Auth {
						reason: reply.envelope.message_or("token exchange returned no token"),
					}),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	async fn fetch_challenge(&self) -> Result<String> {
		let request = self
			.http_client
			.get(http::endpoint(&self.base_url, CHALLENGE_PATH)?)
			.header(CONTENT_TYPE, APPLICATION_JSON);
		let response = self.http_client.send(request).await?;

		if !response.is_success() {
			return Err(Error::Auth {
				reason: format!("challenge request returned status {}", response.status()),
			});
		}

		Ok(response.text())
	}
}
impl AuthProvider for CertAuthProvider {
	fn bearer_token(&self) -> AuthFuture<'_> {
		Box::pin(self.cached_or_exchange())
	}
}
impl Debug for CertAuthProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CertAuthProvider")
			.field("base_url", &self.base_url.as_str())
			.field("token_ttl", &self.token_ttl)
			.finish()
	}
}
