//! Helpers shared by integration tests.

#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// self
use crpt_api::{
	auth::{AuthProvider, StaticTokenProvider},
	http::ApiHttpClient,
	limiter::{RateLimit, RateLimiter},
	submit::{ReqwestSubmitter, ThrottledSubmitter},
	url::Url,
};

/// Throttled submitter type used by reqwest-backed integration tests.
pub type TestSubmitter = ThrottledSubmitter<ReqwestSubmitter<dyn AuthProvider>>;

pub fn limit(requests: u32, window: Duration) -> RateLimit {
	RateLimit::new(requests, window).expect("Test rate limit should be valid.")
}

pub fn limiter(requests: u32, window: Duration) -> Arc<RateLimiter> {
	Arc::new(RateLimiter::new(limit(requests, window)))
}

pub fn base_url(raw: &str) -> Url {
	Url::parse(raw).expect("Mock server URL should parse.")
}

/// Builds a throttled submitter that authenticates with a fixed bearer token.
pub fn build_test_submitter(base: &str, token: &str, limiter: Arc<RateLimiter>) -> TestSubmitter {
	let auth: Arc<dyn AuthProvider> = Arc::new(StaticTokenProvider::new(token));
	let inner = ReqwestSubmitter::new(ApiHttpClient::default(), base_url(base), auth);

	ThrottledSubmitter::new(inner, limiter)
}
