//! Bearer credential providers consumed by the document submitter.
//!
//! The rate limiter never talks to an [`AuthProvider`]; only the submitter does, after the
//! caller has been admitted.

#[cfg(feature = "reqwest")] pub mod cert;
pub mod token;

#[cfg(feature = "reqwest")] pub use cert::*;
pub use token::*;

// self
use crate::_prelude::*;

/// Boxed future returned by [`AuthProvider::bearer_token`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<BearerToken>> + 'a + Send>>;

/// Source of bearer credentials for document API calls.
pub trait AuthProvider
where
	Self: Send + Sync,
{
	/// Returns a token that is valid right now.
	fn bearer_token(&self) -> AuthFuture<'_>;
}

/// Provider that always hands out the same pre-issued token.
#[derive(Clone, Debug)]
pub struct StaticTokenProvider(BearerToken);
impl StaticTokenProvider {
	/// Wraps a pre-issued token that never expires locally.
	pub fn new(token: impl Into<String>) -> Self {
		Self(BearerToken::non_expiring(token))
	}
}
impl AuthProvider for StaticTokenProvider {
	fn bearer_token(&self) -> AuthFuture<'_> {
		let token = self.0.clone();

		Box::pin(async move { Ok(token) })
	}
}
