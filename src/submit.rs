//! Document submission contracts and the rate-limited wrapper that gates them.
//!
//! [`ThrottledSubmitter`] is the only place that touches both halves of the system: it waits
//! on the shared [`RateLimiter`] and, once admitted, issues exactly one
//! [`DocumentSubmitter::submit`] call.

#[cfg(feature = "reqwest")] mod remote;

#[cfg(feature = "reqwest")] pub use remote::*;

// self
use crate::{
	_prelude::*,
	document::{DocumentCreationRequest, ProductGroup, Signature},
	error::ConfigError,
	limiter::RateLimiter,
};

/// Boxed future returned by [`DocumentSubmitter::submit`]; resolves to the registered
/// document identifier.
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + 'a + Send>>;

/// Sends one document creation request to the document API.
pub trait DocumentSubmitter
where
	Self: Send + Sync,
{
	/// Performs the network exchange for `request`.
	fn submit(&self, request: DocumentCreationRequest) -> SubmitFuture<'_>;
}

/// Gates every submission of the wrapped submitter through a shared [`RateLimiter`].
#[derive(Debug)]
pub struct ThrottledSubmitter<S> {
	inner: S,
	limiter: Arc<RateLimiter>,
}
impl<S> ThrottledSubmitter<S>
where
	S: DocumentSubmitter,
{
	/// Wraps `inner`; `limiter` may be shared with other submitters.
	pub fn new(inner: S, limiter: Arc<RateLimiter>) -> Self {
		Self { inner, limiter }
	}

	/// The shared limiter.
	pub fn limiter(&self) -> &Arc<RateLimiter> {
		&self.limiter
	}

	/// The wrapped submitter.
	pub fn inner(&self) -> &S {
		&self.inner
	}

	/// Serializes `document`, waits for admission, and submits it.
	///
	/// Serialization happens before queueing so a malformed document never spends a permit.
	pub async fn create_document<D>(
		&self,
		document: &D,
		signature: impl Into<Signature>,
		product_group: impl AsRef<str>,
	) -> Result<String>
	where
		D: ?Sized + Serialize,
	{
		let product_group = ProductGroup::new(product_group).map_err(ConfigError::from)?;
		let request = DocumentCreationRequest::new(document, signature.into(), product_group)?;

		self.submit(request).await
	}
}
impl<S> DocumentSubmitter for ThrottledSubmitter<S>
where
	S: DocumentSubmitter,
{
	fn submit(&self, request: DocumentCreationRequest) -> SubmitFuture<'_> {
		Box::pin(async move {
			self.limiter.acquire_async().await;

			self.inner.submit(request).await
		})
	}
}
