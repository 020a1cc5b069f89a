//! Reqwest-backed document submitter.

// crates.io
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::AuthProvider,
	document::{DocumentCreationRequest, DocumentCreationResponse, ResponseEnvelope},
	error::ConfigError,
	http::{self, APPLICATION_JSON, ApiHttpClient, ApiResponse},
	obs::{self, OpKind, OpOutcome, OpSpan},
	submit::{DocumentSubmitter, SubmitFuture},
};

/// Relative path of the document creation endpoint.
pub const CREATE_DOCUMENT_PATH: &str = "lk/documents/create";

/// Posts document creation requests with a bearer token from an [`AuthProvider`].
pub struct ReqwestSubmitter<A>
where
	A: ?Sized + AuthProvider,
{
	http_client: ApiHttpClient,
	base_url: Url,
	auth: Arc<A>,
}
impl<A> ReqwestSubmitter<A>
where
	A: ?Sized + AuthProvider,
{
	/// Creates a submitter for the API rooted at `base_url`.
	pub fn new(http_client: ApiHttpClient, base_url: Url, auth: impl Into<Arc<A>>) -> Self {
		Self { http_client, base_url, auth: auth.into() }
	}

	/// The credential source.
	pub fn auth(&self) -> &Arc<A> {
		&self.auth
	}

	async fn submit_now(&self, request: DocumentCreationRequest) -> Result<String> {
		const KIND: OpKind = OpKind::Submit;

		let span = OpSpan::new(KIND, "create_document");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.auth.bearer_token().await?;
				let body = serde_json::to_vec(&request).map_err(ConfigError::Serialize)?;
				let outbound = self
					.http_client
					.post(http::endpoint(&self.base_url, CREATE_DOCUMENT_PATH)?)
					.query(&[("pg", &*request.product_group)])
					.header(CONTENT_TYPE, APPLICATION_JSON)
					.header(AUTHORIZATION, token.header_value())
					.body(body);
				let response = self.http_client.send(outbound).await?;

				if !response.is_success() {
					return Err(rejection(&response));
				}

				let reply = response.json::<DocumentCreationResponse>()?;

				reply
					.value
					.filter(|value| !value.is_empty())
					.ok_or_else(|| response.unexpected("response carried no document identifier"))
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}
}
impl<A> DocumentSubmitter for ReqwestSubmitter<A>
where
	A: ?Sized + AuthProvider,
{
	fn submit(&self, request: DocumentCreationRequest) -> SubmitFuture<'_> {
		Box::pin(self.submit_now(request))
	}
}
impl<A> Debug for ReqwestSubmitter<A>
where
	A: ?Sized + AuthProvider,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestSubmitter").field("base_url", &self.base_url.as_str()).finish()
	}
}

fn rejection(response: &ApiResponse) -> Error {
	let status = response.status();
	let envelope = response.json::<ResponseEnvelope>().unwrap_or_default();
	let message = envelope.message_or(match response.text() {
		text if text.trim().is_empty() => format!("HTTP {status}"),
		text => text,
	});

	Error::Rejected { status, code: envelope.code, message }
}
