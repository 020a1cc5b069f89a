//! Inbound response envelopes.

// self
use crate::_prelude::*;

/// Status fields present on every document API reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
	/// Upstream status or error code.
	#[serde(default)]
	pub code: Option<String>,
	/// Upstream error message.
	#[serde(default)]
	pub error_message: Option<String>,
	/// Human-readable description.
	#[serde(default)]
	pub description: Option<String>,
}
impl ResponseEnvelope {
	/// Best available human-readable message, falling back to `fallback`.
	pub fn message_or(&self, fallback: impl Into<String>) -> String {
		self.error_message
			.clone()
			.or_else(|| self.description.clone())
			.unwrap_or_else(|| fallback.into())
	}
}

/// Reply from the certificate exchange endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Shared status fields.
	#[serde(flatten)]
	pub envelope: ResponseEnvelope,
	/// Issued bearer token.
	#[serde(default)]
	pub token: Option<String>,
}

/// Reply from the document creation endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCreationResponse {
	/// Shared status fields.
	#[serde(flatten)]
	pub envelope: ResponseEnvelope,
	/// Identifier assigned to the registered document.
	#[serde(default)]
	pub value: Option<String>,
}
