//! Outbound document creation payloads.

// self
use crate::{
	_prelude::*,
	document::{ProductGroup, Signature},
	error::ConfigError,
};

/// Business document accepted by the document API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
	/// Free-form document description.
	pub document_info: String,
}
impl Document {
	/// Creates a document with the provided description.
	pub fn new(document_info: impl Into<String>) -> Self {
		Self { document_info: document_info.into() }
	}
}

/// How the document was produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFormat {
	/// Hand-assembled JSON document.
	#[default]
	Manual,
}

/// Registered document type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
	/// Aggregation of goods into packaging units.
	#[default]
	AggregationDocument,
}

/// JSON body posted to the document creation endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreationRequest {
	/// Always [`DocumentFormat::Manual`].
	pub document_format: DocumentFormat,
	/// Business document serialized as pretty-printed JSON text.
	pub product_document: String,
	/// Product group the document belongs to.
	pub product_group: ProductGroup,
	/// Detached signature over the product document.
	pub signature: Signature,
	/// Always [`DocumentType::AggregationDocument`].
	#[serde(rename = "type")]
	pub document_type: DocumentType,
}
impl DocumentCreationRequest {
	/// Serializes `document` and wraps it with the fixed format/type markers.
	pub fn new<D>(
		document: &D,
		signature: Signature,
		product_group: ProductGroup,
	) -> Result<Self, ConfigError>
	where
		D: ?Sized + Serialize,
	{
		let product_document =
			serde_json::to_string_pretty(document).map_err(ConfigError::Serialize)?;

		Ok(Self {
			document_format: DocumentFormat::Manual,
			product_document,
			product_group,
			signature,
			document_type: DocumentType::AggregationDocument,
		})
	}
}
