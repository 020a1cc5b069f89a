//! Validated identifiers and redacted values carried by document requests.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const PRODUCT_GROUP_MAX_LEN: usize = 128;

/// Error returned when a product group identifier fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProductGroupError {
	/// The identifier was empty.
	#[error("Product group cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Product group contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Product group exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Product group the document belongs to; sent both as the `pg` query parameter and in the
/// request body.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductGroup(String);
impl ProductGroup {
	/// Creates a new product group after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProductGroupError> {
		let view = value.as_ref();

		validate_product_group(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ProductGroup {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProductGroup {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProductGroup> for String {
	fn from(value: ProductGroup) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProductGroup {
	type Error = ProductGroupError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_product_group(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ProductGroup {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ProductGroup({})", self.0)
	}
}
impl Display for ProductGroup {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProductGroup {
	type Err = ProductGroupError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Detached signature over the product document. Redacted in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);
impl Signature {
	/// Wraps signature text.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the signature text. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl From<&str> for Signature {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Signature {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signature").field(&"<redacted>").finish()
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

fn validate_product_group(view: &str) -> Result<(), ProductGroupError> {
	if view.is_empty() {
		return Err(ProductGroupError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProductGroupError::ContainsWhitespace);
	}
	if view.len() > PRODUCT_GROUP_MAX_LEN {
		return Err(ProductGroupError::TooLong { max: PRODUCT_GROUP_MAX_LEN });
	}

	Ok(())
}
