//! Bearer token model with redacted secrets.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer token plus the window in which it may be reused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
	/// Token value sent in the `Authorization` header.
	pub secret: TokenSecret,
	/// Instant the token was obtained.
	pub issued_at: OffsetDateTime,
	/// Instant after which the token must be re-issued.
	pub expires_at: OffsetDateTime,
}
impl BearerToken {
	/// Creates a token issued now that stays fresh for `ttl`.
	pub fn issued_now(secret: impl Into<String>, ttl: Duration) -> Self {
		let issued_at = OffsetDateTime::now_utc();
		let ttl = time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX);
		let expires_at = issued_at.checked_add(ttl).unwrap_or_else(|| far_future(issued_at));

		Self { secret: TokenSecret::new(secret), issued_at, expires_at }
	}

	/// Creates a token that never expires locally.
	pub fn non_expiring(secret: impl Into<String>) -> Self {
		let issued_at = OffsetDateTime::now_utc();

		Self { secret: TokenSecret::new(secret), issued_at, expires_at: far_future(issued_at) }
	}

	/// Whether the token may still be used at `instant`.
	pub fn is_fresh_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// `Authorization` header value.
	pub fn header_value(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}

fn far_future(from: OffsetDateTime) -> OffsetDateTime {
	from.replace_year(9999).unwrap_or(from)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn freshness_follows_ttl() {
		let token = BearerToken::issued_now("abc", Duration::from_secs(60));

		assert!(token.is_fresh_at(token.issued_at));
		assert!(!token.is_fresh_at(token.issued_at + time::Duration::seconds(60)));
		assert_eq!(token.header_value(), "Bearer abc");
		assert!(!format!("{token:?}").contains("abc"));
	}
}
