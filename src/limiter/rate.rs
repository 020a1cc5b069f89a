//! Validated rate limit parameters.

// self
use crate::_prelude::*;

/// Errors raised while validating a [`RateLimit`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RateLimitError {
	/// The request ceiling must admit at least one call.
	#[error("Rate limit must allow at least one request per window.")]
	ZeroRequests,
	/// The window must have a positive length.
	#[error("Rate limit window must be longer than zero.")]
	ZeroWindow,
}

/// Coarse window lengths accepted by the client constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
	/// One second.
	Second,
	/// One minute.
	Minute,
	/// One hour.
	Hour,
	/// One day.
	Day,
}
impl TimeUnit {
	/// Returns the window length represented by the unit.
	pub const fn window(self) -> Duration {
		match self {
			TimeUnit::Second => Duration::from_secs(1),
			TimeUnit::Minute => Duration::from_secs(60),
			TimeUnit::Hour => Duration::from_secs(60 * 60),
			TimeUnit::Day => Duration::from_secs(24 * 60 * 60),
		}
	}

	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			TimeUnit::Second => "second",
			TimeUnit::Minute => "minute",
			TimeUnit::Hour => "hour",
			TimeUnit::Day => "day",
		}
	}
}
impl Display for TimeUnit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// At most `requests` admissions per `window`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRateLimit", into = "RawRateLimit")]
pub struct RateLimit {
	requests: NonZeroU32,
	window: Duration,
}
impl RateLimit {
	/// Validates a request ceiling over an arbitrary window.
	pub fn new(requests: u32, window: Duration) -> Result<Self, RateLimitError> {
		let requests = NonZeroU32::new(requests).ok_or(RateLimitError::ZeroRequests)?;

		if window.is_zero() {
			return Err(RateLimitError::ZeroWindow);
		}

		Ok(Self { requests, window })
	}

	/// Validates a request ceiling over one [`TimeUnit`].
	pub fn per(unit: TimeUnit, requests: u32) -> Result<Self, RateLimitError> {
		Self::new(requests, unit.window())
	}

	/// Number of admissions allowed per window.
	pub fn requests(&self) -> NonZeroU32 {
		self.requests
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.window
	}
}
impl Display for RateLimit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} per {:?}", self.requests, self.window)
	}
}

#[derive(Serialize, Deserialize)]
struct RawRateLimit {
	requests: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	time_unit: Option<TimeUnit>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	window_ms: Option<u64>,
}
impl TryFrom<RawRateLimit> for RateLimit {
	type Error = RateLimitError;

	fn try_from(raw: RawRateLimit) -> Result<Self, Self::Error> {
		let window = match (raw.window_ms, raw.time_unit) {
			(Some(ms), _) => Duration::from_millis(ms),
			(None, Some(unit)) => unit.window(),
			(None, None) => TimeUnit::Second.window(),
		};

		Self::new(raw.requests, window)
	}
}
impl From<RateLimit> for RawRateLimit {
	fn from(limit: RateLimit) -> Self {
		let window_ms = u64::try_from(limit.window.as_millis()).unwrap_or(u64::MAX);

		Self { requests: limit.requests.get(), time_unit: None, window_ms: Some(window_ms) }
	}
}
