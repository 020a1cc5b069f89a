//! Rate-limited document submission client: a fair, cancellable fixed-window admission gate
//! in front of a signing/registration API, plus the auth and transport layers that use it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
#[cfg(feature = "reqwest")] pub mod client;
pub mod config;
pub mod document;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod limiter;
pub mod obs;
pub mod submit;

mod _prelude {
	pub use std::{
		collections::VecDeque,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroU32,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::{Duration, Instant},
	};

	#[cfg(feature = "reqwest")]
	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Condvar, Mutex};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::Result;
	#[cfg(feature = "reqwest")]
	pub use crate::error::Error;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
