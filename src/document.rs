//! Wire documents exchanged with the document API.
//!
//! Request and response bodies use the camelCase field names the API expects. The business
//! document itself is opaque: anything that implements [`Serialize`] can be wrapped into a
//! [`DocumentCreationRequest`].

pub mod id;
pub mod request;
pub mod response;

pub use id::*;
pub use request::*;
pub use response::*;
