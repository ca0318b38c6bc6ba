//! Error types for the Bamboo API client.
//!
//! # Design
//! Every non-success status maps to a dedicated variant so callers never
//! inspect raw status codes. `Unauthorized` gets its own variant because 401
//! has one fixed meaning across the whole permission API ("must be an
//! admin"); `GroupNotFound` covers the one endpoint where the server uses
//! 400 to report a missing group. Anything undocumented lands in
//! `UnexpectedStatus` with the numeric code. Network failures never appear
//! here: the host owns the round-trip and reports transport errors on its
//! own channel.

use thiserror::Error;

/// Errors returned by `BambooClient` build and parse methods.
#[derive(Debug, Error)]
pub enum BambooError {
    /// The server returned 401 — the caller lacks admin rights.
    #[error("you must be an admin to perform this action")]
    Unauthorized,

    /// The server returned 400 while revoking anonymous permissions: the
    /// group does not exist or a permission is not supported there.
    #[error("group does not exist or one of the requested permissions is not supported for this endpoint")]
    GroupNotFound,

    /// A listing returned a status outside its documented set. `context`
    /// names the resource (plan or project key), `status` is the observed
    /// status text.
    #[error("{context} returned {status}")]
    UnexpectedResponse { context: String, status: String },

    /// A permission mutation returned a status outside its documented set.
    #[error("server responded with unexpected status code {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
