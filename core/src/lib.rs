//! Synchronous API client core for the Bamboo CI server's REST API: plan
//! branch listing and project plan permission management.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//! Authentication, retries, and transport concerns live with the caller.
//!
//! # Design
//! - `BambooClient` is stateless — it holds only `base_url` — so concurrent
//!   use needs no coordination.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Permission mutations return a typed [`PermissionChange`] distinguishing
//!   the server's 204 (applied) from 304 (already satisfied); both also emit
//!   a `tracing` event.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::BambooClient;
pub use error::BambooError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Branch, Branches, PermissionChange, PlanBranchResponse, PlanKey, Role,
    RolePermissionsResponse, ANONYMOUS_ROLE, LOGGED_IN_ROLE, READ_PERMISSION,
};
