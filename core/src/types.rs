//! Domain DTOs for the Bamboo plan-branch and project-plan-permission APIs.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! from the mock-server crate; integration tests catch schema drift. Bamboo
//! omits fields freely depending on server version and expansion options, so
//! every response field is default-tolerant — an absent field decodes to its
//! zero value rather than failing the whole envelope.

use serde::{Deserialize, Serialize};

/// Role name the API expects for anonymous users.
pub const ANONYMOUS_ROLE: &str = "ANONYMOUS";

/// Role name the API expects for logged-in users.
pub const LOGGED_IN_ROLE: &str = "LOGGED_IN";

/// Permission name granting view access to a project's plans.
pub const READ_PERMISSION: &str = "READ";

/// The key identifying a plan (or a plan branch, which is itself a plan).
///
/// Opaque to this crate: keys are passed through to the server verbatim,
/// with no local validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanKey {
    #[serde(default)]
    pub key: String,
}

/// A single plan branch.
///
/// The server flattens the branch's own plan key into the branch object;
/// `#[serde(flatten)]` preserves that wire shape while keeping the key an
/// explicit field locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub short_key: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub workflow_type: String,
    #[serde(flatten)]
    pub plan_key: PlanKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The branch collection inside a plan response, including the server's
/// collection metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branches {
    #[serde(default)]
    pub size: u32,
    #[serde(default, rename = "max-result")]
    pub max_result: u32,
    #[serde(default, rename = "start-index")]
    pub start_index: u32,
    #[serde(default)]
    pub branch: Vec<Branch>,
}

/// Envelope returned by `plan/{planKey}/.json?expand=branches`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanBranchResponse {
    #[serde(default)]
    pub branches: Branches,
}

/// An authorization role and the permissions it holds on a project's plans.
///
/// Permission order is whatever the server sent; it carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Envelope returned by `permissions/projectplan/{projectKey}/roles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePermissionsResponse {
    #[serde(default)]
    pub results: Vec<Role>,
}

/// Outcome of a permission grant or revoke, distinguishing the server's 204
/// (state changed) from 304 (already in the requested state).
///
/// Both are success; callers scripting idempotent permission changes use
/// this to know whether the mutation actually did anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionChange {
    /// 204 — the server applied the requested change.
    Applied,
    /// 304 — the role was already in the requested state.
    Unchanged,
}

impl PermissionChange {
    pub fn changed(self) -> bool {
        matches!(self, PermissionChange::Applied)
    }
}
