//! Stateless request builder and response parser for the Bamboo REST API.
//!
//! # Design
//! `BambooClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the caller executes the round-trip in between. All four
//! permission mutations share one closed status→outcome mapping
//! (`MutationOutcome`) so the documented status set stays auditable in a
//! single place.

use crate::error::BambooError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Branch, PermissionChange, PlanBranchResponse, Role, RolePermissionsResponse, ANONYMOUS_ROLE,
    LOGGED_IN_ROLE, READ_PERMISSION,
};

/// Result limit for branch listing, set high enough to defeat pagination.
const BRANCH_MAX_RESULTS: &str = "10000";

/// Outcome tag for a permission mutation response.
///
/// Closed mapping from the documented status set; every undocumented code
/// lands in `Unexpected` with the raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationOutcome {
    /// 204 — the server applied the change.
    Changed,
    /// 304 — the role was already in the requested state.
    Unchanged,
    /// 401 — the caller lacks admin rights.
    Forbidden,
    /// 400 — group missing or permission unsupported. Meaningful only on
    /// anonymous revoke; elsewhere it is as unexpected as any other code.
    Rejected,
    Unexpected(u16),
}

fn classify_mutation_status(status: u16) -> MutationOutcome {
    match status {
        204 => MutationOutcome::Changed,
        304 => MutationOutcome::Unchanged,
        401 => MutationOutcome::Forbidden,
        400 => MutationOutcome::Rejected,
        other => MutationOutcome::Unexpected(other),
    }
}

/// Stateless client for Bamboo plan branches and project plan permissions.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Safe to share across threads: every method takes
/// `&self` and no call observes another.
#[derive(Debug, Clone)]
pub struct BambooClient {
    base_url: String,
}

impl BambooClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Plan branches
    // -----------------------------------------------------------------------

    /// GET `plan/{planKey}/.json` with branch expansion.
    ///
    /// The plan key is forwarded verbatim; a malformed key surfaces as
    /// whatever error the server returns.
    pub fn build_list_plan_branches(&self, plan_key: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/plan/{plan_key}/.json", self.base_url),
            query: vec![
                ("max-results".to_string(), BRANCH_MAX_RESULTS.to_string()),
                ("expand".to_string(), "branches".to_string()),
            ],
            body: None,
        }
    }

    /// Flatten a branch-listing response into the branch list, in server
    /// order. Any non-200 status becomes an error naming the plan key and
    /// the observed status text.
    pub fn parse_list_plan_branches(
        &self,
        plan_key: &str,
        response: HttpResponse,
    ) -> Result<Vec<Branch>, BambooError> {
        if response.status != 200 {
            return Err(BambooError::UnexpectedResponse {
                context: format!("listing plan branches for {plan_key}"),
                status: response.status_text(),
            });
        }
        let envelope: PlanBranchResponse = serde_json::from_str(&response.body)
            .map_err(|e| BambooError::Deserialization(e.to_string()))?;
        Ok(envelope.branches.branch)
    }

    // -----------------------------------------------------------------------
    // Role listing
    // -----------------------------------------------------------------------

    /// GET `permissions/projectplan/{projectKey}/roles`.
    pub fn build_list_role_permissions(&self, project_key: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/permissions/projectplan/{project_key}/roles", self.base_url),
            query: Vec::new(),
            body: None,
        }
    }

    /// Parse the roles holding plan permissions for a project. Only the
    /// anonymous and logged-in roles are supported by the mutation
    /// endpoints, but the listing returns whatever the server knows.
    pub fn parse_list_role_permissions(
        &self,
        project_key: &str,
        response: HttpResponse,
    ) -> Result<Vec<Role>, BambooError> {
        match response.status {
            200 => {
                let envelope: RolePermissionsResponse = serde_json::from_str(&response.body)
                    .map_err(|e| BambooError::Deserialization(e.to_string()))?;
                Ok(envelope.results)
            }
            401 => Err(BambooError::Unauthorized),
            _ => Err(BambooError::UnexpectedResponse {
                context: format!("retrieving role information for project {project_key}"),
                status: response.status_text(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Permission mutations
    // -----------------------------------------------------------------------

    /// PUT the given permissions onto the logged-in users role.
    pub fn build_set_logged_in_permissions(
        &self,
        project_key: &str,
        permissions: &[&str],
    ) -> Result<HttpRequest, BambooError> {
        self.build_role_mutation(HttpMethod::Put, project_key, LOGGED_IN_ROLE, permissions)
    }

    pub fn parse_set_logged_in_permissions(
        &self,
        response: HttpResponse,
    ) -> Result<PermissionChange, BambooError> {
        interpret_mutation(LOGGED_IN_ROLE, "grant", false, &response)
    }

    /// DELETE the given permissions from the logged-in users role.
    pub fn build_remove_logged_in_permissions(
        &self,
        project_key: &str,
        permissions: &[&str],
    ) -> Result<HttpRequest, BambooError> {
        self.build_role_mutation(HttpMethod::Delete, project_key, LOGGED_IN_ROLE, permissions)
    }

    pub fn parse_remove_logged_in_permissions(
        &self,
        response: HttpResponse,
    ) -> Result<PermissionChange, BambooError> {
        interpret_mutation(LOGGED_IN_ROLE, "revoke", false, &response)
    }

    /// Allow anonymous users to view the project's plans.
    pub fn build_set_anonymous_read_permission(
        &self,
        project_key: &str,
    ) -> Result<HttpRequest, BambooError> {
        self.build_role_mutation(HttpMethod::Put, project_key, ANONYMOUS_ROLE, &[READ_PERMISSION])
    }

    pub fn parse_set_anonymous_read_permission(
        &self,
        response: HttpResponse,
    ) -> Result<PermissionChange, BambooError> {
        interpret_mutation(ANONYMOUS_ROLE, "grant", false, &response)
    }

    /// Stop anonymous users from viewing the project's plans.
    pub fn build_remove_anonymous_read_permission(
        &self,
        project_key: &str,
    ) -> Result<HttpRequest, BambooError> {
        self.build_role_mutation(
            HttpMethod::Delete,
            project_key,
            ANONYMOUS_ROLE,
            &[READ_PERMISSION],
        )
    }

    /// The one mutation where 400 is documented: the anonymous group may not
    /// exist for the project.
    pub fn parse_remove_anonymous_read_permission(
        &self,
        response: HttpResponse,
    ) -> Result<PermissionChange, BambooError> {
        interpret_mutation(ANONYMOUS_ROLE, "revoke", true, &response)
    }

    /// All four mutations hit `permissions/projectplan/{project}/roles/{role}`
    /// with the permission list as a JSON array body; only the method and
    /// role differ.
    fn build_role_mutation(
        &self,
        method: HttpMethod,
        project_key: &str,
        role: &str,
        permissions: &[&str],
    ) -> Result<HttpRequest, BambooError> {
        let body = serde_json::to_string(permissions)
            .map_err(|e| BambooError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!(
                "{}/permissions/projectplan/{project_key}/roles/{role}",
                self.base_url
            ),
            query: Vec::new(),
            body: Some(body),
        })
    }
}

/// Map a mutation response onto the closed outcome set.
///
/// 204 and 304 both succeed but stay distinguishable: the typed
/// `PermissionChange` is the primary channel and a tracing event carries the
/// same distinction for log pipelines. `map_bad_request` is set only for
/// anonymous revoke, where the server documents 400.
fn interpret_mutation(
    role: &str,
    action: &str,
    map_bad_request: bool,
    response: &HttpResponse,
) -> Result<PermissionChange, BambooError> {
    match classify_mutation_status(response.status) {
        MutationOutcome::Changed => {
            tracing::info!(role, action, "permission state changed");
            Ok(PermissionChange::Applied)
        }
        MutationOutcome::Unchanged => {
            tracing::info!(role, action, "role already in requested permission state");
            Ok(PermissionChange::Unchanged)
        }
        MutationOutcome::Forbidden => Err(BambooError::Unauthorized),
        MutationOutcome::Rejected if map_bad_request => Err(BambooError::GroupNotFound),
        MutationOutcome::Rejected => Err(BambooError::UnexpectedStatus {
            status: response.status,
        }),
        MutationOutcome::Unexpected(status) => Err(BambooError::UnexpectedStatus { status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BambooClient {
        BambooClient::new("http://localhost:6990/rest/api/latest")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    // --- plan branches ---

    #[test]
    fn build_list_plan_branches_sets_route_and_query() {
        let req = client().build_list_plan_branches("PROJ-PLAN");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:6990/rest/api/latest/plan/PROJ-PLAN/.json"
        );
        assert_eq!(
            req.query,
            vec![
                ("max-results".to_string(), "10000".to_string()),
                ("expand".to_string(), "branches".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_plan_branches_flattens_envelope_in_order() {
        let body = r#"{"branches":{"size":2,"branch":[
            {"shortName":"master","shortKey":"0","enabled":true},
            {"shortName":"develop","shortKey":"DEV","enabled":false,"key":"PROJ-PLAN12"}
        ]}}"#;
        let branches = client()
            .parse_list_plan_branches("PROJ-PLAN", response(200, body))
            .unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].short_name, "master");
        assert!(branches[0].enabled);
        assert_eq!(branches[1].short_name, "develop");
        assert_eq!(branches[1].plan_key.key, "PROJ-PLAN12");
    }

    #[test]
    fn parse_list_plan_branches_empty_expansion() {
        let branches = client()
            .parse_list_plan_branches("PROJ-PLAN", response(200, r#"{"key":"PROJ-PLAN"}"#))
            .unwrap();
        assert!(branches.is_empty());
    }

    #[test]
    fn parse_list_plan_branches_non_200_names_plan_and_status() {
        let err = client()
            .parse_list_plan_branches("PROJ-PLAN", response(404, ""))
            .unwrap_err();
        match err {
            BambooError::UnexpectedResponse { context, status } => {
                assert!(context.contains("PROJ-PLAN"));
                assert_eq!(status, "404 Not Found");
            }
            other => panic!("expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[test]
    fn parse_list_plan_branches_bad_json() {
        let err = client()
            .parse_list_plan_branches("PROJ-PLAN", response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, BambooError::Deserialization(_)));
    }

    // --- role listing ---

    #[test]
    fn build_list_role_permissions_route() {
        let req = client().build_list_role_permissions("PROJ");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:6990/rest/api/latest/permissions/projectplan/PROJ/roles"
        );
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_role_permissions_success() {
        let body = r#"{"results":[
            {"name":"ANONYMOUS","permissions":["READ"]},
            {"name":"LOGGED_IN","permissions":["READ","BUILD"]}
        ]}"#;
        let roles = client()
            .parse_list_role_permissions("PROJ", response(200, body))
            .unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].name, ANONYMOUS_ROLE);
        assert_eq!(roles[1].permissions, vec!["READ", "BUILD"]);
    }

    #[test]
    fn parse_list_role_permissions_401_is_authorization_error() {
        let err = client()
            .parse_list_role_permissions("PROJ", response(401, ""))
            .unwrap_err();
        assert!(matches!(err, BambooError::Unauthorized));
    }

    #[test]
    fn parse_list_role_permissions_other_status_names_project() {
        let err = client()
            .parse_list_role_permissions("PROJ", response(500, ""))
            .unwrap_err();
        match err {
            BambooError::UnexpectedResponse { context, status } => {
                assert!(context.contains("PROJ"));
                assert!(status.contains("500"));
            }
            other => panic!("expected UnexpectedResponse, got {other:?}"),
        }
    }

    // --- permission mutations ---

    #[test]
    fn build_set_logged_in_permissions_puts_json_array() {
        let req = client()
            .build_set_logged_in_permissions("PROJ", &["READ", "BUILD"])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.path,
            "http://localhost:6990/rest/api/latest/permissions/projectplan/PROJ/roles/LOGGED_IN"
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!(["READ", "BUILD"]));
    }

    #[test]
    fn build_remove_logged_in_permissions_deletes_with_body() {
        let req = client()
            .build_remove_logged_in_permissions("PROJ", &["BUILD"])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.body.as_deref(), Some(r#"["BUILD"]"#));
    }

    #[test]
    fn build_anonymous_mutations_use_fixed_read_permission() {
        let grant = client().build_set_anonymous_read_permission("PROJ").unwrap();
        assert_eq!(grant.method, HttpMethod::Put);
        assert_eq!(
            grant.path,
            "http://localhost:6990/rest/api/latest/permissions/projectplan/PROJ/roles/ANONYMOUS"
        );
        assert_eq!(grant.body.as_deref(), Some(r#"["READ"]"#));

        let revoke = client()
            .build_remove_anonymous_read_permission("PROJ")
            .unwrap();
        assert_eq!(revoke.method, HttpMethod::Delete);
        assert_eq!(revoke.body.as_deref(), Some(r#"["READ"]"#));
    }

    #[test]
    fn mutation_204_reports_applied() {
        let change = client()
            .parse_set_logged_in_permissions(response(204, ""))
            .unwrap();
        assert_eq!(change, PermissionChange::Applied);
        assert!(change.changed());
    }

    #[test]
    fn mutation_304_reports_unchanged_without_error() {
        let change = client()
            .parse_set_logged_in_permissions(response(304, ""))
            .unwrap();
        assert_eq!(change, PermissionChange::Unchanged);
        assert!(!change.changed());
    }

    #[test]
    fn mutation_401_is_authorization_error() {
        let err = client()
            .parse_remove_logged_in_permissions(response(401, ""))
            .unwrap_err();
        assert!(matches!(err, BambooError::Unauthorized));
    }

    #[test]
    fn anonymous_revoke_400_maps_to_group_not_found() {
        let err = client()
            .parse_remove_anonymous_read_permission(response(400, ""))
            .unwrap_err();
        assert!(matches!(err, BambooError::GroupNotFound));
    }

    #[test]
    fn logged_in_mutation_400_stays_unexpected() {
        // 400 is documented only for anonymous revoke; everywhere else it
        // falls through to the generic arm.
        let err = client()
            .parse_set_logged_in_permissions(response(400, ""))
            .unwrap_err();
        assert!(matches!(err, BambooError::UnexpectedStatus { status: 400 }));
    }

    #[test]
    fn mutation_undocumented_status_carries_code() {
        let err = client()
            .parse_set_anonymous_read_permission(response(500, ""))
            .unwrap_err();
        assert!(matches!(err, BambooError::UnexpectedStatus { status: 500 }));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BambooClient::new("http://localhost:6990/rest/api/latest/");
        let req = client.build_list_role_permissions("PROJ");
        assert_eq!(
            req.path,
            "http://localhost:6990/rest/api/latest/permissions/projectplan/PROJ/roles"
        );
    }
}
