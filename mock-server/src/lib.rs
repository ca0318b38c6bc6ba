//! In-process Bamboo lookalike for exercising the client core over HTTP.
//!
//! Serves the plan-branch and project-plan-permission endpoints with the
//! status-code behavior the real server documents: 304 when a mutation would
//! not change state, 401 on any permission route without an `Authorization`
//! header, and 400 when revoking from an anonymous group that was never
//! configured. State lives behind an `Arc<RwLock<_>>` and can be seeded with
//! plans via [`app_with`].

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

const ANONYMOUS_ROLE: &str = "ANONYMOUS";
const LOGGED_IN_ROLE: &str = "LOGGED_IN";

/// Bamboo's default page size when `max-results` is absent.
const DEFAULT_MAX_RESULTS: usize = 25;

/// A plan branch as the server serializes it: the branch's own plan key sits
/// flat alongside the other fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(default)]
    pub description: String,
    pub short_name: String,
    pub short_key: String,
    pub enabled: bool,
    #[serde(default)]
    pub workflow_type: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Seeded plans plus per-project role permission grants.
///
/// Role maps are `BTreeMap` so the role listing is deterministic across
/// requests.
#[derive(Debug, Default)]
pub struct ServerState {
    pub plans: HashMap<String, Vec<Branch>>,
    pub roles: HashMap<String, BTreeMap<String, Vec<String>>>,
}

pub type Db = Arc<RwLock<ServerState>>;

pub fn app() -> Router {
    app_with(ServerState::default())
}

pub fn app_with(state: ServerState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    Router::new()
        .route("/plan/{plan_key}/.json", get(get_plan))
        .route(
            "/permissions/projectplan/{project_key}/roles",
            get(list_roles),
        )
        .route(
            "/permissions/projectplan/{project_key}/roles/{role}",
            put(grant_permissions).delete(revoke_permissions),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener, state: ServerState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

/// The real server wants a session or basic-auth credential; the mock only
/// cares whether the header is present so tests can drive the 401 paths.
fn authorized(headers: &HeaderMap) -> bool {
    headers.contains_key(header::AUTHORIZATION)
}

fn known_role(role: &str) -> bool {
    role == ANONYMOUS_ROLE || role == LOGGED_IN_ROLE
}

async fn get_plan(
    State(db): State<Db>,
    Path(plan_key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    let branches = state.plans.get(&plan_key).ok_or(StatusCode::NOT_FOUND)?;

    let mut payload = json!({ "key": plan_key, "shortKey": plan_key });
    let expanded = params
        .get("expand")
        .is_some_and(|e| e.split(',').any(|part| part == "branches"));
    if expanded {
        let max = params
            .get("max-results")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_RESULTS);
        let page: Vec<&Branch> = branches.iter().take(max).collect();
        payload["branches"] = json!({
            "size": branches.len(),
            "max-result": page.len(),
            "start-index": 0,
            "branch": page,
        });
    }
    Ok(Json(payload))
}

async fn list_roles(
    State(db): State<Db>,
    Path(project_key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let state = db.read().await;
    let results: Vec<Value> = state
        .roles
        .get(&project_key)
        .map(|roles| {
            roles
                .iter()
                .map(|(name, permissions)| json!({ "name": name, "permissions": permissions }))
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(json!({ "results": results })))
}

async fn grant_permissions(
    State(db): State<Db>,
    Path((project_key, role)): Path<(String, String)>,
    headers: HeaderMap,
    Json(permissions): Json<Vec<String>>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if !known_role(&role) {
        return StatusCode::BAD_REQUEST;
    }
    let mut state = db.write().await;
    let granted = state
        .roles
        .entry(project_key)
        .or_default()
        .entry(role)
        .or_default();
    let missing: Vec<String> = permissions
        .into_iter()
        .filter(|p| !granted.contains(p))
        .collect();
    if missing.is_empty() {
        StatusCode::NOT_MODIFIED
    } else {
        granted.extend(missing);
        StatusCode::NO_CONTENT
    }
}

async fn revoke_permissions(
    State(db): State<Db>,
    Path((project_key, role)): Path<(String, String)>,
    headers: HeaderMap,
    Json(permissions): Json<Vec<String>>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if !known_role(&role) {
        return StatusCode::BAD_REQUEST;
    }
    let mut state = db.write().await;
    let granted = state
        .roles
        .get_mut(&project_key)
        .and_then(|roles| roles.get_mut(&role));
    let Some(granted) = granted else {
        // Revoking from an anonymous group that was never set up is the
        // documented 400; the logged-in group always exists conceptually.
        return if role == ANONYMOUS_ROLE {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_MODIFIED
        };
    };
    let before = granted.len();
    granted.retain(|p| !permissions.contains(p));
    if granted.len() == before {
        StatusCode::NOT_MODIFIED
    } else {
        StatusCode::NO_CONTENT
    }
}
