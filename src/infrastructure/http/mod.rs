//! HTTP REST API routes

mod command_routes;
mod group_routes;
mod user_routes;

use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::application::services::{ErrorKind, GroupMembershipError};
use crate::domain::value_objects::{GroupId, UserId};
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Group routes
        .route("/api/groups", post(group_routes::create_group))
        .route("/api/groups/{id}", get(group_routes::get_group))
        .route("/api/groups/{id}", delete(group_routes::delete_group))
        .route("/api/groups/{id}/name", put(group_routes::rename_group))
        .route("/api/groups/{id}/join", post(group_routes::join_group))
        .route("/api/groups/{id}/leave", post(group_routes::leave_group))
        .route(
            "/api/groups/{id}/join-requests/{requester_id}",
            post(group_routes::handle_join_request),
        )
        .route("/api/groups/{id}/invites", post(group_routes::invite_to_group))
        .route(
            "/api/groups/{id}/invites/{invitee_id}",
            post(group_routes::handle_invite_request),
        )
        .route("/api/groups/{id}/admins", post(group_routes::add_admin))
        .route(
            "/api/groups/{id}/admins/{admin_id}",
            delete(group_routes::delete_admin),
        )
        // Chat bot webhook
        .route("/api/commands", post(command_routes::run_command))
        // User mirror
        .route("/api/users/{id}", get(user_routes::get_user))
        .route("/api/users/{id}", put(user_routes::upsert_user))
}

/// Map a membership failure to a status code and message
pub fn membership_error(e: GroupMembershipError) -> (StatusCode, String) {
    let status = match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::StateConflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Infrastructure if e.is_retryable() => StatusCode::CONFLICT,
        ErrorKind::Infrastructure => {
            tracing::error!("Group operation failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, format!("{}: {}", e.code(), e))
}

pub(crate) fn parse_group_id(value: &str) -> Result<GroupId, (StatusCode, String)> {
    GroupId::parse(value).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid group ID".to_string()))
}

pub(crate) fn parse_user_id(value: &str, role: &str) -> Result<UserId, (StatusCode, String)> {
    UserId::parse(value).map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid {} ID", role)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::ports::outbound::GroupStoreError;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::persistence::PersistenceFactory;

    fn app() -> Router {
        let config = AppConfig::load_from(None).unwrap();
        let state = AppState::with_persistence(config, PersistenceFactory::memory());
        create_routes().with_state(Arc::new(state))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn user(app: &Router, name: &str) -> String {
        let id = UserId::new().to_string();
        let (status, _) = call(
            app,
            Method::PUT,
            &format!("/api/users/{}", id),
            Some(json!({ "username": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    #[test]
    fn test_error_kinds_map_to_statuses() {
        let id = UserId::new();
        assert_eq!(
            membership_error(GroupMembershipError::UserNotFound(id)).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            membership_error(GroupMembershipError::ApproverHasNoPermission(id)).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            membership_error(GroupMembershipError::InviteeIsAlreadyInvited(id)).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            membership_error(GroupMembershipError::InvalidGroupName("empty".to_string())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            membership_error(GroupMembershipError::Store(GroupStoreError::Conflict {
                group_id: GroupId::new(),
                expected: 1,
                found: 2,
            }))
            .0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            membership_error(GroupMembershipError::Store(GroupStoreError::Database(
                "down".to_string()
            )))
            .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_request_required_flow_over_http() {
        let app = app();
        let owner = user(&app, "owner").await;
        let guest = user(&app, "guest").await;

        let (status, group) = call(
            &app,
            Method::POST,
            "/api/groups",
            Some(json!({ "name": "Runners", "owner_id": owner, "visibility": "REQUEST_REQUIRED" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let group_id = group["id"].as_str().unwrap().to_string();

        let (status, joined) = call(
            &app,
            Method::POST,
            &format!("/api/groups/{}/join", group_id),
            Some(json!({ "user_id": guest })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(joined["outcome"], "requested");

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/api/groups/{}/join-requests/{}", group_id, guest),
            Some(json!({ "approver_id": guest, "action": "ACCEPT" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, group) = call(
            &app,
            Method::POST,
            &format!("/api/groups/{}/join-requests/{}", group_id, guest),
            Some(json!({ "approver_id": owner, "action": "ACCEPT" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(group["members"][0]["user_id"], guest.as_str());
        assert_eq!(group["members"][0]["approved_by"], owner.as_str());

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/api/groups/{}?actor_id={}", group_id, guest),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/api/groups/{}?actor_id={}", group_id, owner),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&app, Method::GET, &format!("/api/groups/{}", group_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_ids_are_bad_requests() {
        let app = app();

        let (status, _) = call(&app, Method::GET, "/api/groups/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/groups",
            Some(json!({ "name": "x", "owner_id": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_owner_is_not_found() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/groups",
            Some(json!({ "name": "Orphans", "owner_id": UserId::new().to_string() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.as_str().unwrap().starts_with("OWNER_NOT_FOUND"));
    }
}
