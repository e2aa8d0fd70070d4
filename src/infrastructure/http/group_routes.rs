//! Group REST API routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::application::dto::{
    AddAdminRequestDto, CreateGroupRequestDto, GroupResponseDto, HandleInviteRequestDto,
    HandleJoinRequestDto, InviteRequestDto, JoinGroupResponseDto, RenameGroupRequestDto,
    UserActionRequestDto,
};
use crate::application::services::{
    AddAdminRequest, CreateGroupRequest, DeleteAdminRequest, DeleteGroupRequest,
    GroupMembershipService, HandleInviteRequestRequest, HandleJoinRequestRequest,
    InviteToGroupRequest, JoinGroupRequest, LeaveGroupRequest, RenameGroupRequest,
};
use crate::infrastructure::http::{membership_error, parse_group_id, parse_user_id};
use crate::infrastructure::state::AppState;

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Create a new group
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGroupRequestDto>,
) -> ApiResult<(StatusCode, Json<GroupResponseDto>)> {
    let owner_id = parse_user_id(&req.owner_id, "owner")?;

    let group = state
        .group_service
        .create_group(CreateGroupRequest {
            name: req.name,
            owner_id,
            visibility: req.visibility,
        })
        .await
        .map_err(membership_error)?;

    Ok((StatusCode::CREATED, Json(GroupResponseDto::from(&group))))
}

/// Get a group by ID
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group_id = parse_group_id(&id)?;

    let group = state
        .group_service
        .get_group(group_id)
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}

/// Rename a group
pub async fn rename_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RenameGroupRequestDto>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group = state
        .group_service
        .rename_group(RenameGroupRequest {
            group_id: parse_group_id(&id)?,
            actor_id: parse_user_id(&req.actor_id, "actor")?,
            name: req.name,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteGroupQuery {
    pub actor_id: String,
}

/// Delete a group
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DeleteGroupQuery>,
) -> ApiResult<StatusCode> {
    state
        .group_service
        .delete_group(DeleteGroupRequest {
            group_id: parse_group_id(&id)?,
            actor_id: parse_user_id(&query.actor_id, "actor")?,
        })
        .await
        .map_err(membership_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Join a group, or ask to join it
pub async fn join_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UserActionRequestDto>,
) -> ApiResult<Json<JoinGroupResponseDto>> {
    let response = state
        .group_service
        .join_group(JoinGroupRequest {
            user_id: parse_user_id(&req.user_id, "user")?,
            group_id: parse_group_id(&id)?,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(JoinGroupResponseDto {
        outcome: response.outcome.as_str(),
        group: GroupResponseDto::from(&response.group),
    }))
}

/// Leave a group
pub async fn leave_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UserActionRequestDto>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group = state
        .group_service
        .leave_group(LeaveGroupRequest {
            user_id: parse_user_id(&req.user_id, "user")?,
            group_id: parse_group_id(&id)?,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}

/// Accept or reject a pending join request
pub async fn handle_join_request(
    State(state): State<Arc<AppState>>,
    Path((id, requester_id)): Path<(String, String)>,
    Json(req): Json<HandleJoinRequestDto>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group = state
        .group_service
        .handle_join_request(HandleJoinRequestRequest {
            requester_id: parse_user_id(&requester_id, "requester")?,
            group_id: parse_group_id(&id)?,
            action: req.action,
            approver_id: parse_user_id(&req.approver_id, "approver")?,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}

/// Invite a user into a group
pub async fn invite_to_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<InviteRequestDto>,
) -> ApiResult<(StatusCode, Json<GroupResponseDto>)> {
    let group = state
        .group_service
        .invite_to_group(InviteToGroupRequest {
            invitee_id: parse_user_id(&req.invitee_id, "invitee")?,
            group_id: parse_group_id(&id)?,
            inviter_id: parse_user_id(&req.inviter_id, "inviter")?,
        })
        .await
        .map_err(membership_error)?;

    Ok((StatusCode::CREATED, Json(GroupResponseDto::from(&group))))
}

/// Accept or reject a pending invitation
pub async fn handle_invite_request(
    State(state): State<Arc<AppState>>,
    Path((id, invitee_id)): Path<(String, String)>,
    Json(req): Json<HandleInviteRequestDto>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group = state
        .group_service
        .handle_invite_request(HandleInviteRequestRequest {
            invitee_id: parse_user_id(&invitee_id, "invitee")?,
            inviter_id: parse_user_id(&req.inviter_id, "inviter")?,
            group_id: parse_group_id(&id)?,
            action: req.action,
            approver_id: parse_user_id(&req.approver_id, "approver")?,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}

/// Promote a member to admin
pub async fn add_admin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddAdminRequestDto>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group = state
        .group_service
        .add_admin(AddAdminRequest {
            member_id: parse_user_id(&req.member_id, "member")?,
            group_id: parse_group_id(&id)?,
            promoter_id: parse_user_id(&req.promoter_id, "promoter")?,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}

#[derive(Debug, Deserialize)]
pub struct DeleteAdminQuery {
    pub remover_id: String,
}

/// Demote an admin
pub async fn delete_admin(
    State(state): State<Arc<AppState>>,
    Path((id, admin_id)): Path<(String, String)>,
    Query(query): Query<DeleteAdminQuery>,
) -> ApiResult<Json<GroupResponseDto>> {
    let group = state
        .group_service
        .delete_admin(DeleteAdminRequest {
            admin_id: parse_user_id(&admin_id, "admin")?,
            group_id: parse_group_id(&id)?,
            remover_id: parse_user_id(&query.remover_id, "remover")?,
        })
        .await
        .map_err(membership_error)?;

    Ok(Json(GroupResponseDto::from(&group)))
}
