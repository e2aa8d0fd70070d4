use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::GroupAggregate;
use crate::domain::entities::{GroupAdmin, GroupMember, InviteRequest, JoinRequest};
use crate::domain::value_objects::{GroupVisibility, RequestAction};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request to create a group
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequestDto {
    pub name: String,
    pub owner_id: String,
    #[serde(default = "default_visibility")]
    pub visibility: GroupVisibility,
}

fn default_visibility() -> GroupVisibility {
    GroupVisibility::Public
}

/// Request to rename a group
#[derive(Debug, Deserialize)]
pub struct RenameGroupRequestDto {
    pub actor_id: String,
    pub name: String,
}

/// Request body naming the acting user only
#[derive(Debug, Deserialize)]
pub struct UserActionRequestDto {
    pub user_id: String,
}

/// Decision on a pending join request
#[derive(Debug, Deserialize)]
pub struct HandleJoinRequestDto {
    pub approver_id: String,
    pub action: RequestAction,
}

/// Invitation of a user by a member
#[derive(Debug, Deserialize)]
pub struct InviteRequestDto {
    pub invitee_id: String,
    pub inviter_id: String,
}

/// Decision on a pending invitation
#[derive(Debug, Deserialize)]
pub struct HandleInviteRequestDto {
    pub inviter_id: String,
    pub approver_id: String,
    pub action: RequestAction,
}

/// Promotion of a member to admin
#[derive(Debug, Deserialize)]
pub struct AddAdminRequestDto {
    pub member_id: String,
    pub promoter_id: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GroupAdminResponseDto {
    pub user_id: String,
    pub promoted_by: String,
    pub promoted_at: DateTime<Utc>,
}

impl From<&GroupAdmin> for GroupAdminResponseDto {
    fn from(admin: &GroupAdmin) -> Self {
        Self {
            user_id: admin.user_id.to_string(),
            promoted_by: admin.promoted_by.to_string(),
            promoted_at: admin.promoted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupMemberResponseDto {
    pub user_id: String,
    pub invited_by: Option<String>,
    pub approved_by: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl From<&GroupMember> for GroupMemberResponseDto {
    fn from(member: &GroupMember) -> Self {
        Self {
            user_id: member.user_id.to_string(),
            invited_by: member.invited_by.map(|id| id.to_string()),
            approved_by: member.approved_by.map(|id| id.to_string()),
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JoinRequestResponseDto {
    pub requester_id: String,
    pub requested_at: DateTime<Utc>,
}

impl From<&JoinRequest> for JoinRequestResponseDto {
    fn from(request: &JoinRequest) -> Self {
        Self {
            requester_id: request.requester_id.to_string(),
            requested_at: request.requested_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InviteResponseDto {
    pub invitee_id: String,
    pub inviter_id: String,
    pub invited_at: DateTime<Utc>,
}

impl From<&InviteRequest> for InviteResponseDto {
    fn from(invite: &InviteRequest) -> Self {
        Self {
            invitee_id: invite.invitee_id.to_string(),
            inviter_id: invite.inviter_id.to_string(),
            invited_at: invite.invited_at,
        }
    }
}

/// Full view of a group as returned by the API
#[derive(Debug, Serialize)]
pub struct GroupResponseDto {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub visibility: GroupVisibility,
    pub created_at: DateTime<Utc>,
    pub version: u64,
    pub admins: Vec<GroupAdminResponseDto>,
    pub members: Vec<GroupMemberResponseDto>,
    pub join_requests: Vec<JoinRequestResponseDto>,
    pub invite_requests: Vec<InviteResponseDto>,
}

impl From<&GroupAggregate> for GroupResponseDto {
    fn from(group: &GroupAggregate) -> Self {
        Self {
            id: group.id().to_string(),
            name: group.name().to_string(),
            owner_id: group.owner_id().to_string(),
            visibility: group.visibility(),
            created_at: group.created_at(),
            version: group.version(),
            admins: group.admins().iter().map(Into::into).collect(),
            members: group.members().iter().map(Into::into).collect(),
            join_requests: group.join_requests().iter().map(Into::into).collect(),
            invite_requests: group.invite_requests().iter().map(Into::into).collect(),
        }
    }
}

/// Result of a join attempt
#[derive(Debug, Serialize)]
pub struct JoinGroupResponseDto {
    /// "joined", "requested" or "already_requested"
    pub outcome: &'static str,
    pub group: GroupResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UserId;

    #[test]
    fn test_group_response_lists_every_collection() {
        let owner = UserId::new();
        let member = UserId::new();
        let mut group = GroupAggregate::new("Readers", owner, GroupVisibility::InviteOnly);
        group.add_member(member, Some(owner), Some(owner)).unwrap();
        group.add_admin(member, owner).unwrap();
        group.add_invite_request(UserId::new(), member).unwrap();

        let dto = GroupResponseDto::from(&group);
        assert_eq!(dto.owner_id, owner.to_string());
        assert_eq!(dto.members.len(), 1);
        assert_eq!(dto.members[0].invited_by, Some(owner.to_string()));
        assert_eq!(dto.admins.len(), 1);
        assert_eq!(dto.invite_requests.len(), 1);
        assert!(dto.join_requests.is_empty());

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["visibility"], "INVITE_ONLY");
    }

    #[test]
    fn test_handle_request_dto_parses_action() {
        let dto: HandleJoinRequestDto =
            serde_json::from_str(r#"{"approver_id":"x","action":"ACCEPT"}"#).unwrap();
        assert_eq!(dto.action, RequestAction::Accept);
    }

    #[test]
    fn test_create_group_dto_accepts_legacy_visibility() {
        let dto: CreateGroupRequestDto =
            serde_json::from_str(r#"{"name":"Quiet","owner_id":"x","visibility":"PRIVATE"}"#)
                .unwrap();
        assert_eq!(dto.visibility, GroupVisibility::InviteOnly);

        let dto: CreateGroupRequestDto =
            serde_json::from_str(r#"{"name":"Quiet","owner_id":"x"}"#).unwrap();
        assert_eq!(dto.visibility, GroupVisibility::Public);
    }
}
