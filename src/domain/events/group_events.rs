//! Group events - Notifications of membership changes
//!
//! Emitted by the membership service after an aggregate save succeeds, so
//! subscribers only ever observe changes that were persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{GroupId, GroupVisibility, RequestAction, UserId};

/// A persisted change to a group, with the time it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEvent {
    pub group_id: GroupId,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: GroupEventKind,
}

impl GroupEvent {
    pub fn new(group_id: GroupId, kind: GroupEventKind) -> Self {
        Self {
            group_id,
            occurred_at: Utc::now(),
            kind,
        }
    }

    /// Short machine-readable name, used in log lines
    pub fn name(&self) -> &'static str {
        match self.kind {
            GroupEventKind::GroupCreated { .. } => "group_created",
            GroupEventKind::GroupRenamed { .. } => "group_renamed",
            GroupEventKind::GroupDeleted { .. } => "group_deleted",
            GroupEventKind::MemberJoined { .. } => "member_joined",
            GroupEventKind::MemberLeft { .. } => "member_left",
            GroupEventKind::JoinRequested { .. } => "join_requested",
            GroupEventKind::JoinRequestHandled { .. } => "join_request_handled",
            GroupEventKind::MemberInvited { .. } => "member_invited",
            GroupEventKind::InvitationHandled { .. } => "invitation_handled",
            GroupEventKind::AdminAdded { .. } => "admin_added",
            GroupEventKind::AdminRemoved { .. } => "admin_removed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GroupEventKind {
    GroupCreated {
        owner_id: UserId,
        name: String,
        visibility: GroupVisibility,
    },
    GroupRenamed {
        renamed_by: UserId,
        name: String,
    },
    GroupDeleted {
        deleted_by: UserId,
    },
    /// A user became a member without a pending request being handled
    MemberJoined {
        user_id: UserId,
        invited_by: Option<UserId>,
    },
    MemberLeft {
        user_id: UserId,
    },
    JoinRequested {
        requester_id: UserId,
    },
    JoinRequestHandled {
        requester_id: UserId,
        approver_id: UserId,
        action: RequestAction,
    },
    MemberInvited {
        invitee_id: UserId,
        inviter_id: UserId,
    },
    InvitationHandled {
        invitee_id: UserId,
        inviter_id: UserId,
        approver_id: UserId,
        action: RequestAction,
    },
    AdminAdded {
        user_id: UserId,
        promoted_by: UserId,
    },
    AdminRemoved {
        user_id: UserId,
        removed_by: UserId,
    },
}
