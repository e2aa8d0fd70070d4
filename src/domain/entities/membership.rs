//! Membership entries held by the group aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::UserId;

/// A member promoted to admin. The promoter is always the owner or another admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAdmin {
    pub user_id: UserId,
    pub promoted_by: UserId,
    pub promoted_at: DateTime<Utc>,
}

/// A group member.
///
/// `invited_by` is set when the user came in through an invitation and is
/// `None` when they joined on their own. `approved_by` is `None` only for
/// direct joins into a public group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    pub invited_by: Option<UserId>,
    pub approved_by: Option<UserId>,
    pub joined_at: DateTime<Utc>,
}

/// A pending request from a non-member to join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub requester_id: UserId,
    pub requested_at: DateTime<Utc>,
}

/// A pending invitation awaiting approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRequest {
    pub invitee_id: UserId,
    pub inviter_id: UserId,
    pub invited_at: DateTime<Utc>,
}
