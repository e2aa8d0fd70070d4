//! Group Aggregate - The root aggregate for a group and its membership
//!
//! A Group Aggregate owns every membership list of a single group: members,
//! admins, pending join requests and pending invitations. All membership
//! changes go through this aggregate so the lists stay mutually consistent,
//! and the whole aggregate is persisted as one unit.
//!
//! The aggregate performs no authorization. Deciding *who* may call a mutator
//! is the job of the permission policy, applied by the membership service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{GroupAdmin, GroupMember, InviteRequest, JoinRequest};
use crate::domain::value_objects::{GroupId, GroupVisibility, UserId};

/// The Group Aggregate Root
///
/// Local invariants maintained by the mutators:
/// - the owner never appears in any list
/// - a user id appears at most once per list
/// - every admin is also a member
/// - a user is never at the same time a member, a pending requester and a
///   pending invitee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    id: GroupId,
    name: String,
    owner_id: UserId,
    visibility: GroupVisibility,
    created_at: DateTime<Utc>,
    /// Number of successful saves, used by stores for compare-and-swap
    #[serde(default)]
    version: u64,
    admins: Vec<GroupAdmin>,
    members: Vec<GroupMember>,
    join_requests: Vec<JoinRequest>,
    invite_requests: Vec<InviteRequest>,
}

impl GroupAggregate {
    /// Create a new, never-persisted group with empty membership lists
    pub fn new(name: impl Into<String>, owner_id: UserId, visibility: GroupVisibility) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            owner_id,
            visibility,
            created_at: Utc::now(),
            version: 0,
            admins: Vec::new(),
            members: Vec::new(),
            join_requests: Vec::new(),
            invite_requests: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn visibility(&self) -> GroupVisibility {
        self.visibility
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn admins(&self) -> &[GroupAdmin] {
        &self.admins
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn join_requests(&self) -> &[JoinRequest] {
        &self.join_requests
    }

    pub fn invite_requests(&self) -> &[InviteRequest] {
        &self.invite_requests
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// True only for promoted admins; the owner is not stored as an admin
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.find_admin(user_id).is_some()
    }

    /// True only for member entries; the owner is not stored as a member
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.find_member(user_id).is_some()
    }

    // ========================================================================
    // Finders
    // ========================================================================

    pub fn find_member(&self, user_id: UserId) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn find_admin(&self, user_id: UserId) -> Option<&GroupAdmin> {
        self.admins.iter().find(|a| a.user_id == user_id)
    }

    pub fn find_join_request(&self, requester_id: UserId) -> Option<&JoinRequest> {
        self.join_requests
            .iter()
            .find(|r| r.requester_id == requester_id)
    }

    pub fn find_invite(&self, invitee_id: UserId) -> Option<&InviteRequest> {
        self.invite_requests
            .iter()
            .find(|r| r.invitee_id == invitee_id)
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Rename the group
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Add a member entry
    ///
    /// The user must not be the owner or an existing member, and must not
    /// have a pending join request or invitation left behind.
    pub fn add_member(
        &mut self,
        user_id: UserId,
        invited_by: Option<UserId>,
        approved_by: Option<UserId>,
    ) -> Result<(), AggregateError> {
        if self.is_owner(user_id) || self.is_member(user_id) {
            return Err(AggregateError::AlreadyMember(user_id));
        }
        if self.find_join_request(user_id).is_some() {
            return Err(AggregateError::JoinRequestExists(user_id));
        }
        if self.find_invite(user_id).is_some() {
            return Err(AggregateError::InvitationExists(user_id));
        }
        self.members.push(GroupMember {
            user_id,
            invited_by,
            approved_by,
            joined_at: Utc::now(),
        });
        Ok(())
    }

    /// Remove a member entry. An admin entry for the same user goes with it.
    pub fn remove_member(&mut self, user_id: UserId) -> Result<GroupMember, AggregateError> {
        let pos = self
            .members
            .iter()
            .position(|m| m.user_id == user_id)
            .ok_or(AggregateError::MemberNotFound(user_id))?;
        self.admins.retain(|a| a.user_id != user_id);
        Ok(self.members.remove(pos))
    }

    /// Promote an existing member to admin
    pub fn add_admin(&mut self, user_id: UserId, promoted_by: UserId) -> Result<(), AggregateError> {
        if self.is_owner(user_id) || self.is_admin(user_id) {
            return Err(AggregateError::AlreadyAdmin(user_id));
        }
        if !self.is_member(user_id) {
            return Err(AggregateError::MemberNotFound(user_id));
        }
        self.admins.push(GroupAdmin {
            user_id,
            promoted_by,
            promoted_at: Utc::now(),
        });
        Ok(())
    }

    /// Demote an admin. Membership is left untouched.
    pub fn remove_admin(&mut self, user_id: UserId) -> Result<GroupAdmin, AggregateError> {
        let pos = self
            .admins
            .iter()
            .position(|a| a.user_id == user_id)
            .ok_or(AggregateError::AdminNotFound(user_id))?;
        Ok(self.admins.remove(pos))
    }

    /// Record a pending join request
    pub fn add_join_request(&mut self, requester_id: UserId) -> Result<(), AggregateError> {
        if self.is_owner(requester_id) || self.is_member(requester_id) {
            return Err(AggregateError::AlreadyMember(requester_id));
        }
        if self.find_join_request(requester_id).is_some() {
            return Err(AggregateError::JoinRequestExists(requester_id));
        }
        if self.find_invite(requester_id).is_some() {
            return Err(AggregateError::InvitationExists(requester_id));
        }
        self.join_requests.push(JoinRequest {
            requester_id,
            requested_at: Utc::now(),
        });
        Ok(())
    }

    /// Drop a pending join request
    pub fn remove_join_request(&mut self, requester_id: UserId) -> Result<JoinRequest, AggregateError> {
        let pos = self
            .join_requests
            .iter()
            .position(|r| r.requester_id == requester_id)
            .ok_or(AggregateError::JoinRequestNotFound(requester_id))?;
        Ok(self.join_requests.remove(pos))
    }

    /// Record a pending invitation
    pub fn add_invite_request(
        &mut self,
        invitee_id: UserId,
        inviter_id: UserId,
    ) -> Result<(), AggregateError> {
        if self.is_owner(invitee_id) || self.is_member(invitee_id) {
            return Err(AggregateError::AlreadyMember(invitee_id));
        }
        if self.find_invite(invitee_id).is_some() {
            return Err(AggregateError::InvitationExists(invitee_id));
        }
        if self.find_join_request(invitee_id).is_some() {
            return Err(AggregateError::JoinRequestExists(invitee_id));
        }
        self.invite_requests.push(InviteRequest {
            invitee_id,
            inviter_id,
            invited_at: Utc::now(),
        });
        Ok(())
    }

    /// Drop a pending invitation
    pub fn remove_invite(&mut self, invitee_id: UserId) -> Result<InviteRequest, AggregateError> {
        let pos = self
            .invite_requests
            .iter()
            .position(|r| r.invitee_id == invitee_id)
            .ok_or(AggregateError::InvitationNotFound(invitee_id))?;
        Ok(self.invite_requests.remove(pos))
    }

    // ========================================================================
    // Persistence bookkeeping
    // ========================================================================

    /// Record that the store accepted a save of this aggregate
    pub fn mark_saved(&mut self) {
        self.version += 1;
    }
}

/// Errors that can occur when modifying the aggregate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("User {0} is already a member")]
    AlreadyMember(UserId),
    #[error("User {0} is not a member")]
    MemberNotFound(UserId),
    #[error("User {0} is already an admin")]
    AlreadyAdmin(UserId),
    #[error("User {0} is not an admin")]
    AdminNotFound(UserId),
    #[error("User {0} already has a pending join request")]
    JoinRequestExists(UserId),
    #[error("No pending join request from user {0}")]
    JoinRequestNotFound(UserId),
    #[error("User {0} already has a pending invitation")]
    InvitationExists(UserId),
    #[error("No pending invitation for user {0}")]
    InvitationNotFound(UserId),
}
