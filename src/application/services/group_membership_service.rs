//! Group Membership Service - Application service for group membership lifecycle
//!
//! Implements the group use cases: creating a group, joining it, handling
//! join requests, inviting users and handling invitations, promoting and
//! demoting admins, plus renaming, leaving and deleting.
//!
//! Every operation follows the same order:
//! 1. resolve every referenced user, then the group
//! 2. check the actor's permission with the group permission policy
//! 3. check the operation's precondition on the aggregate
//! 4. mutate the aggregate in memory and save it as one unit
//!
//! Any failure returns before the save, so a failed operation never persists
//! a partial change and can be retried as a whole.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::{
    GroupEventPublisherPort, GroupStoreError, GroupStorePort, UserLookupError, UserLookupPort,
};
use crate::domain::aggregates::{AggregateError, GroupAggregate};
use crate::domain::entities::User;
use crate::domain::events::{GroupEvent, GroupEventKind};
use crate::domain::services::group_permission_policy as policy;
use crate::domain::value_objects::{GroupId, GroupVisibility, RequestAction, UserId};

/// Longest accepted group name, in characters
pub const MAX_GROUP_NAME_LENGTH: usize = 100;

// ============================================================================
// Requests
// ============================================================================

/// Request to create a new group
#[derive(Debug, Clone)]
pub struct CreateGroupRequest {
    pub name: String,
    pub owner_id: UserId,
    pub visibility: GroupVisibility,
}

/// Request from a user to join a group
#[derive(Debug, Clone, Copy)]
pub struct JoinGroupRequest {
    pub user_id: UserId,
    pub group_id: GroupId,
}

/// Decision on a pending join request
#[derive(Debug, Clone, Copy)]
pub struct HandleJoinRequestRequest {
    pub requester_id: UserId,
    pub group_id: GroupId,
    pub action: RequestAction,
    pub approver_id: UserId,
}

/// Invitation of a non-member by a member
#[derive(Debug, Clone, Copy)]
pub struct InviteToGroupRequest {
    pub invitee_id: UserId,
    pub group_id: GroupId,
    pub inviter_id: UserId,
}

/// Decision on a pending invitation
#[derive(Debug, Clone, Copy)]
pub struct HandleInviteRequestRequest {
    pub invitee_id: UserId,
    pub inviter_id: UserId,
    pub group_id: GroupId,
    pub action: RequestAction,
    pub approver_id: UserId,
}

/// Promotion of a member to admin
#[derive(Debug, Clone, Copy)]
pub struct AddAdminRequest {
    pub member_id: UserId,
    pub group_id: GroupId,
    pub promoter_id: UserId,
}

/// Demotion of an admin back to plain member
#[derive(Debug, Clone, Copy)]
pub struct DeleteAdminRequest {
    pub admin_id: UserId,
    pub group_id: GroupId,
    pub remover_id: UserId,
}

/// Request to rename a group
#[derive(Debug, Clone)]
pub struct RenameGroupRequest {
    pub group_id: GroupId,
    pub actor_id: UserId,
    pub name: String,
}

/// Request from a member to leave a group
#[derive(Debug, Clone, Copy)]
pub struct LeaveGroupRequest {
    pub user_id: UserId,
    pub group_id: GroupId,
}

/// Request to delete a group
#[derive(Debug, Clone, Copy)]
pub struct DeleteGroupRequest {
    pub group_id: GroupId,
    pub actor_id: UserId,
}

// ============================================================================
// Results
// ============================================================================

/// What a join attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user is now a member
    Joined,
    /// A join request is now pending approval
    Requested,
    /// A join request was already pending; nothing changed
    AlreadyRequested,
}

impl JoinOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinOutcome::Joined => "joined",
            JoinOutcome::Requested => "requested",
            JoinOutcome::AlreadyRequested => "already_requested",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JoinGroupResponse {
    pub outcome: JoinOutcome,
    pub group: GroupAggregate,
}

// ============================================================================
// Errors
// ============================================================================

/// Coarse classification adapters use to pick a transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Authorization,
    StateConflict,
    Validation,
    Infrastructure,
}

/// Every failure a group operation can report
#[derive(Debug, thiserror::Error)]
pub enum GroupMembershipError {
    // Not found
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("Group owner not found: {0}")]
    OwnerNotFound(UserId),
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    // Authorization
    #[error("User {0} does not have permission to approve requests for this group")]
    ApproverHasNoPermission(UserId),
    #[error("User {0} is neither the group owner nor an admin")]
    NotGroupOwnerOrAdmin(UserId),
    #[error("User {0} is not the group owner")]
    NotGroupOwner(UserId),
    #[error("Inviter {0} is not a member of the group")]
    InviterIsNotMember(UserId),

    // State conflicts
    #[error("User {0} is already an admin")]
    AlreadyAdmin(UserId),
    #[error("User {0} is not an admin")]
    AdminNotFound(UserId),
    #[error("User {0} is not a member of the group")]
    NotGroupMember(UserId),
    #[error("Invitee {0} is already a member of the group")]
    InviteeIsAlreadyMember(UserId),
    #[error("Invitee {0} has already been invited")]
    InviteeIsAlreadyInvited(UserId),
    #[error("Invitee {0} already has a pending join request")]
    InviteeHasPendingJoinRequest(UserId),
    #[error("No pending join request from user {0}")]
    JoinRequestNotFound(UserId),
    #[error("No pending invitation for user {0}")]
    InvitationNotFound(UserId),
    #[error("Group {0} is invite-only and cannot be joined directly")]
    CannotJoinInviteOnlyGroup(GroupId),
    #[error("User {0} is already a member of the group")]
    UserIsAlreadyMember(UserId),
    #[error("User {0} has a pending invitation that must be handled instead")]
    PendingInvitationExists(UserId),
    #[error("The group owner cannot leave the group")]
    OwnerCannotLeaveGroup,

    // Validation
    #[error("Invalid group name: {0}")]
    InvalidGroupName(String),

    // Infrastructure
    #[error("User lookup failed: {0}")]
    UserLookup(#[from] UserLookupError),
    #[error("Group store failed: {0}")]
    Store(#[from] GroupStoreError),
}

impl GroupMembershipError {
    pub fn kind(&self) -> ErrorKind {
        use GroupMembershipError::*;
        match self {
            UserNotFound(_) | OwnerNotFound(_) | GroupNotFound(_) => ErrorKind::NotFound,
            ApproverHasNoPermission(_)
            | NotGroupOwnerOrAdmin(_)
            | NotGroupOwner(_)
            | InviterIsNotMember(_) => ErrorKind::Authorization,
            AlreadyAdmin(_)
            | AdminNotFound(_)
            | NotGroupMember(_)
            | InviteeIsAlreadyMember(_)
            | InviteeIsAlreadyInvited(_)
            | InviteeHasPendingJoinRequest(_)
            | JoinRequestNotFound(_)
            | InvitationNotFound(_)
            | CannotJoinInviteOnlyGroup(_)
            | UserIsAlreadyMember(_)
            | PendingInvitationExists(_)
            | OwnerCannotLeaveGroup => ErrorKind::StateConflict,
            InvalidGroupName(_) => ErrorKind::Validation,
            UserLookup(_) | Store(_) => ErrorKind::Infrastructure,
        }
    }

    /// Stable upper-case code for API clients
    pub fn code(&self) -> &'static str {
        use GroupMembershipError::*;
        match self {
            UserNotFound(_) => "USER_NOT_FOUND",
            OwnerNotFound(_) => "OWNER_NOT_FOUND",
            GroupNotFound(_) => "GROUP_NOT_FOUND",
            ApproverHasNoPermission(_) => "APPROVER_HAS_NO_PERMISSION",
            NotGroupOwnerOrAdmin(_) => "NOT_GROUP_OWNER_OR_ADMIN",
            NotGroupOwner(_) => "NOT_GROUP_OWNER",
            InviterIsNotMember(_) => "INVITER_IS_NOT_MEMBER",
            AlreadyAdmin(_) => "ALREADY_ADMIN",
            AdminNotFound(_) => "ADMIN_NOT_FOUND",
            NotGroupMember(_) => "NOT_GROUP_MEMBER",
            InviteeIsAlreadyMember(_) => "INVITEE_IS_ALREADY_MEMBER",
            InviteeIsAlreadyInvited(_) => "INVITEE_IS_ALREADY_INVITED",
            InviteeHasPendingJoinRequest(_) => "INVITEE_HAS_PENDING_JOIN_REQUEST",
            JoinRequestNotFound(_) => "JOIN_REQUEST_NOT_FOUND",
            InvitationNotFound(_) => "INVITATION_NOT_FOUND",
            CannotJoinInviteOnlyGroup(_) => "CANNOT_JOIN_INVITE_ONLY_GROUP",
            UserIsAlreadyMember(_) => "USER_IS_ALREADY_MEMBER",
            PendingInvitationExists(_) => "PENDING_INVITATION_EXISTS",
            OwnerCannotLeaveGroup => "OWNER_CANNOT_LEAVE_GROUP",
            InvalidGroupName(_) => "INVALID_GROUP_NAME",
            UserLookup(_) => "USER_LOOKUP_FAILED",
            Store(GroupStoreError::Conflict { .. }) => "CONCURRENT_MODIFICATION",
            Store(_) => "GROUP_STORE_FAILED",
        }
    }

    /// Whether retrying the whole operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, GroupMembershipError::Store(GroupStoreError::Conflict { .. }))
    }
}

impl From<AggregateError> for GroupMembershipError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::AlreadyMember(id) => GroupMembershipError::UserIsAlreadyMember(id),
            AggregateError::MemberNotFound(id) => GroupMembershipError::NotGroupMember(id),
            AggregateError::AlreadyAdmin(id) => GroupMembershipError::AlreadyAdmin(id),
            AggregateError::AdminNotFound(id) => GroupMembershipError::AdminNotFound(id),
            AggregateError::JoinRequestExists(id) => {
                GroupMembershipError::InviteeHasPendingJoinRequest(id)
            }
            AggregateError::JoinRequestNotFound(id) => GroupMembershipError::JoinRequestNotFound(id),
            AggregateError::InvitationExists(id) => GroupMembershipError::PendingInvitationExists(id),
            AggregateError::InvitationNotFound(id) => GroupMembershipError::InvitationNotFound(id),
        }
    }
}

pub type MembershipResult<T> = Result<T, GroupMembershipError>;

// ============================================================================
// Service
// ============================================================================

/// Group membership service trait defining the application use cases
#[async_trait]
pub trait GroupMembershipService: Send + Sync {
    async fn create_group(&self, request: CreateGroupRequest) -> MembershipResult<GroupAggregate>;

    async fn get_group(&self, group_id: GroupId) -> MembershipResult<GroupAggregate>;

    async fn join_group(&self, request: JoinGroupRequest) -> MembershipResult<JoinGroupResponse>;

    async fn handle_join_request(
        &self,
        request: HandleJoinRequestRequest,
    ) -> MembershipResult<GroupAggregate>;

    async fn invite_to_group(&self, request: InviteToGroupRequest)
        -> MembershipResult<GroupAggregate>;

    async fn handle_invite_request(
        &self,
        request: HandleInviteRequestRequest,
    ) -> MembershipResult<GroupAggregate>;

    async fn add_admin(&self, request: AddAdminRequest) -> MembershipResult<GroupAggregate>;

    async fn delete_admin(&self, request: DeleteAdminRequest) -> MembershipResult<GroupAggregate>;

    async fn rename_group(&self, request: RenameGroupRequest) -> MembershipResult<GroupAggregate>;

    async fn leave_group(&self, request: LeaveGroupRequest) -> MembershipResult<GroupAggregate>;

    async fn delete_group(&self, request: DeleteGroupRequest) -> MembershipResult<()>;
}

/// Default implementation of GroupMembershipService over the outbound ports
#[derive(Clone)]
pub struct GroupMembershipServiceImpl {
    users: Arc<dyn UserLookupPort>,
    groups: Arc<dyn GroupStorePort>,
    events: Arc<dyn GroupEventPublisherPort>,
}

impl GroupMembershipServiceImpl {
    pub fn new(
        users: Arc<dyn UserLookupPort>,
        groups: Arc<dyn GroupStorePort>,
        events: Arc<dyn GroupEventPublisherPort>,
    ) -> Self {
        Self {
            users,
            groups,
            events,
        }
    }

    /// Trim and validate a group name
    fn validate_name(name: &str) -> MembershipResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupMembershipError::InvalidGroupName(
                "Group name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_GROUP_NAME_LENGTH {
            return Err(GroupMembershipError::InvalidGroupName(format!(
                "Group name cannot exceed {} characters",
                MAX_GROUP_NAME_LENGTH
            )));
        }
        Ok(name.to_string())
    }

    async fn require_user(&self, id: UserId) -> MembershipResult<User> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(GroupMembershipError::UserNotFound(id))
    }

    async fn require_group(&self, id: GroupId) -> MembershipResult<GroupAggregate> {
        self.groups
            .get_by_id(id)
            .await?
            .ok_or(GroupMembershipError::GroupNotFound(id))
    }

    /// Save the aggregate, then announce what changed
    async fn persist(
        &self,
        group: &mut GroupAggregate,
        event: GroupEventKind,
    ) -> MembershipResult<()> {
        self.groups.save(group).await.map_err(|e| {
            error!(group_id = %group.id(), error = %e, "Failed to save group");
            e
        })?;
        group.mark_saved();

        let event = GroupEvent::new(group.id(), event);
        debug!(group_id = %group.id(), event = event.name(), "Publishing group event");
        self.events.publish(event);
        Ok(())
    }

    /// Log a rejected operation at warn level and hand the error back
    fn reject(err: GroupMembershipError) -> GroupMembershipError {
        warn!(code = err.code(), "Group operation rejected: {}", err);
        err
    }
}

#[async_trait]
impl GroupMembershipService for GroupMembershipServiceImpl {
    #[instrument(skip(self), fields(owner_id = %request.owner_id))]
    async fn create_group(&self, request: CreateGroupRequest) -> MembershipResult<GroupAggregate> {
        self.users
            .get_by_id(request.owner_id)
            .await?
            .ok_or_else(|| Self::reject(GroupMembershipError::OwnerNotFound(request.owner_id)))?;
        let name = Self::validate_name(&request.name).map_err(Self::reject)?;

        let mut group = GroupAggregate::new(name, request.owner_id, request.visibility);
        let event = GroupEventKind::GroupCreated {
            owner_id: request.owner_id,
            name: group.name().to_string(),
            visibility: group.visibility(),
        };
        self.persist(&mut group, event).await?;

        info!(group_id = %group.id(), visibility = %group.visibility(), "Created group: {}", group.name());
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn get_group(&self, group_id: GroupId) -> MembershipResult<GroupAggregate> {
        debug!(group_id = %group_id, "Fetching group");
        self.require_group(group_id).await
    }

    #[instrument(skip(self))]
    async fn join_group(&self, request: JoinGroupRequest) -> MembershipResult<JoinGroupResponse> {
        let user = self.require_user(request.user_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if group.is_owner(user.id) || group.is_member(user.id) {
            return Err(Self::reject(GroupMembershipError::UserIsAlreadyMember(user.id)));
        }

        let outcome = match group.visibility() {
            GroupVisibility::Public => {
                // A pending invitation is consumed by the direct join
                let invited_by = match group.find_invite(user.id).map(|i| i.inviter_id) {
                    Some(inviter_id) => {
                        group.remove_invite(user.id)?;
                        Some(inviter_id)
                    }
                    None => None,
                };
                if group.find_join_request(user.id).is_some() {
                    group.remove_join_request(user.id)?;
                }
                group.add_member(user.id, invited_by, None)?;
                self.persist(
                    &mut group,
                    GroupEventKind::MemberJoined {
                        user_id: user.id,
                        invited_by,
                    },
                )
                .await?;
                info!(group_id = %group.id(), user_id = %user.id, "User joined public group");
                JoinOutcome::Joined
            }
            GroupVisibility::RequestRequired => {
                if group.find_join_request(user.id).is_some() {
                    debug!(group_id = %group.id(), user_id = %user.id, "Join request already pending");
                    return Ok(JoinGroupResponse {
                        outcome: JoinOutcome::AlreadyRequested,
                        group,
                    });
                }
                if group.find_invite(user.id).is_some() {
                    return Err(Self::reject(GroupMembershipError::PendingInvitationExists(
                        user.id,
                    )));
                }
                group.add_join_request(user.id)?;
                self.persist(
                    &mut group,
                    GroupEventKind::JoinRequested {
                        requester_id: user.id,
                    },
                )
                .await?;
                info!(group_id = %group.id(), user_id = %user.id, "Join request submitted");
                JoinOutcome::Requested
            }
            GroupVisibility::InviteOnly => {
                return Err(Self::reject(GroupMembershipError::CannotJoinInviteOnlyGroup(
                    group.id(),
                )));
            }
        };

        Ok(JoinGroupResponse { outcome, group })
    }

    #[instrument(skip(self))]
    async fn handle_join_request(
        &self,
        request: HandleJoinRequestRequest,
    ) -> MembershipResult<GroupAggregate> {
        let requester = self.require_user(request.requester_id).await.map_err(Self::reject)?;
        let approver = self.require_user(request.approver_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_approve(&group, approver.id) {
            return Err(Self::reject(GroupMembershipError::ApproverHasNoPermission(
                approver.id,
            )));
        }
        if group.find_join_request(requester.id).is_none() {
            return Err(Self::reject(GroupMembershipError::JoinRequestNotFound(
                requester.id,
            )));
        }

        group.remove_join_request(requester.id)?;
        if request.action.is_accept() {
            group.add_member(requester.id, None, Some(approver.id))?;
        }
        self.persist(
            &mut group,
            GroupEventKind::JoinRequestHandled {
                requester_id: requester.id,
                approver_id: approver.id,
                action: request.action,
            },
        )
        .await?;

        info!(
            group_id = %group.id(),
            requester_id = %requester.id,
            approver_id = %approver.id,
            action = %request.action,
            "Handled join request"
        );
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn invite_to_group(
        &self,
        request: InviteToGroupRequest,
    ) -> MembershipResult<GroupAggregate> {
        let invitee = self.require_user(request.invitee_id).await.map_err(Self::reject)?;
        let inviter = self.require_user(request.inviter_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_invite(&group, inviter.id) {
            return Err(Self::reject(GroupMembershipError::InviterIsNotMember(inviter.id)));
        }
        if group.is_owner(invitee.id) || group.is_member(invitee.id) {
            return Err(Self::reject(GroupMembershipError::InviteeIsAlreadyMember(
                invitee.id,
            )));
        }
        if group.find_invite(invitee.id).is_some() {
            return Err(Self::reject(GroupMembershipError::InviteeIsAlreadyInvited(
                invitee.id,
            )));
        }
        if group.find_join_request(invitee.id).is_some() {
            return Err(Self::reject(
                GroupMembershipError::InviteeHasPendingJoinRequest(invitee.id),
            ));
        }

        group.add_invite_request(invitee.id, inviter.id)?;
        self.persist(
            &mut group,
            GroupEventKind::MemberInvited {
                invitee_id: invitee.id,
                inviter_id: inviter.id,
            },
        )
        .await?;

        info!(group_id = %group.id(), invitee_id = %invitee.id, inviter_id = %inviter.id, "Invited user to group");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn handle_invite_request(
        &self,
        request: HandleInviteRequestRequest,
    ) -> MembershipResult<GroupAggregate> {
        let invitee = self.require_user(request.invitee_id).await.map_err(Self::reject)?;
        let inviter = self.require_user(request.inviter_id).await.map_err(Self::reject)?;
        let approver = self.require_user(request.approver_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_approve(&group, approver.id) {
            return Err(Self::reject(GroupMembershipError::ApproverHasNoPermission(
                approver.id,
            )));
        }
        match group.find_invite(invitee.id) {
            Some(invite) if invite.inviter_id == inviter.id => {}
            _ => {
                return Err(Self::reject(GroupMembershipError::InvitationNotFound(
                    invitee.id,
                )))
            }
        }

        group.remove_invite(invitee.id)?;
        if request.action.is_accept() {
            group.add_member(invitee.id, Some(inviter.id), Some(approver.id))?;
        }
        self.persist(
            &mut group,
            GroupEventKind::InvitationHandled {
                invitee_id: invitee.id,
                inviter_id: inviter.id,
                approver_id: approver.id,
                action: request.action,
            },
        )
        .await?;

        info!(
            group_id = %group.id(),
            invitee_id = %invitee.id,
            approver_id = %approver.id,
            action = %request.action,
            "Handled invitation"
        );
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn add_admin(&self, request: AddAdminRequest) -> MembershipResult<GroupAggregate> {
        let member = self.require_user(request.member_id).await.map_err(Self::reject)?;
        let promoter = self.require_user(request.promoter_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_manage_admins(&group, promoter.id) {
            return Err(Self::reject(GroupMembershipError::NotGroupOwnerOrAdmin(
                promoter.id,
            )));
        }
        if group.is_owner(member.id) || group.is_admin(member.id) {
            return Err(Self::reject(GroupMembershipError::AlreadyAdmin(member.id)));
        }
        if !group.is_member(member.id) {
            return Err(Self::reject(GroupMembershipError::NotGroupMember(member.id)));
        }

        group.add_admin(member.id, promoter.id)?;
        self.persist(
            &mut group,
            GroupEventKind::AdminAdded {
                user_id: member.id,
                promoted_by: promoter.id,
            },
        )
        .await?;

        info!(group_id = %group.id(), member_id = %member.id, promoter_id = %promoter.id, "Promoted member to admin");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn delete_admin(&self, request: DeleteAdminRequest) -> MembershipResult<GroupAggregate> {
        let admin = self.require_user(request.admin_id).await.map_err(Self::reject)?;
        let remover = self.require_user(request.remover_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_manage_admins(&group, remover.id) {
            return Err(Self::reject(GroupMembershipError::NotGroupOwnerOrAdmin(
                remover.id,
            )));
        }
        if !group.is_admin(admin.id) {
            return Err(Self::reject(GroupMembershipError::AdminNotFound(admin.id)));
        }

        group.remove_admin(admin.id)?;
        self.persist(
            &mut group,
            GroupEventKind::AdminRemoved {
                user_id: admin.id,
                removed_by: remover.id,
            },
        )
        .await?;

        info!(group_id = %group.id(), admin_id = %admin.id, remover_id = %remover.id, "Demoted admin");
        Ok(group)
    }

    #[instrument(skip(self), fields(group_id = %request.group_id))]
    async fn rename_group(&self, request: RenameGroupRequest) -> MembershipResult<GroupAggregate> {
        let actor = self.require_user(request.actor_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_edit_details(&group, actor.id) {
            return Err(Self::reject(GroupMembershipError::NotGroupOwnerOrAdmin(actor.id)));
        }
        let name = Self::validate_name(&request.name).map_err(Self::reject)?;

        group.rename(name);
        let event = GroupEventKind::GroupRenamed {
            renamed_by: actor.id,
            name: group.name().to_string(),
        };
        self.persist(&mut group, event).await?;

        info!(group_id = %group.id(), "Renamed group to: {}", group.name());
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn leave_group(&self, request: LeaveGroupRequest) -> MembershipResult<GroupAggregate> {
        let user = self.require_user(request.user_id).await.map_err(Self::reject)?;
        let mut group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if group.is_owner(user.id) {
            return Err(Self::reject(GroupMembershipError::OwnerCannotLeaveGroup));
        }
        if !group.is_member(user.id) {
            return Err(Self::reject(GroupMembershipError::NotGroupMember(user.id)));
        }

        group.remove_member(user.id)?;
        self.persist(&mut group, GroupEventKind::MemberLeft { user_id: user.id })
            .await?;

        info!(group_id = %group.id(), user_id = %user.id, "User left group");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, request: DeleteGroupRequest) -> MembershipResult<()> {
        let actor = self.require_user(request.actor_id).await.map_err(Self::reject)?;
        let group = self.require_group(request.group_id).await.map_err(Self::reject)?;

        if !policy::can_delete(&group, actor.id) {
            return Err(Self::reject(GroupMembershipError::NotGroupOwner(actor.id)));
        }

        if !self.groups.delete(group.id()).await? {
            return Err(Self::reject(GroupMembershipError::GroupNotFound(group.id())));
        }
        self.events.publish(GroupEvent::new(
            group.id(),
            GroupEventKind::GroupDeleted {
                deleted_by: actor.id,
            },
        ));

        info!(group_id = %group.id(), "Deleted group: {}", group.name());
        Ok(())
    }
}
