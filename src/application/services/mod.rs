//! Application services - Use case implementations
//!
//! Services depend on outbound ports only and return domain aggregates;
//! adapters map them to DTOs.

pub mod group_membership_service;

pub use group_membership_service::{
    AddAdminRequest, CreateGroupRequest, DeleteAdminRequest, DeleteGroupRequest, ErrorKind,
    GroupMembershipError, GroupMembershipService, GroupMembershipServiceImpl,
    HandleInviteRequestRequest, HandleJoinRequestRequest, InviteToGroupRequest, JoinGroupRequest,
    JoinGroupResponse, JoinOutcome, LeaveGroupRequest, MembershipResult, RenameGroupRequest,
};
