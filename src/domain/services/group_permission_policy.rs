//! Group permission policy - who may act on a group
//!
//! Pure functions over the aggregate. Join eligibility is not decided here:
//! it depends only on the group's visibility, not on the actor's role.

use crate::domain::aggregates::GroupAggregate;
use crate::domain::value_objects::UserId;

/// Role an actor holds within one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupRole {
    Outsider,
    Member,
    Admin,
    Owner,
}

/// Resolve the highest role `actor_id` holds in `group`
pub fn role_of(group: &GroupAggregate, actor_id: UserId) -> GroupRole {
    if group.is_owner(actor_id) {
        GroupRole::Owner
    } else if group.is_admin(actor_id) {
        GroupRole::Admin
    } else if group.is_member(actor_id) {
        GroupRole::Member
    } else {
        GroupRole::Outsider
    }
}

/// Owner or admin: may approve requests and invitations
pub fn can_approve(group: &GroupAggregate, actor_id: UserId) -> bool {
    role_of(group, actor_id) >= GroupRole::Admin
}

/// Owner, admin or any member: may invite others
pub fn can_invite(group: &GroupAggregate, actor_id: UserId) -> bool {
    role_of(group, actor_id) >= GroupRole::Member
}

/// Owner or admin: may promote and demote admins
pub fn can_manage_admins(group: &GroupAggregate, actor_id: UserId) -> bool {
    can_approve(group, actor_id)
}

/// Owner or admin: may edit group details
pub fn can_edit_details(group: &GroupAggregate, actor_id: UserId) -> bool {
    can_approve(group, actor_id)
}

/// Owner only
pub fn can_delete(group: &GroupAggregate, actor_id: UserId) -> bool {
    role_of(group, actor_id) == GroupRole::Owner
}
