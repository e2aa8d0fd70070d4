//! Domain services - Pure business rules spanning an aggregate

pub mod group_permission_policy;

pub use group_permission_policy::{
    can_approve, can_delete, can_edit_details, can_invite, can_manage_admins, role_of, GroupRole,
};
