//! Domain entities - Core business objects with identity

mod membership;
mod user;

pub use membership::{GroupAdmin, GroupMember, InviteRequest, JoinRequest};
pub use user::User;
