//! Chat command decoding for bot adapters
//!
//! A bot forwards slash commands as `{ name, invoker_id, options }`. Each
//! supported command becomes one membership operation with the invoker as the
//! acting user.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::services::{
    AddAdminRequest, CreateGroupRequest, DeleteAdminRequest, GroupMembershipError,
    GroupMembershipService, HandleInviteRequestRequest, HandleJoinRequestRequest,
    InviteToGroupRequest, JoinGroupRequest, JoinOutcome, LeaveGroupRequest, RenameGroupRequest,
};
use crate::domain::value_objects::{GroupId, GroupVisibility, RequestAction, UserId};

/// A chat command as delivered by a bot adapter
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCommand {
    pub name: String,
    pub invoker_id: String,
    #[serde(default)]
    pub options: HashMap<String, Value>,
}

/// Reply sent back to the chat
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub ok: bool,
    pub content: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Missing option: {0}")]
    MissingOption(&'static str),
    #[error("Option '{name}' is invalid: {reason}")]
    InvalidOption { name: &'static str, reason: String },
    #[error("Invalid invoker id: {0}")]
    InvalidInvoker(String),
}

/// A decoded command, ready to run against the membership service
#[derive(Debug, Clone)]
pub enum GroupCommand {
    CreateGroup(CreateGroupRequest),
    JoinGroup(JoinGroupRequest),
    LeaveGroup(LeaveGroupRequest),
    HandleJoinRequest(HandleJoinRequestRequest),
    Invite(InviteToGroupRequest),
    HandleInvite(HandleInviteRequestRequest),
    AddAdmin(AddAdminRequest),
    DeleteAdmin(DeleteAdminRequest),
    RenameGroup(RenameGroupRequest),
}

/// Typed access to a command's options
struct Options<'a>(&'a HashMap<String, Value>);

impl Options<'_> {
    fn string(&self, name: &'static str) -> Result<String, CommandError> {
        match self.0.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(CommandError::InvalidOption {
                name,
                reason: format!("expected a string, got {}", other),
            }),
            None => Err(CommandError::MissingOption(name)),
        }
    }

    fn parsed<T>(&self, name: &'static str) -> Result<T, CommandError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.string(name)?
            .parse()
            .map_err(|e: T::Err| CommandError::InvalidOption {
                name,
                reason: e.to_string(),
            })
    }

    fn user_id(&self, name: &'static str) -> Result<UserId, CommandError> {
        UserId::parse(&self.string(name)?).map_err(|e| CommandError::InvalidOption {
            name,
            reason: e.to_string(),
        })
    }

    fn group_id(&self) -> Result<GroupId, CommandError> {
        GroupId::parse(&self.string("group_id")?).map_err(|e| CommandError::InvalidOption {
            name: "group_id",
            reason: e.to_string(),
        })
    }
}

impl GroupCommand {
    pub fn parse(command: &ChatCommand) -> Result<Self, CommandError> {
        let actor = UserId::parse(&command.invoker_id)
            .map_err(|_| CommandError::InvalidInvoker(command.invoker_id.clone()))?;
        let opts = Options(&command.options);

        let parsed = match command.name.as_str() {
            "create-group" => GroupCommand::CreateGroup(CreateGroupRequest {
                name: opts.string("name")?,
                owner_id: actor,
                visibility: match command.options.get("visibility") {
                    Some(_) => opts.parsed::<GroupVisibility>("visibility")?,
                    None => GroupVisibility::Public,
                },
            }),
            "join-group" => GroupCommand::JoinGroup(JoinGroupRequest {
                user_id: actor,
                group_id: opts.group_id()?,
            }),
            "leave-group" => GroupCommand::LeaveGroup(LeaveGroupRequest {
                user_id: actor,
                group_id: opts.group_id()?,
            }),
            "handle-join-request" => GroupCommand::HandleJoinRequest(HandleJoinRequestRequest {
                requester_id: opts.user_id("requester_id")?,
                group_id: opts.group_id()?,
                action: opts.parsed::<RequestAction>("action")?,
                approver_id: actor,
            }),
            "invite" => GroupCommand::Invite(InviteToGroupRequest {
                invitee_id: opts.user_id("invitee_id")?,
                group_id: opts.group_id()?,
                inviter_id: actor,
            }),
            "handle-invite" => GroupCommand::HandleInvite(HandleInviteRequestRequest {
                invitee_id: opts.user_id("invitee_id")?,
                inviter_id: opts.user_id("inviter_id")?,
                group_id: opts.group_id()?,
                action: opts.parsed::<RequestAction>("action")?,
                approver_id: actor,
            }),
            "add-admin" => GroupCommand::AddAdmin(AddAdminRequest {
                member_id: opts.user_id("member_id")?,
                group_id: opts.group_id()?,
                promoter_id: actor,
            }),
            "delete-admin" => GroupCommand::DeleteAdmin(DeleteAdminRequest {
                admin_id: opts.user_id("admin_id")?,
                group_id: opts.group_id()?,
                remover_id: actor,
            }),
            "rename-group" => GroupCommand::RenameGroup(RenameGroupRequest {
                group_id: opts.group_id()?,
                actor_id: actor,
                name: opts.string("name")?,
            }),
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        Ok(parsed)
    }

    /// Run the command and describe the result for the chat
    pub async fn dispatch(
        self,
        service: &dyn GroupMembershipService,
    ) -> Result<String, GroupMembershipError> {
        let reply = match self {
            GroupCommand::CreateGroup(req) => {
                let group = service.create_group(req).await?;
                format!("Created group \"{}\" ({})", group.name(), group.id())
            }
            GroupCommand::JoinGroup(req) => {
                let response = service.join_group(req).await?;
                match response.outcome {
                    JoinOutcome::Joined => format!("You joined \"{}\"", response.group.name()),
                    JoinOutcome::Requested => format!(
                        "Your request to join \"{}\" is waiting for approval",
                        response.group.name()
                    ),
                    JoinOutcome::AlreadyRequested => format!(
                        "You already asked to join \"{}\"",
                        response.group.name()
                    ),
                }
            }
            GroupCommand::LeaveGroup(req) => {
                let group = service.leave_group(req).await?;
                format!("You left \"{}\"", group.name())
            }
            GroupCommand::HandleJoinRequest(req) => {
                let action = req.action;
                let group = service.handle_join_request(req).await?;
                if action.is_accept() {
                    format!("Join request accepted for \"{}\"", group.name())
                } else {
                    format!("Join request rejected for \"{}\"", group.name())
                }
            }
            GroupCommand::Invite(req) => {
                let group = service.invite_to_group(req).await?;
                format!("Invitation sent for \"{}\"", group.name())
            }
            GroupCommand::HandleInvite(req) => {
                let action = req.action;
                let group = service.handle_invite_request(req).await?;
                if action.is_accept() {
                    format!("Invitation accepted for \"{}\"", group.name())
                } else {
                    format!("Invitation rejected for \"{}\"", group.name())
                }
            }
            GroupCommand::AddAdmin(req) => {
                let group = service.add_admin(req).await?;
                format!("New admin added to \"{}\"", group.name())
            }
            GroupCommand::DeleteAdmin(req) => {
                let group = service.delete_admin(req).await?;
                format!("Admin removed from \"{}\"", group.name())
            }
            GroupCommand::RenameGroup(req) => {
                let group = service.rename_group(req).await?;
                format!("Group renamed to \"{}\"", group.name())
            }
        };
        Ok(reply)
    }
}

/// Parse and run a chat command, turning every failure into a reply
pub async fn run_chat_command(
    command: &ChatCommand,
    service: &dyn GroupMembershipService,
) -> ChatReply {
    let parsed = match GroupCommand::parse(command) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(command = %command.name, "Rejected chat command: {}", e);
            return ChatReply {
                ok: false,
                content: e.to_string(),
            };
        }
    };

    match parsed.dispatch(service).await {
        Ok(content) => ChatReply { ok: true, content },
        Err(e) => ChatReply {
            ok: false,
            content: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::application::services::GroupMembershipServiceImpl;
    use crate::domain::entities::User;
    use crate::infrastructure::event_bus::BroadcastEventBus;
    use crate::infrastructure::persistence::{InMemoryGroupStore, InMemoryUserDirectory};

    fn command(name: &str, invoker: UserId, options: Value) -> ChatCommand {
        serde_json::from_value(json!({
            "name": name,
            "invoker_id": invoker.to_string(),
            "options": options,
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_handle_join_request() {
        let approver = UserId::new();
        let requester = UserId::new();
        let group_id = GroupId::new();

        let parsed = GroupCommand::parse(&command(
            "handle-join-request",
            approver,
            json!({
                "group_id": group_id.to_string(),
                "requester_id": requester.to_string(),
                "action": "reject",
            }),
        ))
        .unwrap();

        match parsed {
            GroupCommand::HandleJoinRequest(req) => {
                assert_eq!(req.approver_id, approver);
                assert_eq!(req.requester_id, requester);
                assert_eq!(req.group_id, group_id);
                assert_eq!(req.action, RequestAction::Reject);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_group_defaults_to_public() {
        let owner = UserId::new();
        let parsed =
            GroupCommand::parse(&command("create-group", owner, json!({ "name": "Gardeners" })))
                .unwrap();
        match parsed {
            GroupCommand::CreateGroup(req) => {
                assert_eq!(req.owner_id, owner);
                assert_eq!(req.visibility, GroupVisibility::Public);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        let actor = UserId::new();

        let err = GroupCommand::parse(&command("explode", actor, json!({}))).unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("explode".to_string()));

        let err = GroupCommand::parse(&command("join-group", actor, json!({}))).unwrap_err();
        assert_eq!(err, CommandError::MissingOption("group_id"));

        let err = GroupCommand::parse(&command("join-group", actor, json!({ "group_id": 7 })))
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidOption { name: "group_id", .. }));

        let err = GroupCommand::parse(&command(
            "create-group",
            actor,
            json!({ "name": "x", "visibility": "SECRET" }),
        ))
        .unwrap_err();
        assert!(matches!(err, CommandError::InvalidOption { name: "visibility", .. }));

        let bad_invoker: ChatCommand = serde_json::from_value(json!({
            "name": "join-group",
            "invoker_id": "not-a-uuid",
        }))
        .unwrap();
        assert!(matches!(
            GroupCommand::parse(&bad_invoker),
            Err(CommandError::InvalidInvoker(_))
        ));
    }

    #[tokio::test]
    async fn test_run_chat_commands_end_to_end() {
        let users = Arc::new(InMemoryUserDirectory::new());
        let owner = UserId::new();
        let guest = UserId::new();
        users.insert(User::new(owner, "owner", true)).await;
        users.insert(User::new(guest, "guest", true)).await;
        let service = GroupMembershipServiceImpl::new(
            users,
            Arc::new(InMemoryGroupStore::new()),
            Arc::new(BroadcastEventBus::new(8)),
        );

        let created = service
            .create_group(CreateGroupRequest {
                name: "Book Club".to_string(),
                owner_id: owner,
                visibility: GroupVisibility::RequestRequired,
            })
            .await
            .unwrap();
        let group_id = created.id().to_string();

        let reply = run_chat_command(
            &command("join-group", guest, json!({ "group_id": group_id })),
            &service,
        )
        .await;
        assert!(reply.ok);
        assert!(reply.content.contains("waiting for approval"));

        let reply = run_chat_command(
            &command(
                "handle-join-request",
                guest,
                json!({ "group_id": group_id, "requester_id": guest.to_string(), "action": "ACCEPT" }),
            ),
            &service,
        )
        .await;
        assert!(!reply.ok);

        let reply = run_chat_command(
            &command(
                "handle-join-request",
                owner,
                json!({ "group_id": group_id, "requester_id": guest.to_string(), "action": "ACCEPT" }),
            ),
            &service,
        )
        .await;
        assert!(reply.ok, "{}", reply.content);
        assert!(service.get_group(created.id()).await.unwrap().is_member(guest));
    }
}
