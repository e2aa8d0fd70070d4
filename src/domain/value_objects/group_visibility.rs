//! Group visibility - decides how a non-member gets into a group

use serde::{Deserialize, Serialize};

/// How users may enter a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupVisibility {
    /// Anyone can join directly
    Public,
    /// Joining creates a pending request an owner or admin must approve
    #[serde(alias = "UNPUBLIC")]
    RequestRequired,
    /// Users can only enter through an invitation
    #[serde(alias = "PRIVATE")]
    InviteOnly,
}

impl GroupVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupVisibility::Public => "PUBLIC",
            GroupVisibility::RequestRequired => "REQUEST_REQUIRED",
            GroupVisibility::InviteOnly => "INVITE_ONLY",
        }
    }
}

impl std::fmt::Display for GroupVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupVisibility {
    type Err = String;

    /// Accepts the canonical names as well as the legacy
    /// `UNPUBLIC` / `PRIVATE` spellings still sent by older clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "PUBLIC" => Ok(GroupVisibility::Public),
            "REQUEST_REQUIRED" | "UNPUBLIC" => Ok(GroupVisibility::RequestRequired),
            "INVITE_ONLY" | "PRIVATE" => Ok(GroupVisibility::InviteOnly),
            other => Err(format!("Unknown group visibility: {}", other)),
        }
    }
}
