//! Decision applied to a pending join request or invitation

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestAction {
    Accept,
    Reject,
}

impl RequestAction {
    pub fn is_accept(&self) -> bool {
        matches!(self, RequestAction::Accept)
    }
}

impl std::fmt::Display for RequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestAction::Accept => f.write_str("ACCEPT"),
            RequestAction::Reject => f.write_str("REJECT"),
        }
    }
}

impl std::str::FromStr for RequestAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACCEPT" => Ok(RequestAction::Accept),
            "REJECT" => Ok(RequestAction::Reject),
            other => Err(format!("Unknown request action: {}", other)),
        }
    }
}
