use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Collection,
    Member,
}

impl RouteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Collection => "collection",
            RouteKind::Member => "member",
        }
    }

    /// Verbs the routing surface accepts for this shape.
    pub fn allowed_methods(self) -> &'static [HttpMethod] {
        match self {
            RouteKind::Collection => &[HttpMethod::Get, HttpMethod::Post],
            RouteKind::Member => &[
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Put,
                HttpMethod::Delete,
            ],
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seven conventional controller actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    Index,
    Show,
    New,
    Create,
    Edit,
    Update,
    Destroy,
}

impl ActionName {
    pub const ALL: [ActionName; 7] = [
        ActionName::Index,
        ActionName::Show,
        ActionName::New,
        ActionName::Create,
        ActionName::Edit,
        ActionName::Update,
        ActionName::Destroy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::Index => "index",
            ActionName::Show => "show",
            ActionName::New => "new",
            ActionName::Create => "create",
            ActionName::Edit => "edit",
            ActionName::Update => "update",
            ActionName::Destroy => "destroy",
        }
    }

    /// Member actions operate on one keyed resource and receive the key.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            ActionName::Show | ActionName::Edit | ActionName::Update | ActionName::Destroy
        )
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for ActionName {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(other) => other,
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub identifier: String,
    pub is_administrator: bool,
}

impl Principal {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            is_administrator: false,
        }
    }

    pub fn administrator(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            is_administrator: true,
        }
    }
}
