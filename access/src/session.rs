//! Session data model: the authenticated identity and the role bound to a token.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::guard::Route;

/// One of the two fixed operator classes controlling which consoles are reachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Operations user: uploads and manages documents.
    #[serde(rename = "OPS_USER")]
    OpsUser,
    /// Client user: lists documents and downloads through secure links.
    #[serde(rename = "CLIENT_USER")]
    ClientUser,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 2] = [Role::OpsUser, Role::ClientUser];

    /// Wire representation used by the backend and persisted profile.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpsUser => "OPS_USER",
            Self::ClientUser => "CLIENT_USER",
        }
    }

    /// Human-readable label for forms and status lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OpsUser => "Operation User",
            Self::ClientUser => "Client User",
        }
    }

    /// The console a session of this role lands on.
    #[must_use]
    pub fn home(self) -> Route {
        match self {
            Self::OpsUser => Route::OpsHome,
            Self::ClientUser => Route::ClientHome,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not one of the known wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "OPS_USER" => Ok(Self::OpsUser),
            "CLIENT_USER" => Ok(Self::ClientUser),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// The authenticated identity and role bound to a stored token.
///
/// Created from a successful login response, persisted next to the token,
/// and destroyed on logout. Only [`crate::provider::AuthProvider`] mutates it;
/// everyone else reads clones.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token issued by the backend.
    pub token: String,
    pub role: Role,
    /// The user's email address.
    pub identity: String,
}

impl Session {
    /// Profile half of the session, the part persisted as JSON.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.identity.clone(),
            role: self.role,
        }
    }
}

// Token stays out of debug output so it never reaches logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("identity", &self.identity)
            .finish()
    }
}

/// Small profile object persisted alongside the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub role: Role,
}
