//! Route Guard: decides per render whether a view may show.
//!
//! ARCHITECTURE
//! ============
//! [`evaluate`] is the whole transition function. It is recomputed on every
//! render and whenever auth state changes, and never retries or reverts on
//! its own. [`Decision::enforce`] is the only place a redirect is issued,
//! through whatever [`Navigator`] the front end supplies.
//!
//! Access control here is UX only; the backend enforces its own checks.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::provider::AuthSnapshot;
use crate::session::{Role, Session};

/// Screens the guard can send a user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    /// Operations console (upload, manage documents).
    OpsHome,
    /// Client console (list, secure download).
    ClientHome,
}

impl Route {
    /// Every route, for building router tables.
    pub const ALL: [Route; 4] = [Route::Login, Route::Signup, Route::OpsHome, Route::ClientHome];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::OpsHome => "/ops-home",
            Self::ClientHome => "/client-home",
        }
    }

    /// [`Route::path`] without the leading slash, for router segment tables.
    #[must_use]
    pub fn segment(self) -> &'static str {
        self.path().trim_start_matches('/')
    }

    /// Match a URL path, ignoring a trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "/login" => Some(Self::Login),
            "/signup" => Some(Self::Signup),
            "/ops-home" => Some(Self::OpsHome),
            "/client-home" => Some(Self::ClientHome),
            _ => None,
        }
    }
}

/// Role restriction for a guarded view. An empty set admits any session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardPolicy {
    allowed_roles: Vec<Role>,
}

impl GuardPolicy {
    /// Any authenticated session may view.
    #[must_use]
    pub fn any_role() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn only(role: Role) -> Self {
        Self {
            allowed_roles: vec![role],
        }
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut allowed_roles: Vec<Role> = Vec::new();
        for role in roles {
            if !allowed_roles.contains(&role) {
                allowed_roles.push(role);
            }
        }
        Self { allowed_roles }
    }

    #[must_use]
    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }

    /// Whether `role` passes the restriction.
    #[must_use]
    pub fn admits(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }
}

/// Guard outcome for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Auth status not yet known; show a neutral loading indicator.
    Pending,
    DeniedNoSession,
    DeniedWrongRole,
    /// Render the wrapped content.
    Allowed,
}

impl GuardState {
    #[must_use]
    pub fn is_denied(self) -> bool {
        matches!(self, Self::DeniedNoSession | Self::DeniedWrongRole)
    }
}

/// Pure guard transition function.
#[must_use]
pub fn evaluate(loading: bool, session: Option<&Session>, policy: &GuardPolicy) -> GuardState {
    if loading {
        return GuardState::Pending;
    }
    let Some(session) = session else {
        return GuardState::DeniedNoSession;
    };
    if policy.admits(session.role) {
        GuardState::Allowed
    } else {
        GuardState::DeniedWrongRole
    }
}

/// Side-effect seam for redirects.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Guard state plus the redirect it implies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub state: GuardState,
    pub redirect: Option<Route>,
}

impl Decision {
    /// Issue the redirect, if any, and hand back the state.
    pub fn enforce<N: Navigator + ?Sized>(self, navigator: &mut N) -> GuardState {
        if let Some(route) = self.redirect {
            navigator.navigate(route);
        }
        self.state
    }

    #[must_use]
    pub fn renders_children(self) -> bool {
        self.state == GuardState::Allowed
    }
}

/// Evaluate the guard and attach its redirect target.
#[must_use]
pub fn decide(loading: bool, session: Option<&Session>, policy: &GuardPolicy) -> Decision {
    let state = evaluate(loading, session, policy);
    let redirect = match (state, session) {
        (GuardState::DeniedNoSession, _) => Some(Route::Login),
        (GuardState::DeniedWrongRole, Some(session)) => Some(session.role.home()),
        _ => None,
    };
    Decision { state, redirect }
}

/// [`decide`] over an auth snapshot.
#[must_use]
pub fn decide_snapshot(snapshot: &AuthSnapshot, policy: &GuardPolicy) -> Decision {
    decide(snapshot.loading, snapshot.session.as_ref(), policy)
}

/// Where the root URL sends a user: nowhere while pending, login without a
/// session, otherwise the session's console.
#[must_use]
pub fn landing_route(snapshot: &AuthSnapshot) -> Option<Route> {
    if snapshot.loading {
        return None;
    }
    Some(
        snapshot
            .session
            .as_ref()
            .map_or(Route::Login, |session| session.role.home()),
    )
}
