use super::*;

#[derive(Default)]
struct RecordingNavigator {
    visits: Vec<Route>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: Route) {
        self.visits.push(route);
    }
}

fn session(role: Role) -> Session {
    Session {
        token: "tok".to_owned(),
        role,
        identity: "someone@example.com".to_owned(),
    }
}

fn all_policies() -> Vec<GuardPolicy> {
    vec![
        GuardPolicy::any_role(),
        GuardPolicy::only(Role::OpsUser),
        GuardPolicy::only(Role::ClientUser),
        GuardPolicy::roles(Role::ALL),
    ]
}

// =============================================================
// Truth table
// =============================================================

#[test]
fn allowed_iff_session_present_and_role_admitted() {
    let sessions = [None, Some(session(Role::OpsUser)), Some(session(Role::ClientUser))];
    for policy in all_policies() {
        for candidate in &sessions {
            let state = evaluate(false, candidate.as_ref(), &policy);
            let expected_allowed = candidate.as_ref().is_some_and(|s| {
                policy.allowed_roles().is_empty() || policy.allowed_roles().contains(&s.role)
            });
            assert_eq!(state == GuardState::Allowed, expected_allowed, "{policy:?} {candidate:?}");
            if !expected_allowed {
                assert!(state.is_denied());
            }
        }
    }
}

#[test]
fn loading_is_pending_and_never_redirects() {
    let sessions = [None, Some(session(Role::OpsUser)), Some(session(Role::ClientUser))];
    for policy in all_policies() {
        for candidate in &sessions {
            let decision = decide(true, candidate.as_ref(), &policy);
            assert_eq!(decision.state, GuardState::Pending);

            let mut nav = RecordingNavigator::default();
            decision.enforce(&mut nav);
            assert!(nav.visits.is_empty());
        }
    }
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn absent_session_redirects_to_login() {
    let mut nav = RecordingNavigator::default();
    let state = decide(false, None, &GuardPolicy::only(Role::OpsUser)).enforce(&mut nav);
    assert_eq!(state, GuardState::DeniedNoSession);
    assert_eq!(nav.visits, vec![Route::Login]);
}

#[test]
fn client_on_ops_route_redirects_to_client_console() {
    let client = session(Role::ClientUser);
    let mut nav = RecordingNavigator::default();
    let state = decide(false, Some(&client), &GuardPolicy::only(Role::OpsUser)).enforce(&mut nav);
    assert_eq!(state, GuardState::DeniedWrongRole);
    assert_eq!(nav.visits, vec![Route::ClientHome]);
}

#[test]
fn ops_on_client_route_redirects_to_ops_console() {
    let ops = session(Role::OpsUser);
    let decision = decide(false, Some(&ops), &GuardPolicy::only(Role::ClientUser));
    assert_eq!(decision.redirect, Some(Route::OpsHome));
}

#[test]
fn ops_on_ops_route_renders_without_redirect() {
    let ops = session(Role::OpsUser);
    let mut nav = RecordingNavigator::default();
    let decision = decide(false, Some(&ops), &GuardPolicy::only(Role::OpsUser));
    assert!(decision.renders_children());
    assert_eq!(decision.enforce(&mut nav), GuardState::Allowed);
    assert!(nav.visits.is_empty());
}

#[test]
fn decision_is_idempotent_for_same_inputs() {
    let client = session(Role::ClientUser);
    let policy = GuardPolicy::only(Role::OpsUser);
    assert_eq!(decide(false, Some(&client), &policy), decide(false, Some(&client), &policy));
}

// =============================================================
// Policy and routes
// =============================================================

#[test]
fn policy_roles_deduplicates() {
    let policy = GuardPolicy::roles([Role::OpsUser, Role::OpsUser]);
    assert_eq!(policy.allowed_roles(), &[Role::OpsUser]);
}

#[test]
fn route_paths_round_trip() {
    for route in [Route::Login, Route::Signup, Route::OpsHome, Route::ClientHome] {
        assert_eq!(Route::from_path(route.path()), Some(route));
    }
    assert_eq!(Route::from_path("/ops-home/"), Some(Route::OpsHome));
    assert_eq!(Route::from_path("/"), None);
}

#[test]
fn landing_route_follows_snapshot() {
    let pending = AuthSnapshot {
        loading: true,
        session: None,
    };
    assert_eq!(landing_route(&pending), None);

    let anonymous = AuthSnapshot {
        loading: false,
        session: None,
    };
    assert_eq!(landing_route(&anonymous), Some(Route::Login));

    let client = AuthSnapshot {
        loading: false,
        session: Some(session(Role::ClientUser)),
    };
    assert_eq!(landing_route(&client), Some(Route::ClientHome));
}

#[test]
fn segments_resolve_back_to_their_route() {
    for route in Route::ALL {
        let segment = route.segment();
        assert!(!segment.is_empty() && !segment.contains('/'));
        assert_eq!(Route::from_path(&format!("/{segment}")), Some(route));
    }
    assert_eq!(Route::OpsHome.segment(), "ops-home");
}
