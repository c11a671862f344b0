//! Per-route permission guard.

use console_rbac::{Permission, Route};
use serde::Serialize;
use tracing::debug;

use crate::config::AppRoutes;
use crate::location::{Location, NavigationMode, Navigator};
use crate::session::Session;

/// Outcome of evaluating a gate against a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Bootstrap has not finished.
    Loading,
    /// No authenticated session.
    Unauthenticated,
    /// Authenticated, but the required permission is missing.
    Forbidden,
    /// The protected subtree may render.
    Authorized,
}

/// What the host should do with the protected subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render a neutral placeholder and nothing of the subtree.
    Placeholder,
    /// Render the subtree.
    Render,
    /// Leave for another in-app route.
    Redirect { to: String, mode: NavigationMode },
}

/// Guard in front of a protected route.
///
/// Holds no session state; every evaluation reads the session it is given.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    required: Option<Permission>,
    routes: AppRoutes,
}

impl PermissionGate {
    /// Create a gate. `None` admits any authenticated session.
    pub fn new(required: Option<Permission>, routes: AppRoutes) -> Self {
        Self { required, routes }
    }

    /// Gate for a route table entry.
    pub fn for_route(route: &Route, routes: AppRoutes) -> Self {
        Self::new(route.required_permission().cloned(), routes)
    }

    /// Permission this gate requires.
    pub fn required(&self) -> Option<&Permission> {
        self.required.as_ref()
    }

    /// Classify the session.
    pub fn evaluate(&self, session: &Session) -> GateState {
        if session.is_loading() {
            GateState::Loading
        } else if !session.is_authenticated() {
            GateState::Unauthenticated
        } else if session.permissions.permits(self.required.as_ref()) {
            GateState::Authorized
        } else {
            GateState::Forbidden
        }
    }

    /// Decide what to render at `location`.
    ///
    /// Unauthenticated sessions go to login with `location` as the return
    /// target, replacing the history entry. Forbidden sessions get a new
    /// history entry for the unauthorized page.
    pub fn decide(&self, session: &Session, location: &Location) -> GateDecision {
        match self.evaluate(session) {
            GateState::Loading => GateDecision::Placeholder,
            GateState::Authorized => GateDecision::Render,
            GateState::Unauthenticated => GateDecision::Redirect {
                to: self.routes.login_with_next(&location.path_and_query()),
                mode: NavigationMode::Replace,
            },
            GateState::Forbidden => GateDecision::Redirect {
                to: self.routes.unauthorized.clone(),
                mode: NavigationMode::Push,
            },
        }
    }

    /// Decide at the navigator's location and perform any redirect.
    pub fn guard(&self, session: &Session, navigator: &dyn Navigator) -> GateDecision {
        let location = navigator.location();
        let decision = self.decide(session, &location);
        if let GateDecision::Redirect { to, mode } = &decision {
            debug!(
                path = %location.path,
                required = ?self.required.as_ref().map(Permission::as_str),
                to = %to,
                "Gate redirecting"
            );
            navigator.navigate(to, *mode);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{MemoryNavigator, NavigationEvent};
    use crate::session::SessionStatus;
    use console_rbac::{PermissionSet, RouteTable};

    fn session(status: SessionStatus, perms: &[&str]) -> Session {
        Session {
            status,
            permissions: PermissionSet::from_strings(perms),
            ..Default::default()
        }
    }

    fn gate(required: Option<&str>) -> PermissionGate {
        PermissionGate::new(
            required.map(|r| Permission::parse(r).unwrap()),
            AppRoutes::default(),
        )
    }

    #[test]
    fn test_renders_iff_authenticated_and_permitted() {
        let statuses = [
            SessionStatus::Uninitialized,
            SessionStatus::Loading,
            SessionStatus::Authenticated,
            SessionStatus::Anonymous,
        ];
        let sets: [&[&str]; 4] = [
            &[],
            &["get:dashboard"],
            &["post:events"],
            &["get:dashboard", "post:events"],
        ];
        let required = [None, Some("get:dashboard"), Some("post:events")];
        let location = Location::parse("/event-control").unwrap();

        for status in statuses {
            for perms in sets {
                for r in required {
                    let session = session(status, perms);
                    let decision = gate(r).decide(&session, &location);
                    let expected = status == SessionStatus::Authenticated
                        && r.map_or(true, |r| perms.contains(&r));
                    assert_eq!(
                        decision == GateDecision::Render,
                        expected,
                        "status {:?} perms {:?} required {:?}",
                        status,
                        perms,
                        r
                    );
                }
            }
        }
    }

    #[test]
    fn test_loading_never_renders() {
        for status in [SessionStatus::Uninitialized, SessionStatus::Loading] {
            let session = session(status, &["post:events"]);
            assert_eq!(gate(Some("post:events")).evaluate(&session), GateState::Loading);
            assert_eq!(
                gate(None).decide(&session, &Location::default()),
                GateDecision::Placeholder
            );
        }
    }

    #[test]
    fn test_missing_permission_goes_to_unauthorized() {
        let navigator = MemoryNavigator::new("/event-control").unwrap();
        let session = session(SessionStatus::Authenticated, &["get:dashboard"]);

        let decision = gate(Some("post:events")).guard(&session, &navigator);

        assert_eq!(
            decision,
            GateDecision::Redirect {
                to: "/unauthorized".to_string(),
                mode: NavigationMode::Push,
            }
        );
        assert_eq!(
            navigator.events(),
            vec![NavigationEvent::Navigate {
                path: "/unauthorized".to_string(),
                mode: NavigationMode::Push,
            }]
        );
    }

    #[test]
    fn test_anonymous_goes_to_login_with_return_target() {
        let navigator = MemoryNavigator::new("/calendar?month=3").unwrap();
        let session = session(SessionStatus::Anonymous, &[]);

        let decision = gate(Some("get:calendar")).guard(&session, &navigator);

        assert_eq!(
            decision,
            GateDecision::Redirect {
                to: "/login?nextUrl=%2Fcalendar%3Fmonth%3D3".to_string(),
                mode: NavigationMode::Replace,
            }
        );
        assert_eq!(navigator.events().len(), 1);
    }

    #[test]
    fn test_decision_follows_live_session() {
        let gate = gate(Some("get:calendar"));
        let location = Location::parse("/calendar").unwrap();
        let mut session = session(SessionStatus::Authenticated, &["get:calendar"]);
        assert_eq!(gate.decide(&session, &location), GateDecision::Render);

        session.permissions = PermissionSet::from_strings(["get:dashboard"]);
        assert_eq!(gate.evaluate(&session), GateState::Forbidden);
    }

    #[test]
    fn test_gate_for_route() {
        let table = RouteTable::console_default();
        let route = table.lookup("/event-control").unwrap();
        let gate = PermissionGate::for_route(route, AppRoutes::default());
        assert_eq!(gate.required().map(Permission::as_str), Some("post:events"));
    }
}
