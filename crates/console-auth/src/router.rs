//! Route dispatch.
//!
//! Binds the route table to the session: protected routes go through their
//! [`PermissionGate`], `/logout` ends the session, unknown paths fall back to
//! the table's default view.

use console_rbac::{RouteKind, RouteMatch, RouteTable};
use tracing::debug;

use crate::config::AppRoutes;
use crate::gate::{GateDecision, PermissionGate};
use crate::location::{Location, NavigationMode, Navigator};
use crate::session::{Session, SessionManager};

/// What entering a route amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the route's view.
    Render(RouteKind),
    /// Render a neutral placeholder while the session loads.
    Placeholder,
    /// Leave for another in-app route.
    Redirect { to: String, mode: NavigationMode },
    /// End the session.
    Logout,
}

/// Route table plus the redirect targets gates use.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    routes: AppRoutes,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouteTable::console_default(), AppRoutes::default())
    }
}

impl Router {
    /// Create a router over `table`, redirecting to `routes`.
    pub fn new(table: RouteTable, routes: AppRoutes) -> Self {
        Self { table, routes }
    }

    /// Route table in use.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide what entering `location` means for `session`.
    pub fn decide(&self, session: &Session, location: &Location) -> RouteDecision {
        let route = match self.table.resolve(&location.path) {
            RouteMatch::Matched(route) => route,
            RouteMatch::Fallback { to } => {
                return RouteDecision::Redirect {
                    to: to.to_string(),
                    mode: NavigationMode::Replace,
                }
            }
        };

        match &route.kind {
            RouteKind::Logout => RouteDecision::Logout,
            RouteKind::Protected { .. } => {
                let gate = PermissionGate::for_route(route, self.routes.clone());
                match gate.decide(session, location) {
                    GateDecision::Render => RouteDecision::Render(route.kind.clone()),
                    GateDecision::Placeholder => RouteDecision::Placeholder,
                    GateDecision::Redirect { to, mode } => RouteDecision::Redirect { to, mode },
                }
            }
            kind => RouteDecision::Render(kind.clone()),
        }
    }

    /// Decide at the navigator's location and carry out redirects and logout.
    pub fn enter(&self, manager: &SessionManager, navigator: &dyn Navigator) -> RouteDecision {
        let location = navigator.location();
        let decision = self.decide(&manager.session(), &location);
        match &decision {
            RouteDecision::Redirect { to, mode } => {
                debug!(path = %location.path, to = %to, "Route redirecting");
                navigator.navigate(to, *mode);
            }
            RouteDecision::Logout => manager.logout(),
            RouteDecision::Render(_) | RouteDecision::Placeholder => {}
        }
        decision
    }
}
