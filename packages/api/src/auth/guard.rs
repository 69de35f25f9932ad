//! Route guard: decides whether navigation to a route may proceed.

use super::session::Session;

pub const LOGIN_ROUTE: &str = "/login";
pub const NOT_FOUND_ROUTE: &str = "/404";

/// Access requirements attached to a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub staff_only: bool,
}

impl RouteMeta {
    pub const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
        staff_only: false,
    };
    pub const SIGNED_IN: RouteMeta = RouteMeta {
        requires_auth: true,
        staff_only: false,
    };
    pub const STAFF: RouteMeta = RouteMeta {
        requires_auth: true,
        staff_only: true,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

pub fn guard(meta: RouteMeta, session: &Session) -> Navigation {
    let needs_auth = meta.requires_auth || meta.staff_only;
    if needs_auth && !session.is_auth() {
        tracing::debug!("navigation refused, not signed in");
        return Navigation::Redirect(LOGIN_ROUTE);
    }
    if meta.staff_only && !session.is_staff() {
        tracing::debug!("navigation refused, staff only");
        return Navigation::Redirect(NOT_FOUND_ROUTE);
    }
    Navigation::Proceed
}
