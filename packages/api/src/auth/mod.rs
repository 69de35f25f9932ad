//! Authentication: session state, sign-in and registration flows, route guards.

mod guard;
mod security;
mod session;

pub use guard::{guard, Navigation, RouteMeta, LOGIN_ROUTE, NOT_FOUND_ROUTE};
pub use security::*;
pub use session::{
    AssociationMembership, GroupMembership, NewUser, PendingRegistration, RegistrationKind,
    RegistrationStep, Session,
};
