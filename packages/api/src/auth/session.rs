//! Session data types: the signed-in user and a registration in progress.

use serde::Serialize;
use store::models::{User, UserGroup};

/// Who is signed in, and any registration not yet completed.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub user: Option<User>,
    pub groups: Vec<UserGroup>,
    pub pending: Option<PendingRegistration>,
}

impl Session {
    pub fn is_auth(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_staff(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_staff)
    }

    pub fn has_perm(&self, codename: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_perm(codename))
    }

    /// Group ids the signed-in user belongs to.
    pub fn group_ids(&self) -> Vec<i64> {
        self.groups.iter().map(|g| g.group).collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationKind {
    /// Identity comes from a CAS ticket; the account already exists server side.
    Cas,
    /// Username and password account created by the registration endpoint.
    Local,
}

/// The ordered steps of a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationStep {
    Identity,
    Associations,
    Groups,
}

impl RegistrationStep {
    pub const ALL: [RegistrationStep; 3] = [
        RegistrationStep::Identity,
        RegistrationStep::Associations,
        RegistrationStep::Groups,
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<&User> for NewUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            password: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssociationMembership {
    pub association: i64,
    pub is_president: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMembership {
    pub group: i64,
    pub institution: Option<i64>,
    pub fund: Option<i64>,
}

/// Everything collected by the registration form, plus the steps already done.
///
/// Membership steps post one link per entry; `applied_associations` and
/// `applied_groups` count the leading entries the API has already accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRegistration {
    pub kind: RegistrationKind,
    pub identity: NewUser,
    pub associations: Vec<AssociationMembership>,
    pub groups: Vec<GroupMembership>,
    pub completed: Vec<RegistrationStep>,
    pub applied_associations: usize,
    pub applied_groups: usize,
}

impl PendingRegistration {
    pub fn new(kind: RegistrationKind, identity: NewUser) -> Self {
        Self {
            kind,
            identity,
            associations: Vec::new(),
            groups: Vec::new(),
            completed: Vec::new(),
            applied_associations: 0,
            applied_groups: 0,
        }
    }

    pub fn is_done(&self, step: RegistrationStep) -> bool {
        self.completed.contains(&step)
    }
}
