//! # Users, groups and association memberships
//!
//! [`User`] is the account as the API exposes it; `permissions` holds the
//! `codename`s granted through the user's groups and is what
//! [`User::has_perm`] checks. [`UserGroup`] links a user to a [`Group`], optionally
//! scoped to an institution or a fund. [`AssociationUser`] is a membership of a user in
//! an association, including the president flag.

use serde::{Deserialize, Serialize};

use super::SelectOption;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_cas: bool,
    pub is_student: bool,
    pub is_staff: bool,
    pub is_validated_by_admin: bool,
    pub can_submit_projects: bool,
    pub permissions: Vec<String>,
}

impl User {
    /// Get display name, falling back to the username if no name is set.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn has_perm(&self, codename: &str) -> bool {
        self.permissions.iter().any(|p| p == codename)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub is_public: bool,
}

impl From<&Group> for SelectOption {
    fn from(g: &Group) -> Self {
        SelectOption::new(g.id, g.name.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroup {
    pub user: i64,
    pub group: i64,
    pub institution: Option<i64>,
    pub fund: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationUser {
    pub id: i64,
    pub user: String,
    pub association: i64,
    pub is_president: bool,
    pub can_be_president: bool,
    pub is_validated_by_admin: bool,
}
