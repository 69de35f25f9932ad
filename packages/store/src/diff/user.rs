//! User edition by managers: profile fields and group memberships.

use serde::Serialize;

use super::{changed, set_difference, Patch, SetChanges};
use crate::models::User;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserEdit {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub can_submit_projects: bool,
    pub groups: Vec<i64>,
}

impl UserEdit {
    /// Start editing `user`, whose current groups are `groups`.
    pub fn new(user: &User, groups: Vec<i64>) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            can_submit_projects: user.can_submit_projects,
            groups,
        }
    }

    pub fn diff(&self, reference: &User) -> UserPatch {
        UserPatch {
            first_name: changed(&self.first_name, &reference.first_name),
            last_name: changed(&self.last_name, &reference.last_name),
            email: changed(&self.email, &reference.email),
            phone: changed(&self.phone, &reference.phone),
            can_submit_projects: changed(
                &self.can_submit_projects,
                &reference.can_submit_projects,
            ),
        }
    }

    pub fn group_changes(&self, current: &[i64]) -> SetChanges<i64> {
        set_difference(current, &self.groups)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_submit_projects: Option<bool>,
}

impl Patch for UserPatch {}
