//! # Domain models mirroring the platform's REST resources
//!
//! Every type here is a plain `Serialize + Deserialize` record shaped like the JSON the
//! API returns. Ids are server-assigned integers and cross-references between entities
//! are carried as ids, never as nested objects.
//!
//! | Module | Types |
//! |--------|-------|
//! | [`association`] | [`Association`], [`SocialNetwork`], [`AssociationName`], [`Institution`], [`InstitutionComponent`], [`ActivityField`] |
//! | [`project`] | [`Project`], [`ProjectCategory`], [`ProjectCommissionFund`] |
//! | [`user`] | [`User`], [`Group`], [`UserGroup`], [`AssociationUser`] |
//! | [`document`] | [`Document`], [`DocumentUpload`] |
//! | [`commission`] | [`Commission`], [`Fund`], [`CommissionFund`] |
//! | [`content`] | [`Content`] |
//!
//! Structural invariants (a project belongs to exactly one of `user` or `association`,
//! an upload to exactly one of association or user) are enforced by the API. The client
//! mirrors whatever the server returned and does not re-check them.

pub mod association;
pub mod commission;
pub mod content;
pub mod document;
pub mod project;
pub mod user;

use serde::{Deserialize, Serialize};

pub use association::{
    ActivityField, Association, AssociationName, Institution, InstitutionComponent, SocialNetwork,
};
pub use commission::{Commission, CommissionFund, Fund};
pub use content::Content;
pub use document::{Document, DocumentUpload};
pub use project::{Project, ProjectCategory, ProjectCommissionFund};
pub use user::{AssociationUser, Group, User, UserGroup};

/// A `{ value, label }` pair used to feed dropdowns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}
