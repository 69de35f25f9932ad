//! # Client state, one holder per entity family
//!
//! Each view that needs associations, projects, documents… reads and writes the same
//! state object, handed to it explicitly. [`AppState`] bundles all of them for one
//! session; dropping it (on logout) drops every cached list at once.
//!
//! | State | Holds |
//! |-------|-------|
//! | [`AssociationState`] | association lists, names, institutions, components, activity fields, the association being viewed |
//! | [`ProjectState`] | projects, categories, per-fund requests, the project being edited |
//! | [`DocumentState`] | document types and uploaded files |
//! | [`CommissionState`] | commissions, funds and commission/fund links |
//! | [`UserState`] | managed users, groups, memberships |
//! | [`ContentState`] | editable page contents |

use chrono::Duration;

use crate::collection::Collection;
use crate::models::*;

#[derive(Clone, Debug, Default)]
pub struct AssociationState {
    pub associations: Collection<Association>,
    pub names: Collection<AssociationName>,
    pub institutions: Collection<Institution>,
    pub components: Collection<InstitutionComponent>,
    pub fields: Collection<ActivityField>,
    pub user_associations: Collection<AssociationUser>,
    pub current: Option<Association>,
}

impl AssociationState {
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            associations: Collection::new().with_ttl(ttl),
            names: Collection::new().with_ttl(ttl),
            institutions: Collection::new().with_ttl(ttl),
            components: Collection::new().with_ttl(ttl),
            fields: Collection::new().with_ttl(ttl),
            user_associations: Collection::new().with_ttl(ttl),
            current: None,
        }
    }

    /// Label of an institution id, for display in lists.
    pub fn institution_label(&self, id: Option<i64>) -> Option<&str> {
        let id = id?;
        self.institutions
            .find(|i| i.id == id)
            .map(|i| i.acronym.as_str())
    }

    pub fn component_label(&self, id: Option<i64>) -> Option<&str> {
        let id = id?;
        self.components.find(|c| c.id == id).map(|c| c.name.as_str())
    }

    pub fn field_label(&self, id: Option<i64>) -> Option<&str> {
        let id = id?;
        self.fields.find(|f| f.id == id).map(|f| f.name.as_str())
    }

    /// Replace the cached copy of one association after a successful update.
    pub fn replace(&mut self, association: Association) {
        if let Some(slot) = self
            .associations
            .items_mut()
            .iter_mut()
            .find(|a| a.id == association.id)
        {
            *slot = association.clone();
        }
        if self.current.as_ref().is_some_and(|c| c.id == association.id) {
            self.current = Some(association);
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.associations.items_mut().retain(|a| a.id != id);
        self.names.items_mut().retain(|a| a.id != id);
        if self.current.as_ref().is_some_and(|c| c.id == id) {
            self.current = None;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProjectState {
    pub projects: Collection<Project>,
    pub categories: Collection<ProjectCategory>,
    pub commission_funds: Collection<ProjectCommissionFund>,
    pub current: Option<Project>,
}

impl ProjectState {
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            projects: Collection::new().with_ttl(ttl),
            categories: Collection::new().with_ttl(ttl),
            commission_funds: Collection::new().with_ttl(ttl),
            current: None,
        }
    }

    pub fn category_names(&self, ids: &[i64]) -> Vec<&str> {
        self.categories
            .items()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DocumentState {
    pub documents: Collection<Document>,
    pub uploads: Collection<DocumentUpload>,
}

impl DocumentState {
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            documents: Collection::new().with_ttl(ttl),
            uploads: Collection::new().with_ttl(ttl),
        }
    }

    /// Uploaded files whose document type is a charter.
    pub fn charters(&self) -> Vec<&DocumentUpload> {
        self.uploads
            .items()
            .iter()
            .filter(|upload| {
                self.documents
                    .find(|d| d.id == upload.document)
                    .is_some_and(Document::is_charter)
            })
            .collect()
    }

    pub fn uploads_for(&self, document: i64) -> Vec<&DocumentUpload> {
        self.uploads
            .items()
            .iter()
            .filter(|u| u.document == document)
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CommissionState {
    pub commissions: Collection<Commission>,
    pub funds: Collection<Fund>,
    pub commission_funds: Collection<CommissionFund>,
}

impl CommissionState {
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            commissions: Collection::new().with_ttl(ttl),
            funds: Collection::new().with_ttl(ttl),
            commission_funds: Collection::new().with_ttl(ttl),
        }
    }

    /// Ids of the funds linked to `commission`.
    pub fn funds_of(&self, commission: i64) -> Vec<i64> {
        self.commission_funds
            .items()
            .iter()
            .filter(|cf| cf.commission == commission)
            .map(|cf| cf.fund)
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserState {
    pub users: Collection<User>,
    pub groups: Collection<Group>,
    pub user_groups: Collection<UserGroup>,
    pub current: Option<User>,
}

impl UserState {
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            users: Collection::new().with_ttl(ttl),
            groups: Collection::new().with_ttl(ttl),
            user_groups: Collection::new().with_ttl(ttl),
            current: None,
        }
    }

    /// Group ids of the user being managed.
    pub fn current_group_ids(&self) -> Vec<i64> {
        self.user_groups.items().iter().map(|g| g.group).collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub contents: Collection<Content>,
}

impl ContentState {
    pub fn by_code(&self, code: &str) -> Option<&Content> {
        self.contents.find(|c| c.code == code)
    }
}

/// All client state for one session.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub associations: AssociationState,
    pub projects: ProjectState,
    pub documents: DocumentState,
    pub commissions: CommissionState,
    pub users: UserState,
    pub contents: ContentState,
}

impl AppState {
    /// State whose collections go stale `ttl` after being fetched.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            associations: AssociationState::with_ttl(ttl),
            projects: ProjectState::with_ttl(ttl),
            documents: DocumentState::with_ttl(ttl),
            commissions: CommissionState::with_ttl(ttl),
            users: UserState::with_ttl(ttl),
            contents: ContentState {
                contents: Collection::new().with_ttl(ttl),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charters() {
        let mut state = DocumentState::default();
        state.documents.set(vec![
            Document {
                id: 1,
                process_type: "CHARTER_ASSOCIATION".into(),
                ..Default::default()
            },
            Document {
                id: 2,
                process_type: "DOCUMENT_PROJECT".into(),
                ..Default::default()
            },
        ]);
        state.uploads.set(vec![
            DocumentUpload {
                id: 10,
                document: 1,
                ..Default::default()
            },
            DocumentUpload {
                id: 11,
                document: 2,
                ..Default::default()
            },
        ]);
        let charters: Vec<i64> = state.charters().iter().map(|u| u.id).collect();
        assert_eq!(charters, vec![10]);
    }

    #[test]
    fn test_replace_updates_list_and_current() {
        let mut state = AssociationState::default();
        let original = Association {
            id: 1,
            name: "Old".into(),
            ..Default::default()
        };
        state.associations.set(vec![original.clone()]);
        state.current = Some(original);

        state.replace(Association {
            id: 1,
            name: "New".into(),
            ..Default::default()
        });
        assert_eq!(state.associations.items()[0].name, "New");
        assert_eq!(state.current.as_ref().map(|a| a.name.as_str()), Some("New"));

        state.remove(1);
        assert!(state.associations.is_empty());
        assert!(state.current.is_none());
    }

    #[test]
    fn test_labels() {
        let mut state = AssociationState::default();
        state.institutions.set(vec![Institution {
            id: 1,
            name: "University".into(),
            acronym: "UNI".into(),
        }]);
        assert_eq!(state.institution_label(Some(1)), Some("UNI"));
        assert_eq!(state.institution_label(Some(2)), None);
        assert_eq!(state.institution_label(None), None);
    }
}
