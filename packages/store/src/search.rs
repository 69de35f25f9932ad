//! # Advanced association search
//!
//! [`AssociationFilter`] narrows an association list the way the directory's advanced
//! search form does. Text criteria are case-insensitive substring matches, id criteria
//! match when the association's reference is one of the selected ids. Unset criteria
//! accept everything, so [`AssociationFilter::default`] returns the list unchanged.

use crate::models::Association;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssociationFilter {
    /// Matched against name and acronym.
    pub text: Option<String>,
    pub institutions: Vec<i64>,
    pub components: Vec<i64>,
    pub fields: Vec<i64>,
    pub is_site: Option<bool>,
}

impl AssociationFilter {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.institutions.is_empty()
            && self.components.is_empty()
            && self.fields.is_empty()
            && self.is_site.is_none()
    }

    pub fn matches(&self, association: &Association) -> bool {
        self.matches_text(association)
            && matches_id(&self.institutions, association.institution)
            && matches_id(&self.components, association.institution_component)
            && matches_id(&self.fields, association.activity_field)
            && self.is_site.map_or(true, |site| association.is_site == site)
    }

    pub fn apply<'a>(&self, associations: &'a [Association]) -> Vec<&'a Association> {
        associations.iter().filter(|a| self.matches(a)).collect()
    }

    fn matches_text(&self, association: &Association) -> bool {
        let Some(needle) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();
        association.name.to_lowercase().contains(&needle)
            || association
                .acronym
                .as_deref()
                .is_some_and(|acronym| acronym.to_lowercase().contains(&needle))
    }
}

fn matches_id(selected: &[i64], value: Option<i64>) -> bool {
    selected.is_empty() || value.is_some_and(|id| selected.contains(&id))
}
