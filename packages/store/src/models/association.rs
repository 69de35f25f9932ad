//! Associations and the reference data used to classify them.

use serde::{Deserialize, Serialize};

use super::SelectOption;

/// An association as returned by `/associations/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Association {
    pub id: i64,
    pub name: String,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub activities: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub siret: Option<String>,
    pub president_names: Option<String>,
    pub president_phone: Option<String>,
    pub institution: Option<i64>,
    pub institution_component: Option<i64>,
    pub activity_field: Option<i64>,
    pub social_networks: Vec<SocialNetwork>,
    pub is_enabled: bool,
    pub is_public: bool,
    pub is_site: bool,
    pub charter_status: Option<String>,
    pub approval_date: Option<String>,
    pub last_goa_date: Option<String>,
    pub creation_date: Option<String>,
    pub amount_members_allowed: Option<i64>,
    pub path_logo: Option<String>,
}

/// One entry of an association's social network list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialNetwork {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
}

impl SocialNetwork {
    pub fn new(kind: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            location: location.into(),
        }
    }
}

/// Lightweight `/associations/names` projection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationName {
    pub id: i64,
    pub name: String,
    pub has_president: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub id: i64,
    pub name: String,
    pub acronym: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionComponent {
    pub id: i64,
    pub name: String,
    pub institution: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityField {
    pub id: i64,
    pub name: String,
}

impl From<&AssociationName> for SelectOption {
    fn from(a: &AssociationName) -> Self {
        SelectOption::new(a.id, a.name.clone())
    }
}

impl From<&Institution> for SelectOption {
    fn from(i: &Institution) -> Self {
        SelectOption::new(i.id, i.acronym.clone())
    }
}

impl From<&InstitutionComponent> for SelectOption {
    fn from(c: &InstitutionComponent) -> Self {
        SelectOption::new(c.id, c.name.clone())
    }
}

impl From<&ActivityField> for SelectOption {
    fn from(f: &ActivityField) -> Self {
        SelectOption::new(f.id, f.name.clone())
    }
}
