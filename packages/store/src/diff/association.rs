//! Association edition: working copy and patch.

use serde::Serialize;

use super::{changed, changed_date, changed_date_keep_empty, changed_number, number_input, DiffError, Patch};
use crate::dates::normalize_opt;
use crate::models::{Association, SocialNetwork};

/// Form-bound copy of an [`Association`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssociationEdit {
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
    pub approval_date: Option<String>,
    pub last_goa_date: Option<String>,
    pub amount_members_allowed: String,
}

impl From<&Association> for AssociationEdit {
    fn from(a: &Association) -> Self {
        Self {
            name: a.name.clone(),
            acronym: a.acronym.clone(),
            description: a.description.clone(),
            activities: a.activities.clone(),
            address: a.address.clone(),
            zipcode: a.zipcode.clone(),
            city: a.city.clone(),
            country: a.country.clone(),
            email: a.email.clone(),
            phone: a.phone.clone(),
            website: a.website.clone(),
            siret: a.siret.clone(),
            president_names: a.president_names.clone(),
            president_phone: a.president_phone.clone(),
            institution: a.institution,
            institution_component: a.institution_component,
            activity_field: a.activity_field,
            social_networks: a.social_networks.clone(),
            is_enabled: a.is_enabled,
            is_public: a.is_public,
            is_site: a.is_site,
            approval_date: normalize_opt(a.approval_date.as_deref()),
            last_goa_date: normalize_opt(a.last_goa_date.as_deref()),
            amount_members_allowed: number_input(&a.amount_members_allowed),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AssociationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siret: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub president_names: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub president_phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_component: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_field: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_networks: Option<Vec<SocialNetwork>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_site: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_goa_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_members_allowed: Option<Option<i64>>,
}

impl Patch for AssociationPatch {}

/// Social networks count as changed when the lists differ in length or when a server
/// entry has no `(type, location)` match in the edited list.
pub fn social_networks_changed(edited: &[SocialNetwork], reference: &[SocialNetwork]) -> bool {
    edited.len() != reference.len()
        || reference.iter().any(|server| {
            !edited
                .iter()
                .any(|e| e.kind == server.kind && e.location == server.location)
        })
}

impl AssociationEdit {
    /// Fields of `self` that differ from the server copy.
    ///
    /// `last_goa_date` left empty is never reported: clearing it from the form is not
    /// supported by the API.
    pub fn diff(&self, reference: &Association) -> Result<AssociationPatch, DiffError> {
        Ok(AssociationPatch {
            name: changed(&self.name, &reference.name),
            acronym: changed(&self.acronym, &reference.acronym),
            description: changed(&self.description, &reference.description),
            activities: changed(&self.activities, &reference.activities),
            address: changed(&self.address, &reference.address),
            zipcode: changed(&self.zipcode, &reference.zipcode),
            city: changed(&self.city, &reference.city),
            country: changed(&self.country, &reference.country),
            email: changed(&self.email, &reference.email),
            phone: changed(&self.phone, &reference.phone),
            website: changed(&self.website, &reference.website),
            siret: changed(&self.siret, &reference.siret),
            president_names: changed(&self.president_names, &reference.president_names),
            president_phone: changed(&self.president_phone, &reference.president_phone),
            institution: changed(&self.institution, &reference.institution),
            institution_component: changed(
                &self.institution_component,
                &reference.institution_component,
            ),
            activity_field: changed(&self.activity_field, &reference.activity_field),
            social_networks: social_networks_changed(
                &self.social_networks,
                &reference.social_networks,
            )
            .then(|| self.social_networks.clone()),
            is_enabled: changed(&self.is_enabled, &reference.is_enabled),
            is_public: changed(&self.is_public, &reference.is_public),
            is_site: changed(&self.is_site, &reference.is_site),
            approval_date: changed_date(
                "approval_date",
                self.approval_date.as_deref(),
                reference.approval_date.as_deref(),
            )?,
            last_goa_date: changed_date_keep_empty(
                "last_goa_date",
                self.last_goa_date.as_deref(),
                reference.last_goa_date.as_deref(),
            )?,
            amount_members_allowed: changed_number(
                "amount_members_allowed",
                &self.amount_members_allowed,
                &reference.amount_members_allowed,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_copy() -> Association {
        Association {
            id: 1,
            name: "Chess Club".into(),
            acronym: Some("CC".into()),
            institution: Some(2),
            social_networks: vec![
                SocialNetwork::new("Mastodon", "@chess"),
                SocialNetwork::new("Website", "https://chess.example"),
            ],
            is_public: true,
            approval_date: Some("2021-09-01".into()),
            last_goa_date: Some("2022-10-27 13:45:35.000000 +00:00".into()),
            amount_members_allowed: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_unchanged_copy_yields_empty_patch() {
        let reference = server_copy();
        let edit = AssociationEdit::from(&reference);
        let patch = edit.diff(&reference).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.to_body(), json!({}));
    }

    #[test]
    fn test_single_scalar_change() {
        let reference = server_copy();
        let mut edit = AssociationEdit::from(&reference);
        edit.name = "Chess & Go Club".into();

        let patch = edit.diff(&reference).unwrap();
        assert_eq!(patch.changed_fields(), vec!["name"]);
        assert_eq!(patch.to_body(), json!({ "name": "Chess & Go Club" }));
    }

    #[test]
    fn test_clearing_optional_field_emits_null() {
        let reference = server_copy();
        let mut edit = AssociationEdit::from(&reference);
        edit.acronym = None;

        let patch = edit.diff(&reference).unwrap();
        assert_eq!(patch.to_body(), json!({ "acronym": null }));
    }

    #[test]
    fn test_numeric_input_is_parsed() {
        let reference = server_copy();
        let mut edit = AssociationEdit::from(&reference);
        edit.amount_members_allowed = " 4 ".into();
        assert!(edit.diff(&reference).unwrap().is_empty());

        edit.amount_members_allowed = "6".into();
        assert_eq!(
            edit.diff(&reference).unwrap().to_body(),
            json!({ "amount_members_allowed": 6 })
        );

        edit.amount_members_allowed = "six".into();
        assert!(matches!(
            edit.diff(&reference),
            Err(DiffError::InvalidNumber { field: "amount_members_allowed", .. })
        ));
    }

    #[test]
    fn test_dates() {
        let reference = server_copy();
        let mut edit = AssociationEdit::from(&reference);
        assert_eq!(edit.last_goa_date.as_deref(), Some("2022-10-27"));

        edit.last_goa_date = None;
        assert!(edit.diff(&reference).unwrap().is_empty());

        edit.last_goa_date = Some("2023-06-30".into());
        edit.approval_date = None;
        assert_eq!(
            edit.diff(&reference).unwrap().to_body(),
            json!({ "approval_date": null, "last_goa_date": "2023-06-30" })
        );

        let mut edit = AssociationEdit::from(&reference);
        edit.approval_date = Some("2021-9-1".into());
        assert_eq!(
            edit.diff(&reference),
            Err(DiffError::InvalidDate {
                field: "approval_date",
                value: "2021-9-1".into()
            })
        );
    }

    #[test]
    fn test_social_networks() {
        let reference = server_copy();
        let mut edit = AssociationEdit::from(&reference);

        edit.social_networks.reverse();
        assert!(edit.diff(&reference).unwrap().is_empty());

        edit.social_networks[0].location = "@chessclub".into();
        let patch = edit.diff(&reference).unwrap();
        assert_eq!(patch.social_networks, Some(edit.social_networks.clone()));

        let mut edit = AssociationEdit::from(&reference);
        edit.social_networks.pop();
        assert_eq!(patch_fields(&edit, &reference), vec!["social_networks"]);
    }

    fn patch_fields(edit: &AssociationEdit, reference: &Association) -> Vec<String> {
        edit.diff(reference).unwrap().changed_fields()
    }
}
