//! Commission edition and the funds attached to a commission.

use serde::Serialize;

use super::{changed, changed_date, set_difference, DiffError, Patch, SetChanges};
use crate::dates::normalize_opt;
use crate::models::Commission;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommissionEdit {
    pub name: String,
    pub acronym: Option<String>,
    pub commission_date: Option<String>,
    pub submission_date: Option<String>,
    pub is_open_to_projects: bool,
    pub funds: Vec<i64>,
}

impl CommissionEdit {
    pub fn new(commission: &Commission, funds: Vec<i64>) -> Self {
        Self {
            name: commission.name.clone(),
            acronym: commission.acronym.clone(),
            commission_date: normalize_opt(commission.commission_date.as_deref()),
            submission_date: normalize_opt(commission.submission_date.as_deref()),
            is_open_to_projects: commission.is_open_to_projects,
            funds,
        }
    }

    pub fn diff(&self, reference: &Commission) -> Result<CommissionPatch, DiffError> {
        Ok(CommissionPatch {
            name: changed(&self.name, &reference.name),
            acronym: changed(&self.acronym, &reference.acronym),
            commission_date: changed_date(
                "commission_date",
                self.commission_date.as_deref(),
                reference.commission_date.as_deref(),
            )?,
            submission_date: changed_date(
                "submission_date",
                self.submission_date.as_deref(),
                reference.submission_date.as_deref(),
            )?,
            is_open_to_projects: changed(
                &self.is_open_to_projects,
                &reference.is_open_to_projects,
            ),
        })
    }

    pub fn fund_changes(&self, current: &[i64]) -> SetChanges<i64> {
        set_difference(current, &self.funds)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CommissionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acronym: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open_to_projects: Option<bool>,
}

impl Patch for CommissionPatch {}
