//! Projects submitted for funding, their categories and per-fund requests.

use serde::{Deserialize, Serialize};

use super::SelectOption;

/// A project as returned by `/projects/{id}`.
///
/// A project is carried by exactly one of `user` or `association`; when it is carried by
/// an association, `association_user` is the member who submitted it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub planned_start_date: Option<String>,
    pub planned_end_date: Option<String>,
    pub location: Option<String>,
    pub goals: Option<String>,
    pub summary: Option<String>,
    pub planned_activities: Option<String>,
    pub prevention_helpers: Option<String>,
    pub prevention_safety: Option<String>,
    pub marketing_campaign: Option<String>,
    pub sustainable_development: Option<String>,
    pub budget_previous_edition: Option<f64>,
    pub target_audience: Option<String>,
    pub amount_students_audience: Option<i64>,
    pub amount_all_audience: Option<i64>,
    pub ticket_price: Option<f64>,
    pub student_ticket_price: Option<f64>,
    pub individual_cost: Option<f64>,
    pub partner_association: Option<String>,
    pub association: Option<i64>,
    pub user: Option<i64>,
    pub association_user: Option<i64>,
    pub project_status: Option<String>,
    pub categories: Vec<i64>,
    pub creation_date: Option<String>,
    pub edition_date: Option<String>,
    pub processing_date: Option<String>,
    pub outcome: Option<String>,
    pub review: Option<String>,
    pub impact_students: Option<String>,
    pub description: Option<String>,
    pub difficulties: Option<String>,
    pub improvements: Option<String>,
    pub real_start_date: Option<String>,
    pub real_end_date: Option<String>,
    pub real_location: Option<String>,
}

impl Project {
    /// Whether the project is carried by an association rather than an individual.
    pub fn is_association_project(&self) -> bool {
        self.association.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectCategory {
    pub id: i64,
    pub name: String,
}

impl From<&ProjectCategory> for SelectOption {
    fn from(c: &ProjectCategory) -> Self {
        SelectOption::new(c.id, c.name.clone())
    }
}

/// Amount requested from one commission fund for one project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectCommissionFund {
    pub project: i64,
    pub commission_fund: i64,
    pub amount_asked: Option<f64>,
    pub amount_earned: Option<f64>,
    pub is_first_edition: bool,
    pub added_text: Option<String>,
    pub is_validated_by_admin: Option<bool>,
}
