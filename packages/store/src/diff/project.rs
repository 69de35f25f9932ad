//! # Project submission and project review
//!
//! [`ProjectEdit`] covers the submission form: general information, dates and budget.
//! Budget inputs are strings in the form and numbers on the wire, so they go through
//! [`changed_number`]. Categories are diffed separately with
//! [`ProjectEdit::category_changes`] because they are synchronised through their own
//! endpoint rather than patched.
//!
//! [`ReviewEdit`] is the post-project review filled in once the project is over.

use serde::Serialize;

use super::{
    changed, changed_date, changed_number, number_input, set_difference, DiffError, Patch,
    SetChanges,
};
use crate::dates::normalize_opt;
use crate::models::Project;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectEdit {
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
    pub target_audience: Option<String>,
    pub partner_association: Option<String>,
    pub association_user: Option<i64>,
    pub budget_previous_edition: String,
    pub amount_students_audience: String,
    pub amount_all_audience: String,
    pub ticket_price: String,
    pub student_ticket_price: String,
    pub individual_cost: String,
    pub categories: Vec<i64>,
}

impl From<&Project> for ProjectEdit {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name.clone(),
            planned_start_date: normalize_opt(p.planned_start_date.as_deref()),
            planned_end_date: normalize_opt(p.planned_end_date.as_deref()),
            location: p.location.clone(),
            goals: p.goals.clone(),
            summary: p.summary.clone(),
            planned_activities: p.planned_activities.clone(),
            prevention_helpers: p.prevention_helpers.clone(),
            prevention_safety: p.prevention_safety.clone(),
            marketing_campaign: p.marketing_campaign.clone(),
            sustainable_development: p.sustainable_development.clone(),
            target_audience: p.target_audience.clone(),
            partner_association: p.partner_association.clone(),
            association_user: p.association_user,
            budget_previous_edition: number_input(&p.budget_previous_edition),
            amount_students_audience: number_input(&p.amount_students_audience),
            amount_all_audience: number_input(&p.amount_all_audience),
            ticket_price: number_input(&p.ticket_price),
            student_ticket_price: number_input(&p.student_ticket_price),
            individual_cost: number_input(&p.individual_cost),
            categories: p.categories.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_start_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_end_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_activities: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevention_helpers: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevention_safety: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_campaign: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustainable_development: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_association: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_user: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_previous_edition: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_students_audience: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_all_audience: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_ticket_price: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_cost: Option<Option<f64>>,
}

impl Patch for ProjectPatch {}

impl ProjectEdit {
    pub fn diff(&self, reference: &Project) -> Result<ProjectPatch, DiffError> {
        Ok(ProjectPatch {
            name: changed(&self.name, &reference.name),
            planned_start_date: changed_date(
                "planned_start_date",
                self.planned_start_date.as_deref(),
                reference.planned_start_date.as_deref(),
            )?,
            planned_end_date: changed_date(
                "planned_end_date",
                self.planned_end_date.as_deref(),
                reference.planned_end_date.as_deref(),
            )?,
            location: changed(&self.location, &reference.location),
            goals: changed(&self.goals, &reference.goals),
            summary: changed(&self.summary, &reference.summary),
            planned_activities: changed(&self.planned_activities, &reference.planned_activities),
            prevention_helpers: changed(&self.prevention_helpers, &reference.prevention_helpers),
            prevention_safety: changed(&self.prevention_safety, &reference.prevention_safety),
            marketing_campaign: changed(&self.marketing_campaign, &reference.marketing_campaign),
            sustainable_development: changed(
                &self.sustainable_development,
                &reference.sustainable_development,
            ),
            target_audience: changed(&self.target_audience, &reference.target_audience),
            partner_association: changed(
                &self.partner_association,
                &reference.partner_association,
            ),
            association_user: changed(&self.association_user, &reference.association_user),
            budget_previous_edition: changed_number(
                "budget_previous_edition",
                &self.budget_previous_edition,
                &reference.budget_previous_edition,
            )?,
            amount_students_audience: changed_number(
                "amount_students_audience",
                &self.amount_students_audience,
                &reference.amount_students_audience,
            )?,
            amount_all_audience: changed_number(
                "amount_all_audience",
                &self.amount_all_audience,
                &reference.amount_all_audience,
            )?,
            ticket_price: changed_number("ticket_price", &self.ticket_price, &reference.ticket_price)?,
            student_ticket_price: changed_number(
                "student_ticket_price",
                &self.student_ticket_price,
                &reference.student_ticket_price,
            )?,
            individual_cost: changed_number(
                "individual_cost",
                &self.individual_cost,
                &reference.individual_cost,
            )?,
        })
    }

    /// Categories to attach to and detach from the server copy.
    pub fn category_changes(&self, reference: &Project) -> SetChanges<i64> {
        set_difference(&reference.categories, &self.categories)
    }
}

/// Form-bound copy of the review fields of a [`Project`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewEdit {
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

impl From<&Project> for ReviewEdit {
    fn from(p: &Project) -> Self {
        Self {
            outcome: p.outcome.clone(),
            review: p.review.clone(),
            impact_students: p.impact_students.clone(),
            description: p.description.clone(),
            difficulties: p.difficulties.clone(),
            improvements: p.improvements.clone(),
            real_start_date: normalize_opt(p.real_start_date.as_deref()),
            real_end_date: normalize_opt(p.real_end_date.as_deref()),
            real_location: p.real_location.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_students: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulties: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_start_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_end_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_location: Option<Option<String>>,
}

impl Patch for ReviewPatch {}

impl ReviewEdit {
    pub fn diff(&self, reference: &Project) -> Result<ReviewPatch, DiffError> {
        Ok(ReviewPatch {
            outcome: changed(&self.outcome, &reference.outcome),
            review: changed(&self.review, &reference.review),
            impact_students: changed(&self.impact_students, &reference.impact_students),
            description: changed(&self.description, &reference.description),
            difficulties: changed(&self.difficulties, &reference.difficulties),
            improvements: changed(&self.improvements, &reference.improvements),
            real_start_date: changed_date(
                "real_start_date",
                self.real_start_date.as_deref(),
                reference.real_start_date.as_deref(),
            )?,
            real_end_date: changed_date(
                "real_end_date",
                self.real_end_date.as_deref(),
                reference.real_end_date.as_deref(),
            )?,
            real_location: changed(&self.real_location, &reference.real_location),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_copy() -> Project {
        Project {
            id: 7,
            name: "Spring Festival".into(),
            planned_start_date: Some("2024-04-01T08:00:00Z".into()),
            planned_end_date: Some("2024-04-03T22:00:00Z".into()),
            association: Some(1),
            budget_previous_edition: Some(1500.0),
            amount_students_audience: Some(300),
            ticket_price: Some(12.5),
            categories: vec![1, 4],
            ..Default::default()
        }
    }

    #[test]
    fn test_unchanged_project() {
        let reference = server_copy();
        let edit = ProjectEdit::from(&reference);
        assert_eq!(edit.budget_previous_edition, "1500");
        assert!(edit.diff(&reference).unwrap().is_empty());
        assert!(edit.category_changes(&reference).is_empty());
    }

    #[test]
    fn test_budget_change_emits_number() {
        let reference = server_copy();
        let mut edit = ProjectEdit::from(&reference);
        edit.ticket_price = "15".into();

        let patch = edit.diff(&reference).unwrap();
        assert_eq!(patch.to_body(), json!({ "ticket_price": 15.0 }));
    }

    #[test]
    fn test_malformed_budget() {
        let reference = server_copy();
        let mut edit = ProjectEdit::from(&reference);
        edit.amount_all_audience = "12a".into();
        assert_eq!(
            edit.diff(&reference),
            Err(DiffError::InvalidNumber {
                field: "amount_all_audience",
                value: "12a".into()
            })
        );
    }

    #[test]
    fn test_non_finite_price_is_rejected() {
        let reference = server_copy();
        for raw in ["NaN", "inf"] {
            let mut edit = ProjectEdit::from(&reference);
            edit.ticket_price = raw.into();
            assert_eq!(
                edit.diff(&reference),
                Err(DiffError::InvalidNumber {
                    field: "ticket_price",
                    value: raw.into()
                })
            );
        }
    }

    #[test]
    fn test_category_changes() {
        let reference = server_copy();
        let mut edit = ProjectEdit::from(&reference);
        edit.categories = vec![4, 2, 3];

        let changes = edit.category_changes(&reference);
        assert_eq!(changes.to_add, vec![2, 3]);
        assert_eq!(changes.to_remove, vec![1]);
    }

    #[test]
    fn test_review_diff() {
        let mut reference = server_copy();
        reference.real_start_date = Some("2024-04-01 10:00:00.000000 +00:00".into());
        let mut edit = ReviewEdit::from(&reference);
        assert!(edit.diff(&reference).unwrap().is_empty());

        edit.outcome = Some("Sold out".into());
        edit.real_end_date = Some("2024-04-04".into());
        assert_eq!(
            edit.diff(&reference).unwrap().to_body(),
            json!({ "outcome": "Sold out", "real_end_date": "2024-04-04" })
        );

        edit.real_start_date = Some("first of april".into());
        assert!(matches!(
            edit.diff(&reference),
            Err(DiffError::InvalidDate { field: "real_start_date", .. })
        ));
    }
}
