//! Commissions and the funds they allocate.

use serde::{Deserialize, Serialize};

use super::SelectOption;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commission {
    pub id: i64,
    pub name: String,
    pub acronym: Option<String>,
    pub commission_date: Option<String>,
    pub submission_date: Option<String>,
    pub is_open_to_projects: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fund {
    pub id: i64,
    pub name: String,
    pub acronym: String,
    pub institution: Option<i64>,
}

/// Link between a commission and a fund it distributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionFund {
    pub id: i64,
    pub commission: i64,
    pub fund: i64,
}

impl From<&Commission> for SelectOption {
    fn from(c: &Commission) -> Self {
        SelectOption::new(c.id, c.name.clone())
    }
}

impl From<&Fund> for SelectOption {
    fn from(f: &Fund) -> Self {
        SelectOption::new(f.id, f.acronym.clone())
    }
}
