use serde::Serialize;

use super::{changed, Patch};
use crate::models::Content;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentEdit {
    pub label: Option<String>,
    pub header: Option<String>,
    pub body: Option<String>,
    pub footer: Option<String>,
    pub aside: Option<String>,
}

impl From<&Content> for ContentEdit {
    fn from(c: &Content) -> Self {
        Self {
            label: c.label.clone(),
            header: c.header.clone(),
            body: c.body.clone(),
            footer: c.footer.clone(),
            aside: c.aside.clone(),
        }
    }
}

impl ContentEdit {
    pub fn diff(&self, reference: &Content) -> ContentPatch {
        ContentPatch {
            label: changed(&self.label, &reference.label),
            header: changed(&self.header, &reference.header),
            body: changed(&self.body, &reference.body),
            footer: changed(&self.footer, &reference.footer),
            aside: changed(&self.aside, &reference.aside),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aside: Option<Option<String>>,
}

impl Patch for ContentPatch {}
