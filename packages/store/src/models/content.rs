use serde::{Deserialize, Serialize};

/// Editable text block shown on public pages, looked up by `code`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub id: i64,
    pub code: String,
    pub label: Option<String>,
    pub header: Option<String>,
    pub body: Option<String>,
    pub footer: Option<String>,
    pub aside: Option<String>,
}
