//! Document types and uploaded files.

use serde::{Deserialize, Serialize};

/// Process type prefix shared by every association charter document.
pub const CHARTER_PROCESS_PREFIX: &str = "CHARTER";

/// A document type, e.g. "Charte des associations".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: i64,
    pub name: String,
    pub acronym: Option<String>,
    pub process_type: String,
    pub is_multiple: bool,
    pub is_required_in_process: bool,
    pub institution: Option<i64>,
    pub fund: Option<i64>,
    pub mime_types: Vec<String>,
}

impl Document {
    pub fn is_charter(&self) -> bool {
        self.process_type.starts_with(CHARTER_PROCESS_PREFIX)
    }

    /// Whether a file of this MIME type may be uploaded. An empty list accepts anything.
    pub fn accepts(&self, mime: &str) -> bool {
        self.mime_types.is_empty() || self.mime_types.iter().any(|m| m == mime)
    }
}

/// A file uploaded against a [`Document`].
///
/// Belongs to exactly one of `association` or `user`, optionally for a `project`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentUpload {
    pub id: i64,
    pub name: String,
    pub path_file: Option<String>,
    pub document: i64,
    pub project: Option<i64>,
    pub association: Option<i64>,
    pub user: Option<String>,
    pub validated_date: Option<String>,
    pub upload_date: Option<String>,
}

impl DocumentUpload {
    pub fn is_validated(&self) -> bool {
        self.validated_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accepts() {
        let mut document = Document::default();
        assert!(document.accepts("application/pdf"));

        document.mime_types = vec!["application/pdf".into()];
        assert!(document.accepts("application/pdf"));
        assert!(!document.accepts("image/png"));
    }
}
