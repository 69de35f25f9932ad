//! # Field diffing for partial updates
//!
//! Every editable entity has a *working copy* (the values a form is bound to) and a
//! *reference copy* (the last representation the server returned). Before submitting,
//! the working copy is compared field by field against the reference and only the
//! fields that differ end up in a typed *patch*, ready to be sent as a `PATCH` body.
//!
//! ## Comparison rules
//!
//! | Field kind | Rule |
//! |------------|------|
//! | Scalar | Strict inequality ([`changed`]). |
//! | Numeric form input | Parsed first, emitted as a number when the parsed value differs ([`changed_number`]). Malformed or non-finite input is a [`DiffError::InvalidNumber`]. |
//! | Date | Both sides reduced with [`normalize_date`](crate::dates::normalize_date) before comparing ([`changed_date`]). Blank input clears, unparsable input is a [`DiffError::InvalidDate`]. |
//! | Id list | Order-independent comparison ([`arrays_are_equal`]). |
//!
//! Patch fields are `Option<_>` (`Option<Option<_>>` for clearable values) skipped on
//! serialisation when `None`, so a patch with no changes serialises to `{}` and
//! [`Patch::is_empty`] holds. Callers skip the request entirely in that case.
//!
//! | Module | Working copy | Patch |
//! |--------|--------------|-------|
//! | [`association`] | [`AssociationEdit`] | [`AssociationPatch`] |
//! | [`project`] | [`ProjectEdit`], [`ReviewEdit`] | [`ProjectPatch`], [`ReviewPatch`] |
//! | [`user`] | [`UserEdit`] | [`UserPatch`] |
//! | [`commission`] | [`CommissionEdit`] | [`CommissionPatch`] |
//! | [`content`] | [`ContentEdit`] | [`ContentPatch`] |

pub mod association;
pub mod commission;
pub mod content;
pub mod project;
pub mod user;

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::dates::normalize_date;

pub use association::{AssociationEdit, AssociationPatch};
pub use commission::{CommissionEdit, CommissionPatch};
pub use content::{ContentEdit, ContentPatch};
pub use project::{ProjectEdit, ProjectPatch, ReviewEdit, ReviewPatch};
pub use user::{UserEdit, UserPatch};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiffError {
    #[error("field `{field}` expects a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("field `{field}` expects a date, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

/// A sparse update body.
pub trait Patch: Serialize {
    /// The patch as a JSON object holding only the changed keys.
    fn to_body(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    fn is_empty(&self) -> bool {
        self.to_body().as_object().map_or(true, |map| map.is_empty())
    }

    /// Names of the changed fields, in serialisation order.
    fn changed_fields(&self) -> Vec<String> {
        match self.to_body() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Ids to add and remove to turn one id set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetChanges<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T> SetChanges<T> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Order-independent comparison of two lists.
pub fn arrays_are_equal<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x)) && b.iter().all(|x| a.contains(x))
}

/// What has to be added to and removed from `current` to obtain `wanted`.
pub fn set_difference<T: PartialEq + Clone>(current: &[T], wanted: &[T]) -> SetChanges<T> {
    let mut changes = SetChanges {
        to_add: Vec::new(),
        to_remove: Vec::new(),
    };
    for item in wanted {
        if !current.contains(item) && !changes.to_add.contains(item) {
            changes.to_add.push(item.clone());
        }
    }
    for item in current {
        if !wanted.contains(item) && !changes.to_remove.contains(item) {
            changes.to_remove.push(item.clone());
        }
    }
    changes
}

/// `Some(edited)` when it differs from `reference`.
pub fn changed<T: PartialEq + Clone>(edited: &T, reference: &T) -> Option<T> {
    (edited != reference).then(|| edited.clone())
}

/// A number a form input can hold.
///
/// `f64::from_str` accepts `NaN` and `inf`, which serialise to `null`; those are not
/// form numbers.
pub trait FormNumber: FromStr + PartialEq + Clone {
    fn is_finite(&self) -> bool {
        true
    }
}

impl FormNumber for i32 {}
impl FormNumber for i64 {}
impl FormNumber for u32 {}
impl FormNumber for u64 {}

impl FormNumber for f32 {
    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }
}

impl FormNumber for f64 {
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

/// Parse a numeric form input. Blank input is no value.
pub fn parse_number<N: FormNumber>(
    field: &'static str,
    raw: &str,
) -> Result<Option<N>, DiffError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.replace(',', ".").parse::<N>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(DiffError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Parse `raw` and compare it to the server's number.
pub fn changed_number<N: FormNumber>(
    field: &'static str,
    raw: &str,
    reference: &Option<N>,
) -> Result<Option<Option<N>>, DiffError> {
    let parsed = parse_number::<N>(field, raw)?;
    Ok(changed(&parsed, reference))
}

/// Parse a date form input. Blank input is no value.
pub fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<String>, DiffError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_date(value)
            .map(Some)
            .ok_or_else(|| DiffError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

/// Compare two dates after normalisation and emit the normalised working value.
pub fn changed_date(
    field: &'static str,
    edited: Option<&str>,
    reference: Option<&str>,
) -> Result<Option<Option<String>>, DiffError> {
    let edited = parse_date(field, edited)?;
    let reference = reference.and_then(normalize_date);
    Ok(changed(&edited, &reference))
}

/// Like [`changed_date`], except that an empty working value means "unchanged".
pub fn changed_date_keep_empty(
    field: &'static str,
    edited: Option<&str>,
    reference: Option<&str>,
) -> Result<Option<Option<String>>, DiffError> {
    if parse_date(field, edited)?.is_none() {
        return Ok(None);
    }
    changed_date(field, edited, reference)
}

/// Render an optional number as the string a numeric input holds.
pub fn number_input<N: ToString>(value: &Option<N>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
