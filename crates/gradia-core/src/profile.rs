//! # Profile Module
//!
//! Profile records and section completeness.
//!
//! A profile record is a flat mapping from field name to value, owned by
//! the platform's profile store and handed to the tier evaluator as-is.
//! Fields are grouped into fixed sections; a section is complete only when
//! every field in it is individually complete (no partial credit).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// SECTION FIELD SETS
// =============================================================================

/// Basic fields, populated at signup for any registered identity.
///
/// Never checked against the record: a member cannot exist without them,
/// so the Basic section is treated as axiomatically complete.
pub const BASIC_FIELDS: [&str; 2] = ["nickname", "email"];

/// General profile fields, required for level 2.
pub const GENERAL_FIELDS: [&str; 5] = [
    "first_name",
    "last_name",
    "gender",
    "date_of_birth",
    "postcode",
];

/// Demographic & lifestyle fields, required for level 3.
pub const DEMOGRAPHIC_FIELDS: [&str; 11] = [
    "interests",
    "hobbies",
    "occupation",
    "marital_status",
    "income_range",
    "education",
    "ethnicity",
    "languages_spoken",
    "home_ownership",
    "vehicle_ownership",
    "pet_ownership",
];

/// Field holding the identity-verification review outcome.
pub const VERIFICATION_FIELD: &str = "verification_status";

/// The only verification value that unlocks level 4.
pub const VERIFICATION_APPROVED: &str = "approved";

// =============================================================================
// SECTIONS
// =============================================================================

/// Named group of fields gating a membership level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Basic,
    General,
    Demographic,
    Verification,
}

impl Section {
    /// Human-readable section title, as shown in completion summaries.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Basic => "Basic Profile",
            Self::General => "General Profile",
            Self::Demographic => "Demographic & Lifestyle",
            Self::Verification => "Verification",
        }
    }

    /// The fields belonging to this section.
    #[must_use]
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &BASIC_FIELDS,
            Self::General => &GENERAL_FIELDS,
            Self::Demographic => &DEMOGRAPHIC_FIELDS,
            Self::Verification => &[VERIFICATION_FIELD],
        }
    }
}

// =============================================================================
// FIELD VALUE
// =============================================================================

/// Value of a single profile field.
///
/// In human-readable formats this is untagged, so JSON `"Alice"`,
/// `["en", "fr"]`, and `null` all map directly. Binary formats (postcard
/// snapshots, redb rows) use a tagged encoding instead, since untagged
/// enums need a self-describing format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Scalar text value.
    Text(String),
    /// Sequence value, e.g. `languages_spoken`.
    List(Vec<String>),
    /// Explicit null. Counts as incomplete, same as an absent field.
    Null,
}

/// Tagged mirror of [`FieldValue`] for non-self-describing formats.
#[derive(Serialize)]
enum TaggedFieldValueRef<'a> {
    Text(&'a str),
    List(&'a [String]),
    Null,
}

#[derive(Deserialize)]
enum TaggedFieldValue {
    Text(String),
    List(Vec<String>),
    Null,
}

impl From<TaggedFieldValue> for FieldValue {
    fn from(tagged: TaggedFieldValue) -> Self {
        match tagged {
            TaggedFieldValue::Text(text) => Self::Text(text),
            TaggedFieldValue::List(items) => Self::List(items),
            TaggedFieldValue::Null => Self::Null,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            match self {
                Self::Text(text) => serializer.serialize_str(text),
                Self::List(items) => items.serialize(serializer),
                Self::Null => serializer.serialize_none(),
            }
        } else {
            let tagged = match self {
                Self::Text(text) => TaggedFieldValueRef::Text(text),
                Self::List(items) => TaggedFieldValueRef::List(items),
                Self::Null => TaggedFieldValueRef::Null,
            };
            tagged.serialize(serializer)
        }
    }
}

struct HumanReadableVisitor;

impl<'de> serde::de::Visitor<'de> for HumanReadableVisitor {
    type Value = FieldValue;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a string, a sequence of strings, or null")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldValue::Text(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldValue::Text(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<String>()? {
            items.push(item);
        }
        Ok(FieldValue::List(items))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(FieldValue::Null)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(HumanReadableVisitor)
        } else {
            TaggedFieldValue::deserialize(deserializer).map(Into::into)
        }
    }
}

impl FieldValue {
    /// Completeness of this value alone.
    ///
    /// A scalar is complete when it is not the empty string. A list is
    /// complete when it holds at least one element that is non-empty after
    /// trimming whitespace.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::List(items) => items.iter().any(|item| !item.trim().is_empty()),
            Self::Null => false,
        }
    }

    /// Convenience constructor for scalar values.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Convenience constructor for list values.
    #[must_use]
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// PROFILE RECORD
// =============================================================================

/// A member's profile record: field name -> value.
///
/// Serialized transparently as the inner map, so a JSON body like
/// `{"first_name": "Alice", "languages_spoken": ["en"]}` is a valid record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl ProfileRecord {
    /// Create an empty record (evaluates to level 1).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field value. Absent fields return `None`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Set or replace a field value.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Remove a field, returning its previous value.
    pub fn clear(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// Number of fields present (including null ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record holds no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Completeness of a single field: present, non-null, and non-blank
    /// per [`FieldValue::is_complete`].
    #[must_use]
    pub fn field_complete(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(FieldValue::is_complete)
    }

    /// AND over a field set: complete only when every field is complete.
    #[must_use]
    pub fn section_complete(&self, fields: &[&str]) -> bool {
        fields.iter().all(|field| self.field_complete(field))
    }

    /// The subset of `fields` that is incomplete, in declaration order.
    #[must_use]
    pub fn missing_fields(&self, fields: &'static [&'static str]) -> Vec<&'static str> {
        fields
            .iter()
            .filter(|field| !self.field_complete(field))
            .copied()
            .collect()
    }

    /// Whether identity verification has been approved.
    ///
    /// Only the exact scalar `"approved"` counts; `"pending"`,
    /// `"rejected"`, and anything else do not.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(
            self.fields.get(VERIFICATION_FIELD),
            Some(FieldValue::Text(status)) if status == VERIFICATION_APPROVED
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
