use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::schema::{FieldKind, FieldSchema, SectionId};

/// Value of a single leaf in the requisition record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Check => FieldValue::Flag(false),
            FieldKind::Text => FieldValue::Text(String::new()),
        }
    }

    /// Coerce a stored JSON value into this leaf's kind. Only literal `true`
    /// selects a test; numbers are accepted as text. Anything else yields
    /// `None` and the leaf keeps its current value.
    fn coerce(kind: FieldKind, value: &Value) -> Option<Self> {
        match (kind, value) {
            (FieldKind::Check, Value::Bool(b)) => Some(FieldValue::Flag(*b)),
            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Number(n)) => Some(FieldValue::Text(n.to_string())),
            _ => None,
        }
    }
}

/// A complete blood test requisition.
///
/// Every leaf declared in [`crate::schema::SECTIONS`] is always present:
/// check leaves default to `false`, text leaves to `""`. Deserialization is
/// lenient and never fails on shape; missing sections and leaves take their
/// defaults and unknown keys are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Requisition {
    sections: BTreeMap<SectionId, BTreeMap<&'static str, FieldValue>>,
}

impl Default for Requisition {
    fn default() -> Self {
        let sections = SectionId::ALL
            .into_iter()
            .map(|id| {
                let leaves = id
                    .schema()
                    .fields
                    .iter()
                    .map(|f| (f.key, FieldValue::default_for(f.kind)))
                    .collect();
                (id, leaves)
            })
            .collect();
        Self { sections }
    }
}

impl<'de> Deserialize<'de> for Requisition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Requisition::from_value(&value))
    }
}

impl Requisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a normalized record from an arbitrary stored document.
    pub fn from_value(value: &Value) -> Self {
        let mut record = Self::default();
        record.merge_value(value);
        record
    }

    /// Merge a (possibly partial) JSON document over this record.
    pub fn merge_value(&mut self, value: &Value) {
        let Some(object) = value.as_object() else {
            return;
        };
        for (id, leaves) in self.sections.iter_mut() {
            let Some(incoming) = object.get(id.key()).and_then(Value::as_object) else {
                continue;
            };
            for field in id.schema().fields {
                if let Some(v) = incoming
                    .get(field.key)
                    .and_then(|v| FieldValue::coerce(field.kind, v))
                {
                    leaves.insert(field.key, v);
                }
            }
        }
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        for (id, leaves) in &self.sections {
            let section = leaves
                .iter()
                .map(|(k, v)| {
                    let v = match v {
                        FieldValue::Flag(b) => Value::Bool(*b),
                        FieldValue::Text(s) => Value::String(s.clone()),
                    };
                    (k.to_string(), v)
                })
                .collect();
            object.insert(id.key().to_string(), Value::Object(section));
        }
        Value::Object(object)
    }

    /// Whether a check leaf is selected. Unknown leaves read as `false`.
    pub fn flag(&self, section: SectionId, key: &str) -> bool {
        matches!(self.leaf(section, key), Some(FieldValue::Flag(true)))
    }

    /// Text leaf value. Unknown leaves read as `""`.
    pub fn text(&self, section: SectionId, key: &str) -> &str {
        match self.leaf(section, key) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    /// A text leaf that is empty or whitespace only.
    pub fn is_blank(&self, section: SectionId, key: &str) -> bool {
        self.text(section, key).trim().is_empty()
    }

    pub fn set_flag(&mut self, section: SectionId, key: &str, value: bool) -> Result<(), CoreError> {
        let field = Self::field(section, key, FieldKind::Check)?;
        self.insert(section, field, FieldValue::Flag(value));
        Ok(())
    }

    pub fn set_text(
        &mut self,
        section: SectionId,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let field = Self::field(section, key, FieldKind::Text)?;
        self.insert(section, field, FieldValue::Text(value.into()));
        Ok(())
    }

    /// True when at least one check leaf of the section is selected.
    pub fn any_flag(&self, section: SectionId) -> bool {
        section.schema().checks().any(|f| self.flag(section, f.key))
    }

    /// Selected check leaves of a section, in schema order.
    pub fn selected(&self, section: SectionId) -> Vec<&'static FieldSchema> {
        section
            .schema()
            .checks()
            .filter(|f| self.flag(section, f.key))
            .collect()
    }

    fn leaf(&self, section: SectionId, key: &str) -> Option<&FieldValue> {
        self.sections.get(&section)?.get(key)
    }

    fn insert(&mut self, section: SectionId, field: &'static FieldSchema, value: FieldValue) {
        self.sections
            .entry(section)
            .or_default()
            .insert(field.key, value);
    }

    fn field(
        section: SectionId,
        key: &str,
        expected: FieldKind,
    ) -> Result<&'static FieldSchema, CoreError> {
        let field = section
            .schema()
            .field(key)
            .ok_or_else(|| CoreError::UnknownField {
                section: section.key().to_string(),
                field: key.to_string(),
            })?;
        if field.kind != expected {
            return Err(CoreError::KindMismatch {
                section: section.key().to_string(),
                field: key.to_string(),
                expected: field.kind.as_str(),
            });
        }
        Ok(field)
    }
}
