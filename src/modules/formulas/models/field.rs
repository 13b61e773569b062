//! Custom field definitions and values carried on transaction records.
//!
//! A field is either supplied directly by the user or, when it carries a
//! formula, derived from the values of other fields on the same record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Data type of a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Number,
    Text,
    Date,
    Boolean,
    Select,
}

/// A custom field declared on a document template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Identifier, unique within a template
    pub id: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Arithmetic expression over other field ids
    #[serde(default)]
    pub formula: Option<String>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            formula: None,
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Formula text, if present and not blank
    pub fn formula(&self) -> Option<&str> {
        self.formula
            .as_deref()
            .map(str::trim)
            .filter(|formula| !formula.is_empty())
    }

    pub fn has_formula(&self) -> bool {
        self.formula().is_some()
    }
}

/// Stored value of a single custom field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: String,
}

impl FieldValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Field values of one record, keyed by field id
pub type FieldValues = HashMap<String, FieldValue>;

/// A degraded outcome recorded while resolving formula fields.
///
/// None of these abort resolution; each names the field left with a fallback
/// value so callers can surface it to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldDiagnostic {
    /// Formula could not be evaluated; value was set to "0"
    EvaluationFailed { field_id: String, message: String },
    /// Field sits on a dependency cycle; prior value kept
    CyclicDependency { field_id: String },
    /// Field depends on a cyclic field; prior value kept
    BlockedByCycle { field_id: String },
}

impl FieldDiagnostic {
    pub fn field_id(&self) -> &str {
        match self {
            FieldDiagnostic::EvaluationFailed { field_id, .. }
            | FieldDiagnostic::CyclicDependency { field_id }
            | FieldDiagnostic::BlockedByCycle { field_id } => field_id,
        }
    }
}

/// Resolved values of a record together with any degraded outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub values: FieldValues,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Value of a field as a plain string
    pub fn value_of(&self, field_id: &str) -> Option<&str> {
        self.values.get(field_id).map(|v| v.value.as_str())
    }
}
