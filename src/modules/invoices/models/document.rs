use serde::{Deserialize, Serialize};

use crate::modules::formulas::models::{FieldDefinition, FieldDiagnostic, FieldValues};
use crate::modules::taxes::models::{InvoiceTotals, LineItem, LineItemRequest};

/// Everything needed to price a document in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCalculationRequest {
    pub line_items: Vec<LineItemRequest>,
    #[serde(default)]
    pub should_round_off: bool,
    #[serde(default = "default_include_tax")]
    pub include_tax: bool,
    /// Template fields and stored values of the document's custom fields
    #[serde(default)]
    pub custom_fields: Option<CustomFieldsInput>,
}

fn default_include_tax() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldsInput {
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub values: FieldValues,
}

/// Priced lines, document totals and resolved custom fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCalculation {
    pub line_items: Vec<LineItem>,
    pub totals: InvoiceTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<FieldValues>,
    #[serde(default)]
    pub diagnostics: Vec<FieldDiagnostic>,
}
