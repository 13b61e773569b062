mod document;

pub use document::{CustomFieldsInput, DocumentCalculation, DocumentCalculationRequest};
