// Formulas module

pub mod controllers;
pub mod error;
pub mod models;
pub mod services;

pub use error::FormulaError;
pub use models::{FieldDefinition, FieldDiagnostic, FieldType, FieldValue, FieldValues, Resolution};
pub use services::{resolve_formula_fields, DependencyGraph, ExpressionEvaluator, FormulaResolver};
