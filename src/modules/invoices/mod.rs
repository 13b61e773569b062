// Invoices module: whole-document calculation

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CustomFieldsInput, DocumentCalculation, DocumentCalculationRequest};
pub use services::DocumentCalculationService;
