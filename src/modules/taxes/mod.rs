pub mod controllers;
pub mod models;
pub mod services;

pub use models::{InvoiceTotals, LineItem, LineItemInput, LineItemRequest};
pub use services::{aggregate_invoice_totals, calculate_line_item, TaxCalculator, TotalsAggregator};
