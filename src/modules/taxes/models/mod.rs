mod invoice_totals;
mod line_item;

pub use invoice_totals::InvoiceTotals;
pub use line_item::{LineItem, LineItemInput, LineItemRequest};
