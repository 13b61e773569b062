pub mod tax_calculator;
pub mod totals_aggregator;

pub use tax_calculator::{calculate_line_item, TaxCalculator};
pub use totals_aggregator::{aggregate_invoice_totals, TotalsAggregator};
