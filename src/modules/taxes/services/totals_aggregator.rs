use rust_decimal::Decimal;

use crate::core::{round2, round_to_integer};
use crate::modules::taxes::models::{InvoiceTotals, LineItem};

/// Sums priced lines into document totals
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalsAggregator;

impl TotalsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate the lines of one document.
    ///
    /// Each component is summed and rounded on its own. With
    /// `should_round_off` the grand total is rounded to a whole unit and the
    /// signed difference is reported as `round_off_amount`.
    pub fn aggregate(
        &self,
        lines: &[LineItem],
        should_round_off: bool,
        include_tax: bool,
    ) -> InvoiceTotals {
        let sum = |amount: fn(&LineItem) -> Decimal| -> Decimal {
            round2(lines.iter().map(amount).sum())
        };

        let sub_total = sum(|line| line.sub_total);
        let discount_amount = sum(|line| line.discount_amount);
        let cgst_amount = sum(|line| line.cgst_amount);
        let sgst_amount = sum(|line| line.sgst_amount);
        let igst_amount = sum(|line| line.igst_amount);
        let cess_ad_valorem = sum(|line| line.cess_ad_valorem_amount);
        let cess_specific = sum(|line| line.cess_specific_amount);
        let state_cess_ad_valorem = sum(|line| line.state_cess_ad_valorem_amount);
        let state_cess_specific = sum(|line| line.state_cess_specific_amount);

        let cess_amount = round2(cess_ad_valorem + cess_specific);
        let state_cess_amount = round2(state_cess_ad_valorem + state_cess_specific);

        let total_before_rounding = if include_tax {
            round2(
                sub_total
                    + cgst_amount
                    + sgst_amount
                    + igst_amount
                    + cess_amount
                    + state_cess_amount,
            )
        } else {
            sub_total
        };

        let (round_off_amount, total_amount) = if should_round_off {
            let rounded = round_to_integer(total_before_rounding);
            (round2(rounded - total_before_rounding), rounded)
        } else {
            (Decimal::ZERO, total_before_rounding)
        };

        InvoiceTotals {
            sub_total,
            discount_amount,
            cgst_amount,
            sgst_amount,
            igst_amount,
            cess_amount,
            state_cess_amount,
            round_off_amount,
            total_amount,
        }
    }
}

/// Aggregate the priced lines of one document
pub fn aggregate_invoice_totals(
    lines: &[LineItem],
    should_round_off: bool,
    include_tax: bool,
) -> InvoiceTotals {
    TotalsAggregator::new().aggregate(lines, should_round_off, include_tax)
}
