use rust_decimal::Decimal;

use crate::core::{percent_of, round2};
use crate::modules::taxes::models::{LineItem, LineItemInput};

/// TaxCalculator prices a single document line.
///
/// Every intermediate amount is rounded to 2 places as soon as it is
/// produced, so totals match a step-by-step manual computation exactly.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator;

impl TaxCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Price one line.
    ///
    /// GST is split into equal CGST and SGST halves for intra-state supply and
    /// charged whole as IGST for inter-state supply, never both. Cess and
    /// state cess components are independent percentages of the subtotal.
    /// With `include_tax` false the taxes are still reported but left out of
    /// `total_amount`.
    pub fn calculate_line(&self, item: &LineItemInput, include_tax: bool) -> LineItem {
        let quantity = item.effective_quantity();
        let base_amount = round2(item.rate * quantity);

        let percentage_discount = percent_of(
            base_amount,
            item.percentage_discount.unwrap_or(Decimal::ZERO),
        );
        let discount_amount =
            round2(percentage_discount + item.fixed_discount.unwrap_or(Decimal::ZERO));
        let sub_total = round2(base_amount - discount_amount);

        let gst_rate = item.gst_rate.unwrap_or(Decimal::ZERO);
        let (cgst_amount, sgst_amount, igst_amount) = if item.is_inter_state {
            (Decimal::ZERO, Decimal::ZERO, percent_of(sub_total, gst_rate))
        } else {
            let half_rate = gst_rate / Decimal::TWO;
            (
                percent_of(sub_total, half_rate),
                percent_of(sub_total, half_rate),
                Decimal::ZERO,
            )
        };

        let cess_ad_valorem_amount = self.calculate_component(sub_total, item.cess_ad_valorem_rate);
        let cess_specific_amount = self.calculate_component(sub_total, item.cess_specific_rate);
        let state_cess_ad_valorem_amount =
            self.calculate_component(sub_total, item.state_cess_ad_valorem_rate);
        let state_cess_specific_amount =
            self.calculate_component(sub_total, item.state_cess_specific_rate);

        let total_amount = if include_tax {
            round2(
                sub_total
                    + cgst_amount
                    + sgst_amount
                    + igst_amount
                    + cess_ad_valorem_amount
                    + cess_specific_amount
                    + state_cess_ad_valorem_amount
                    + state_cess_specific_amount,
            )
        } else {
            sub_total
        };

        LineItem {
            rate: item.rate,
            quantity,
            fixed_discount: item.fixed_discount,
            percentage_discount: item.percentage_discount,
            gst_rate: item.gst_rate,
            is_inter_state: item.is_inter_state,
            cess_ad_valorem_rate: item.cess_ad_valorem_rate,
            cess_specific_rate: item.cess_specific_rate,
            state_cess_ad_valorem_rate: item.state_cess_ad_valorem_rate,
            state_cess_specific_rate: item.state_cess_specific_rate,
            base_amount,
            sub_total,
            discount_amount,
            cgst_amount,
            sgst_amount,
            igst_amount,
            cess_ad_valorem_amount,
            cess_specific_amount,
            state_cess_ad_valorem_amount,
            state_cess_specific_amount,
            total_amount,
        }
    }

    /// `rate` percent of `taxable`, or zero when the rate is absent
    pub fn calculate_component(&self, taxable: Decimal, rate: Option<Decimal>) -> Decimal {
        rate.map_or(Decimal::ZERO, |rate| percent_of(taxable, rate))
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Price one line of a commercial document
pub fn calculate_line_item(item: &LineItemInput, include_tax: bool) -> LineItem {
    TaxCalculator::new().calculate_line(item, include_tax)
}
