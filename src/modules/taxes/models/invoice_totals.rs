use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate amounts of one document, summed over its priced lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub sub_total: Decimal,
    pub discount_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    /// Ad valorem plus specific cess
    pub cess_amount: Decimal,
    /// Ad valorem plus specific state cess
    pub state_cess_amount: Decimal,
    /// Signed correction applied to reach a whole-unit total
    pub round_off_amount: Decimal,
    pub total_amount: Decimal,
}

impl InvoiceTotals {
    /// Every tax and cess component of the document
    pub fn tax_amount(&self) -> Decimal {
        self.cgst_amount
            + self.sgst_amount
            + self.igst_amount
            + self.cess_amount
            + self.state_cess_amount
    }
}
