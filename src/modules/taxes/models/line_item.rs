//! Line items of commercial documents (invoices, challans).
//!
//! A line arrives as a `LineItemRequest`, is validated into a `LineItemInput`
//! and is then priced into a `LineItem` carrying every computed amount. Lines
//! are never patched in place: any change recomputes from the inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result, MAX_LINE_AMOUNT, MAX_QUANTITY, MAX_UNIT_AMOUNT};

/// Raw line as supplied by a client, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub rate: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub fixed_discount: Option<Decimal>,
    pub percentage_discount: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    pub is_inter_state: Option<bool>,
    pub cess_ad_valorem_rate: Option<Decimal>,
    pub cess_specific_rate: Option<Decimal>,
    pub state_cess_ad_valorem_rate: Option<Decimal>,
    pub state_cess_specific_rate: Option<Decimal>,
}

impl LineItemRequest {
    /// Check the line and convert it into calculator input
    ///
    /// # Errors
    /// * `AppError::Validation` if `rate` is missing, an amount is negative or
    ///   above its bound, or a percentage lies outside 0..=100
    pub fn validate(&self) -> Result<LineItemInput> {
        let rate = self
            .rate
            .ok_or_else(|| AppError::validation("Line item rate is required"))?;

        Self::validate_amount("rate", Some(rate), MAX_UNIT_AMOUNT)?;
        Self::validate_amount("quantity", self.quantity, MAX_QUANTITY)?;
        Self::validate_amount("fixedDiscount", self.fixed_discount, MAX_UNIT_AMOUNT)?;
        Self::validate_percentage("percentageDiscount", self.percentage_discount)?;
        Self::validate_percentage("gstRate", self.gst_rate)?;
        Self::validate_percentage("cessAdValoremRate", self.cess_ad_valorem_rate)?;
        Self::validate_percentage("cessSpecificRate", self.cess_specific_rate)?;
        Self::validate_percentage("stateCessAdValoremRate", self.state_cess_ad_valorem_rate)?;
        Self::validate_percentage("stateCessSpecificRate", self.state_cess_specific_rate)?;

        Ok(LineItemInput {
            rate,
            quantity: self.quantity,
            fixed_discount: self.fixed_discount,
            percentage_discount: self.percentage_discount,
            gst_rate: self.gst_rate,
            is_inter_state: self.is_inter_state.unwrap_or(false),
            cess_ad_valorem_rate: self.cess_ad_valorem_rate,
            cess_specific_rate: self.cess_specific_rate,
            state_cess_ad_valorem_rate: self.state_cess_ad_valorem_rate,
            state_cess_specific_rate: self.state_cess_specific_rate,
        })
    }

    fn validate_amount(name: &str, value: Option<Decimal>, max: Decimal) -> Result<()> {
        match value {
            Some(value) if value < Decimal::ZERO => Err(AppError::validation(format!(
                "{} must be non-negative, got: {}",
                name, value
            ))),
            Some(value) if value > max => Err(AppError::validation(format!(
                "{} must not exceed {}, got: {}",
                name, max, value
            ))),
            _ => Ok(()),
        }
    }

    fn validate_percentage(name: &str, value: Option<Decimal>) -> Result<()> {
        match value {
            Some(value) if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED => {
                Err(AppError::validation(format!(
                    "{} must be between 0 and 100, got: {}",
                    name, value
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Validated line ready for tax calculation. Rates are percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub rate: Decimal,
    /// Missing or zero means one unit
    pub quantity: Option<Decimal>,
    pub fixed_discount: Option<Decimal>,
    pub percentage_discount: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    #[serde(default)]
    pub is_inter_state: bool,
    pub cess_ad_valorem_rate: Option<Decimal>,
    pub cess_specific_rate: Option<Decimal>,
    pub state_cess_ad_valorem_rate: Option<Decimal>,
    pub state_cess_specific_rate: Option<Decimal>,
}

impl LineItemInput {
    pub fn new(rate: Decimal, quantity: Decimal) -> Self {
        Self {
            rate,
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn with_gst(mut self, gst_rate: Decimal, is_inter_state: bool) -> Self {
        self.gst_rate = Some(gst_rate);
        self.is_inter_state = is_inter_state;
        self
    }

    pub fn with_discounts(
        mut self,
        fixed_discount: Option<Decimal>,
        percentage_discount: Option<Decimal>,
    ) -> Self {
        self.fixed_discount = fixed_discount;
        self.percentage_discount = percentage_discount;
        self
    }

    /// Quantity to price with: one unit when absent or zero
    pub fn effective_quantity(&self) -> Decimal {
        match self.quantity {
            Some(quantity) if !quantity.is_zero() => quantity,
            _ => Decimal::ONE,
        }
    }
}

/// A priced line: the input plus every derived amount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub rate: Decimal,
    pub quantity: Decimal,
    pub fixed_discount: Option<Decimal>,
    pub percentage_discount: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    #[serde(default)]
    pub is_inter_state: bool,
    pub cess_ad_valorem_rate: Option<Decimal>,
    pub cess_specific_rate: Option<Decimal>,
    pub state_cess_ad_valorem_rate: Option<Decimal>,
    pub state_cess_specific_rate: Option<Decimal>,

    pub base_amount: Decimal,
    pub sub_total: Decimal,
    pub discount_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub cess_ad_valorem_amount: Decimal,
    pub cess_specific_amount: Decimal,
    pub state_cess_ad_valorem_amount: Decimal,
    pub state_cess_specific_amount: Decimal,
    pub total_amount: Decimal,
}

impl LineItem {
    /// Sum of every tax and cess component on the line
    pub fn tax_amount(&self) -> Decimal {
        self.cgst_amount
            + self.sgst_amount
            + self.igst_amount
            + self.cess_ad_valorem_amount
            + self.cess_specific_amount
            + self.state_cess_ad_valorem_amount
            + self.state_cess_specific_amount
    }

    /// Check that every amount of an already priced line is in range.
    ///
    /// Lines sent back for aggregation are client data; this keeps their sum
    /// within `Decimal` range.
    pub fn validate_amounts(&self) -> Result<()> {
        let amounts = [
            ("baseAmount", self.base_amount),
            ("subTotal", self.sub_total),
            ("discountAmount", self.discount_amount),
            ("cgstAmount", self.cgst_amount),
            ("sgstAmount", self.sgst_amount),
            ("igstAmount", self.igst_amount),
            ("cessAdValoremAmount", self.cess_ad_valorem_amount),
            ("cessSpecificAmount", self.cess_specific_amount),
            ("stateCessAdValoremAmount", self.state_cess_ad_valorem_amount),
            ("stateCessSpecificAmount", self.state_cess_specific_amount),
            ("totalAmount", self.total_amount),
        ];

        match amounts
            .iter()
            .find(|(_, amount)| amount.abs() > MAX_LINE_AMOUNT)
        {
            Some((name, amount)) => Err(AppError::validation(format!(
                "{} must not exceed {} in magnitude, got: {}",
                name, MAX_LINE_AMOUNT, amount
            ))),
            None => Ok(()),
        }
    }
}
