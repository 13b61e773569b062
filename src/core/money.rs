//! Decimal rounding rules shared by the tax and formula calculators.
//!
//! Every amount is rounded half away from zero to two places after each
//! arithmetic step, never deferred to the end of a computation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on monetary amounts
pub const MONEY_SCALE: u32 = 2;

/// Largest unit rate or fixed discount accepted on a line (10^12)
pub const MAX_UNIT_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Largest quantity accepted on a line (10^6)
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest magnitude of any priced line amount (10^19).
///
/// A line built from bounded inputs stays below this, and every component
/// summed over `config::MAX_LINE_ITEMS_CEILING` lines fits in a `Decimal`.
pub const MAX_LINE_AMOUNT: Decimal =
    Decimal::from_parts(0x89E8_0000, 0x8AC7_2304, 0, false, 0);

/// Rounds to 2 decimal places, half away from zero
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole unit, half away from zero
pub fn round_to_integer(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `rate` percent of `amount`, rounded to 2 places
pub fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    round2(amount * rate / Decimal::ONE_HUNDRED)
}

/// String form stored on a formula field: 2 places, trailing zeros dropped.
///
/// `6.00` becomes `"6"`, `2.50` becomes `"2.5"`.
pub fn format_formula_value(value: Decimal) -> String {
    round2(value).normalize().to_string()
}
