pub mod error;
pub mod money;

pub use error::{AppError, Result};
pub use money::{
    format_formula_value, percent_of, round2, round_to_integer, MAX_LINE_AMOUNT, MAX_QUANTITY,
    MAX_UNIT_AMOUNT,
};
