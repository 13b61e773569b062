/// Errors raised while evaluating a formula
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedCharacter { ch: char, pos: usize },

    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("Unexpected token '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Formula nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("Referenced field '{0}' has no value")]
    MissingValue(String),
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;
