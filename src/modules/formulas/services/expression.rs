//! Arithmetic-only formula evaluation.
//!
//! Field references are replaced by their current values and the result is
//! parsed by a recursive descent parser over `Decimal`. The grammar admits
//! numeric literals, unary `+`/`-`, the four binary operators and
//! parentheses; nothing else is accepted, so formula text can never reach a
//! general-purpose interpreter.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::dependency_extractor::find_references;
use crate::core::format_formula_value;
use crate::modules::formulas::error::{FormulaError, FormulaResult};
use crate::modules::formulas::models::FieldValues;

/// Maximum nesting of parentheses and unary operators
pub const MAX_NESTING: usize = 128;

/// Value stored when a formula cannot be evaluated
pub const FALLBACK_VALUE: &str = "0";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
        }
    }
}

fn tokenize(input: &str) -> FormulaResult<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = pos;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[pos..end];
                let value = Decimal::from_str(literal)
                    .map_err(|_| FormulaError::InvalidNumber(literal.to_string()))?;
                tokens.push((Token::Number(value), pos));
                continue;
            }
            other => return Err(FormulaError::UnexpectedCharacter { ch: other, pos }),
        };

        chars.next();
        tokens.push((token, pos));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(FormulaError::TooDeep(MAX_NESTING));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse(mut self) -> FormulaResult<Decimal> {
        if self.tokens.is_empty() {
            return Err(FormulaError::Empty);
        }

        let value = self.parse_sum()?;

        match self.next() {
            None => Ok(value),
            Some((token, pos)) => Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                pos,
            }),
        }
    }

    // sum := product (('+' | '-') product)*
    fn parse_sum(&mut self) -> FormulaResult<Decimal> {
        let mut value = self.parse_product()?;

        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    value = value.checked_add(rhs).ok_or(FormulaError::Overflow)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    value = value.checked_sub(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => return Ok(value),
            }
        }
    }

    // product := unary (('*' | '/') unary)*
    fn parse_product(&mut self) -> FormulaResult<Decimal> {
        let mut value = self.parse_unary()?;

        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    value = value.checked_mul(rhs).ok_or(FormulaError::Overflow)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    if rhs.is_zero() {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value = value.checked_div(rhs).ok_or(FormulaError::Overflow)?;
                }
                _ => return Ok(value),
            }
        }
    }

    // unary := ('+' | '-') unary | primary
    fn parse_unary(&mut self) -> FormulaResult<Decimal> {
        match self.peek() {
            Some(Token::Plus) | Some(Token::Minus) => {
                let negate = self.peek() == Some(&Token::Minus);
                self.pos += 1;
                self.enter()?;
                let value = self.parse_unary()?;
                self.leave();
                Ok(if negate { -value } else { value })
            }
            _ => self.parse_primary(),
        }
    }

    // primary := number | '(' sum ')'
    fn parse_primary(&mut self) -> FormulaResult<Decimal> {
        match self.next() {
            Some((Token::Number(value), _)) => Ok(value),
            Some((Token::LeftParen, _)) => {
                self.enter()?;
                let value = self.parse_sum()?;
                self.leave();
                match self.next() {
                    Some((Token::RightParen, _)) => Ok(value),
                    Some((token, pos)) => Err(FormulaError::UnexpectedToken {
                        found: token.describe(),
                        pos,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some((token, pos)) => Err(FormulaError::UnexpectedToken {
                found: token.describe(),
                pos,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

/// Evaluates formula text against the current values of a record
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a purely arithmetic expression
    pub fn evaluate_expression(&self, expression: &str) -> FormulaResult<Decimal> {
        Parser::new(tokenize(expression)?).parse()
    }

    /// Replace every field reference in `formula` with its parenthesised value.
    ///
    /// Ids are the keys of `values`, matched as whole tokens, longest first.
    pub fn substitute(&self, formula: &str, values: &FieldValues) -> FormulaResult<String> {
        self.substitute_fields(formula, values.keys().map(String::as_str), values)
    }

    /// Replace references to `field_ids` with their values from `values`.
    ///
    /// Matching uses the declared ids, not the keys of `values`, so a
    /// reference to a declared field that has no value fails instead of being
    /// read as some shorter id.
    pub fn substitute_fields<'a, I>(
        &self,
        formula: &str,
        field_ids: I,
        values: &FieldValues,
    ) -> FormulaResult<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let references = find_references(formula, field_ids);
        let mut substituted = String::with_capacity(formula.len());
        let mut cursor = 0;

        for reference in references {
            let field = values
                .get(reference.field_id)
                .ok_or_else(|| FormulaError::MissingValue(reference.field_id.to_string()))?;

            substituted.push_str(&formula[cursor..reference.start]);
            substituted.push('(');
            substituted.push_str(field.value.trim());
            substituted.push(')');
            cursor = reference.end;
        }
        substituted.push_str(&formula[cursor..]);

        Ok(substituted)
    }

    /// Evaluate `formula` after substituting field values.
    ///
    /// Returns the result rounded to 2 places with trailing zeros removed.
    pub fn evaluate(&self, formula: &str, values: &FieldValues) -> FormulaResult<String> {
        let expression = self.substitute(formula, values)?;
        self.evaluate_substituted(&expression)
    }

    /// Evaluate `formula` with references resolved against declared `field_ids`
    pub fn evaluate_fields<'a, I>(
        &self,
        formula: &str,
        field_ids: I,
        values: &FieldValues,
    ) -> FormulaResult<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let expression = self.substitute_fields(formula, field_ids, values)?;
        self.evaluate_substituted(&expression)
    }

    fn evaluate_substituted(&self, expression: &str) -> FormulaResult<String> {
        let value = self.evaluate_expression(expression)?;
        Ok(format_formula_value(value))
    }

    /// Like [`evaluate`](Self::evaluate), but degrades to `"0"` on failure
    pub fn evaluate_or_zero(&self, formula: &str, values: &FieldValues) -> String {
        match self.evaluate(formula, values) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(formula = %formula, error = %err, "Formula evaluation failed");
                FALLBACK_VALUE.to_string()
            }
        }
    }
}
