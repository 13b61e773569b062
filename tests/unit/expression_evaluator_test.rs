// Tests for the arithmetic-only formula evaluator
//
// Properties tested:
// 1. Integer arithmetic matches native evaluation, honouring precedence
// 2. Arbitrary input never panics; failures degrade to "0"
// 3. Anything beyond numbers, + - * / and parentheses is rejected

use billing_engine::formulas::{ExpressionEvaluator, FieldValue, FieldValues, FormulaError};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn values(pairs: &[(&str, &str)]) -> FieldValues {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), FieldValue::new(*value)))
        .collect()
}

proptest! {
    #[test]
    fn test_precedence_matches_native(
        a in -1_000i64..1_000,
        b in -1_000i64..1_000,
        c in -1_000i64..1_000,
    ) {
        let evaluator = ExpressionEvaluator::new();
        let expression = format!("{} - {} * ({})", a, b, c);
        let expected = Decimal::from(a - b * c);

        prop_assert_eq!(evaluator.evaluate_expression(&expression).unwrap(), expected);
    }

    #[test]
    fn test_substituted_fields_evaluate(
        price in 0u32..100_000,
        qty in 1u32..500,
    ) {
        let evaluator = ExpressionEvaluator::new();
        let vals = values(&[("price", &price.to_string()), ("qty", &qty.to_string())]);

        let result = evaluator.evaluate("price * qty", &vals).unwrap();
        prop_assert_eq!(result, (u64::from(price) * u64::from(qty)).to_string());
    }

    #[test]
    fn test_arbitrary_input_never_panics(input in ".{0,64}") {
        let evaluator = ExpressionEvaluator::new();
        let result = evaluator.evaluate_or_zero(&input, &FieldValues::new());
        prop_assert!(!result.is_empty());
    }
}

#[test]
fn test_code_like_formulas_are_rejected() {
    let evaluator = ExpressionEvaluator::new();
    let vals = values(&[("a", "1")]);

    for formula in [
        "require('child_process')",
        "a; 1",
        "a || 1",
        "Math.max(a, 2)",
        "a ? 1 : 2",
        "`a`",
        "a = 3",
    ] {
        assert!(evaluator.evaluate(formula, &vals).is_err(), "{} was accepted", formula);
        assert_eq!(evaluator.evaluate_or_zero(formula, &vals), "0");
    }
}

#[test]
fn test_injected_values_stay_arithmetic() {
    let evaluator = ExpressionEvaluator::new();
    let vals = values(&[("a", "1) * (1000")]);

    assert!(evaluator.evaluate("a", &vals).is_ok());
    let vals = values(&[("a", "1)); process.exit(1); ((1")]);
    assert!(evaluator.evaluate("a", &vals).is_err());
}

#[test]
fn test_error_variants() {
    let evaluator = ExpressionEvaluator::new();

    assert_eq!(evaluator.evaluate_expression("1 / 0"), Err(FormulaError::DivisionByZero));
    assert_eq!(evaluator.evaluate_expression(""), Err(FormulaError::Empty));
    assert_eq!(evaluator.evaluate_expression("(1"), Err(FormulaError::UnexpectedEnd));
    assert_eq!(
        evaluator.evaluate_expression("1 $ 2"),
        Err(FormulaError::UnexpectedCharacter { ch: '$', pos: 2 })
    );
}

#[test]
fn test_fractional_results_rounded() {
    let evaluator = ExpressionEvaluator::new();
    let vals = values(&[("total", "100"), ("parts", "3")]);

    assert_eq!(evaluator.evaluate("total / parts", &vals).unwrap(), "33.33");
    assert_eq!(evaluator.evaluate("2 / 3", &vals).unwrap(), "0.67");
    assert_eq!(evaluator.evaluate("0 - 2 / 3", &vals).unwrap(), "-0.67");
}
