// Property-based tests for formula field resolution
//
// Properties tested:
// 1. Determinism: the same fields and values always resolve identically
// 2. Idempotence: resolving an already resolved record changes nothing (acyclic templates)
// 3. Order invariant: every formula dependency is evaluated before its dependents
// 4. Partition: each formula field is ordered, cyclic or blocked, exactly once

use billing_engine::formulas::{
    resolve_formula_fields, DependencyGraph, FieldDefinition, FieldDiagnostic, FieldType,
    FieldValue, FieldValues, FormulaResolver,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn field_id(index: usize) -> String {
    format!("f{}", index)
}

/// Template where field `i` may only reference fields `j < i`
fn acyclic_template() -> impl Strategy<Value = (Vec<FieldDefinition>, FieldValues)> {
    (1usize..12).prop_flat_map(|count| {
        (
            prop::collection::vec((any::<bool>(), prop::collection::vec(any::<prop::sample::Index>(), 0..3), 0u32..100), count),
            prop::collection::vec(0u32..1000, count),
        )
            .prop_map(move |(specs, raw_values)| {
                let mut fields = Vec::new();
                let mut values = FieldValues::new();

                for (i, (has_formula, refs, constant)) in specs.into_iter().enumerate() {
                    let mut field = FieldDefinition::new(field_id(i), FieldType::Number);
                    if has_formula {
                        let mut terms: Vec<String> = if i == 0 {
                            Vec::new()
                        } else {
                            refs.iter().map(|r| field_id(r.index(i))).collect()
                        };
                        terms.push(constant.to_string());
                        field = field.with_formula(terms.join(" + "));
                    }
                    values.insert(field_id(i), FieldValue::new(raw_values[i].to_string()));
                    fields.push(field);
                }

                (fields, values)
            })
    })
}

/// Template where any field may reference any other, cycles included
fn arbitrary_template() -> impl Strategy<Value = Vec<FieldDefinition>> {
    (1usize..10).prop_flat_map(|count| {
        prop::collection::vec(
            (any::<bool>(), prop::collection::vec(0..count, 0..3)),
            count,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (has_formula, refs))| {
                    let field = FieldDefinition::new(field_id(i), FieldType::Number);
                    if has_formula {
                        let mut terms: Vec<String> = refs.into_iter().map(field_id).collect();
                        terms.push("1".to_string());
                        field.with_formula(terms.join(" * "))
                    } else {
                        field
                    }
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn test_resolution_is_deterministic((fields, values) in acyclic_template()) {
        let first = resolve_formula_fields(&fields, &values);
        let second = resolve_formula_fields(&fields, &values);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_is_idempotent((fields, values) in acyclic_template()) {
        let resolver = FormulaResolver::new();
        let once = resolver.resolve_values(&fields, &values);
        let twice = resolver.resolve_values(&fields, &once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_acyclic_templates_resolve_cleanly((fields, values) in acyclic_template()) {
        let resolution = resolve_formula_fields(&fields, &values);
        prop_assert!(resolution.is_clean(), "unexpected diagnostics: {:?}", resolution.diagnostics);
    }

    #[test]
    fn test_dependencies_evaluated_first(fields in arbitrary_template()) {
        let graph = DependencyGraph::build(&fields);
        let order = graph.evaluation_order();

        for (index, field_id) in order.order.iter().enumerate() {
            for dependency in graph.dependencies_of(field_id) {
                if graph.has_formula(dependency) {
                    let position = order.position(dependency);
                    prop_assert!(
                        position.map_or(false, |p| p < index),
                        "{} evaluated before its dependency {}", field_id, dependency
                    );
                }
            }
        }
    }

    #[test]
    fn test_formula_fields_partitioned(fields in arbitrary_template()) {
        let graph = DependencyGraph::build(&fields);
        let order = graph.evaluation_order();

        let mut seen = HashSet::new();
        for field_id in order.order.iter().chain(order.unresolved()) {
            prop_assert!(seen.insert(field_id.clone()), "{} listed twice", field_id);
        }

        let formula_ids: HashSet<String> = fields
            .iter()
            .filter(|f| f.has_formula())
            .map(|f| f.id.clone())
            .collect();
        prop_assert_eq!(seen, formula_ids);

        for field_id in &order.cyclic {
            prop_assert!(graph.is_cyclic(field_id));
        }
        for field_id in order.order.iter().chain(order.blocked.iter()) {
            prop_assert!(!graph.is_cyclic(field_id));
        }
    }

    #[test]
    fn test_unresolved_fields_keep_prior_values(fields in arbitrary_template()) {
        let values: FieldValues = fields
            .iter()
            .map(|f| (f.id.clone(), FieldValue::new("42")))
            .collect();
        let resolution = resolve_formula_fields(&fields, &values);

        for diagnostic in &resolution.diagnostics {
            if let FieldDiagnostic::CyclicDependency { field_id } | FieldDiagnostic::BlockedByCycle { field_id } = diagnostic {
                prop_assert_eq!(resolution.value_of(field_id), Some("42"));
            }
        }
    }
}

#[test]
fn test_chain_scenario() {
    let fields = vec![
        FieldDefinition::new("A", FieldType::Number).with_formula("B+1"),
        FieldDefinition::new("B", FieldType::Number).with_formula("C+1"),
        FieldDefinition::new("C", FieldType::Number),
    ];
    let mut values = FieldValues::new();
    values.insert("C".to_string(), FieldValue::new("5"));

    let order = DependencyGraph::build(&fields).evaluation_order();
    assert_eq!(order.order, vec!["B", "A"]);

    let resolution = resolve_formula_fields(&fields, &values);
    assert_eq!(resolution.value_of("B"), Some("6"));
    assert_eq!(resolution.value_of("A"), Some("7"));
}

#[test]
fn test_cycle_scenario() {
    let fields = vec![
        FieldDefinition::new("X", FieldType::Number).with_formula("Y+1"),
        FieldDefinition::new("Y", FieldType::Number).with_formula("X+1"),
    ];

    let resolution = resolve_formula_fields(&fields, &FieldValues::new());

    assert_eq!(resolution.value_of("X"), Some("0"));
    assert_eq!(resolution.value_of("Y"), Some("0"));
    assert_eq!(resolution.diagnostics.len(), 2);
}

#[test]
fn test_missing_substitution_scenario() {
    let fields = vec![
        FieldDefinition::new("gross", FieldType::Number),
        FieldDefinition::new("amount", FieldType::Number),
        FieldDefinition::new("gross-amount", FieldType::Text),
        FieldDefinition::new("out", FieldType::Number).with_formula("gross-amount"),
        FieldDefinition::new("net", FieldType::Number).with_formula("gross - amount"),
    ];
    let mut values = FieldValues::new();
    values.insert("gross".to_string(), FieldValue::new("10"));
    values.insert("amount".to_string(), FieldValue::new("3"));

    let order = DependencyGraph::build(&fields).evaluation_order();
    assert_eq!(order.order, vec!["out", "net"]);

    let resolution = resolve_formula_fields(&fields, &values);
    assert_eq!(resolution.value_of("out"), Some("0"));
    assert_eq!(resolution.value_of("net"), Some("7"));
    assert_eq!(resolution.diagnostics.len(), 1);
    assert!(matches!(
        &resolution.diagnostics[0],
        FieldDiagnostic::EvaluationFailed { field_id, .. } if field_id == "out"
    ));
}
