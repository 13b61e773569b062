use super::dependency_graph::DependencyGraph;
use super::expression::{ExpressionEvaluator, FALLBACK_VALUE};
use crate::modules::formulas::models::{
    FieldDefinition, FieldDiagnostic, FieldType, FieldValue, FieldValues, Resolution,
};

/// Computes formula fields of a record in dependency order.
///
/// Pure: holds no state between calls, so one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaResolver {
    evaluator: ExpressionEvaluator,
}

impl FormulaResolver {
    pub fn new() -> Self {
        Self {
            evaluator: ExpressionEvaluator::new(),
        }
    }

    /// Resolve every formula field of a record.
    ///
    /// 1. NUMBER fields with no (or a blank) value default to "0".
    /// 2. Formula fields are evaluated in dependency order, each seeing the
    ///    values computed before it.
    /// 3. A failing formula stores "0", including one that references a
    ///    declared field with no value; fields on or behind a cycle keep
    ///    whatever value they had after step 1.
    ///
    /// Values for ids not defined in `fields` are passed through untouched.
    pub fn resolve(&self, fields: &[FieldDefinition], current_values: &FieldValues) -> Resolution {
        let mut working = Self::defaulted_values(fields, current_values);
        let graph = DependencyGraph::build(fields);
        let order = graph.evaluation_order();
        let field_ids: Vec<&str> = fields.iter().map(|field| field.id.as_str()).collect();
        let mut diagnostics = Vec::new();

        for field_id in &order.order {
            let Some(formula) = fields
                .iter()
                .find(|field| &field.id == field_id)
                .and_then(FieldDefinition::formula)
            else {
                continue;
            };

            let value = match self
                .evaluator
                .evaluate_fields(formula, field_ids.iter().copied(), &working)
            {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(
                        field_id = %field_id,
                        formula = %formula,
                        error = %err,
                        "Formula evaluation failed, storing fallback value"
                    );
                    diagnostics.push(FieldDiagnostic::EvaluationFailed {
                        field_id: field_id.clone(),
                        message: err.to_string(),
                    });
                    FALLBACK_VALUE.to_string()
                }
            };

            working.insert(field_id.clone(), FieldValue::new(value));
        }

        diagnostics.extend(order.cyclic.iter().map(|field_id| {
            FieldDiagnostic::CyclicDependency {
                field_id: field_id.clone(),
            }
        }));
        diagnostics.extend(order.blocked.iter().map(|field_id| {
            FieldDiagnostic::BlockedByCycle {
                field_id: field_id.clone(),
            }
        }));

        let mut values = current_values.clone();
        values.extend(working);

        if !diagnostics.is_empty() {
            tracing::debug!(
                resolved = order.order.len(),
                degraded = diagnostics.len(),
                "Formula resolution completed with diagnostics"
            );
        }

        Resolution {
            values,
            diagnostics,
        }
    }

    /// Resolve and return only the values
    pub fn resolve_values(
        &self,
        fields: &[FieldDefinition],
        current_values: &FieldValues,
    ) -> FieldValues {
        self.resolve(fields, current_values).values
    }

    /// Values of the defined fields, with NUMBER defaults applied
    fn defaulted_values(fields: &[FieldDefinition], current_values: &FieldValues) -> FieldValues {
        let mut values = FieldValues::with_capacity(fields.len());

        for field in fields {
            let is_number = field.field_type == FieldType::Number;
            let stored = current_values
                .get(&field.id)
                .filter(|stored| !is_number || !stored.value.trim().is_empty());

            match stored {
                Some(value) => {
                    values.insert(field.id.clone(), value.clone());
                }
                None if is_number => {
                    values.insert(field.id.clone(), FieldValue::new(FALLBACK_VALUE));
                }
                None => {}
            }
        }

        values
    }
}

/// Resolve the formula fields of one record
pub fn resolve_formula_fields(
    fields: &[FieldDefinition],
    current_values: &FieldValues,
) -> Resolution {
    FormulaResolver::new().resolve(fields, current_values)
}
