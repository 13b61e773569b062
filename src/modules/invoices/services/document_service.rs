use crate::config::LimitsConfig;
use crate::core::error::AppError;
use crate::modules::formulas::services::FormulaResolver;
use crate::modules::invoices::models::{DocumentCalculation, DocumentCalculationRequest};
use crate::modules::taxes::models::{LineItem, LineItemInput, LineItemRequest};
use crate::modules::taxes::services::{TaxCalculator, TotalsAggregator};

/// Service pricing whole documents before they are persisted.
///
/// Validates every line at the boundary, prices each one, aggregates the
/// totals and resolves the document's formula fields. Holds only
/// configuration, so it can be shared across workers.
#[derive(Debug, Clone)]
pub struct DocumentCalculationService {
    limits: LimitsConfig,
    calculator: TaxCalculator,
    aggregator: TotalsAggregator,
    resolver: FormulaResolver,
}

impl DocumentCalculationService {
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            limits,
            calculator: TaxCalculator::new(),
            aggregator: TotalsAggregator::new(),
            resolver: FormulaResolver::new(),
        }
    }

    /// Calculate every derived value of a document
    pub fn calculate(
        &self,
        request: &DocumentCalculationRequest,
    ) -> Result<DocumentCalculation, AppError> {
        let inputs = self.validate_line_items(&request.line_items)?;

        let line_items: Vec<LineItem> = inputs
            .iter()
            .map(|input| self.calculator.calculate_line(input, request.include_tax))
            .collect();

        let totals =
            self.aggregator
                .aggregate(&line_items, request.should_round_off, request.include_tax);

        let (custom_fields, diagnostics) = match &request.custom_fields {
            Some(custom) => {
                if custom.fields.len() > self.limits.max_formula_fields {
                    return Err(AppError::Validation(format!(
                        "A template may define at most {} fields, got {}",
                        self.limits.max_formula_fields,
                        custom.fields.len()
                    )));
                }
                let resolution = self.resolver.resolve(&custom.fields, &custom.values);
                (Some(resolution.values), resolution.diagnostics)
            }
            None => (None, Vec::new()),
        };

        tracing::info!(
            line_items = line_items.len(),
            total_amount = %totals.total_amount,
            diagnostics = diagnostics.len(),
            "Document calculated"
        );

        Ok(DocumentCalculation {
            line_items,
            totals,
            custom_fields,
            diagnostics,
        })
    }

    /// Validate all lines, naming the first invalid one
    fn validate_line_items(&self, items: &[LineItemRequest]) -> Result<Vec<LineItemInput>, AppError> {
        if items.is_empty() {
            return Err(AppError::Validation(
                "Document must have at least one line item".to_string(),
            ));
        }

        if items.len() > self.limits.max_line_items {
            return Err(AppError::Validation(format!(
                "A document may contain at most {} line items, got {}",
                self.limits.max_line_items,
                items.len()
            )));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.validate().map_err(|err| match err {
                    AppError::Validation(message) => {
                        AppError::Validation(format!("Line item {}: {}", index + 1, message))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

impl Default for DocumentCalculationService {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}
