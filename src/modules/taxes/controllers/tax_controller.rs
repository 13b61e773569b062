//! Tax controller for HTTP endpoints
//!
//! Thin wrappers over the line calculator and totals aggregator. Inputs are
//! validated here so the calculators only ever see well-formed numbers.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::LimitsConfig;
use crate::core::error::AppError;
use crate::modules::taxes::models::{LineItem, LineItemRequest};
use crate::modules::taxes::services::{TaxCalculator, TotalsAggregator};

fn default_include_tax() -> bool {
    true
}

/// Request body for pricing a single line
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateLineItemRequest {
    pub item: LineItemRequest,
    #[serde(default = "default_include_tax")]
    pub include_tax: bool,
}

/// Request body for aggregating already priced lines
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotalsRequest {
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub should_round_off: bool,
    #[serde(default = "default_include_tax")]
    pub include_tax: bool,
}

/// Price one line item
/// POST /line-items/calculate
pub async fn calculate_line_item(
    request: web::Json<CalculateLineItemRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let input = request.item.validate()?;
    let line = TaxCalculator::new().calculate_line(&input, request.include_tax);

    Ok(HttpResponse::Ok().json(line))
}

/// Aggregate priced lines into document totals
/// POST /invoices/totals
pub async fn aggregate_totals(
    limits: web::Data<LimitsConfig>,
    request: web::Json<AggregateTotalsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    if request.line_items.len() > limits.max_line_items {
        return Err(AppError::validation(format!(
            "A document may contain at most {} line items, got {}",
            limits.max_line_items,
            request.line_items.len()
        )));
    }

    for (index, line) in request.line_items.iter().enumerate() {
        line.validate_amounts().map_err(|err| match err {
            AppError::Validation(message) => {
                AppError::Validation(format!("Line item {}: {}", index + 1, message))
            }
            other => other,
        })?;
    }

    let totals = TotalsAggregator::new().aggregate(
        &request.line_items,
        request.should_round_off,
        request.include_tax,
    );

    Ok(HttpResponse::Ok().json(totals))
}

/// Configure tax routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/line-items").route("/calculate", web::post().to(calculate_line_item)),
    )
    .service(web::scope("/invoices").route("/totals", web::post().to(aggregate_totals)));
}
