use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::LimitsConfig;
use crate::core::error::AppError;
use crate::modules::formulas::models::{FieldDefinition, FieldValues};
use crate::modules::formulas::services::FormulaResolver;

/// Request body for resolving the custom fields of one record
#[derive(Debug, Deserialize)]
pub struct ResolveFormulasRequest {
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub values: FieldValues,
}

/// Resolve formula fields of a record
/// POST /formulas/resolve
pub async fn resolve_formulas(
    limits: web::Data<LimitsConfig>,
    request: web::Json<ResolveFormulasRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    if request.fields.len() > limits.max_formula_fields {
        return Err(AppError::validation(format!(
            "A template may define at most {} fields, got {}",
            limits.max_formula_fields,
            request.fields.len()
        )));
    }

    let resolution = FormulaResolver::new().resolve(&request.fields, &request.values);

    Ok(HttpResponse::Ok().json(resolution))
}

/// Configure formula routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/formulas").route("/resolve", web::post().to(resolve_formulas)));
}
