use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::invoices::models::DocumentCalculationRequest;
use crate::modules::invoices::services::DocumentCalculationService;

/// Price a whole document
/// POST /documents/calculate
pub async fn calculate_document(
    service: web::Data<DocumentCalculationService>,
    request: web::Json<DocumentCalculationRequest>,
) -> Result<HttpResponse, AppError> {
    let calculation = service.calculate(&request)?;

    Ok(HttpResponse::Ok().json(calculation))
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/documents").route("/calculate", web::post().to(calculate_document)));
}
