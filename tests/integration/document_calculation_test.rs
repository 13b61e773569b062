// HTTP tests for whole-document calculation
//
// POST /documents/calculate validates and prices every line, aggregates the
// totals and resolves the document's custom formula fields in one call.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test};
use billing_engine::config::LimitsConfig;
use billing_engine::invoices::DocumentCalculation;
use helpers::{test_app, TestDataFactory};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_document_with_mixed_lines() {
    let app = test::init_service(test_app(LimitsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/documents/calculate")
        .set_json(json!({
            "lineItems": [
                TestDataFactory::gst_line(false),
                TestDataFactory::discounted_line(),
                TestDataFactory::fractional_line()
            ],
            "shouldRoundOff": true,
            "includeTax": true
        }))
        .to_request();
    let doc: DocumentCalculation = test::call_and_read_body_json(&app, req).await;

    assert_eq!(doc.line_items.len(), 3);
    assert_eq!(doc.line_items[1].sub_total, dec!(180));
    assert_eq!(doc.totals.sub_total, dec!(580.34));
    assert_eq!(doc.totals.discount_amount, dec!(20));
    assert_eq!(doc.totals.cgst_amount, dec!(36.03));
    assert_eq!(doc.totals.sgst_amount, dec!(36.03));
    // 580.34 + 72.06 = 652.40
    assert_eq!(doc.totals.total_amount, dec!(652));
    assert_eq!(doc.totals.round_off_amount, dec!(-0.40));
    assert!(doc.custom_fields.is_none());
    assert!(doc.diagnostics.is_empty());
}

#[actix_web::test]
async fn test_tax_exclusive_document() {
    let app = test::init_service(test_app(LimitsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/documents/calculate")
        .set_json(json!({
            "lineItems": [TestDataFactory::gst_line(true)],
            "includeTax": false
        }))
        .to_request();
    let doc: DocumentCalculation = test::call_and_read_body_json(&app, req).await;

    assert_eq!(doc.line_items[0].igst_amount, dec!(36));
    assert_eq!(doc.line_items[0].total_amount, dec!(200));
    assert_eq!(doc.totals.igst_amount, dec!(36));
    assert_eq!(doc.totals.total_amount, dec!(200));
    assert_eq!(doc.totals.round_off_amount, dec!(0));
}

#[actix_web::test]
async fn test_document_resolves_custom_fields() {
    let app = test::init_service(test_app(LimitsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/documents/calculate")
        .set_json(json!({
            "lineItems": [TestDataFactory::gst_line(false)],
            "customFields": {
                "fields": TestDataFactory::chained_fields(),
                "values": { "C": { "value": "5" } }
            }
        }))
        .to_request();
    let doc: DocumentCalculation = test::call_and_read_body_json(&app, req).await;

    let custom = doc.custom_fields.expect("custom fields resolved");
    assert_eq!(custom["A"].value, "7");
    assert_eq!(custom["B"].value, "6");
    assert_eq!(custom["C"].value, "5");
}

#[actix_web::test]
async fn test_document_surfaces_formula_diagnostics() {
    let app = test::init_service(test_app(LimitsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/documents/calculate")
        .set_json(json!({
            "lineItems": [TestDataFactory::gst_line(false)],
            "customFields": {
                "fields": [
                    { "id": "note", "type": "TEXT" },
                    { "id": "score", "type": "NUMBER", "formula": "note * 2" }
                ],
                "values": { "note": { "value": "fragile" }, "score": { "value": "12" } }
            }
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["customFields"]["score"]["value"], "0");
    assert_eq!(body["diagnostics"][0]["kind"], "EVALUATION_FAILED");
    assert_eq!(body["diagnostics"][0]["field_id"], "score");
}

#[actix_web::test]
async fn test_invalid_line_is_named() {
    let app = test::init_service(test_app(LimitsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/documents/calculate")
        .set_json(json!({
            "lineItems": [
                TestDataFactory::gst_line(false),
                { "rate": "10", "gstRate": "150" }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("Line item 2"), "unexpected message: {}", message);
    assert!(message.contains("gstRate"));
}

#[actix_web::test]
async fn test_empty_document_rejected() {
    let app = test::init_service(test_app(LimitsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/documents/calculate")
        .set_json(json!({ "lineItems": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
