// Test Data Factory
//
// Request payloads shared by the HTTP tests. Amounts are sent as JSON
// strings, the form clients use to avoid float conversion.

use serde_json::{json, Value};

pub struct TestDataFactory;

impl TestDataFactory {
    /// rate=100, quantity=2, 18% GST
    pub fn gst_line(is_inter_state: bool) -> Value {
        json!({
            "rate": "100",
            "quantity": "2",
            "gstRate": "18",
            "isInterState": is_inter_state
        })
    }

    /// rate=100, quantity=2, 10 fixed plus 5% discount, no tax
    pub fn discounted_line() -> Value {
        json!({
            "rate": "100",
            "quantity": "2",
            "fixedDiscount": "10",
            "percentageDiscount": "5"
        })
    }

    /// A line whose 18% intra-state total is 236.40
    pub fn fractional_line() -> Value {
        json!({
            "rate": "200.34",
            "gstRate": "18"
        })
    }

    /// Fields A = B+1, B = C+1 and plain C
    pub fn chained_fields() -> Value {
        json!([
            { "id": "A", "type": "NUMBER", "formula": "B+1" },
            { "id": "B", "type": "NUMBER", "formula": "C+1" },
            { "id": "C", "type": "NUMBER" }
        ])
    }

    /// Fields X = Y+1 and Y = X+1
    pub fn cyclic_fields() -> Value {
        json!([
            { "id": "X", "type": "NUMBER", "formula": "Y+1" },
            { "id": "Y", "type": "NUMBER", "formula": "X+1" }
        ])
    }
}
