//! Integration tests for the Bill Split Engine HTTP API.
//!
//! This test suite covers:
//! - Item ownership and subtotals
//! - Proportional tax and discount allocation
//! - Equal-split tip and service charge allocation
//! - Reconciliation against the receipt subtotal
//! - Recalculation of bill-level totals
//! - Expense payloads
//! - Malformed amounts and error cases

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use bill_split_engine::api::{create_router, AppState};
use bill_split_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    create_router(AppState::new(config))
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn people(ids: &[&str]) -> Vec<Value> {
    ids.iter().map(|id| json!({ "id": id, "name": id })).collect()
}

fn item(id: &str, price: &str, shares: &[(&str, u32)]) -> Value {
    let shares: Vec<Value> = shares
        .iter()
        .map(|(person_id, pct)| json!({ "person_id": person_id, "percentage": pct }))
        .collect();
    json!({ "id": id, "name": id, "price": price, "shares": shares })
}

fn bill(person_ids: &[&str], items: Vec<Value>, adjustments: Value) -> Value {
    json!({
        "people": people(person_ids),
        "items": items,
        "adjustments": adjustments
    })
}

fn person<'a>(result: &'a Value, person_id: &str) -> &'a Value {
    result["people"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["person_id"] == person_id)
        .unwrap_or_else(|| panic!("No breakdown for {}", person_id))
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// SECTION 1: Item Ownership
// =============================================================================

#[tokio::test]
async fn test_single_owner_items_balanced() {
    let request = bill(
        &["p1", "p2"],
        vec![
            item("i1", "10.00", &[("p1", 100)]),
            item("i2", "20.00", &[("p2", 100)]),
        ],
        json!({ "receipt_subtotal": "30.00" }),
    );

    let (status, result) = post("/allocate", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["reconciliation"]["status"], "balanced");
    assert_amount(&person(&result, "p1")["subtotal"], "10.00");
    assert_amount(&person(&result, "p2")["subtotal"], "20.00");
    assert_amount(&result["assigned_total"], "30.00");
}

#[tokio::test]
async fn test_response_carries_calculation_metadata() {
    let request = bill(&["p1"], vec![item("i1", "4.00", &[("p1", 100)])], json!({}));

    let (status, result) = post("/allocate", request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["calculation_id"].as_str().is_some());
    assert!(result["timestamp"].as_str().is_some());
    assert_eq!(result["engine_version"], "0.1.0");
}

#[tokio::test]
async fn test_three_way_split_does_not_redistribute_remainder() {
    let request = bill(
        &["p1", "p2", "p3"],
        vec![item("i1", "10.00", &[("p1", 33), ("p2", 33), ("p3", 34)])],
        json!({ "receipt_subtotal": "10.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    assert_amount(&person(&result, "p1")["subtotal"], "3.30");
    assert_amount(&person(&result, "p2")["subtotal"], "3.30");
    assert_amount(&person(&result, "p3")["subtotal"], "3.40");
}

#[tokio::test]
async fn test_person_without_items_has_zero_breakdown() {
    let request = bill(
        &["p1", "p2"],
        vec![item("i1", "12.00", &[("p1", 100)])],
        json!({ "receipt_subtotal": "12.00", "tax_amount": "1.20" }),
    );

    let (_, result) = post("/allocate", request).await;

    let p2 = person(&result, "p2");
    assert_eq!(p2["item_count"], 0);
    assert_amount(&p2["subtotal"], "0");
    assert_amount(&p2["tax_share"], "0");
    assert_amount(&p2["total"], "0");
}

// =============================================================================
// SECTION 2: Proportional Adjustments (tax, discount)
// =============================================================================

#[tokio::test]
async fn test_shared_item_tax_split_evenly() {
    let request = bill(
        &["p1", "p2"],
        vec![item("i1", "10.00", &[("p1", 50), ("p2", 50)])],
        json!({ "receipt_subtotal": "10.00", "tax_amount": "1.00", "tip": "0" }),
    );

    let (_, result) = post("/allocate", request).await;

    for id in ["p1", "p2"] {
        assert_amount(&person(&result, id)["subtotal"], "5.00");
        assert_amount(&person(&result, id)["tax_share"], "0.50");
        assert_amount(&person(&result, id)["total"], "5.50");
    }
}

#[tokio::test]
async fn test_discount_reduces_totals_proportionally() {
    let request = bill(
        &["p1", "p2"],
        vec![
            item("i1", "30.00", &[("p1", 100)]),
            item("i2", "10.00", &[("p2", 100)]),
        ],
        json!({ "receipt_subtotal": "40.00", "discount": "4.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    assert_amount(&person(&result, "p1")["discount_share"], "3.00");
    assert_amount(&person(&result, "p2")["discount_share"], "1.00");
    assert_amount(&person(&result, "p1")["total"], "27.00");
    assert_amount(&person(&result, "p2")["total"], "9.00");
}

#[tokio::test]
async fn test_unassigned_items_dilute_tax_base() {
    let request = bill(
        &["p1"],
        vec![item("i1", "10.00", &[("p1", 100)]), item("i2", "10.00", &[])],
        json!({ "receipt_subtotal": "20.00", "tax_amount": "2.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    assert_amount(&person(&result, "p1")["tax_share"], "1.00");
}

// =============================================================================
// SECTION 3: Equal-Split Adjustments (tip, service charge)
// =============================================================================

#[tokio::test]
async fn test_tip_split_among_active_people_only() {
    let request = bill(
        &["p1", "p2", "p3"],
        vec![
            item("i1", "10.00", &[("p1", 100)]),
            item("i2", "30.00", &[("p2", 100)]),
        ],
        json!({ "receipt_subtotal": "40.00", "tip": "9.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    assert_amount(&person(&result, "p1")["tip_share"], "4.50");
    assert_amount(&person(&result, "p2")["tip_share"], "4.50");
    assert_amount(&person(&result, "p3")["tip_share"], "0");
}

#[tokio::test]
async fn test_service_charge_split_equally() {
    let request = bill(
        &["p1", "p2"],
        vec![
            item("i1", "5.00", &[("p1", 100)]),
            item("i2", "50.00", &[("p2", 100)]),
        ],
        json!({ "receipt_subtotal": "55.00", "service_charge": "6.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    assert_amount(&person(&result, "p1")["service_charge_share"], "3.00");
    assert_amount(&person(&result, "p2")["service_charge_share"], "3.00");
}

// =============================================================================
// SECTION 4: Reconciliation
// =============================================================================

#[tokio::test]
async fn test_unassigned_item_makes_bill_incomplete() {
    let request = bill(
        &["p1"],
        vec![item("i1", "10.00", &[("p1", 100)]), item("i2", "5.00", &[])],
        json!({ "receipt_subtotal": "15.00" }),
    );

    let (status, result) = post("/allocate", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["reconciliation"]["status"], "incomplete");
    assert_eq!(result["reconciliation"]["unassigned_item_count"], 1);
    assert_amount(&result["unassigned_total"], "5.00");
}

#[tokio::test]
async fn test_assigned_below_receipt_is_mismatched() {
    let request = bill(
        &["p1"],
        vec![item("i1", "10.00", &[("p1", 100)])],
        json!({ "receipt_subtotal": "12.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    let report = &result["reconciliation"];
    assert_eq!(report["status"], "mismatched");
    assert_eq!(report["direction"], "assigned_under_receipt");
    assert_amount(&report["difference"], "-2.00");
}

#[tokio::test]
async fn test_half_cent_difference_is_balanced() {
    let request = bill(
        &["p1"],
        vec![item("i1", "10.00", &[("p1", 100)])],
        json!({ "receipt_subtotal": "10.004" }),
    );

    let (_, result) = post("/allocate", request).await;

    assert_eq!(result["reconciliation"]["status"], "balanced");
    assert!(result["reconciliation"].get("difference").is_none());
}

#[tokio::test]
async fn test_audit_trace_ends_with_reconciliation() {
    let request = bill(
        &["p1", "p2"],
        vec![item("i1", "8.00", &[("p1", 50), ("p2", 50)])],
        json!({ "receipt_subtotal": "8.00" }),
    );

    let (_, result) = post("/allocate", request).await;

    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["rule_id"], "item_totals");
    assert_eq!(steps[1]["rule_id"], "person_allocation");
    assert_eq!(steps[3]["rule_id"], "reconciliation");
}

// =============================================================================
// SECTION 5: Recalculation
// =============================================================================

#[tokio::test]
async fn test_recalculate_derives_tax_and_total() {
    let request = json!({
        "subtotal": "100.00",
        "tax_rate": "0.08",
        "discount": "10.00",
        "tip": "5.00",
        "service_charge": "2.00"
    });

    let (status, result) = post("/recalculate", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["tax_amount"], "8.00");
    assert_amount(&result["total"], "105.00");
}

#[tokio::test]
async fn test_recalculate_missing_subtotal_returns_400() {
    let (status, result) = post("/recalculate", json!({ "tax_rate": "0.08" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
}

// =============================================================================
// SECTION 6: Expense Payload
// =============================================================================

#[tokio::test]
async fn test_expense_payload_lists_active_participants() {
    let mut request = bill(
        &["p1", "p2", "p3"],
        vec![
            item("i1", "10.00", &[("p1", 100)]),
            item("i2", "20.00", &[("p2", 100)]),
        ],
        json!({ "receipt_subtotal": "30.00", "tip": "3.00", "payer_id": "p2" }),
    );
    request["receipt_path"] = json!("receipts/dinner.jpg");

    let (status, result) = post("/expense-payload", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["receipt_path"], "receipts/dinner.jpg");
    assert_eq!(result["payer_id"], "p2");
    let participants = result["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_amount(&result["total"], "33.00");
}

#[tokio::test]
async fn test_expense_payload_refused_when_mismatched() {
    let request = bill(
        &["p1"],
        vec![item("i1", "10.00", &[("p1", 100)])],
        json!({ "receipt_subtotal": "11.00" }),
    );

    let (status, result) = post("/expense-payload", request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(result["code"], "NOT_RECONCILED");
}

// =============================================================================
// SECTION 7: Malformed Input and Error Cases
// =============================================================================

#[tokio::test]
async fn test_malformed_price_counts_as_zero_with_warning() {
    let request = bill(
        &["p1"],
        vec![
            item("i1", "abc", &[("p1", 100)]),
            item("i2", "$6.00", &[("p1", 100)]),
        ],
        json!({ "receipt_subtotal": "6.00" }),
    );

    let (status, result) = post("/allocate", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&person(&result, "p1")["subtotal"], "6.00");
    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["code"], "MALFORMED_AMOUNT");
}

#[tokio::test]
async fn test_unknown_payer_returns_invalid_bill() {
    let request = bill(
        &["p1"],
        vec![item("i1", "1.00", &[("p1", 100)])],
        json!({ "payer_id": "ghost" }),
    );

    let (status, result) = post("/allocate", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_BILL");
    assert!(result["message"].as_str().unwrap().contains("payer_id"));
}

#[tokio::test]
async fn test_missing_people_returns_validation_error() {
    let (status, result) = post("/allocate", json!({ "items": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_bill_is_balanced_with_no_people() {
    let (status, result) = post("/allocate", bill(&[], vec![], json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["reconciliation"]["status"], "balanced");
    assert!(result["people"].as_array().unwrap().is_empty());
}
