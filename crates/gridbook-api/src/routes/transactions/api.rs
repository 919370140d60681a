//! Transaction API endpoints - JSON
//!
//! Endpoints:
//! - api_transactions: Paginated, filtered transaction list
//! - api_transactions_create: Batch create (payload must be an array)
//! - api_transactions_update: Batch update by uid
//! - api_transactions_delete: Batch delete by uid
//! - api_transaction_summary: Count, total and average amount

use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use gridbook_core::{Page, Transaction, TransactionFilter};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;

fn filter_from_params(params: &HashMap<String, String>) -> TransactionFilter {
    TransactionFilter {
        from: params.get("from").cloned().filter(|s| !s.is_empty()),
        to: params.get("to").cloned().filter(|s| !s.is_empty()),
        min_amount: params.get("min_amount").and_then(|s| s.parse().ok()),
        max_amount: params.get("max_amount").and_then(|s| s.parse().ok()),
    }
}

/// Get transactions with pagination and filters (JSON API)
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Transaction>>, ApiError> {
    let page = params.get("page").and_then(|s| s.parse().ok()).unwrap_or(1);
    let limit = params
        .get("limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(state.config.pagination.records_per_page);
    let filter = filter_from_params(&params);

    let page = state.repo.list(page, limit, &filter).await?;
    Ok(Json(page))
}

/// Batch create transactions. The payload must be a JSON array; anything
/// else is rejected with a 400 before deserialization is attempted.
pub async fn api_transactions_create(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if !payload.is_array() {
        return Err(ApiError::bad_request("Invalid payload"));
    }
    let batch: Vec<Transaction> = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("Invalid payload: {}", e)))?;

    log::info!("POST /api/transactions: {} record(s)", batch.len());
    state.repo.create(batch).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// Batch update transactions by uid
pub async fn api_transactions_update(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !payload.is_array() {
        return Err(ApiError::bad_request("Invalid payload"));
    }
    let batch: Vec<Transaction> = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("Invalid payload: {}", e)))?;

    log::info!("PUT /api/transactions: {} record(s)", batch.len());
    state.repo.update(batch).await?;
    Ok(Json(json!({ "success": true })))
}

/// Batch delete transactions by uid. Unknown uids are skipped.
pub async fn api_transactions_delete(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !payload.is_array() {
        return Err(ApiError::bad_request("Invalid payload"));
    }
    let uids: Vec<String> = serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("Invalid payload: {}", e)))?;

    let removed = state.repo.delete(uids).await?;
    Ok(Json(json!({ "success": true, "deleted": removed.len() })))
}

/// Count, total and average amount over the filtered collection
pub async fn api_transaction_summary(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let filter = filter_from_params(&params);
    let total_records = state.repo.total().await?;
    let page = state
        .repo
        .list(1, total_records.max(1), &filter)
        .await?;

    let count = page.items.len();
    let total: Decimal = page.items.iter().map(|tx| tx.amount).sum();
    let average = if count > 0 {
        total / Decimal::from(count as i64)
    } else {
        Decimal::ZERO
    };

    Ok(Json(json!({
        "count": count,
        "total": total,
        "average": average,
    })))
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use crate::{create_router, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use gridbook_config::Config;
    use gridbook_core::{seed_accounts, MemoryRepository, StaticOptions};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> axum::Router {
        let state = AppState {
            repo: Arc::new(MemoryRepository::seeded()),
            accounts: Arc::new(StaticOptions::new(seed_accounts())),
            config: Config::default(),
        };
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_transactions_paginated() {
        let response = test_router()
            .oneshot(
                Request::get("/api/transactions?page=1&limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total_count"], 5);
        assert_eq!(body["page"], 1);
        assert_eq!(body["page_size"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["uid"], "txn-1");
    }

    #[tokio::test]
    async fn test_list_applies_amount_filter() {
        let response = test_router()
            .oneshot(
                Request::get("/api/transactions?min_amount=100000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["total_count"], 2);
    }

    #[tokio::test]
    async fn test_create_rejects_non_array() {
        let response = test_router()
            .oneshot(json_request(
                "POST",
                "/api/transactions",
                r#"{"uid":"txn-9"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("Invalid payload"));
    }

    #[tokio::test]
    async fn test_create_prepends_batch() {
        let router = test_router();
        let batch = r#"[{
            "uid": "txn-9",
            "date": "2025-12-01",
            "from": "11.01.01",
            "to": "52.01.03",
            "amount": "5000",
            "note": "Coffee"
        }]"#;

        let response = router
            .clone()
            .oneshot(json_request("POST", "/api/transactions", batch))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["success"], true);

        let response = router
            .oneshot(
                Request::get("/api/transactions?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["total_count"], 6);
        assert_eq!(body["items"][0]["uid"], "txn-9");
    }

    #[tokio::test]
    async fn test_update_unknown_uid_is_404() {
        let batch = r#"[{
            "uid": "txn-missing",
            "date": "2025-12-01",
            "from": "11.01.01",
            "to": "52.01.03",
            "amount": "5000",
            "note": ""
        }]"#;
        let response = test_router()
            .oneshot(json_request("PUT", "/api/transactions", batch))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_skips_unknown_uids() {
        let response = test_router()
            .oneshot(json_request(
                "DELETE",
                "/api/transactions",
                r#"["txn-2", "txn-missing"]"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["deleted"], 1);
    }

    #[tokio::test]
    async fn test_summary() {
        let response = test_router()
            .oneshot(
                Request::get("/api/transactions/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 5);
    }

    #[tokio::test]
    async fn test_accounts() {
        let response = test_router()
            .oneshot(Request::get("/api/accounts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let accounts = body.as_array().unwrap();
        assert_eq!(accounts.len(), 6);
        assert_eq!(accounts[0]["value"], "11.01.01");
    }

    #[tokio::test]
    async fn test_transactions_page_renders() {
        let response = test_router()
            .oneshot(Request::get("/transactions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<table"));
        assert!(html.contains("Adjustment"));
    }
}
