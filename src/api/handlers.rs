//! HTTP request handlers for the leave engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::collections::HashSet;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_annual_accrual, compute_balance, working_dates};
use crate::error::EngineError;
use crate::holidays::parse_compact_date;
use crate::models::{DateSelection, Language};

use super::request::{AccrualRequest, BalanceRequest, HolidayQuery};
use super::response::{
    AccrualResponse, ApiError, ApiErrorResponse, HolidayListResponse, HolidayLookupResponse,
    WorkingDaysResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/working-days", post(working_days_handler))
        .route("/accrual", post(accrual_handler))
        .route("/balance", post(balance_handler))
        .route("/holidays", get(holiday_list_handler))
        .route("/holidays/:date", get(holiday_lookup_handler))
        .with_state(state)
}

/// Handler for POST /working-days.
///
/// Accepts `{"start", "end"}` or `{"dates": [...]}` and returns the working
/// dates of the selection.
async fn working_days_handler(
    State(state): State<AppState>,
    payload: Result<Json<DateSelection>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing working-days request");

    let selection = match payload {
        Ok(Json(selection)) => selection,
        Err(rejection) => return json_rejection(rejection, correlation_id).into_response(),
    };

    let start_time = Instant::now();
    let holidays = holiday_set(&state, correlation_id).await;
    let policy = &state.config().config().working_days;

    match working_dates(&selection, &holidays, policy) {
        Ok(dates) => {
            let working_days = Decimal::from(dates.len());
            info!(
                correlation_id = %correlation_id,
                working_days = %working_days,
                duration_us = start_time.elapsed().as_micros(),
                "Working days counted"
            );
            (
                StatusCode::OK,
                Json(WorkingDaysResponse {
                    working_days,
                    dates,
                }),
            )
                .into_response()
        }
        Err(err) => engine_error(err, correlation_id),
    }
}

/// Handler for POST /accrual.
async fn accrual_handler(
    State(state): State<AppState>,
    payload: Result<Json<AccrualRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing accrual request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection, correlation_id).into_response(),
    };

    let params = match request
        .rates
        .parameters(&state.config().config().accrual, request.hire_date)
    {
        Ok(params) => params,
        Err(err) => return engine_error(err, correlation_id),
    };

    let accrued_days = compute_annual_accrual(request.year, &params);
    info!(
        correlation_id = %correlation_id,
        year = request.year,
        accrued_days = %accrued_days,
        "Accrual computed"
    );
    (
        StatusCode::OK,
        Json(AccrualResponse {
            year: request.year,
            hire_date: request.hire_date,
            accrued_days,
        }),
    )
        .into_response()
}

/// Handler for POST /balance.
async fn balance_handler(
    State(state): State<AppState>,
    payload: Result<Json<BalanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing balance request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection, correlation_id).into_response(),
    };

    let params = match request
        .rates
        .parameters(&state.config().config().accrual, request.hire_date)
    {
        Ok(params) => params,
        Err(err) => return engine_error(err, correlation_id),
    };

    let balance = match compute_balance(&params, &request.inputs()) {
        Ok(balance) => balance,
        Err(err) => return engine_error(err, correlation_id),
    };
    if balance.is_overdrawn {
        warn!(
            correlation_id = %correlation_id,
            remaining_days = %balance.remaining_days,
            "Leave balance is overdrawn"
        );
    }
    info!(
        correlation_id = %correlation_id,
        year = request.year,
        total_days = %balance.total_days,
        remaining_days = %balance.remaining_days,
        "Balance computed"
    );
    (StatusCode::OK, Json(balance)).into_response()
}

/// Handler for GET /holidays.
async fn holiday_list_handler(
    State(state): State<AppState>,
    query: Result<Query<HolidayQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing holiday list request");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
            return ApiErrorResponse::bad_request(ApiError::validation_error(
                rejection.body_text(),
            ))
            .into_response();
        }
    };

    let language = match query.lang.as_deref().map(str::parse::<Language>) {
        None => Language::En,
        Some(Ok(language)) => language,
        Some(Err(message)) => {
            return ApiErrorResponse::bad_request(ApiError::validation_error(message))
                .into_response();
        }
    };
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    match state.holidays().ensure_loaded().await {
        Ok(calendar) => {
            let holidays = calendar.holidays_in_year(year, language);
            info!(
                correlation_id = %correlation_id,
                year,
                language = %language,
                count = holidays.len(),
                "Holidays listed"
            );
            (
                StatusCode::OK,
                Json(HolidayListResponse {
                    year,
                    language,
                    holidays,
                }),
            )
                .into_response()
        }
        Err(err) => engine_error(err, correlation_id),
    }
}

/// Handler for GET /holidays/{date}.
async fn holiday_lookup_handler(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, date = %raw_date, "Processing holiday lookup");

    let Some(date) = parse_path_date(&raw_date) else {
        return ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "invalid date '{}', expected YYYY-MM-DD or YYYYMMDD",
            raw_date
        )))
        .into_response();
    };

    match state.holidays().ensure_loaded().await {
        Ok(calendar) => {
            let names = calendar.holiday_names(date);
            (
                StatusCode::OK,
                Json(HolidayLookupResponse {
                    date,
                    is_holiday: calendar.contains(date),
                    names,
                }),
            )
                .into_response()
        }
        Err(err) => engine_error(err, correlation_id),
    }
}

/// The holiday set to classify against. A failed load degrades to whatever
/// the loader already holds, which may be nothing.
async fn holiday_set(state: &AppState, correlation_id: Uuid) -> HashSet<NaiveDate> {
    match state.holidays().ensure_loaded().await {
        Ok(calendar) => calendar.holiday_set().clone(),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Holidays unavailable, counting weekends only"
            );
            state.holidays().holiday_set()
        }
    }
}

fn parse_path_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_compact_date(raw))
}

fn engine_error(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    ApiErrorResponse::from(err).into_response()
}

fn json_rejection(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Well-formed JSON of the wrong shape
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, HolidayFeedConfig};
    use crate::holidays::{FeedClient, FetchError, HolidayLoader, MemoryStore};
    use crate::models::LeaveBalanceResult;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Serves fixed feed bodies keyed by URL.
    struct StaticClient {
        bodies: HashMap<String, String>,
    }

    #[async_trait]
    impl FeedClient for StaticClient {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or(FetchError::Status { status: 503 })
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn feed(events: &[(&str, &str)]) -> String {
        let events: Vec<serde_json::Value> = events
            .iter()
            .map(|(date, name)| json!({"dtstart": [date, {"value": "DATE"}], "summary": name}))
            .collect();
        json!({"vcalendar": [{"vevent": events}]}).to_string()
    }

    fn state_with(bodies: HashMap<String, String>) -> AppState {
        let feeds = HolidayFeedConfig::default();
        let loader = HolidayLoader::new(
            Arc::new(StaticClient { bodies }),
            &feeds,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        );
        AppState::new(ConfigLoader::default(), loader)
    }

    fn create_test_state() -> AppState {
        let feeds = HolidayFeedConfig::default();
        state_with(HashMap::from([
            (
                feeds.sources.en.clone(),
                feed(&[
                    ("20251225", "Christmas Day"),
                    ("20251226", "The first weekday after Christmas Day"),
                ]),
            ),
            (
                feeds.sources.zh.clone(),
                feed(&[("20251225", "聖誕節"), ("20251029", "重陽節")]),
            ),
        ]))
    }

    fn offline_state() -> AppState {
        state_with(HashMap::new())
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    // ==========================================================================
    // POST /working-days
    // ==========================================================================
    #[tokio::test]
    async fn test_working_days_range_skips_sunday_and_holidays() {
        let router = create_router(create_test_state());

        // Mon 2025-12-22 .. Sun 2025-12-28, with 25 and 26 as holidays
        let response = router
            .oneshot(post_json(
                "/working-days",
                r#"{"start": "2025-12-22", "end": "2025-12-28"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: WorkingDaysResponse = body_json(response).await;
        assert_eq!(result.working_days, dec("4"));
        assert_eq!(
            result.dates,
            vec![
                make_date("2025-12-22"),
                make_date("2025-12-23"),
                make_date("2025-12-24"),
                make_date("2025-12-27"),
            ]
        );
    }

    #[tokio::test]
    async fn test_working_days_explicit_dates_use_both_editions() {
        let router = create_router(create_test_state());

        // 2025-10-29 is only listed by the Chinese edition
        let response = router
            .oneshot(post_json(
                "/working-days",
                r#"{"dates": ["2025-10-30", "2025-10-29"]}"#,
            ))
            .await
            .unwrap();

        let result: WorkingDaysResponse = body_json(response).await;
        assert_eq!(result.working_days, dec("1"));
        assert_eq!(result.dates, vec![make_date("2025-10-30")]);
    }

    #[tokio::test]
    async fn test_working_days_inverted_range_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/working-days",
                r#"{"start": "2025-03-10", "end": "2025-03-07"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_working_days_without_holidays_counts_weekends_only() {
        let router = create_router(offline_state());

        let response = router
            .oneshot(post_json(
                "/working-days",
                r#"{"start": "2025-12-22", "end": "2025-12-28"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: WorkingDaysResponse = body_json(response).await;
        assert_eq!(result.working_days, dec("6"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/working-days", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_unrecognised_selection_returns_validation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/working-days", r#"{"from": "2025-03-07"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    // ==========================================================================
    // POST /accrual and POST /balance
    // ==========================================================================
    #[tokio::test]
    async fn test_accrual_uses_configured_defaults() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/accrual",
                r#"{"year": 2025, "hire_date": "2022-11-01"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: AccrualResponse = body_json(response).await;
        assert_eq!(result.accrued_days, dec("9.5"));
        assert_eq!(result.hire_date, make_date("2022-11-01"));
    }

    #[tokio::test]
    async fn test_accrual_rate_override_below_base_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/accrual",
                r#"{"year": 2025, "hire_date": "2022-11-01", "rates": {"max_days_per_year": "5"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_ACCRUAL_PARAMETERS");
    }

    #[tokio::test]
    async fn test_accrual_missing_hire_date_returns_validation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/accrual", r#"{"year": 2025}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("hire_date"));
    }

    #[tokio::test]
    async fn test_balance_aggregates_all_components() {
        let router = create_router(create_test_state());

        let body = json!({
            "hire_date": "2022-11-01",
            "year": 2025,
            "carry_forward_days": "5",
            "compensatory_days": "2",
            "used_days": "3"
        });
        let response = router
            .oneshot(post_json("/balance", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: LeaveBalanceResult = body_json(response).await;
        assert_eq!(result.accrued_days, dec("9.5"));
        assert_eq!(result.total_days, dec("16.5"));
        assert_eq!(result.remaining_days, dec("13.5"));
        assert!(!result.is_overdrawn);
    }

    #[tokio::test]
    async fn test_balance_overdrawn_is_reported_not_rejected() {
        let router = create_router(create_test_state());

        let body = json!({"hire_date": "2022-11-01", "year": 2025, "used_days": "12"});
        let response = router
            .oneshot(post_json("/balance", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: LeaveBalanceResult = body_json(response).await;
        assert_eq!(result.remaining_days, dec("-2.5"));
        assert!(result.is_overdrawn);
    }

    #[tokio::test]
    async fn test_balance_overflowing_amounts_return_400() {
        let router = create_router(create_test_state());

        let body = json!({
            "hire_date": "2022-11-01",
            "year": 2025,
            "carry_forward_days": Decimal::MAX.to_string(),
            "compensatory_days": "1"
        });
        let response = router
            .oneshot(post_json("/balance", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_BALANCE_INPUTS");
    }

    #[tokio::test]
    async fn test_accrual_huge_increment_is_capped() {
        let router = create_router(create_test_state());

        let body = json!({
            "year": 2100,
            "hire_date": "2000-01-01",
            "rates": {"seniority_increment_per_year": "1000000000000000000000000000"}
        });
        let response = router
            .oneshot(post_json("/accrual", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: AccrualResponse = body_json(response).await;
        assert_eq!(result.accrued_days, dec("16.5"));
    }

    // ==========================================================================
    // GET /holidays
    // ==========================================================================
    #[tokio::test]
    async fn test_holiday_list_for_year_and_language() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get("/holidays?year=2025&lang=tc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: HolidayListResponse = body_json(response).await;
        assert_eq!(result.language, Language::Zh);
        let dates: Vec<NaiveDate> = result.holidays.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![make_date("2025-10-29"), make_date("2025-12-25")]);
    }

    #[tokio::test]
    async fn test_holiday_list_rejects_unknown_language() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(get("/holidays?year=2025&lang=fr"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_holiday_list_unavailable_returns_503() {
        let router = create_router(offline_state());

        let response = router.oneshot(get("/holidays?year=2025")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "HOLIDAY_SOURCE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_holiday_lookup_returns_both_names() {
        let router = create_router(create_test_state());

        let response = router.oneshot(get("/holidays/20251225")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: HolidayLookupResponse = body_json(response).await;
        assert!(result.is_holiday);
        assert_eq!(result.names.en.as_deref(), Some("Christmas Day"));
        assert_eq!(result.names.zh.as_deref(), Some("聖誕節"));
    }

    #[tokio::test]
    async fn test_holiday_lookup_ordinary_day() {
        let router = create_router(create_test_state());

        let response = router.oneshot(get("/holidays/2025-12-24")).await.unwrap();

        let result: HolidayLookupResponse = body_json(response).await;
        assert!(!result.is_holiday);
        assert!(result.names.is_empty());
    }

    #[tokio::test]
    async fn test_holiday_lookup_bad_date_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(get("/holidays/christmas")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
