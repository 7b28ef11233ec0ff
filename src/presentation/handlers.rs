// HTTP request handlers
use crate::application::derived_metrics::funnel_conversion_series;
use crate::application::period_generator::generate_periods_for;
use crate::application::report_service::{ReportError, ReportRequest};
use crate::domain::metric::ConversionReference;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::view_filters::{apply_view_options, ViewOptions};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PeriodQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: String,
}

#[derive(Deserialize)]
pub struct FunnelRequest {
    pub stage_counts: Vec<f64>,
    pub reference: ConversionReference,
}

#[derive(Serialize)]
pub struct FunnelResponse {
    pub reference: ConversionReference,
    pub rates: Vec<f64>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List dataset names known to the sample repository
pub async fn list_datasets(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);

    match state.report_service.list_datasets().await {
        Ok(datasets) => respond(StatusCode::OK, &datasets, compress).await,
        Err(e) => {
            tracing::error!("Error listing datasets: {:#}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string(), compress).await
        }
    }
}

/// Periods a range would be split into
pub async fn list_periods(headers: HeaderMap, Query(query): Query<PeriodQuery>) -> Response {
    let compress = accepts_brotli(&headers);

    match generate_periods_for(query.start, query.end, &query.granularity) {
        Ok(periods) => respond(StatusCode::OK, &periods, compress).await,
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string(), compress).await,
    }
}

/// Aggregate a dataset into a performance report
pub async fn build_report(
    Query(options): Query<ViewOptions>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    let compress = accepts_brotli(&headers);

    match state.report_service.build_report(&request).await {
        Ok(report) => {
            let report = apply_view_options(report, options);
            respond(StatusCode::OK, &report, compress).await
        }
        Err(e) => {
            let status = report_error_status(&e);
            if status.is_server_error() {
                tracing::error!("Error building report for {}: {}", request.dataset, e);
            } else {
                tracing::warn!("Rejected report request for {}: {}", request.dataset, e);
            }
            error_response(status, e.to_string(), compress).await
        }
    }
}

/// Conversion rates for a funnel's stage counts
pub async fn funnel(headers: HeaderMap, Json(request): Json<FunnelRequest>) -> Response {
    let compress = accepts_brotli(&headers);
    let rates = funnel_conversion_series(&request.stage_counts, request.reference);
    let body = FunnelResponse {
        reference: request.reference,
        rates,
    };
    respond(StatusCode::OK, &body, compress).await
}

pub fn report_error_status(error: &ReportError) -> StatusCode {
    match error {
        ReportError::Engine(_) => StatusCode::BAD_REQUEST,
        ReportError::UnknownDataset(_) => StatusCode::NOT_FOUND,
        ReportError::Repository(_) => StatusCode::BAD_GATEWAY,
    }
}

async fn error_response(status: StatusCode, message: String, compress: bool) -> Response {
    respond(status, &ErrorBody { error: message }, compress).await
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, compress: bool) -> Response {
    match json_response(status, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::EngineError;

    #[test]
    fn test_report_error_status() {
        let engine = ReportError::Engine(EngineError::UnsupportedGranularity("hour".into()));
        assert_eq!(report_error_status(&engine), StatusCode::BAD_REQUEST);
        assert_eq!(
            report_error_status(&ReportError::UnknownDataset("tickets".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            report_error_status(&ReportError::Repository(anyhow::anyhow!("timeout"))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_list_periods_rejects_unknown_granularity() {
        let query = PeriodQuery {
            start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            granularity: "hour".to_string(),
        };
        let response = list_periods(HeaderMap::new(), Query(query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_funnel_reference_is_required() {
        let missing = serde_json::from_str::<FunnelRequest>(r#"{"stage_counts": [10, 5]}"#);
        assert!(missing.is_err());

        let explicit =
            serde_json::from_str::<FunnelRequest>(r#"{"stage_counts": [10, 5], "reference": "funnel_wide"}"#)
                .unwrap();
        assert_eq!(explicit.reference, ConversionReference::FunnelWide);
    }
}
