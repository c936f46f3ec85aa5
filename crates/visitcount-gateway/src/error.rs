//! HTTP surface for failures.

use axum::{
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use visitcount_core::error::{ClientCode, VisitCountError};
use visitcount_core::response::ResponseContract;

/// A failed invocation, rendered with the same header contract as success.
#[derive(Debug, Error)]
#[error("{err}")]
pub struct ApiError {
    pub err: VisitCountError,
    contract: ResponseContract,
}

impl ApiError {
    pub fn new(err: VisitCountError, contract: ResponseContract) -> Self {
        Self { err, contract }
    }

    pub fn status(&self) -> StatusCode {
        match self.err.client_code() {
            ClientCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ClientCode::Config | ClientCode::MalformedRecord | ClientCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.err.client_code().as_str(),
            "message": self.err.to_string(),
        });
        let mut resp = (self.status(), body.to_string()).into_response();
        apply_contract_headers(resp.headers_mut(), &self.contract);
        resp
    }
}

pub(crate) fn apply_contract_headers(headers: &mut HeaderMap, contract: &ResponseContract) {
    for (name, value) in contract.headers() {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}
