//! Standard response envelope helpers.
//!
//! Every body built here has the shape
//! `{ success, data?, message?, errors?, pagination? }`; absent parts are omitted.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        }
    }
}

/// Ceiling division of `total` by `limit`; a zero limit yields zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    fn failed(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            pagination: None,
        }
    }
}

pub type EnvelopeResponse<T> = (StatusCode, Json<Envelope<T>>);

pub fn success<T: Serialize>(data: T) -> EnvelopeResponse<T> {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            pagination: None,
        }),
    )
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> EnvelopeResponse<T> {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }),
    )
}

pub fn paginated<T: Serialize>(data: Vec<T>, pagination: Pagination) -> EnvelopeResponse<Vec<T>> {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            pagination: Some(pagination),
        }),
    )
}

pub fn failure(status: StatusCode, message: String) -> EnvelopeResponse<()> {
    (status, Json(Envelope::failed(message)))
}

pub fn validation_failed(errors: Vec<FieldError>) -> EnvelopeResponse<()> {
    let mut envelope = Envelope::failed("Validation failed".to_string());
    envelope.errors = Some(errors);
    (StatusCode::BAD_REQUEST, Json(envelope))
}

pub fn bad_request(message: String) -> EnvelopeResponse<()> {
    failure(StatusCode::BAD_REQUEST, message)
}

pub fn unauthorized(message: String) -> EnvelopeResponse<()> {
    failure(StatusCode::UNAUTHORIZED, message)
}

pub fn forbidden(message: String) -> EnvelopeResponse<()> {
    failure(StatusCode::FORBIDDEN, message)
}

pub fn not_found(message: String) -> EnvelopeResponse<()> {
    failure(StatusCode::NOT_FOUND, message)
}

pub fn conflict(message: String) -> EnvelopeResponse<()> {
    failure(StatusCode::CONFLICT, message)
}

pub fn internal_error() -> EnvelopeResponse<()> {
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let v = serde_json::to_value(Pagination::new(2, 10, 21)).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "page": 2, "limit": 10, "total": 21, "totalPages": 3 })
        );
    }

    #[test]
    fn success_and_created_envelopes() {
        let (status, Json(body)) = success(vec![1, 2]);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "success": true, "data": [1, 2] })
        );

        let (status, Json(body)) = created("x", "Created");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message.as_deref(), Some("Created"));
    }

    #[test]
    fn paginated_envelope_carries_pagination() {
        let (_, Json(body)) = paginated(vec!["a"], Pagination::new(1, 10, 21));
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v["pagination"]["totalPages"], 3);
        assert_eq!(v["data"], serde_json::json!(["a"]));
    }

    #[test]
    fn failure_envelope_omits_absent_parts() {
        let (status, Json(body)) = conflict("taken".into());
        assert_eq!(status, StatusCode::CONFLICT);
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v, serde_json::json!({ "success": false, "message": "taken" }));
    }

    #[test]
    fn validation_envelope_carries_errors() {
        let (status, Json(body)) = validation_failed(vec![FieldError::new("email", "bad")]);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v["errors"][0]["field"], "email");
        assert_eq!(v["success"], false);
    }
}
