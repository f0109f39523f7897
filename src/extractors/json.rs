//! JSON object body extractor. Malformed bodies become 400 field errors, not axum's plain-text rejections;
//! oversized bodies and wrong content types keep their 413 / 415 status.

use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

#[derive(Clone, Debug)]
pub struct JsonBody(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(reject)?;
        match value {
            Value::Object(map) => Ok(JsonBody(map)),
            _ => Err(AppError::field("body", "body must be a JSON object")),
        }
    }
}

fn reject(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(message),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(message),
        _ => AppError::field("body", message),
    }
}
