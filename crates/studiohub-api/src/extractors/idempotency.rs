//! `Idempotency-Key` header extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use studiohub_core::error::AppError;

use crate::error::ApiError;

/// Optional idempotency key taken from the `Idempotency-Key` header.
///
/// A missing or blank header yields `None`; the request then executes
/// unconditionally. Non-UTF-8 header values are rejected.
#[derive(Debug, Clone)]
pub struct IdempotencyKey(pub Option<String>);

impl IdempotencyKey {
    /// The key as a borrowed str, if one was supplied.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for IdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get("idempotency-key") else {
            return Ok(Self(None));
        };
        let value = value
            .to_str()
            .map_err(|_| ApiError(AppError::validation("Idempotency-Key must be valid UTF-8")))?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self(None));
        }
        Ok(Self(Some(trimmed.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> IdempotencyKey {
        let (mut parts, _) = request.into_parts();
        IdempotencyKey::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_none() {
        let key = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(key.as_deref(), None);
    }

    #[tokio::test]
    async fn test_blank_header_is_none() {
        let request = Request::builder()
            .header("Idempotency-Key", "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), None);
    }

    #[tokio::test]
    async fn test_key_is_trimmed() {
        let request = Request::builder()
            .header("Idempotency-Key", "  req-42  ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("req-42"));
    }
}
